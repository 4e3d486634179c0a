use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Subdirectory created per service-root host inside the cache root
const CACHE_SUBDIR: &str = "cache";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_seconds(&self) -> i64 {
        (Utc::now() - self.cached_at).num_seconds()
    }
}

/// A fetched API document plus the validators needed to reuse it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CachedDocument {
    pub url: String,
    pub etag: Option<String>,
    /// Freshness lifetime from the response's `Cache-Control: max-age`
    pub max_age_secs: Option<i64>,
    pub body: String,
}

impl CachedData<CachedDocument> {
    /// Fresh entries can be served without contacting the server.
    pub fn is_fresh(&self) -> bool {
        match self.data.max_age_secs {
            Some(max_age) => {
                let lifetime = Duration::seconds(max_age.clamp(0, i64::from(u32::MAX)));
                self.cached_at + lifetime > Utc::now()
            }
            None => false,
        }
    }
}

/// File-per-URL cache of API documents.
///
/// Documents for one service root live under `<root>/<host>/cache/`.
/// Entries are overwritten in place but never evicted, so every distinct
/// URL fetched through a session leaves one file behind; clearing the
/// directory is left to the user, as with launchpadlib's own cache.
#[derive(Debug, Clone)]
pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)
            .with_context(|| format!("Failed to create cache directory {}", cache_dir.display()))?;
        Ok(Self { cache_dir })
    }

    /// Open the cache for one service-root host below `root`.
    ///
    /// The host must be a single path component that stays inside `root`.
    pub fn for_host(root: &Path, host: &str) -> Result<Self> {
        let single_component = matches!(
            Path::new(host).components().collect::<Vec<_>>().as_slice(),
            [Component::Normal(_)]
        );
        if !single_component || host.contains(['/', '\\']) {
            anyhow::bail!("Refusing to use {:?} as a cache directory name", host);
        }
        Self::new(root.join(host).join(CACHE_SUBDIR))
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Turn a URL into a flat file name: the scheme is dropped and every
    /// character outside `[A-Za-z0-9.-]` becomes `,`.
    fn safe_name(url: &str) -> String {
        let without_scheme = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
        let name: String = without_scheme
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { ',' })
            .collect();
        format!("{}.json", name)
    }

    fn cache_path(&self, url: &str) -> PathBuf {
        self.cache_dir.join(Self::safe_name(url))
    }

    pub fn load(&self, url: &str) -> Result<Option<CachedData<CachedDocument>>> {
        let path = self.cache_path(url);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file for {}", url))?;

        // A corrupt entry is treated as a miss and overwritten on the next save
        match serde_json::from_str::<CachedData<CachedDocument>>(&contents) {
            Ok(cached) if cached.data.url == url => Ok(Some(cached)),
            Ok(_) => Ok(None),
            Err(e) => {
                debug!(url = url, error = %e, "Ignoring unreadable cache entry");
                Ok(None)
            }
        }
    }

    pub fn save(&self, document: CachedDocument) -> Result<()> {
        let path = self.cache_path(&document.url);
        let cached = CachedData::new(document);
        let contents = serde_json::to_string_pretty(&cached)?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write cache file {}", path.display()))?;
        Ok(())
    }

    /// Mark an existing entry as just revalidated.
    pub fn touch(&self, cached: &CachedData<CachedDocument>) -> Result<()> {
        self.save(cached.data.clone())
    }
}

// ============================================================================
// Tests
// ============================================================================
