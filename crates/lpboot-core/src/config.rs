//! Application configuration.
//!
//! The only input the bootstrapper takes from its environment is the
//! invoking user's home directory. It is resolved once here and then
//! injected, so tests can supply their own.

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::Result;

/// Cache location relative to the home directory
const CACHE_SUFFIX: &str = "/.launchpadlib/cache/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub home_directory: PathBuf,
}

impl Config {
    /// Resolve the home directory of the current user.
    pub fn load() -> Result<Self> {
        let home_directory = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
        Ok(Self { home_directory })
    }

    pub fn from_home(home_directory: impl Into<PathBuf>) -> Self {
        Self {
            home_directory: home_directory.into(),
        }
    }

    pub fn cache_dir(&self) -> PathBuf {
        cache_dir_for(&self.home_directory)
    }
}

/// `<home>/.launchpadlib/cache/`, built by plain concatenation.
///
/// No normalization happens: a home with a trailing slash produces a double
/// slash, and the trailing slash of the suffix is preserved.
pub fn cache_dir_for(home: impl Into<PathBuf>) -> PathBuf {
    let mut path: OsString = home.into().into_os_string();
    path.push(CACHE_SUFFIX);
    PathBuf::from(path)
}
