//! API client for the Launchpad web service.
//!
//! This module provides the `LaunchpadClient` struct, which performs the
//! anonymous login handshake and the document fetches a `Session` makes
//! afterwards.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::{header, Client, StatusCode};
use tracing::{debug, info, warn};

use crate::auth::{AnonymousCredentials, ServiceRootDocument, Session};
use crate::cache::{CacheManager, CachedDocument};
use crate::service_root::ServiceRoot;

use super::LaunchpadError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Launchpad serves WADL by default; ask for the JSON representation.
const ACCEPT_JSON: &str = "application/json";

/// API client for Launchpad.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Debug, Clone)]
pub struct LaunchpadClient {
    client: Client,
}

impl LaunchpadClient {
    /// Create a new API client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }

    /// Log in anonymously and return a session on the versioned service root.
    ///
    /// `launchpadlib_dir` is the cache root; documents for the service root's
    /// host are kept in `<launchpadlib_dir>/<host>/cache/`, created on demand.
    pub async fn login_anonymously(
        &self,
        consumer_name: &str,
        service_root: &str,
        launchpadlib_dir: &Path,
        version: &str,
    ) -> Result<Session> {
        let root = ServiceRoot::lookup(service_root)?;
        let url = root.versioned_url(version)?.to_string();
        let cache = CacheManager::for_host(launchpadlib_dir, &root.host())?;
        let credentials = AnonymousCredentials::new(consumer_name);

        debug!(url = %url, consumer = consumer_name, "Starting anonymous login");

        let body = self
            .fetch_document(&url, &credentials, root.url(), &cache)
            .await?;
        let document: ServiceRootDocument = serde_json::from_str(&body).map_err(|e| {
            LaunchpadError::UnexpectedResponse(format!("Service root document at {}: {}", url, e))
        })?;

        info!(service_root = %root, version = version, "Anonymous login complete");

        Ok(Session {
            client: self.clone(),
            credentials,
            service_root: root,
            version: version.to_string(),
            cache,
            document,
            created_at: Utc::now(),
        })
    }

    fn user_agent(credentials: &AnonymousCredentials) -> String {
        format!(
            "lpboot/{} (consumer=\"{}\")",
            env!("CARGO_PKG_VERSION"),
            credentials.consumer_key()
        )
    }

    fn request_headers(
        credentials: &AnonymousCredentials,
        realm: &str,
        etag: Option<&str>,
    ) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static(ACCEPT_JSON));
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&credentials.authorization_header(realm))?,
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&Self::user_agent(credentials))?,
        );
        if let Some(etag) = etag {
            headers.insert(header::IF_NONE_MATCH, header::HeaderValue::from_str(etag)?);
        }
        Ok(headers)
    }

    /// `max-age` from a `Cache-Control` header, unless caching is forbidden.
    ///
    /// Directive names are case-insensitive and may have spaces around `=`.
    fn max_age(headers: &header::HeaderMap) -> Option<i64> {
        let value = headers.get(header::CACHE_CONTROL)?.to_str().ok()?;
        let mut max_age = None;
        for directive in value.split(',') {
            let (name, argument) = match directive.split_once('=') {
                Some((name, argument)) => (name.trim(), Some(argument.trim().trim_matches('"'))),
                None => (directive.trim(), None),
            };
            if name.eq_ignore_ascii_case("no-cache") || name.eq_ignore_ascii_case("no-store") {
                return None;
            }
            if name.eq_ignore_ascii_case("max-age") {
                max_age = argument.and_then(|seconds| seconds.parse().ok());
            }
        }
        max_age
    }

    /// GET a document, going through the cache.
    ///
    /// Fresh entries are returned without a request; stale entries with an
    /// ETag are revalidated with `If-None-Match`.
    pub(crate) async fn fetch_document(
        &self,
        url: &str,
        credentials: &AnonymousCredentials,
        realm: &str,
        cache: &CacheManager,
    ) -> Result<String> {
        let cached = cache.load(url)?;
        if let Some(ref entry) = cached {
            if entry.is_fresh() {
                debug!(url = url, age_secs = entry.age_seconds(), "Serving fresh document from cache");
                return Ok(entry.data.body.clone());
            }
        }
        let etag = cached.as_ref().and_then(|c| c.data.etag.as_deref());

        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = self
                .client
                .get(url)
                .headers(Self::request_headers(credentials, realm, etag)?)
                .send()
                .await
                .map_err(LaunchpadError::from)
                .with_context(|| format!("Failed to send GET request to {}", url))?;

            let status = response.status();

            if status == StatusCode::NOT_MODIFIED {
                if let Some(ref entry) = cached {
                    debug!(url = url, "Cached document revalidated");
                    cache.touch(entry)?;
                    return Ok(entry.data.body.clone());
                }
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                retries += 1;
                if retries > MAX_RATE_LIMIT_RETRIES {
                    return Err(LaunchpadError::Throttled.into());
                }
                warn!(url = url, retry = retries, backoff_ms = backoff_ms, "Rate limited, backing off");
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                backoff_ms *= 2; // Exponential backoff
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(LaunchpadError::from_status(status, &body).into());
            }

            let new_etag = response
                .headers()
                .get(header::ETAG)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let max_age_secs = Self::max_age(response.headers());

            let body = response
                .text()
                .await
                .map_err(LaunchpadError::from)
                .with_context(|| format!("Failed to read response body from {}", url))?;
            debug!(url = url, bytes = body.len(), "Fetched document");

            cache.save(CachedDocument {
                url: url.to_string(),
                etag: new_etag,
                max_age_secs,
                body: body.clone(),
            })?;

            return Ok(body);
        }
    }
}
