//! Launchpad service roots.
//!
//! A service root selects which Launchpad deployment the API client talks
//! to. Callers usually pass a well-known name such as `production`; a full
//! URL is accepted as well so a private instance (or a test server) can be
//! targeted.

use std::fmt;

use url::Url;

use crate::api::LaunchpadError;

const PRODUCTION_URL: &str = "https://api.launchpad.net/";
const QASTAGING_URL: &str = "https://api.qastaging.launchpad.net/";
const STAGING_URL: &str = "https://api.staging.launchpad.net/";
const DOGFOOD_URL: &str = "https://api.dogfood.paddev.net/";
const DEV_URL: &str = "https://api.launchpad.test/";
const TEST_DEV_URL: &str = "http://api.launchpad.test:8085/";

/// A validated service root URL, always ending with `/`.
///
/// The host doubles as a cache directory name, so roots carrying
/// credentials, a query, a fragment or a dot-only host are refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRoot {
    url: Url,
}

impl ServiceRoot {
    /// Resolve a service root name or URL.
    pub fn lookup(name: &str) -> Result<Self, LaunchpadError> {
        let raw = match name {
            "production" => PRODUCTION_URL,
            "qastaging" => QASTAGING_URL,
            "staging" => STAGING_URL,
            "dogfood" => DOGFOOD_URL,
            "dev" => DEV_URL,
            "test_dev" => TEST_DEV_URL,
            url => url,
        };
        let unknown = || LaunchpadError::UnknownServiceRoot(name.to_string());

        let mut url = Url::parse(raw).map_err(|_| unknown())?;
        if !matches!(url.scheme(), "http" | "https")
            || !url.username().is_empty()
            || url.password().is_some()
            || url.query().is_some()
            || url.fragment().is_some()
        {
            return Err(unknown());
        }
        match url.host_str() {
            Some(host) if !host.is_empty() && !host.chars().all(|c| c == '.') => {}
            _ => return Err(unknown()),
        }

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(Self { url })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Root of a given API version, e.g. `https://api.launchpad.net/devel/`
    pub fn versioned_url(&self, version: &str) -> Result<Url, LaunchpadError> {
        let valid = !version.is_empty()
            && !version.chars().all(|c| c == '.')
            && version
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
        if !valid {
            return Err(LaunchpadError::UnsupportedVersion(version.to_string()));
        }
        self.url
            .join(&format!("{}/", version))
            .map_err(|_| LaunchpadError::UnsupportedVersion(version.to_string()))
    }

    /// Host (and non-default port) of the root, used to partition the
    /// on-disk cache.
    pub fn host(&self) -> String {
        let host = self.url.host_str().unwrap_or_default();
        match self.url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }
    }
}

impl fmt::Display for ServiceRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url())
    }
}
