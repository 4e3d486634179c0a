use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::api::LaunchpadClient;
use crate::cache::CacheManager;
use crate::service_root::ServiceRoot;

use super::AnonymousCredentials;

/// JSON representation of the versioned service root.
///
/// Launchpad publishes one `<name>_collection_link` per top-level
/// collection plus a handful of other links; all of them are kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRootDocument {
    pub resource_type_link: Option<String>,
    #[serde(flatten)]
    pub links: BTreeMap<String, serde_json::Value>,
}

impl ServiceRootDocument {
    pub fn link(&self, name: &str) -> Option<&str> {
        self.links.get(name).and_then(|v| v.as_str())
    }
}

/// Handle returned by an anonymous login.
///
/// Holds everything needed for further read-only requests against the
/// same service root and API version.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) client: LaunchpadClient,
    pub(crate) credentials: AnonymousCredentials,
    pub(crate) service_root: ServiceRoot,
    pub(crate) version: String,
    pub(crate) cache: CacheManager,
    pub(crate) document: ServiceRootDocument,
    pub(crate) created_at: DateTime<Utc>,
}

impl Session {
    pub fn service_root(&self) -> &ServiceRoot {
        &self.service_root
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn consumer_name(&self) -> &str {
        self.credentials.consumer_key()
    }

    pub fn document(&self) -> &ServiceRootDocument {
        &self.document
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Link to a top-level collection, e.g. `bugs` or `people`
    pub fn collection_link(&self, name: &str) -> Option<&str> {
        self.document.link(&format!("{}_collection_link", name))
    }

    /// Absolute URL for a link: absolute links pass through, anything else
    /// is taken relative to the versioned root.
    fn resolve(&self, link: &str) -> Result<String> {
        let base = self.service_root.versioned_url(&self.version)?;
        let url = base
            .join(link.trim_start_matches('/'))
            .with_context(|| format!("Invalid Launchpad link {}", link))?;
        Ok(url.into())
    }

    /// Fetch and decode a JSON resource with the session's credentials.
    pub async fn get_json<T: DeserializeOwned>(&self, link: &str) -> Result<T> {
        let url = self.resolve(link)?;
        let body = self
            .client
            .fetch_document(&url, &self.credentials, self.service_root.url(), &self.cache)
            .await?;
        serde_json::from_str(&body).with_context(|| format!("Failed to parse JSON response from {}", url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_service_root_document() {
        let json = r#"{"resource_type_link": "https://api.launchpad.net/devel/#service-root", "bugs_collection_link": "https://api.launchpad.net/devel/bugs", "total_size": 3}"#;
        let doc: ServiceRootDocument = serde_json::from_str(json).expect("Failed to parse service root JSON");

        assert_eq!(
            doc.resource_type_link.as_deref(),
            Some("https://api.launchpad.net/devel/#service-root")
        );
        assert_eq!(doc.link("bugs_collection_link"), Some("https://api.launchpad.net/devel/bugs"));
        // Non-string values are kept but are not links
        assert_eq!(doc.link("total_size"), None);
        assert_eq!(doc.link("missing"), None);
    }

    #[tokio::test]
    async fn test_get_json_relative_and_absolute_links() {
        let server = MockServer::start().await;
        let root = format!(
            r#"{{"resource_type_link": "x", "people_collection_link": "{}/devel/people"}}"#,
            server.uri()
        );
        Mock::given(method("GET"))
            .and(path("/devel/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(root))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/devel/people"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"total_size": 2}"#))
            .expect(2)
            .mount(&server)
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let session = LaunchpadClient::new()
            .unwrap()
            .login_anonymously("snapcpp", &server.uri(), tmp.path(), "devel")
            .await
            .unwrap();

        let link = session.collection_link("people").unwrap().to_string();
        let absolute: serde_json::Value = session.get_json(&link).await.unwrap();
        assert_eq!(absolute["total_size"], 2);

        let relative: serde_json::Value = session.get_json("/people").await.unwrap();
        assert_eq!(relative, absolute);
    }
}
