use chrono::Utc;
use rand::Rng;

/// Launchpad accepts OAuth 1.0 PLAINTEXT signatures; with an empty consumer
/// secret and an empty token secret the signature is a lone `&`.
const SIGNATURE_METHOD: &str = "PLAINTEXT";
const ANONYMOUS_SIGNATURE: &str = "&";
const OAUTH_VERSION: &str = "1.0";

/// Credentials for anonymous, read-only access.
///
/// The consumer key identifies the application; the access token is empty.
#[derive(Debug, Clone)]
pub struct AnonymousCredentials {
    consumer_key: String,
}

impl AnonymousCredentials {
    pub fn new(consumer_key: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
        }
    }

    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    /// Build the `Authorization` header value for one request.
    ///
    /// A fresh nonce and timestamp are generated on every call.
    pub fn authorization_header(&self, realm: &str) -> String {
        let nonce: u64 = rand::thread_rng().gen();
        let timestamp = Utc::now().timestamp();
        format!(
            "OAuth realm=\"{}\", oauth_consumer_key=\"{}\", oauth_token=\"\", \
             oauth_signature_method=\"{}\", oauth_signature=\"{}\", \
             oauth_timestamp=\"{}\", oauth_nonce=\"{}\", oauth_version=\"{}\"",
            realm,
            self.consumer_key,
            SIGNATURE_METHOD,
            ANONYMOUS_SIGNATURE,
            timestamp,
            nonce,
            OAUTH_VERSION,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(header: &'a str, name: &str) -> Option<&'a str> {
        let needle = format!("{}=\"", name);
        let start = header.find(&needle)? + needle.len();
        let end = header[start..].find('"')? + start;
        Some(&header[start..end])
    }

    #[test]
    fn test_authorization_header_shape() {
        let creds = AnonymousCredentials::new("snapcpp");
        let header = creds.authorization_header("https://api.launchpad.net/");

        assert!(header.starts_with("OAuth "));
        assert_eq!(param(&header, "realm"), Some("https://api.launchpad.net/"));
        assert_eq!(param(&header, "oauth_consumer_key"), Some("snapcpp"));
        assert_eq!(param(&header, "oauth_token"), Some(""));
        assert_eq!(param(&header, "oauth_signature_method"), Some("PLAINTEXT"));
        assert_eq!(param(&header, "oauth_signature"), Some("&"));
        assert_eq!(param(&header, "oauth_version"), Some("1.0"));

        let timestamp: i64 = param(&header, "oauth_timestamp").unwrap().parse().unwrap();
        assert!((Utc::now().timestamp() - timestamp).abs() < 60);
    }

    #[test]
    fn test_nonce_changes_between_requests() {
        let creds = AnonymousCredentials::new("snapcpp");
        let a = creds.authorization_header("r");
        let b = creds.authorization_header("r");
        assert_ne!(param(&a, "oauth_nonce"), param(&b, "oauth_nonce"));
    }
}
