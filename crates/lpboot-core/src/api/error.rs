use thiserror::Error;

/// Failures talking to the Launchpad web service.
#[derive(Error, Debug)]
pub enum LaunchpadError {
    #[error("Unknown Launchpad service root: {0}")]
    UnknownServiceRoot(String),

    #[error("Unsupported Launchpad API version: {0:?}")]
    UnsupportedVersion(String),

    #[error("Launchpad rejected the anonymous OAuth credentials")]
    AnonymousAccessRejected,

    #[error("Launchpad refused access to a public resource: {0}")]
    Forbidden(String),

    /// Also what an unknown API version looks like from the server side
    #[error("No such Launchpad resource: {0}")]
    NotFound(String),

    #[error("Launchpad is throttling requests")]
    Throttled,

    #[error("Launchpad server error: {0}")]
    ServerError(String),

    #[error("Could not reach Launchpad: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response from Launchpad: {0}")]
    UnexpectedResponse(String),
}

/// Longest error page excerpt kept in an error message
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl LaunchpadError {
    /// Launchpad error pages can be whole HTML documents; keep the start only.
    fn excerpt(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... ({} bytes total)", &body[..end], body.len())
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let excerpt = Self::excerpt(body);
        match status.as_u16() {
            401 => LaunchpadError::AnonymousAccessRejected,
            403 => LaunchpadError::Forbidden(excerpt),
            404 => LaunchpadError::NotFound(excerpt),
            429 => LaunchpadError::Throttled,
            500..=599 => LaunchpadError::ServerError(excerpt),
            _ => LaunchpadError::UnexpectedResponse(format!("HTTP {}: {}", status, excerpt)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_mapping() {
        assert!(matches!(
            LaunchpadError::from_status(StatusCode::UNAUTHORIZED, ""),
            LaunchpadError::AnonymousAccessRejected
        ));
        assert!(matches!(
            LaunchpadError::from_status(StatusCode::FORBIDDEN, "no"),
            LaunchpadError::Forbidden(ref b) if b == "no"
        ));
        assert!(matches!(
            LaunchpadError::from_status(StatusCode::NOT_FOUND, "Version not found"),
            LaunchpadError::NotFound(ref b) if b == "Version not found"
        ));
        assert!(matches!(
            LaunchpadError::from_status(StatusCode::TOO_MANY_REQUESTS, ""),
            LaunchpadError::Throttled
        ));
        assert!(matches!(
            LaunchpadError::from_status(StatusCode::BAD_GATEWAY, "down"),
            LaunchpadError::ServerError(_)
        ));
        assert!(matches!(
            LaunchpadError::from_status(StatusCode::IM_A_TEAPOT, "tea"),
            LaunchpadError::UnexpectedResponse(ref m) if m.starts_with("HTTP 418")
        ));
    }

    #[test]
    fn test_error_messages_name_launchpad() {
        let err = LaunchpadError::UnsupportedVersion("9.9".to_string());
        assert_eq!(err.to_string(), "Unsupported Launchpad API version: \"9.9\"");
        assert_eq!(
            LaunchpadError::AnonymousAccessRejected.to_string(),
            "Launchpad rejected the anonymous OAuth credentials"
        );
    }

    #[test]
    fn test_excerpt() {
        let short = "x".repeat(MAX_ERROR_BODY_LENGTH);
        assert_eq!(LaunchpadError::excerpt(&short), short);

        let long = "y".repeat(MAX_ERROR_BODY_LENGTH + 20);
        let excerpt = LaunchpadError::excerpt(&long);
        assert!(excerpt.starts_with(&"y".repeat(MAX_ERROR_BODY_LENGTH)));
        assert!(excerpt.ends_with("(520 bytes total)"));

        // Multi-byte characters straddling the limit must not panic
        let wide = "é".repeat(MAX_ERROR_BODY_LENGTH);
        assert!(LaunchpadError::excerpt(&wide).contains("bytes total"));
    }
}
