//! Session bootstrap.
//!
//! Computes the login arguments and hands them to a `LoginProvider`. The
//! provider owns everything else: cache directory creation, network
//! access and error reporting.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::api::LaunchpadClient;
use crate::auth::Session;
use crate::config::{cache_dir_for, Config};

/// Application name presented to Launchpad as the OAuth consumer
pub const CONSUMER_NAME: &str = "snapcpp";

/// Launchpad deployment to log in to
pub const SERVICE_ROOT: &str = "production";

/// Web service API version
pub const API_VERSION: &str = "devel";

/// The four arguments of an anonymous login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub consumer_name: String,
    pub service_root: String,
    pub cache_dir: PathBuf,
    pub version: String,
}

impl LoginRequest {
    pub fn for_home(home: impl Into<PathBuf>) -> Self {
        Self {
            consumer_name: CONSUMER_NAME.to_string(),
            service_root: SERVICE_ROOT.to_string(),
            cache_dir: cache_dir_for(home),
            version: API_VERSION.to_string(),
        }
    }
}

/// Something that can perform an anonymous login.
#[async_trait]
pub trait LoginProvider: Send + Sync {
    type Session: Send;
    type Error: Send;

    async fn login_anonymously(&self, request: &LoginRequest) -> Result<Self::Session, Self::Error>;
}

#[async_trait]
impl LoginProvider for LaunchpadClient {
    type Session = Session;
    type Error = anyhow::Error;

    async fn login_anonymously(&self, request: &LoginRequest) -> anyhow::Result<Session> {
        LaunchpadClient::login_anonymously(
            self,
            &request.consumer_name,
            &request.service_root,
            &request.cache_dir,
            &request.version,
        )
        .await
    }
}

/// Log in anonymously on behalf of the user described by `config`.
///
/// Errors from the provider are returned exactly as the provider produced
/// them.
pub async fn bootstrap_session<P: LoginProvider>(
    provider: &P,
    config: &Config,
) -> Result<P::Session, P::Error> {
    let request = LoginRequest::for_home(config.home_directory.clone());
    debug!(
        consumer = %request.consumer_name,
        service_root = %request.service_root,
        cache_dir = %request.cache_dir.display(),
        version = %request.version,
        "Bootstrapping Launchpad session"
    );
    provider.login_anonymously(&request).await
}
