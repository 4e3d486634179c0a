//! lpboot - open an anonymous Launchpad API session for snapcpp.
//!
//! Resolves `~/.launchpadlib/cache/`, logs in anonymously against the
//! production service root with API version `devel`, and exits. Any
//! failure is reported on stderr with a non-zero exit status.

use std::io;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lpboot_core::{bootstrap_session, Config, LaunchpadClient, LoginProvider};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Log in once and drop the session; nothing is printed on success.
async fn run<P>(provider: &P, config: &Config) -> Result<()>
where
    P: LoginProvider,
    P::Error: Into<anyhow::Error>,
{
    let _session = bootstrap_session(provider, config)
        .await
        .map_err(Into::<anyhow::Error>::into)?;
    info!("Launchpad session ready");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let config = Config::load()?;
    let client = LaunchpadClient::new()?;
    run(&client, &config).await
}
