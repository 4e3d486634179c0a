//! REST API client module for the Launchpad web service.
//!
//! This module provides the `LaunchpadClient` which performs the anonymous
//! login handshake. The handshake fetches the versioned service-root
//! document, reusing the on-disk cache when possible.

pub mod client;
pub mod error;

pub use client::LaunchpadClient;
pub use error::LaunchpadError;
