//! Core library for lpboot.
//!
//! Provides the anonymous Launchpad login used by snapcpp automation:
//! - `bootstrap`: derives the login arguments and calls a `LoginProvider`
//! - `config`: home directory and cache path resolution
//! - `api`, `auth`, `cache`, `service_root`: the Launchpad web service client

pub mod api;
pub mod auth;
pub mod bootstrap;
pub mod cache;
pub mod config;
pub mod service_root;

pub use api::{LaunchpadClient, LaunchpadError};
pub use auth::Session;
pub use bootstrap::{bootstrap_session, LoginProvider, LoginRequest};
pub use config::Config;
