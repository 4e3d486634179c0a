//! Anonymous authentication and the session handle it produces.
//!
//! This module provides:
//! - `AnonymousCredentials`: builds the OAuth header for unauthenticated access
//! - `Session`: the handle returned by a successful anonymous login

pub mod credentials;
pub mod session;

pub use credentials::AnonymousCredentials;
pub use session::{ServiceRootDocument, Session};
