//! Local caching of Launchpad API documents.
//!
//! This module provides the `CacheManager` used by the API client to keep
//! the service-root document (and anything else it fetches) on disk between
//! runs. Entries carry their `ETag` and `Cache-Control: max-age` so the
//! client can skip the request entirely or revalidate it cheaply.

pub mod manager;

pub use manager::{CacheManager, CachedData, CachedDocument};
