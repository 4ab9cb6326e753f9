//! Discovery result caching with TTL support.
//!
//! Remote discovery can take minutes when it falls through to probing. This
//! crate keeps the last snapshot per source so a view can show it immediately
//! while a fresh scan runs.

#![warn(missing_docs)]

mod cache;

pub use cache::{CacheEntry, DiscoveryCache, DiscoveryCacheConfig, DiscoveryCacheConfigBuilder};
