//! Remote image discovery for Galleria.
//!
//! Static file hosts rarely offer a listing API that works every time, so
//! discovery walks a fixed chain of strategies, each less reliable than the
//! last, and stops at the first one that finds anything:
//!
//! 1. **Listing**: the host's contents API for the folder
//! 2. **Manifest**: a curated file enumerating the images
//! 3. **Endpoint probe**: a short list of common names against the pages mirror
//! 4. **Brute probe**: generated names against every known endpoint
//!
//! Probe and fetch failures are absorbed inside a strategy. Only an exhausted
//! chain surfaces, as [`DiscoveryErrorKind::NotFound`].
//!
//! # Example
//!
//! ```rust,no_run
//! use galleria_cache::DiscoveryCacheConfig;
//! use galleria_core::SourceCoordinates;
//! use galleria_discovery::{DiscoveryConfig, RemoteDiscoveryEngine};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = RemoteDiscoveryEngine::http(DiscoveryConfig::default(), DiscoveryCacheConfig::default())?;
//! let coords = SourceCoordinates::builder().owner("octo").repo("gallery").build()?;
//!
//! for record in engine.discover(&coords).await? {
//!     println!("{} -> {}", record.name(), record.display_source());
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod engine;
mod fetch;
mod manifest;
mod names;
mod probe;
pub mod strategies;

pub use config::{DiscoveryConfig, DiscoveryConfigBuilder};
pub use engine::{RemoteDiscoveryEngine, Revalidation, Snapshot, SnapshotSource};
pub use fetch::{HttpClient, RemoteFetcher, fetch_with_retry};
pub use galleria_error::{DiscoveryError, DiscoveryErrorKind};
pub use manifest::{ManifestEntry, parse_manifest};
pub use names::NameGenerator;
pub use probe::{ExistenceProbe, ThrottledProbe, probe_first, with_cache_buster};

/// Result type for discovery internals.
pub type DiscoveryResult<T> = std::result::Result<T, DiscoveryError>;
