//! Galleria - image galleries from remote folders or local uploads
//!
//! Galleria assembles a gallery of images in one of two ways:
//!
//! - **Remote discovery**: find the images published in a repository folder,
//!   its raw-content host and its static-pages mirror, even when no listing
//!   API answers.
//! - **Local store**: ingest uploaded files into a deduplicated, quota-aware
//!   collection that survives restarts and repairs itself when corrupted.
//!
//! Either way a view receives the same thing: a sorted sequence of
//! [`ImageRecord`]s.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use galleria::{Gallery, GalleriaConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GalleriaConfig::load()?;
//!     let gallery = Gallery::from_config(&config).await?;
//!
//!     for record in gallery.snapshot().await? {
//!         println!("{} ({})", record.name(), record.display_source());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `galleria-error` - Error types
//! - `galleria-core` - Image records, naming rules and sort order
//! - `galleria-cache` - Discovery snapshot cache
//! - `galleria-discovery` - Remote discovery strategy chain
//! - `galleria-store` - Durable local collection and backups
//!
//! This crate (`galleria`) re-exports everything for convenience and adds
//! configuration, telemetry and the command-line front end.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod gallery;
mod telemetry;
pub mod view;

pub use config::{GalleriaConfig, GallerySettings, SourceSettings, StorageSettings};
pub use gallery::{Gallery, GalleryMode, discovery_engine, open_local_store};
pub use telemetry::init_telemetry;

// Re-export error types
pub use galleria_error::{
    ConfigError, DiscoveryError, DiscoveryErrorKind, GalleriaError, GalleriaErrorKind,
    GalleriaResult, HttpError, IngestError, IngestErrorKind, JsonError, StorageError,
    StorageErrorKind,
};

// Re-export core types
pub use galleria_core::{
    ImageOrigin, ImageRecord, SourceCoordinates, StrategyKind, format_size, is_sorted_descending,
    normalize_key, sort_records,
};

// Re-export cache
pub use galleria_cache::{DiscoveryCache, DiscoveryCacheConfig};

// Re-export discovery
pub use galleria_discovery::{
    DiscoveryConfig, ExistenceProbe, HttpClient, NameGenerator, RemoteDiscoveryEngine,
    RemoteFetcher, Revalidation, Snapshot, SnapshotSource,
};

// Re-export local store
pub use galleria_store::{
    BackupDocument, BackupKind, DiskFile, FileSystemStorage, HealthStatus, InMemoryFile,
    IngestOutcome, LocalStore, LocalStoreConfig, MemoryStorage, SnapshotStorage, StorageHealth,
    UploadedFile, backup_file_name,
};
