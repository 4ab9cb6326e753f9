//! Durable local image collection for Galleria.
//!
//! A [`LocalStore`] holds user-supplied images as self-contained `data:` URL
//! payloads and persists the whole collection under one key of a
//! [`SnapshotStorage`] backend.
//!
//! # Features
//!
//! - **Validated ingestion**: size and type are checked before contents are read
//! - **Case-insensitive dedup**: re-adding `Cat.JPG` replaces `cat.jpg`
//! - **Self-healing load**: a corrupt snapshot resets to an empty gallery
//! - **Quota awareness**: failed writes leave the in-memory collection intact
//!
//! # Example
//!
//! ```rust
//! use galleria_store::{InMemoryFile, LocalStore, LocalStoreConfig, MemoryStorage};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = LocalStore::open(MemoryStorage::new(), LocalStoreConfig::default()).await?;
//!
//! let file = InMemoryFile::new("cat.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF]);
//! let record = store.ingest(&file).await?;
//! store.persist().await?;
//!
//! assert_eq!(record.key(), "cat.jpg");
//! assert_eq!(store.len(), 1);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod backup;
mod config;
mod filesystem;
mod health;
mod memory;
mod storage;
mod store;
mod upload;

pub use backup::{BackupDocument, BackupImage, BackupKind, BackupMetadata, backup_file_name};
pub use config::{LocalStoreConfig, LocalStoreConfigBuilder};
pub use filesystem::FileSystemStorage;
pub use galleria_error::{IngestError, IngestErrorKind, StorageError, StorageErrorKind};
pub use health::{HealthStatus, StorageHealth};
pub use memory::MemoryStorage;
pub use storage::SnapshotStorage;
pub use store::{IngestOutcome, LocalStore};
pub use upload::{DiskFile, InMemoryFile, UploadedFile};
