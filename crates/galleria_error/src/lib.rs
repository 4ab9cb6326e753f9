//! Error types for the Galleria library.
//!
//! This crate provides the foundation error types used throughout the Galleria workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! Only exhaustion-level conditions are meant to reach a user:
//! [`DiscoveryErrorKind::NotFound`] and [`StorageErrorKind::QuotaExceeded`].
//! Everything else is absorbed and logged where it happens.
//!
//! # Examples
//!
//! ```
//! use galleria_error::{GalleriaResult, HttpError};
//!
//! fn fetch_listing() -> GalleriaResult<String> {
//!     Err(HttpError::new("Connection refused"))?
//! }
//!
//! match fetch_listing() {
//!     Ok(body) => println!("Got: {}", body),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod discovery;
mod error;
mod http;
mod ingest;
mod json;
mod storage;

pub use config::ConfigError;
pub use discovery::{DiscoveryError, DiscoveryErrorKind};
pub use error::{GalleriaError, GalleriaErrorKind, GalleriaResult};
pub use http::HttpError;
pub use ingest::{IngestError, IngestErrorKind};
pub use json::JsonError;
pub use storage::{StorageError, StorageErrorKind};
