//! Top-level error wrapper types.

use crate::{ConfigError, DiscoveryError, HttpError, IngestError, JsonError, StorageError};

/// Every error condition a Galleria operation can surface.
///
/// # Examples
///
/// ```
/// use galleria_error::{GalleriaError, HttpError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: GalleriaError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, Clone, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum GalleriaErrorKind {
    /// HTTP error
    #[from(HttpError)]
    Http(HttpError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Durable storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// File rejected at ingestion time
    #[from(IngestError)]
    Ingest(IngestError),
    /// Remote discovery error
    #[from(DiscoveryError)]
    Discovery(DiscoveryError),
}

/// Galleria error with kind discrimination.
///
/// # Examples
///
/// ```
/// use galleria_error::{ConfigError, GalleriaResult};
///
/// fn might_fail() -> GalleriaResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Galleria Error: {}", _0)]
pub struct GalleriaError(Box<GalleriaErrorKind>);

impl GalleriaError {
    /// Create a new error from a kind.
    pub fn new(kind: GalleriaErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &GalleriaErrorKind {
        &self.0
    }

    /// The storage error kind, if this is a storage error.
    pub fn storage_kind(&self) -> Option<&crate::StorageErrorKind> {
        match self.kind() {
            GalleriaErrorKind::Storage(e) => Some(&e.kind),
            _ => None,
        }
    }

    /// The ingest error kind, if this is an ingestion rejection.
    pub fn ingest_kind(&self) -> Option<&crate::IngestErrorKind> {
        match self.kind() {
            GalleriaErrorKind::Ingest(e) => Some(&e.kind),
            _ => None,
        }
    }

    /// The discovery error kind, if this is a discovery error.
    pub fn discovery_kind(&self) -> Option<&crate::DiscoveryErrorKind> {
        match self.kind() {
            GalleriaErrorKind::Discovery(e) => Some(&e.kind),
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to GalleriaErrorKind
impl<T> From<T> for GalleriaError
where
    T: Into<GalleriaErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Galleria operations.
///
/// # Examples
///
/// ```
/// use galleria_error::{GalleriaResult, HttpError};
///
/// fn fetch_data() -> GalleriaResult<String> {
///     Err(HttpError::new("404 Not Found"))?
/// }
/// ```
pub type GalleriaResult<T> = std::result::Result<T, GalleriaError>;
