//! Storage error types.

/// Kinds of storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Failed to create storage directory
    #[display("Failed to create storage directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write file
    #[display("Failed to write file: {}", _0)]
    FileWrite(String),
    /// Failed to read file
    #[display("Failed to read file: {}", _0)]
    FileRead(String),
    /// The serialized snapshot does not fit the storage quota
    #[display("Storage quota exceeded: {} bytes required, {} bytes available", required, budget)]
    QuotaExceeded {
        /// Bytes the write needed
        required: u64,
        /// Bytes the backend allows
        budget: u64,
    },
    /// No record with the given key exists in the snapshot
    #[display("Record not found: {}", _0)]
    RecordNotFound(String),
    /// Invalid storage key
    #[display("Invalid storage key: {}", _0)]
    InvalidKey(String),
    /// Storage backend is unavailable
    #[display("Storage unavailable: {}", _0)]
    Unavailable(String),
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use galleria_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::RecordNotFound("cat.jpg".to_string()));
/// assert!(format!("{}", err).contains("not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether this error is a quota failure the caller can remedy by freeing space.
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self.kind, StorageErrorKind::QuotaExceeded { .. })
    }
}
