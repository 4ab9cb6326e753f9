//! Ingestion error types.

/// Reasons a file is refused by the local store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum IngestErrorKind {
    /// The file exceeds the per-file size ceiling
    #[display("{} is too large: {} bytes (limit {} bytes)", name, size_bytes, limit)]
    TooLarge {
        /// Declared file name
        name: String,
        /// Declared file size
        size_bytes: u64,
        /// Ceiling in effect
        limit: u64,
    },
    /// The declared type or extension is not an allowed image type
    #[display("{} has unsupported type '{}'", name, mime_type)]
    UnsupportedType {
        /// Declared file name
        name: String,
        /// Declared MIME type (may be empty)
        mime_type: String,
    },
    /// The file name is empty
    #[display("File name is empty")]
    EmptyName,
    /// The file contents could not be read
    #[display("Failed to read {}: {}", name, reason)]
    Read {
        /// Declared file name
        name: String,
        /// Underlying failure
        reason: String,
    },
}

/// Ingestion error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Ingest Error: {} at line {} in {}", kind, line, file)]
pub struct IngestError {
    /// The kind of error that occurred
    pub kind: IngestErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl IngestError {
    /// Create a new ingest error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: IngestErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
