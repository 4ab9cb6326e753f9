//! Remote discovery error types.

/// Kinds of discovery errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum DiscoveryErrorKind {
    /// A strategy could not reach the remote host. Strategy-local; triggers fallback.
    #[display("Network unavailable: {}", _0)]
    NetworkUnavailable(String),
    /// Every strategy came back empty.
    ///
    /// `confirmed_empty` is only true when the authoritative listing answered
    /// and the folder holds no images. Otherwise nothing could be confirmed.
    #[display("No images found (confirmed empty: {})", confirmed_empty)]
    NotFound {
        /// Whether the listing endpoint confirmed an empty folder
        confirmed_empty: bool,
    },
    /// A remote document could not be understood
    #[display("Malformed response from {}: {}", url, reason)]
    Malformed {
        /// Source of the document
        url: String,
        /// Parse failure
        reason: String,
    },
    /// The source coordinates are unusable
    #[display("Invalid coordinates: {}", _0)]
    InvalidCoordinates(String),
    /// A background discovery task stopped before finishing
    #[display("Discovery interrupted: {}", _0)]
    Interrupted(String),
}

/// Discovery error with location tracking.
///
/// # Examples
///
/// ```
/// use galleria_error::{DiscoveryError, DiscoveryErrorKind};
///
/// let err = DiscoveryError::new(DiscoveryErrorKind::NotFound { confirmed_empty: false });
/// assert!(err.is_not_found());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Discovery Error: {} at line {} in {}", kind, line, file)]
pub struct DiscoveryError {
    /// The kind of error that occurred
    pub kind: DiscoveryErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl DiscoveryError {
    /// Create a new discovery error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: DiscoveryErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether the strategy chain was exhausted.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, DiscoveryErrorKind::NotFound { .. })
    }

    /// Whether a network failure caused this error (worth retrying).
    pub fn is_transient(&self) -> bool {
        matches!(self.kind, DiscoveryErrorKind::NetworkUnavailable(_))
    }
}
