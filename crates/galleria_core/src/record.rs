//! The canonical image record.

use crate::naming::{extension_of, normalize_key};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Prefix every embedded local payload must start with.
pub const IMAGE_PAYLOAD_MARKER: &str = "data:image/";

/// Which discovery strategy produced a remote record.
///
/// Used for diagnostics only; never part of a record's identity.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Authoritative content-listing endpoint
    #[display("listing")]
    Listing,
    /// Curated manifest at the origin
    #[display("manifest")]
    Manifest,
    /// Curated names probed against secondary endpoints
    #[display("endpoint-probe")]
    EndpointProbe,
    /// Generated names probed one by one
    #[display("brute-probe")]
    BruteProbe,
}

impl StrategyKind {
    /// Whether an empty result from this strategy proves the folder is empty.
    pub fn is_authoritative(&self) -> bool {
        matches!(self, StrategyKind::Listing)
    }
}

/// Where a record's bytes live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ImageOrigin {
    /// Uploaded by the user; the image travels inside the record.
    Local {
        /// `data:<mime>;base64,<...>` payload
        payload: String,
        /// Declared MIME type
        mime_type: String,
    },
    /// Published at a remote host; only URLs are kept.
    Remote {
        /// Primary URL used for display
        url: String,
        /// Raw-content fallback URL
        #[serde(default, skip_serializing_if = "Option::is_none")]
        raw_url: Option<String>,
        /// Static-pages mirror URL
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pages_url: Option<String>,
        /// Strategy that found the file
        strategy: StrategyKind,
    },
}

/// One image in a gallery snapshot.
///
/// # Examples
///
/// ```
/// use galleria_core::ImageRecord;
///
/// let record = ImageRecord::local("Cat.JPG", "image/jpeg", "data:image/jpeg;base64,AAAA", 3);
/// assert_eq!(record.key(), "cat.jpg");
/// assert_eq!(record.extension(), "jpg");
/// assert!(record.is_local());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    /// Stable identity within a snapshot
    key: String,
    /// Original file name
    name: String,
    /// Lower-cased extension of `name`
    extension: String,
    /// Local payload or remote URLs
    origin: ImageOrigin,
    /// Size when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    size_bytes: Option<u64>,
    /// When the record was ingested or discovered
    created_at: DateTime<Utc>,
}

impl ImageRecord {
    /// Build a local record keyed by its normalized name.
    pub fn local(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        payload: impl Into<String>,
        size_bytes: u64,
    ) -> Self {
        Self::local_at(name, mime_type, payload, size_bytes, Utc::now())
    }

    /// Build a local record with an explicit creation time (used when loading).
    pub fn local_at(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        payload: impl Into<String>,
        size_bytes: u64,
        created_at: DateTime<Utc>,
    ) -> Self {
        let name = name.into();
        Self {
            key: normalize_key(&name),
            extension: extension_of(&name),
            name,
            origin: ImageOrigin::Local {
                payload: payload.into(),
                mime_type: mime_type.into(),
            },
            size_bytes: Some(size_bytes),
            created_at,
        }
    }

    /// Build a remote record.
    ///
    /// `key` is the content hash when the host reported one, otherwise the
    /// file's repository path.
    pub fn remote(
        key: impl Into<String>,
        name: impl Into<String>,
        url: impl Into<String>,
        raw_url: Option<String>,
        pages_url: Option<String>,
        size_bytes: Option<u64>,
        strategy: StrategyKind,
    ) -> Self {
        let name = name.into();
        Self {
            key: key.into(),
            extension: extension_of(&name),
            name,
            origin: ImageOrigin::Remote {
                url: url.into(),
                raw_url,
                pages_url,
                strategy,
            },
            size_bytes,
            created_at: Utc::now(),
        }
    }

    /// Normalized name used for dedup regardless of origin.
    pub fn dedup_key(&self) -> String {
        normalize_key(&self.name)
    }

    /// Whether this record was uploaded locally.
    pub fn is_local(&self) -> bool {
        matches!(self.origin, ImageOrigin::Local { .. })
    }

    /// The one source a view should render: the payload or the primary URL.
    pub fn display_source(&self) -> &str {
        match &self.origin {
            ImageOrigin::Local { payload, .. } => payload,
            ImageOrigin::Remote { url, .. } => url,
        }
    }

    /// Alternate URLs to try if the display source fails to load.
    pub fn fallback_sources(&self) -> Vec<&str> {
        match &self.origin {
            ImageOrigin::Local { .. } => Vec::new(),
            ImageOrigin::Remote {
                url,
                raw_url,
                pages_url,
                ..
            } => [raw_url, pages_url]
                .into_iter()
                .flatten()
                .map(String::as_str)
                .filter(|candidate| *candidate != url.as_str())
                .collect(),
        }
    }

    /// Embedded payload, for local records.
    pub fn payload(&self) -> Option<&str> {
        match &self.origin {
            ImageOrigin::Local { payload, .. } => Some(payload),
            ImageOrigin::Remote { .. } => None,
        }
    }

    /// MIME type, for local records.
    pub fn mime_type(&self) -> Option<&str> {
        match &self.origin {
            ImageOrigin::Local { mime_type, .. } => Some(mime_type),
            ImageOrigin::Remote { .. } => None,
        }
    }

    /// Discovery strategy, for remote records.
    pub fn strategy(&self) -> Option<StrategyKind> {
        match &self.origin {
            ImageOrigin::Local { .. } => None,
            ImageOrigin::Remote { strategy, .. } => Some(*strategy),
        }
    }
}
