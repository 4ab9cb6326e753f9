//! Export and import documents for the local gallery.

use crate::InMemoryFile;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, NaiveDate, Utc};
use derive_getters::Getters;
use galleria_core::ImageRecord;
use galleria_error::{GalleriaResult, JsonError};
use serde::{Deserialize, Serialize};

const FORMAT_VERSION: &str = "1.0";
const GALLERY_NAME: &str = "Local Image Gallery";

/// Which export flavor to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum BackupKind {
    /// Every image with its payload
    Full,
    /// Names and metadata only
    Compact,
}

/// Suggested file name for an export made on `date`.
///
/// ```
/// use chrono::NaiveDate;
/// use galleria_store::{BackupKind, backup_file_name};
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
/// assert_eq!(backup_file_name(BackupKind::Full, date), "gallery-full-backup-2024-03-09.json");
/// assert_eq!(backup_file_name(BackupKind::Compact, date), "gallery-links-2024-03-09.json");
/// ```
pub fn backup_file_name(kind: BackupKind, date: NaiveDate) -> String {
    let stem = match kind {
        BackupKind::Full => "gallery-full-backup",
        BackupKind::Compact => "gallery-links",
    };
    format!("{}-{}.json", stem, date.format("%Y-%m-%d"))
}

/// One exported image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct BackupImage {
    name: String,
    #[serde(default, alias = "sizeBytes")]
    size: u64,
    #[serde(rename = "type", default, alias = "mimeType")]
    mime_type: String,
    #[serde(default, alias = "createdAt")]
    date: Option<DateTime<Utc>>,
    #[serde(default, alias = "data", skip_serializing_if = "Option::is_none")]
    payload: Option<String>,
}

impl BackupImage {
    fn from_record(record: &ImageRecord, with_payload: bool) -> Self {
        Self {
            name: record.name().clone(),
            size: record.size_bytes().unwrap_or_default(),
            mime_type: record.mime_type().unwrap_or_default().to_string(),
            date: Some(*record.created_at()),
            payload: with_payload
                .then(|| record.payload().map(str::to_string))
                .flatten(),
        }
    }

    /// Decode the payload back into file contents.
    ///
    /// `None` for compact entries and payloads that are not base64 data URLs.
    pub fn decode(&self) -> Option<Vec<u8>> {
        let payload = self.payload.as_deref()?;
        let (header, data) = payload.split_once(',')?;
        if !header.starts_with("data:") || !header.ends_with(";base64") {
            return None;
        }
        STANDARD.decode(data.trim()).ok()
    }

    /// MIME type, falling back to the one in the payload header.
    fn effective_mime(&self) -> String {
        if !self.mime_type.is_empty() {
            return self.mime_type.clone();
        }
        self.payload
            .as_deref()
            .and_then(|p| p.strip_prefix("data:"))
            .and_then(|p| p.split_once(';'))
            .map(|(mime, _)| mime.to_string())
            .unwrap_or_default()
    }
}

/// Provenance block of a full export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct BackupMetadata {
    gallery: String,
    created: DateTime<Utc>,
}

/// A gallery export, full or compact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    version: String,
    export_date: DateTime<Utc>,
    images: Vec<BackupImage>,
    total_images: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<BackupMetadata>,
}

impl BackupDocument {
    /// Export every record with its payload.
    pub fn full(records: &[ImageRecord]) -> Self {
        let now = Utc::now();
        Self {
            version: FORMAT_VERSION.to_string(),
            export_date: now,
            images: records
                .iter()
                .map(|r| BackupImage::from_record(r, true))
                .collect(),
            total_images: records.len(),
            metadata: Some(BackupMetadata {
                gallery: GALLERY_NAME.to_string(),
                created: now,
            }),
        }
    }

    /// Export names, sizes, types and dates only.
    pub fn compact(records: &[ImageRecord]) -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            export_date: Utc::now(),
            images: records
                .iter()
                .map(|r| BackupImage::from_record(r, false))
                .collect(),
            total_images: records.len(),
            metadata: None,
        }
    }

    /// Parse either export flavor.
    pub fn from_json(text: &str) -> GalleriaResult<Self> {
        Ok(serde_json::from_str(text)
            .map_err(|e| JsonError::new(format!("Invalid backup document: {}", e)))?)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> GalleriaResult<String> {
        Ok(serde_json::to_string_pretty(self)
            .map_err(|e| JsonError::new(format!("Failed to serialize backup: {}", e)))?)
    }

    /// Which flavor this document is.
    pub fn kind(&self) -> BackupKind {
        if self.images.iter().any(|image| image.payload.is_some()) {
            BackupKind::Full
        } else {
            BackupKind::Compact
        }
    }

    /// Entries that carry a decodable payload, as files ready for ingestion.
    pub fn import_files(&self) -> Vec<InMemoryFile> {
        self.images
            .iter()
            .filter_map(|image| {
                let bytes = image.decode()?;
                Some(InMemoryFile::new(image.name.clone(), image.effective_mime(), bytes))
            })
            .collect()
    }
}
