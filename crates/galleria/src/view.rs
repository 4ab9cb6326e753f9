//! Text and JSON renderings of a snapshot.

use galleria_core::{ImageRecord, format_size};
use serde::Serialize;

/// Widest source shown before it is elided.
const SOURCE_WIDTH: usize = 60;

/// One rendered row: what a gallery card shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryEntry {
    /// Record identity
    pub key: String,
    /// Display name
    pub name: String,
    /// Lowercase extension
    pub extension: String,
    /// Size in bytes, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    /// Human-readable size
    pub size: String,
    /// URL or shortened payload
    pub source: String,
    /// Alternate URLs
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fallbacks: Vec<String>,
    /// Discovery strategy for remote images
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
}

impl From<&ImageRecord> for GalleryEntry {
    fn from(record: &ImageRecord) -> Self {
        Self {
            key: record.key().clone(),
            name: record.name().clone(),
            extension: record.extension().clone(),
            size_bytes: *record.size_bytes(),
            size: record
                .size_bytes()
                .map(format_size)
                .unwrap_or_else(|| "unknown".to_string()),
            source: short_source(record),
            fallbacks: record
                .fallback_sources()
                .into_iter()
                .map(str::to_string)
                .collect(),
            strategy: record.strategy().map(|s| s.to_string()),
        }
    }
}

/// The display source, with embedded payloads reduced to their header.
///
/// ```
/// use galleria::view::short_source;
/// use galleria_core::ImageRecord;
///
/// let record = ImageRecord::local("cat.jpg", "image/jpeg", "data:image/jpeg;base64,AAAA", 3);
/// assert_eq!(short_source(&record), "data:image/jpeg;base64,... (27 chars)");
/// ```
pub fn short_source(record: &ImageRecord) -> String {
    let source = record.display_source();
    if let Some(payload) = record.payload() {
        let header = payload.split_once(',').map(|(h, _)| h).unwrap_or(payload);
        return format!("{},... ({} chars)", header, payload.len());
    }
    if source.chars().count() > SOURCE_WIDTH {
        let head: String = source.chars().take(SOURCE_WIDTH - 3).collect();
        return format!("{}...", head);
    }
    source.to_string()
}

/// Rows for every record, in snapshot order.
pub fn entries(records: &[ImageRecord]) -> Vec<GalleryEntry> {
    records.iter().map(GalleryEntry::from).collect()
}

/// Human-readable listing with a heading and a summary line.
pub fn render_table(title: &str, records: &[ImageRecord]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} ({} images)\n", title, records.len()));
    out.push_str(&format!("{:-<100}\n", ""));
    for entry in entries(records) {
        out.push_str(&format!(
            "{:<32} {:<5} {:>10}  {}\n",
            entry.name, entry.extension, entry.size, entry.source
        ));
    }
    let known: u64 = records.iter().filter_map(|r| *r.size_bytes()).sum();
    out.push_str(&format!("{:-<100}\n", ""));
    out.push_str(&format!("Total: {}\n", format_size(known)));
    out
}

/// Pretty JSON array of rows.
pub fn render_json(records: &[ImageRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&entries(records))
}
