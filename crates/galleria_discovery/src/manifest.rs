//! Manifest documents enumerating a folder's images.
//!
//! Two formats are accepted:
//!
//! - plain text, one entry per line as `name [url]`, `#` starting a comment
//! - JSON, either an array or an object with an `images` array, whose items
//!   are bare names or `{ "name", "url", "size", "type" }` objects

use derive_getters::Getters;
use serde::Deserialize;

/// One image named by a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ManifestEntry {
    name: String,
    url: Option<String>,
    size_bytes: Option<u64>,
}

impl ManifestEntry {
    /// Entry with just a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: None,
            size_bytes: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonManifest {
    List(Vec<JsonEntry>),
    Wrapped { images: Vec<JsonEntry> },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonEntry {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        size: Option<u64>,
    },
}

/// Parse a manifest body, detecting its format.
///
/// Names are reduced to their final path segment. Entries with empty names
/// are dropped. Only JSON bodies can fail to parse.
///
/// ```
/// use galleria_discovery::parse_manifest;
///
/// let entries = parse_manifest("# gallery\ncat.jpg\n\ndog.png https://cdn.example/dog.png\n").unwrap();
/// assert_eq!(entries.len(), 2);
/// assert_eq!(entries[1].url().as_deref(), Some("https://cdn.example/dog.png"));
/// ```
pub fn parse_manifest(body: &str) -> Result<Vec<ManifestEntry>, String> {
    let trimmed = body.trim_start_matches('\u{feff}').trim();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        parse_json(trimmed)
    } else {
        Ok(parse_text(trimmed))
    }
}

fn parse_json(body: &str) -> Result<Vec<ManifestEntry>, String> {
    let manifest: JsonManifest = serde_json::from_str(body).map_err(|e| e.to_string())?;
    let items = match manifest {
        JsonManifest::List(items) => items,
        JsonManifest::Wrapped { images } => images,
    };

    Ok(items
        .into_iter()
        .filter_map(|item| {
            let (name, url, size_bytes) = match item {
                JsonEntry::Name(name) => (name, None, None),
                JsonEntry::Detailed { name, url, size } => (name, url, size),
            };
            let name = base_name(&name)?;
            Some(ManifestEntry {
                name,
                url: url.filter(|u| is_absolute_url(u)),
                size_bytes,
            })
        })
        .collect())
}

fn parse_text(body: &str) -> Vec<ManifestEntry> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let (name, url) = match line.rsplit_once(char::is_whitespace) {
                Some((name, url)) if is_absolute_url(url) => (name.trim(), Some(url.to_string())),
                _ => (line, None),
            };
            Some(ManifestEntry {
                name: base_name(name)?,
                url,
                size_bytes: None,
            })
        })
        .collect()
}

fn base_name(name: &str) -> Option<String> {
    let name = name.trim().rsplit('/').next().unwrap_or_default().trim();
    (!name.is_empty()).then(|| name.to_string())
}

fn is_absolute_url(value: &str) -> bool {
    value.starts_with("https://") || value.starts_with("http://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_skips_comments_and_blanks() {
        let entries = parse_manifest("# header\n\n  cat.jpg  \n# dog.png\nbird.gif\n").unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name().as_str()).collect();
        assert_eq!(names, vec!["cat.jpg", "bird.gif"]);
    }

    #[test]
    fn test_text_keeps_spaces_in_names() {
        let entries = parse_manifest("summer trip.jpg\n").unwrap();
        assert_eq!(entries[0].name(), "summer trip.jpg");
        assert!(entries[0].url().is_none());
    }

    #[test]
    fn test_json_array_of_names() {
        let entries = parse_manifest(r#"["a.png", "images/b.jpg", ""]"#).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name().as_str()).collect();
        assert_eq!(names, vec!["a.png", "b.jpg"]);
    }

    #[test]
    fn test_json_objects() {
        let body = r#"{"images": [{"name": "a.png", "size": 12, "type": "image/png"},
                                   {"name": "b.jpg", "url": "https://cdn.example/b.jpg"}]}"#;
        let entries = parse_manifest(body).unwrap();
        assert_eq!(*entries[0].size_bytes(), Some(12));
        assert_eq!(entries[1].url().as_deref(), Some("https://cdn.example/b.jpg"));
    }

    #[test]
    fn test_json_malformed() {
        assert!(parse_manifest("[\"a.png\",").is_err());
    }
}
