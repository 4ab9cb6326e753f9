//! File naming rules: dedup keys, extensions and type allowlists.

/// Extensions recognized as images in a remote folder.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp", "svg"];

/// Extensions accepted for upload into the local store.
pub const UPLOAD_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg", "bmp"];

/// MIME types accepted for upload into the local store.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/svg+xml",
    "image/bmp",
];

/// Normalize a file name into its dedup key.
///
/// Keys are trimmed and lower-cased, so `Photo.JPG` and `photo.jpg` collide.
///
/// # Examples
///
/// ```
/// use galleria_core::normalize_key;
///
/// assert_eq!(normalize_key("  Cat.JPG "), "cat.jpg");
/// ```
pub fn normalize_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Lower-cased suffix after the last dot, or an empty string when there is none.
///
/// ```
/// use galleria_core::extension_of;
///
/// assert_eq!(extension_of("holiday.Final.PNG"), "png");
/// assert_eq!(extension_of("README"), "");
/// ```
pub fn extension_of(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() || !ext.is_empty() => ext.to_lowercase(),
        _ => String::new(),
    }
}

/// Whether the name carries one of the remote image extensions.
pub fn is_image_file(name: &str) -> bool {
    let ext = extension_of(name);
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}

/// Whether the extension is accepted for upload.
pub fn is_upload_extension(ext: &str) -> bool {
    UPLOAD_EXTENSIONS.contains(&ext.to_lowercase().as_str())
}

/// MIME type implied by an image extension.
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_edge_cases() {
        assert_eq!(extension_of("archive.tar.gz"), "gz");
        assert_eq!(extension_of("trailing."), "");
        assert_eq!(extension_of(".hidden"), "hidden");
        assert_eq!(extension_of("noext"), "");
    }

    #[test]
    fn test_image_detection_is_case_insensitive() {
        assert!(is_image_file("SUNSET.JPEG"));
        assert!(is_image_file("logo.svg"));
        assert!(!is_image_file("notes.txt"));
        assert!(!is_image_file("jpg"));
    }

    #[test]
    fn test_mime_lookup() {
        assert_eq!(mime_for_extension("JPG"), Some("image/jpeg"));
        assert_eq!(mime_for_extension("svg"), Some("image/svg+xml"));
        assert_eq!(mime_for_extension("tiff"), None);
    }
}
