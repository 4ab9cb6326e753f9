//! Tests for image records, ordering and coordinates.

use galleria_core::{
    ImageOrigin, ImageRecord, SourceCoordinates, StrategyKind, is_sorted_descending,
    sort_records,
};

fn remote(name: &str) -> ImageRecord {
    ImageRecord::remote(
        format!("images/{}", name),
        name,
        format!("https://raw.example.com/images/{}", name),
        None,
        None,
        None,
        StrategyKind::BruteProbe,
    )
}

#[test]
fn test_local_record_derives_key_and_extension() {
    let record = ImageRecord::local("Photo.JPG", "image/jpeg", "data:image/jpeg;base64,AA==", 1);

    assert_eq!(record.key(), "photo.jpg");
    assert_eq!(record.name(), "Photo.JPG");
    assert_eq!(record.extension(), "jpg");
    assert_eq!(record.mime_type(), Some("image/jpeg"));
    assert_eq!(record.display_source(), "data:image/jpeg;base64,AA==");
    assert!(record.fallback_sources().is_empty());
    assert_eq!(record.strategy(), None);
}

#[test]
fn test_remote_record_display_and_fallbacks() {
    let record = ImageRecord::remote(
        "abc123",
        "cat.png",
        "https://api.example.com/download/cat.png",
        Some("https://raw.example.com/cat.png".to_string()),
        Some("https://pages.example.com/cat.png".to_string()),
        Some(2048),
        StrategyKind::Listing,
    );

    assert_eq!(record.key(), "abc123");
    assert_eq!(record.dedup_key(), "cat.png");
    assert_eq!(record.display_source(), "https://api.example.com/download/cat.png");
    assert_eq!(
        record.fallback_sources(),
        vec!["https://raw.example.com/cat.png", "https://pages.example.com/cat.png"]
    );
    assert_eq!(record.payload(), None);
    assert_eq!(record.strategy(), Some(StrategyKind::Listing));
    assert_eq!(record.size_bytes(), &Some(2048));
}

#[test]
fn test_fallbacks_skip_primary_duplicate() {
    let record = ImageRecord::remote(
        "images/a.png",
        "a.png",
        "https://raw.example.com/a.png",
        Some("https://raw.example.com/a.png".to_string()),
        None,
        None,
        StrategyKind::Manifest,
    );

    assert!(record.fallback_sources().is_empty());
}

#[test]
fn test_origin_serializes_as_tagged_variant() {
    let record = remote("dog.gif");
    let json = serde_json::to_value(&record).unwrap();

    assert_eq!(json["origin"]["kind"], "remote");
    assert_eq!(json["origin"]["strategy"], "brute-probe");
    assert!(json.get("sizeBytes").is_none());

    let back: ImageRecord = serde_json::from_value(json).unwrap();
    assert!(matches!(back.origin(), ImageOrigin::Remote { .. }));
}

#[test]
fn test_strategy_display_names() {
    assert_eq!(StrategyKind::Listing.to_string(), "listing");
    assert_eq!(StrategyKind::Manifest.to_string(), "manifest");
    assert_eq!(StrategyKind::EndpointProbe.to_string(), "endpoint-probe");
    assert_eq!(StrategyKind::BruteProbe.to_string(), "brute-probe");
    assert!(StrategyKind::Listing.is_authoritative());
    assert!(!StrategyKind::Manifest.is_authoritative());
}

#[test]
fn test_sort_is_reverse_alphabetical_and_case_insensitive() {
    let mut records: Vec<ImageRecord> = ["apple.png", "Zebra.jpg", "mango.gif", "Banana.webp"]
        .into_iter()
        .map(remote)
        .collect();

    sort_records(&mut records);

    let names: Vec<&str> = records.iter().map(|r| r.name().as_str()).collect();
    assert_eq!(names, vec!["Zebra.jpg", "mango.gif", "Banana.webp", "apple.png"]);
    assert!(is_sorted_descending(&records));
}

#[test]
fn test_sorted_check_detects_ascending() {
    let records: Vec<ImageRecord> = ["a.png", "b.png"].into_iter().map(remote).collect();
    assert!(!is_sorted_descending(&records));
}

#[test]
fn test_coordinates_urls() {
    let coords = SourceCoordinates::builder()
        .owner("Octo")
        .repo("gallery")
        .branch("trunk")
        .folder("/assets/pics/")
        .build()
        .unwrap();

    assert_eq!(
        coords.listing_url("https://api.github.com/"),
        "https://api.github.com/repos/Octo/gallery/contents/assets/pics"
    );
    assert_eq!(
        coords.raw_url("https://raw.githubusercontent.com", "a.png"),
        "https://raw.githubusercontent.com/Octo/gallery/trunk/assets/pics/a.png"
    );
    assert_eq!(
        coords.pages_url("a.png"),
        "https://octo.github.io/gallery/assets/pics/a.png"
    );
    assert_eq!(
        coords.blob_raw_url("https://github.com", "a.png"),
        "https://github.com/Octo/gallery/raw/trunk/assets/pics/a.png"
    );
    assert_eq!(coords.to_string(), "Octo/gallery@trunk:assets/pics");
}

#[test]
fn test_coordinates_custom_pages_root() {
    let coords = SourceCoordinates::builder()
        .owner("octo")
        .repo("gallery")
        .pages_root(Some("https://mirror.example.com/site".to_string()))
        .build()
        .unwrap();

    assert_eq!(coords.pages_base(), "https://mirror.example.com/site/");
    assert_eq!(
        coords.pages_url("x.jpg"),
        "https://mirror.example.com/site/images/x.jpg"
    );
}

#[test]
fn test_coordinates_reject_missing_or_nested_owner() {
    assert!(SourceCoordinates::builder().repo("gallery").build().is_err());
    assert!(
        SourceCoordinates::builder()
            .owner("a/b")
            .repo("gallery")
            .build()
            .is_err()
    );
}

fn in_folder(folder: &str) -> SourceCoordinates {
    SourceCoordinates::builder()
        .owner("octo")
        .repo("gallery")
        .folder(folder)
        .build()
        .unwrap()
}

#[test]
fn test_coordinates_folder_slashes_name_the_same_source() {
    use std::collections::HashSet;

    let plain = in_folder("images");
    let trailing = in_folder("images/");
    let leading = in_folder("/images");

    assert_eq!(plain, trailing);
    assert_eq!(plain, leading);
    assert_eq!(trailing.folder(), "images");

    let keys: HashSet<_> = [plain, trailing, leading].into_iter().collect();
    assert_eq!(keys.len(), 1);
}

#[test]
fn test_coordinates_folder_is_normalized_when_deserialized() {
    let coords: SourceCoordinates =
        serde_json::from_str(r#"{"owner": "octo", "repo": "gallery", "folder": "/images/"}"#)
            .unwrap();

    assert_eq!(coords, in_folder("images"));
    assert_eq!(
        coords.listing_url("https://api.test"),
        "https://api.test/repos/octo/gallery/contents/images"
    );
}
