//! Tests for backup export and import.

use galleria_store::{
    BackupDocument, BackupKind, InMemoryFile, LocalStore, LocalStoreConfig, MemoryStorage,
};

async fn populated_store() -> LocalStore<MemoryStorage> {
    let mut store = LocalStore::new(MemoryStorage::new(), LocalStoreConfig::default());
    store
        .ingest(&InMemoryFile::new("cat.jpg", "image/jpeg", vec![1, 2, 3, 4]))
        .await
        .unwrap();
    store
        .ingest(&InMemoryFile::new("dog.png", "image/png", vec![9; 32]))
        .await
        .unwrap();
    store
}

#[tokio::test]
async fn test_full_backup_restores_gallery() {
    let store = populated_store().await;
    let json = BackupDocument::full(store.records()).to_json().unwrap();

    let document = BackupDocument::from_json(&json).unwrap();
    assert_eq!(document.kind(), BackupKind::Full);
    assert_eq!(*document.total_images(), 2);
    assert_eq!(document.version(), "1.0");
    assert_eq!(
        document.metadata().as_ref().map(|m| m.gallery().as_str()),
        Some("Local Image Gallery")
    );

    let mut restored = LocalStore::new(MemoryStorage::new(), LocalStoreConfig::default());
    let outcomes = restored.ingest_batch(&document.import_files()).await;

    assert!(outcomes.iter().all(|o| o.result.is_ok()));
    let payloads = |s: &LocalStore<MemoryStorage>| {
        s.records()
            .iter()
            .map(|r| (r.name().clone(), r.payload().map(str::to_string)))
            .collect::<Vec<_>>()
    };
    assert_eq!(payloads(&restored), payloads(&store));
}

#[tokio::test]
async fn test_compact_backup_has_no_payloads() {
    let store = populated_store().await;
    let document = BackupDocument::compact(store.records());

    let json = document.to_json().unwrap();
    assert!(!json.contains("base64"));
    assert!(json.contains("\"type\": \"image/png\""));
    assert!(json.contains("\"totalImages\": 2"));

    assert_eq!(document.kind(), BackupKind::Compact);
    assert!(document.metadata().is_none());
    assert!(document.import_files().is_empty());
}

#[test]
fn test_parses_legacy_full_export() {
    let json = r#"{
        "version": "1.0",
        "exportDate": "2024-05-01T10:00:00.000Z",
        "images": [
            {"name": "a.gif", "data": "data:image/gif;base64,R0lG", "size": 3, "type": ""},
            {"name": "b.png", "size": 10, "type": "image/png", "date": "2024-04-01T00:00:00Z"}
        ],
        "totalImages": 2,
        "metadata": {"gallery": "Local Image Gallery", "created": "2024-05-01T10:00:00.000Z"}
    }"#;

    let document = BackupDocument::from_json(json).unwrap();
    let files = document.import_files();

    assert_eq!(document.images().len(), 2);
    assert_eq!(files.len(), 1);
    assert_eq!(
        files[0],
        InMemoryFile::new("a.gif", "image/gif", b"GIF".to_vec())
    );
}

#[test]
fn test_rejects_non_backup_json() {
    let err = BackupDocument::from_json(r#"{"hello": "world"}"#).unwrap_err();
    assert!(err.to_string().contains("Invalid backup document"));
}
