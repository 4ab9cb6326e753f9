//! The local image collection.

use crate::{LocalStoreConfig, SnapshotStorage, StorageHealth, UploadedFile};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use galleria_core::{
    ALLOWED_MIME_TYPES, IMAGE_PAYLOAD_MARKER, ImageRecord, extension_of, is_upload_extension,
    mime_for_extension, normalize_key, sort_records,
};
use galleria_error::{
    GalleriaResult, IngestError, IngestErrorKind, JsonError, StorageError, StorageErrorKind,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

/// Durable layout of one record. Key and extension are derived on load.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRecord {
    name: String,
    #[serde(default, alias = "size")]
    size_bytes: u64,
    #[serde(default, alias = "type")]
    mime_type: String,
    #[serde(alias = "data")]
    payload: String,
    #[serde(default = "Utc::now", alias = "date")]
    created_at: DateTime<Utc>,
}

impl From<&ImageRecord> for StoredRecord {
    fn from(record: &ImageRecord) -> Self {
        Self {
            name: record.name().clone(),
            size_bytes: record.size_bytes().unwrap_or_default(),
            mime_type: record.mime_type().unwrap_or_default().to_string(),
            payload: record.payload().unwrap_or_default().to_string(),
            created_at: *record.created_at(),
        }
    }
}

impl StoredRecord {
    fn into_record(self) -> ImageRecord {
        let mime_type = if self.mime_type.is_empty() {
            mime_for_extension(&extension_of(&self.name))
                .unwrap_or_default()
                .to_string()
        } else {
            self.mime_type
        };
        ImageRecord::local_at(self.name, mime_type, self.payload, self.size_bytes, self.created_at)
    }
}

/// Result of ingesting one file of a batch.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    /// Declared name of the file
    pub name: String,
    /// The stored record, or why the file was refused
    pub result: GalleriaResult<ImageRecord>,
}

/// Durable, deduplicated collection of local images.
///
/// Records are unique by normalized name and always sorted in gallery order.
/// Mutations only touch memory until [`persist`](Self::persist) is called,
/// except `delete`, `clear` and `repair`, which persist on their own.
///
/// # Example
///
/// ```rust
/// use galleria_store::{InMemoryFile, LocalStore, LocalStoreConfig, MemoryStorage};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut store = LocalStore::new(MemoryStorage::new(), LocalStoreConfig::default());
/// store.ingest(&InMemoryFile::new("cat.jpg", "image/jpeg", vec![1, 2, 3])).await?;
/// store.ingest(&InMemoryFile::new("Cat.JPG", "image/jpeg", vec![4, 5])).await?;
///
/// assert_eq!(store.len(), 1);
/// assert_eq!(store.records()[0].name(), "Cat.JPG");
/// # Ok(())
/// # }
/// ```
pub struct LocalStore<S: SnapshotStorage> {
    storage: S,
    config: LocalStoreConfig,
    records: Vec<ImageRecord>,
}

impl<S: SnapshotStorage> LocalStore<S> {
    /// Empty store over `storage`. Call [`load`](Self::load) to read the durable snapshot.
    pub fn new(storage: S, config: LocalStoreConfig) -> Self {
        Self {
            storage,
            config,
            records: Vec::new(),
        }
    }

    /// Create a store and load its durable snapshot.
    pub async fn open(storage: S, config: LocalStoreConfig) -> GalleriaResult<Self> {
        let mut store = Self::new(storage, config);
        store.load().await?;
        Ok(store)
    }

    /// Replace the in-memory collection with the durable snapshot.
    ///
    /// An absent snapshot is an empty gallery. A snapshot that cannot be
    /// parsed is discarded and the empty state is persisted in its place.
    /// Returns the number of records loaded.
    #[instrument(skip(self), fields(key = %self.config.storage_key()))]
    pub async fn load(&mut self) -> GalleriaResult<usize> {
        let Some(raw) = self.storage.read(self.config.storage_key()).await? else {
            debug!("No stored snapshot, starting empty");
            self.records.clear();
            return Ok(0);
        };

        let stored: Vec<StoredRecord> = match serde_json::from_str(&raw) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "Stored snapshot is corrupt, resetting to empty");
                self.records.clear();
                self.persist().await?;
                return Ok(0);
            }
        };

        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut records: Vec<ImageRecord> = Vec::with_capacity(stored.len());
        for entry in stored {
            if entry.name.trim().is_empty() {
                debug!("Skipping stored record without a name");
                continue;
            }
            let record = entry.into_record();
            match positions.get(record.key()) {
                Some(&index) => records[index] = record,
                None => {
                    positions.insert(record.key().clone(), records.len());
                    records.push(record);
                }
            }
        }

        sort_records(&mut records);
        self.records = records;
        info!(count = self.records.len(), "Loaded local gallery");
        Ok(self.records.len())
    }

    /// Validate and add one file, replacing any record with the same
    /// normalized name. Does not persist.
    ///
    /// Size and type are checked from the declared metadata before the
    /// contents are read.
    #[instrument(skip(self, file), fields(name = %file.name(), size = file.declared_size()))]
    pub async fn ingest<F>(&mut self, file: &F) -> GalleriaResult<ImageRecord>
    where
        F: UploadedFile + ?Sized,
    {
        let name = file.name().trim().to_string();
        if name.is_empty() {
            return Err(IngestError::new(IngestErrorKind::EmptyName).into());
        }

        let extension = extension_of(&name);
        let declared = file.declared_mime().trim().to_ascii_lowercase();
        let mime_type = if declared.is_empty() {
            mime_for_extension(&extension)
                .unwrap_or_default()
                .to_string()
        } else {
            declared
        };

        if !is_upload_extension(&extension) || !ALLOWED_MIME_TYPES.contains(&mime_type.as_str()) {
            debug!(mime_type = %mime_type, extension = %extension, "Rejected unsupported type");
            return Err(IngestError::new(IngestErrorKind::UnsupportedType { name, mime_type }).into());
        }

        let limit = *self.config.max_file_bytes();
        if file.declared_size() > limit {
            debug!(limit, "Rejected oversize file");
            return Err(IngestError::new(IngestErrorKind::TooLarge {
                name,
                size_bytes: file.declared_size(),
                limit,
            })
            .into());
        }

        let bytes = file.read_bytes().await?;
        let size_bytes = bytes.len() as u64;
        if size_bytes > limit {
            return Err(IngestError::new(IngestErrorKind::TooLarge {
                name,
                size_bytes,
                limit,
            })
            .into());
        }

        let payload = format!("data:{};base64,{}", mime_type, STANDARD.encode(&bytes));
        let record = ImageRecord::local(name, mime_type, payload, size_bytes);
        self.upsert(record.clone());
        debug!(key = %record.key(), "Ingested file");
        Ok(record)
    }

    /// Ingest each file, collecting one outcome per file. Does not persist.
    pub async fn ingest_batch<'a, F, I>(&mut self, files: I) -> Vec<IngestOutcome>
    where
        F: UploadedFile + ?Sized + 'a,
        I: IntoIterator<Item = &'a F>,
    {
        let mut outcomes = Vec::new();
        for file in files {
            let result = self.ingest(file).await;
            if let Err(e) = &result {
                warn!(name = %file.name(), error = %e, "File refused");
            }
            outcomes.push(IngestOutcome {
                name: file.name().to_string(),
                result,
            });
        }
        let accepted = outcomes.iter().filter(|o| o.result.is_ok()).count();
        info!(accepted, refused = outcomes.len() - accepted, "Batch ingested");
        outcomes
    }

    /// Write the collection to durable storage.
    ///
    /// On failure (including `QuotaExceeded`) the in-memory collection is
    /// unchanged and the durable snapshot keeps its previous value.
    #[instrument(skip(self), fields(count = self.records.len()))]
    pub async fn persist(&self) -> GalleriaResult<()> {
        let serialized = self.serialize()?;
        match self
            .storage
            .write(self.config.storage_key(), &serialized)
            .await
        {
            Ok(()) => {
                debug!(bytes = serialized.len(), "Persisted local gallery");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to persist local gallery");
                Err(e)
            }
        }
    }

    /// Remove the record whose normalized name matches `key`, then persist.
    ///
    /// If persisting fails the record is restored.
    #[instrument(skip(self))]
    pub async fn delete(&mut self, key: &str) -> GalleriaResult<ImageRecord> {
        let key = normalize_key(key);
        let index = self
            .records
            .iter()
            .position(|r| r.key() == &key)
            .ok_or_else(|| StorageError::new(StorageErrorKind::RecordNotFound(key.clone())))?;

        let removed = self.records.remove(index);
        if let Err(e) = self.persist().await {
            self.upsert(removed);
            return Err(e);
        }
        info!(key = %key, "Deleted local image");
        Ok(removed)
    }

    /// Empty the collection and remove the durable snapshot.
    #[instrument(skip(self))]
    pub async fn clear(&mut self) -> GalleriaResult<usize> {
        self.storage.remove(self.config.storage_key()).await?;
        let cleared = self.records.len();
        self.records.clear();
        info!(cleared, "Cleared local gallery");
        Ok(cleared)
    }

    /// Drop records whose payload is not an image data URL or is too large.
    ///
    /// Persists only when something was removed. Returns the count removed.
    #[instrument(skip(self))]
    pub async fn repair(&mut self) -> GalleriaResult<usize> {
        let limit = *self.config.max_payload_bytes();
        let before = self.records.len();
        self.records.retain(|record| {
            let payload = record.payload().unwrap_or_default();
            let intact =
                payload.starts_with(IMAGE_PAYLOAD_MARKER) && payload.len() as u64 <= limit;
            if !intact {
                warn!(name = %record.name(), bytes = payload.len(), "Removing corrupt record");
            }
            intact
        });

        let removed = before - self.records.len();
        if removed > 0 {
            self.persist().await?;
            info!(removed, "Repaired local gallery");
        }
        Ok(removed)
    }

    /// Serialized size of the collection against the storage budget.
    pub fn health_check(&self) -> GalleriaResult<StorageHealth> {
        let size_bytes = self.serialize()?.len() as u64;
        let budget = self
            .storage
            .quota_bytes()
            .unwrap_or(*self.config.default_budget_bytes());
        Ok(StorageHealth::new(size_bytes, self.records.len(), budget))
    }

    /// End the store, handing back its backend.
    pub fn dispose(self) -> S {
        debug!(count = self.records.len(), "Disposing local store");
        self.storage
    }

    /// Records in gallery order.
    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    /// Record whose normalized name matches `key`.
    pub fn get(&self, key: &str) -> Option<&ImageRecord> {
        let key = normalize_key(key);
        self.records.iter().find(|r| r.key() == &key)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of the original file sizes.
    pub fn total_bytes(&self) -> u64 {
        self.records.iter().filter_map(|r| *r.size_bytes()).sum()
    }

    /// Store settings.
    pub fn config(&self) -> &LocalStoreConfig {
        &self.config
    }

    /// The backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn upsert(&mut self, record: ImageRecord) {
        match self.records.iter().position(|r| r.key() == record.key()) {
            Some(index) => self.records[index] = record,
            None => self.records.push(record),
        }
        sort_records(&mut self.records);
    }

    fn serialize(&self) -> GalleriaResult<String> {
        let stored: Vec<StoredRecord> = self.records.iter().map(StoredRecord::from).collect();
        Ok(serde_json::to_string(&stored)
            .map_err(|e| JsonError::new(format!("Failed to serialize gallery: {}", e)))?)
    }
}
