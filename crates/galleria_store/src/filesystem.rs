//! Filesystem-based snapshot storage.
//!
//! Each key is stored as `{base_path}/{key}.json`.

use crate::SnapshotStorage;
use galleria_error::{GalleriaResult, StorageError, StorageErrorKind};
use std::path::{Path, PathBuf};

/// Filesystem storage backend.
///
/// # Features
///
/// - **Atomic writes**: temp file + rename, so a crash never leaves half a snapshot
/// - **Optional quota**: oversized values are refused before touching disk
/// - **Disk-full mapping**: a full device reads as a quota failure
#[derive(Debug, Clone)]
pub struct FileSystemStorage {
    base_path: PathBuf,
    quota_bytes: Option<u64>,
}

impl FileSystemStorage {
    /// Create a new filesystem storage backend.
    ///
    /// Creates the base directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created or accessed.
    #[tracing::instrument(skip(base_path))]
    pub fn new(base_path: impl Into<PathBuf>) -> GalleriaResult<Self> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        tracing::info!(path = %base_path.display(), "Opened filesystem storage");
        Ok(Self {
            base_path,
            quota_bytes: None,
        })
    }

    /// Refuse values larger than `bytes`.
    pub fn with_quota(mut self, bytes: u64) -> Self {
        self.quota_bytes = Some(bytes);
        self
    }

    /// Root directory.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// File holding a key's value.
    fn path_for(&self, key: &str) -> GalleriaResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(StorageError::new(StorageErrorKind::InvalidKey(key.to_string())).into());
        }
        Ok(self.base_path.join(format!("{}.json", key)))
    }

    fn quota_error(&self, required: u64) -> StorageError {
        StorageError::new(StorageErrorKind::QuotaExceeded {
            required,
            budget: self.quota_bytes.unwrap_or(0),
        })
    }
}

#[async_trait::async_trait]
impl SnapshotStorage for FileSystemStorage {
    #[tracing::instrument(skip(self))]
    async fn read(&self, key: &str) -> GalleriaResult<Option<String>> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => {
                tracing::debug!(path = %path.display(), bytes = value.len(), "Read snapshot");
                Ok(Some(value))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
            .into()),
        }
    }

    #[tracing::instrument(skip(self, value), fields(bytes = value.len()))]
    async fn write(&self, key: &str, value: &str) -> GalleriaResult<()> {
        let path = self.path_for(key)?;
        let required = value.len() as u64;

        if self.quota_bytes.is_some_and(|quota| required > quota) {
            tracing::warn!(required, quota = ?self.quota_bytes, "Snapshot exceeds quota");
            return Err(self.quota_error(required).into());
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = path.with_extension("json.tmp");
        if let Err(e) = tokio::fs::write(&temp_path, value).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            if e.kind() == std::io::ErrorKind::StorageFull {
                tracing::warn!(required, "Device full while writing snapshot");
                return Err(self.quota_error(required).into());
            }
            return Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
            .into());
        }

        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        tracing::debug!(path = %path.display(), "Wrote snapshot");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn remove(&self, key: &str) -> GalleriaResult<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Removed snapshot");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                "delete {}: {}",
                path.display(),
                e
            )))
            .into()),
        }
    }

    fn quota_bytes(&self) -> Option<u64> {
        self.quota_bytes
    }
}
