//! In-memory snapshot storage.

use crate::SnapshotStorage;
use galleria_error::{GalleriaResult, StorageError, StorageErrorKind};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Volatile backend, for tests and sessions that should not touch disk.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
    quota_bytes: Option<u64>,
}

impl MemoryStorage {
    /// Empty storage without a quota.
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse values larger than `bytes`.
    pub fn with_quota(mut self, bytes: u64) -> Self {
        self.quota_bytes = Some(bytes);
        self
    }

    /// Seed a raw value, bypassing the quota.
    pub fn with_value(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.lock().insert(key.into(), value.into());
        self
    }

    /// Current raw value under `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl SnapshotStorage for MemoryStorage {
    async fn read(&self, key: &str) -> GalleriaResult<Option<String>> {
        Ok(self.raw(key))
    }

    async fn write(&self, key: &str, value: &str) -> GalleriaResult<()> {
        let required = value.len() as u64;
        if let Some(budget) = self.quota_bytes.filter(|quota| required > *quota) {
            return Err(StorageError::new(StorageErrorKind::QuotaExceeded { required, budget }).into());
        }
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> GalleriaResult<()> {
        self.lock().remove(key);
        Ok(())
    }

    fn quota_bytes(&self) -> Option<u64> {
        self.quota_bytes
    }
}
