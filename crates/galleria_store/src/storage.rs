//! Durable key-value backend for gallery snapshots.

use galleria_error::GalleriaResult;

/// Trait for pluggable snapshot storage backends.
///
/// A backend holds opaque string values under string keys. The store writes
/// its whole collection as one value, so implementations only need atomic
/// whole-value replacement.
#[async_trait::async_trait]
pub trait SnapshotStorage: Send + Sync {
    /// Read the value under `key`, `None` when absent.
    async fn read(&self, key: &str) -> GalleriaResult<Option<String>>;

    /// Replace the value under `key`.
    ///
    /// # Errors
    ///
    /// `StorageErrorKind::QuotaExceeded` when the value does not fit. The
    /// previous value is left untouched in that case.
    async fn write(&self, key: &str, value: &str) -> GalleriaResult<()>;

    /// Remove the value under `key`. Removing an absent key succeeds.
    async fn remove(&self, key: &str) -> GalleriaResult<()>;

    /// Byte budget for a single value, if the backend enforces one.
    fn quota_bytes(&self) -> Option<u64>;
}
