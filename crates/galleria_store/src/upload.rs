//! Files offered to the store for ingestion.

use galleria_core::{extension_of, mime_for_extension};
use galleria_error::{GalleriaResult, IngestError, IngestErrorKind, StorageError, StorageErrorKind};
use std::path::{Path, PathBuf};

/// A file whose metadata can be inspected before its contents are read.
#[async_trait::async_trait]
pub trait UploadedFile: Send + Sync {
    /// Declared file name.
    fn name(&self) -> &str;

    /// Declared size in bytes.
    fn declared_size(&self) -> u64;

    /// Declared MIME type; empty when unknown.
    fn declared_mime(&self) -> &str;

    /// Read the full contents.
    async fn read_bytes(&self) -> Result<Vec<u8>, IngestError>;
}

/// File already held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryFile {
    name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

impl InMemoryFile {
    /// File named `name` declaring `mime_type`.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

#[async_trait::async_trait]
impl UploadedFile for InMemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn declared_size(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn declared_mime(&self) -> &str {
        &self.mime_type
    }

    async fn read_bytes(&self) -> Result<Vec<u8>, IngestError> {
        Ok(self.bytes.clone())
    }
}

/// File on disk, described by its filesystem metadata.
///
/// The MIME type is inferred from the extension, so an unknown extension
/// declares an empty type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskFile {
    path: PathBuf,
    name: String,
    size: u64,
    mime_type: String,
}

impl DiskFile {
    /// Describe the file at `path` without reading it.
    pub async fn open(path: impl AsRef<Path>) -> GalleriaResult<Self> {
        let path = path.as_ref().to_path_buf();
        let metadata = tokio::fs::metadata(&path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = mime_for_extension(&extension_of(&name))
            .unwrap_or_default()
            .to_string();

        Ok(Self {
            path,
            name,
            size: metadata.len(),
            mime_type,
        })
    }

    /// Location on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl UploadedFile for DiskFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn declared_size(&self) -> u64 {
        self.size
    }

    fn declared_mime(&self) -> &str {
        &self.mime_type
    }

    async fn read_bytes(&self) -> Result<Vec<u8>, IngestError> {
        tokio::fs::read(&self.path).await.map_err(|e| {
            IngestError::new(IngestErrorKind::Read {
                name: self.name.clone(),
                reason: e.to_string(),
            })
        })
    }
}
