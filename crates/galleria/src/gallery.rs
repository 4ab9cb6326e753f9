//! The gallery: whichever producer the configured mode selects.

use crate::GalleriaConfig;
use galleria_core::{ImageRecord, SourceCoordinates};
use galleria_discovery::RemoteDiscoveryEngine;
use galleria_error::GalleriaResult;
use galleria_store::{FileSystemStorage, LocalStore, SnapshotStorage};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Where a gallery's images come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GalleryMode {
    /// Discover images published in a remote folder
    #[default]
    Remote,
    /// Images uploaded into the local store
    Local,
}

/// A gallery bound to its producer.
///
/// Both variants yield the same thing to a view: a sorted, deduplicated
/// sequence of [`ImageRecord`]s.
pub enum Gallery<S: SnapshotStorage = FileSystemStorage> {
    /// Images discovered at a remote source
    Remote {
        /// Shared discovery engine
        engine: RemoteDiscoveryEngine,
        /// Folder being discovered
        coords: SourceCoordinates,
    },
    /// Images held in the local store
    Local(LocalStore<S>),
}

impl Gallery<FileSystemStorage> {
    /// Build the gallery the configuration asks for.
    ///
    /// Remote mode needs resolvable source coordinates. Local mode opens the
    /// store in the configured data directory, loading and self-healing it.
    #[instrument(skip(config), fields(mode = %config.gallery().mode()))]
    pub async fn from_config(config: &GalleriaConfig) -> GalleriaResult<Self> {
        match config.gallery().mode() {
            GalleryMode::Remote => {
                let coords = config.source().coordinates()?;
                let engine = discovery_engine(config)?;
                Ok(Self::remote(engine, coords))
            }
            GalleryMode::Local => Ok(Self::Local(open_local_store(config).await?)),
        }
    }
}

impl<S: SnapshotStorage> Gallery<S> {
    /// Remote gallery over an existing engine.
    pub fn remote(engine: RemoteDiscoveryEngine, coords: SourceCoordinates) -> Self {
        Self::Remote { engine, coords }
    }

    /// Local gallery over an opened store.
    pub fn local(store: LocalStore<S>) -> Self {
        Self::Local(store)
    }

    /// Which producer backs this gallery.
    pub fn mode(&self) -> GalleryMode {
        match self {
            Self::Remote { .. } => GalleryMode::Remote,
            Self::Local(_) => GalleryMode::Local,
        }
    }

    /// Current images, serving a cached discovery when one is fresh.
    #[instrument(skip(self), fields(mode = %self.mode()))]
    pub async fn snapshot(&self) -> GalleriaResult<Vec<ImageRecord>> {
        let records = match self {
            Self::Remote { engine, coords } => engine.discover(coords).await?,
            Self::Local(store) => store.records().to_vec(),
        };
        debug!(count = records.len(), "Snapshot ready");
        Ok(records)
    }

    /// Re-read the producer: a fresh discovery, or a reload from storage.
    #[instrument(skip(self), fields(mode = %self.mode()))]
    pub async fn refresh(&mut self) -> GalleriaResult<Vec<ImageRecord>> {
        let records = match self {
            Self::Remote { engine, coords } => engine.discover_fresh(coords).await?,
            Self::Local(store) => {
                store.load().await?;
                store.records().to_vec()
            }
        };
        info!(count = records.len(), "Gallery refreshed");
        Ok(records)
    }
}

/// HTTP discovery engine from the `[discovery]` and `[cache]` tables.
pub fn discovery_engine(config: &GalleriaConfig) -> GalleriaResult<RemoteDiscoveryEngine> {
    RemoteDiscoveryEngine::http(config.discovery().clone(), config.cache().clone())
}

/// Open and load the local store from the `[store]` and `[storage]` tables.
#[instrument(skip(config))]
pub async fn open_local_store(config: &GalleriaConfig) -> GalleriaResult<LocalStore<FileSystemStorage>> {
    let dir = config.storage().resolved_data_dir();
    debug!(data_dir = %dir.display(), "Opening local store");

    let mut storage = FileSystemStorage::new(dir)?;
    if let Some(quota) = config.storage().quota_bytes() {
        storage = storage.with_quota(*quota);
    }
    LocalStore::open(storage, config.store().clone()).await
}
