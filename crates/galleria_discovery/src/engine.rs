//! Discovery engine: strategy chain, snapshot cache and request coalescing.

use crate::strategies::{DiscoveredImage, DiscoveryStrategy, StrategyContext, default_chain};
use crate::{
    DiscoveryConfig, DiscoveryResult, ExistenceProbe, HttpClient, RemoteFetcher, ThrottledProbe,
};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use galleria_cache::{DiscoveryCache, DiscoveryCacheConfig};
use galleria_core::{ImageRecord, SourceCoordinates, StrategyKind, sort_records};
use galleria_error::{DiscoveryError, DiscoveryErrorKind, GalleriaResult};
use std::collections::{HashMap, HashSet};
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

type SharedDiscovery = Shared<BoxFuture<'static, DiscoveryResult<Vec<ImageRecord>>>>;

/// Finds the images of remote sources.
///
/// Cloning is cheap; clones share the cache and in-flight requests. Concurrent
/// discoveries of the same source share a single run of the strategy chain.
#[derive(Clone)]
pub struct RemoteDiscoveryEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    config: DiscoveryConfig,
    fetcher: Arc<dyn RemoteFetcher>,
    probe: Arc<dyn ExistenceProbe>,
    strategies: Vec<Box<dyn DiscoveryStrategy>>,
    cache: Mutex<DiscoveryCache>,
    in_flight: Mutex<HashMap<SourceCoordinates, SharedDiscovery>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl RemoteDiscoveryEngine {
    /// Engine over explicit fetch and probe implementations.
    pub fn new(
        config: DiscoveryConfig,
        cache_config: DiscoveryCacheConfig,
        fetcher: Arc<dyn RemoteFetcher>,
        probe: Arc<dyn ExistenceProbe>,
    ) -> Self {
        Self::with_strategies(config, cache_config, fetcher, probe, default_chain())
    }

    /// Engine over a custom strategy chain, run in the given order.
    pub fn with_strategies(
        config: DiscoveryConfig,
        cache_config: DiscoveryCacheConfig,
        fetcher: Arc<dyn RemoteFetcher>,
        probe: Arc<dyn ExistenceProbe>,
        strategies: Vec<Box<dyn DiscoveryStrategy>>,
    ) -> Self {
        let probe = match config.probes_per_second().and_then(NonZeroU32::new) {
            Some(rate) => Arc::new(ThrottledProbe::new(probe, rate)) as Arc<dyn ExistenceProbe>,
            None => probe,
        };
        debug!(strategies = strategies.len(), "Creating discovery engine");
        Self {
            inner: Arc::new(EngineInner {
                config,
                fetcher,
                probe,
                strategies,
                cache: Mutex::new(DiscoveryCache::new(cache_config)),
                in_flight: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Engine talking to the real hosts over HTTP.
    pub fn http(config: DiscoveryConfig, cache_config: DiscoveryCacheConfig) -> GalleriaResult<Self> {
        let client = Arc::new(HttpClient::new(&config)?);
        Ok(Self::new(config, cache_config, client.clone(), client))
    }

    /// Discovery settings.
    pub fn config(&self) -> &DiscoveryConfig {
        &self.inner.config
    }

    /// Images of a source, from cache when fresh.
    ///
    /// On success the snapshot is non-empty, deduplicated by normalized name,
    /// sorted descending and cached. When every strategy comes back empty the
    /// error is [`DiscoveryErrorKind::NotFound`].
    #[instrument(skip(self), fields(source = %coords))]
    pub async fn discover(&self, coords: &SourceCoordinates) -> GalleriaResult<Vec<ImageRecord>> {
        if let Some(records) = self.cached(coords) {
            debug!(count = records.len(), "Serving cached snapshot");
            return Ok(records);
        }
        self.discover_fresh(coords).await
    }

    /// Run the strategy chain regardless of the cache, joining a run already
    /// in flight for the same source.
    pub async fn discover_fresh(&self, coords: &SourceCoordinates) -> GalleriaResult<Vec<ImageRecord>> {
        let flight = {
            let mut in_flight = lock(&self.inner.in_flight);
            match in_flight.get(coords) {
                Some(existing) => {
                    debug!(source = %coords, "Joining in-flight discovery");
                    existing.clone()
                }
                None => {
                    let inner = Arc::clone(&self.inner);
                    let key = coords.clone();
                    let flight = async move {
                        let result = inner.run_chain(&key).await;
                        lock(&inner.in_flight).remove(&key);
                        result
                    }
                    .boxed()
                    .shared();
                    in_flight.insert(coords.clone(), flight.clone());
                    flight
                }
            }
        };

        Ok(flight.await?)
    }

    /// Fresh cached snapshot, if any.
    pub fn cached(&self, coords: &SourceCoordinates) -> Option<Vec<ImageRecord>> {
        lock(&self.inner.cache).get_records(coords)
    }

    /// Drop the cached snapshot so the next discovery runs the chain.
    pub fn invalidate(&self, coords: &SourceCoordinates) -> bool {
        lock(&self.inner.cache).invalidate(coords)
    }

    /// Serve the cached snapshot now and refresh in the background.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn revalidate(&self, coords: &SourceCoordinates) -> Revalidation {
        let stale = self.cached(coords);
        let engine = self.clone();
        let key = coords.clone();
        let fresh = tokio::spawn(async move { engine.discover_fresh(&key).await });
        debug!(source = %coords, has_stale = stale.is_some(), "Revalidating");
        Revalidation { stale, fresh }
    }
}

impl EngineInner {
    async fn run_chain(&self, coords: &SourceCoordinates) -> DiscoveryResult<Vec<ImageRecord>> {
        let ctx = StrategyContext {
            coords,
            config: &self.config,
            fetcher: self.fetcher.as_ref(),
            probe: self.probe.as_ref(),
        };

        let mut confirmed_empty = false;
        for strategy in &self.strategies {
            let kind = strategy.kind();
            match strategy.run(&ctx).await {
                Ok(outcome) if !outcome.images.is_empty() => {
                    let records = self.normalize(coords, kind, outcome.images);
                    info!(source = %coords, strategy = %kind, count = records.len(), "Discovered images");
                    lock(&self.cache).insert(coords, records.clone(), None);
                    return Ok(records);
                }
                Ok(outcome) => {
                    confirmed_empty |= outcome.confirmed_empty && kind.is_authoritative();
                    debug!(strategy = %kind, "Strategy found nothing, falling back");
                }
                Err(e) => warn!(strategy = %kind, error = %e, "Strategy failed, falling back"),
            }
        }

        info!(source = %coords, confirmed_empty, "No images found");
        Err(DiscoveryError::new(DiscoveryErrorKind::NotFound { confirmed_empty }))
    }

    fn normalize(
        &self,
        coords: &SourceCoordinates,
        kind: StrategyKind,
        images: Vec<DiscoveredImage>,
    ) -> Vec<ImageRecord> {
        let mut seen = HashSet::new();
        let mut records: Vec<ImageRecord> = images
            .into_iter()
            .map(|image| image.into_record(coords, kind))
            .filter(|record| seen.insert(record.dedup_key()))
            .collect();
        sort_records(&mut records);
        records.truncate(*self.config.max_images());
        records
    }
}

/// Where a settled snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    /// The background refresh succeeded
    Fresh,
    /// The refresh came back empty or failed; the cached snapshot stands
    Stale,
}

/// A snapshot and its provenance.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// The images
    pub records: Vec<ImageRecord>,
    /// Fresh or stale
    pub source: SnapshotSource,
}

/// A stale snapshot paired with its in-progress refresh.
pub struct Revalidation {
    stale: Option<Vec<ImageRecord>>,
    fresh: JoinHandle<GalleriaResult<Vec<ImageRecord>>>,
}

impl Revalidation {
    /// The cached snapshot to show while the refresh runs.
    pub fn stale(&self) -> Option<&[ImageRecord]> {
        self.stale.as_deref()
    }

    /// Wait for the refresh and pick the snapshot to show.
    ///
    /// A successful refresh always wins. Otherwise a non-empty stale snapshot
    /// is kept, and only with nothing to fall back on does the error surface.
    pub async fn settle(self) -> GalleriaResult<Snapshot> {
        let fresh = match self.fresh.await {
            Ok(result) => result,
            Err(e) => Err(DiscoveryError::new(DiscoveryErrorKind::Interrupted(e.to_string())).into()),
        };

        match (fresh, self.stale) {
            (Ok(records), _) => Ok(Snapshot {
                records,
                source: SnapshotSource::Fresh,
            }),
            (Err(e), Some(stale)) if !stale.is_empty() => {
                warn!(error = %e, "Refresh failed, keeping stale snapshot");
                Ok(Snapshot {
                    records: stale,
                    source: SnapshotSource::Stale,
                })
            }
            (Err(e), _) => Err(e),
        }
    }
}
