//! Discovery snapshot cache implementation.

use derive_getters::Getters;
use galleria_core::{ImageRecord, SourceCoordinates};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Cache entry with a snapshot and its expiration.
#[derive(Debug, Clone, Getters)]
pub struct CacheEntry {
    records: Vec<ImageRecord>,
    created_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    /// Check if this entry is expired.
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.ttl
    }

    /// Get remaining time until expiration.
    pub fn time_remaining(&self) -> Option<Duration> {
        self.ttl.checked_sub(self.created_at.elapsed())
    }

    /// How long ago the snapshot was stored.
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }
}

/// Configuration for the discovery cache.
#[derive(
    Debug, Clone, Serialize, Deserialize, Getters, derive_setters::Setters, derive_builder::Builder,
)]
#[setters(prefix = "with_")]
pub struct DiscoveryCacheConfig {
    /// Default TTL for cached snapshots (seconds)
    #[serde(default = "default_ttl")]
    #[builder(default = "default_ttl()")]
    default_ttl: u64,

    /// Maximum number of sources kept
    #[serde(default = "default_max_size")]
    #[builder(default = "default_max_size()")]
    max_size: usize,

    /// Whether caching is enabled
    #[serde(default = "default_enabled")]
    #[builder(default = "default_enabled()")]
    enabled: bool,
}

fn default_ttl() -> u64 {
    300 // 5 minutes
}

fn default_max_size() -> usize {
    64
}

fn default_enabled() -> bool {
    true
}

impl Default for DiscoveryCacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: default_ttl(),
            max_size: default_max_size(),
            enabled: default_enabled(),
        }
    }
}

/// Cache of discovery snapshots keyed by source coordinates.
///
/// Entries expire a fixed TTL after insertion. An expired entry is removed on
/// lookup and reported as a miss. When full, the least recently used source
/// is evicted.
///
/// # Example
///
/// ```
/// use galleria_cache::{DiscoveryCache, DiscoveryCacheConfig};
/// use galleria_core::{ImageRecord, SourceCoordinates, StrategyKind};
///
/// let mut cache = DiscoveryCache::new(DiscoveryCacheConfig::default());
/// let coords = SourceCoordinates::builder().owner("octo").repo("gallery").build().unwrap();
///
/// let record = ImageRecord::remote(
///     "sha1", "cat.jpg", "https://example.com/cat.jpg", None, None, Some(10), StrategyKind::Listing,
/// );
/// cache.insert(&coords, vec![record], None);
///
/// assert_eq!(cache.get_records(&coords).map(|r| r.len()), Some(1));
/// ```
pub struct DiscoveryCache {
    config: DiscoveryCacheConfig,
    entries: HashMap<SourceCoordinates, CacheEntry>,
    access_order: Vec<SourceCoordinates>,
}

impl DiscoveryCache {
    /// Create a new discovery cache with configuration.
    pub fn new(config: DiscoveryCacheConfig) -> Self {
        tracing::debug!(
            default_ttl = config.default_ttl,
            max_size = config.max_size,
            enabled = config.enabled,
            "Creating new DiscoveryCache"
        );
        Self {
            config,
            entries: HashMap::new(),
            access_order: Vec::new(),
        }
    }

    /// Store a snapshot for a source.
    ///
    /// # Arguments
    ///
    /// * `coords` - Source the snapshot was discovered at
    /// * `records` - The snapshot
    /// * `ttl` - Lifetime (uses the configured default if None)
    #[tracing::instrument(
        skip(self, records),
        fields(source = %coords, count = records.len(), cache_size = self.entries.len())
    )]
    pub fn insert(
        &mut self,
        coords: &SourceCoordinates,
        records: Vec<ImageRecord>,
        ttl: Option<Duration>,
    ) {
        if !self.config.enabled {
            tracing::debug!("Cache disabled, skipping insert");
            return;
        }

        let ttl = ttl.unwrap_or(Duration::from_secs(self.config.default_ttl));
        let entry = CacheEntry {
            records,
            created_at: Instant::now(),
            ttl,
        };

        if self.entries.len() >= self.config.max_size && !self.entries.contains_key(coords) {
            self.evict_lru();
        }

        self.touch(coords);

        tracing::debug!(
            replaced = self.entries.contains_key(coords),
            ttl = ?ttl,
            "Inserted snapshot into cache"
        );

        self.entries.insert(coords.clone(), entry);
    }

    /// Get a cached snapshot entry.
    ///
    /// Returns None if:
    /// - Entry doesn't exist
    /// - Entry is expired
    /// - Cache is disabled
    #[tracing::instrument(skip(self), fields(source = %coords, cache_size = self.entries.len()))]
    pub fn get(&mut self, coords: &SourceCoordinates) -> Option<&CacheEntry> {
        if !self.config.enabled {
            tracing::debug!("Cache disabled, returning None");
            return None;
        }

        let entry = self.entries.get(coords)?;
        if entry.is_expired() {
            tracing::debug!("Cache entry expired, removing");
            self.remove(coords);
            return None;
        }

        self.touch(coords);

        let entry = self.entries.get(coords)?;
        tracing::debug!(time_remaining = ?entry.time_remaining(), "Cache hit");
        Some(entry)
    }

    /// Get a copy of the cached snapshot, if fresh.
    pub fn get_records(&mut self, coords: &SourceCoordinates) -> Option<Vec<ImageRecord>> {
        self.get(coords).map(|entry| entry.records.clone())
    }

    /// Drop the snapshot for one source. Returns whether one was cached.
    pub fn invalidate(&mut self, coords: &SourceCoordinates) -> bool {
        let existed = self.remove(coords);
        if existed {
            tracing::info!(source = %coords, "Invalidated cached snapshot");
        }
        existed
    }

    /// Remove expired entries from cache.
    pub fn cleanup_expired(&mut self) -> usize {
        let before = self.entries.len();

        let access_order = &mut self.access_order;
        self.entries.retain(|key, entry| {
            let keep = !entry.is_expired();
            if !keep {
                access_order.retain(|k| k != key);
            }
            keep
        });

        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::info!(
                removed,
                remaining = self.entries.len(),
                "Cleaned up expired cache entries"
            );
        }
        removed
    }

    /// Clear all cache entries.
    pub fn clear(&mut self) {
        let count = self.entries.len();
        self.entries.clear();
        self.access_order.clear();
        tracing::info!(cleared = count, "Cleared cache");
    }

    /// Get number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cache configuration.
    pub fn config(&self) -> &DiscoveryCacheConfig {
        &self.config
    }

    fn touch(&mut self, coords: &SourceCoordinates) {
        if let Some(pos) = self.access_order.iter().position(|k| k == coords) {
            self.access_order.remove(pos);
        }
        self.access_order.push(coords.clone());
    }

    fn remove(&mut self, coords: &SourceCoordinates) -> bool {
        self.access_order.retain(|k| k != coords);
        self.entries.remove(coords).is_some()
    }

    /// Evict least recently used entry.
    fn evict_lru(&mut self) {
        if self.access_order.is_empty() {
            return;
        }
        let key = self.access_order.remove(0);
        tracing::debug!(source = %key, "Evicting LRU entry");
        self.entries.remove(&key);
    }
}

impl Default for DiscoveryCache {
    fn default() -> Self {
        Self::new(DiscoveryCacheConfig::default())
    }
}
