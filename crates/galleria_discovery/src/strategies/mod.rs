//! The discovery strategies, in fallback order.

mod brute;
mod endpoint;
mod listing;
mod manifest;

pub use brute::BruteProbeStrategy;
pub use endpoint::EndpointProbeStrategy;
pub use listing::ListingStrategy;
pub use manifest::ManifestStrategy;

use crate::{DiscoveryConfig, DiscoveryResult, ExistenceProbe, RemoteFetcher};
use async_trait::async_trait;
use derive_getters::Getters;
use galleria_core::{ImageRecord, SourceCoordinates, StrategyKind};

/// An image a strategy located, before normalization into a record.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct DiscoveredImage {
    name: String,
    url: String,
    raw_url: Option<String>,
    pages_url: Option<String>,
    size_bytes: Option<u64>,
    content_hash: Option<String>,
}

impl DiscoveredImage {
    /// Image found at `url`.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            raw_url: None,
            pages_url: None,
            size_bytes: None,
            content_hash: None,
        }
    }

    /// Attach the raw-host and pages-mirror URLs for the same file.
    pub fn with_mirrors(mut self, raw_url: Option<String>, pages_url: Option<String>) -> Self {
        self.raw_url = raw_url;
        self.pages_url = pages_url;
        self
    }

    /// Attach the reported size.
    pub fn with_size(mut self, size_bytes: Option<u64>) -> Self {
        self.size_bytes = size_bytes;
        self
    }

    /// Attach the host's content hash.
    pub fn with_content_hash(mut self, hash: Option<String>) -> Self {
        self.content_hash = hash;
        self
    }

    /// Normalize into a record. The key is the content hash when known,
    /// otherwise the repository path.
    pub fn into_record(self, coords: &SourceCoordinates, strategy: StrategyKind) -> ImageRecord {
        let key = self
            .content_hash
            .unwrap_or_else(|| coords.file_path(&self.name));
        ImageRecord::remote(
            key,
            self.name,
            self.url,
            self.raw_url,
            self.pages_url,
            self.size_bytes,
            strategy,
        )
    }
}

/// What a strategy found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrategyOutcome {
    /// Located images, possibly empty
    pub images: Vec<DiscoveredImage>,
    /// The strategy authoritatively observed an image-free folder
    pub confirmed_empty: bool,
}

impl StrategyOutcome {
    /// Outcome that located `images`.
    pub fn found(images: Vec<DiscoveredImage>) -> Self {
        Self {
            images,
            confirmed_empty: false,
        }
    }
}

/// Everything a strategy may use.
pub struct StrategyContext<'a> {
    /// Source being discovered
    pub coords: &'a SourceCoordinates,
    /// Discovery tuning
    pub config: &'a DiscoveryConfig,
    /// Document fetcher
    pub fetcher: &'a dyn RemoteFetcher,
    /// Existence probe
    pub probe: &'a dyn ExistenceProbe,
}

/// One way of finding a folder's images.
///
/// Errors are strategy-local: the engine logs them and moves on to the next
/// strategy.
#[async_trait]
pub trait DiscoveryStrategy: Send + Sync {
    /// Which strategy this is.
    fn kind(&self) -> StrategyKind;

    /// Look for images.
    async fn run(&self, ctx: &StrategyContext<'_>) -> DiscoveryResult<StrategyOutcome>;
}

/// The four strategies in fixed priority order.
pub fn default_chain() -> Vec<Box<dyn DiscoveryStrategy>> {
    vec![
        Box::new(ListingStrategy),
        Box::new(ManifestStrategy),
        Box::new(EndpointProbeStrategy),
        Box::new(BruteProbeStrategy::default()),
    ]
}
