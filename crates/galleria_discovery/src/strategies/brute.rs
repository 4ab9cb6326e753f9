//! Generated names against every known endpoint.

use super::{DiscoveredImage, DiscoveryStrategy, StrategyContext, StrategyOutcome};
use crate::{DiscoveryResult, NameGenerator, probe_first};
use async_trait::async_trait;
use futures::StreamExt;
use galleria_core::StrategyKind;
use tracing::{debug, instrument};

/// Probes generated candidate names on the raw host, the pages mirror and the
/// web host's raw redirect, keeping the first endpoint that answers.
///
/// Probes run `probe_concurrency` at a time while results are consumed in
/// candidate order, so output order never depends on timing. Probing stops
/// once `max_images` images are found.
#[derive(Debug, Clone, Default)]
pub struct BruteProbeStrategy {
    names: NameGenerator,
}

impl BruteProbeStrategy {
    /// Strategy drawing names from a custom generator.
    pub fn new(names: NameGenerator) -> Self {
        Self { names }
    }
}

#[async_trait]
impl DiscoveryStrategy for BruteProbeStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::BruteProbe
    }

    #[instrument(skip(self, ctx), fields(source = %ctx.coords))]
    async fn run(&self, ctx: &StrategyContext<'_>) -> DiscoveryResult<StrategyOutcome> {
        let max_images = *ctx.config.max_images();
        let concurrency = (*ctx.config.probe_concurrency()).max(1);
        let candidates = self.names.generate(*ctx.config.candidate_limit());
        debug!(candidates = candidates.len(), concurrency, "Brute probing");

        let mut probes = futures::stream::iter(candidates)
            .map(|name| {
                let raw_url = ctx.coords.raw_url(ctx.config.raw_base(), &name);
                let pages_url = ctx.coords.pages_url(&name);
                let blob_url = ctx.coords.blob_raw_url(ctx.config.web_base(), &name);
                let probe = ctx.probe;
                async move {
                    let urls = [raw_url.clone(), pages_url.clone(), blob_url];
                    probe_first(probe, urls).await.map(|url| {
                        DiscoveredImage::new(name, url).with_mirrors(Some(raw_url), Some(pages_url))
                    })
                }
            })
            .buffered(concurrency);

        let mut images = Vec::new();
        while let Some(result) = probes.next().await {
            if let Some(image) = result {
                images.push(image);
                if images.len() >= max_images {
                    debug!(max_images, "Reached image limit");
                    break;
                }
            }
        }

        Ok(StrategyOutcome::found(images))
    }
}
