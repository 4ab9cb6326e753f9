//! Common names against the static-pages mirror and raw host.

use super::{DiscoveredImage, DiscoveryStrategy, StrategyContext, StrategyOutcome};
use crate::{DiscoveryResult, probe_first};
use async_trait::async_trait;
use galleria_core::StrategyKind;
use tracing::{debug, instrument};

/// Probes the configured short list of names, pages mirror first, then raw host.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndpointProbeStrategy;

#[async_trait]
impl DiscoveryStrategy for EndpointProbeStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::EndpointProbe
    }

    #[instrument(skip(self, ctx), fields(source = %ctx.coords))]
    async fn run(&self, ctx: &StrategyContext<'_>) -> DiscoveryResult<StrategyOutcome> {
        let mut images = Vec::new();
        for name in ctx.config.endpoint_names() {
            let pages_url = ctx.coords.pages_url(name);
            let raw_url = ctx.coords.raw_url(ctx.config.raw_base(), name);
            if let Some(url) = probe_first(ctx.probe, [pages_url.clone(), raw_url.clone()]).await {
                images.push(
                    DiscoveredImage::new(name.clone(), url)
                        .with_mirrors(Some(raw_url), Some(pages_url)),
                );
            }
        }
        debug!(count = images.len(), "Endpoint probing finished");
        Ok(StrategyOutcome::found(images))
    }
}
