//! Curated manifest files.

use super::{DiscoveredImage, DiscoveryStrategy, StrategyContext, StrategyOutcome};
use crate::{DiscoveryResult, ManifestEntry, fetch_with_retry, parse_manifest, probe_first};
use async_trait::async_trait;
use galleria_core::{StrategyKind, is_image_file};
use tracing::{debug, instrument, warn};

/// Reads the first manifest that can be fetched and parsed, then confirms each
/// listed image with a probe.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestStrategy;

impl ManifestStrategy {
    async fn load_manifest(&self, ctx: &StrategyContext<'_>) -> Option<(String, Vec<ManifestEntry>)> {
        for location in ctx.config.manifest_locations(ctx.coords.folder_path()) {
            let url = ctx.coords.raw_path_url(ctx.config.raw_base(), &location);
            let body = match fetch_with_retry(
                ctx.fetcher,
                &url,
                *ctx.config.scan_attempts(),
                *ctx.config.retry_backoff_ms(),
            )
            .await
            {
                Ok(Some(body)) => body,
                Ok(None) => {
                    debug!(url = %url, "No manifest here");
                    continue;
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "Manifest fetch failed");
                    continue;
                }
            };

            match parse_manifest(&body) {
                Ok(entries) => return Some((url, entries)),
                Err(reason) => warn!(url = %url, reason = %reason, "Ignoring malformed manifest"),
            }
        }
        None
    }
}

#[async_trait]
impl DiscoveryStrategy for ManifestStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Manifest
    }

    #[instrument(skip(self, ctx), fields(source = %ctx.coords))]
    async fn run(&self, ctx: &StrategyContext<'_>) -> DiscoveryResult<StrategyOutcome> {
        let Some((manifest_url, entries)) = self.load_manifest(ctx).await else {
            return Ok(StrategyOutcome::default());
        };
        debug!(manifest_url = %manifest_url, entries = entries.len(), "Validating manifest entries");

        let max_images = *ctx.config.max_images();
        let mut images = Vec::new();
        for entry in entries.into_iter().filter(|e| is_image_file(e.name())) {
            if images.len() >= max_images {
                break;
            }

            let raw_url = ctx.coords.raw_url(ctx.config.raw_base(), entry.name());
            let pages_url = ctx.coords.pages_url(entry.name());
            let candidates = entry
                .url()
                .iter()
                .cloned()
                .chain([raw_url.clone(), pages_url.clone()]);

            match probe_first(ctx.probe, candidates).await {
                Some(url) => images.push(
                    DiscoveredImage::new(entry.name().clone(), url)
                        .with_mirrors(Some(raw_url), Some(pages_url))
                        .with_size(*entry.size_bytes()),
                ),
                None => debug!(name = %entry.name(), "Manifest entry not reachable"),
            }
        }

        Ok(StrategyOutcome::found(images))
    }
}
