//! Directory listing through the host's contents API.

use super::{DiscoveredImage, DiscoveryStrategy, StrategyContext, StrategyOutcome};
use crate::{DiscoveryResult, fetch_with_retry};
use async_trait::async_trait;
use galleria_core::{StrategyKind, is_image_file};
use galleria_error::{DiscoveryError, DiscoveryErrorKind};
use serde::Deserialize;
use tracing::{debug, instrument};

#[derive(Debug, Deserialize)]
struct ListingEntry {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    sha: Option<String>,
    #[serde(default)]
    download_url: Option<String>,
}

/// Asks the contents API which files the folder holds.
///
/// The only authoritative strategy: an answered listing without images
/// confirms the folder is empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListingStrategy;

#[async_trait]
impl DiscoveryStrategy for ListingStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Listing
    }

    #[instrument(skip(self, ctx), fields(source = %ctx.coords))]
    async fn run(&self, ctx: &StrategyContext<'_>) -> DiscoveryResult<StrategyOutcome> {
        let url = ctx.coords.listing_url(ctx.config.api_base());
        let body = fetch_with_retry(
            ctx.fetcher,
            &url,
            *ctx.config.scan_attempts(),
            *ctx.config.retry_backoff_ms(),
        )
        .await?
        .ok_or_else(|| {
            DiscoveryError::new(DiscoveryErrorKind::NetworkUnavailable(format!(
                "listing unavailable at {}",
                url
            )))
        })?;

        let entries: Vec<ListingEntry> = serde_json::from_str(&body).map_err(|e| {
            DiscoveryError::new(DiscoveryErrorKind::Malformed {
                url: url.clone(),
                reason: e.to_string(),
            })
        })?;

        let images: Vec<DiscoveredImage> = entries
            .into_iter()
            .filter(|entry| entry.kind == "file" && is_image_file(&entry.name))
            .map(|entry| {
                let raw_url = ctx.coords.raw_url(ctx.config.raw_base(), &entry.name);
                let pages_url = ctx.coords.pages_url(&entry.name);
                let url = entry.download_url.unwrap_or_else(|| raw_url.clone());
                DiscoveredImage::new(entry.name, url)
                    .with_mirrors(Some(raw_url), Some(pages_url))
                    .with_size(entry.size)
                    .with_content_hash(entry.sha)
            })
            .collect();

        debug!(count = images.len(), "Listing answered");
        Ok(StrategyOutcome {
            confirmed_empty: images.is_empty(),
            images,
        })
    }
}
