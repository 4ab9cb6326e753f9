//! Gallery and remote discovery command handlers.

use super::commands::{OutputFormat, SourceArgs};
use super::print_records;
use galleria::{
    DiscoveryErrorKind, GalleriaConfig, GalleriaError, GalleriaResult, Gallery, GalleryMode,
    ImageRecord, SnapshotSource, discovery_engine,
};
use std::time::Duration;
use tracing::{info, warn};

/// Show the gallery in the configured mode.
pub async fn show(config: &GalleriaConfig, format: OutputFormat) -> GalleriaResult<()> {
    let gallery = Gallery::from_config(config).await?;
    let title = config.gallery().title();

    match gallery.snapshot().await {
        Ok(records) if records.is_empty() && gallery.mode() == GalleryMode::Local => {
            println!("{}: no images yet. Add some with `galleria local add <FILES>`.", title);
            Ok(())
        }
        Ok(records) => print_records(title, &records, format),
        Err(e) => report_empty(&e).ok_or(e),
    }
}

/// Discover a remote folder and print what was found.
pub async fn discover(
    config: GalleriaConfig,
    source: SourceArgs,
    fresh: bool,
    format: OutputFormat,
) -> GalleriaResult<()> {
    let config = config.with_source_overrides(&source.into());
    let coords = config.source().coordinates()?;
    let engine = discovery_engine(&config)?;

    let result = if fresh {
        engine.discover_fresh(&coords).await
    } else {
        engine.discover(&coords).await
    };

    match result {
        Ok(records) => print_records(&coords.to_string(), &records, format),
        Err(e) => report_empty(&e).ok_or(e),
    }
}

/// Re-discover on an interval, printing the snapshot whenever it changes.
///
/// Each round prints the cached snapshot first when it differs from the
/// screen, then waits for the fresh scan. Ctrl-C stops the watch at any point,
/// including mid-scan. A failed or empty scan keeps the last good snapshot on
/// screen.
pub async fn watch(
    config: GalleriaConfig,
    source: SourceArgs,
    interval: Option<u64>,
) -> GalleriaResult<()> {
    let config = config.with_source_overrides(&source.into());
    let coords = config.source().coordinates()?;
    let engine = discovery_engine(&config)?;
    let period = Duration::from_secs(
        interval
            .unwrap_or(*config.gallery().refresh_interval_secs())
            .max(1),
    );

    info!(source = %coords, period_secs = period.as_secs(), "Watching remote folder");
    println!("Watching {} every {}s (Ctrl-C to stop)", coords, period.as_secs());

    let mut ticker = tokio::time::interval(period);
    let mut shown = Shown::default();
    let interrupted = tokio::signal::ctrl_c();
    tokio::pin!(interrupted);

    loop {
        tokio::select! {
            _ = &mut interrupted => break,
            _ = ticker.tick() => {}
        }

        let revalidation = engine.revalidate(&coords);
        if let Some(stale) = revalidation.stale() {
            if shown.replace(stale) {
                print_records(&format!("{} (cached, refreshing)", coords), stale, OutputFormat::Human)?;
            }
        }

        let result = tokio::select! {
            _ = &mut interrupted => break,
            result = revalidation.settle() => result,
        };

        match result {
            Ok(snapshot) => {
                let label = match snapshot.source {
                    SnapshotSource::Fresh => "fresh",
                    SnapshotSource::Stale => "stale",
                };
                if shown.replace(&snapshot.records) {
                    print_records(&format!("{} ({})", coords, label), &snapshot.records, OutputFormat::Human)?;
                } else {
                    println!("{} images, unchanged ({})", snapshot.records.len(), label);
                }
            }
            Err(e) => match report_empty(&e) {
                Some(()) => shown.clear(),
                None => warn!(error = %e, "Refresh failed"),
            },
        }
    }

    info!("Watch interrupted");
    Ok(())
}

/// Keys of the snapshot currently on screen.
#[derive(Debug, Default)]
struct Shown(Option<Vec<String>>);

impl Shown {
    /// Remember `records` as shown. Returns true when they differ from before.
    fn replace(&mut self, records: &[ImageRecord]) -> bool {
        let keys: Vec<String> = records.iter().map(|r| r.key().clone()).collect();
        if self.0.as_ref() == Some(&keys) {
            return false;
        }
        self.0 = Some(keys);
        true
    }

    fn clear(&mut self) {
        self.0 = None;
    }
}

/// Print the empty-state message for an exhausted discovery.
///
/// Returns `None` for every other error so the caller can propagate it.
fn report_empty(error: &GalleriaError) -> Option<()> {
    match error.discovery_kind()? {
        DiscoveryErrorKind::NotFound { confirmed_empty: true } => {
            println!("The folder exists but contains no images.");
            Some(())
        }
        DiscoveryErrorKind::NotFound { confirmed_empty: false } => {
            println!("No images found. Add a manifest (e.g. _files.txt) to the folder to list them.");
            Some(())
        }
        _ => None,
    }
}
