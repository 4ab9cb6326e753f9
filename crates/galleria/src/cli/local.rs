//! Local store command handlers.

use super::commands::{LocalCommands, OutputFormat};
use super::print_records;
use galleria::{
    BackupDocument, BackupKind, DiskFile, GalleriaConfig, GalleriaResult, JsonError,
    StorageError, StorageErrorKind, backup_file_name, format_size, normalize_key, open_local_store,
};
use std::path::{Path, PathBuf};
use tracing::info;

/// Handle local store commands.
pub async fn handle_local_command(config: &GalleriaConfig, cmd: LocalCommands) -> GalleriaResult<()> {
    match cmd {
        LocalCommands::List { format } => list(config, format).await,
        LocalCommands::Add { files } => add(config, &files).await,
        LocalCommands::Delete { key } => delete(config, &key).await,
        LocalCommands::Clear { yes } => clear(config, yes).await,
        LocalCommands::Repair => repair(config).await,
        LocalCommands::Health { format } => health(config, format).await,
        LocalCommands::Export { compact, out } => export(config, compact, out).await,
        LocalCommands::Import { file, yes } => import(config, &file, yes).await,
    }
}

async fn list(config: &GalleriaConfig, format: OutputFormat) -> GalleriaResult<()> {
    let store = open_local_store(config).await?;
    if store.is_empty() && matches!(format, OutputFormat::Human) {
        println!("No images yet. Add some with `galleria local add <FILES>`.");
        return Ok(());
    }
    print_records(config.gallery().title(), store.records(), format)
}

/// Ingest every readable file, then persist once.
async fn add(config: &GalleriaConfig, paths: &[PathBuf]) -> GalleriaResult<()> {
    let mut store = open_local_store(config).await?;

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        match DiskFile::open(path).await {
            Ok(file) => files.push(file),
            Err(e) => println!("✗ {}: {}", path.display(), e),
        }
    }

    let outcomes = store.ingest_batch(&files).await;
    let added = outcomes.iter().filter(|o| o.result.is_ok()).count();
    for outcome in &outcomes {
        match &outcome.result {
            Ok(record) => println!("✓ {} ({})", record.name(), format_size(record.size_bytes().unwrap_or_default())),
            Err(e) => println!("✗ {}: {}", outcome.name, e),
        }
    }

    if added > 0 {
        store.persist().await?;
    }
    info!(added, rejected = outcomes.len() - added, "Files ingested");
    println!("Added {} of {} files ({} images stored)", added, paths.len(), store.len());
    Ok(())
}

async fn delete(config: &GalleriaConfig, key: &str) -> GalleriaResult<()> {
    let mut store = open_local_store(config).await?;
    let removed = store.delete(&normalize_key(key)).await?;
    println!("Deleted {}", removed.name());
    Ok(())
}

async fn clear(config: &GalleriaConfig, yes: bool) -> GalleriaResult<()> {
    if !yes {
        println!("Refusing to remove every image without --yes");
        return Ok(());
    }
    let mut store = open_local_store(config).await?;
    let removed = store.clear().await?;
    println!("Removed {} images", removed);
    Ok(())
}

async fn repair(config: &GalleriaConfig) -> GalleriaResult<()> {
    let mut store = open_local_store(config).await?;
    let removed = store.repair().await?;
    if removed == 0 {
        println!("No corrupt images found ({} images checked)", store.len());
    } else {
        println!("Removed {} corrupt images, {} remain", removed, store.len());
    }
    Ok(())
}

async fn health(config: &GalleriaConfig, format: OutputFormat) -> GalleriaResult<()> {
    let store = open_local_store(config).await?;
    let health = store.health_check()?;

    match format {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&health).map_err(|e| JsonError::new(e.to_string()))?;
            println!("{}", json);
        }
        OutputFormat::Human => {
            println!("Storage health: {}", health.status());
            println!("{:-<80}", "");
            println!("Images:  {}", health.item_count());
            println!(
                "Used:    {} of {} ({:.1}%)",
                format_size(*health.size_bytes()),
                format_size(*health.budget_bytes()),
                health.percent_used()
            );
            println!("Data:    {}", store.storage().base_path().display());
        }
    }
    Ok(())
}

async fn export(config: &GalleriaConfig, compact: bool, out: Option<PathBuf>) -> GalleriaResult<()> {
    let store = open_local_store(config).await?;
    let (kind, document) = if compact {
        (BackupKind::Compact, BackupDocument::compact(store.records()))
    } else {
        (BackupKind::Full, BackupDocument::full(store.records()))
    };

    let path = out.unwrap_or_else(|| PathBuf::from(backup_file_name(kind, chrono::Local::now().date_naive())));
    write_file(&path, &document.to_json()?).await?;

    info!(path = %path.display(), kind = %kind, images = store.len(), "Backup written");
    println!("Exported {} images to {}", store.len(), path.display());
    Ok(())
}

async fn import(config: &GalleriaConfig, file: &Path, yes: bool) -> GalleriaResult<()> {
    let text = tokio::fs::read_to_string(file)
        .await
        .map_err(|e| StorageError::new(StorageErrorKind::FileRead(format!("{}: {}", file.display(), e))))?;
    let document = BackupDocument::from_json(&text)?;

    if document.kind() == BackupKind::Compact {
        println!(
            "{} lists {} images but holds no image data; nothing to import",
            file.display(),
            document.total_images()
        );
        return Ok(());
    }

    let files = document.import_files();
    if !yes {
        println!(
            "{} holds {} images. Re-run with --yes to add them to the gallery.",
            file.display(),
            files.len()
        );
        return Ok(());
    }

    let mut store = open_local_store(config).await?;
    let outcomes = store.ingest_batch(&files).await;
    let imported = outcomes.iter().filter(|o| o.result.is_ok()).count();
    for outcome in &outcomes {
        if let Err(e) = &outcome.result {
            println!("✗ {}: {}", outcome.name, e);
        }
    }
    if imported > 0 {
        store.persist().await?;
    }
    println!("Imported {} of {} images", imported, document.images().len());
    Ok(())
}

async fn write_file(path: &Path, contents: &str) -> GalleriaResult<()> {
    tokio::fs::write(path, contents).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!("{}: {}", path.display(), e)))
    })?;
    Ok(())
}
