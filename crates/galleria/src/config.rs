//! Layered configuration for the gallery.

use crate::GalleryMode;
use config::{Config, File, FileFormat};
use derive_getters::Getters;
use galleria_cache::DiscoveryCacheConfig;
use galleria_core::SourceCoordinates;
use galleria_discovery::DiscoveryConfig;
use galleria_error::{ConfigError, GalleriaResult};
use galleria_store::LocalStoreConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Bundled defaults, compiled into the binary.
const DEFAULT_CONFIG: &str = include_str!("../../../galleria.toml");

/// Everything the gallery needs to start.
///
/// Sources are merged in order, later ones overriding earlier ones:
///
/// 1. The bundled `galleria.toml`
/// 2. `~/.config/galleria/galleria.toml`
/// 3. `./galleria.toml`
/// 4. A file passed explicitly (`--config`)
///
/// # Example
///
/// ```rust,no_run
/// use galleria::GalleriaConfig;
///
/// let config = GalleriaConfig::load().unwrap();
/// println!("Mode: {}", config.gallery().mode());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, Getters)]
pub struct GalleriaConfig {
    /// Startup mode and presentation
    #[serde(default)]
    gallery: GallerySettings,
    /// Remote folder to discover
    #[serde(default)]
    source: SourceSettings,
    /// Discovery chain tuning
    #[serde(default)]
    discovery: DiscoveryConfig,
    /// Discovery snapshot cache
    #[serde(default)]
    cache: DiscoveryCacheConfig,
    /// Local store limits
    #[serde(default)]
    store: LocalStoreConfig,
    /// Where the local store keeps its data
    #[serde(default)]
    storage: StorageSettings,
}

/// `[gallery]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct GallerySettings {
    /// Which producer `show` uses
    #[serde(default)]
    mode: GalleryMode,
    /// Heading printed above listings
    #[serde(default = "default_title")]
    title: String,
    /// Default period for `watch` (seconds)
    #[serde(default = "default_refresh_interval")]
    refresh_interval_secs: u64,
}

fn default_title() -> String {
    "Image Gallery".to_string()
}

fn default_refresh_interval() -> u64 {
    300
}

impl Default for GallerySettings {
    fn default() -> Self {
        Self {
            mode: GalleryMode::default(),
            title: default_title(),
            refresh_interval_secs: default_refresh_interval(),
        }
    }
}

/// `[source]` table. Owner and repo stay optional so a config file can hold
/// the rest while the command line names the repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct SourceSettings {
    /// Repository owner
    #[serde(default)]
    owner: Option<String>,
    /// Repository name
    #[serde(default)]
    repo: Option<String>,
    /// Branch holding the images
    #[serde(default)]
    branch: Option<String>,
    /// Folder inside the repository
    #[serde(default)]
    folder: Option<String>,
    /// Static-pages mirror root
    #[serde(default)]
    pages_url: Option<String>,
}

impl SourceSettings {
    /// Settings with every field given.
    pub fn new(
        owner: Option<String>,
        repo: Option<String>,
        branch: Option<String>,
        folder: Option<String>,
        pages_url: Option<String>,
    ) -> Self {
        Self {
            owner,
            repo,
            branch,
            folder,
            pages_url,
        }
    }

    /// Fields set in `overrides` replace ours.
    pub fn merged_with(&self, overrides: &SourceSettings) -> Self {
        let pick = |ours: &Option<String>, theirs: &Option<String>| theirs.clone().or_else(|| ours.clone());
        Self {
            owner: pick(&self.owner, &overrides.owner),
            repo: pick(&self.repo, &overrides.repo),
            branch: pick(&self.branch, &overrides.branch),
            folder: pick(&self.folder, &overrides.folder),
            pages_url: pick(&self.pages_url, &overrides.pages_url),
        }
    }

    /// Resolve into coordinates, failing when owner or repo is missing.
    pub fn coordinates(&self) -> GalleriaResult<SourceCoordinates> {
        let (Some(owner), Some(repo)) = (&self.owner, &self.repo) else {
            return Err(ConfigError::new(
                "Remote source needs an owner and a repo ([source] table or --owner/--repo)",
            )
            .into());
        };

        let mut builder = SourceCoordinates::builder();
        builder
            .owner(owner.as_str())
            .repo(repo.as_str())
            .pages_root(self.pages_url.clone());
        if let Some(branch) = &self.branch {
            builder.branch(branch.as_str());
        }
        if let Some(folder) = &self.folder {
            builder.folder(folder.as_str());
        }

        Ok(builder
            .build()
            .map_err(|e| ConfigError::new(format!("Invalid source coordinates: {}", e)))?)
    }
}

/// `[storage]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct StorageSettings {
    /// Data directory; the platform data directory when unset
    #[serde(default)]
    data_dir: Option<PathBuf>,
    /// Byte budget enforced on every write
    #[serde(default)]
    quota_bytes: Option<u64>,
}

impl StorageSettings {
    /// Directory the local store writes into.
    pub fn resolved_data_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .map(|dir| dir.join("galleria"))
                .unwrap_or_else(|| PathBuf::from(".galleria")),
        }
    }
}

impl GalleriaConfig {
    /// Load configuration from the standard locations.
    #[instrument(name = "galleria_config_load")]
    pub fn load() -> GalleriaResult<Self> {
        Self::load_with(None)
    }

    /// Load the standard locations, then `extra` on top when given.
    #[instrument(name = "galleria_config_load_with")]
    pub fn load_with(extra: Option<&Path>) -> GalleriaResult<Self> {
        debug!("Loading configuration");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".config/galleria/galleria.toml");
            debug!(path = %user_config.display(), "Checking user configuration");
            builder = builder.add_source(File::from(user_config).required(false));
        }

        builder = builder.add_source(File::with_name("galleria").required(false));

        if let Some(path) = extra {
            debug!(path = %path.display(), "Adding explicit configuration file");
            builder = builder.add_source(File::from(path));
        }

        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to deserialize configuration: {}", e)))?;

        debug!(mode = %config.gallery.mode, "Configuration loaded");
        Ok(config)
    }

    /// Load a single file, with serde defaults for anything it omits.
    #[instrument(name = "galleria_config_from_file", skip(path))]
    pub fn from_file(path: impl AsRef<Path>) -> GalleriaResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading configuration from file");

        Ok(Config::builder()
            .add_source(File::from(path))
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to load config file: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?)
    }

    /// Parse TOML text, with serde defaults for anything it omits.
    pub fn from_toml_str(text: &str) -> GalleriaResult<Self> {
        Ok(Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?)
    }

    /// Replace the gallery mode.
    pub fn with_mode(mut self, mode: GalleryMode) -> Self {
        self.gallery.mode = mode;
        self
    }

    /// Apply source fields given on the command line.
    pub fn with_source_overrides(mut self, overrides: &SourceSettings) -> Self {
        self.source = self.source.merged_with(overrides);
        self
    }

    /// Point the local store at another directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage.data_dir = Some(dir.into());
        self
    }
}
