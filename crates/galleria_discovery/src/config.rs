//! Discovery configuration.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tuning for the discovery chain.
///
/// Every field has a serde default so a partial `[discovery]` table is enough.
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_setters::Setters, derive_builder::Builder,
)]
#[setters(prefix = "with_")]
pub struct DiscoveryConfig {
    /// Base URL of the repository contents API
    #[serde(default = "default_api_base")]
    #[builder(default = "default_api_base()", setter(into))]
    api_base: String,

    /// Base URL of the raw-content host
    #[serde(default = "default_raw_base")]
    #[builder(default = "default_raw_base()", setter(into))]
    raw_base: String,

    /// Base URL of the repository web host
    #[serde(default = "default_web_base")]
    #[builder(default = "default_web_base()", setter(into))]
    web_base: String,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    #[builder(default = "default_user_agent()", setter(into))]
    user_agent: String,

    /// Deadline for a single existence probe (milliseconds)
    #[serde(default = "default_probe_timeout_ms")]
    #[builder(default = "default_probe_timeout_ms()")]
    probe_timeout_ms: u64,

    /// Deadline for one listing or manifest fetch, body included (milliseconds)
    #[serde(default = "default_fetch_timeout_ms")]
    #[builder(default = "default_fetch_timeout_ms()")]
    fetch_timeout_ms: u64,

    /// Number of generated names brute probing may try
    #[serde(default = "default_candidate_limit")]
    #[builder(default = "default_candidate_limit()")]
    candidate_limit: usize,

    /// Upper bound on images returned from one discovery
    #[serde(default = "default_max_images")]
    #[builder(default = "default_max_images()")]
    max_images: usize,

    /// Brute probes in flight at once (1 = strictly sequential)
    #[serde(default = "default_probe_concurrency")]
    #[builder(default = "default_probe_concurrency()")]
    probe_concurrency: usize,

    /// Optional cap on probe rate
    #[serde(default)]
    #[builder(default)]
    probes_per_second: Option<u32>,

    /// Attempts for listing and manifest fetches
    #[serde(default = "default_scan_attempts")]
    #[builder(default = "default_scan_attempts()")]
    scan_attempts: u32,

    /// Initial delay between fetch attempts (milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    #[builder(default = "default_retry_backoff_ms()")]
    retry_backoff_ms: u64,

    /// Manifest locations, tried in order. `{folder}` expands to the image folder.
    #[serde(default = "default_manifest_paths")]
    #[builder(default = "default_manifest_paths()")]
    manifest_paths: Vec<String>,

    /// Curated names tried against the pages mirror
    #[serde(default = "default_endpoint_names")]
    #[builder(default = "default_endpoint_names()")]
    endpoint_names: Vec<String>,
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_raw_base() -> String {
    "https://raw.githubusercontent.com".to_string()
}

fn default_web_base() -> String {
    "https://github.com".to_string()
}

fn default_user_agent() -> String {
    concat!("galleria/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_probe_timeout_ms() -> u64 {
    3_000
}

fn default_fetch_timeout_ms() -> u64 {
    10_000
}

fn default_candidate_limit() -> usize {
    500
}

fn default_max_images() -> usize {
    1_000
}

fn default_probe_concurrency() -> usize {
    1
}

fn default_scan_attempts() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    500
}

fn default_manifest_paths() -> Vec<String> {
    ["{folder}/_files.txt", "images-list.txt", "images.json"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_endpoint_names() -> Vec<String> {
    [
        "image.jpg",
        "photo.jpg",
        "picture.png",
        "img.jpg",
        "photo1.jpg",
        "photo2.jpg",
        "image1.png",
        "image2.png",
        "cat.jpg",
        "dog.png",
        "nature.jpg",
        "landscape.png",
        "screenshot.png",
        "wallpaper.jpg",
        "background.jpg",
        "cover.jpg",
        "avatar.png",
        "logo.png",
        "icon.jpg",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            raw_base: default_raw_base(),
            web_base: default_web_base(),
            user_agent: default_user_agent(),
            probe_timeout_ms: default_probe_timeout_ms(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            candidate_limit: default_candidate_limit(),
            max_images: default_max_images(),
            probe_concurrency: default_probe_concurrency(),
            probes_per_second: None,
            scan_attempts: default_scan_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            manifest_paths: default_manifest_paths(),
            endpoint_names: default_endpoint_names(),
        }
    }
}

impl DiscoveryConfig {
    /// Probe deadline as a duration.
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Fetch deadline as a duration.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Manifest locations with `{folder}` expanded.
    pub fn manifest_locations(&self, folder: &str) -> Vec<String> {
        self.manifest_paths
            .iter()
            .map(|path| {
                path.replace("{folder}", folder)
                    .trim_start_matches('/')
                    .to_string()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DiscoveryConfig::default();
        assert_eq!(config.probe_timeout(), Duration::from_secs(3));
        assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
        assert_eq!(*config.max_images(), 1000);
        assert_eq!(*config.probe_concurrency(), 1);
        assert_eq!(config.endpoint_names().len(), 19);
    }

    #[test]
    fn test_manifest_locations_expand_folder() {
        let config = DiscoveryConfig::default();
        assert_eq!(
            config.manifest_locations("images"),
            vec!["images/_files.txt", "images-list.txt", "images.json"]
        );
        assert_eq!(config.manifest_locations("")[0], "_files.txt");
    }

    #[test]
    fn test_partial_toml_like_table() {
        let config: DiscoveryConfig =
            serde_json::from_str(r#"{"max_images": 10, "probes_per_second": 5}"#).unwrap();
        assert_eq!(*config.max_images(), 10);
        assert_eq!(*config.probes_per_second(), Some(5));
        assert_eq!(*config.scan_attempts(), 3);
    }
}
