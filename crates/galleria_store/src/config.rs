//! Local store configuration.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

const MIB: u64 = 1024 * 1024;

/// Limits and naming for the local store.
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_setters::Setters, derive_builder::Builder,
)]
#[setters(prefix = "with_")]
pub struct LocalStoreConfig {
    /// Key the snapshot is persisted under
    #[serde(default = "default_storage_key")]
    #[builder(default = "default_storage_key()", setter(into))]
    storage_key: String,

    /// Largest file accepted by ingest (bytes, before encoding)
    #[serde(default = "default_max_file_bytes")]
    #[builder(default = "default_max_file_bytes()")]
    max_file_bytes: u64,

    /// Largest encoded payload `repair` keeps (bytes)
    #[serde(default = "default_max_payload_bytes")]
    #[builder(default = "default_max_payload_bytes()")]
    max_payload_bytes: u64,

    /// Health budget when the backend has no quota (bytes)
    #[serde(default = "default_budget_bytes")]
    #[builder(default = "default_budget_bytes()")]
    default_budget_bytes: u64,
}

fn default_storage_key() -> String {
    "localImageGallery".to_string()
}

fn default_max_file_bytes() -> u64 {
    5 * MIB
}

fn default_max_payload_bytes() -> u64 {
    10 * MIB
}

fn default_budget_bytes() -> u64 {
    5 * MIB
}

impl Default for LocalStoreConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            max_file_bytes: default_max_file_bytes(),
            max_payload_bytes: default_max_payload_bytes(),
            default_budget_bytes: default_budget_bytes(),
        }
    }
}
