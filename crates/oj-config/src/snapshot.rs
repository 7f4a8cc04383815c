//! Configuration snapshots for run artifacts and reproducibility.
//!
//! A snapshot records exactly which configuration bytes a process started
//! with, so a later report can be matched to the settings that produced it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::load::LoadedConfig;
use crate::types::{Configuration, LoginMethod};

/// A frozen snapshot of configuration state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// When this snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// Hostname where snapshot was taken.
    #[serde(default)]
    pub hostname: Option<String>,

    /// Schema version of the configuration.
    pub schema_version: String,

    /// Path the configuration was loaded from.
    pub config_path: String,

    /// How that path was chosen.
    pub config_source: String,

    /// SHA-256 hash of the raw configuration bytes.
    pub sha256: String,

    /// Key configuration values for quick reference.
    pub summary: ConfigSummary,
}

/// Summary of key configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSummary {
    pub store_place: String,
    pub cache_place: String,
    pub login_methods: Vec<LoginMethod>,
    /// Whether passwords are hashed with a configured hash function.
    pub hashed_passwords: bool,
    pub container_port: u16,
    pub testcase_strict: String,
    pub judge_server_count: usize,
    pub judge_mode: u8,
}

impl ConfigSnapshot {
    /// Create a new snapshot from a loaded configuration.
    pub fn new(loaded: &LoadedConfig) -> Self {
        let hostname = hostname::get()
            .ok()
            .map(|h| h.to_string_lossy().to_string());

        ConfigSnapshot {
            timestamp: Utc::now(),
            hostname,
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            config_path: loaded.path.display().to_string(),
            config_source: loaded.source.to_string(),
            sha256: loaded.sha256.clone(),
            summary: ConfigSummary::from(&loaded.config),
        }
    }

    /// Serialize snapshot to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check if this snapshot matches another (same configuration bytes).
    pub fn matches(&self, other: &ConfigSnapshot) -> bool {
        self.sha256 == other.sha256
    }

    /// Get a short identifier for this snapshot (first 12 chars of hash).
    pub fn short_id(&self) -> &str {
        &self.sha256[..12.min(self.sha256.len())]
    }
}

impl From<&Configuration> for ConfigSummary {
    fn from(config: &Configuration) -> Self {
        ConfigSummary {
            store_place: config.store_place.to_string(),
            cache_place: config.cache_place.to_string(),
            login_methods: config.login_methods.clone(),
            hashed_passwords: config.hashes_passwords(),
            container_port: config.container_port,
            testcase_strict: config.testcase_strict.to_string(),
            judge_server_count: config.judge_server.len(),
            judge_mode: config.judge_mode.value(),
        }
    }
}

/// SHA-256 of `bytes`, hex encoded.
pub fn digest_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
