//! Online judge configuration loading and validation.
//!
//! This crate provides:
//! - The typed [`Configuration`] for `data/config.json`
//! - Path resolution (CLI → `OJ_CONFIG` → `OJ_DATA_DIR` → working directory)
//! - Declarative document validation plus typed range checks
//! - Partial updates via [`ConfigurationPatch`]
//! - Config snapshots for run artifacts
//!
//! The configuration is loaded once at startup and passed by reference to
//! whatever needs it; nothing here holds global state.

pub mod load;
pub mod partial;
pub mod resolve;
pub mod schema;
pub mod snapshot;
pub mod types;
pub mod validate;

pub use load::{load, load_startup, load_str, load_with_provenance, ConfigError, LoadedConfig};
pub use partial::{ConfigurationPatch, PatchError};
pub use resolve::{resolve_config_path, ConfigOptions, ConfigSource, ResolvedPath};
pub use schema::{config_json_schema, patch_json_schema};
pub use snapshot::{ConfigSnapshot, ConfigSummary};
pub use types::{
    CachePlace, Configuration, HashFunc, JudgeMode, LoginMethod, PassStore, StorePlace,
    TestcaseStrictness,
};
pub use validate::{ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
