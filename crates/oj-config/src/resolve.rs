//! Configuration path resolution.
//!
//! Resolution order: CLI argument → `OJ_CONFIG` → `OJ_DATA_DIR` →
//! `<working-directory>/data/config.json`.

use std::path::{Path, PathBuf};

/// Where the configuration path came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument or API call.
    CliArgument,

    /// Set via the `OJ_CONFIG` environment variable.
    Environment,

    /// Derived from the `OJ_DATA_DIR` environment variable.
    DataDir,

    /// `data/config.json` under the working directory.
    #[default]
    WorkingDirectory,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::DataDir => write!(f, "data directory"),
            ConfigSource::WorkingDirectory => write!(f, "working directory"),
        }
    }
}

/// Environment variable naming the configuration file.
pub const ENV_CONFIG_PATH: &str = "OJ_CONFIG";

/// Environment variable naming the data directory.
pub const ENV_DATA_DIR: &str = "OJ_DATA_DIR";

/// Data directory name under the working directory.
pub const DATA_DIR_NAME: &str = "data";

/// Configuration file name inside the data directory.
pub const CONFIG_FILENAME: &str = "config.json";

/// Resolution options.
#[derive(Debug, Clone, Default)]
pub struct ConfigOptions {
    /// Explicit configuration file (highest priority).
    pub config_path: Option<PathBuf>,

    /// Working directory override; defaults to the process working directory.
    pub working_dir: Option<PathBuf>,
}

/// A resolved configuration path and its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub path: PathBuf,
    pub source: ConfigSource,
}

/// Resolve the configuration path from options and the process environment.
///
/// Resolution never fails; a missing file is reported when loading.
pub fn resolve_config_path(options: &ConfigOptions) -> ResolvedPath {
    resolve_with(options, |key| std::env::var(key).ok())
}

/// Resolve with an injected environment lookup.
pub fn resolve_with(
    options: &ConfigOptions,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedPath {
    // 1. Explicit path
    if let Some(path) = &options.config_path {
        return ResolvedPath {
            path: path.clone(),
            source: ConfigSource::CliArgument,
        };
    }

    // 2. Direct file path from the environment
    if let Some(path) = env(ENV_CONFIG_PATH).filter(|v| !v.is_empty()) {
        return ResolvedPath {
            path: PathBuf::from(path),
            source: ConfigSource::Environment,
        };
    }

    // 3. Data directory from the environment
    if let Some(dir) = env(ENV_DATA_DIR).filter(|v| !v.is_empty()) {
        return ResolvedPath {
            path: PathBuf::from(dir).join(CONFIG_FILENAME),
            source: ConfigSource::DataDir,
        };
    }

    // 4. Working directory default
    let cwd = options
        .working_dir
        .clone()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    ResolvedPath {
        path: default_config_path(&cwd),
        source: ConfigSource::WorkingDirectory,
    }
}

/// `<dir>/data/config.json`.
pub fn default_config_path(working_dir: &Path) -> PathBuf {
    working_dir.join(DATA_DIR_NAME).join(CONFIG_FILENAME)
}
