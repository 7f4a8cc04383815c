//! Configuration loading.
//!
//! The pipeline is: read bytes → parse JSON → validate against
//! [`crate::validate::SCHEMA`] → deserialize into [`Configuration`] →
//! range-check the typed value. The first failing stage decides the error.

use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::resolve::{resolve_config_path, ConfigOptions, ConfigSource};
use crate::snapshot::{digest_bytes, ConfigSnapshot};
use crate::types::{Configuration, HASH_FUNC_NONE};
use crate::validate::{unknown_fields, validate_configuration, validate_document, ValidationError};

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("invalid JSON in configuration file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration in {}: {source}", .path.display())]
    Validation {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },

    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unknown configuration key: {key}")]
    UnknownKey { key: String },
}

impl ConfigError {
    /// The validation failure, if this is one.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            ConfigError::Validation { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for oj_common::Error {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NotFound { path } => oj_common::Error::ConfigNotFound { path },
            e @ ConfigError::Parse { .. } => oj_common::Error::ConfigParse(e.to_string()),
            e @ ConfigError::Validation { .. } => oj_common::Error::ConfigInvalid(e.to_string()),
            ConfigError::Io { source, .. } => oj_common::Error::Io(source),
            ConfigError::UnknownKey { key } => oj_common::Error::UnknownKey { key },
        }
    }
}

/// A loaded configuration with provenance information.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The validated configuration.
    pub config: Configuration,

    /// File it was read from.
    pub path: PathBuf,

    /// How the path was chosen.
    pub source: ConfigSource,

    /// SHA-256 of the raw file bytes, hex encoded.
    pub sha256: String,
}

impl LoadedConfig {
    /// Create a snapshot for run artifacts.
    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot::new(self)
    }
}

/// Load and validate the configuration at `path`.
pub fn load(path: &Path) -> Result<Configuration, ConfigError> {
    load_with_provenance(path, ConfigSource::CliArgument).map(|loaded| loaded.config)
}

/// Load and validate a configuration document held in memory.
///
/// `origin` is only used to label errors.
pub fn load_str(json: &str, origin: &Path) -> Result<Configuration, ConfigError> {
    let doc: Value = serde_json::from_str(json).map_err(|e| ConfigError::Parse {
        path: origin.to_path_buf(),
        source: e,
    })?;
    parse_document(doc, origin)
}

/// Load `path` and keep its provenance and digest.
pub fn load_with_provenance(path: &Path, source: ConfigSource) -> Result<LoadedConfig, ConfigError> {
    tracing::debug!(path = %path.display(), source = %source, "loading configuration");

    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ConfigError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let sha256 = digest_bytes(&bytes);

    let doc: Value = serde_json::from_slice(&bytes).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config = parse_document(doc, path)?;

    tracing::info!(
        path = %path.display(),
        source = %source,
        sha256 = %&sha256[..12],
        store_place = %config.store_place,
        judge_servers = config.judge_server.len(),
        "configuration loaded"
    );

    Ok(LoadedConfig {
        config,
        path: path.to_path_buf(),
        source,
        sha256,
    })
}

/// Resolve the startup path from `options` and load it.
pub fn load_startup(options: &ConfigOptions) -> Result<LoadedConfig, ConfigError> {
    let resolved = resolve_config_path(options);
    load_with_provenance(&resolved.path, resolved.source)
}

/// Validate a parsed document and turn it into a [`Configuration`].
fn parse_document(mut doc: Value, path: &Path) -> Result<Configuration, ConfigError> {
    let invalid = |source: ValidationError| ConfigError::Validation {
        path: path.to_path_buf(),
        source,
    };

    validate_document(&doc).map_err(invalid)?;

    if let Some(map) = doc.as_object_mut() {
        for key in unknown_fields(map) {
            tracing::warn!(path = %path.display(), key = %key, "ignoring unrecognized configuration key");
        }

        if map.get("hash_func").and_then(Value::as_str) == Some(HASH_FUNC_NONE) {
            map.insert("hash_func".to_string(), Value::Null);
        }
    }

    let config: Configuration = serde_json::from_value(doc)
        .map_err(|e| invalid(ValidationError::Schema(e.to_string())))?;

    validate_configuration(&config).map_err(invalid)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HashFunc, StorePlace};
    use std::fs;
    use tempfile::TempDir;

    const VALID: &str = r#"{
        "lang": "zh",
        "store_place": "sql",
        "cache_place": "redis",
        "login_methods": ["pwd"],
        "pass_store": "hashed",
        "hash_func": "sha256",
        "container_port": 3000,
        "testcase_strict": "loose",
        "compress_threshold": 0,
        "judge_server": ["judge-1:8000", "judge-2:8000"],
        "judge_mode": 1
    }"#;

    fn write(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("config.json");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_valid() {
        let dir = TempDir::new().unwrap();
        let config = load(&write(&dir, VALID)).unwrap();
        assert_eq!(config.store_place, StorePlace::Sql);
        assert_eq!(config.hash_func, Some(HashFunc::Sha256));
        assert_eq!(config.judge_server.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.json");
        match load(&path) {
            Err(ConfigError::NotFound { path: p }) => assert_eq!(p, path),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_load_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(load(dir.path()), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_trailing_comma_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, r#"{"lang": "en",}"#);
        assert!(matches!(load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_str_not_object() {
        let err = load_str("[]", Path::new("inline")).unwrap_err();
        assert!(matches!(
            err.validation(),
            Some(ValidationError::NotAnObject { found: "array" })
        ));
    }

    #[test]
    fn test_hash_func_none_literal_normalized() {
        let json = VALID.replace(r#""sha256""#, r#""none""#);
        let config = load_str(&json, Path::new("inline")).unwrap();
        assert_eq!(config.hash_func, None);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let json = VALID.replacen('{', r#"{"theme": "dark","#, 1);
        assert!(load_str(&json, Path::new("inline")).is_ok());
    }

    #[test]
    fn test_provenance_digest_is_stable() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, VALID);
        let a = load_with_provenance(&path, ConfigSource::Environment).unwrap();
        let b = load_with_provenance(&path, ConfigSource::Environment).unwrap();
        assert_eq!(a.sha256, b.sha256);
        assert_eq!(a.sha256.len(), 64);
        assert_eq!(a.source, ConfigSource::Environment);
        assert_eq!(a.path, path);
    }

    #[test]
    fn test_load_startup_explicit_path() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("data")).unwrap();
        fs::write(dir.path().join("data/config.json"), VALID).unwrap();

        let options = ConfigOptions {
            config_path: Some(dir.path().join("data/config.json")),
            working_dir: None,
        };
        let loaded = load_startup(&options).unwrap();
        assert_eq!(loaded.source, ConfigSource::CliArgument);
        assert_eq!(loaded.config.lang, "zh");
    }

    #[test]
    fn test_into_common_error() {
        let err: oj_common::Error = ConfigError::UnknownKey { key: "x".into() }.into();
        assert_eq!(err.code(), 13);

        let dir = TempDir::new().unwrap();
        let err: oj_common::Error = load(&dir.path().join("nope.json")).unwrap_err().into();
        assert_eq!(err.code(), 10);
    }
}
