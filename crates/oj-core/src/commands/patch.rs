//! `patch <FILE> [--write]`: apply a partial document to the configuration.
//!
//! The patched result is re-validated before it is printed or written.
//! With `--write` the file the configuration was loaded from is replaced
//! atomically; keys the loader ignores are carried over unchanged.

use std::path::Path;

use oj_common::{read_json, read_text, write_json, Error};
use oj_config::{Configuration, ConfigurationPatch, LoadedConfig, PatchError, ValidationError};
use serde_json::{json, Value};

use crate::logging::event_names;
use crate::output::{CommandOutput, CommandResult, Failure};

pub fn run(loaded: &LoadedConfig, file: &Path, write: bool) -> CommandResult {
    let raw = read_text(file)?.ok_or_else(|| {
        Error::InvalidArgument(format!("patch file not found: {}", file.display()))
    })?;

    let patch = ConfigurationPatch::from_json_str(&raw).map_err(|err| patch_failure(file, err))?;
    let changed = patch.set_fields();

    let updated = loaded.config.with_patch(patch).map_err(|err| {
        Failure::from(Error::ConfigInvalid(format!(
            "patched configuration is invalid: {}",
            err
        )))
    })?;

    let mut preserved = Vec::new();
    if write {
        let (document, kept) = merged_document(&loaded.path, &updated)?;
        write_json(&loaded.path, &document)?;
        preserved = kept;
        tracing::info!(
            event = event_names::CONFIG_PATCHED,
            path = %loaded.path.display(),
            fields = ?changed,
            preserved = ?preserved,
            "configuration written"
        );
    }

    let summary = if changed.is_empty() {
        "patch is empty; nothing changed".to_string()
    } else if write {
        format!("patched {} ({})", loaded.path.display(), changed.join(", "))
    } else {
        format!("patch ok ({}); not written", changed.join(", "))
    };

    let mut markdown = String::from("# Patched Configuration\n\n");
    for field in &changed {
        markdown.push_str(&format!("- `{}` updated\n", field));
    }
    markdown.push_str(if write {
        "\nWritten back to the configuration file.\n"
    } else {
        "\nNot written; pass --write to persist.\n"
    });

    Ok(CommandOutput {
        data: json!({
            "changed": changed,
            "written": write,
            "preserved_keys": preserved,
            "path": loaded.path.display().to_string(),
            "config": updated,
        }),
        markdown,
        summary,
    })
}

/// The document on disk with every configuration field replaced by
/// `updated`. Returns the unrecognized keys that were kept.
fn merged_document(path: &Path, updated: &Configuration) -> Result<(Value, Vec<String>), Error> {
    let fields = match serde_json::to_value(updated)? {
        Value::Object(fields) => fields,
        other => return Ok((other, Vec::new())),
    };
    let mut document = read_json(path)?;
    let Value::Object(map) = &mut document else {
        return Ok((Value::Object(fields), Vec::new()));
    };

    let preserved = map
        .keys()
        .filter(|key| !Configuration::FIELD_NAMES.contains(&key.as_str()))
        .cloned()
        .collect();
    map.extend(fields);
    Ok((document, preserved))
}

fn patch_failure(file: &Path, err: PatchError) -> Failure {
    let error = match err {
        PatchError::Parse(e) => Error::ConfigParse(format!("{}: {}", file.display(), e)),
        PatchError::Validation(ValidationError::UnknownField { field }) => {
            Error::UnknownKey { key: field }
        }
        PatchError::Validation(e) => Error::ConfigInvalid(format!("{}: {}", file.display(), e)),
    };
    Failure::from(error).with_context("patch_file", json!(file.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit_codes::ExitCode;
    use oj_config::{ConfigSource, StorePlace};
    use std::fs;
    use tempfile::TempDir;

    const CONFIG: &str = r#"{"lang": "en", "store_place": "file", "cache_place": "redis",
        "login_methods": ["pwd"], "pass_store": "hashed", "hash_func": "bcrypt",
        "container_port": 8080, "testcase_strict": "loose",
        "compress_threshold": 0, "judge_server": ["a:1"], "judge_mode": 0}"#;

    fn setup(patch: &str) -> (TempDir, LoadedConfig, std::path::PathBuf) {
        setup_with(CONFIG, patch)
    }

    fn setup_with(config: &str, patch: &str) -> (TempDir, LoadedConfig, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.json");
        fs::write(&config_path, config).unwrap();
        let patch_path = dir.path().join("patch.json");
        fs::write(&patch_path, patch).unwrap();
        let loaded = oj_config::load_with_provenance(&config_path, ConfigSource::CliArgument).unwrap();
        (dir, loaded, patch_path)
    }

    #[test]
    fn test_dry_run_leaves_file_untouched() {
        let (_dir, loaded, patch_path) = setup(r#"{"store_place": "sql"}"#);
        let out = run(&loaded, &patch_path, false).unwrap();
        assert_eq!(out.data["config"]["store_place"], "sql");
        assert_eq!(out.data["written"], false);
        assert_eq!(fs::read_to_string(&loaded.path).unwrap(), CONFIG);
    }

    #[test]
    fn test_write_persists_and_reloads() {
        let (_dir, loaded, patch_path) = setup(r#"{"store_place": "sql", "hash_func": "none"}"#);
        let out = run(&loaded, &patch_path, true).unwrap();
        assert_eq!(out.data["changed"], json!(["store_place", "hash_func"]));

        let reloaded = oj_config::load(&loaded.path).unwrap();
        assert_eq!(reloaded.store_place, StorePlace::Sql);
        assert_eq!(reloaded.hash_func, None);
        assert_eq!(reloaded.lang, "en");
    }

    #[test]
    fn test_unknown_key_maps_to_unknown_key_exit() {
        let (_dir, loaded, patch_path) = setup(r#"{"stor_place": "sql"}"#);
        let failure = run(&loaded, &patch_path, false).unwrap_err();
        assert_eq!(failure.exit_code(), ExitCode::UnknownKey);
    }

    #[test]
    fn test_invalid_value_maps_to_invalid_exit() {
        let (_dir, loaded, patch_path) = setup(r#"{"container_port": 70000}"#);
        let failure = run(&loaded, &patch_path, true).unwrap_err();
        assert_eq!(failure.exit_code(), ExitCode::ConfigInvalid);
        assert_eq!(fs::read_to_string(&loaded.path).unwrap(), CONFIG);
    }

    #[test]
    fn test_missing_patch_file_is_argument_error() {
        let (dir, loaded, _) = setup("{}");
        let failure = run(&loaded, &dir.path().join("absent.json"), false).unwrap_err();
        assert_eq!(failure.exit_code(), ExitCode::ArgsError);
    }

    #[test]
    fn test_malformed_patch_is_parse_error() {
        let (_dir, loaded, patch_path) = setup("{\"lang\": ");
        let failure = run(&loaded, &patch_path, false).unwrap_err();
        assert_eq!(failure.exit_code(), ExitCode::ConfigParse);
    }

    #[test]
    fn test_write_keeps_unrecognized_keys() {
        let config = CONFIG.replacen('{', r#"{"theme": "dark", "#, 1);
        let (dir, loaded, patch_path) = setup_with(&config, r#"{"judge_mode": 1}"#);
        let out = run(&loaded, &patch_path, true).unwrap();
        assert_eq!(out.data["preserved_keys"], json!(["theme"]));

        let on_disk: Value = serde_json::from_str(&fs::read_to_string(&loaded.path).unwrap()).unwrap();
        assert_eq!(on_disk["theme"], "dark");
        assert_eq!(on_disk["judge_mode"], 1);
        assert!(!dir.path().join("config.json.tmp").exists());
        assert_eq!(oj_config::load(&loaded.path).unwrap().judge_mode.value(), 1);
    }
}
