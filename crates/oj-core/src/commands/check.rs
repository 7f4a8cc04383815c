//! `check`: resolve, load and validate the configuration.
//!
//! On a validation failure the whole document is re-examined so that every
//! violation is reported, not just the first.

use oj_common::Error;
use oj_config::resolve::resolve_config_path;
use oj_config::validate::collect_violations;
use oj_config::{load_with_provenance, ConfigError, ConfigOptions, ValidationError};
use serde_json::{json, Value};

use crate::output::{markdown_table, CommandOutput, CommandResult, Failure};

pub fn run(options: &ConfigOptions) -> CommandResult {
    let resolved = resolve_config_path(options);
    tracing::debug!(path = %resolved.path.display(), source = %resolved.source, "checking configuration");

    let loaded = match load_with_provenance(&resolved.path, resolved.source) {
        Ok(loaded) => loaded,
        Err(err) => return Err(failure_for(err)),
    };

    let config = &loaded.config;
    let data = json!({
        "valid": true,
        "path": loaded.path.display().to_string(),
        "source": loaded.source.to_string(),
        "sha256": loaded.sha256,
        "store_place": config.store_place,
        "judge_servers": config.judge_server.len(),
    });

    let rows = vec![
        ("path".to_string(), loaded.path.display().to_string()),
        ("source".to_string(), loaded.source.to_string()),
        ("sha256".to_string(), loaded.sha256.clone()),
        ("judge servers".to_string(), config.judge_server.len().to_string()),
    ];

    Ok(CommandOutput {
        data,
        markdown: markdown_table("Configuration OK", &rows),
        summary: format!("configuration ok: {}", loaded.path.display()),
    })
}

fn failure_for(err: ConfigError) -> Failure {
    let violations = match &err {
        ConfigError::Validation { path, source } => all_violations(path, source),
        _ => Vec::new(),
    };

    let failure = Failure::from(Error::from(err));
    if violations.is_empty() {
        failure
    } else {
        failure.with_context("violations", Value::Array(violations))
    }
}

/// Every violation in the document at `path`, falling back to `first`.
fn all_violations(path: &std::path::Path, first: &ValidationError) -> Vec<Value> {
    let mut errors = match oj_common::read_json(path) {
        Ok(doc) => collect_violations(&doc),
        Err(_) => Vec::new(),
    };
    // Typed range checks run after the document checks
    if errors.is_empty() {
        errors.push(first.clone());
    }
    errors.iter().map(violation_json).collect()
}

fn violation_json(err: &ValidationError) -> Value {
    json!({
        "code": err.code(),
        "field": err.field(),
        "message": err.to_string(),
    })
}
