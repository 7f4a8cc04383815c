//! `snapshot`: record which configuration bytes this run used.

use oj_config::LoadedConfig;

use crate::output::{markdown_table, CommandOutput, CommandResult};

pub fn run(loaded: &LoadedConfig) -> CommandResult {
    let snapshot = loaded.snapshot();
    let data = serde_json::to_value(&snapshot).map_err(oj_common::Error::from)?;

    let rows = vec![
        ("taken at".to_string(), snapshot.timestamp.to_rfc3339()),
        (
            "hostname".to_string(),
            snapshot.hostname.clone().unwrap_or_else(|| "-".to_string()),
        ),
        ("path".to_string(), snapshot.config_path.clone()),
        ("source".to_string(), snapshot.config_source.clone()),
        ("sha256".to_string(), snapshot.sha256.clone()),
        ("store".to_string(), snapshot.summary.store_place.clone()),
        (
            "judge servers".to_string(),
            snapshot.summary.judge_server_count.to_string(),
        ),
    ];

    Ok(CommandOutput {
        markdown: markdown_table("Configuration Snapshot", &rows),
        summary: format!("snapshot {} ({})", snapshot.short_id(), snapshot.config_path),
        data,
    })
}
