//! `schema [--patch]`: print the JSON Schema of the configuration document.

use oj_config::{config_json_schema, patch_json_schema};

use crate::output::{CommandOutput, CommandResult};

pub fn run(patch: bool) -> CommandResult {
    let (schema, name) = if patch {
        (patch_json_schema(), "ConfigurationPatch")
    } else {
        (config_json_schema(), "Configuration")
    };
    let schema = schema.map_err(oj_common::Error::from)?;

    let pretty = serde_json::to_string_pretty(&schema).map_err(oj_common::Error::from)?;
    let properties = schema
        .get("properties")
        .and_then(|p| p.as_object())
        .map(|p| p.len())
        .unwrap_or(0);

    Ok(CommandOutput {
        markdown: format!("# {} schema\n\n```json\n{}\n```\n", name, pretty),
        summary: format!("{} schema: {} properties", name, properties),
        data: schema,
    })
}
