//! `show [KEY]`: print the configuration or a single key.

use oj_common::dumps;
use oj_config::Configuration;
use serde_json::{json, Value};

use crate::output::{markdown_table, CommandOutput, CommandResult, Failure};

pub fn run(config: &Configuration, key: Option<&str>) -> CommandResult {
    match key {
        Some(key) => show_key(config, key),
        None => show_all(config),
    }
}

fn show_key(config: &Configuration, key: &str) -> CommandResult {
    let value = config.get(key).map_err(|err| {
        Failure::from(err).with_context("known_keys", json!(Configuration::FIELD_NAMES))
    })?;

    Ok(CommandOutput {
        markdown: format!("{}\n", dumps(&value)),
        summary: format!("{}={}", key, dumps(&value)),
        data: json!({ "key": key, "value": value }),
    })
}

fn show_all(config: &Configuration) -> CommandResult {
    let data = serde_json::to_value(config).map_err(oj_common::Error::from)?;

    let mut rows = Vec::with_capacity(Configuration::FIELD_NAMES.len());
    for key in Configuration::FIELD_NAMES {
        let value = data.get(key).cloned().unwrap_or(Value::Null);
        rows.push((key.to_string(), dumps(&value)));
    }

    Ok(CommandOutput {
        markdown: markdown_table("Configuration", &rows),
        summary: format!(
            "store={} cache={} judges={} mode={}",
            config.store_place,
            config.cache_place,
            config.judge_server.len(),
            config.judge_mode
        ),
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit_codes::ExitCode;
    use std::path::Path;

    fn config() -> Configuration {
        oj_config::load_str(
            r#"{"lang": "en", "store_place": "sql", "cache_place": "redis",
                "login_methods": ["pwd", "facebook"], "pass_store": "hashed",
                "hash_func": "argon2", "container_port": 8080,
                "testcase_strict": "strict", "compress_threshold": 512,
                "judge_server": ["a:1", "b:2"], "judge_mode": 1}"#,
            Path::new("inline"),
        )
        .unwrap()
    }

    #[test]
    fn test_show_single_string_key_is_unquoted() {
        let out = run(&config(), Some("store_place")).unwrap();
        assert_eq!(out.summary, "store_place=sql");
        assert_eq!(out.data["value"], "sql");
    }

    #[test]
    fn test_show_list_key_is_json() {
        let out = run(&config(), Some("judge_server")).unwrap();
        assert_eq!(out.markdown, "[\"a:1\", \"b:2\"]\n");
    }

    #[test]
    fn test_show_unknown_key() {
        let failure = run(&config(), Some("theme")).unwrap_err();
        assert_eq!(failure.exit_code(), ExitCode::UnknownKey);
        assert_eq!(failure.context[0].0, "known_keys");
    }

    #[test]
    fn test_show_all_lists_every_key() {
        let out = run(&config(), None).unwrap();
        for key in Configuration::FIELD_NAMES {
            assert!(out.data.get(key).is_some(), "missing {key}");
            assert!(out.markdown.contains(&format!("| {} |", key)));
        }
        assert_eq!(out.summary, "store=sql cache=redis judges=2 mode=1");
    }
}
