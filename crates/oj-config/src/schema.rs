//! JSON Schema generation for the configuration document.
//!
//! ```bash
//! oj-core schema            # full document
//! oj-core schema --patch    # partial update document
//! ```

use schemars::{json_schema, schema_for, Schema, SchemaGenerator};
use serde_json::Value;

use crate::partial::ConfigurationPatch;
use crate::types::Configuration;
use crate::validate::HASH_FUNC_CHOICES;

/// Schema for a complete `config.json`.
pub fn config_json_schema() -> Result<Value, serde_json::Error> {
    serde_json::to_value(schema_for!(Configuration))
}

/// Schema for a partial update document.
pub fn patch_json_schema() -> Result<Value, serde_json::Error> {
    serde_json::to_value(schema_for!(ConfigurationPatch))
}

/// `hash_func` accepts the hash names, the literal `"none"`, or `null`.
pub(crate) fn hash_func_schema(_generator: &mut SchemaGenerator) -> Schema {
    let mut choices: Vec<Value> = HASH_FUNC_CHOICES.iter().map(|c| Value::from(*c)).collect();
    choices.push(Value::Null);
    json_schema!({
        "description": "Password hash function; \"none\" or null disables hashing.",
        "type": ["string", "null"],
        "enum": choices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{FieldRule, SCHEMA};
    use serde_json::json;

    /// Follow a local `$ref` into `$defs`.
    fn resolve<'a>(root: &'a Value, node: &'a Value) -> &'a Value {
        match node.get("$ref").and_then(|r| r.as_str()) {
            Some(reference) => {
                let name = reference.rsplit('/').next().unwrap_or_default();
                &root["$defs"][name]
            }
            None => node,
        }
    }

    /// String literals a node accepts, sorted. Handles both `enum` and
    /// `oneOf` of `const` (documented variants).
    fn allowed_strings(node: &Value) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        if let Some(values) = node["enum"].as_array() {
            out.extend(values.iter().filter_map(|v| v.as_str()));
        }
        if let Some(literal) = node["const"].as_str() {
            out.push(literal);
        }
        if let Some(branches) = node["oneOf"].as_array() {
            for branch in branches {
                out.extend(allowed_strings(branch));
            }
        }
        out.sort_unstable();
        out
    }

    fn sorted<'a>(literals: &[&'a str]) -> Vec<&'a str> {
        let mut out = literals.to_vec();
        out.sort_unstable();
        out
    }

    #[test]
    fn test_config_schema_requires_core_fields() {
        let schema = config_json_schema().unwrap();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert!(required.contains(&"store_place"));
        assert!(required.contains(&"judge_server"));
        assert!(!required.contains(&"hash_func"));
    }

    #[test]
    fn test_config_schema_lists_every_field() {
        let schema = config_json_schema().unwrap();
        let props = schema["properties"].as_object().unwrap();
        for key in Configuration::FIELD_NAMES {
            assert!(props.contains_key(key), "missing property {key}");
        }
    }

    #[test]
    fn test_patch_schema_requires_nothing() {
        let schema = patch_json_schema().unwrap();
        let required = schema
            .get("required")
            .and_then(|v| v.as_array())
            .map(|v| v.len())
            .unwrap_or(0);
        assert_eq!(required, 0);
        assert!(schema["properties"].get("container_port").is_some());
    }

    #[test]
    fn test_config_schema_agrees_with_validation_rules() {
        let schema = config_json_schema().unwrap();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();

        for entry in SCHEMA {
            let node = resolve(&schema, &schema["properties"][entry.name]);
            assert!(node.is_object(), "no schema for {}", entry.name);
            assert_eq!(required.contains(&entry.name), entry.required, "{}", entry.name);

            match entry.rule {
                FieldRule::Text => assert_eq!(node["type"], "string"),
                FieldRule::OneOf(allowed) => {
                    assert_eq!(allowed_strings(node), sorted(allowed), "{}", entry.name)
                }
                FieldRule::OptionalOneOf(allowed) => {
                    assert_eq!(allowed_strings(node), sorted(allowed), "{}", entry.name);
                    assert!(node["enum"].as_array().unwrap().contains(&Value::Null));
                }
                FieldRule::ListOf(allowed) => {
                    assert_eq!(node["type"], "array");
                    let items = resolve(&schema, &node["items"]);
                    assert_eq!(allowed_strings(items), sorted(allowed), "{}", entry.name);
                }
                FieldRule::Port => {
                    assert_eq!(node["minimum"], 1);
                    assert_eq!(node["maximum"], 65535);
                }
                FieldRule::NonNegativeInt => {
                    assert_eq!(node["type"], "integer");
                    assert_eq!(node["minimum"], 0);
                }
                FieldRule::Addresses => {
                    assert_eq!(node["type"], "array");
                    assert_eq!(node["minItems"], 1);
                    assert_eq!(node["items"]["pattern"], r"\S");
                }
                FieldRule::IntOneOf(allowed) => {
                    assert_eq!(node["type"], "integer");
                    assert_eq!(node["enum"], json!(allowed), "{}", entry.name);
                }
            }
        }
    }

    #[test]
    fn test_patch_schema_keeps_field_limits() {
        let schema = patch_json_schema().unwrap();
        let props = &schema["properties"];
        assert_eq!(props["container_port"]["minimum"], 1);
        assert_eq!(props["judge_server"]["minItems"], 1);
        assert!(allowed_strings(&props["hash_func"]).contains(&"none"));
        assert_eq!(schema["$defs"]["JudgeMode"]["enum"], json!([0, 1]));
    }
}
