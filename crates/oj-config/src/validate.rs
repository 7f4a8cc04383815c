//! Configuration validation errors and the declarative field schema.
//!
//! Raw documents are checked against [`SCHEMA`] before typed
//! deserialization, so every failure names the offending field and, for
//! closed sets, the allowed values.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::types::{
    CachePlace, Configuration, JudgeMode, LoginMethod, PassStore, StorePlace,
    TestcaseStrictness,
};

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("configuration must be a JSON object, got {found}")]
    NotAnObject { found: &'static str },

    #[error("missing required field: {field}")]
    MissingField { field: String },

    #[error("unrecognized field: {field}")]
    UnknownField { field: String },

    #[error("{field}: expected {expected}, got {found}")]
    WrongType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{field}: {value} is not one of [{}]", .allowed.join(", "))]
    NotAllowed {
        field: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("{field}: {value} is out of range ({message})")]
    OutOfRange {
        field: String,
        value: String,
        message: String,
    },

    #[error("{field}: must not be empty")]
    Empty { field: String },

    #[error("schema mismatch: {0}")]
    Schema(String),
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::NotAnObject { .. } => 70,
            ValidationError::MissingField { .. } => 71,
            ValidationError::UnknownField { .. } => 72,
            ValidationError::WrongType { .. } => 73,
            ValidationError::NotAllowed { .. } => 74,
            ValidationError::OutOfRange { .. } => 75,
            ValidationError::Empty { .. } => 76,
            ValidationError::Schema(_) => 77,
        }
    }

    /// Name of the offending field, when there is one.
    ///
    /// List elements are reported as `field[index]`.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::MissingField { field }
            | ValidationError::UnknownField { field }
            | ValidationError::WrongType { field, .. }
            | ValidationError::NotAllowed { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::Empty { field } => Some(field),
            ValidationError::NotAnObject { .. } | ValidationError::Schema(_) => None,
        }
    }
}

/// Constraint attached to one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Any string.
    Text,
    /// A string from a closed set.
    OneOf(&'static [&'static str]),
    /// `null` or a string from a closed set.
    OptionalOneOf(&'static [&'static str]),
    /// A list whose every element is a string from a closed set.
    ListOf(&'static [&'static str]),
    /// An integer in `1..=65535`.
    Port,
    /// An integer `>= 0`.
    NonNegativeInt,
    /// A non-empty list of non-blank strings.
    Addresses,
    /// An integer from a closed set.
    IntOneOf(&'static [u8]),
}

/// One entry of the document schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub rule: FieldRule,
    pub required: bool,
}

impl FieldSpec {
    const fn required(name: &'static str, rule: FieldRule) -> Self {
        FieldSpec {
            name,
            rule,
            required: true,
        }
    }

    const fn optional(name: &'static str, rule: FieldRule) -> Self {
        FieldSpec {
            name,
            rule,
            required: false,
        }
    }
}

/// Allowed spellings for `hash_func`, including the explicit "none".
pub const HASH_FUNC_CHOICES: &[&str] = &[
    "none", "bcrypt", "argon2", "scrypt", "pbkdf2", "sha512", "sha256",
];

/// The configuration document schema, in document order.
pub const SCHEMA: &[FieldSpec] = &[
    FieldSpec::required("lang", FieldRule::Text),
    FieldSpec::required("store_place", FieldRule::OneOf(StorePlace::LITERALS)),
    FieldSpec::required("cache_place", FieldRule::OneOf(CachePlace::LITERALS)),
    FieldSpec::required("login_methods", FieldRule::ListOf(LoginMethod::LITERALS)),
    FieldSpec::required("pass_store", FieldRule::OneOf(PassStore::LITERALS)),
    FieldSpec::optional("hash_func", FieldRule::OptionalOneOf(HASH_FUNC_CHOICES)),
    FieldSpec::required("container_port", FieldRule::Port),
    FieldSpec::required(
        "testcase_strict",
        FieldRule::OneOf(TestcaseStrictness::LITERALS),
    ),
    FieldSpec::required("compress_threshold", FieldRule::NonNegativeInt),
    FieldSpec::required("judge_server", FieldRule::Addresses),
    FieldSpec::required("judge_mode", FieldRule::IntOneOf(JudgeMode::ALLOWED)),
];

/// Validate a full document, returning the first violation in schema order.
pub fn validate_document(doc: &Value) -> ValidationResult<()> {
    match collect_violations(doc).into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Every violation in a full document, in schema order.
pub fn collect_violations(doc: &Value) -> Vec<ValidationError> {
    let map = match as_object(doc) {
        Ok(map) => map,
        Err(err) => return vec![err],
    };

    let mut errors = Vec::new();
    for entry in SCHEMA {
        match map.get(entry.name) {
            Some(value) => check_rule(entry.name, entry.rule, value, &mut errors),
            None if entry.required => errors.push(ValidationError::MissingField {
                field: entry.name.to_string(),
            }),
            None => {}
        }
    }
    errors
}

/// Validate a partial document: only present, non-null keys are checked.
///
/// Keys outside the schema are rejected so that a misspelled key in a
/// patch does not silently do nothing.
pub fn validate_partial_document(doc: &Value) -> ValidationResult<()> {
    let map = as_object(doc)?;

    if let Some(key) = unknown_fields(map).into_iter().next() {
        return Err(ValidationError::UnknownField { field: key });
    }

    let mut errors = Vec::new();
    for entry in SCHEMA {
        if let Some(value) = map.get(entry.name).filter(|v| !v.is_null()) {
            check_rule(entry.name, entry.rule, value, &mut errors);
        }
    }
    match errors.into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Keys in `map` that the schema does not know, sorted.
pub fn unknown_fields(map: &Map<String, Value>) -> Vec<String> {
    let mut keys: Vec<String> = map
        .keys()
        .filter(|k| !SCHEMA.iter().any(|entry| entry.name == k.as_str()))
        .cloned()
        .collect();
    keys.sort();
    keys
}

/// Range checks on an already typed configuration.
pub fn validate_configuration(config: &Configuration) -> ValidationResult<()> {
    if config.container_port == 0 {
        return Err(ValidationError::OutOfRange {
            field: "container_port".to_string(),
            value: "0".to_string(),
            message: "must be in 1..=65535".to_string(),
        });
    }

    if config.judge_server.is_empty() {
        return Err(ValidationError::Empty {
            field: "judge_server".to_string(),
        });
    }

    for (idx, address) in config.judge_server.iter().enumerate() {
        if address.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: format!("judge_server[{}]", idx),
            });
        }
    }

    if !config.judge_mode.is_valid() {
        return Err(ValidationError::NotAllowed {
            field: "judge_mode".to_string(),
            value: config.judge_mode.to_string(),
            allowed: JudgeMode::ALLOWED.iter().map(|v| v.to_string()).collect(),
        });
    }

    Ok(())
}

fn as_object(doc: &Value) -> ValidationResult<&Map<String, Value>> {
    doc.as_object().ok_or(ValidationError::NotAnObject {
        found: json_type(doc),
    })
}

fn check_rule(field: &str, rule: FieldRule, value: &Value, errors: &mut Vec<ValidationError>) {
    let result = match rule {
        FieldRule::Text => expect_str(field, value).map(|_| ()),
        FieldRule::OneOf(allowed) => check_one_of(field, value, allowed),
        FieldRule::OptionalOneOf(allowed) => {
            if value.is_null() {
                Ok(())
            } else {
                check_one_of(field, value, allowed)
            }
        }
        FieldRule::ListOf(allowed) => match value.as_array() {
            Some(items) => {
                for (idx, item) in items.iter().enumerate() {
                    if let Err(err) = check_one_of(&format!("{}[{}]", field, idx), item, allowed) {
                        errors.push(err);
                    }
                }
                Ok(())
            }
            None => Err(wrong_type(field, "array", value)),
        },
        FieldRule::Port => check_integer(field, value, 1, u64::from(u16::MAX)),
        FieldRule::NonNegativeInt => check_integer(field, value, 0, u64::MAX),
        FieldRule::Addresses => match value.as_array() {
            Some(items) if items.is_empty() => Err(ValidationError::Empty {
                field: field.to_string(),
            }),
            Some(items) => {
                for (idx, item) in items.iter().enumerate() {
                    let item_field = format!("{}[{}]", field, idx);
                    match expect_str(&item_field, item) {
                        Ok(s) if s.trim().is_empty() => {
                            errors.push(ValidationError::Empty { field: item_field })
                        }
                        Ok(_) => {}
                        Err(err) => errors.push(err),
                    }
                }
                Ok(())
            }
            None => Err(wrong_type(field, "array", value)),
        },
        FieldRule::IntOneOf(allowed) => match value.as_u64() {
            Some(n) if allowed.iter().any(|a| u64::from(*a) == n) => Ok(()),
            Some(_) | None if value.is_number() => Err(ValidationError::NotAllowed {
                field: field.to_string(),
                value: value.to_string(),
                allowed: allowed.iter().map(|a| a.to_string()).collect(),
            }),
            _ => Err(wrong_type(field, "integer", value)),
        },
    };

    if let Err(err) = result {
        errors.push(err);
    }
}

fn check_one_of(field: &str, value: &Value, allowed: &[&str]) -> ValidationResult<()> {
    let s = expect_str(field, value)?;
    if allowed.contains(&s) {
        Ok(())
    } else {
        Err(ValidationError::NotAllowed {
            field: field.to_string(),
            value: value.to_string(),
            allowed: allowed.iter().map(|a| a.to_string()).collect(),
        })
    }
}

fn check_integer(field: &str, value: &Value, min: u64, max: u64) -> ValidationResult<()> {
    let range = || {
        if max == u64::MAX {
            format!("must be >= {}", min)
        } else {
            format!("must be in {}..={}", min, max)
        }
    };

    if let Some(n) = value.as_u64() {
        if n < min || n > max {
            return Err(ValidationError::OutOfRange {
                field: field.to_string(),
                value: value.to_string(),
                message: range(),
            });
        }
        return Ok(());
    }

    if value.as_i64().is_some() {
        // Negative integer
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value: value.to_string(),
            message: range(),
        });
    }

    Err(wrong_type(field, "integer", value))
}

fn expect_str<'a>(field: &str, value: &'a Value) -> ValidationResult<&'a str> {
    value.as_str().ok_or_else(|| wrong_type(field, "string", value))
}

fn wrong_type(field: &str, expected: &'static str, value: &Value) -> ValidationError {
    ValidationError::WrongType {
        field: field.to_string(),
        expected,
        found: json_type(value),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
