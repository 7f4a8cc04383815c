//! Partial configuration updates.

use oj_common::Partial;
use schemars::JsonSchema;

use crate::types::{
    CachePlace, Configuration, HashFunc, JudgeMode, LoginMethod, PassStore, StorePlace,
    TestcaseStrictness, HASH_FUNC_NONE,
};
use crate::validate::{validate_configuration, validate_partial_document, ValidationError};

oj_common::partial_model! {
    /// [`Configuration`] with every field optional; unset fields keep their value.
    #[derive(JsonSchema)]
    pub struct ConfigurationPatch for Configuration {
        lang: String,
        store_place: StorePlace,
        cache_place: CachePlace,
        login_methods: Vec<LoginMethod>,
        pass_store: PassStore,
        #[schemars(schema_with = "crate::schema::hash_func_schema")]
        hash_func: Option<HashFunc>,
        #[schemars(range(min = 1))]
        container_port: u16,
        testcase_strict: TestcaseStrictness,
        compress_threshold: u64,
        #[schemars(length(min = 1), inner(pattern(r"\S")))]
        judge_server: Vec<String>,
        judge_mode: JudgeMode,
    }
}

impl ConfigurationPatch {
    /// Parse and validate a partial document.
    ///
    /// Present keys follow the same rules as a full document; `null` means
    /// "leave unchanged".
    pub fn from_json_str(json: &str) -> Result<Self, PatchError> {
        let doc: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(doc)
    }

    /// Validate and convert an already parsed partial document.
    ///
    /// `"hash_func": "none"` clears the hash function.
    pub fn from_value(mut doc: serde_json::Value) -> Result<Self, PatchError> {
        validate_partial_document(&doc)?;

        let clear_hash = match doc.as_object_mut() {
            Some(map) if map.get("hash_func").and_then(|v| v.as_str()) == Some(HASH_FUNC_NONE) => {
                map.remove("hash_func");
                true
            }
            _ => false,
        };

        let mut patch: ConfigurationPatch = serde_json::from_value(doc)
            .map_err(|e| ValidationError::Schema(e.to_string()))?;
        if clear_hash {
            patch.hash_func = Some(None);
        }
        Ok(patch)
    }
}

/// Errors from reading a patch document.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error("invalid JSON in patch: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid patch: {0}")]
    Validation(#[from] ValidationError),
}

impl Configuration {
    /// Apply `patch` to a copy of `self` and re-validate the result.
    pub fn with_patch(&self, patch: ConfigurationPatch) -> Result<Configuration, ValidationError> {
        let updated = self.clone().patched(patch);
        validate_configuration(&updated)?;
        Ok(updated)
    }
}
