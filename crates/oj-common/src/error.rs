//! Error types for the online judge toolkit.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Remediation suggestions for operators
//!
//! # Human-Facing Output
//!
//! ```text
//! ✗ Invalid Configuration
//!   Reason: invalid configuration in data/config.json: store_place: "xml" is not one of [file, sql]
//!   Fix: Edit the named field in the configuration file, then run 'oj-core check'.
//! ```
//!
//! # Machine-Facing Output
//!
//! ```json
//! {
//!   "code": 12,
//!   "category": "config",
//!   "message": "invalid configuration in data/config.json: ...",
//!   "recoverable": true,
//!   "suggested_action": "fix_config",
//!   "context": { "path": "data/config.json" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for toolkit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Configuration file errors (missing, malformed, invalid).
    Config,
    /// Invalid arguments to a helper or command.
    Usage,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Usage => write!(f, "usage"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Suggested follow-up for whoever reads the error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    /// Create the missing configuration file.
    CreateConfig,
    /// Edit the configuration file.
    FixConfig,
    /// Run the validation command.
    RunCheck,
    /// Correct the command line.
    FixArguments,
    /// Retry the operation.
    Retry,
    /// Manual intervention required.
    ManualIntervention,
}

impl std::fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuggestedAction::CreateConfig => write!(f, "create_config"),
            SuggestedAction::FixConfig => write!(f, "fix_config"),
            SuggestedAction::RunCheck => write!(f, "run_check"),
            SuggestedAction::FixArguments => write!(f, "fix_arguments"),
            SuggestedAction::Retry => write!(f, "retry"),
            SuggestedAction::ManualIntervention => write!(f, "manual_intervention"),
        }
    }
}

/// Unified error type for the toolkit.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("malformed configuration: {0}")]
    ConfigParse(String),

    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("unknown configuration key: {key}")]
    UnknownKey { key: String },

    // Usage errors (30-39)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 30-39: Usage errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::ConfigNotFound { .. } => 10,
            Error::ConfigParse(_) => 11,
            Error::ConfigInvalid(_) => 12,
            Error::UnknownKey { .. } => 13,
            Error::InvalidArgument(_) => 30,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::ConfigNotFound { .. }
            | Error::ConfigParse(_)
            | Error::ConfigInvalid(_)
            | Error::UnknownKey { .. } => ErrorCategory::Config,

            Error::InvalidArgument(_) => ErrorCategory::Usage,

            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether an operator can fix this without a code change.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::ConfigNotFound { .. } => true,
            Error::ConfigParse(_) => true,
            Error::ConfigInvalid(_) => true,
            Error::UnknownKey { .. } => true,
            Error::InvalidArgument(_) => true,
            Error::Io(_) => true,
            // Serializing our own types failed
            Error::Json(_) => false,
        }
    }

    /// Returns the suggested action.
    pub fn suggested_action(&self) -> SuggestedAction {
        match self {
            Error::ConfigNotFound { .. } => SuggestedAction::CreateConfig,
            Error::ConfigParse(_) => SuggestedAction::FixConfig,
            Error::ConfigInvalid(_) => SuggestedAction::FixConfig,
            Error::UnknownKey { .. } => SuggestedAction::FixArguments,
            Error::InvalidArgument(_) => SuggestedAction::FixArguments,
            Error::Io(_) => SuggestedAction::Retry,
            Error::Json(_) => SuggestedAction::ManualIntervention,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::ConfigNotFound { .. } => {
                "Create data/config.json under the working directory, or point OJ_CONFIG at the file."
            }
            Error::ConfigParse(_) => {
                "Fix the JSON syntax (trailing commas and comments are not allowed). Check with 'jq . <file>'."
            }
            Error::ConfigInvalid(_) => {
                "Edit the named field in the configuration file, then run 'oj-core check'."
            }
            Error::UnknownKey { .. } => {
                "Run 'oj-core show' to list the recognized configuration keys."
            }
            Error::InvalidArgument(_) => "Check the command arguments with '--help'.",
            Error::Io(_) => "Check that the path exists and that permissions allow access.",
            Error::Json(_) => "Internal serialization failure. Report it with the command that triggered it.",
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::ConfigNotFound { .. } => "Configuration Not Found",
            Error::ConfigParse(_) => "Malformed Configuration",
            Error::ConfigInvalid(_) => "Invalid Configuration",
            Error::UnknownKey { .. } => "Unknown Configuration Key",
            Error::InvalidArgument(_) => "Invalid Argument",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Serialization Error",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether an operator can fix the error.
    pub recoverable: bool,

    /// Suggested follow-up.
    pub suggested_action: SuggestedAction,

    /// Additional structured context (e.g., file path, key).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::ConfigNotFound { path } => {
                context.insert(
                    "path".to_string(),
                    serde_json::json!(path.display().to_string()),
                );
            }
            Error::UnknownKey { key } => {
                context.insert("key".to_string(), serde_json::json!(key));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            suggested_action: err.suggested_action(),
            context,
        }
    }
}

impl StructuredError {
    /// Add additional context to the error.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.context.insert(key.into(), v);
        }
        self
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }

    /// Serialize to pretty JSON string.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_json())
    }
}

/// Format an error for human-readable stderr output.
///
/// Output format:
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}
