//! Exit codes for the oj-core CLI.
//!
//! Exit codes communicate operation outcome without requiring output parsing.
//!
//! Exit code ranges:
//! - 0: Success
//! - 2: Usage errors (also what clap uses for bad arguments)
//! - 10-19: Configuration and environment errors (recoverable by the operator)
//! - 20-29: Internal errors (bugs, should be reported)

use oj_common::Error;

/// Exit codes for oj-core operations.
///
/// These codes are a stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Clean = 0,

    /// Invalid arguments.
    ArgsError = 2,

    /// Configuration file does not exist.
    ConfigNotFound = 10,

    /// Configuration file is not valid JSON.
    ConfigParse = 11,

    /// Configuration violates the schema.
    ConfigInvalid = 12,

    /// A key that is not part of the configuration was requested.
    UnknownKey = 13,

    /// File system error.
    IoError = 14,

    /// Internal error (bug - please report).
    InternalError = 20,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Clean
    }

    /// Check if this exit code is an operator-fixable error (codes 10-19).
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&(self as i32))
    }

    /// Check if this exit code is an internal error (codes 20-29).
    pub fn is_internal_error(self) -> bool {
        (self as i32) >= 20
    }

    /// Get the code name as a string constant (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ConfigNotFound => "ERR_CONFIG_NOT_FOUND",
            ExitCode::ConfigParse => "ERR_CONFIG_PARSE",
            ExitCode::ConfigInvalid => "ERR_CONFIG_INVALID",
            ExitCode::UnknownKey => "ERR_UNKNOWN_KEY",
            ExitCode::IoError => "ERR_IO",
            ExitCode::InternalError => "ERR_INTERNAL",
        }
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::ConfigNotFound { .. } => ExitCode::ConfigNotFound,
            Error::ConfigParse(_) => ExitCode::ConfigParse,
            Error::ConfigInvalid(_) => ExitCode::ConfigInvalid,
            Error::UnknownKey { .. } => ExitCode::UnknownKey,
            Error::InvalidArgument(_) => ExitCode::ArgsError,
            Error::Io(_) => ExitCode::IoError,
            Error::Json(_) => ExitCode::InternalError,
        }
    }
}
