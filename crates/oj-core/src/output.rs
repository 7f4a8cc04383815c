//! Command payloads and their rendering.
//!
//! Every command returns a [`CommandOutput`] or a [`Failure`]. Payloads go
//! to stdout; failures go to stderr. JSON output is wrapped in an envelope
//! carrying the run id and timestamp.

use std::io::{self, Write};

use oj_common::{format_error_human, Error, OutputFormat, StructuredError};
use oj_config::{ConfigError, CONFIG_SCHEMA_VERSION};
use serde_json::{json, Value};

use crate::exit_codes::ExitCode;

/// Successful command result in all three renderings.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Structured payload (the `data` field of the JSON envelope).
    pub data: Value,
    /// Markdown rendering.
    pub markdown: String,
    /// One-line summary.
    pub summary: String,
}

/// A failed command: the error plus structured context for the report.
#[derive(Debug)]
pub struct Failure {
    pub error: Error,
    pub context: Vec<(&'static str, Value)>,
}

impl Failure {
    pub fn with_context(mut self, key: &'static str, value: Value) -> Self {
        self.context.push((key, value));
        self
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(&self.error)
    }
}

impl From<Error> for Failure {
    fn from(error: Error) -> Self {
        Failure {
            error,
            context: Vec::new(),
        }
    }
}

impl From<ConfigError> for Failure {
    fn from(error: ConfigError) -> Self {
        Failure::from(Error::from(error))
    }
}

impl From<std::io::Error> for Failure {
    fn from(error: std::io::Error) -> Self {
        Failure::from(Error::Io(error))
    }
}

pub type CommandResult = Result<CommandOutput, Failure>;

/// Per-invocation rendering context.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub format: OutputFormat,
}

impl RunContext {
    /// Write a successful result.
    pub fn emit(&self, command: &str, output: &CommandOutput, out: &mut impl Write) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                let envelope = json!({
                    "schema_version": CONFIG_SCHEMA_VERSION,
                    "run_id": self.run_id,
                    "generated_at": chrono::Utc::now().to_rfc3339(),
                    "command": command,
                    "status": "ok",
                    "data": output.data,
                });
                writeln!(out, "{}", pretty(&envelope))
            }
            OutputFormat::Md => writeln!(out, "{}", output.markdown.trim_end()),
            OutputFormat::Summary => writeln!(out, "[{}] {}", self.run_id, output.summary),
        }
    }

    /// Write a failure report and return the exit code it maps to.
    pub fn emit_failure(&self, command: &str, failure: &Failure, out: &mut impl Write) -> io::Result<ExitCode> {
        let mut structured = StructuredError::from(&failure.error);
        for (key, value) in &failure.context {
            structured = structured.with_context(*key, value);
        }
        let exit_code = failure.exit_code();

        match self.format {
            OutputFormat::Json => {
                let envelope = json!({
                    "schema_version": CONFIG_SCHEMA_VERSION,
                    "run_id": self.run_id,
                    "generated_at": chrono::Utc::now().to_rfc3339(),
                    "command": command,
                    "status": "error",
                    "exit_code": exit_code.code_name(),
                    "error": structured,
                });
                writeln!(out, "{}", pretty(&envelope))?;
            }
            OutputFormat::Md => {
                writeln!(out, "{}", format_error_human(&failure.error, false))?;
                for (key, value) in &failure.context {
                    if let Value::Array(items) = value {
                        writeln!(out, "\n{}:", key)?;
                        for item in items {
                            let line = item
                                .get("message")
                                .map(oj_common::dumps)
                                .unwrap_or_else(|| oj_common::dumps(item));
                            writeln!(out, "- {}", line)?;
                        }
                    }
                }
            }
            OutputFormat::Summary => {
                writeln!(out, "[{}] {} error: {}", self.run_id, command, failure.error)?;
            }
        }

        Ok(exit_code)
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Markdown table of key/value rows.
pub fn markdown_table(title: &str, rows: &[(String, String)]) -> String {
    let mut md = format!("# {}\n\n| Key | Value |\n|---|---|\n", title);
    for (key, value) in rows {
        md.push_str(&format!("| {} | {} |\n", key, value.replace('|', "\\|")));
    }
    md
}
