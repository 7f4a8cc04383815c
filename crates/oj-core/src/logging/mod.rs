//! Structured logging for oj-core.
//!
//! - Human-readable console output for interactive use
//! - JSON lines for supervisors and log shippers
//!
//! stdout is reserved for command payloads; every log line goes to stderr.

pub mod config;

pub use config::{LogConfig, LogFormat, LogLevel};

use std::io::IsTerminal;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Event names used as the `event` field of lifecycle logs.
pub mod event_names {
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";
    pub const CONFIG_ERROR: &str = "config.error";
    pub const CONFIG_PATCHED: &str = "config.patched";
    pub const DIRECTORY_CLEARED: &str = "directory.cleared";
}

/// Filter directive for our crates at `level`.
pub fn default_directive(level: LogLevel) -> String {
    format!("oj_core={level},oj_config={level},oj_common={level}")
}

/// Filter for `config`: its `RUST_LOG` directive when one survived and
/// parses, otherwise the level-derived directive.
pub fn build_filter(config: &LogConfig) -> EnvFilter {
    config
        .rust_log
        .as_deref()
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(default_directive(config.level)))
}

/// Initialize the logging subsystem.
///
/// Must be called once at startup before any logging occurs.
pub fn init_logging(config: &LogConfig) {
    let filter = build_filter(config);

    match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(use_ansi);

            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer)
                    .init();
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer.without_time())
                    .init();
            }
        }
        LogFormat::Jsonl => {
            let json_layer = fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(json_layer)
                .init();
        }
    }
}

/// Generate a unique run ID for this invocation.
pub fn generate_run_id() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("run-{}", &uuid.simple().to_string()[..12])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_run_id() {
        let id1 = generate_run_id();
        let id2 = generate_run_id();

        assert!(id1.starts_with("run-"));
        assert_eq!(id1.len(), 16);
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_default_directive_names_every_crate() {
        let directive = default_directive(LogLevel::Debug);
        assert!(directive.contains("oj_core=debug"));
        assert!(directive.contains("oj_config=debug"));
        assert!(EnvFilter::try_new(&directive).is_ok());
    }

    #[test]
    fn test_off_directive_parses() {
        assert!(EnvFilter::try_new(default_directive(LogLevel::Off)).is_ok());
    }

    #[test]
    fn test_filter_uses_level_when_rust_log_dropped() {
        let config = LogConfig {
            level: LogLevel::Error,
            ..LogConfig::default()
        };
        let filter = build_filter(&config).to_string();
        assert!(filter.contains("oj_core=error"), "{filter}");
    }

    #[test]
    fn test_filter_uses_surviving_rust_log() {
        let config = LogConfig {
            rust_log: Some("oj_config=trace".to_string()),
            ..LogConfig::default()
        };
        let filter = build_filter(&config).to_string();
        assert!(filter.contains("oj_config=trace"), "{filter}");
        assert!(!filter.contains("oj_core"), "{filter}");
    }
}
