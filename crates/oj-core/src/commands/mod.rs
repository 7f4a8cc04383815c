//! Command implementations.
//!
//! Commands that need the configuration take it by reference; it is loaded
//! once in `main` before dispatch. `check` is the exception because it
//! reports load failures itself.

pub mod check;
pub mod clean;
pub mod distribute;
pub mod patch;
pub mod schema;
pub mod show;
pub mod snapshot;

use serde_json::json;

use crate::output::CommandOutput;

/// Version information.
pub fn version() -> CommandOutput {
    let version = env!("CARGO_PKG_VERSION");
    CommandOutput {
        data: json!({
            "oj_core_version": version,
            "config_schema_version": oj_config::CONFIG_SCHEMA_VERSION,
            "rust_version": env!("CARGO_PKG_RUST_VERSION"),
        }),
        markdown: format!(
            "oj-core {}\n\nconfig schema version: {}\n",
            version,
            oj_config::CONFIG_SCHEMA_VERSION
        ),
        summary: format!("oj-core {}", version),
    }
}
