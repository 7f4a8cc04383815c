//! `clean <DIR>`: empty a working directory, keeping the directory itself.

use std::fs;
use std::path::Path;

use oj_common::{clear_directory, Error};
use serde_json::json;

use crate::logging::event_names;
use crate::output::{CommandOutput, CommandResult};

pub fn run(dir: &Path) -> CommandResult {
    if !dir.is_dir() {
        return Err(Error::InvalidArgument(format!("not a directory: {}", dir.display())).into());
    }

    let removed = fs::read_dir(dir)?.count();
    clear_directory(dir)?;

    tracing::info!(
        event = event_names::DIRECTORY_CLEARED,
        path = %dir.display(),
        removed,
        "directory cleared"
    );

    Ok(CommandOutput {
        data: json!({ "path": dir.display().to_string(), "removed": removed }),
        markdown: format!("Cleared `{}` ({} entries removed).\n", dir.display(), removed),
        summary: format!("cleared {} ({} entries)", dir.display(), removed),
    })
}
