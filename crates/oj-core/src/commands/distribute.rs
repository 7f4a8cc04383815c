//! `distribute --testcases N [--locate ID]`: spread testcases across judges.
//!
//! Testcase ids `1..=N` are split into one contiguous block per judge
//! server, in `judge_server` order, with earlier servers taking the
//! remainder. Blocks are computed as id ranges, so `N` may be any `u64`.

use oj_common::{chunk_bounds, Error};
use oj_config::Configuration;
use serde::Serialize;
use serde_json::json;

use crate::output::{markdown_table, CommandOutput, CommandResult};

/// Testcases assigned to one judge server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub server: String,
    /// First testcase id; `None` when the server gets nothing.
    pub first: Option<u64>,
    pub last: Option<u64>,
    pub count: u64,
}

impl Assignment {
    pub fn contains(&self, id: u64) -> bool {
        matches!((self.first, self.last), (Some(first), Some(last)) if (first..=last).contains(&id))
    }
}

/// Split testcases `1..=testcases` across the configured judge servers.
pub fn plan(config: &Configuration, testcases: u64) -> Result<Vec<Assignment>, Error> {
    let bounds = chunk_bounds(testcases, config.judge_server.len())
        .map_err(|e| Error::ConfigInvalid(format!("judge_server: {}", e)))?;

    Ok(config
        .judge_server
        .iter()
        .zip(bounds)
        .map(|(server, offsets)| {
            let count = offsets.end - offsets.start;
            Assignment {
                server: server.clone(),
                first: (count > 0).then_some(offsets.start + 1),
                last: (count > 0).then_some(offsets.end),
                count,
            }
        })
        .collect())
}

/// The assignment holding testcase `id`, if any.
pub fn locate(assignments: &[Assignment], id: u64) -> Option<&Assignment> {
    assignments.iter().find(|a| a.contains(id))
}

pub fn run(config: &Configuration, testcases: u64, locate_id: Option<u64>) -> CommandResult {
    let assignments = plan(config, testcases)?;

    if let Some(id) = locate_id {
        let assignment = locate(&assignments, id).ok_or_else(|| {
            Error::InvalidArgument(format!("testcase {} is not in 1..={}", id, testcases))
        })?;
        return Ok(CommandOutput {
            data: json!({ "testcase": id, "server": assignment.server }),
            markdown: format!("Testcase {} runs on `{}`.\n", id, assignment.server),
            summary: format!("testcase {} -> {}", id, assignment.server),
        });
    }

    let rows: Vec<(String, String)> = assignments
        .iter()
        .map(|a| (a.server.clone(), describe_range(a)))
        .collect();

    Ok(CommandOutput {
        data: json!({
            "testcases": testcases,
            "servers": assignments.len(),
            "assignments": assignments,
        }),
        markdown: markdown_table("Testcase Distribution", &rows),
        summary: format!(
            "{} testcases across {} judge servers",
            testcases,
            assignments.len()
        ),
    })
}

fn describe_range(assignment: &Assignment) -> String {
    match (assignment.first, assignment.last) {
        (Some(first), Some(last)) if first == last => format!("{} (1)", first),
        (Some(first), Some(last)) => format!("{}-{} ({})", first, last, assignment.count),
        _ => "none".to_string(),
    }
}
