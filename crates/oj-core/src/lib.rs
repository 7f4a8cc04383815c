//! Online judge operator toolkit.
//!
//! The `oj-core` binary loads `data/config.json` once, then runs one of
//! the commands in [`commands`] against it.

pub mod commands;
pub mod exit_codes;
pub mod logging;
pub mod output;
