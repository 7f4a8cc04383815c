//! Online judge common types, errors, and helpers.
//!
//! This crate provides foundational pieces shared across the workspace:
//! - Unified error taxonomy with stable codes
//! - Output format specifications
//! - JSON file I/O and directory clearing
//! - Sequence helpers (`chunks`, `chunk_bounds`, `find`)
//! - Compile-time partial models for partial updates

pub mod error;
pub mod files;
pub mod output;
pub mod partial;
pub mod seq;

pub use error::{format_error_human, Error, ErrorCategory, Result, StructuredError};
pub use files::{clear_directory, dumps, read_json, read_json_as, read_text, write_json};
pub use output::OutputFormat;
pub use partial::Partial;
pub use seq::{chunk_bounds, chunks, find, find_value, ChunkError};
