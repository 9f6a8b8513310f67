//! # quarterdiff
//!
//! Compares a newer version of a table against an older one. Rows are matched
//! on a key column, selected cells are classified as unchanged, changed or
//! cleared, unmatched keys are flagged as new rows, and changed text in chosen
//! columns gets a positional word-level diff.

pub mod cli;
pub mod column;
pub mod commands;
pub mod comparator;
pub mod config;
pub mod data;
pub mod duckdb_config;
pub mod error;
pub mod output;
pub mod progress;
pub mod table;
pub mod word_diff;

pub use column::ColumnRef;
pub use comparator::{CellClass, CompareOptions, ComparisonResult, RowComparator, RowOutcome};
pub use error::{QuarterdiffError, Result};
pub use table::Table;
pub use word_diff::WordDiff;

/// Current format version for reports and configuration files
pub const FORMAT_VERSION: &str = "1.0.0";
