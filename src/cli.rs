//! Command-line interface for quarterdiff

use crate::column::{parse_column_list, ColumnRef};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quarterdiff")]
#[command(about = "Highlight what changed between two versions of a table")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to ./quarterdiff.json when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare a newer table against an older one
    Compare {
        /// Older (baseline) table
        baseline: PathBuf,

        /// Newer (current) table
        current: PathBuf,

        /// Columns to compare, e.g. "I,O,P,Q,R"
        #[arg(long, value_parser = parse_columns)]
        columns: Option<ColumnList>,

        /// Key column used to match rows, e.g. "B"
        #[arg(long, value_parser = parse_column)]
        key: Option<ColumnRef>,

        /// Columns that get a word-level diff when changed, e.g. "O,S,T"
        #[arg(long, value_parser = parse_columns)]
        word_diff: Option<ColumnList>,

        /// Output format: "pretty", "json"
        #[arg(long, default_value = "pretty")]
        format: String,

        /// Also write the JSON report to this file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Maximum changed rows listed in pretty output
        #[arg(long, default_value = "20")]
        limit: usize,

        /// Quiet output (machine-readable)
        #[arg(long)]
        quiet: bool,

        /// Disable progress bars
        #[arg(long)]
        no_progress: bool,
    },

    /// List a table's headers with their column letters
    Headers {
        /// Input file
        input: PathBuf,

        /// Output format: "pretty", "json"
        #[arg(long, default_value = "pretty")]
        format: String,
    },

    /// Write a default quarterdiff.json
    Init {
        /// Directory to write into (defaults to the current directory)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Overwrite an existing configuration
        #[arg(long)]
        force: bool,
    },
}

/// Parse output format string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {}. Use 'pretty' or 'json'", s)),
        }
    }
}

fn parse_column(s: &str) -> Result<ColumnRef, String> {
    ColumnRef::parse(s).map_err(|e| e.to_string())
}

/// A comma separated column selection given as one argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnList(pub Vec<ColumnRef>);

/// An explicitly empty list is kept so the comparator can reject it
fn parse_columns(s: &str) -> Result<ColumnList, String> {
    parse_column_list(s).map(ColumnList).map_err(|e| e.to_string())
}
