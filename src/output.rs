//! Output formatting utilities

use crate::column::MatchKind;
use crate::comparator::{CellClass, CellResult, ComparisonResult, RowOutcome, RowResult};
use crate::error::Result;
use crate::table::{HashValue, Table};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};
use std::fs;
use std::path::Path;

/// Markers wrapped around different words in terminal output
const WORD_OPEN: &str = "«";
const WORD_CLOSE: &str = "»";

/// Where one side of the comparison came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub path: String,
    pub rows: usize,
    pub columns: usize,
    pub fingerprint: HashValue,
}

impl SourceInfo {
    pub fn describe(path: &Path, table: &Table) -> Self {
        Self {
            path: path.display().to_string(),
            rows: table.row_count(),
            columns: table.column_count(),
            fingerprint: table.fingerprint(),
        }
    }
}

/// Comparison result plus run metadata, the unit written to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub baseline: SourceInfo,
    pub current: SourceInfo,
    #[serde(flatten)]
    pub result: ComparisonResult,
}

impl ComparisonReport {
    pub fn new(baseline: SourceInfo, current: SourceInfo, result: ComparisonResult) -> Self {
        Self {
            version: crate::FORMAT_VERSION.to_string(),
            generated_at: Utc::now(),
            baseline,
            current,
            result,
        }
    }
}

/// Pretty printer for quarterdiff output
pub struct PrettyPrinter;

impl PrettyPrinter {
    /// Print a comparison report, listing at most `limit` changed rows
    pub fn print_report(report: &ComparisonReport, limit: usize) {
        print!("{}", Self::render_report(report, limit));
    }

    /// Render the report tree as printed by `print_report`
    pub fn render_report(report: &ComparisonReport, limit: usize) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail
        let _ = Self::write_report(&mut out, report, limit);
        out
    }

    fn write_report(out: &mut String, report: &ComparisonReport, limit: usize) -> fmt::Result {
        let result = &report.result;
        let summary = &result.summary;

        writeln!(out, "🔍 Comparison: {} → {}", report.baseline.path, report.current.path)?;
        writeln!(
            out,
            "├─ Key: '{}' ({}) ↔ '{}' {}",
            result.key.current_header,
            result.key.column,
            result.key.baseline_header,
            match_label(Some(result.key.match_kind))
        )?;

        writeln!(out, "├─ Columns:")?;
        let column_count = result.columns.len();
        for (i, (column, mapping)) in result.columns.iter().enumerate() {
            let marker = if i + 1 == column_count { "└─" } else { "├─" };
            let baseline = match &mapping.baseline_header {
                Some(h) => format!("'{}' {}", h, match_label(mapping.match_kind)),
                None => "not in baseline".to_string(),
            };
            let words = if mapping.word_diff { " [word diff]" } else { "" };
            writeln!(out, "│  {} {} '{}' → {}{}", marker, column, mapping.current_header, baseline, words)?;
        }

        if summary.new_rows > 0 {
            writeln!(out, "├─ 🆕 New rows: {}", summary.new_rows)?;
        } else {
            writeln!(out, "├─ ✅ New rows: none")?;
        }
        writeln!(out, "├─ ✏️  Changed cells: {}", summary.changed_cells)?;
        writeln!(out, "├─ 🧹 Cleared cells: {}", summary.cleared_cells)?;
        writeln!(out, "├─ ✅ Unchanged cells: {}", summary.unchanged_cells)?;
        if summary.unkeyed_rows > 0 {
            writeln!(out, "├─ ⚠️  Rows without a key (skipped): {}", summary.unkeyed_rows)?;
        }
        if summary.duplicate_baseline_keys > 0 {
            writeln!(out, "├─ ⚠️  Duplicate baseline keys: {}", summary.duplicate_baseline_keys)?;
        }
        writeln!(out, "└─ Rows checked: {}", summary.total_rows)?;

        if summary.has_changes() && limit > 0 {
            writeln!(out)?;
            Self::write_changed_rows(out, result, limit)?;
        }
        Ok(())
    }

    fn write_changed_rows(out: &mut String, result: &ComparisonResult, limit: usize) -> fmt::Result {
        let changed: Vec<&RowResult> = result.changed_rows().collect();
        let shown = changed.len().min(limit);

        writeln!(out, "📋 Changed rows")?;
        for (i, row) in changed.iter().take(shown).enumerate() {
            let is_last = i + 1 == shown && changed.len() <= shown;
            let (marker, indent) = if is_last { ("└─", "   ") } else { ("├─", "│  ") };

            match &row.outcome {
                RowOutcome::NewRow => {
                    writeln!(out, "{} Row {} [{}]: new row", marker, row.sheet_row, row.key)?;
                }
                RowOutcome::Unkeyed => {}
                RowOutcome::Compared { .. } => {
                    writeln!(out, "{} Row {} [{}]", marker, row.sheet_row, row.key)?;
                    let cells: Vec<&CellResult> = row
                        .cells()
                        .iter()
                        .filter(|c| c.class != CellClass::Unchanged)
                        .collect();
                    for (j, cell) in cells.iter().enumerate() {
                        let cell_marker = if j + 1 == cells.len() { "└─" } else { "├─" };
                        writeln!(out, "{}{} {}", indent, cell_marker, describe_cell(cell))?;
                    }
                }
            }
        }

        if changed.len() > shown {
            writeln!(out, "└─ ... and {} more changed rows", changed.len() - shown)?;
        }
        Ok(())
    }

    /// Print machine-readable counters
    pub fn print_quiet(report: &ComparisonReport) {
        let summary = &report.result.summary;
        println!("rows={}", summary.total_rows);
        println!("new_rows={}", summary.new_rows);
        println!("changed_cells={}", summary.changed_cells);
        println!("cleared_cells={}", summary.cleared_cells);
        println!("unchanged_cells={}", summary.unchanged_cells);
    }

    /// Print a table's header row with column letters
    pub fn print_headers(path: &Path, table: &Table) {
        println!("📄 {} ({} rows)", path.display(), table.row_count());
        let headers = table.lettered_headers();
        if headers.is_empty() {
            println!("└─ No columns found.");
            return;
        }
        for (i, (letter, header)) in headers.iter().enumerate() {
            let prefix = if i + 1 == headers.len() { "└─" } else { "├─" };
            println!("{} {}: {}", prefix, letter, header);
        }
    }
}

fn match_label(kind: Option<MatchKind>) -> &'static str {
    match kind {
        Some(MatchKind::Exact) => "[exact]",
        Some(MatchKind::Normalized) => "[normalized]",
        None => "",
    }
}

/// One-line description of a non-unchanged cell
fn describe_cell(cell: &CellResult) -> String {
    let column = cell.letter.clone().unwrap_or_else(|| cell.column.to_string());
    match cell.class {
        CellClass::Cleared => format!("{}: cleared (was '{}')", column, cell.baseline_value),
        CellClass::Changed => match &cell.word_diff {
            Some(diff) => format!(
                "{}: '{}' → {}",
                column,
                cell.baseline_value,
                diff.render(WORD_OPEN, WORD_CLOSE)
            ),
            None => format!("{}: '{}' → '{}'", column, cell.baseline_value, cell.current_value),
        },
        CellClass::Unchanged | CellClass::NewRow => format!("{}: '{}'", column, cell.current_value),
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format any serializable data as JSON
    pub fn format<T: serde::Serialize + ?Sized>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }

    /// Format the headers of a table as `{letter: header}`
    pub fn format_headers(table: &Table) -> Result<String> {
        let headers: indexmap::IndexMap<String, &str> = table.lettered_headers().into_iter().collect();
        Self::format(&headers)
    }
}

/// Writes reports to disk
pub struct OutputManager;

impl OutputManager {
    pub fn write_report(report: &ComparisonReport, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, JsonFormatter::format(report)?)?;
        log::info!("Saved report: {}", path.display());
        Ok(())
    }
}
