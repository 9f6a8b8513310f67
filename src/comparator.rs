//! Key-matched row comparison between a baseline and a current table

use crate::column::{column_letter, ColumnRef, MatchKind};
use crate::error::{QuarterdiffError, Result};
use crate::table::Table;
use crate::word_diff::WordDiff;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Rows between two progress notifications
pub const PROGRESS_INTERVAL: usize = 500;

/// What the caller wants compared
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareOptions {
    pub key_column: ColumnRef,
    pub compare_columns: Vec<ColumnRef>,
    /// Columns whose changed cells also get a word diff
    pub word_diff_columns: Vec<ColumnRef>,
}

/// Classification of one cell, or of a whole row for `NewRow`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellClass {
    Unchanged,
    Changed,
    Cleared,
    NewRow,
}

/// Result for one selected column of one current row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellResult {
    pub column: ColumnRef,
    /// Column letter in the current table, if the column exists there
    pub letter: Option<String>,
    pub class: CellClass,
    pub current_value: String,
    pub baseline_value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_diff: Option<WordDiff>,
}

/// Outcome for one current row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RowOutcome {
    /// Key present but unknown to the baseline
    NewRow,
    /// Empty key: not matched and carries no classifications
    Unkeyed,
    /// Matched to `baseline_row` and compared cell by cell
    Compared {
        baseline_row: usize,
        cells: Vec<CellResult>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowResult {
    /// 0-based data row index in the current table
    pub row_index: usize,
    /// Spreadsheet row number, the header being row 1
    pub sheet_row: usize,
    pub key: String,
    #[serde(flatten)]
    pub outcome: RowOutcome,
}

impl RowResult {
    pub fn is_new(&self) -> bool {
        matches!(self.outcome, RowOutcome::NewRow)
    }

    pub fn cells(&self) -> &[CellResult] {
        match &self.outcome {
            RowOutcome::NewRow | RowOutcome::Unkeyed => &[],
            RowOutcome::Compared { cells, .. } => cells,
        }
    }

    /// Classification of `column` in this row
    pub fn classification(&self, column: &ColumnRef) -> Option<CellClass> {
        match &self.outcome {
            RowOutcome::NewRow => Some(CellClass::NewRow),
            RowOutcome::Unkeyed => None,
            RowOutcome::Compared { cells, .. } => {
                cells.iter().find(|c| &c.column == column).map(|c| c.class)
            }
        }
    }

    /// True when the row is new or any of its cells changed or cleared
    pub fn has_changes(&self) -> bool {
        self.is_new() || self.cells().iter().any(|c| c.class != CellClass::Unchanged)
    }
}

/// How the key column lined up across the two tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyResolution {
    pub column: ColumnRef,
    pub current_header: String,
    pub baseline_header: String,
    pub match_kind: MatchKind,
}

/// How one compared column lined up across the two tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub current_header: String,
    pub baseline_header: Option<String>,
    pub match_kind: Option<MatchKind>,
    pub word_diff: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub total_rows: usize,
    pub new_rows: usize,
    pub compared_rows: usize,
    /// Rows skipped because their key was empty
    pub unkeyed_rows: usize,
    /// Rows that are new or have at least one changed or cleared cell
    pub changed_rows: usize,
    pub unchanged_cells: usize,
    pub changed_cells: usize,
    pub cleared_cells: usize,
    pub word_diffs: usize,
    pub baseline_keys: usize,
    pub duplicate_baseline_keys: usize,
}

impl ComparisonSummary {
    pub fn has_changes(&self) -> bool {
        self.new_rows > 0 || self.changed_cells > 0 || self.cleared_cells > 0
    }
}

/// Full comparator output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub key: KeyResolution,
    /// Keyed by the column reference as the user wrote it
    pub columns: IndexMap<String, ColumnMapping>,
    pub rows: Vec<RowResult>,
    pub summary: ComparisonSummary,
}

impl ComparisonResult {
    pub fn new_rows(&self) -> impl Iterator<Item = &RowResult> {
        self.rows.iter().filter(|r| r.is_new())
    }

    pub fn changed_rows(&self) -> impl Iterator<Item = &RowResult> {
        self.rows.iter().filter(|r| r.has_changes())
    }
}

/// Coarse milestones reported while comparing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareProgress {
    Indexed { baseline_keys: usize },
    Rows { processed: usize, total: usize },
    Finished { total: usize },
}

/// A selected column resolved against both tables
#[derive(Debug)]
struct ColumnPlan {
    column: ColumnRef,
    current_index: Option<usize>,
    baseline_index: Option<usize>,
    word_diff: bool,
}

/// Row comparator over two in-memory tables
pub struct RowComparator;

impl RowComparator {
    /// Compare `current` against `baseline`
    pub fn compare(
        baseline: &Table,
        current: &Table,
        options: &CompareOptions,
    ) -> Result<ComparisonResult> {
        Self::compare_with_progress(baseline, current, options, None)
    }

    /// Compare, reporting milestones to `progress_callback`
    ///
    /// Both failure modes are checked before any row is read: an empty column
    /// selection or blank key header is a `Config` error, a key header the
    /// baseline does not have is a `Lookup` error.
    pub fn compare_with_progress(
        baseline: &Table,
        current: &Table,
        options: &CompareOptions,
        progress_callback: Option<&dyn Fn(CompareProgress)>,
    ) -> Result<ComparisonResult> {
        if options.compare_columns.is_empty() {
            return Err(QuarterdiffError::config(
                "No columns provided to compare. Please enter column letters (e.g., I,O,P,Q,R).",
            ));
        }

        let (key, current_key_index, baseline_key_index) =
            Self::resolve_key(baseline, current, &options.key_column)?;
        log::debug!(
            "Key column '{}' resolved to baseline header '{}' ({:?} match)",
            key.current_header,
            key.baseline_header,
            key.match_kind
        );

        let (plans, columns) = Self::plan_columns(baseline, current, options);

        let mut summary = ComparisonSummary {
            total_rows: current.row_count(),
            ..Default::default()
        };

        let (index, duplicates) = Self::build_baseline_index(baseline, baseline_key_index);
        summary.baseline_keys = index.len();
        summary.duplicate_baseline_keys = duplicates;
        if duplicates > 0 {
            log::warn!(
                "Baseline has {} duplicate key(s) in '{}'; the last occurrence of each is used",
                duplicates,
                key.baseline_header
            );
        }
        if let Some(cb) = progress_callback {
            cb(CompareProgress::Indexed {
                baseline_keys: index.len(),
            });
        }

        let total = current.row_count();
        let mut rows = Vec::with_capacity(total);
        for row_index in 0..total {
            let key_value = current.value(row_index, current_key_index);
            let result = Self::compare_row(baseline, current, &index, &plans, row_index, key_value);
            Self::tally(&mut summary, &result);
            rows.push(result);

            let processed = row_index + 1;
            if processed % PROGRESS_INTERVAL == 0 || processed == total {
                if let Some(cb) = progress_callback {
                    cb(CompareProgress::Rows { processed, total });
                }
            }
        }

        if let Some(cb) = progress_callback {
            cb(CompareProgress::Finished { total });
        }
        log::info!(
            "Compared {} rows: {} new, {} changed cells, {} cleared cells",
            summary.total_rows,
            summary.new_rows,
            summary.changed_cells,
            summary.cleared_cells
        );

        Ok(ComparisonResult {
            key,
            columns,
            rows,
            summary,
        })
    }

    /// Resolve the key header in the current table, then in the baseline
    fn resolve_key(
        baseline: &Table,
        current: &Table,
        key_column: &ColumnRef,
    ) -> Result<(KeyResolution, usize, usize)> {
        let current_index = key_column.locate(&current.headers).ok_or_else(|| {
            QuarterdiffError::config(format!(
                "Key column {} was not found in the current table.",
                key_column
            ))
        })?;

        let current_header = current.header(current_index);
        if current_header.is_empty() {
            return Err(QuarterdiffError::config(format!(
                "Key column {} header is empty in the current table. \
                 Please ensure that column contains the key header.",
                key_column
            )));
        }

        let found = baseline.resolver().resolve(current_header).ok_or_else(|| {
            QuarterdiffError::lookup(format!(
                "Could not find the key header from column {} ('{}') in the baseline table. \
                 Ensure both tables share the same key header.",
                key_column, current_header
            ))
        })?;

        let key = KeyResolution {
            column: key_column.clone(),
            current_header: current_header.to_string(),
            baseline_header: baseline.header(found.index).to_string(),
            match_kind: found.kind,
        };

        Ok((key, current_index, found.index))
    }

    /// Resolve every selected column once, up front
    fn plan_columns(
        baseline: &Table,
        current: &Table,
        options: &CompareOptions,
    ) -> (Vec<ColumnPlan>, IndexMap<String, ColumnMapping>) {
        let baseline_resolver = baseline.resolver();

        let word_diff_indices: HashSet<usize> = options
            .word_diff_columns
            .iter()
            .filter_map(|c| c.locate(&current.headers))
            .collect();

        let mut plans = Vec::with_capacity(options.compare_columns.len());
        let mut columns = IndexMap::new();

        for column in &options.compare_columns {
            let current_index = column.locate(&current.headers);
            let current_header = match (current_index, column) {
                (Some(i), _) => current.header(i).to_string(),
                (None, ColumnRef::Header(name)) => name.clone(),
                (None, _) => String::new(),
            };

            let found = baseline_resolver.resolve(&current_header);
            if found.is_none() {
                log::debug!(
                    "Column {} ('{}') has no baseline counterpart; baseline values read as empty",
                    column,
                    current_header
                );
            }

            let word_diff = match current_index {
                Some(i) => word_diff_indices.contains(&i),
                None => options.word_diff_columns.contains(column),
            };

            columns.insert(
                column.to_string(),
                ColumnMapping {
                    current_header,
                    baseline_header: found.map(|m| baseline.header(m.index).to_string()),
                    match_kind: found.map(|m| m.kind),
                    word_diff,
                },
            );

            plans.push(ColumnPlan {
                column: column.clone(),
                current_index,
                baseline_index: found.map(|m| m.index),
                word_diff,
            });
        }

        (plans, columns)
    }

    /// Map trimmed baseline keys to row indices, last occurrence wins
    fn build_baseline_index(baseline: &Table, key_index: usize) -> (HashMap<String, usize>, usize) {
        let mut index = HashMap::with_capacity(baseline.row_count());
        let mut duplicates = 0;

        for row in 0..baseline.row_count() {
            let key = baseline.value(row, key_index);
            if key.is_empty() {
                continue;
            }
            if index.insert(key.to_string(), row).is_some() {
                duplicates += 1;
            }
        }

        (index, duplicates)
    }

    fn compare_row(
        baseline: &Table,
        current: &Table,
        index: &HashMap<String, usize>,
        plans: &[ColumnPlan],
        row_index: usize,
        key: &str,
    ) -> RowResult {
        let outcome = if key.is_empty() {
            RowOutcome::Unkeyed
        } else {
            match index.get(key).copied() {
                None => RowOutcome::NewRow,
                Some(baseline_row) => {
                    let cells = plans
                        .iter()
                        .map(|plan| Self::compare_cell(baseline, current, plan, row_index, baseline_row))
                        .collect();
                    RowOutcome::Compared { baseline_row, cells }
                }
            }
        };

        RowResult {
            row_index,
            sheet_row: row_index + 2,
            key: key.to_string(),
            outcome,
        }
    }

    fn compare_cell(
        baseline: &Table,
        current: &Table,
        plan: &ColumnPlan,
        row_index: usize,
        baseline_row: usize,
    ) -> CellResult {
        let current_value = plan
            .current_index
            .map(|c| current.value(row_index, c))
            .unwrap_or("");
        let baseline_value = plan
            .baseline_index
            .map(|c| baseline.value(baseline_row, c))
            .unwrap_or("");

        let class = classify(baseline_value, current_value);
        let word_diff = (class == CellClass::Changed && plan.word_diff && !current_value.is_empty())
            .then(|| WordDiff::compute(baseline_value, current_value));

        CellResult {
            column: plan.column.clone(),
            letter: plan.current_index.map(column_letter),
            class,
            current_value: current_value.to_string(),
            baseline_value: baseline_value.to_string(),
            word_diff,
        }
    }

    fn tally(summary: &mut ComparisonSummary, row: &RowResult) {
        match &row.outcome {
            RowOutcome::NewRow => summary.new_rows += 1,
            RowOutcome::Unkeyed => summary.unkeyed_rows += 1,
            RowOutcome::Compared { cells, .. } => {
                summary.compared_rows += 1;
                for cell in cells {
                    match cell.class {
                        CellClass::Unchanged => summary.unchanged_cells += 1,
                        CellClass::Changed => summary.changed_cells += 1,
                        CellClass::Cleared => summary.cleared_cells += 1,
                        CellClass::NewRow => {}
                    }
                    if cell.word_diff.is_some() {
                        summary.word_diffs += 1;
                    }
                }
            }
        }
        if row.has_changes() {
            summary.changed_rows += 1;
        }
    }
}

/// Classify a pair of trimmed values; a blanked value is `Cleared`, not `Changed`
pub fn classify(baseline_value: &str, current_value: &str) -> CellClass {
    if !baseline_value.is_empty() && current_value.is_empty() {
        CellClass::Cleared
    } else if current_value != baseline_value {
        CellClass::Changed
    } else {
        CellClass::Unchanged
    }
}
