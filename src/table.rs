//! In-memory tables of string cells

use crate::column::{column_letter, HeaderResolver};
use blake3::Hasher;
use serde::{Deserialize, Serialize};

/// A hash value represented as a hex string
pub type HashValue = String;

/// A header row plus data rows, every cell already coerced to a string
///
/// Rows are positional and aligned with `headers`. A row may be shorter than
/// the header row; missing cells read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Build a table from borrowed literals, first row is the header
    pub fn from_records<S: AsRef<str>>(records: &[Vec<S>]) -> Self {
        let mut iter = records
            .iter()
            .map(|row| row.iter().map(|cell| cell.as_ref().to_string()).collect::<Vec<_>>());
        let headers = iter.next().unwrap_or_default();
        Self {
            headers,
            rows: iter.collect(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Header at a 0-based column, empty past the header row
    pub fn header(&self, column: usize) -> &str {
        self.headers.get(column).map(String::as_str).unwrap_or("")
    }

    /// Raw cell text, empty when the row or column does not exist
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Trimmed cell text
    pub fn value(&self, row: usize, column: usize) -> &str {
        self.cell(row, column).trim()
    }

    pub fn resolver(&self) -> HeaderResolver<'_> {
        HeaderResolver::new(&self.headers)
    }

    /// `(letter, header)` pairs for every column
    pub fn lettered_headers(&self) -> Vec<(String, &str)> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, h)| (column_letter(i), h.as_str()))
            .collect()
    }

    /// Content fingerprint over headers and cells
    pub fn fingerprint(&self) -> HashValue {
        let mut hasher = Hasher::new();
        for header in &self.headers {
            hasher.update(header.as_bytes());
            hasher.update(b"|");
        }
        hasher.update(b"||");
        for row in &self.rows {
            for value in row {
                hasher.update(value.as_bytes());
                hasher.update(b"|"); // Separator to avoid hash collisions
            }
            hasher.update(b"\n");
        }
        hasher.finalize().to_hex().to_string()
    }
}
