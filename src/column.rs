//! Column identifiers and header resolution
//!
//! Columns can be addressed the way a spreadsheet user names them (a letter
//! such as `O`), by 1-based position, or by header text. Header text is
//! matched exactly first and then by its normalized form, so small drifts in
//! capitalisation or punctuation between two exports still line up.

use crate::error::{QuarterdiffError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Widest sheet Excel supports (column XFD)
pub const MAX_COLUMNS: usize = 16_384;

/// Prefix that forces a reference to be read as header text
pub const HEADER_PREFIX: &str = "name:";

/// A reference to one column of a table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ColumnRef {
    /// Spreadsheet column letter, stored uppercase
    Letter(String),
    /// 1-based column position
    Position(usize),
    /// Header text from the header row
    Header(String),
}

impl ColumnRef {
    /// Parse a user supplied reference
    ///
    /// Digits are positions, one to three letters are column letters, and
    /// everything else (or anything prefixed with `name:`) is header text.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(QuarterdiffError::invalid_column(s));
        }

        if let Some(header) = trimmed.strip_prefix(HEADER_PREFIX) {
            if header.is_empty() {
                return Err(QuarterdiffError::invalid_column(s));
            }
            return Ok(Self::Header(header.to_string()));
        }

        if trimmed.chars().all(|c| c.is_ascii_digit()) {
            let position: usize = trimmed
                .parse()
                .map_err(|_| QuarterdiffError::invalid_column(s))?;
            if position == 0 || position > MAX_COLUMNS {
                return Err(QuarterdiffError::invalid_column(s));
            }
            return Ok(Self::Position(position));
        }

        if trimmed.len() <= 3 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            let letter = trimmed.to_ascii_uppercase();
            column_index(&letter)?;
            return Ok(Self::Letter(letter));
        }

        Ok(Self::Header(trimmed.to_string()))
    }

    /// Find the 0-based column this reference points at in `headers`
    ///
    /// Letters and positions always locate a column, even past the last
    /// header; such a column simply has an empty header and empty cells.
    pub fn locate(&self, headers: &[String]) -> Option<usize> {
        match self {
            Self::Letter(letter) => column_index(letter).ok(),
            Self::Position(position) => Some(position - 1),
            Self::Header(name) => HeaderResolver::new(headers).resolve(name).map(|m| m.index),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Letter(letter) => write!(f, "{}", letter),
            Self::Position(position) => write!(f, "{}", position),
            Self::Header(name) => write!(f, "{}{}", HEADER_PREFIX, name),
        }
    }
}

impl TryFrom<String> for ColumnRef {
    type Error = QuarterdiffError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ColumnRef> for String {
    fn from(value: ColumnRef) -> Self {
        value.to_string()
    }
}

/// Parse a comma separated list such as `I,O,P,Q,R`, skipping blank entries
pub fn parse_column_list(s: &str) -> Result<Vec<ColumnRef>> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ColumnRef::parse)
        .collect()
}

/// Convert a column letter (`A`, `Z`, `AA`) to a 0-based index
pub fn column_index(letter: &str) -> Result<usize> {
    if letter.is_empty() {
        return Err(QuarterdiffError::invalid_column(letter));
    }

    let mut index = 0usize;
    for ch in letter.chars() {
        if !ch.is_ascii_alphabetic() {
            return Err(QuarterdiffError::invalid_column(letter));
        }
        let value = (ch.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        index = index * 26 + value;
        if index > MAX_COLUMNS {
            return Err(QuarterdiffError::invalid_column(letter));
        }
    }

    Ok(index - 1)
}

/// Convert a 0-based index to its column letter
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Normalize a header for fuzzy matching
///
/// Whitespace runs collapse, the text is lowercased, and every run of
/// characters outside `[a-z0-9]` becomes a single `_` with leading and
/// trailing underscores removed. `"  OB Main-ID "` becomes `"ob_main_id"`.
pub fn normalize_header(name: &str) -> String {
    let collapsed = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let mut normalized = String::with_capacity(collapsed.len());
    let mut in_separator = false;
    for ch in collapsed.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            normalized.push(ch);
            in_separator = false;
        } else if !in_separator {
            normalized.push('_');
            in_separator = true;
        }
    }

    normalized.trim_matches('_').to_string()
}

/// How a header was matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Normalized,
}

/// A resolved header position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderMatch {
    pub index: usize,
    pub kind: MatchKind,
}

/// Two-stage header lookup over one table's header row
#[derive(Debug)]
pub struct HeaderResolver<'a> {
    headers: &'a [String],
    normalized: HashMap<String, usize>,
}

impl<'a> HeaderResolver<'a> {
    pub fn new(headers: &'a [String]) -> Self {
        let mut normalized = HashMap::new();
        for (index, header) in headers.iter().enumerate() {
            let key = normalize_header(header);
            // Later columns overwrite earlier ones with the same normalized name
            if !key.is_empty() {
                normalized.insert(key, index);
            }
        }

        Self { headers, normalized }
    }

    /// Resolve `header`: exact text first, then normalized form
    ///
    /// Returns `None` when neither stage matches. Empty headers never match.
    pub fn resolve(&self, header: &str) -> Option<HeaderMatch> {
        if header.is_empty() {
            return None;
        }

        if let Some(index) = self.headers.iter().position(|h| h == header) {
            return Some(HeaderMatch {
                index,
                kind: MatchKind::Exact,
            });
        }

        let key = normalize_header(header);
        if key.is_empty() {
            return None;
        }

        self.normalized.get(&key).map(|&index| HeaderMatch {
            index,
            kind: MatchKind::Normalized,
        })
    }

    /// Header text at a resolved position
    pub fn header(&self, index: usize) -> Option<&'a str> {
        self.headers.get(index).map(String::as_str)
    }
}
