//! Table loading using DuckDB

use crate::error::{QuarterdiffError, Result};
use crate::table::Table;
use duckdb::types::{TimeUnit, ValueRef};
use duckdb::Connection;
use std::path::{Path, PathBuf};

/// Loads structured files into string tables
pub struct DataProcessor {
    connection: Connection,
}

impl DataProcessor {
    /// Create a new data processor backed by an in-memory database
    pub fn new() -> Result<Self> {
        let connection = Connection::open_in_memory()?;

        connection.execute("SET enable_progress_bar=false", [])?;
        // Rows must come back in file order, the header is row 1
        connection.execute("SET preserve_insertion_order=true", [])?;

        Ok(Self { connection })
    }

    /// Load a CSV, TSV, Parquet or JSON file as a table of strings
    ///
    /// The first line of delimited files is the header row, taken as written
    /// (a blank header stays blank). Every column is read as text, so values
    /// like `007` keep their leading zeros. NULLs become empty strings.
    pub fn load_table(&self, file_path: &Path) -> Result<Table> {
        if !file_path.exists() {
            return Err(QuarterdiffError::invalid_input(format!(
                "File not found: {}",
                file_path.display()
            )));
        }

        if !file_path.is_file() {
            return Err(QuarterdiffError::invalid_input(format!(
                "Path is not a file: {}",
                file_path.display()
            )));
        }

        let source = Self::source_expression(file_path)?;
        let delimited = Self::is_delimited(file_path);
        let create_view_sql = format!("CREATE OR REPLACE VIEW table_view AS SELECT * FROM {}", source);

        self.connection
            .execute(&create_view_sql, [])
            .map_err(|e| Self::convert_duckdb_error(e, file_path))?;

        let described = self.get_headers()?;
        let mut rows = self.extract_rows(described.len())?;
        let headers = match (delimited, rows.is_empty()) {
            (true, true) => Vec::new(),
            (true, false) => rows.remove(0),
            (false, _) => described,
        };

        log::debug!(
            "Loaded {} rows x {} columns from {}",
            rows.len(),
            headers.len(),
            file_path.display()
        );

        Ok(Table::new(headers, rows))
    }

    /// DuckDB table function for the file's format
    fn source_expression(file_path: &Path) -> Result<String> {
        let path = file_path.to_string_lossy().replace('\'', "''");
        let extension = file_path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            // Header row is read as data so blank headers are not renamed
            "csv" | "tsv" | "txt" => Ok(format!(
                "read_csv('{}', header = false, all_varchar = true)",
                path
            )),
            "parquet" => Ok(format!("read_parquet('{}')", path)),
            "json" | "jsonl" | "ndjson" => Ok(format!("read_json_auto('{}')", path)),
            _ => Err(QuarterdiffError::invalid_input(format!(
                "Unsupported file format '{}': expected csv, tsv, parquet or json",
                file_path.display()
            ))),
        }
    }

    /// Delimited text files carry their header as the first row
    fn is_delimited(file_path: &Path) -> bool {
        file_path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| matches!(s.to_lowercase().as_str(), "csv" | "tsv" | "txt"))
            .unwrap_or(false)
    }

    /// Check if file format is supported
    pub fn is_supported_format(file_path: &Path) -> bool {
        Self::source_expression(file_path).is_ok()
    }

    /// Convert DuckDB errors to readable input errors
    fn convert_duckdb_error(error: duckdb::Error, file_path: &Path) -> QuarterdiffError {
        let error_msg = error.to_string();

        if error_msg.contains("CSV Error")
            || error_msg.contains("Invalid CSV")
            || error_msg.contains("Unterminated quoted field")
        {
            QuarterdiffError::invalid_input(format!(
                "Malformed CSV file '{}': {}",
                file_path.display(),
                error_msg
            ))
        } else if error_msg.contains("JSON") {
            QuarterdiffError::invalid_input(format!(
                "Malformed JSON file '{}': {}",
                file_path.display(),
                error_msg
            ))
        } else if error_msg.contains("Permission denied") {
            QuarterdiffError::invalid_input(format!(
                "Permission denied accessing file: {}",
                file_path.display()
            ))
        } else if error_msg.contains("UTF-8") || error_msg.contains("encoding") {
            QuarterdiffError::invalid_input(format!(
                "File encoding error '{}': {}",
                file_path.display(),
                error_msg
            ))
        } else {
            QuarterdiffError::DuckDb(error)
        }
    }

    /// Header names in file order
    fn get_headers(&self) -> Result<Vec<String>> {
        let mut stmt = self.connection.prepare("DESCRIBE table_view").map_err(|e| {
            QuarterdiffError::data_processing(format!("Failed to prepare describe query: {}", e))
        })?;

        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| QuarterdiffError::data_processing(format!("Failed to query headers: {}", e)))?;

        let mut headers = Vec::new();
        for name in names {
            headers.push(name.map_err(|e| {
                QuarterdiffError::data_processing(format!("Failed to read header: {}", e))
            })?);
        }

        Ok(headers)
    }

    /// Every row as strings, aligned with the headers
    fn extract_rows(&self, column_count: usize) -> Result<Vec<Vec<String>>> {
        if column_count == 0 {
            return Ok(Vec::new());
        }

        let mut stmt = self.connection.prepare("SELECT * FROM table_view").map_err(|e| {
            QuarterdiffError::data_processing(format!("Failed to prepare data extraction query: {}", e))
        })?;

        let rows = stmt
            .query_map([], |row| {
                let mut string_row = Vec::with_capacity(column_count);
                for i in 0..column_count {
                    string_row.push(value_to_string(row.get_ref(i)?));
                }
                Ok(string_row)
            })
            .map_err(|e| QuarterdiffError::data_processing(format!("Failed to extract data rows: {}", e)))?;

        let mut data = Vec::new();
        for row in rows {
            data.push(row.map_err(|e| {
                QuarterdiffError::data_processing(format!("Failed to process data row: {}", e))
            })?);
        }

        Ok(data)
    }
}

/// Render one DuckDB value as cell text, NULL as empty
fn value_to_string(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Boolean(b) => b.to_string(),
        ValueRef::TinyInt(i) => i.to_string(),
        ValueRef::SmallInt(i) => i.to_string(),
        ValueRef::Int(i) => i.to_string(),
        ValueRef::BigInt(i) => i.to_string(),
        ValueRef::HugeInt(i) => i.to_string(),
        ValueRef::UTinyInt(i) => i.to_string(),
        ValueRef::USmallInt(i) => i.to_string(),
        ValueRef::UInt(i) => i.to_string(),
        ValueRef::UBigInt(i) => i.to_string(),
        ValueRef::Float(f) => f.to_string(),
        ValueRef::Double(f) => f.to_string(),
        ValueRef::Decimal(d) => d.to_string(),
        ValueRef::Text(s) => String::from_utf8_lossy(s).to_string(),
        ValueRef::Blob(b) => format!("<blob:{} bytes>", b.len()),
        ValueRef::Date32(days) => chrono::NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
            .map(|d| d.to_string())
            .unwrap_or_else(|| days.to_string()),
        ValueRef::Timestamp(unit, ts) => {
            let micros = timestamp_micros(unit, ts);
            chrono::DateTime::from_timestamp(
                micros.div_euclid(1_000_000),
                (micros.rem_euclid(1_000_000) * 1_000) as u32,
            )
            .map(|dt| dt.naive_utc().to_string())
            .unwrap_or_else(|| ts.to_string())
        }
        other => format!("{:?}", other),
    }
}

fn timestamp_micros(unit: TimeUnit, value: i64) -> i64 {
    match unit {
        TimeUnit::Second => value.saturating_mul(1_000_000),
        TimeUnit::Millisecond => value.saturating_mul(1_000),
        TimeUnit::Microsecond => value,
        TimeUnit::Nanosecond => value / 1_000,
    }
}

/// Days from 0001-01-01 to 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Where a loaded table came from
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub source: PathBuf,
    pub table: Table,
}

impl LoadedTable {
    /// Load `path` with a fresh processor
    pub fn load(path: &Path) -> Result<Self> {
        let processor = DataProcessor::new()?;
        Ok(Self {
            source: path.to_path_buf(),
            table: processor.load_table(path)?,
        })
    }
}
