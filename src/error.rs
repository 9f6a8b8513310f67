//! Error types for quarterdiff operations

use thiserror::Error;

pub type Result<T> = std::result::Result<T, QuarterdiffError>;

#[derive(Error, Debug)]
pub enum QuarterdiffError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// Caller supplied parameters the comparator cannot work with
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The two tables cannot be reconciled on their key column
    #[error("Lookup error: {message}")]
    Lookup { message: String },

    #[error("Invalid column reference: {reference}")]
    InvalidColumn { reference: String },

    /// No usable DuckDB library was found
    #[error("DuckDB library error: {message}")]
    Library { message: String },

    #[error("Data processing error: {message}")]
    DataProcessing { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

impl QuarterdiffError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn lookup(msg: impl Into<String>) -> Self {
        Self::Lookup {
            message: msg.into(),
        }
    }

    pub fn invalid_column(reference: impl Into<String>) -> Self {
        Self::InvalidColumn {
            reference: reference.into(),
        }
    }

    pub fn library(msg: impl Into<String>) -> Self {
        Self::Library {
            message: msg.into(),
        }
    }

    pub fn data_processing(msg: impl Into<String>) -> Self {
        Self::DataProcessing {
            message: msg.into(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }

    /// True for the two failures the comparator raises before touching rows
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::Lookup { .. })
    }
}
