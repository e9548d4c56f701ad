//! Error types for the healthcare model
//!
//! Join defaults (unmatched age bands, service lines without an assumption)
//! are not errors and never appear here.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModelError>;

#[derive(Debug, Error)]
pub enum ModelError {
    /// Required column missing, value missing or of the wrong type
    #[error("schema error in {table}: {message}")]
    Schema { table: String, message: String },

    /// The source file cannot be opened
    #[error("source unavailable: {}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write output to {}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid configuration {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("pipeline error: {0}")]
    Pipeline(String),
}

impl ModelError {
    pub fn schema(table: impl Into<String>, message: impl Into<String>) -> Self {
        ModelError::Schema {
            table: table.into(),
            message: message.into(),
        }
    }

    pub fn is_schema(&self) -> bool {
        matches!(self, ModelError::Schema { .. })
    }
}
