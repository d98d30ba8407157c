//! Error taxonomy for the deposit pipeline.
//!
//! Read and validation failures abort a run with no partial result.
//! Individual unparseable cells are not errors; they are counted and skipped.

use thiserror::Error;

/// The uploaded file could not be parsed into a table at all.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("unsupported file type '{name}': expected .xls, .xlsx or .csv")]
    Unsupported { name: String },

    #[error("workbook '{name}' has no worksheets")]
    NoWorksheet { name: String },

    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("failed to read csv: {0}")]
    Csv(#[from] csv::Error),
}

/// One or both required columns are absent from the table header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("required columns {required:?} not found; columns present: {found:?}")]
pub struct MissingColumnError {
    /// The configured column names, initiator first.
    pub required: Vec<String>,
    /// Every column name the table actually has, in header order.
    pub found: Vec<String>,
}

impl MissingColumnError {
    /// Required names that are not in `found`.
    pub fn missing(&self) -> Vec<&str> {
        self.required
            .iter()
            .filter(|name| !self.found.contains(name))
            .map(String::as_str)
            .collect()
    }
}

/// Table-level rejection raised by the aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error(transparent)]
    MissingColumn(#[from] MissingColumnError),

    #[error("deposit sum exceeds the decimal range")]
    SumOverflow,
}

/// Anything that stops an upload from producing a result.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ProcessError {
    /// The missing-column details, when that is why processing stopped.
    pub fn missing_column(&self) -> Option<&MissingColumnError> {
        match self {
            ProcessError::Validation(ValidationError::MissingColumn(e)) => Some(e),
            _ => None,
        }
    }
}

/// The optional JSON config file could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
