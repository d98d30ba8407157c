use serde::Deserialize;

use crate::aggregator::ColumnConfig;
use crate::aggregator::types::{DEFAULT_DEPOSIT_COLUMN, DEFAULT_INITIATOR_COLUMN};
use crate::error::ConfigError;

pub const DEFAULT_EXPORT_FILE_NAME: &str = "Analisis_Depositos.xlsx";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Runtime settings, optionally loaded from a JSON file.
///
/// Every key is optional; missing keys fall back to the defaults:
/// ```json
/// {
///   "initiator_column": "Iniciador",
///   "deposit_column": "Depositar",
///   "export_file_name": "Analisis_Depositos.xlsx",
///   "http_timeout_secs": 30
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub initiator_column: String,
    pub deposit_column: String,
    pub export_file_name: String,
    pub http_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            initiator_column: DEFAULT_INITIATOR_COLUMN.to_string(),
            deposit_column: DEFAULT_DEPOSIT_COLUMN.to_string(),
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(path, &content)
    }

    fn from_json(path: &str, content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|source| ConfigError::Json {
            path: path.to_string(),
            source,
        })
    }

    /// Loads `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&str>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Applies command-line column names over file/default values.
    pub fn with_columns(mut self, initiator: Option<String>, deposit: Option<String>) -> Self {
        if let Some(initiator) = initiator {
            self.initiator_column = initiator;
        }
        if let Some(deposit) = deposit {
            self.deposit_column = deposit;
        }
        self
    }

    pub fn columns(&self) -> ColumnConfig {
        ColumnConfig::new(&self.initiator_column, &self.deposit_column)
    }
}
