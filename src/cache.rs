//! Memoization of aggregation results keyed by upload content.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;

use crate::aggregator::{AggregationResult, ColumnConfig};
use crate::ingest::Upload;

/// SHA-256 over everything that determines an aggregation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Hashes the upload's extension and bytes together with the column names.
    ///
    /// The extension is included because it selects the parser.
    pub fn of(upload: &Upload, columns: &ColumnConfig) -> Self {
        let extension = upload.extension();
        let mut hasher = Sha256::new();
        for part in [
            extension.as_bytes(),
            columns.initiator.as_bytes(),
            columns.deposit.as_bytes(),
        ] {
            hasher.update((part.len() as u64).to_le_bytes());
            hasher.update(part);
        }
        hasher.update(&upload.bytes);
        Self(hasher.finalize().into())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Successful results seen so far in this process.
///
/// Only pays off for library callers that feed one [`crate::session::Session`]
/// several uploads; the CLI processes a single upload per run.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: HashMap<Fingerprint, AggregationResult>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &Fingerprint) -> Option<&AggregationResult> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: Fingerprint, result: AggregationResult) {
        self.entries.insert(key, result);
    }

}
