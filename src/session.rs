//! Upload processing for a single user session.
//!
//! Reads the upload, runs the aggregator and sorts the result into one of
//! three outcomes. Successful results are memoized per content fingerprint.

use tracing::{debug, info, warn};

use crate::aggregator::{AggregationResult, ColumnConfig, aggregate};
use crate::cache::{Fingerprint, ResultCache};
use crate::error::ProcessError;
use crate::ingest::{Upload, read_table};

/// What the presentation layer has to show for an upload.
#[derive(Debug)]
pub enum Outcome {
    /// Nothing could be computed; show the diagnostic only.
    Failed(ProcessError),
    /// Valid input, but no deposit ended in `.01`.
    NoMatches(AggregationResult),
    /// At least one initiator has a `.01` total.
    Matched(AggregationResult),
}

impl Outcome {
    fn classify(result: AggregationResult) -> Self {
        if result.is_empty() {
            Outcome::NoMatches(result)
        } else {
            Outcome::Matched(result)
        }
    }

    pub fn result(&self) -> Option<&AggregationResult> {
        match self {
            Outcome::Failed(_) => None,
            Outcome::NoMatches(result) | Outcome::Matched(result) => Some(result),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

pub struct Session {
    columns: ColumnConfig,
    cache: ResultCache,
    cache_hits: usize,
}

impl Session {
    pub fn new(columns: ColumnConfig) -> Self {
        Self {
            columns,
            cache: ResultCache::new(),
            cache_hits: 0,
        }
    }

    pub fn columns(&self) -> &ColumnConfig {
        &self.columns
    }

    pub fn cache_hits(&self) -> usize {
        self.cache_hits
    }

    /// Processes one upload. Read failures stop before aggregation starts.
    #[tracing::instrument(skip_all, fields(upload = %upload.name, bytes = upload.bytes.len()))]
    pub fn process(&mut self, upload: &Upload) -> Outcome {
        let key = Fingerprint::of(upload, &self.columns);

        if let Some(cached) = self.cache.get(&key) {
            self.cache_hits += 1;
            debug!(fingerprint = %key, "Result cache hit");
            return Outcome::classify(cached.clone());
        }

        match self.run(upload) {
            Ok(result) => {
                let stats = result.stats();
                info!(
                    rows_read = stats.rows_read,
                    rows_unparseable = stats.rows_unparseable,
                    rows_counted = stats.rows_counted,
                    initiators = result.len(),
                    "Upload processed"
                );
                self.cache.insert(key, result.clone());
                Outcome::classify(result)
            }
            Err(e) => {
                warn!(error = %e, "Upload rejected");
                Outcome::Failed(e)
            }
        }
    }

    fn run(&self, upload: &Upload) -> Result<AggregationResult, ProcessError> {
        let table = read_table(upload)?;
        Ok(aggregate(&table, &self.columns)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReadError;
    use rust_decimal_macros::dec;

    fn csv_upload(body: &str) -> Upload {
        Upload::new("depositos.csv", body.as_bytes().to_vec())
    }

    #[test]
    fn test_matched_outcome() {
        let mut session = Session::new(ColumnConfig::default());
        let outcome = session.process(&csv_upload("Iniciador,Depositar\nAlice,10.01\n"));

        let Outcome::Matched(result) = outcome else {
            panic!("expected matches");
        };
        assert_eq!(result.get("Alice"), Some(dec!(10.01)));
    }

    #[test]
    fn test_no_matches_is_distinct_from_failure() {
        let mut session = Session::new(ColumnConfig::default());
        let outcome = session.process(&csv_upload("Iniciador,Depositar\nAlice,10.00\n"));

        assert!(matches!(outcome, Outcome::NoMatches(_)));
        assert!(!outcome.is_failure());
        assert_eq!(outcome.result().map(|r| r.len()), Some(0));
    }

    #[test]
    fn test_read_failure_is_reported() {
        let mut session = Session::new(ColumnConfig::default());
        let outcome = session.process(&Upload::new("broken.xlsx", b"junk".to_vec()));

        assert!(matches!(outcome, Outcome::Failed(ProcessError::Read(ReadError::Workbook(_)))));
        assert!(outcome.result().is_none());
    }

    #[test]
    fn test_missing_column_failure() {
        let mut session = Session::new(ColumnConfig::default());
        let outcome = session.process(&csv_upload("iniciador,Depositar\nAlice,10.01\n"));

        let Outcome::Failed(err) = outcome else {
            panic!("expected failure");
        };
        let missing = err.missing_column().expect("missing column error");
        assert_eq!(missing.found, vec!["iniciador", "Depositar"]);
    }

    #[test]
    fn test_repeated_upload_hits_cache() {
        let mut session = Session::new(ColumnConfig::default());
        let upload = csv_upload("Iniciador,Depositar\nAlice,10.01\n");

        let first = session.process(&upload);
        let second = session.process(&upload);

        assert_eq!(session.cache_hits(), 1);
        assert_eq!(first.result(), second.result());
    }

    #[test]
    fn test_failures_are_not_cached() {
        let mut session = Session::new(ColumnConfig::default());
        let upload = csv_upload("Nombre,Monto\n");

        assert!(session.process(&upload).is_failure());
        assert!(session.process(&upload).is_failure());
        assert_eq!(session.cache_hits(), 0);
    }
}
