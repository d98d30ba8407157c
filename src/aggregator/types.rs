//! Data types used by the aggregation pipeline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_INITIATOR_COLUMN: &str = "Iniciador";
pub const DEFAULT_DEPOSIT_COLUMN: &str = "Depositar";

/// Names of the two columns the aggregator reads. Matched exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub initiator: String,
    pub deposit: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            initiator: DEFAULT_INITIATOR_COLUMN.to_string(),
            deposit: DEFAULT_DEPOSIT_COLUMN.to_string(),
        }
    }
}

impl ColumnConfig {
    pub fn new(initiator: impl Into<String>, deposit: impl Into<String>) -> Self {
        Self {
            initiator: initiator.into(),
            deposit: deposit.into(),
        }
    }

    pub(crate) fn required(&self) -> Vec<String> {
        vec![self.initiator.clone(), self.deposit.clone()]
    }
}

/// Row counts collected during a single aggregation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub rows_read: usize,
    pub rows_unparseable: usize,
    pub rows_counted: usize,
}

/// Per-initiator sums of `.01` deposits plus their grand total.
///
/// Initiators iterate in ascending byte-wise order. Only initiators with at
/// least one counted deposit are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregationResult {
    totals: BTreeMap<String, Decimal>,
    grand_total: Decimal,
    #[serde(skip)]
    stats: RunStats,
}

impl AggregationResult {
    pub(crate) fn new(
        totals: BTreeMap<String, Decimal>,
        grand_total: Decimal,
        stats: RunStats,
    ) -> Self {
        Self {
            totals,
            grand_total,
            stats,
        }
    }

    pub fn totals(&self) -> &BTreeMap<String, Decimal> {
        &self.totals
    }

    pub fn grand_total(&self) -> Decimal {
        self.grand_total
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    pub fn get(&self, initiator: &str) -> Option<Decimal> {
        self.totals.get(initiator).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.totals.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}
