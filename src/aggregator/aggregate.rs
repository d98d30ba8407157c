use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;

use crate::aggregator::cents::is_fractional_cent;
use crate::aggregator::coerce::coerce_deposit;
use crate::aggregator::types::{AggregationResult, ColumnConfig, RunStats};
use crate::error::{MissingColumnError, ValidationError};
use crate::table::Table;

/// Sums `.01` deposits per initiator.
///
/// Fails with [`ValidationError::MissingColumn`] when either configured
/// column is absent, before any row is looked at. Rows whose deposit cannot
/// be coerced are skipped and counted in [`RunStats::rows_unparseable`].
/// A table with no matching rows yields an empty result, not an error.
pub fn aggregate(
    table: &Table,
    config: &ColumnConfig,
) -> Result<AggregationResult, ValidationError> {
    let (initiator_col, deposit_col) = match (
        table.column_index(&config.initiator),
        table.column_index(&config.deposit),
    ) {
        (Some(i), Some(d)) => (i, d),
        _ => {
            return Err(MissingColumnError {
                required: config.required(),
                found: table.columns().to_vec(),
            }
            .into());
        }
    };

    let mut stats = RunStats {
        rows_read: table.len(),
        ..Default::default()
    };
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();

    for row in 0..table.len() {
        let Some(amount) = coerce_deposit(table.cell(row, deposit_col)) else {
            stats.rows_unparseable += 1;
            continue;
        };

        if !is_fractional_cent(&amount) {
            continue;
        }

        stats.rows_counted += 1;

        let sum = totals
            .entry(table.cell(row, initiator_col).as_key())
            .or_insert(Decimal::ZERO);
        *sum = sum.checked_add(amount).ok_or(ValidationError::SumOverflow)?;
    }

    let grand_total = totals
        .values()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
        .ok_or(ValidationError::SumOverflow)?;

    debug!(
        rows_read = stats.rows_read,
        rows_unparseable = stats.rows_unparseable,
        rows_counted = stats.rows_counted,
        initiators = totals.len(),
        "Aggregation finished"
    );

    Ok(AggregationResult::new(totals, grand_total, stats))
}
