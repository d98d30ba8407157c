//! Deposit aggregation core.
//!
//! Validates the required columns, coerces deposits to decimals, keeps only
//! amounts whose cents end in `01`, and sums them per initiator. Everything
//! here is a pure function of the input table and column configuration.

pub mod aggregate;
pub mod cents;
pub mod coerce;
pub mod types;

pub use aggregate::aggregate;
pub use cents::is_fractional_cent;
pub use coerce::coerce_deposit;
pub use types::{AggregationResult, ColumnConfig, RunStats};
