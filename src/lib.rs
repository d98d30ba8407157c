pub mod aggregator;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod ingest;
pub mod output;
pub mod session;
pub mod table;

pub use aggregator::{AggregationResult, ColumnConfig, aggregate};
pub use error::{MissingColumnError, ProcessError, ReadError, ValidationError};
pub use ingest::{Upload, read_table};
pub use session::{Outcome, Session};
