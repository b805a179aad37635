//! Core types for GSOD daily station observations.
//!
//! Shared by the database layer and the command line: stations, daily
//! observations, the variable and aggregation-level vocabulary, validated
//! query specs and the error taxonomy callers match on.

pub mod date_range;
pub mod dates;
pub mod error;
pub mod observation;
pub mod period;
pub mod query_spec;
pub mod station;
pub mod variable;

pub use date_range::DateRange;
pub use error::GsodError;
pub use observation::Observation;
pub use period::{Period, QueryResultRow};
pub use query_spec::{QueryKey, QuerySpec};
pub use station::{Coverage, Station};
pub use variable::{AggregationLevel, ChartHint, ChartMark, Reducer, Variable};
