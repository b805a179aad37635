/// Error types for GSOD catalog and query operations
use chrono::NaiveDate;
use thiserror::Error;

use crate::variable::{AggregationLevel, Variable};

/// Main error type for GSOD operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GsodError {
    /// Station has no observations in the table
    #[error("Station not found: {0}")]
    StationNotFound(String),

    /// Start date is after end date
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// The variable cannot be aggregated at the requested level
    #[error("{variable} cannot be aggregated at level '{level}'")]
    InvalidCombination {
        variable: Variable,
        level: AggregationLevel,
    },

    /// Variable name did not match any known variable
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    /// Aggregation level name did not match any known level
    #[error("Unknown aggregation level: {0}")]
    UnknownLevel(String),

    /// Date parsing failed
    #[error("Failed to parse date: {0}")]
    DateParse(String),
}

/// Type alias for Results using GsodError
pub type Result<T> = std::result::Result<T, GsodError>;
