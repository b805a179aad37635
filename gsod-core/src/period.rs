use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use crate::dates::DATE_FORMAT;

/// The x-axis key of a query result row.
///
/// Daily rows carry the observation date; monthly and yearly rows carry the
/// first day of their month or year. The all-years monthly mean has no year
/// to speak of, so its rows carry the bare month number (1-12).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum Period {
    Date(NaiveDate),
    Month(u32),
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Date(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            Period::Month(month) => write!(f, "{month}"),
        }
    }
}

/// A single (period, value) point, ready for charting.
///
/// `value` is rounded to two decimals, or `None` when the bucket held no
/// usable observations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResultRow {
    pub period: Period,
    pub value: Option<f64>,
}

impl QueryResultRow {
    pub fn new(period: Period, value: Option<f64>) -> Self {
        Self {
            period,
            value: value.map(round2),
        }
    }
}

/// Round to two decimal places for presentation.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
