use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use crate::dates::{month_end, DATE_FORMAT};
use crate::error::{GsodError, Result};

/// An inclusive range of calendar dates, `start <= end`.
///
/// The only way to build one is through [`DateRange::new`] (or the
/// month/year helpers), so every `DateRange` in circulation is ordered.
#[derive(Clone, Eq, PartialEq, Copy, Debug, Hash, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build an inclusive range, failing with [`GsodError::InvalidRange`]
    /// when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(GsodError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The whole calendar month, through its true last day.
    pub fn month(year: i32, month: u32) -> Result<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| GsodError::DateParse(format!("{year}-{month:02}")))?;
        let end = month_end(year, month)
            .ok_or_else(|| GsodError::DateParse(format!("{year}-{month:02}")))?;
        Self::new(start, end)
    }

    /// The whole calendar year.
    pub fn year(year: i32) -> Result<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| GsodError::DateParse(year.to_string()))?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| GsodError::DateParse(year.to_string()))?;
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.start <= *date && *date <= self.end
    }

    /// Number of calendar days covered, counting both ends.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}
