//! Date helpers shared by the loader, the query engine and the CLI.

use chrono::{Datelike, NaiveDate};

use crate::error::{GsodError, Result};

/// Date format used for storage and display: "YYYY-MM-DD"
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Compact date format found in raw GSOD exports: "YYYYMMDD"
pub const COMPACT_DATE_FORMAT: &str = "%Y%m%d";

/// Format a NaiveDate as "YYYY-MM-DD"
pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a date string in "YYYY-MM-DD" or "YYYYMMDD" format.
///
/// Leading and trailing whitespace is ignored. A trailing time component
/// ("2020-01-01 00:00:00") is dropped, since some exports write dates as
/// timestamps at midnight.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let trimmed = s.trim();
    let date_part = trimmed.split([' ', 'T']).next().unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(date_part, COMPACT_DATE_FORMAT))
        .map_err(|_| GsodError::DateParse(s.to_string()))
}

/// First day of the month containing `date`.
pub fn month_start(date: &NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(*date)
}

/// First day of the year containing `date`.
pub fn year_start(date: &NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(*date)
}

/// Last calendar day of the given month.
///
/// Returns `None` for an invalid month number.
pub fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// Which end of an inclusive range a loosely specified date resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    Start,
    End,
}

/// Parse a date that may be given as a full day, a month ("YYYY-MM") or a
/// year ("YYYY").
///
/// Months and years resolve to their first day for [`RangeBound::Start`]
/// and to their true last day for [`RangeBound::End`], so "2020-02" as an
/// end bound means 2020-02-29.
pub fn parse_range_bound(s: &str, bound: RangeBound) -> Result<NaiveDate> {
    let trimmed = s.trim();
    if let Ok(date) = parse_date(trimmed) {
        return Ok(date);
    }
    let err = || GsodError::DateParse(s.to_string());
    let mut parts = trimmed.splitn(2, '-');
    let year: i32 = parts
        .next()
        .filter(|y| y.len() == 4)
        .and_then(|y| y.parse().ok())
        .ok_or_else(err)?;
    let month: Option<u32> = match parts.next() {
        Some(m) => Some(m.parse().map_err(|_| err())?),
        None => None,
    };
    let resolved = match (month, bound) {
        (Some(m), RangeBound::Start) => NaiveDate::from_ymd_opt(year, m, 1),
        (Some(m), RangeBound::End) => month_end(year, m),
        (None, RangeBound::Start) => NaiveDate::from_ymd_opt(year, 1, 1),
        (None, RangeBound::End) => NaiveDate::from_ymd_opt(year, 12, 31),
    };
    resolved.ok_or_else(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso_and_compact() {
        let expected = NaiveDate::from_ymd_opt(2020, 1, 31).unwrap();
        assert_eq!(parse_date("2020-01-31").unwrap(), expected);
        assert_eq!(parse_date("20200131").unwrap(), expected);
        assert_eq!(parse_date(" 2020-01-31 ").unwrap(), expected);
        assert_eq!(parse_date("2020-01-31 00:00:00").unwrap(), expected);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(
            parse_date("31/01/2020"),
            Err(GsodError::DateParse("31/01/2020".to_string()))
        );
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_format_and_parse() {
        let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
        let formatted = format_date(&date);
        assert_eq!(formatted, "2023-06-15");
        assert_eq!(parse_date(&formatted).unwrap(), date);
    }

    #[test]
    fn test_truncation() {
        let date = NaiveDate::from_ymd_opt(2021, 8, 17).unwrap();
        assert_eq!(month_start(&date), NaiveDate::from_ymd_opt(2021, 8, 1).unwrap());
        assert_eq!(year_start(&date), NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
    }

    #[test]
    fn test_month_end_uses_true_last_day() {
        assert_eq!(month_end(2020, 2), NaiveDate::from_ymd_opt(2020, 2, 29));
        assert_eq!(month_end(2021, 2), NaiveDate::from_ymd_opt(2021, 2, 28));
        assert_eq!(month_end(2021, 1), NaiveDate::from_ymd_opt(2021, 1, 31));
        assert_eq!(month_end(2021, 12), NaiveDate::from_ymd_opt(2021, 12, 31));
        assert_eq!(month_end(2021, 13), None);
    }

    #[test]
    fn test_range_bound_month_and_year() {
        assert_eq!(
            parse_range_bound("2020-02", RangeBound::Start).unwrap(),
            NaiveDate::from_ymd_opt(2020, 2, 1).unwrap()
        );
        assert_eq!(
            parse_range_bound("2020-02", RangeBound::End).unwrap(),
            NaiveDate::from_ymd_opt(2020, 2, 29).unwrap()
        );
        assert_eq!(
            parse_range_bound("2019", RangeBound::End).unwrap(),
            NaiveDate::from_ymd_opt(2019, 12, 31).unwrap()
        );
        assert_eq!(
            parse_range_bound("2020-01-31", RangeBound::Start).unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 31).unwrap()
        );
    }

    #[test]
    fn test_range_bound_rejects_bad_month() {
        assert!(parse_range_bound("2020-13", RangeBound::End).is_err());
        assert!(parse_range_bound("20", RangeBound::Start).is_err());
        assert!(parse_range_bound("abcd-01", RangeBound::Start).is_err());
    }
}
