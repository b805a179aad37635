//! SQL schema definitions for the GSOD observation database.
//!
//! The schema mirrors the flat `gsod_daily` export: station metadata is
//! repeated on every row and the station catalog is derived from it.

/// Name of the daily observation table.
pub const OBSERVATION_TABLE: &str = "gsod_daily";

/// Returns the full SQL schema as a single batch string.
///
/// Creates `gsod_daily` with one row per (station_id, date). Dates are
/// stored as ISO `YYYY-MM-DD` text so lexical comparison is chronological
/// and SQLite's `strftime` can truncate them.
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS gsod_daily (
        station_id TEXT NOT NULL,
        station_name TEXT NOT NULL,
        lat REAL,
        lon REAL,
        date TEXT NOT NULL,
        TEMP_C REAL,
        MAX_C REAL,
        MIN_C REAL,
        PRCP_mm REAL,
        PRIMARY KEY (station_id, date)
    );
    CREATE INDEX IF NOT EXISTS idx_gsod_station_name ON gsod_daily(station_name);
    CREATE INDEX IF NOT EXISTS idx_gsod_date ON gsod_daily(date);
    "#
}
