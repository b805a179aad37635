//! CSV loading for populating the observation table.
//!
//! # CSV Format
//!
//! Headered export of the `gsod_daily` table:
//! `station_id,station_name,lat,lon,date,TEMP_C,MAX_C,MIN_C,PRCP_mm`
//!
//! Columns are matched by header name, so their order does not matter.
//! Dates may be `YYYY-MM-DD` or `YYYYMMDD`. Empty or non-numeric
//! measurement cells are stored as NULL.

use crate::Database;
use anyhow::Context;
use flate2::read::GzDecoder;
use gsod_core::dates::{format_date, parse_date};
use rusqlite::params;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CsvObservation {
    station_id: String,
    station_name: String,
    #[serde(deserialize_with = "csv::invalid_option")]
    lat: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    lon: Option<f64>,
    date: String,
    #[serde(rename = "TEMP_C", deserialize_with = "csv::invalid_option")]
    temp_c: Option<f64>,
    #[serde(rename = "MAX_C", deserialize_with = "csv::invalid_option")]
    max_c: Option<f64>,
    #[serde(rename = "MIN_C", deserialize_with = "csv::invalid_option")]
    min_c: Option<f64>,
    #[serde(rename = "PRCP_mm", deserialize_with = "csv::invalid_option")]
    prcp_mm: Option<f64>,
}

impl Database {
    /// Load observations from a CSV string.
    ///
    /// Returns the number of rows written. A later row for the same
    /// (station, date) replaces the earlier one.
    ///
    /// # Example CSV
    /// ```text
    /// station_id,station_name,lat,lon,date,TEMP_C,MAX_C,MIN_C,PRCP_mm
    /// RP000098429,NAIA MANILA,14.517,121.0,2020-01-01,27.1,31.0,23.4,0.0
    /// ```
    pub fn load_observations(&self, csv_data: &str) -> anyhow::Result<usize> {
        self.load_observations_reader(csv_data.as_bytes())
    }

    /// Load observations from a `.csv` or gzip-compressed `.csv.gz` file.
    pub fn load_observations_file(&self, path: impl AsRef<Path>) -> anyhow::Result<usize> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let is_gzip = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));
        let loaded = if is_gzip {
            self.load_observations_reader(GzDecoder::new(BufReader::new(file)))
        } else {
            self.load_observations_reader(BufReader::new(file))
        };
        let inserted = loaded.with_context(|| format!("loading {}", path.display()))?;
        log::info!("[GSOD] loader: {} -> {} observations", path.display(), inserted);
        Ok(inserted)
    }

    /// Load observations from any CSV reader, inside a single transaction.
    ///
    /// Rows without a station id or with an unparsable date are skipped.
    pub fn load_observations_reader<R: Read>(&self, reader: R) -> anyhow::Result<usize> {
        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction()?;
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut count = 0usize;
        let mut skipped = 0usize;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO gsod_daily
                 (station_id, station_name, lat, lon, date, TEMP_C, MAX_C, MIN_C, PRCP_mm)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for (line, result) in rdr.deserialize::<CsvObservation>().enumerate() {
                let r = result.with_context(|| format!("malformed CSV record {}", line + 1))?;

                if r.station_id.is_empty() {
                    skipped += 1;
                    continue;
                }
                let date = match parse_date(&r.date) {
                    Ok(d) => d,
                    Err(_) => {
                        skipped += 1;
                        continue;
                    }
                };

                stmt.execute(params![
                    r.station_id,
                    r.station_name,
                    r.lat,
                    r.lon,
                    format_date(&date),
                    r.temp_c,
                    r.max_c,
                    r.min_c,
                    r.prcp_mm,
                ])?;
                count += 1;
            }
        }
        tx.commit()?;
        log::info!(
            "[GSOD] loader: Loaded {} observations, skipped {} invalid",
            count,
            skipped
        );
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::HEADER;
    use crate::Database;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    #[test]
    fn load_observations_from_csv() {
        let db = Database::new().unwrap();
        let csv = format!(
            "{HEADER}\
RP000098429,NAIA MANILA,14.517,121.0,2020-01-01,27.1,31.0,23.4,0.0
RP000098429,NAIA MANILA,14.517,121.0,2020-01-02,27.8,31.6,24.0,3.2
RP000098430,BAGUIO,16.4,120.6,2020-01-01,18.5,22.0,15.0,0.0
"
        );
        assert_eq!(db.load_observations(&csv).unwrap(), 3);

        let conn = db.conn.borrow();
        let value: f64 = conn
            .query_row(
                "SELECT PRCP_mm FROM gsod_daily WHERE station_id = 'RP000098429' AND date = '2020-01-02'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!((value - 3.2).abs() < 1e-9);
    }

    #[test]
    fn load_observations_normalizes_compact_dates() {
        let db = Database::new().unwrap();
        let csv = format!("{HEADER}RP000098429,NAIA MANILA,14.517,121.0,20200131,27.1,31.0,23.4,0.0\n");
        db.load_observations(&csv).unwrap();

        let conn = db.conn.borrow();
        let date: String = conn
            .query_row("SELECT date FROM gsod_daily", [], |row| row.get(0))
            .unwrap();
        assert_eq!(date, "2020-01-31");
    }

    #[test]
    fn load_observations_stores_missing_values_as_null() {
        let db = Database::new().unwrap();
        let csv = format!(
            "{HEADER}\
RP000098429,NAIA MANILA,,,2020-01-01,,31.0,NA,
"
        );
        db.load_observations(&csv).unwrap();

        let conn = db.conn.borrow();
        let (lat, temp, max, min, prcp): (Option<f64>, Option<f64>, Option<f64>, Option<f64>, Option<f64>) = conn
            .query_row(
                "SELECT lat, TEMP_C, MAX_C, MIN_C, PRCP_mm FROM gsod_daily",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?)),
            )
            .unwrap();
        assert_eq!(lat, None);
        assert_eq!(temp, None);
        assert_eq!(max, Some(31.0));
        assert_eq!(min, None, "Non-numeric cells become NULL");
        assert_eq!(prcp, None);
    }

    #[test]
    fn load_observations_skips_rows_without_key() {
        let db = Database::new().unwrap();
        let csv = format!(
            "{HEADER}\
RP000098429,NAIA MANILA,14.517,121.0,2020-01-01,27.1,31.0,23.4,0.0
,NO ID,14.517,121.0,2020-01-02,27.1,31.0,23.4,0.0
RP000098429,NAIA MANILA,14.517,121.0,not-a-date,27.1,31.0,23.4,0.0
"
        );
        assert_eq!(db.load_observations(&csv).unwrap(), 1);
        assert_eq!(db.observation_count().unwrap(), 1);
    }

    #[test]
    fn load_observations_replaces_same_station_day() {
        let db = Database::new().unwrap();
        db.load_observations(&format!(
            "{HEADER}RP000098429,NAIA MANILA,14.517,121.0,2020-01-01,27.1,31.0,23.4,0.0\n"
        ))
        .unwrap();
        db.load_observations(&format!(
            "{HEADER}RP000098429,NAIA MANILA,14.517,121.0,2020-01-01,29.9,31.0,23.4,0.0\n"
        ))
        .unwrap();

        assert_eq!(db.observation_count().unwrap(), 1, "Should have 1 row after upsert");
        let conn = db.conn.borrow();
        let temp: f64 = conn
            .query_row("SELECT TEMP_C FROM gsod_daily", [], |row| row.get(0))
            .unwrap();
        assert!((temp - 29.9).abs() < 1e-9);
    }

    #[test]
    fn load_observations_file_reads_gzip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gsod_ph.csv.gz");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        write!(
            encoder,
            "{HEADER}RP000098429,NAIA MANILA,14.517,121.0,2020-01-01,27.1,31.0,23.4,0.0\n"
        )
        .unwrap();
        std::fs::write(&path, encoder.finish().unwrap()).unwrap();

        let db = Database::new().unwrap();
        assert_eq!(db.load_observations_file(&path).unwrap(), 1);
    }

    #[test]
    fn load_observations_file_reads_plain_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gsod_ph.csv");
        std::fs::write(
            &path,
            format!("{HEADER}RP000098429,NAIA MANILA,14.517,121.0,2020-01-01,27.1,31.0,23.4,0.0\n"),
        )
        .unwrap();

        let db = Database::new().unwrap();
        assert_eq!(db.load_observations_file(&path).unwrap(), 1);
    }

    #[test]
    fn load_observations_file_missing_is_error() {
        let db = Database::new().unwrap();
        assert!(db.load_observations_file("/nonexistent/gsod.csv").is_err());
    }
}
