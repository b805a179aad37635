//! Station catalog: which stations exist and which dates each one covers.
//!
//! Both lookups are memoized for the lifetime of the catalog. The cache is
//! explicit and owned here; call [`StationCatalog::invalidate`] after the
//! underlying table changes.

use crate::error::Result;
use crate::Database;
use chrono::NaiveDate;
use gsod_core::{Coverage, DateRange, GsodError, Station};
use rusqlite::{params, OptionalExtension};
use std::cell::RefCell;
use std::collections::HashMap;

pub struct StationCatalog {
    db: Database,
    stations: RefCell<Option<Vec<Station>>>,
    coverage: RefCell<HashMap<String, Coverage>>,
}

impl StationCatalog {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            stations: RefCell::new(None),
            coverage: RefCell::new(HashMap::new()),
        }
    }

    /// All stations, ordered by display name (ties broken by id).
    ///
    /// A station whose name or coordinates vary between rows is reported
    /// once, with the lexically greatest name and the largest coordinates
    /// seen for its id.
    pub fn list_stations(&self) -> Result<Vec<Station>> {
        if let Some(cached) = self.stations.borrow().as_ref() {
            return Ok(cached.clone());
        }

        let conn = self.db.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT station_id, MAX(station_name) AS name, MAX(lat), MAX(lon)
             FROM gsod_daily
             GROUP BY station_id
             ORDER BY name, station_id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Station {
                    station_id: row.get(0)?,
                    name: row.get(1)?,
                    latitude: row.get(2)?,
                    longitude: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        log::info!(
            "[GSOD] catalog: list_stations returned {} stations",
            rows.len()
        );

        *self.stations.borrow_mut() = Some(rows.clone());
        Ok(rows)
    }

    /// Metadata for one station.
    pub fn station(&self, station_id: &str) -> Result<Station> {
        self.list_stations()?
            .into_iter()
            .find(|s| s.station_id == station_id)
            .ok_or_else(|| GsodError::StationNotFound(station_id.to_string()).into())
    }

    /// First and last observation dates for a station.
    ///
    /// Fails with [`GsodError::StationNotFound`] when the station has no
    /// observations at all.
    pub fn date_coverage(&self, station_id: &str) -> Result<Coverage> {
        if let Some(cached) = self.coverage.borrow().get(station_id) {
            return Ok(cached.clone());
        }

        let conn = self.db.conn.borrow();
        let bounds: Option<(Option<NaiveDate>, Option<NaiveDate>)> = conn
            .query_row(
                "SELECT MIN(date(date)), MAX(date(date)) FROM gsod_daily WHERE station_id = ?1",
                params![station_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let (first, last) = match bounds {
            Some((Some(first), Some(last))) => (first, last),
            _ => return Err(GsodError::StationNotFound(station_id.to_string()).into()),
        };
        let coverage = Coverage {
            station_id: station_id.to_string(),
            range: DateRange::new(first, last)?,
        };
        log::debug!(
            "[GSOD] catalog: date_coverage({}) = {}",
            station_id,
            coverage.range
        );

        self.coverage
            .borrow_mut()
            .insert(station_id.to_string(), coverage.clone());
        Ok(coverage)
    }

    /// Fail with [`GsodError::StationNotFound`] unless the station has data.
    pub fn ensure_station(&self, station_id: &str) -> Result<()> {
        self.date_coverage(station_id).map(|_| ())
    }

    /// Drop every memoized station list and coverage entry.
    pub fn invalidate(&self) {
        self.stations.borrow_mut().take();
        self.coverage.borrow_mut().clear();
        log::debug!("[GSOD] catalog: cache invalidated");
    }
}
