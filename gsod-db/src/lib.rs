//! Embedded SQLite layer for GSOD daily station observations.
//!
//! This crate owns the single data-access object of a session, [`Database`],
//! and the two components built on it:
//!
//! - [`StationCatalog`] - the list of stations and each station's date coverage
//! - [`QueryEngine`] - per-station aggregation of one variable over a date range
//!
//! # Architecture
//!
//! - `Rc<RefCell<Connection>>` wrapper, constructed once and passed explicitly
//!   into the catalog and the engine (no global connection)
//! - SQLite via `rusqlite`, either in memory (loaded from CSV) or opened
//!   read-only from a file
//! - Every user-supplied value is a bound parameter; SQL text is assembled
//!   only from static fragments chosen by the typed [`gsod_core::QuerySpec`]
//!
//! # Usage
//!
//! ```rust
//! use gsod_core::{AggregationLevel, DateRange, Variable};
//! use gsod_db::{Database, QueryEngine, StationCatalog};
//!
//! let db = Database::new().unwrap();
//! db.load_observations(
//!     "station_id,station_name,lat,lon,date,TEMP_C,MAX_C,MIN_C,PRCP_mm\n\
//!      RP000098429,NAIA MANILA,14.517,121.0,2020-01-01,27.1,31.0,23.4,0.0\n",
//! )
//! .unwrap();
//!
//! let catalog = StationCatalog::new(db.clone());
//! let engine = QueryEngine::new(db, &catalog);
//! let range = DateRange::month(2020, 1).unwrap();
//! let rows = engine
//!     .query("RP000098429", range, Variable::MeanTemperature, AggregationLevel::Daily)
//!     .unwrap();
//! assert_eq!(rows.len(), 1);
//! ```
//!
//! # Tables
//!
//! See [`schema::create_schema`] for the SQL schema.

pub mod schema;
mod catalog;
mod engine;
mod error;
mod loader;
mod sql;

pub use catalog::StationCatalog;
pub use engine::QueryEngine;
pub use error::{QueryError, Result};

use rusqlite::{Connection, OpenFlags};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

/// SQLite database holding the `gsod_daily` observation table.
///
/// This struct is cheaply cloneable (via `Rc`); clones share one connection.
///
/// # Example
///
/// ```rust
/// use gsod_db::Database;
///
/// let db = Database::new().unwrap();
/// let inserted = db
///     .load_observations(
///         "station_id,station_name,lat,lon,date,TEMP_C,MAX_C,MIN_C,PRCP_mm\n\
///          RP000098429,NAIA MANILA,14.517,121.0,2020-01-01,27.1,31.0,23.4,0.0\n",
///     )
///     .unwrap();
/// assert_eq!(inserted, 1);
/// ```
#[derive(Clone)]
pub struct Database {
    conn: Rc<RefCell<Connection>>,
}

impl Database {
    /// Create a new in-memory database with the schema applied.
    ///
    /// The database is empty after creation; use the `load_*` methods
    /// to populate it.
    pub fn new() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::create_schema())?;
        Ok(Self::from_connection(conn))
    }

    /// Open an existing database file read-only.
    ///
    /// The schema is not applied: the file is expected to already contain
    /// a `gsod_daily` table. Its `date` column may hold ISO dates or
    /// midnight timestamps.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        log::info!("[GSOD] db: opened {} read-only", path.display());
        Ok(Self::from_connection(conn))
    }

    /// Create (or open) a database file for writing, with the schema applied.
    pub fn create(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        conn.execute_batch(schema::create_schema())?;
        log::info!("[GSOD] db: opened {} for writing", path.display());
        Ok(Self::from_connection(conn))
    }

    /// Total number of observation rows.
    pub fn observation_count(&self) -> anyhow::Result<i64> {
        let conn = self.conn.borrow();
        let count = conn.query_row("SELECT COUNT(*) FROM gsod_daily", [], |row| row.get(0))?;
        Ok(count)
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Rc::new(RefCell::new(conn)),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::Database;

    pub const HEADER: &str = "station_id,station_name,lat,lon,date,TEMP_C,MAX_C,MIN_C,PRCP_mm\n";

    /// Two stations. Manila has January-February 2020 plus a few 2021 days;
    /// Baguio has a handful of 2019 days.
    pub fn sample_db() -> Database {
        let db = Database::new().unwrap();
        let csv = format!(
            "{HEADER}\
RP000098429,NAIA MANILA,14.517,121.0,2020-01-01,27.0,31.0,23.0,0.0
RP000098429,NAIA MANILA,14.517,121.0,2020-01-02,28.0,32.0,24.0,1.0
RP000098429,NAIA MANILA,14.517,121.0,2020-01-03,26.0,30.0,22.0,0.99
RP000098429,NAIA MANILA,14.517,121.0,2020-01-15,29.0,33.0,25.0,12.5
RP000098429,NAIA MANILA,14.517,121.0,2020-01-31,25.0,29.0,21.0,3.25
RP000098429,NAIA MANILA,14.517,121.0,2020-02-01,30.0,34.0,26.0,
RP000098429,NAIA MANILA,14.517,121.0,2020-02-29,31.0,35.0,27.0,20.0
RP000098429,NAIA MANILA,14.517,121.0,2021-01-10,24.0,28.0,20.0,5.0
RP000098429,NAIA MANILA,14.517,121.0,2021-01-11,25.0,29.0,21.0,2.0
RP000098430,BAGUIO,16.4,120.6,2019-06-01,18.5,22.0,15.0,30.0
RP000098430,BAGUIO,16.4,120.6,2019-06-02,18.25,21.0,15.5,0.0
"
        );
        db.load_observations(&csv).unwrap();
        db
    }
}
