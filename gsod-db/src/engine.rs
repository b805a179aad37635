//! Aggregation query engine.
//!
//! One call aggregates one variable of one station over a date range at a
//! given level. Calls are deterministic reads; results are memoized by
//! their full parameter set until [`QueryEngine::invalidate`].

use crate::catalog::StationCatalog;
use crate::error::Result;
use crate::sql::{self, PeriodColumn};
use crate::Database;
use chrono::NaiveDate;
use gsod_core::{
    AggregationLevel, DateRange, Observation, Period, QueryKey, QueryResultRow, QuerySpec,
    Variable,
};
use rusqlite::{params, Row};
use std::cell::RefCell;
use std::collections::HashMap;

pub struct QueryEngine<'a> {
    db: Database,
    catalog: &'a StationCatalog,
    cache: RefCell<HashMap<QueryKey, Vec<QueryResultRow>>>,
}

impl<'a> QueryEngine<'a> {
    pub fn new(db: Database, catalog: &'a StationCatalog) -> Self {
        Self {
            db,
            catalog,
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn catalog(&self) -> &'a StationCatalog {
        self.catalog
    }

    /// Aggregate `variable` for `station_id` over `range` at `level`.
    ///
    /// Rows are strictly ascending by period. An empty `Vec` means the
    /// station has no observations in the range, which is not an error.
    ///
    /// # Errors
    ///
    /// - [`gsod_core::GsodError::InvalidCombination`] if `variable` cannot be
    ///   aggregated at `level`
    /// - [`gsod_core::GsodError::StationNotFound`] if the station is unknown
    pub fn query(
        &self,
        station_id: &str,
        range: DateRange,
        variable: Variable,
        level: AggregationLevel,
    ) -> Result<Vec<QueryResultRow>> {
        let spec = QuerySpec::new(variable, level)?;
        self.query_spec(station_id, range, spec)
    }

    /// Same as [`QueryEngine::query`] for an already validated spec.
    pub fn query_spec(
        &self,
        station_id: &str,
        range: DateRange,
        spec: QuerySpec,
    ) -> Result<Vec<QueryResultRow>> {
        self.catalog.ensure_station(station_id)?;

        let key = QueryKey::new(station_id, range, spec);
        if let Some(cached) = self.cache.borrow().get(&key) {
            log::debug!("[GSOD] query: cache hit for {:?}", key);
            return Ok(cached.clone());
        }

        let buckets = self.run_plan(station_id, &range, &spec)?;
        let rows = match spec.level() {
            AggregationLevel::MonthOfYear => fill_months(buckets),
            _ if spec.variable() == Variable::TemperatureAnomaly => to_anomalies(buckets),
            _ => buckets
                .into_iter()
                .map(|(period, value)| QueryResultRow::new(period, value))
                .collect(),
        };
        log::info!(
            "[GSOD] query: {} {} {} for {} returned {} rows",
            spec.variable(),
            spec.level(),
            range,
            station_id,
            rows.len()
        );

        self.cache.borrow_mut().insert(key, rows.clone());
        Ok(rows)
    }

    /// Raw daily observations for the data table, ordered by date.
    pub fn observations(&self, station_id: &str, range: DateRange) -> Result<Vec<Observation>> {
        self.catalog.ensure_station(station_id)?;

        let conn = self.db.conn.borrow();
        let mut stmt = conn.prepare(sql::OBSERVATIONS_SQL)?;
        let rows = stmt
            .query_map(params![station_id, range.start(), range.end()], |row| {
                Ok(Observation {
                    date: row.get(0)?,
                    mean_temp_c: row.get(1)?,
                    max_temp_c: row.get(2)?,
                    min_temp_c: row.get(3)?,
                    precipitation_mm: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        log::info!(
            "[GSOD] query: observations for {} {} returned {} records",
            station_id,
            range,
            rows.len()
        );
        Ok(rows)
    }

    /// Drop every memoized query result, along with the catalog's station
    /// list and coverage.
    pub fn invalidate(&self) {
        self.cache.borrow_mut().clear();
        self.catalog.invalidate();
    }

    /// Execute the SQL for `spec`, returning unrounded bucket values.
    fn run_plan(
        &self,
        station_id: &str,
        range: &DateRange,
        spec: &QuerySpec,
    ) -> Result<Vec<(Period, Option<f64>)>> {
        let plan = sql::plan(spec);
        let conn = self.db.conn.borrow();
        let mut stmt = conn.prepare(&plan.sql)?;

        let read_row = |row: &Row<'_>| -> rusqlite::Result<(Period, Option<f64>)> {
            let period = match plan.period {
                PeriodColumn::Date => Period::Date(row.get::<_, NaiveDate>(0)?),
                PeriodColumn::Month => Period::Month(row.get::<_, u32>(0)?),
            };
            Ok((period, row.get(1)?))
        };

        let rows = if plan.binds_range {
            stmt.query_map(params![station_id, range.start(), range.end()], read_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?
        } else {
            stmt.query_map(params![station_id], read_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?
        };
        Ok(rows)
    }
}

/// Re-express bucket means relative to their own average.
///
/// The baseline is the mean of the non-null bucket values in the result,
/// so it moves whenever the selected range does.
fn to_anomalies(buckets: Vec<(Period, Option<f64>)>) -> Vec<QueryResultRow> {
    let present: Vec<f64> = buckets.iter().filter_map(|(_, v)| *v).collect();
    if present.is_empty() {
        return buckets
            .into_iter()
            .map(|(period, _)| QueryResultRow::new(period, None))
            .collect();
    }
    let baseline = present.iter().sum::<f64>() / present.len() as f64;
    log::debug!("[GSOD] query: anomaly baseline {:.3}", baseline);

    buckets
        .into_iter()
        .map(|(period, value)| QueryResultRow::new(period, value.map(|v| v - baseline)))
        .collect()
}

/// Expand month-of-year buckets to all twelve months, in order.
///
/// A station with no observations at all yields no rows.
fn fill_months(buckets: Vec<(Period, Option<f64>)>) -> Vec<QueryResultRow> {
    if buckets.is_empty() {
        return Vec::new();
    }
    let by_month: HashMap<Period, Option<f64>> = buckets.into_iter().collect();
    (1..=12)
        .map(|m| {
            let period = Period::Month(m);
            let value = by_month.get(&period).copied().flatten();
            QueryResultRow::new(period, value)
        })
        .collect()
}
