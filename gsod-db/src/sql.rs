//! SQL assembly for aggregation queries.
//!
//! A [`QuerySpec`] selects one static fragment per axis: the measured
//! expression (by variable), the bucket expression (by level) and the
//! reducer. User input never reaches the SQL text; the station id and
//! the range bounds are always bound as `?1..?3`.
//!
//! The `date` column is read through `date(date)` so files that store
//! days as midnight timestamps (`2020-01-31 00:00:00`) bucket and filter
//! the same as plain ISO dates.

use gsod_core::variable::RAINY_DAY_THRESHOLD_MM;
use gsod_core::{AggregationLevel, QuerySpec, Reducer, Variable};

/// How the `period` column of a plan's result is typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PeriodColumn {
    /// ISO date text
    Date,
    /// Integer month number, 1-12
    Month,
}

/// A ready-to-run statement for one [`QuerySpec`].
#[derive(Debug, Clone)]
pub(crate) struct SqlPlan {
    pub sql: String,
    /// Whether `?2`/`?3` (range start/end) appear in `sql`.
    pub binds_range: bool,
    pub period: PeriodColumn,
}

/// Column or expression producing one value per observation day.
fn measure_expr(variable: Variable) -> String {
    match variable {
        Variable::MeanTemperature | Variable::TemperatureAnomaly => "TEMP_C".to_string(),
        Variable::MaxTemperature => "MAX_C".to_string(),
        Variable::MinTemperature => "MIN_C".to_string(),
        Variable::Precipitation => "PRCP_mm".to_string(),
        // NULL precipitation stays NULL so an all-missing bucket reports NULL, not 0
        Variable::RainyDays => format!(
            "CASE WHEN PRCP_mm IS NULL THEN NULL WHEN PRCP_mm >= {RAINY_DAY_THRESHOLD_MM:.2} THEN 1 ELSE 0 END"
        ),
    }
}

fn bucket_expr(level: AggregationLevel) -> &'static str {
    match level {
        AggregationLevel::Daily => "date(date)",
        AggregationLevel::Monthly => "strftime('%Y-%m-01', date)",
        AggregationLevel::Yearly => "strftime('%Y-01-01', date)",
        AggregationLevel::MonthOfYear => "CAST(strftime('%m', date) AS INTEGER)",
    }
}

fn reducer_fn(reducer: Reducer) -> &'static str {
    match reducer {
        Reducer::Avg => "AVG",
        Reducer::Sum => "SUM",
    }
}

/// Build the statement for `spec`.
pub(crate) fn plan(spec: &QuerySpec) -> SqlPlan {
    let variable = spec.variable();
    let level = spec.level();
    let measure = measure_expr(variable);
    let reducer = variable.reducer();

    if level == AggregationLevel::MonthOfYear {
        let bucket = bucket_expr(level);
        let sql = match reducer {
            // Average over years of each year's monthly total
            Reducer::Sum => format!(
                "SELECT month AS period, AVG(total) AS value
                 FROM (
                     SELECT strftime('%Y', date) AS year, {bucket} AS month, SUM({measure}) AS total
                     FROM gsod_daily
                     WHERE station_id = ?1
                     GROUP BY year, month
                 )
                 GROUP BY month
                 ORDER BY month"
            ),
            Reducer::Avg => format!(
                "SELECT {bucket} AS period, AVG({measure}) AS value
                 FROM gsod_daily
                 WHERE station_id = ?1
                 GROUP BY period
                 ORDER BY period"
            ),
        };
        return SqlPlan {
            sql,
            binds_range: false,
            period: PeriodColumn::Month,
        };
    }

    let sql = format!(
        "SELECT {bucket} AS period, {agg}({measure}) AS value
         FROM gsod_daily
         WHERE station_id = ?1 AND date(date) BETWEEN ?2 AND ?3
         GROUP BY period
         ORDER BY period",
        bucket = bucket_expr(level),
        agg = reducer_fn(reducer),
    );
    SqlPlan {
        sql,
        binds_range: true,
        period: PeriodColumn::Date,
    }
}

/// Raw daily rows for the data table view.
pub(crate) const OBSERVATIONS_SQL: &str = "SELECT date(date) AS day, TEMP_C, MAX_C, MIN_C, PRCP_mm
     FROM gsod_daily
     WHERE station_id = ?1 AND date(date) BETWEEN ?2 AND ?3
     ORDER BY day";

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn spec(variable: Variable, level: AggregationLevel) -> QuerySpec {
        QuerySpec::new(variable, level).unwrap()
    }

    #[test]
    fn every_supported_pair_prepares() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(crate::schema::create_schema()).unwrap();
        for variable in Variable::ALL {
            for &level in variable.supported_levels() {
                let plan = plan(&spec(variable, level));
                let stmt = conn
                    .prepare(&plan.sql)
                    .unwrap_or_else(|e| panic!("{variable}/{level} failed to prepare: {e}"));
                let expected_params = if plan.binds_range { 3 } else { 1 };
                assert_eq!(stmt.parameter_count(), expected_params, "{variable}/{level}");
            }
        }
        conn.prepare(OBSERVATIONS_SQL).unwrap();
    }

    #[test]
    fn reducer_follows_variable() {
        let sql = plan(&spec(Variable::Precipitation, AggregationLevel::Monthly)).sql;
        assert!(sql.contains("SUM(PRCP_mm)"));
        let sql = plan(&spec(Variable::MaxTemperature, AggregationLevel::Yearly)).sql;
        assert!(sql.contains("AVG(MAX_C)"));
        assert!(sql.contains("strftime('%Y-01-01', date)"));
    }

    #[test]
    fn rainy_days_counts_threshold_days() {
        let sql = plan(&spec(Variable::RainyDays, AggregationLevel::Monthly)).sql;
        assert!(sql.contains("PRCP_mm >= 1.00"));
        assert!(sql.starts_with("SELECT strftime('%Y-%m-01', date) AS period, SUM(CASE"));
    }

    #[test]
    fn month_of_year_ignores_range() {
        let plan = plan(&spec(Variable::Precipitation, AggregationLevel::MonthOfYear));
        assert!(!plan.binds_range);
        assert_eq!(plan.period, PeriodColumn::Month);
        assert!(plan.sql.contains("AVG(total)"));
        assert!(!plan.sql.contains("?2"));
    }

    #[test]
    fn dates_are_normalised_before_filtering() {
        let plan = plan(&spec(Variable::MeanTemperature, AggregationLevel::Daily));
        assert!(plan.sql.starts_with("SELECT date(date) AS period"));
        assert!(plan.sql.contains("date(date) BETWEEN ?2 AND ?3"));
        assert!(OBSERVATIONS_SQL.contains("date(date) BETWEEN ?2 AND ?3"));
    }
}
