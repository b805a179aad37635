//! Aggregation and raw-table commands.

use crate::output::{fmt_value, write_csv, write_json};
use crate::{OutputFormat, Selection};
use gsod_core::{
    AggregationLevel, ChartHint, DateRange, QueryResultRow, QuerySpec, Station, Variable,
};
use gsod_db::{Database, QueryEngine, StationCatalog};
use log::{info, warn};
use serde::Serialize;
use std::io::Write;

const NO_DATA: &str = "No data available for the selected options.";

/// Everything a chart needs, as emitted by `query --format json`.
#[derive(Debug, Serialize)]
struct QueryReport {
    station: Station,
    variable: Variable,
    level: AggregationLevel,
    range: DateRange,
    caption: String,
    chart: ChartHint,
    rows: Vec<QueryResultRow>,
}

/// Fill unset bounds of `selection` from the station's coverage.
fn resolve_range(catalog: &StationCatalog, selection: &Selection) -> anyhow::Result<DateRange> {
    let (start, end) = match (selection.start, selection.end) {
        (Some(start), Some(end)) => (start, end),
        (start, end) => {
            let coverage = catalog.date_coverage(&selection.station)?;
            (
                start.unwrap_or(coverage.first()),
                end.unwrap_or(coverage.last()),
            )
        }
    };
    Ok(DateRange::new(start, end)?)
}

/// Aggregate one variable for the selected station and print the series.
pub fn run_query(
    db: &Database,
    selection: &Selection,
    variable: Variable,
    level: AggregationLevel,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let spec = QuerySpec::new(variable, level)?;
    let catalog = StationCatalog::new(db.clone());
    let station = catalog.station(&selection.station)?;
    let range = resolve_range(&catalog, selection)?;

    let engine = QueryEngine::new(db.clone(), &catalog);
    let rows = engine.query_spec(&station.station_id, range, spec)?;
    let caption = spec.describe(&range);
    info!("{} ({} rows)", caption, rows.len());
    if rows.is_empty() {
        warn!("{}", NO_DATA);
    }

    match format {
        OutputFormat::Text => {
            writeln!(out, "{}", station.label())?;
            writeln!(out, "{}", caption)?;
            if rows.is_empty() {
                writeln!(out, "{}", NO_DATA)?;
            } else {
                writeln!(out, "{:<12}{:>10}", "period", "value")?;
                for row in &rows {
                    writeln!(out, "{:<12}{:>10}", row.period.to_string(), fmt_value(row.value))?;
                }
            }
        }
        OutputFormat::Csv => write_csv(&rows, out)?,
        OutputFormat::Json => {
            let report = QueryReport {
                station,
                variable,
                level,
                range,
                caption,
                chart: variable.chart_hint(),
                rows,
            };
            write_json(&report, out)?
        }
    }
    Ok(())
}

/// Print the raw daily observations for the selected station.
pub fn run_table(
    db: &Database,
    selection: &Selection,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let catalog = StationCatalog::new(db.clone());
    let station = catalog.station(&selection.station)?;
    let range = resolve_range(&catalog, selection)?;
    let engine = QueryEngine::new(db.clone(), &catalog);
    let observations = engine.observations(&station.station_id, range)?;
    if observations.is_empty() {
        warn!("{}", NO_DATA);
    }

    match format {
        OutputFormat::Text => {
            writeln!(out, "{}", station.label())?;
            writeln!(
                out,
                "{:<12}{:>8}{:>8}{:>8}{:>10}",
                "date", "TEMP_C", "MAX_C", "MIN_C", "PRCP_mm"
            )?;
            for obs in &observations {
                writeln!(
                    out,
                    "{:<12}{:>8}{:>8}{:>8}{:>10}",
                    obs.date.to_string(),
                    fmt_value(obs.mean_temp_c),
                    fmt_value(obs.max_temp_c),
                    fmt_value(obs.min_temp_c),
                    fmt_value(obs.precipitation_mm)
                )?;
            }
        }
        OutputFormat::Csv => write_csv(&observations, out)?,
        OutputFormat::Json => write_json(&observations, out)?,
    }
    Ok(())
}
