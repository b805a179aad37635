//! Station listing and coverage commands.

use crate::output::{write_csv, write_json};
use crate::OutputFormat;
use gsod_core::dates::format_date;
use gsod_db::{Database, StationCatalog};
use log::info;
use std::io::Write;

/// Print every station, ordered by name.
pub fn run_stations(db: &Database, format: OutputFormat, out: &mut impl Write) -> anyhow::Result<()> {
    let catalog = StationCatalog::new(db.clone());
    let stations = catalog.list_stations()?;
    info!("Listing {} stations", stations.len());

    match format {
        OutputFormat::Text => {
            for station in &stations {
                match (station.latitude, station.longitude) {
                    (Some(lat), Some(lon)) => {
                        writeln!(out, "{}  ({:.3}, {:.3})", station.label(), lat, lon)?
                    }
                    _ => writeln!(out, "{}", station.label())?,
                }
            }
        }
        OutputFormat::Csv => write_csv(&stations, out)?,
        OutputFormat::Json => write_json(&stations, out)?,
    }
    Ok(())
}

/// Print the first and last observation dates of one station.
pub fn run_coverage(
    db: &Database,
    station_id: &str,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let catalog = StationCatalog::new(db.clone());
    let station = catalog.station(station_id)?;
    let coverage = catalog.date_coverage(station_id)?;

    match format {
        OutputFormat::Text => writeln!(
            out,
            "{}: {} ({} days)",
            station.label(),
            coverage.range,
            coverage.range.num_days()
        )?,
        OutputFormat::Csv => {
            // Coverage flattens its range, which the csv serializer cannot express
            let first = format_date(&coverage.first());
            let last = format_date(&coverage.last());
            let mut wtr = csv::Writer::from_writer(out);
            wtr.write_record(["station_id", "start", "end"])?;
            wtr.write_record([coverage.station_id.as_str(), first.as_str(), last.as_str()])?;
            wtr.flush()?;
        }
        OutputFormat::Json => write_json(&coverage, out)?,
    }
    Ok(())
}
