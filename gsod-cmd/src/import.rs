//! Build a SQLite observation database from a CSV export.

use anyhow::Context;
use gsod_db::Database;
use log::info;
use std::io::Write;
use std::path::Path;

/// Load `csv` into the database at `db_path`, creating it when missing.
///
/// Rows already present for a (station, date) pair are replaced, so
/// importing the same export twice leaves the table unchanged.
pub fn run_import(csv: &Path, db_path: &Path, out: &mut impl Write) -> anyhow::Result<()> {
    let db = Database::create(db_path)
        .with_context(|| format!("Failed to create database {}", db_path.display()))?;
    let loaded = db.load_observations_file(csv)?;
    let total = db.observation_count()?;
    info!(
        "[GSOD] import: {} rows from {} into {}",
        loaded,
        csv.display(),
        db_path.display()
    );
    writeln!(
        out,
        "Imported {} observations into {} ({} total)",
        loaded,
        db_path.display(),
        total
    )?;
    Ok(())
}
