//! Shared writers for the text, CSV and JSON output formats.

use serde::Serialize;
use std::io::Write;

/// Write `records` as headered CSV. Missing values become empty cells.
pub fn write_csv<T: Serialize>(records: &[T], out: &mut impl Write) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `value` as pretty-printed JSON followed by a newline.
pub fn write_json<T: Serialize + ?Sized>(value: &T, out: &mut impl Write) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Human-readable cell for an optional measurement.
pub fn fmt_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "-".to_string(),
    }
}
