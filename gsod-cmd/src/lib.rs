//! Command implementations for the GSOD CLI.
//!
//! Every subcommand reads from one observation source (`--db`, or the
//! `GSOD_DB` environment variable) and writes to the given output.

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};
use gsod_core::dates::{parse_range_bound, RangeBound};
use gsod_core::{AggregationLevel, GsodError, Variable};
use gsod_db::Database;
use std::io::Write;
use std::path::{Path, PathBuf};

pub mod import;
pub mod output;
pub mod query;
pub mod stations;

/// Where observations come from.
#[derive(Args, Debug, Clone)]
pub struct Source {
    /// SQLite database file, or a `.csv` / `.csv.gz` export loaded into memory
    #[arg(long, env = "GSOD_DB")]
    pub db: PathBuf,
}

impl Source {
    pub fn open(&self) -> anyhow::Result<Database> {
        open_source(&self.db)
    }
}

/// Open `path` as SQLite, or load it into memory if it is a CSV export.
pub fn open_source(path: &Path) -> anyhow::Result<Database> {
    let name = path.to_string_lossy().to_ascii_lowercase();
    if name.ends_with(".csv") || name.ends_with(".csv.gz") {
        let db = Database::new()?;
        db.load_observations_file(path)?;
        Ok(db)
    } else {
        Database::open(path)
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Csv,
    Json,
}

fn parse_start(s: &str) -> Result<NaiveDate, GsodError> {
    parse_range_bound(s, RangeBound::Start)
}

fn parse_end(s: &str) -> Result<NaiveDate, GsodError> {
    parse_range_bound(s, RangeBound::End)
}

/// Station and optional date bounds shared by `query` and `table`.
#[derive(Args, Debug, Clone)]
pub struct Selection {
    /// Station identifier, e.g. RP000098429
    #[arg(short, long)]
    pub station: String,

    /// First day (YYYY-MM-DD, YYYY-MM or YYYY); defaults to the station's first observation
    #[arg(long, value_parser = parse_start)]
    pub start: Option<NaiveDate>,

    /// Last day (YYYY-MM-DD, YYYY-MM or YYYY); defaults to the station's last observation
    #[arg(long, value_parser = parse_end)]
    pub end: Option<NaiveDate>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List stations, ordered by name
    Stations {
        #[command(flatten)]
        source: Source,

        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Show the first and last observation date of a station
    Coverage {
        #[command(flatten)]
        source: Source,

        /// Station identifier
        station: String,

        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Aggregate one variable of one station
    Query {
        #[command(flatten)]
        source: Source,

        #[command(flatten)]
        selection: Selection,

        /// mean-temp, max-temp, min-temp, precipitation, rainy-days or anomaly
        #[arg(short, long)]
        variable: Variable,

        /// daily, monthly, yearly or month-of-year
        #[arg(short, long, default_value = "daily")]
        level: AggregationLevel,

        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Print the raw daily observations of one station
    Table {
        #[command(flatten)]
        source: Source,

        #[command(flatten)]
        selection: Selection,

        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Build a SQLite database file from a CSV export
    Import {
        /// Input `.csv` or `.csv.gz` export of the gsod_daily table
        #[arg(short, long)]
        csv: PathBuf,

        /// Output SQLite file (created if missing)
        #[arg(short, long)]
        out: PathBuf,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_to(command, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Execute `command`, writing its report to `out`.
pub fn run_to(command: Command, out: &mut impl Write) -> anyhow::Result<()> {
    match command {
        Command::Stations { source, format } => {
            stations::run_stations(&source.open()?, format, out)
        }
        Command::Coverage {
            source,
            station,
            format,
        } => stations::run_coverage(&source.open()?, &station, format, out),
        Command::Query {
            source,
            selection,
            variable,
            level,
            format,
        } => query::run_query(&source.open()?, &selection, variable, level, format, out),
        Command::Table {
            source,
            selection,
            format,
        } => query::run_table(&source.open()?, &selection, format, out),
        Command::Import { csv, out: db_path } => import::run_import(&csv, &db_path, out),
    }
}
