//! The variables a caller can chart and the levels they can be bucketed at.
//!
//! Which (variable, level) pairs are valid, and how each variable reduces a
//! bucket, lives here as data so the query layer never branches on it ad hoc.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GsodError;

/// Precipitation at or above this many millimetres makes a day rainy.
pub const RAINY_DAY_THRESHOLD_MM: f64 = 1.0;

/// A chartable quantity derived from daily observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variable {
    MeanTemperature,
    MaxTemperature,
    MinTemperature,
    Precipitation,
    /// Number of days with precipitation >= [`RAINY_DAY_THRESHOLD_MM`]
    RainyDays,
    /// Mean temperature relative to the mean over the selected range
    TemperatureAnomaly,
}

/// Time bucket used to aggregate daily observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AggregationLevel {
    Daily,
    Monthly,
    Yearly,
    /// One bucket per calendar month (1-12), pooling every year on record
    MonthOfYear,
}

/// How values inside one bucket collapse to a single number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reducer {
    Avg,
    Sum,
}

/// Mark type suggested for plotting a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartMark {
    Bar,
    Line,
}

/// Presentation hint handed to whatever renders the series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartHint {
    pub mark: ChartMark,
    pub y_axis_label: &'static str,
    /// Fixed y-axis domain, if the variable has a conventional one.
    pub y_domain: Option<(f64, f64)>,
}

const ALL_LEVELS: &[AggregationLevel] = &[
    AggregationLevel::Daily,
    AggregationLevel::Monthly,
    AggregationLevel::Yearly,
    AggregationLevel::MonthOfYear,
];

impl Variable {
    pub const ALL: [Variable; 6] = [
        Variable::MeanTemperature,
        Variable::MaxTemperature,
        Variable::MinTemperature,
        Variable::Precipitation,
        Variable::RainyDays,
        Variable::TemperatureAnomaly,
    ];

    /// Canonical command-line spelling.
    pub fn slug(self) -> &'static str {
        match self {
            Variable::MeanTemperature => "mean-temp",
            Variable::MaxTemperature => "max-temp",
            Variable::MinTemperature => "min-temp",
            Variable::Precipitation => "precipitation",
            Variable::RainyDays => "rainy-days",
            Variable::TemperatureAnomaly => "anomaly",
        }
    }

    /// Levels this variable may be aggregated at.
    pub fn supported_levels(self) -> &'static [AggregationLevel] {
        match self {
            Variable::RainyDays => &[AggregationLevel::Monthly, AggregationLevel::Yearly],
            Variable::TemperatureAnomaly => &[
                AggregationLevel::Daily,
                AggregationLevel::Monthly,
                AggregationLevel::Yearly,
            ],
            _ => ALL_LEVELS,
        }
    }

    pub fn supports(self, level: AggregationLevel) -> bool {
        self.supported_levels().contains(&level)
    }

    /// Totals for water quantities, means for the temperature family.
    pub fn reducer(self) -> Reducer {
        match self {
            Variable::Precipitation | Variable::RainyDays => Reducer::Sum,
            Variable::MeanTemperature
            | Variable::MaxTemperature
            | Variable::MinTemperature
            | Variable::TemperatureAnomaly => Reducer::Avg,
        }
    }

    pub fn chart_hint(self) -> ChartHint {
        match self {
            Variable::Precipitation => ChartHint {
                mark: ChartMark::Bar,
                y_axis_label: "Precipitation (mm)",
                y_domain: None,
            },
            Variable::RainyDays => ChartHint {
                mark: ChartMark::Bar,
                y_axis_label: "Rainy days",
                y_domain: None,
            },
            Variable::TemperatureAnomaly => ChartHint {
                mark: ChartMark::Line,
                y_axis_label: "Temperature anomaly (°C)",
                y_domain: None,
            },
            Variable::MeanTemperature | Variable::MaxTemperature | Variable::MinTemperature => {
                ChartHint {
                    mark: ChartMark::Line,
                    y_axis_label: "Temperature (°C)",
                    y_domain: Some((-5.0, 40.0)),
                }
            }
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Variable::MeanTemperature => "mean temperature",
            Variable::MaxTemperature => "max temperature",
            Variable::MinTemperature => "min temperature",
            Variable::Precipitation => "precipitation",
            Variable::RainyDays => "rainy-day count",
            Variable::TemperatureAnomaly => "temperature anomaly",
        };
        f.write_str(name)
    }
}

impl FromStr for Variable {
    type Err = GsodError;

    /// Accepts the slug, a few short aliases, and the source column names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "mean-temp" | "mean-temperature" | "temp" | "temp-c" => Ok(Variable::MeanTemperature),
            "max-temp" | "max-temperature" | "max-c" => Ok(Variable::MaxTemperature),
            "min-temp" | "min-temperature" | "min-c" => Ok(Variable::MinTemperature),
            "precipitation" | "prcp" | "prcp-mm" => Ok(Variable::Precipitation),
            "rainy-days" | "rainy-day-count" => Ok(Variable::RainyDays),
            "anomaly" | "temperature-anomaly" | "temp-anomaly" => {
                Ok(Variable::TemperatureAnomaly)
            }
            _ => Err(GsodError::UnknownVariable(s.to_string())),
        }
    }
}

impl AggregationLevel {
    pub const ALL: [AggregationLevel; 4] = [
        AggregationLevel::Daily,
        AggregationLevel::Monthly,
        AggregationLevel::Yearly,
        AggregationLevel::MonthOfYear,
    ];
}

impl fmt::Display for AggregationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AggregationLevel::Daily => "daily",
            AggregationLevel::Monthly => "monthly",
            AggregationLevel::Yearly => "yearly",
            AggregationLevel::MonthOfYear => "month-of-year",
        };
        f.write_str(name)
    }
}

impl FromStr for AggregationLevel {
    type Err = GsodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "daily" | "day" => Ok(AggregationLevel::Daily),
            "monthly" | "month" => Ok(AggregationLevel::Monthly),
            "yearly" | "year" | "annual" => Ok(AggregationLevel::Yearly),
            "month-of-year" | "monthly-mean" | "climatology" => Ok(AggregationLevel::MonthOfYear),
            _ => Err(GsodError::UnknownLevel(s.to_string())),
        }
    }
}
