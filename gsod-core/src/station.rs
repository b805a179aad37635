use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date_range::DateRange;

/// A GSOD weather station.
///
/// Station metadata is not stored separately: it is derived from the
/// distinct station tuples of the daily observation table.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Station {
    /// GSOD station identifier (e.g., "RP000098429")
    pub station_id: String,
    /// Human-readable name of the station
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees
    pub longitude: Option<f64>,
}

impl Station {
    /// Selection-list label: `"<id> – <name>"`.
    pub fn label(&self) -> String {
        format!("{} – {}", self.station_id, self.name)
    }
}

/// First and last observation dates for one station.
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct Coverage {
    pub station_id: String,
    #[serde(flatten)]
    pub range: DateRange,
}

impl Coverage {
    pub fn first(&self) -> NaiveDate {
        self.range.start()
    }

    pub fn last(&self) -> NaiveDate {
        self.range.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_label() {
        let station = Station {
            station_id: "RP000098429".to_string(),
            name: "NAIA MANILA".to_string(),
            latitude: Some(14.517),
            longitude: Some(121.0),
        };
        assert_eq!(station.label(), "RP000098429 – NAIA MANILA");
    }

    #[test]
    fn test_coverage_bounds() {
        let first = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
        let last = NaiveDate::from_ymd_opt(2020, 12, 31).unwrap();
        let coverage = Coverage {
            station_id: "RP000098429".to_string(),
            range: DateRange::new(first, last).unwrap(),
        };
        assert_eq!(coverage.first(), first);
        assert_eq!(coverage.last(), last);
    }
}
