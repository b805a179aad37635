use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::variable::Variable;

/// One day of measurements at one station.
///
/// Every measurement is optional: GSOD stations routinely skip a sensor for
/// a day while still reporting the others. Missing days are simply absent
/// from the table rather than filled with nulls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    /// Mean temperature (°C)
    pub mean_temp_c: Option<f64>,
    /// Maximum temperature (°C)
    pub max_temp_c: Option<f64>,
    /// Minimum temperature (°C)
    pub min_temp_c: Option<f64>,
    /// Precipitation (mm)
    pub precipitation_mm: Option<f64>,
}

impl Observation {
    /// The raw value backing a variable for this day.
    ///
    /// Derived variables read the column they are computed from: rainy-day
    /// counts read precipitation, anomalies read mean temperature.
    pub fn value_of(&self, variable: Variable) -> Option<f64> {
        match variable {
            Variable::MeanTemperature | Variable::TemperatureAnomaly => self.mean_temp_c,
            Variable::MaxTemperature => self.max_temp_c,
            Variable::MinTemperature => self.min_temp_c,
            Variable::Precipitation | Variable::RainyDays => self.precipitation_mm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_of_maps_derived_variables() {
        let obs = Observation {
            date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            mean_temp_c: Some(27.5),
            max_temp_c: Some(31.0),
            min_temp_c: None,
            precipitation_mm: Some(4.2),
        };
        assert_eq!(obs.value_of(Variable::TemperatureAnomaly), Some(27.5));
        assert_eq!(obs.value_of(Variable::RainyDays), Some(4.2));
        assert_eq!(obs.value_of(Variable::MaxTemperature), Some(31.0));
        assert_eq!(obs.value_of(Variable::MinTemperature), None);
    }
}
