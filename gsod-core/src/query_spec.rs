use serde::Serialize;

use crate::date_range::DateRange;
use crate::error::{GsodError, Result};
use crate::variable::{AggregationLevel, Variable};

/// A validated (variable, aggregation level) pair.
///
/// Holding a `QuerySpec` means the combination is supported; the check
/// happens once, in [`QuerySpec::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct QuerySpec {
    variable: Variable,
    level: AggregationLevel,
}

impl QuerySpec {
    pub fn new(variable: Variable, level: AggregationLevel) -> Result<Self> {
        if !variable.supports(level) {
            return Err(GsodError::InvalidCombination { variable, level });
        }
        Ok(Self { variable, level })
    }

    pub fn variable(&self) -> Variable {
        self.variable
    }

    pub fn level(&self) -> AggregationLevel {
        self.level
    }

    /// Whether the selected date range restricts which observations are
    /// read. The month-of-year mean pools a station's whole history.
    pub fn uses_range(&self) -> bool {
        self.level != AggregationLevel::MonthOfYear
    }

    /// One-line caption for a chart of this query.
    pub fn describe(&self, range: &DateRange) -> String {
        match self.level {
            AggregationLevel::MonthOfYear => format!(
                "Showing {} averaged by calendar month across all years.",
                self.variable
            ),
            level => format!(
                "Showing {} aggregated {} from {}.",
                self.variable, level, range
            ),
        }
    }
}

/// Cache key identifying one engine call by the inputs that affect its rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub station_id: String,
    /// `None` when the spec ignores the range.
    pub range: Option<DateRange>,
    pub spec: QuerySpec,
}

impl QueryKey {
    pub fn new(station_id: &str, range: DateRange, spec: QuerySpec) -> Self {
        Self {
            station_id: station_id.to_string(),
            range: spec.uses_range().then_some(range),
            spec,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn rejects_unsupported_pairs() {
        assert_eq!(
            QuerySpec::new(Variable::RainyDays, AggregationLevel::Daily),
            Err(GsodError::InvalidCombination {
                variable: Variable::RainyDays,
                level: AggregationLevel::Daily,
            })
        );
        assert!(QuerySpec::new(Variable::TemperatureAnomaly, AggregationLevel::MonthOfYear).is_err());
        assert!(QuerySpec::new(Variable::Precipitation, AggregationLevel::MonthOfYear).is_ok());
    }

    #[test]
    fn month_of_year_ignores_range() {
        let spec = QuerySpec::new(Variable::MeanTemperature, AggregationLevel::MonthOfYear).unwrap();
        assert!(!spec.uses_range());
        let spec = QuerySpec::new(Variable::MeanTemperature, AggregationLevel::Yearly).unwrap();
        assert!(spec.uses_range());
    }

    #[test]
    fn key_drops_range_when_unused() {
        let january = DateRange::month(2020, 1).unwrap();
        let year = DateRange::year(1999).unwrap();

        let spec = QuerySpec::new(Variable::Precipitation, AggregationLevel::MonthOfYear).unwrap();
        let a = QueryKey::new("RP000098429", january, spec);
        assert_eq!(a.range, None);
        assert_eq!(a, QueryKey::new("RP000098429", year, spec));

        let spec = QuerySpec::new(Variable::Precipitation, AggregationLevel::Monthly).unwrap();
        let a = QueryKey::new("RP000098429", january, spec);
        assert_eq!(a.range, Some(january));
        assert_ne!(a, QueryKey::new("RP000098429", year, spec));
    }

    #[test]
    fn describe_caption() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 31).unwrap(),
        )
        .unwrap();
        let spec = QuerySpec::new(Variable::Precipitation, AggregationLevel::Monthly).unwrap();
        assert_eq!(
            spec.describe(&range),
            "Showing precipitation aggregated monthly from 2020-01-01 to 2020-01-31."
        );
        let spec = QuerySpec::new(Variable::MeanTemperature, AggregationLevel::MonthOfYear).unwrap();
        assert_eq!(
            spec.describe(&range),
            "Showing mean temperature averaged by calendar month across all years."
        );
    }
}
