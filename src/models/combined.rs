use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::observation::DailyObservation;
use super::variable::Variable;

/// Continuous daily record for one named location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedRecord {
    pub location: String,
    /// Variables present in at least one contributing segment, in `Variable::ALL` order.
    pub variables: Vec<Variable>,
    pub observations: Vec<DailyObservation>,
}

impl CombinedRecord {
    pub fn new(
        location: impl Into<String>,
        variables: Vec<Variable>,
        observations: Vec<DailyObservation>,
    ) -> Self {
        Self {
            location: location.into(),
            variables,
            observations,
        }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.observations.first().map(|o| o.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.last().map(|o| o.date)
    }

    pub fn has_variable(&self, variable: Variable) -> bool {
        self.variables.contains(&variable)
    }

    /// Daily series for one variable, optionally restricted to `from..=to`.
    pub fn series(
        &self,
        variable: Variable,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Vec<(NaiveDate, Option<f64>)> {
        self.observations
            .iter()
            .filter(|o| from.map_or(true, |f| o.date >= f) && to.map_or(true, |t| o.date <= t))
            .map(|o| (o.date, o.value(variable)))
            .collect()
    }

    pub fn is_sorted_by_date(&self) -> bool {
        self.observations.windows(2).all(|w| w[0].date <= w[1].date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_window() {
        let obs: Vec<DailyObservation> = (1..=5)
            .map(|d| {
                DailyObservation::new(NaiveDate::from_ymd_opt(2000, 1, d).unwrap(), Some(1001))
                    .with_value(Variable::TotalPrecipitation, d as f64)
            })
            .collect();
        let record = CombinedRecord::new("test site", vec![Variable::TotalPrecipitation], obs);

        let from = NaiveDate::from_ymd_opt(2000, 1, 2);
        let to = NaiveDate::from_ymd_opt(2000, 1, 3);
        let series = record.series(Variable::TotalPrecipitation, from, to);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].1, Some(2.0));
        assert_eq!(record.first_date(), NaiveDate::from_ymd_opt(2000, 1, 1));
        assert!(record.is_sorted_by_date());
    }
}
