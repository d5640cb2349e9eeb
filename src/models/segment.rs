use chrono::NaiveDate;

use super::anomaly::DataAnomaly;
use super::observation::DailyObservation;
use super::variable::Variable;

/// Daily rows read from one raw station file, identified by climate identifier.
#[derive(Debug, Clone)]
pub struct StationSegment {
    pub climate_identifier: u32,
    pub variables: Vec<Variable>,
    pub observations: Vec<DailyObservation>,
    /// Findings from parsing, e.g. unknown flag tokens.
    pub anomalies: Vec<DataAnomaly>,
}

impl StationSegment {
    pub fn new(climate_identifier: u32, variables: Vec<Variable>) -> Self {
        Self {
            climate_identifier,
            variables,
            observations: Vec::new(),
            anomalies: Vec::new(),
        }
    }

    /// Rows dated within `start..=end`, in file order.
    pub fn slice(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Iterator<Item = &DailyObservation> + '_ {
        self.observations
            .iter()
            .filter(move |obs| obs.date >= start && obs.date <= end)
    }

    /// Parse findings dated within `start..=end`.
    pub fn anomalies_within(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Iterator<Item = &DataAnomaly> + '_ {
        self.anomalies.iter().filter(move |anomaly| match anomaly {
            DataAnomaly::UnknownFlag { date, .. } => *date >= start && *date <= end,
            _ => true,
        })
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.observations.iter().map(|o| o.date).min()?;
        let last = self.observations.iter().map(|o| o.date).max()?;
        Some((first, last))
    }

    pub fn has_variable(&self, variable: Variable) -> bool {
        self.variables.contains(&variable)
    }
}
