use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::variable::Variable;
use crate::utils::filename::normalize_location;

/// A known-bad daily value to be nulled out after merging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadRecordOverride {
    /// Location name the override applies to.
    pub station: String,
    pub date: NaiveDate,
    pub variable: Variable,
}

impl BadRecordOverride {
    pub fn new(station: impl Into<String>, date: NaiveDate, variable: Variable) -> Self {
        Self {
            station: station.into(),
            date,
            variable,
        }
    }

    /// Location names match regardless of case and spacing.
    pub fn applies_to(&self, location: &str) -> bool {
        normalize_location(&self.station) == normalize_location(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_matching_ignores_case_and_spacing() {
        let date = NaiveDate::from_ymd_opt(1983, 8, 2).unwrap();
        let fix = BadRecordOverride::new("Resolute  Bay", date, Variable::TotalPrecipitation);
        assert!(fix.applies_to("resolute bay"));
        assert!(!fix.applies_to("resolute"));
    }
}
