use chrono::NaiveDate;
use std::fmt;

use super::variable::Variable;

/// Non-fatal data-quality findings reported alongside pipeline output.
#[derive(Debug, Clone, PartialEq)]
pub enum DataAnomaly {
    /// Row count differs from the number of calendar days spanned.
    RowCountMismatch {
        location: String,
        first: NaiveDate,
        last: NaiveDate,
        expected_rows: usize,
        actual_rows: usize,
        duplicate_dates: usize,
        missing_days: usize,
    },
    /// Explicit missing rows were inserted to complete the daily calendar.
    Reindexed { location: String, inserted_rows: usize },
    /// A flag cell held a token outside the ECCC vocabulary.
    UnknownFlag {
        climate_identifier: Option<u32>,
        date: NaiveDate,
        variable: Variable,
        token: String,
    },
    /// A bad-record override names a date the record does not contain.
    OverrideOutsideRecord {
        location: String,
        date: NaiveDate,
        variable: Variable,
    },
    /// A bad-record override names a variable the record does not carry.
    OverrideVariableAbsent {
        location: String,
        date: NaiveDate,
        variable: Variable,
    },
    /// An expected variable is absent from a record being aggregated.
    MissingVariable { location: String, variable: Variable },
}

impl DataAnomaly {
    /// Repairs and informational findings, as opposed to problems needing attention.
    pub fn is_informational(&self) -> bool {
        matches!(self, DataAnomaly::Reindexed { .. })
    }
}

impl fmt::Display for DataAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataAnomaly::RowCountMismatch {
                location,
                first,
                last,
                expected_rows,
                actual_rows,
                duplicate_dates,
                missing_days,
            } => {
                let direction = match actual_rows.cmp(expected_rows) {
                    std::cmp::Ordering::Greater => "more records than expected",
                    std::cmp::Ordering::Less => "fewer records than expected",
                    std::cmp::Ordering::Equal => "irregular dates",
                };
                write!(
                    f,
                    "{}: {} between {} and {} ({} rows, {} expected; {} duplicate dates, {} missing days)",
                    location,
                    direction,
                    first,
                    last,
                    actual_rows,
                    expected_rows,
                    duplicate_dates,
                    missing_days
                )
            }
            DataAnomaly::Reindexed {
                location,
                inserted_rows,
            } => write!(
                f,
                "{}: reindexed to daily calendar, inserted {} missing rows",
                location, inserted_rows
            ),
            DataAnomaly::UnknownFlag {
                climate_identifier,
                date,
                variable,
                token,
            } => match climate_identifier {
                Some(id) => write!(
                    f,
                    "station {}: unknown flag '{}' for {} on {}",
                    id, token, variable, date
                ),
                None => write!(f, "unknown flag '{}' for {} on {}", token, variable, date),
            },
            DataAnomaly::OverrideOutsideRecord {
                location,
                date,
                variable,
            } => write!(
                f,
                "{}: override for {} on {} falls outside the record",
                location, variable, date
            ),
            DataAnomaly::OverrideVariableAbsent {
                location,
                date,
                variable,
            } => write!(
                f,
                "{}: override for {} on {} names a variable the record does not contain",
                location, variable, date
            ),
            DataAnomaly::MissingVariable { location, variable } => {
                write!(f, "{}: variable {} not found, skipping", location, variable)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_direction_in_message() {
        let first = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let last = NaiveDate::from_ymd_opt(2000, 1, 5).unwrap();
        let anomaly = DataAnomaly::RowCountMismatch {
            location: "test site".to_string(),
            first,
            last,
            expected_rows: 5,
            actual_rows: 7,
            duplicate_dates: 2,
            missing_days: 0,
        };
        assert!(anomaly.to_string().contains("more records than expected"));
        assert!(!anomaly.is_informational());
    }
}
