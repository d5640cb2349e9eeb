use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::variable::{Variable, VARIABLE_COUNT};
use crate::error::{ProcessingError, Result};

/// Calendar month of a specific year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(ProcessingError::InvalidFormat(format!(
                "Month must be between 1 and 12, got: {}",
                month
            )));
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn days_in_month(&self) -> u32 {
        let next = self.next();
        match (self.first_day(), next.first_day()) {
            (Some(start), Some(end)) => (end - start).num_days() as u32,
            _ => 0,
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ProcessingError::InvalidFormat(format!("Expected YYYY-MM, got '{}'", s));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        YearMonth::new(year, month)
    }
}

/// One month of completeness-gated aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRow {
    pub period: YearMonth,
    pub values: [Option<f64>; VARIABLE_COUNT],
}

impl MonthlyRow {
    pub fn new(period: YearMonth) -> Self {
        Self {
            period,
            values: [None; VARIABLE_COUNT],
        }
    }

    pub fn value(&self, variable: Variable) -> Option<f64> {
        self.values[variable.index()]
    }

    pub fn set_value(&mut self, variable: Variable, value: Option<f64>) {
        self.values[variable.index()] = value;
    }
}

/// Monthly series derived from a combined record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRecord {
    pub location: String,
    pub variables: Vec<Variable>,
    pub rows: Vec<MonthlyRow>,
}

impl MonthlyRecord {
    pub fn new(location: impl Into<String>, variables: Vec<Variable>, rows: Vec<MonthlyRow>) -> Self {
        Self {
            location: location.into(),
            variables,
            rows,
        }
    }

    pub fn has_variable(&self, variable: Variable) -> bool {
        self.variables.contains(&variable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_in_month() {
        assert_eq!(YearMonth::new(2000, 2).unwrap().days_in_month(), 29);
        assert_eq!(YearMonth::new(1900, 2).unwrap().days_in_month(), 28);
        assert_eq!(YearMonth::new(1999, 12).unwrap().days_in_month(), 31);
        assert_eq!(YearMonth::new(1999, 4).unwrap().days_in_month(), 30);
    }

    #[test]
    fn test_parse_and_order() {
        let start: YearMonth = "1960-01".parse().unwrap();
        let end: YearMonth = "1995-12".parse().unwrap();
        assert!(start < end);
        assert_eq!(start.to_string(), "1960-01");
        assert_eq!(end.next(), YearMonth::new(1996, 1).unwrap());
        assert!("1960-13".parse::<YearMonth>().is_err());
        assert!("1960".parse::<YearMonth>().is_err());
    }
}
