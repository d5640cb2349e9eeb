use crate::error::{ProcessingError, Result};
use crate::models::{CombinedRecord, MonthlyRecord, MonthlyRow, Variable};
use crate::processors::monthly_aggregator::{calendar_months, group_by_month};
use chrono::Datelike;

#[derive(Debug, Clone, PartialEq)]
pub struct VariableCompleteness {
    pub variable: Variable,
    pub missing_values: usize,
    /// Days whose flag itself marks the value missing (`M`, `N`, `Y`, `NA`).
    pub flagged_missing: usize,
}

/// How much of a combined record is actually observed.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletenessReport {
    pub location: String,
    pub first_year: i32,
    pub last_year: i32,
    pub total_days: usize,
    pub variables: Vec<VariableCompleteness>,
}

impl CompletenessReport {
    pub fn missing_percentage(&self, variable: Variable) -> Option<f64> {
        self.variables
            .iter()
            .find(|v| v.variable == variable)
            .map(|v| (v.missing_values as f64 / self.total_days as f64) * 100.0)
    }
}

pub struct RecordAnalyzer;

impl RecordAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn completeness(&self, record: &CombinedRecord) -> Result<CompletenessReport> {
        let (Some(first), Some(last)) = (record.first_date(), record.last_date()) else {
            return Err(ProcessingError::MissingData(format!(
                "{}: record has no rows",
                record.location
            )));
        };

        let variables = record
            .variables
            .iter()
            .map(|&variable| {
                let mut missing_values = 0;
                let mut flagged_missing = 0;
                for obs in &record.observations {
                    if obs.value(variable).is_none() {
                        missing_values += 1;
                    }
                    if obs.flag(variable).is_some_and(|f| f.marks_missing()) {
                        flagged_missing += 1;
                    }
                }
                VariableCompleteness {
                    variable,
                    missing_values,
                    flagged_missing,
                }
            })
            .collect();

        Ok(CompletenessReport {
            location: record.location.clone(),
            first_year: first.year(),
            last_year: last.year(),
            total_days: record.len(),
            variables,
        })
    }

    /// Share of days in each month with a non-null value, per variable.
    /// Months the record spans but has no rows for get 0.
    pub fn observation_frequency(&self, record: &CombinedRecord) -> MonthlyRecord {
        let by_month = group_by_month(&record.observations);
        let rows = calendar_months(record)
            .into_iter()
            .map(|period| {
                let mut row = MonthlyRow::new(period);
                let days = by_month.get(&period).map(Vec::as_slice).unwrap_or(&[]);
                let days_in_month = period.days_in_month() as f64;
                for &variable in &record.variables {
                    let observed = days.iter().filter(|o| o.value(variable).is_some()).count();
                    row.set_value(variable, Some(observed as f64 / days_in_month));
                }
                row
            })
            .collect();

        MonthlyRecord::new(record.location.clone(), record.variables.clone(), rows)
    }

    /// Generate a summary report
    pub fn generate_summary(&self, reports: &[CompletenessReport]) -> String {
        let mut summary = String::new();

        summary.push_str("=== Record Completeness ===\n");
        for report in reports {
            summary.push_str(&format!(
                "{:15} {:4} {:4}",
                title_case(&report.location),
                report.first_year,
                report.last_year
            ));
            for v in &report.variables {
                let pct = report.missing_percentage(v.variable).unwrap_or(0.0);
                summary.push_str(&format!(" {}={:3.0}%", v.variable.column_name(), pct));
            }
            summary.push('\n');
        }

        summary
    }
}

impl Default for RecordAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
