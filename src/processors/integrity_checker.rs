use crate::models::{DailyObservation, DataAnomaly};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Row count versus calendar span of a daily record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanReport {
    pub first: NaiveDate,
    pub last: NaiveDate,
    /// `last - first` in days.
    pub elapsed_days: i64,
    /// One row per calendar day, both ends included.
    pub expected_rows: usize,
    pub actual_rows: usize,
    /// Rows beyond the first for any repeated date.
    pub duplicate_dates: usize,
    /// Days within the span that have no row.
    pub missing_days: usize,
}

impl SpanReport {
    /// The row count equals the number of calendar days spanned.
    pub fn counts_match(&self) -> bool {
        self.actual_rows == self.expected_rows
    }

    /// Exactly one row per calendar day between first and last.
    pub fn is_consistent(&self) -> bool {
        self.counts_match() && self.duplicate_dates == 0 && self.missing_days == 0
    }

    pub fn to_anomaly(&self, location: &str) -> DataAnomaly {
        DataAnomaly::RowCountMismatch {
            location: location.to_string(),
            first: self.first,
            last: self.last,
            expected_rows: self.expected_rows,
            actual_rows: self.actual_rows,
            duplicate_dates: self.duplicate_dates,
            missing_days: self.missing_days,
        }
    }
}

/// Checks daily records against their calendar span.
///
/// Rows count as present whatever their contents; a row with every variable
/// null still fills its day.
pub struct IntegrityChecker;

impl IntegrityChecker {
    pub fn new() -> Self {
        Self
    }

    /// `None` for an empty record.
    pub fn check_span(&self, observations: &[DailyObservation]) -> Option<SpanReport> {
        let dates: BTreeSet<NaiveDate> = observations.iter().map(|o| o.date).collect();
        let first = *dates.first()?;
        let last = *dates.last()?;

        let elapsed_days = (last - first).num_days();
        let expected_rows = elapsed_days as usize + 1;

        Some(SpanReport {
            first,
            last,
            elapsed_days,
            expected_rows,
            actual_rows: observations.len(),
            duplicate_dates: observations.len() - dates.len(),
            missing_days: expected_rows - dates.len(),
        })
    }

    /// Generate a summary report
    pub fn generate_summary(&self, location: &str, report: &SpanReport) -> String {
        let mut summary = String::new();

        summary.push_str(&format!("=== Span Check: {} ===\n", location));
        summary.push_str(&format!("First Date: {}\n", report.first));
        summary.push_str(&format!("Last Date: {}\n", report.last));
        summary.push_str(&format!("Elapsed Days: {}\n", report.elapsed_days));
        summary.push_str(&format!(
            "Rows: {} ({} expected)\n",
            report.actual_rows, report.expected_rows
        ));
        summary.push_str(&format!("Duplicate Dates: {}\n", report.duplicate_dates));
        summary.push_str(&format!("Missing Days: {}\n", report.missing_days));
        summary.push_str(&format!(
            "Status: {}\n",
            if report.is_consistent() {
                "PASS"
            } else {
                "FAIL"
            }
        ));

        summary
    }
}

impl Default for IntegrityChecker {
    fn default() -> Self {
        Self::new()
    }
}
