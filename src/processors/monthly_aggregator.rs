use crate::models::{
    CombinedRecord, DailyObservation, DataAnomaly, MonthlyRecord, MonthlyRow, Variable,
    VariableFamily, YearMonth,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// Reduces a daily record to completeness-gated monthly values.
///
/// A month only gets a value for a variable when every calendar day of that
/// month has a non-null daily value. Temperatures are averaged, precipitation
/// amounts summed, and snow on ground becomes the fraction of days with a
/// positive depth.
pub struct MonthlyAggregator {
    variables: Vec<Variable>,
}

impl MonthlyAggregator {
    pub fn new() -> Self {
        Self::with_variables(Variable::ALL.to_vec())
    }

    /// Aggregate only `variables`; those absent from a record are reported
    /// and skipped.
    pub fn with_variables(variables: Vec<Variable>) -> Self {
        Self { variables }
    }

    pub fn aggregate(&self, record: &CombinedRecord) -> (MonthlyRecord, Vec<DataAnomaly>) {
        let mut anomalies = Vec::new();
        let mut variables = Vec::new();
        for &variable in &self.variables {
            if record.has_variable(variable) {
                variables.push(variable);
            } else {
                let anomaly = DataAnomaly::MissingVariable {
                    location: record.location.clone(),
                    variable,
                };
                warn!("{}", anomaly);
                anomalies.push(anomaly);
            }
        }

        let by_month = group_by_month(&record.observations);
        let rows = calendar_months(record)
            .into_iter()
            .map(|period| {
                let mut row = MonthlyRow::new(period);
                if let Some(days) = by_month.get(&period) {
                    for &variable in &variables {
                        row.set_value(variable, reduce_month(period, days, variable));
                    }
                }
                row
            })
            .collect();

        (
            MonthlyRecord::new(record.location.clone(), variables, rows),
            anomalies,
        )
    }
}

impl Default for MonthlyAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Every month from the record's first date to its last, inclusive.
pub fn calendar_months(record: &CombinedRecord) -> Vec<YearMonth> {
    let (Some(first), Some(last)) = (
        record.observations.iter().map(|o| o.date).min(),
        record.observations.iter().map(|o| o.date).max(),
    ) else {
        return Vec::new();
    };

    let end = YearMonth::of(last);
    let mut months = Vec::new();
    let mut current = YearMonth::of(first);
    while current <= end {
        months.push(current);
        current = current.next();
    }
    months
}

pub fn group_by_month(
    observations: &[DailyObservation],
) -> BTreeMap<YearMonth, Vec<&DailyObservation>> {
    let mut grouped: BTreeMap<YearMonth, Vec<&DailyObservation>> = BTreeMap::new();
    for observation in observations {
        grouped
            .entry(YearMonth::of(observation.date))
            .or_default()
            .push(observation);
    }
    grouped
}

fn reduce_month(period: YearMonth, days: &[&DailyObservation], variable: Variable) -> Option<f64> {
    let mut values = Vec::with_capacity(days.len());
    let mut covered = BTreeSet::new();
    for day in days {
        if let Some(value) = day.value(variable) {
            values.push(value);
            covered.insert(day.date);
        }
    }

    let days_in_month = period.days_in_month() as usize;
    if values.len() != days_in_month || covered.len() != days_in_month {
        return None;
    }

    let n = values.len() as f64;
    Some(match variable.family() {
        VariableFamily::Temperature => values.iter().sum::<f64>() / n,
        VariableFamily::Precipitation => values.iter().sum(),
        VariableFamily::SnowCover => values.iter().filter(|v| **v > 0.0).count() as f64 / n,
    })
}
