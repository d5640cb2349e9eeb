use crate::error::{ProcessingError, Result};
use crate::models::{
    BadRecordOverride, CombinedRecord, DailyObservation, DataAnomaly, MergeRecipe,
    StationSegment, Variable,
};
use crate::processors::integrity_checker::{IntegrityChecker, SpanReport};
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOptions {
    /// Fill calendar gaps with explicit missing rows. Off leaves a broken
    /// calendar in place and only reports it, for debugging recipes.
    pub reindex: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self { reindex: true }
    }
}

/// A merged record with its final span check and everything noticed on the way.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub record: CombinedRecord,
    pub span: SpanReport,
    pub anomalies: Vec<DataAnomaly>,
}

/// Builds one continuous daily record per location from recipe segments.
///
/// Merging does no I/O: segments are read beforehand and the record is
/// persisted afterwards by the caller.
pub struct RecordMerger {
    options: MergeOptions,
    checker: IntegrityChecker,
}

impl RecordMerger {
    pub fn new() -> Self {
        Self::with_options(MergeOptions::default())
    }

    pub fn with_options(options: MergeOptions) -> Self {
        Self {
            options,
            checker: IntegrityChecker::new(),
        }
    }

    pub fn options(&self) -> MergeOptions {
        self.options
    }

    /// Slice, concatenate, sort, repair, then patch known-bad values.
    pub fn merge(
        &self,
        recipe: &MergeRecipe,
        segments: &HashMap<u32, StationSegment>,
        overrides: &[BadRecordOverride],
    ) -> Result<MergeOutcome> {
        let location = recipe.location.as_str();
        let mut anomalies = Vec::new();
        let mut present = Vec::new();
        let mut observations = Vec::new();

        for entry in &recipe.stations {
            let segment = segments.get(&entry.climate_identifier).ok_or_else(|| {
                ProcessingError::MissingData(format!(
                    "{}: no segment loaded for climate identifier {}",
                    location, entry.climate_identifier
                ))
            })?;

            if let Some((first, last)) = segment.date_range() {
                if first > entry.start_date || last < entry.end_date {
                    debug!(
                        "{}: station {} only has data from {} to {}",
                        location, entry.climate_identifier, first, last
                    );
                }
            }

            let before = observations.len();
            observations.extend(segment.slice(entry.start_date, entry.end_date).cloned());
            anomalies.extend(
                segment
                    .anomalies_within(entry.start_date, entry.end_date)
                    .cloned(),
            );
            debug!(
                "{}: took {} rows from station {} ({} to {})",
                location,
                observations.len() - before,
                entry.climate_identifier,
                entry.start_date,
                entry.end_date
            );

            for variable in &segment.variables {
                if !present.contains(variable) {
                    present.push(*variable);
                }
            }
        }

        // Stable, so rows sharing a date keep recipe order.
        observations.sort_by_key(|o| o.date);

        let mut span = self.checker.check_span(&observations).ok_or_else(|| {
            ProcessingError::MissingData(format!("{}: recipe selects no rows", location))
        })?;

        if !span.is_consistent() {
            let mismatch = span.to_anomaly(location);
            warn!("{}", mismatch);
            anomalies.push(mismatch);

            if self.options.reindex {
                if span.duplicate_dates > 0 {
                    return Err(ProcessingError::DuplicateDates {
                        location: location.to_string(),
                        count: span.duplicate_dates,
                    });
                }
                let (filled, inserted_rows) = reindex_daily(observations, span.first, span.last);
                observations = filled;
                anomalies.push(DataAnomaly::Reindexed {
                    location: location.to_string(),
                    inserted_rows,
                });
                info!("{}: inserted {} missing rows", location, inserted_rows);

                span = self.checker.check_span(&observations).ok_or_else(|| {
                    ProcessingError::MissingData(format!("{}: record empty after reindexing", location))
                })?;
            }
        }

        let variables: Vec<Variable> = Variable::ALL
            .into_iter()
            .filter(|v| present.contains(v))
            .collect();
        let mut record = CombinedRecord::new(location, variables, observations);

        anomalies.extend(apply_overrides(&mut record, overrides));

        Ok(MergeOutcome {
            record,
            span,
            anomalies,
        })
    }
}

impl Default for RecordMerger {
    fn default() -> Self {
        Self::new()
    }
}

/// Place sorted, duplicate-free rows on a complete daily calendar from
/// `first` to `last`. Returns the rows and the number of inserted empty days.
pub fn reindex_daily(
    observations: Vec<DailyObservation>,
    first: NaiveDate,
    last: NaiveDate,
) -> (Vec<DailyObservation>, usize) {
    let capacity = (last - first).num_days().max(0) as usize + 1;
    let mut filled = Vec::with_capacity(capacity);
    let mut inserted = 0;
    let mut rows = observations.into_iter().peekable();

    for day in first.iter_days().take_while(|d| *d <= last) {
        match rows.next_if(|row| row.date == day) {
            Some(row) => filled.push(row),
            None => {
                filled.push(DailyObservation::empty(day));
                inserted += 1;
            }
        }
    }

    (filled, inserted)
}

/// Null out override cells for this record's location. Flags stay as read.
pub fn apply_overrides(
    record: &mut CombinedRecord,
    overrides: &[BadRecordOverride],
) -> Vec<DataAnomaly> {
    let mut anomalies = Vec::new();

    for fix in overrides.iter().filter(|o| o.applies_to(&record.location)) {
        if !record.has_variable(fix.variable) {
            anomalies.push(DataAnomaly::OverrideVariableAbsent {
                location: record.location.clone(),
                date: fix.date,
                variable: fix.variable,
            });
            continue;
        }

        let mut matched = false;
        for row in record.observations.iter_mut().filter(|o| o.date == fix.date) {
            row.set_value(fix.variable, None);
            matched = true;
        }

        if matched {
            debug!("{}: nulled {} on {}", record.location, fix.variable, fix.date);
        } else {
            let anomaly = DataAnomaly::OverrideOutsideRecord {
                location: record.location.clone(),
                date: fix.date,
                variable: fix.variable,
            };
            warn!("{}", anomaly);
            anomalies.push(anomaly);
        }
    }

    anomalies
}
