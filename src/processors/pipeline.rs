use crate::analyzers::{CompletenessReport, RecordAnalyzer};
use crate::config::PipelineConfig;
use crate::error::{ProcessingError, Result};
use crate::models::{
    BadRecordOverride, CombinedRecord, CycloneClimatology, DataAnomaly, MergeRecipe,
    StationSegment,
};
use crate::processors::climatology_builder::{ClimatologyBuilder, ReferenceWindow};
use crate::processors::integrity_checker::IntegrityChecker;
use crate::processors::monthly_aggregator::MonthlyAggregator;
use crate::processors::quantiles::QuantileExtractor;
use crate::processors::record_merger::{MergeOptions, MergeOutcome, RecordMerger};
use crate::readers::{
    find_recipe, read_cyclone_climatology, read_overrides, read_recipes, MonthlyReader,
    StationReader,
};
use crate::utils::paths::PathResolver;
use crate::utils::progress::ProgressReporter;
use crate::writers::{CsvWriter, FormattedWriter};
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{error, info, warn};

/// Outcome of running one stage over a list of locations.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub stage: String,
    pub succeeded: Vec<String>,
    /// Location and error message.
    pub failed: Vec<(String, String)>,
    pub anomalies: usize,
    /// Per-location reports printed after the totals.
    pub notes: Vec<String>,
}

impl BatchSummary {
    pub fn new(stage: &str) -> Self {
        Self {
            stage: stage.to_string(),
            ..Self::default()
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{}: {} succeeded, {} failed, {} anomalies\n",
            self.stage,
            self.succeeded.len(),
            self.failed.len(),
            self.anomalies
        );
        for (location, message) in &self.failed {
            summary.push_str(&format!("  {}: {}\n", location, message));
        }
        for note in &self.notes {
            summary.push('\n');
            summary.push_str(note);
        }
        summary
    }
}

/// Runs pipeline stages location by location. A location-scoped failure is
/// recorded in the summary and the batch moves on; any other error stops it.
pub struct Pipeline {
    config: PipelineConfig,
    paths: PathResolver,
    reader: StationReader,
    writer: CsvWriter,
    silent: bool,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let paths = PathResolver::new(config.paths.clone());
        Self {
            config,
            paths,
            reader: StationReader::new(),
            writer: CsvWriter::new(),
            silent: false,
        }
    }

    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.reader = StationReader::with_mmap(use_mmap);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn paths(&self) -> &PathResolver {
        &self.paths
    }

    /// The requested locations, or every configured one when none are named.
    pub fn locations(&self, requested: &[String]) -> Vec<String> {
        if requested.is_empty() {
            self.config.locations.clone()
        } else {
            requested.to_vec()
        }
    }

    fn for_each_location<F>(
        &self,
        stage: &str,
        locations: &[String],
        mut step: F,
    ) -> Result<BatchSummary>
    where
        F: FnMut(&str) -> Result<usize>,
    {
        let mut summary = BatchSummary::new(stage);
        let progress = ProgressReporter::new(locations.len() as u64, stage, self.silent);

        for location in locations {
            progress.set_message(&format!("{}: {}", stage, location));
            match step(location) {
                Ok(anomalies) => {
                    info!("{}: {} done", location, stage);
                    summary.anomalies += anomalies;
                    summary.succeeded.push(location.clone());
                }
                Err(e) if e.is_location_scoped() => {
                    error!("{}: {} failed: {}", location, stage, e);
                    summary.failed.push((location.clone(), e.to_string()));
                }
                Err(e) => return Err(e),
            }
            progress.increment(1);
        }

        progress.finish_with_message(&format!(
            "{}: {} of {} locations",
            stage,
            summary.succeeded.len(),
            locations.len()
        ));
        Ok(summary)
    }

    fn report(anomalies: &[DataAnomaly]) {
        for anomaly in anomalies {
            if anomaly.is_informational() {
                info!("{}", anomaly);
            } else {
                warn!("{}", anomaly);
            }
        }
    }

    fn read_combined(&self, location: &str) -> Result<CombinedRecord> {
        self.reader
            .read_combined(&self.paths.combined_path(location), location)
    }

    /// Read every raw segment the recipe names.
    pub fn load_segments(&self, recipe: &MergeRecipe) -> Result<HashMap<u32, StationSegment>> {
        let mut segments = HashMap::new();
        for climate_identifier in recipe.climate_identifiers() {
            let path = self.paths.raw_station_path(climate_identifier);
            if !path.exists() {
                return Err(ProcessingError::SegmentNotFound {
                    climate_identifier,
                    path,
                });
            }
            let segment = self.reader.read_segment(&path, climate_identifier)?;
            segments.insert(climate_identifier, segment);
        }
        Ok(segments)
    }

    /// Merge one recipe and persist the combined record.
    pub fn combine_recipe(
        &self,
        merger: &RecordMerger,
        recipe: &MergeRecipe,
        overrides: &[BadRecordOverride],
    ) -> Result<MergeOutcome> {
        let segments = self.load_segments(recipe)?;
        let outcome = merger.merge(recipe, &segments, overrides)?;
        Self::report(&outcome.anomalies);
        self.writer
            .write_combined(&outcome.record, &self.paths.combined_path(&recipe.location))?;
        Ok(outcome)
    }

    pub fn combine(&self, locations: &[String], options: MergeOptions) -> Result<BatchSummary> {
        let recipes = read_recipes(self.paths.recipe_file())?;
        let overrides = match self.paths.override_file() {
            Some(path) => read_overrides(path)?,
            None => Vec::new(),
        };
        let merger = RecordMerger::with_options(options);
        let checker = IntegrityChecker::new();
        let mut span_reports = Vec::new();

        let mut summary = self.for_each_location("combine", locations, |location| {
            let recipe = find_recipe(&recipes, location).ok_or_else(|| {
                ProcessingError::MissingData(format!("no recipe for '{}'", location))
            })?;
            recipe.check()?;
            let outcome = self.combine_recipe(&merger, recipe, &overrides)?;
            // only left broken when reindexing is off
            if !outcome.span.is_consistent() {
                span_reports.push(checker.generate_summary(&recipe.location, &outcome.span));
            }
            Ok(outcome.anomalies.len())
        })?;

        summary.notes = span_reports;
        Ok(summary)
    }

    pub fn monthly(&self, locations: &[String]) -> Result<BatchSummary> {
        let aggregator = MonthlyAggregator::new();
        self.for_each_location("monthly", locations, |location| {
            let record = self.read_combined(location)?;
            let (monthly, anomalies) = aggregator.aggregate(&record);
            self.writer
                .write_monthly(&monthly, &self.paths.monthly_path(location))?;
            Ok(anomalies.len())
        })
    }

    pub fn climatology(
        &self,
        locations: &[String],
        window: ReferenceWindow,
        use_cyclones: bool,
    ) -> Result<BatchSummary> {
        let cyclones: Option<CycloneClimatology> = match self.paths.cyclone_file() {
            Some(path) if use_cyclones => Some(read_cyclone_climatology(path)?),
            _ => None,
        };
        let builder = ClimatologyBuilder::new(window);
        let reader = MonthlyReader::new();

        self.for_each_location("climatology", locations, |location| {
            let monthly = reader.read_monthly(&self.paths.monthly_path(location), location)?;
            let climatology = builder.build(&monthly, cyclones.as_ref());
            self.writer
                .write_climatology(&climatology, &self.paths.climatology_path(location))?;
            Ok(0)
        })
    }

    pub fn quantiles(
        &self,
        locations: &[String],
        threshold: f64,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<BatchSummary> {
        let extractor =
            QuantileExtractor::new(self.config.statistics.probabilities.clone(), Some(threshold));
        let mut summaries = Vec::new();

        let summary = self.for_each_location("quantiles", locations, |location| {
            let record = self.read_combined(location)?;
            summaries.push(extractor.summarize(&record, from, to)?);
            Ok(0)
        })?;

        self.writer.write_quantiles(
            extractor.probabilities(),
            &summaries,
            &self.paths.quantiles_path(),
        )?;
        Ok(summary)
    }

    pub fn p95_events(
        &self,
        locations: &[String],
        window: ReferenceWindow,
        threshold: f64,
    ) -> Result<BatchSummary> {
        let extractor = QuantileExtractor::new(Vec::new(), Some(threshold));
        let probability = self.config.statistics.extreme_probability;
        let mut events = Vec::new();

        let summary = self.for_each_location("p95-events", locations, |location| {
            let record = self.read_combined(location)?;
            events.push(extractor.extreme_event_counts(&record, &window, probability)?);
            Ok(0)
        })?;

        self.writer
            .write_event_counts(&events, &self.paths.p95_events_path())?;
        self.writer
            .write_event_shares(&events, &self.paths.p95_event_share_path())?;
        Ok(summary)
    }

    /// Completeness reports, plus an observation-frequency file per location.
    pub fn completeness(
        &self,
        locations: &[String],
    ) -> Result<(BatchSummary, Vec<CompletenessReport>)> {
        let analyzer = RecordAnalyzer::new();
        let mut reports = Vec::new();

        let summary = self.for_each_location("completeness", locations, |location| {
            let record = self.read_combined(location)?;
            reports.push(analyzer.completeness(&record)?);
            let frequency = analyzer.observation_frequency(&record);
            self.writer
                .write_monthly(&frequency, &self.paths.observation_frequency_path(location))?;
            Ok(0)
        })?;

        Ok((summary, reports))
    }

    pub fn qc_format(&self, locations: &[String]) -> Result<BatchSummary> {
        let formatter = FormattedWriter::new();
        self.for_each_location("qc-format", locations, |location| {
            let record = self.read_combined(location)?;
            formatter.write_record(&record, &self.paths.qc_path(location))?;
            Ok(0)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locations_default_to_config() {
        let pipeline = Pipeline::new(PipelineConfig::default()).with_silent(true);
        assert_eq!(pipeline.locations(&[]).len(), 10);
        assert_eq!(
            pipeline.locations(&["alert".to_string()]),
            vec!["alert".to_string()]
        );
    }

    #[test]
    fn test_batch_summary_text() {
        let mut summary = BatchSummary::new("combine");
        summary.succeeded.push("alert".to_string());
        summary.failed.push(("eureka".to_string(), "missing".to_string()));
        assert!(summary.has_failures());
        let text = summary.summary();
        assert!(text.starts_with("combine: 1 succeeded, 1 failed, 0 anomalies"));
        assert!(text.contains("eureka: missing"));

        summary.notes.push("=== Span Check: alert ===\n".to_string());
        assert!(summary.summary().ends_with("\n=== Span Check: alert ===\n"));
    }
}
