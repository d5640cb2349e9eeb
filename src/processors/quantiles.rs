use crate::error::{ProcessingError, Result};
use crate::models::{CombinedRecord, ExtremeEventCounts, QuantileSummary, Variable};
use crate::processors::climatology_builder::ReferenceWindow;
use chrono::{Datelike, NaiveDate};

/// Empirical quantiles with "lower" interpolation: the result for `p` is the
/// sorted value at index `floor(p * (n - 1))`, so it always occurs in the data.
///
/// Nulls are dropped and, with a threshold, only values strictly above it are
/// kept. Without any remaining values every quantile is `None`.
pub fn get_quantiles(
    values: &[Option<f64>],
    threshold: Option<f64>,
    probabilities: &[f64],
) -> Result<Vec<Option<f64>>> {
    if let Some(&p) = probabilities.iter().find(|p| !(0.0..=1.0).contains(*p)) {
        return Err(ProcessingError::InvalidProbability(p));
    }

    let mut kept: Vec<f64> = values
        .iter()
        .flatten()
        .copied()
        .filter(|v| threshold.map_or(true, |t| *v > t))
        .collect();
    if kept.is_empty() {
        return Ok(vec![None; probabilities.len()]);
    }
    kept.sort_by(f64::total_cmp);

    let last = (kept.len() - 1) as f64;
    Ok(probabilities
        .iter()
        .map(|p| Some(kept[(p * last).floor() as usize]))
        .collect())
}

/// Quantile statistics of daily total precipitation.
pub struct QuantileExtractor {
    probabilities: Vec<f64>,
    threshold: Option<f64>,
}

impl QuantileExtractor {
    pub fn new(probabilities: Vec<f64>, threshold: Option<f64>) -> Self {
        Self {
            probabilities,
            threshold,
        }
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Quantiles over the record, optionally restricted to `from..=to`.
    pub fn summarize(
        &self,
        record: &CombinedRecord,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<QuantileSummary> {
        let values = precipitation(record, from, to);
        Ok(QuantileSummary {
            location: record.location.clone(),
            probabilities: self.probabilities.clone(),
            quantiles: get_quantiles(&values, self.threshold, &self.probabilities)?,
        })
    }

    /// Days above the `extreme_probability` quantile within the window,
    /// counted per calendar month.
    pub fn extreme_event_counts(
        &self,
        record: &CombinedRecord,
        window: &ReferenceWindow,
        extreme_probability: f64,
    ) -> Result<ExtremeEventCounts> {
        let series: Vec<(NaiveDate, Option<f64>)> = record
            .series(Variable::TotalPrecipitation, window.first_day(), window.last_day());
        let values: Vec<Option<f64>> = series.iter().map(|(_, v)| *v).collect();
        let threshold = get_quantiles(&values, self.threshold, &[extreme_probability])?
            .into_iter()
            .next()
            .flatten();

        let mut counts = [0u32; 12];
        if let Some(limit) = threshold {
            for (date, value) in &series {
                if value.is_some_and(|v| v > limit) {
                    counts[date.month0() as usize] += 1;
                }
            }
        }

        Ok(ExtremeEventCounts {
            location: record.location.clone(),
            threshold,
            counts,
        })
    }
}

fn precipitation(
    record: &CombinedRecord,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Vec<Option<f64>> {
    record
        .series(Variable::TotalPrecipitation, from, to)
        .into_iter()
        .map(|(_, v)| v)
        .collect()
}

/// Column label for a probability, e.g. `0.95` -> `p95`.
pub fn quantile_label(probability: f64) -> String {
    format!("p{}", (probability * 100.0).round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyObservation, YearMonth};

    #[test]
    fn test_median_rounds_down_to_observed() {
        let values: Vec<Option<f64>> = [1.0, 2.0, 3.0, 4.0, 5.0].into_iter().map(Some).collect();
        assert_eq!(get_quantiles(&values, None, &[0.5]).unwrap(), vec![Some(3.0)]);

        let even: Vec<Option<f64>> = [4.0, 1.0, 3.0, 2.0].into_iter().map(Some).collect();
        assert_eq!(
            get_quantiles(&even, None, &[0.0, 0.5, 1.0]).unwrap(),
            vec![Some(1.0), Some(2.0), Some(4.0)]
        );
    }

    #[test]
    fn test_threshold_and_nulls() {
        let values = vec![Some(0.0), None, Some(0.0), Some(2.0), Some(6.0), None];
        assert_eq!(
            get_quantiles(&values, Some(0.0), &[0.5, 1.0]).unwrap(),
            vec![Some(2.0), Some(6.0)]
        );
        assert_eq!(
            get_quantiles(&values, Some(10.0), &[0.5]).unwrap(),
            vec![None]
        );
    }

    #[test]
    fn test_invalid_probability() {
        assert!(matches!(
            get_quantiles(&[Some(1.0)], None, &[1.2]),
            Err(ProcessingError::InvalidProbability(_))
        ));
    }

    #[test]
    fn test_labels() {
        assert_eq!(quantile_label(0.01), "p1");
        assert_eq!(quantile_label(0.95), "p95");
        assert_eq!(quantile_label(1.0), "p100");
    }

    #[test]
    fn test_extreme_event_counts() {
        // one wet January day and one wet July day per year, dry otherwise
        let mut observations = Vec::new();
        for year in 1960..=1961 {
            let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
            for date in start.iter_days().take_while(|d| d.year() == year) {
                let value = match (date.month(), date.day()) {
                    (1, 15) => 20.0,
                    (7, 4) => 30.0,
                    _ => 0.5,
                };
                observations.push(
                    DailyObservation::new(date, Some(1))
                        .with_value(Variable::TotalPrecipitation, value),
                );
            }
        }
        let record = CombinedRecord::new("eureka", vec![Variable::TotalPrecipitation], observations);
        let window = ReferenceWindow::new(
            YearMonth::new(1960, 1).unwrap(),
            YearMonth::new(1961, 12).unwrap(),
        )
        .unwrap();

        let extractor = QuantileExtractor::new(vec![0.5], Some(0.0));
        let events = extractor.extreme_event_counts(&record, &window, 0.95).unwrap();
        assert_eq!(events.threshold, Some(0.5));
        assert_eq!(events.counts[0], 2);
        assert_eq!(events.counts[6], 2);
        assert_eq!(events.total(), 4);

        let summary = extractor.summarize(&record, None, None).unwrap();
        assert_eq!(summary.quantile(0.5), Some(0.5));
    }
}
