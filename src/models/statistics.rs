use serde::{Deserialize, Serialize};

/// Empirical quantiles of one location's precipitation series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantileSummary {
    pub location: String,
    pub probabilities: Vec<f64>,
    /// `None` when no value passed the threshold.
    pub quantiles: Vec<Option<f64>>,
}

impl QuantileSummary {
    pub fn quantile(&self, probability: f64) -> Option<f64> {
        self.probabilities
            .iter()
            .position(|p| (p - probability).abs() < f64::EPSILON)
            .and_then(|i| self.quantiles[i])
    }
}

/// Counts of days above the extreme threshold, per calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtremeEventCounts {
    pub location: String,
    /// Threshold the counts are taken above; `None` if the window held no data.
    pub threshold: Option<f64>,
    /// Index 0 is January.
    pub counts: [u32; 12],
}

impl ExtremeEventCounts {
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Each month's share of the annual count, in percent.
    pub fn shares(&self) -> [Option<f64>; 12] {
        let total = self.total();
        let mut shares = [None; 12];
        if total == 0 {
            return shares;
        }
        for (share, count) in shares.iter_mut().zip(self.counts.iter()) {
            *share = Some(*count as f64 * 100.0 / total as f64);
        }
        shares
    }
}
