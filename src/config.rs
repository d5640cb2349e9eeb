//! Layered pipeline configuration.
//!
//! Defaults are compiled in, then overridden by an optional TOML file and
//! finally by `ARCTIC_PRECIP__*` environment variables (double underscore
//! separates nested keys, e.g. `ARCTIC_PRECIP__MERGE__REINDEX=false`).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::{Validate, ValidationError};

use crate::error::Result;
use crate::models::YearMonth;
use crate::processors::climatology_builder::ReferenceWindow;
use crate::utils::constants::{
    DEFAULT_LOCATIONS, DEFAULT_PROBABILITIES, DEFAULT_RAW_FILE_TEMPLATE, EXTREME_PROBABILITY,
    REFERENCE_END_YEAR, REFERENCE_START_YEAR,
};

pub const ENV_PREFIX: &str = "ARCTIC_PRECIP";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_pipeline"))]
pub struct PipelineConfig {
    #[validate(nested)]
    pub paths: PathsConfig,

    pub merge: MergeConfig,

    #[validate(nested)]
    pub climatology: ClimatologyConfig,

    #[validate(nested)]
    pub statistics: StatisticsConfig,

    pub locations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PathsConfig {
    pub raw_station_dir: PathBuf,

    /// Raw filename with `{id}` standing for the climate identifier.
    #[validate(length(min = 1))]
    pub raw_file_template: String,

    pub combined_dir: PathBuf,
    pub monthly_dir: PathBuf,
    pub climatology_dir: PathBuf,
    pub statistics_dir: PathBuf,
    pub qc_dir: PathBuf,
    pub recipe_file: PathBuf,
    pub override_file: Option<PathBuf>,
    pub cyclone_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Fill calendar gaps with explicit missing rows.
    pub reindex: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ClimatologyConfig {
    #[validate(range(min = 1800, max = 2200))]
    pub start_year: i32,

    #[validate(range(min = 1, max = 12))]
    pub start_month: u32,

    #[validate(range(min = 1800, max = 2200))]
    pub end_year: i32,

    #[validate(range(min = 1, max = 12))]
    pub end_month: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct StatisticsConfig {
    #[validate(length(min = 1))]
    pub probabilities: Vec<f64>,

    /// Values must exceed this to enter quantile estimates.
    pub threshold: f64,

    #[validate(range(min = 0.0, max = 1.0))]
    pub extreme_probability: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            merge: MergeConfig::default(),
            climatology: ClimatologyConfig::default(),
            statistics: StatisticsConfig::default(),
            locations: DEFAULT_LOCATIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let data = PathBuf::from("data");
        Self {
            raw_station_dir: data.join("raw_station_files"),
            raw_file_template: DEFAULT_RAW_FILE_TEMPLATE.to_string(),
            combined_dir: data.join("combined_files"),
            monthly_dir: data.join("monthly_files"),
            climatology_dir: data.join("climatology_files"),
            statistics_dir: data.join("statistics"),
            qc_dir: data.join("qc_files"),
            recipe_file: PathBuf::from("dataset_preparation").join("station_merge_recipe.json"),
            override_file: None,
            cyclone_file: None,
        }
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self { reindex: true }
    }
}

impl Default for ClimatologyConfig {
    fn default() -> Self {
        Self {
            start_year: REFERENCE_START_YEAR,
            start_month: 1,
            end_year: REFERENCE_END_YEAR,
            end_month: 12,
        }
    }
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            probabilities: DEFAULT_PROBABILITIES.to_vec(),
            threshold: 0.0,
            extreme_probability: EXTREME_PROBABILITY,
        }
    }
}

fn validate_pipeline(config: &PipelineConfig) -> std::result::Result<(), ValidationError> {
    let window = &config.climatology;
    if (window.start_year, window.start_month) > (window.end_year, window.end_month) {
        return Err(ValidationError::new("reference_window_start_after_end"));
    }
    if config
        .statistics
        .probabilities
        .iter()
        .any(|p| !(0.0..=1.0).contains(p))
    {
        return Err(ValidationError::new("probability_out_of_range"));
    }
    Ok(())
}

impl ClimatologyConfig {
    pub fn reference_window(&self) -> Result<ReferenceWindow> {
        ReferenceWindow::new(
            YearMonth::new(self.start_year, self.start_month)?,
            YearMonth::new(self.end_year, self.end_month)?,
        )
    }
}

impl PipelineConfig {
    /// Build configuration from defaults, an optional file, and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            debug!("Loading configuration from {}", path.display());
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let config: PipelineConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_defaults_are_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.merge.reindex);
        assert_eq!(config.locations.len(), 10);

        let window = config.climatology.reference_window().unwrap();
        assert_eq!(window.start.to_string(), "1960-01");
        assert_eq!(window.end.to_string(), "1995-12");
    }

    #[test]
    fn test_load_from_toml_file() -> Result<()> {
        let mut file = Builder::new().suffix(".toml").tempfile()?;
        writeln!(
            file,
            r#"
locations = ["alert", "eureka"]

[merge]
reindex = false

[climatology]
start_year = 1971
end_year = 2000

[paths]
raw_station_dir = "/tmp/raw"
"#
        )?;

        let config = PipelineConfig::load(Some(file.path()))?;
        assert!(!config.merge.reindex);
        assert_eq!(config.locations, vec!["alert", "eureka"]);
        assert_eq!(config.climatology.start_year, 1971);
        assert_eq!(config.climatology.end_month, 12);
        assert_eq!(config.paths.raw_station_dir, PathBuf::from("/tmp/raw"));
        assert_eq!(config.paths.raw_file_template, "{id}.csv");
        Ok(())
    }

    #[test]
    fn test_reversed_window_rejected() {
        let mut config = PipelineConfig::default();
        config.climatology.start_year = 2000;
        config.climatology.end_year = 1990;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_probability_range_rejected() {
        let mut config = PipelineConfig::default();
        config.statistics.probabilities = vec![0.5, 1.5];
        assert!(config.validate().is_err());
    }
}
