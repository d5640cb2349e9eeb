use std::path::{Path, PathBuf};

use crate::config::PathsConfig;
use crate::utils::constants::{
    CLIMATOLOGY_SUFFIX, COMBINED_SUFFIX, MONTHLY_SUFFIX, OBSERVATION_FREQUENCY_SUFFIX,
    P95_EVENTS_FILE, P95_EVENT_SHARE_FILE, QC_SUFFIX, QUANTILES_FILE,
};
use crate::utils::filename::location_path;

/// Maps station identifiers and location names to file locations.
#[derive(Debug, Clone)]
pub struct PathResolver {
    paths: PathsConfig,
}

impl PathResolver {
    pub fn new(paths: PathsConfig) -> Self {
        Self { paths }
    }

    pub fn raw_station_path(&self, climate_identifier: u32) -> PathBuf {
        let filename = self
            .paths
            .raw_file_template
            .replace("{id}", &climate_identifier.to_string());
        self.paths.raw_station_dir.join(filename)
    }

    pub fn combined_path(&self, location: &str) -> PathBuf {
        location_path(&self.paths.combined_dir, location, COMBINED_SUFFIX)
    }

    pub fn monthly_path(&self, location: &str) -> PathBuf {
        location_path(&self.paths.monthly_dir, location, MONTHLY_SUFFIX)
    }

    pub fn observation_frequency_path(&self, location: &str) -> PathBuf {
        location_path(&self.paths.monthly_dir, location, OBSERVATION_FREQUENCY_SUFFIX)
    }

    pub fn climatology_path(&self, location: &str) -> PathBuf {
        location_path(&self.paths.climatology_dir, location, CLIMATOLOGY_SUFFIX)
    }

    pub fn qc_path(&self, location: &str) -> PathBuf {
        location_path(&self.paths.qc_dir, location, QC_SUFFIX)
    }

    pub fn quantiles_path(&self) -> PathBuf {
        self.paths.statistics_dir.join(QUANTILES_FILE)
    }

    pub fn p95_events_path(&self) -> PathBuf {
        self.paths.statistics_dir.join(P95_EVENTS_FILE)
    }

    pub fn p95_event_share_path(&self) -> PathBuf {
        self.paths.statistics_dir.join(P95_EVENT_SHARE_FILE)
    }

    pub fn recipe_file(&self) -> &Path {
        &self.paths.recipe_file
    }

    pub fn override_file(&self) -> Option<&Path> {
        self.paths.override_file.as_deref()
    }

    pub fn cyclone_file(&self) -> Option<&Path> {
        self.paths.cyclone_file.as_deref()
    }
}
