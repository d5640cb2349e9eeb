use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::{ProcessingError, Result};

/// One raw segment and the inclusive date range taken from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeEntry {
    pub climate_identifier: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Ordered list of segments composing one location's long record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_entry_ranges"))]
pub struct MergeRecipe {
    #[validate(length(min = 1))]
    pub location: String,

    #[validate(length(min = 1))]
    pub stations: Vec<RecipeEntry>,
}

fn validate_entry_ranges(recipe: &MergeRecipe) -> std::result::Result<(), ValidationError> {
    if recipe
        .stations
        .iter()
        .any(|entry| entry.start_date > entry.end_date)
    {
        return Err(ValidationError::new("start_date_after_end_date"));
    }
    Ok(())
}

impl MergeRecipe {
    pub fn new(location: impl Into<String>, stations: Vec<RecipeEntry>) -> Self {
        Self {
            location: location.into(),
            stations,
        }
    }

    /// Entry-level validation. A bad recipe only spoils its own location, so
    /// the failure is reported as `InvalidFormat` rather than a configuration error.
    pub fn check(&self) -> Result<()> {
        self.validate().map_err(|e| {
            ProcessingError::InvalidFormat(format!("Invalid recipe for '{}': {}", self.location, e))
        })
    }

    /// Climate identifiers in recipe order, without repeats.
    pub fn climate_identifiers(&self) -> Vec<u32> {
        let mut ids = Vec::new();
        for entry in &self.stations {
            if !ids.contains(&entry.climate_identifier) {
                ids.push(entry.climate_identifier);
            }
        }
        ids
    }

    /// Pairs of entries whose date ranges overlap. Overlaps surface later as
    /// duplicate dates; this is only a diagnostic for recipe authors.
    pub fn overlapping_entries(&self) -> Vec<(usize, usize)> {
        let mut overlaps = Vec::new();
        for (i, a) in self.stations.iter().enumerate() {
            for (j, b) in self.stations.iter().enumerate().skip(i + 1) {
                if a.start_date <= b.end_date && b.start_date <= a.end_date {
                    overlaps.push((i, j));
                }
            }
        }
        overlaps
    }
}
