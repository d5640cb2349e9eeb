use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::recipe::RecipeEntry;

/// Per-identifier metadata recovered from a multi-station source file.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StationInventoryEntry {
    pub climate_identifier: u32,

    #[validate(length(min = 1))]
    pub station_name: String,

    pub province_code: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl StationInventoryEntry {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        climate_identifier: u32,
        station_name: String,
        province_code: String,
        latitude: f64,
        longitude: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            climate_identifier,
            station_name,
            province_code,
            latitude,
            longitude,
            start_date,
            end_date,
        }
    }

    pub fn is_arctic(&self) -> bool {
        self.latitude >= 66.5
    }

    pub fn to_recipe_entry(&self) -> RecipeEntry {
        RecipeEntry {
            climate_identifier: self.climate_identifier,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(latitude: f64) -> StationInventoryEntry {
        StationInventoryEntry::new(
            2400300,
            "ALERT".to_string(),
            "NU".to_string(),
            latitude,
            -62.33,
            NaiveDate::from_ymd_opt(1950, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2006, 2, 28).unwrap(),
        )
    }

    #[test]
    fn test_station_validation() {
        let station = entry(82.5);
        assert!(station.validate().is_ok());
        assert!(station.is_arctic());
        assert_eq!(station.to_recipe_entry().climate_identifier, 2400300);
    }

    #[test]
    fn test_invalid_coordinates() {
        assert!(entry(91.0).validate().is_err());
    }
}
