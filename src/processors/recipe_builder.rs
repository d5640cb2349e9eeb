use crate::error::{ProcessingError, Result};
use crate::models::{MergeRecipe, StationInventoryEntry};
use crate::readers::station_reader::{decode_text, parse_date};
use crate::utils::constants::{
    CLIMATE_IDENTIFIER_COLUMN, DATE_COLUMN, LATITUDE_COLUMN, LONGITUDE_COLUMN,
    PROVINCE_CODE_COLUMN, SOURCE_PREAMBLE_LINES, STATION_NAME_COLUMN,
};
use crate::utils::filename::location_from_source_filename;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use validator::Validate;

/// Recipes and inventory derived from a directory of multi-station sources.
#[derive(Debug, Default)]
pub struct RecipeBuild {
    pub recipes: Vec<MergeRecipe>,
    /// Station metadata per location, in recipe order.
    pub inventory: Vec<(String, Vec<StationInventoryEntry>)>,
    /// Source files that could not be used, with the reason.
    pub skipped: Vec<(PathBuf, String)>,
}

#[derive(Default)]
struct StationAccumulator {
    station_name: Option<String>,
    province_code: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

/// Derives merge recipes from combined multi-station source CSVs.
///
/// Each source holds the daily rows of every station used for one location.
/// Each climate identifier's recipe entry runs from its first to its last
/// `LOCAL_DATE` in the file.
pub struct RecipeBuilder {
    preamble_lines: usize,
}

impl RecipeBuilder {
    pub fn new() -> Self {
        Self {
            preamble_lines: SOURCE_PREAMBLE_LINES,
        }
    }

    pub fn with_preamble_lines(preamble_lines: usize) -> Self {
        Self { preamble_lines }
    }

    /// Source CSVs in `dir` keyed by the location their filename names.
    pub fn source_files(&self, dir: &Path) -> Result<BTreeMap<String, PathBuf>> {
        let mut files = BTreeMap::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !name.ends_with(".csv") {
                continue;
            }
            match location_from_source_filename(name) {
                Some(location) => {
                    files.insert(location, path);
                }
                None => warn!("{}: no location in filename", name),
            }
        }
        Ok(files)
    }

    /// Build recipes for every source in `dir`. A source that cannot be read
    /// is skipped and reported.
    pub fn build(&self, dir: &Path) -> Result<RecipeBuild> {
        let mut build = RecipeBuild::default();

        for (location, path) in self.source_files(dir)? {
            match self.read_inventory(&path) {
                Ok(entries) => {
                    info!("{}: {} stations", location, entries.len());
                    let stations = entries.iter().map(|e| e.to_recipe_entry()).collect();
                    build.recipes.push(MergeRecipe::new(location.clone(), stations));
                    build.inventory.push((location, entries));
                }
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    build.skipped.push((path, e.to_string()));
                }
            }
        }

        Ok(build)
    }

    pub fn read_inventory(&self, path: &Path) -> Result<Vec<StationInventoryEntry>> {
        let bytes = fs::read(path)?;
        self.inventory_from_text(&decode_text(&bytes))
    }

    /// Per-identifier metadata, ordered by climate identifier.
    pub fn inventory_from_text(&self, text: &str) -> Result<Vec<StationInventoryEntry>> {
        let body = text
            .splitn(self.preamble_lines + 1, '\n')
            .nth(self.preamble_lines)
            .unwrap_or("");

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(body.as_bytes());

        let headers = reader.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| ProcessingError::InvalidFormat(format!("Missing '{}' column", name)))
        };
        let id_idx = column(CLIMATE_IDENTIFIER_COLUMN)?;
        let date_idx = column(DATE_COLUMN)?;
        let name_idx = column(STATION_NAME_COLUMN)?;
        let province_idx = column(PROVINCE_CODE_COLUMN)?;
        let lon_idx = column(LONGITUDE_COLUMN)?;
        let lat_idx = column(LATITUDE_COLUMN)?;

        let mut stations: BTreeMap<u32, StationAccumulator> = BTreeMap::new();
        for result in reader.records() {
            let record = result?;
            if record.iter().all(str::is_empty) {
                continue;
            }
            let line = record.position().map(|p| p.line()).unwrap_or(0) + self.preamble_lines as u64;
            let cell = |i: usize| record.get(i).filter(|c| !c.is_empty());

            let Some(id_cell) = cell(id_idx) else {
                debug!("line {}: no climate identifier, skipped", line);
                continue;
            };
            let climate_identifier = parse_identifier(id_cell).ok_or_else(|| {
                ProcessingError::InvalidFormat(format!(
                    "Invalid climate identifier '{}' at line {}",
                    id_cell, line
                ))
            })?;

            let station = stations.entry(climate_identifier).or_default();
            if let Some(date_cell) = cell(date_idx) {
                let date = parse_date(date_cell, line)?;
                station.start_date.get_or_insert(date);
                station.end_date = Some(date);
            }
            if station.station_name.is_none() {
                station.station_name = cell(name_idx).map(str::to_string);
            }
            if station.province_code.is_none() {
                station.province_code = cell(province_idx).map(str::to_string);
            }
            if station.latitude.is_none() {
                station.latitude = cell(lat_idx).and_then(|c| c.parse().ok());
            }
            if station.longitude.is_none() {
                station.longitude = cell(lon_idx).and_then(|c| c.parse().ok());
            }
        }

        let mut entries = Vec::with_capacity(stations.len());
        for (climate_identifier, station) in stations {
            let (Some(start_date), Some(end_date), Some(latitude), Some(longitude)) = (
                station.start_date,
                station.end_date,
                station.latitude,
                station.longitude,
            ) else {
                return Err(ProcessingError::MissingData(format!(
                    "No dates or coordinates for climate identifier {}",
                    climate_identifier
                )));
            };
            let entry = StationInventoryEntry::new(
                climate_identifier,
                station.station_name.unwrap_or_default(),
                station.province_code.unwrap_or_default(),
                latitude,
                longitude,
                start_date,
                end_date,
            );
            entry.validate()?;
            entries.push(entry);
        }
        Ok(entries)
    }
}

impl Default for RecipeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifiers sometimes arrive as floats (`2400300.0`).
fn parse_identifier(cell: &str) -> Option<u32> {
    cell.parse::<u32>().ok().or_else(|| {
        cell.parse::<f64>()
            .ok()
            .filter(|v| v.fract() == 0.0 && *v >= 0.0 && *v <= u32::MAX as f64)
            .map(|v| v as u32)
    })
}
