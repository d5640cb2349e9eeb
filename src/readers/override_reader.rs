use crate::error::{ProcessingError, Result};
use crate::models::{BadRecordOverride, Variable};
use crate::readers::station_reader::parse_date;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct OverrideRow {
    station: String,
    date: String,
    variable: String,
}

/// Load the bad-record override list. A missing or malformed file is a
/// configuration error.
pub fn read_overrides(path: &Path) -> Result<Vec<BadRecordOverride>> {
    let file = File::open(path).map_err(|e| {
        ProcessingError::Config(format!(
            "Cannot open override file {}: {}",
            path.display(),
            e
        ))
    })?;
    let overrides = parse_overrides(file)
        .map_err(|e| ProcessingError::Config(format!("{}: {}", path.display(), e)))?;
    debug!("Loaded {} bad-record overrides", overrides.len());
    Ok(overrides)
}

pub fn parse_overrides<R: Read>(input: R) -> Result<Vec<BadRecordOverride>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut overrides = Vec::new();
    for result in reader.deserialize::<OverrideRow>() {
        let row = result?;
        let line = overrides.len() as u64 + 2;
        let date = parse_date(&row.date, line)?;
        let variable: Variable = row.variable.parse()?;
        overrides.push(BadRecordOverride::new(row.station, date, variable));
    }
    Ok(overrides)
}
