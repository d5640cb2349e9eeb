use crate::error::{ProcessingError, Result};
use crate::models::{
    CombinedRecord, DailyObservation, DataAnomaly, FlagCell, StationSegment, Variable,
};
use crate::utils::constants::{CLIMATE_IDENTIFIER_COLUMN, DATE_COLUMN, DATE_FORMATS};
use chrono::NaiveDate;
use encoding_rs::{Encoding, WINDOWS_1252};
use memmap2::Mmap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Rows, present variables and parse findings of one daily CSV file.
#[derive(Debug, Clone, Default)]
pub struct DailyTable {
    pub variables: Vec<Variable>,
    pub observations: Vec<DailyObservation>,
    pub anomalies: Vec<DataAnomaly>,
}

/// Reads ECCC daily station CSVs and persisted combined records.
///
/// Both share one layout: a `LOCAL_DATE` column, an optional
/// `CLIMATE_IDENTIFIER` column, and a value column plus `_FLAG` column per
/// variable. Unknown columns are ignored.
pub struct StationReader {
    use_mmap: bool,
}

struct ColumnLayout {
    date: usize,
    climate_identifier: Option<usize>,
    variables: Vec<(Variable, usize, Option<usize>)>,
}

impl StationReader {
    pub fn new() -> Self {
        Self { use_mmap: false }
    }

    pub fn with_mmap(use_mmap: bool) -> Self {
        Self { use_mmap }
    }

    /// Read one raw station segment.
    pub fn read_segment(&self, path: &Path, climate_identifier: u32) -> Result<StationSegment> {
        let text = self.read_text(path)?;
        let table = self.parse_daily_table(&text, Some(climate_identifier))?;
        debug!(
            "Read {} rows for station {} from {}",
            table.observations.len(),
            climate_identifier,
            path.display()
        );

        let mut segment = StationSegment::new(climate_identifier, table.variables);
        segment.observations = table.observations;
        segment.anomalies = table.anomalies;
        Ok(segment)
    }

    /// Read a combined record written by the record merger.
    pub fn read_combined(&self, path: &Path, location: &str) -> Result<CombinedRecord> {
        let text = self.read_text(path)?;
        let table = self.parse_daily_table(&text, None)?;
        for anomaly in &table.anomalies {
            warn!("{}: {}", location, anomaly);
        }
        Ok(CombinedRecord::new(
            location,
            table.variables,
            table.observations,
        ))
    }

    fn read_text(&self, path: &Path) -> Result<String> {
        let mut file = File::open(path)?;
        if self.use_mmap {
            let mmap = unsafe { Mmap::map(&file)? };
            Ok(decode_text(&mmap))
        } else {
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes)?;
            Ok(decode_text(&bytes))
        }
    }

    /// Parse CSV text into a daily table.
    ///
    /// `default_identifier` fills the climate identifier when the column is
    /// absent or its cell is not numeric.
    pub fn parse_daily_table(
        &self,
        text: &str,
        default_identifier: Option<u32>,
    ) -> Result<DailyTable> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let layout = Self::column_layout(reader.headers()?)?;
        let mut table = DailyTable {
            variables: layout.variables.iter().map(|(v, _, _)| *v).collect(),
            ..DailyTable::default()
        };

        for result in reader.records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            let date = parse_date(record.get(layout.date).unwrap_or(""), line)?;
            let climate_identifier = layout
                .climate_identifier
                .and_then(|i| record.get(i))
                .and_then(|cell| cell.parse::<u32>().ok())
                .or(default_identifier);

            let mut observation = DailyObservation::new(date, climate_identifier);
            for &(variable, value_idx, flag_idx) in &layout.variables {
                let value = parse_value(record.get(value_idx).unwrap_or(""), variable, line)?;
                observation.set_value(variable, value);

                let Some(flag_idx) = flag_idx else { continue };
                let cell = FlagCell::read(record.get(flag_idx).unwrap_or(""));
                if let FlagCell::Unknown(token) = &cell {
                    table.anomalies.push(DataAnomaly::UnknownFlag {
                        climate_identifier,
                        date,
                        variable,
                        token: token.clone(),
                    });
                }
                observation.set_flag_cell(variable, cell);
            }

            table.observations.push(observation);
        }

        Ok(table)
    }

    fn column_layout(headers: &csv::StringRecord) -> Result<ColumnLayout> {
        let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));

        let date = find(DATE_COLUMN).ok_or_else(|| {
            ProcessingError::InvalidFormat(format!("Missing '{}' column", DATE_COLUMN))
        })?;

        let variables = Variable::ALL
            .into_iter()
            .filter_map(|variable| {
                find(variable.column_name())
                    .map(|idx| (variable, idx, find(&variable.flag_column_name())))
            })
            .collect();

        Ok(ColumnLayout {
            date,
            climate_identifier: find(CLIMATE_IDENTIFIER_COLUMN),
            variables,
        })
    }
}

impl Default for StationReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode file bytes, honouring a BOM and falling back to Windows-1252 for
/// archive files that are not valid UTF-8.
pub fn decode_text(bytes: &[u8]) -> String {
    if let Some((encoding, bom_length)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_length..]);
        return text.into_owned();
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (text, _, _) = WINDOWS_1252.decode(bytes);
            text.into_owned()
        }
    }
}

/// Parse a date cell; an unparsable date stops the read.
pub fn parse_date(cell: &str, line: u64) -> Result<NaiveDate> {
    let cell = cell.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| {
            NaiveDate::parse_from_str(cell, format)
                .ok()
                .or_else(|| {
                    chrono::NaiveDateTime::parse_from_str(cell, format)
                        .ok()
                        .map(|dt| dt.date())
                })
        })
        .ok_or_else(|| ProcessingError::InvalidDate {
            value: cell.to_string(),
            line,
        })
}

fn parse_value(cell: &str, variable: Variable, line: u64) -> Result<Option<f64>> {
    if cell.is_empty() {
        return Ok(None);
    }
    let value = cell.parse::<f64>().map_err(|_| {
        ProcessingError::InvalidFormat(format!(
            "Invalid {} value '{}' at line {}",
            variable, cell, line
        ))
    })?;
    Ok(if value.is_nan() { None } else { Some(value) })
}
