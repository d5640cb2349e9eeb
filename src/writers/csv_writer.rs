use crate::error::Result;
use crate::models::{
    ClimatologyRecord, CombinedRecord, ExtremeEventCounts, MonthlyRecord, QuantileSummary,
};
use crate::processors::quantiles::quantile_label;
use crate::utils::constants::{
    CLIMATE_IDENTIFIER_COLUMN, DATE_COLUMN, DEFAULT_BUFFER_SIZE, MONTH_COLUMN, YEAR_COLUMN,
};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Write `path` through a temporary file in the same directory, renamed into
/// place only once `fill` succeeds. A failed write leaves the previous file.
pub fn write_atomic<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    {
        let mut writer = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, temp.as_file_mut());
        fill(&mut writer)?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;
    temp.persist(path)?;

    debug!("Wrote {}", path.display());
    Ok(())
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// CSV output for every persisted record type.
pub struct CsvWriter;

impl CsvWriter {
    pub fn new() -> Self {
        Self
    }

    /// `LOCAL_DATE`, `CLIMATE_IDENTIFIER`, then a value and flag column per
    /// variable. Inserted rows have an empty identifier.
    pub fn write_combined(&self, record: &CombinedRecord, path: &Path) -> Result<()> {
        write_atomic(path, |out| {
            let mut writer = csv::Writer::from_writer(out);

            let mut header = vec![DATE_COLUMN.to_string(), CLIMATE_IDENTIFIER_COLUMN.to_string()];
            for variable in &record.variables {
                header.push(variable.column_name().to_string());
                header.push(variable.flag_column_name());
            }
            writer.write_record(&header)?;

            for obs in &record.observations {
                let mut row = vec![
                    obs.date.format("%Y-%m-%d").to_string(),
                    obs.climate_identifier.map(|id| id.to_string()).unwrap_or_default(),
                ];
                for variable in &record.variables {
                    row.push(cell(obs.value(*variable)));
                    row.push(obs.flag_cell(*variable).code().to_string());
                }
                writer.write_record(&row)?;
            }

            writer.flush()?;
            Ok(())
        })
    }

    /// `YEAR`, `MONTH`, one column per variable. Also used for observation
    /// frequencies, which share the monthly shape.
    pub fn write_monthly(&self, record: &MonthlyRecord, path: &Path) -> Result<()> {
        write_atomic(path, |out| {
            let mut writer = csv::Writer::from_writer(out);

            let mut header = vec![YEAR_COLUMN.to_string(), MONTH_COLUMN.to_string()];
            header.extend(record.variables.iter().map(|v| v.column_name().to_string()));
            writer.write_record(&header)?;

            for row in &record.rows {
                let mut fields = vec![row.period.year.to_string(), row.period.month.to_string()];
                fields.extend(record.variables.iter().map(|v| cell(row.value(*v))));
                writer.write_record(&fields)?;
            }

            writer.flush()?;
            Ok(())
        })
    }

    /// `MONTH`, one column per variable, then the joined cyclone columns.
    pub fn write_climatology(&self, record: &ClimatologyRecord, path: &Path) -> Result<()> {
        write_atomic(path, |out| {
            let mut writer = csv::Writer::from_writer(out);

            let mut header = vec![MONTH_COLUMN.to_string()];
            header.extend(record.variables.iter().map(|v| v.column_name().to_string()));
            header.extend(record.cyclone_columns.iter().cloned());
            writer.write_record(&header)?;

            for row in &record.rows {
                let mut fields = vec![row.month.to_string()];
                fields.extend(record.variables.iter().map(|v| cell(row.value(*v))));
                fields.extend(row.cyclone.iter().map(|v| cell(*v)));
                writer.write_record(&fields)?;
            }

            writer.flush()?;
            Ok(())
        })
    }

    /// One row per location, one `pNN` column per probability.
    pub fn write_quantiles(
        &self,
        probabilities: &[f64],
        summaries: &[QuantileSummary],
        path: &Path,
    ) -> Result<()> {
        write_atomic(path, |out| {
            let mut writer = csv::Writer::from_writer(out);

            let mut header = vec!["location".to_string()];
            header.extend(probabilities.iter().map(|p| quantile_label(*p)));
            writer.write_record(&header)?;

            for summary in summaries {
                let mut fields = vec![summary.location.clone()];
                fields.extend(summary.quantiles.iter().map(|q| cell(*q)));
                writer.write_record(&fields)?;
            }

            writer.flush()?;
            Ok(())
        })
    }

    /// Raw extreme-event counts, months `1`..`12` as columns.
    pub fn write_event_counts(&self, events: &[ExtremeEventCounts], path: &Path) -> Result<()> {
        self.write_month_table(
            events
                .iter()
                .map(|e| (e.location.as_str(), e.counts.map(|c| Some(c as f64)))),
            path,
        )
    }

    /// Each month's percentage of the annual event count.
    pub fn write_event_shares(&self, events: &[ExtremeEventCounts], path: &Path) -> Result<()> {
        self.write_month_table(events.iter().map(|e| (e.location.as_str(), e.shares())), path)
    }

    fn write_month_table<'a, I>(&self, rows: I, path: &Path) -> Result<()>
    where
        I: Iterator<Item = (&'a str, [Option<f64>; 12])>,
    {
        write_atomic(path, |out| {
            let mut writer = csv::Writer::from_writer(out);

            let mut header = vec!["location".to_string()];
            header.extend((1..=12).map(|m: u32| m.to_string()));
            writer.write_record(&header)?;

            for (location, values) in rows {
                let mut fields = vec![location.to_string()];
                fields.extend(values.iter().map(|v| cell(*v)));
                writer.write_record(&fields)?;
            }

            writer.flush()?;
            Ok(())
        })
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}
