use crate::error::{ProcessingError, Result};
use crate::models::{MonthlyRecord, MonthlyRow, Variable, YearMonth};
use crate::utils::constants::{DEFAULT_BUFFER_SIZE, MONTH_COLUMN, YEAR_COLUMN};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Reads monthly files written by the monthly aggregator.
pub struct MonthlyReader;

impl MonthlyReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read_monthly(&self, path: &Path, location: &str) -> Result<MonthlyRecord> {
        let file = File::open(path)?;
        self.read_from(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file), location)
    }

    pub fn read_from<R: Read>(&self, input: R, location: &str) -> Result<MonthlyRecord> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(input);

        let headers = reader.headers()?.clone();
        let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        let missing =
            |name: &str| ProcessingError::InvalidFormat(format!("Missing '{}' column", name));

        let year_idx = find(YEAR_COLUMN).ok_or_else(|| missing(YEAR_COLUMN))?;
        let month_idx = find(MONTH_COLUMN).ok_or_else(|| missing(MONTH_COLUMN))?;
        let columns: Vec<(Variable, usize)> = Variable::ALL
            .into_iter()
            .filter_map(|v| find(v.column_name()).map(|idx| (v, idx)))
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let field = |idx: usize| record.get(idx).unwrap_or("");
            let bad = |value: &str| {
                ProcessingError::InvalidFormat(format!("Invalid value '{}' at line {}", value, line))
            };

            let year = field(year_idx).parse::<i32>().map_err(|_| bad(field(year_idx)))?;
            let month = field(month_idx).parse::<u32>().map_err(|_| bad(field(month_idx)))?;
            let mut row = MonthlyRow::new(YearMonth::new(year, month)?);

            for &(variable, idx) in &columns {
                let cell = field(idx);
                if !cell.is_empty() {
                    let value = cell.parse::<f64>().map_err(|_| bad(cell))?;
                    row.set_value(variable, Some(value).filter(|v| !v.is_nan()));
                }
            }
            rows.push(row);
        }

        Ok(MonthlyRecord::new(
            location,
            columns.into_iter().map(|(v, _)| v).collect(),
            rows,
        ))
    }
}

impl Default for MonthlyReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_monthly() {
        let text = "YEAR,MONTH,TOTAL_PRECIPITATION,MEAN_TEMPERATURE\n1960,1,12.5,\n1960,2,,-30.1\n";
        let record = MonthlyReader::new().read_from(text.as_bytes(), "alert").unwrap();

        assert_eq!(record.location, "alert");
        assert_eq!(
            record.variables,
            vec![Variable::MeanTemperature, Variable::TotalPrecipitation]
        );
        assert_eq!(record.rows.len(), 2);
        assert_eq!(record.rows[0].period, YearMonth::new(1960, 1).unwrap());
        assert_eq!(record.rows[0].value(Variable::TotalPrecipitation), Some(12.5));
        assert_eq!(record.rows[0].value(Variable::MeanTemperature), None);
        assert_eq!(record.rows[1].value(Variable::MeanTemperature), Some(-30.1));
    }

    #[test]
    fn test_rejects_bad_month() {
        let text = "YEAR,MONTH,TOTAL_RAIN\n1960,13,1.0\n";
        assert!(MonthlyReader::new().read_from(text.as_bytes(), "alert").is_err());
    }
}
