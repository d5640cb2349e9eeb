use crate::error::Result;
use crate::models::{CombinedRecord, DailyObservation, Variable};
use crate::writers::csv_writer::write_atomic;
use std::path::Path;

/// Fixed-width text export for manual quality control: the date, then a
/// `{value:6.1} {flag:3}` pair per variable, `NaN` for missing values.
pub struct FormattedWriter;

impl FormattedWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn format_line(&self, observation: &DailyObservation, variables: &[Variable]) -> String {
        let mut parts = Vec::with_capacity(variables.len() + 1);
        parts.push(observation.date.format("%Y-%m-%d").to_string());
        for variable in variables {
            let value = observation.value(*variable).unwrap_or(f64::NAN);
            let flag = observation.flag_cell(*variable).code();
            parts.push(format!("{:6.1} {:3}", value, flag));
        }
        parts.join(" ")
    }

    pub fn write_record(&self, record: &CombinedRecord, path: &Path) -> Result<()> {
        write_atomic(path, |out| {
            for observation in &record.observations {
                writeln!(out, "{}", self.format_line(observation, &record.variables))?;
            }
            Ok(())
        })
    }
}

impl Default for FormattedWriter {
    fn default() -> Self {
        Self::new()
    }
}
