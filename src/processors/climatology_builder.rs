use crate::error::{ProcessingError, Result};
use crate::models::{
    ClimatologyRecord, ClimatologyRow, CycloneClimatology, MonthlyRecord, YearMonth,
    VARIABLE_COUNT,
};
use chrono::NaiveDate;
use tracing::debug;

/// Inclusive span of months a climatology is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceWindow {
    pub start: YearMonth,
    pub end: YearMonth,
}

impl ReferenceWindow {
    pub fn new(start: YearMonth, end: YearMonth) -> Result<Self> {
        if start > end {
            return Err(ProcessingError::Config(format!(
                "Reference window starts ({}) after it ends ({})",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, period: YearMonth) -> bool {
        period >= self.start && period <= self.end
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.contains(YearMonth::of(date))
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        self.start.first_day()
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.end.next().first_day().and_then(|d| d.pred_opt())
    }
}

/// Multi-year monthly means over a reference window.
pub struct ClimatologyBuilder {
    window: ReferenceWindow,
}

impl ClimatologyBuilder {
    pub fn new(window: ReferenceWindow) -> Self {
        Self { window }
    }

    pub fn window(&self) -> ReferenceWindow {
        self.window
    }

    /// Always twelve rows. Each value is the mean of the non-null monthly
    /// values for that calendar month inside the window, or null when there
    /// are none. Cyclone statistics are left-joined by location and month.
    pub fn build(
        &self,
        monthly: &MonthlyRecord,
        cyclones: Option<&CycloneClimatology>,
    ) -> ClimatologyRecord {
        let mut sums = [[0.0f64; VARIABLE_COUNT]; 12];
        let mut counts = [[0usize; VARIABLE_COUNT]; 12];

        let in_window = monthly
            .rows
            .iter()
            .filter(|row| self.window.contains(row.period));
        for row in in_window {
            let m = row.period.month as usize - 1;
            for variable in &monthly.variables {
                if let Some(value) = row.value(*variable) {
                    sums[m][variable.index()] += value;
                    counts[m][variable.index()] += 1;
                }
            }
        }

        let cyclone_columns = cyclones.map(|c| c.columns.clone()).unwrap_or_default();
        let rows = (1..=12u32)
            .map(|month| {
                let m = month as usize - 1;
                let mut values = [None; VARIABLE_COUNT];
                for variable in &monthly.variables {
                    let i = variable.index();
                    if counts[m][i] > 0 {
                        values[i] = Some(sums[m][i] / counts[m][i] as f64);
                    }
                }

                let cyclone = match cyclones {
                    Some(table) => table
                        .get(&monthly.location, month)
                        .map(<[Option<f64>]>::to_vec)
                        .unwrap_or_else(|| vec![None; table.columns.len()]),
                    None => Vec::new(),
                };

                ClimatologyRow {
                    month,
                    values,
                    cyclone,
                }
            })
            .collect();

        debug!(
            "{}: climatology over {} to {}",
            monthly.location, self.window.start, self.window.end
        );

        ClimatologyRecord {
            location: monthly.location.clone(),
            variables: monthly.variables.clone(),
            cyclone_columns,
            rows,
        }
    }
}
