use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::flags::{EcccFlag, FlagCell};
use super::variable::{Variable, VARIABLE_COUNT};

/// One day of station data: a value and an optional flag for every tracked variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyObservation {
    pub date: NaiveDate,
    /// Source station; `None` on rows inserted by reindexing.
    pub climate_identifier: Option<u32>,
    pub values: [Option<f64>; VARIABLE_COUNT],
    pub flags: [FlagCell; VARIABLE_COUNT],
}

impl DailyObservation {
    pub fn new(date: NaiveDate, climate_identifier: Option<u32>) -> Self {
        Self {
            date,
            climate_identifier,
            values: [None; VARIABLE_COUNT],
            flags: Default::default(),
        }
    }

    /// An explicit missing day: every value and flag is null.
    pub fn empty(date: NaiveDate) -> Self {
        Self::new(date, None)
    }

    pub fn with_value(mut self, variable: Variable, value: f64) -> Self {
        self.values[variable.index()] = Some(value);
        self
    }

    pub fn with_flag(mut self, variable: Variable, flag: EcccFlag) -> Self {
        self.flags[variable.index()] = FlagCell::Known(flag);
        self
    }

    pub fn value(&self, variable: Variable) -> Option<f64> {
        self.values[variable.index()]
    }

    /// The flag, when it is one of the archive codes.
    pub fn flag(&self, variable: Variable) -> Option<EcccFlag> {
        self.flags[variable.index()].flag()
    }

    pub fn flag_cell(&self, variable: Variable) -> &FlagCell {
        &self.flags[variable.index()]
    }

    pub fn set_value(&mut self, variable: Variable, value: Option<f64>) {
        self.values[variable.index()] = value;
    }

    pub fn set_flag(&mut self, variable: Variable, flag: Option<EcccFlag>) {
        self.flags[variable.index()] = flag.into();
    }

    pub fn set_flag_cell(&mut self, variable: Variable, cell: FlagCell) {
        self.flags[variable.index()] = cell;
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none) && self.flags.iter().all(FlagCell::is_empty)
    }
}
