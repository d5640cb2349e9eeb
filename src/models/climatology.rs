use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::variable::{Variable, VARIABLE_COUNT};
use crate::utils::filename::normalize_location;

/// Multi-year mean for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimatologyRow {
    pub month: u32,
    pub values: [Option<f64>; VARIABLE_COUNT],
    /// Values for `ClimatologyRecord::cyclone_columns`, in the same order.
    pub cyclone: Vec<Option<f64>>,
}

impl ClimatologyRow {
    pub fn value(&self, variable: Variable) -> Option<f64> {
        self.values[variable.index()]
    }
}

/// Twelve-month average profile for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimatologyRecord {
    pub location: String,
    pub variables: Vec<Variable>,
    pub cyclone_columns: Vec<String>,
    pub rows: Vec<ClimatologyRow>,
}

impl ClimatologyRecord {
    pub fn month(&self, month: u32) -> Option<&ClimatologyRow> {
        self.rows.iter().find(|row| row.month == month)
    }
}

/// External per-location, per-month cyclone-track statistics.
#[derive(Debug, Clone, Default)]
pub struct CycloneClimatology {
    /// Output column names, already prefixed with `CYCLONE_`.
    pub columns: Vec<String>,
    values: HashMap<(String, u32), Vec<Option<f64>>>,
}

impl CycloneClimatology {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            values: HashMap::new(),
        }
    }

    pub fn insert(&mut self, location: &str, month: u32, values: Vec<Option<f64>>) {
        self.values
            .insert((normalize_location(location), month), values);
    }

    pub fn get(&self, location: &str, month: u32) -> Option<&[Option<f64>]> {
        self.values
            .get(&(normalize_location(location), month))
            .map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
