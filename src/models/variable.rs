use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ProcessingError, Result};

/// Number of tracked daily variables.
pub const VARIABLE_COUNT: usize = 7;

/// Daily variables tracked in ECCC station files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Variable {
    MeanTemperature,
    MinTemperature,
    MaxTemperature,
    TotalPrecipitation,
    TotalRain,
    TotalSnow,
    SnowOnGround,
}

/// Reducer family used when collapsing days into months.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableFamily {
    Temperature,
    Precipitation,
    SnowCover,
}

impl Variable {
    pub const ALL: [Variable; VARIABLE_COUNT] = [
        Variable::MeanTemperature,
        Variable::MinTemperature,
        Variable::MaxTemperature,
        Variable::TotalPrecipitation,
        Variable::TotalRain,
        Variable::TotalSnow,
        Variable::SnowOnGround,
    ];

    /// Position in per-variable arrays.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn column_name(&self) -> &'static str {
        match self {
            Variable::MeanTemperature => "MEAN_TEMPERATURE",
            Variable::MinTemperature => "MIN_TEMPERATURE",
            Variable::MaxTemperature => "MAX_TEMPERATURE",
            Variable::TotalPrecipitation => "TOTAL_PRECIPITATION",
            Variable::TotalRain => "TOTAL_RAIN",
            Variable::TotalSnow => "TOTAL_SNOW",
            Variable::SnowOnGround => "SNOW_ON_GROUND",
        }
    }

    pub fn flag_column_name(&self) -> String {
        format!("{}_FLAG", self.column_name())
    }

    pub fn from_column_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Variable::ALL
            .into_iter()
            .find(|v| v.column_name().eq_ignore_ascii_case(name))
    }

    pub fn family(&self) -> VariableFamily {
        match self {
            Variable::MeanTemperature | Variable::MinTemperature | Variable::MaxTemperature => {
                VariableFamily::Temperature
            }
            Variable::TotalPrecipitation | Variable::TotalRain | Variable::TotalSnow => {
                VariableFamily::Precipitation
            }
            Variable::SnowOnGround => VariableFamily::SnowCover,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Variable::MeanTemperature => "Mean Temperature",
            Variable::MinTemperature => "Minimum Temperature",
            Variable::MaxTemperature => "Maximum Temperature",
            Variable::TotalPrecipitation => "Total Precipitation",
            Variable::TotalRain => "Total Rain",
            Variable::TotalSnow => "Total Snow",
            Variable::SnowOnGround => "Snow on Ground",
        }
    }

    pub fn units(&self) -> &'static str {
        match self {
            Variable::MeanTemperature | Variable::MinTemperature | Variable::MaxTemperature => {
                "°C"
            }
            Variable::TotalPrecipitation | Variable::TotalRain => "mm",
            Variable::TotalSnow | Variable::SnowOnGround => "cm",
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for Variable {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        Variable::from_column_name(s).ok_or_else(|| ProcessingError::UnknownVariable(s.to_string()))
    }
}
