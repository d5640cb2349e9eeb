use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid date '{value}' at line {line}")]
    InvalidDate { value: String, line: u64 },

    #[error("Raw station file for climate identifier {climate_identifier} not found at {}", path.display())]
    SegmentNotFound {
        climate_identifier: u32,
        path: PathBuf,
    },

    #[error("{location}: {count} duplicate dates prevent reindexing onto a daily calendar")]
    DuplicateDates { location: String, count: usize },

    #[error("Unknown variable: '{0}'")]
    UnknownVariable(String),

    #[error("Quantile probability {0} is outside [0, 1]")]
    InvalidProbability(f64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Could not replace output file: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("Missing required data: {0}")]
    MissingData(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

impl ProcessingError {
    /// True for failures that belong to a single location's data and must not
    /// stop the rest of a batch.
    pub fn is_location_scoped(&self) -> bool {
        matches!(
            self,
            ProcessingError::Io(_)
                | ProcessingError::Csv(_)
                | ProcessingError::InvalidDate { .. }
                | ProcessingError::SegmentNotFound { .. }
                | ProcessingError::DuplicateDates { .. }
                | ProcessingError::MissingData(_)
                | ProcessingError::InvalidFormat(_)
                | ProcessingError::Persist(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_scoped_classification() {
        let missing = ProcessingError::SegmentNotFound {
            climate_identifier: 2400300,
            path: PathBuf::from("raw/2400300.csv"),
        };
        assert!(missing.is_location_scoped());
        assert!(missing.to_string().contains("2400300"));

        let bad_date = ProcessingError::InvalidDate {
            value: "1970-13-01".to_string(),
            line: 4,
        };
        assert!(bad_date.is_location_scoped());

        assert!(!ProcessingError::Config("no recipe file".to_string()).is_location_scoped());
        assert!(!ProcessingError::UnknownVariable("WIND".to_string()).is_location_scoped());
    }
}
