pub mod record_analyzer;

pub use record_analyzer::{CompletenessReport, RecordAnalyzer, VariableCompleteness};
