pub mod anomaly;
pub mod climatology;
pub mod combined;
pub mod correction;
pub mod flags;
pub mod monthly;
pub mod observation;
pub mod recipe;
pub mod segment;
pub mod station;
pub mod statistics;
pub mod variable;

pub use anomaly::DataAnomaly;
pub use climatology::{ClimatologyRecord, ClimatologyRow, CycloneClimatology};
pub use combined::CombinedRecord;
pub use correction::BadRecordOverride;
pub use flags::{EcccFlag, FlagCell};
pub use monthly::{MonthlyRecord, MonthlyRow, YearMonth};
pub use observation::DailyObservation;
pub use recipe::{MergeRecipe, RecipeEntry};
pub use segment::StationSegment;
pub use station::StationInventoryEntry;
pub use statistics::{ExtremeEventCounts, QuantileSummary};
pub use variable::{Variable, VariableFamily, VARIABLE_COUNT};
