pub mod climatology_builder;
pub mod integrity_checker;
pub mod monthly_aggregator;
pub mod pipeline;
pub mod quantiles;
pub mod recipe_builder;
pub mod record_merger;

pub use climatology_builder::{ClimatologyBuilder, ReferenceWindow};
pub use integrity_checker::{IntegrityChecker, SpanReport};
pub use monthly_aggregator::MonthlyAggregator;
pub use pipeline::{BatchSummary, Pipeline};
pub use quantiles::{get_quantiles, QuantileExtractor};
pub use recipe_builder::{RecipeBuild, RecipeBuilder};
pub use record_merger::{MergeOptions, MergeOutcome, RecordMerger};
