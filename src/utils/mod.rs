pub mod constants;
pub mod filename;
pub mod logging;
pub mod paths;
pub mod progress;

pub use constants::*;
pub use filename::{location_filename, normalize_location};
pub use paths::PathResolver;
pub use progress::ProgressReporter;
