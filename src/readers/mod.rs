pub mod cyclone_reader;
pub mod monthly_reader;
pub mod override_reader;
pub mod recipe_reader;
pub mod station_reader;

pub use cyclone_reader::read_cyclone_climatology;
pub use monthly_reader::MonthlyReader;
pub use override_reader::read_overrides;
pub use recipe_reader::{find_recipe, read_recipes};
pub use station_reader::{DailyTable, StationReader};
