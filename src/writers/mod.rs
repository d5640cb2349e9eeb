pub mod csv_writer;
pub mod formatted_writer;
pub mod recipe_writer;

pub use csv_writer::{write_atomic, CsvWriter};
pub use formatted_writer::FormattedWriter;
pub use recipe_writer::write_recipes;
