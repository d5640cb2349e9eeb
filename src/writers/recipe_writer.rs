use crate::error::Result;
use crate::models::MergeRecipe;
use crate::writers::csv_writer::write_atomic;
use std::path::Path;

/// Write recipes as pretty-printed JSON, readable by `read_recipes`.
pub fn write_recipes(recipes: &[MergeRecipe], path: &Path) -> Result<()> {
    write_atomic(path, |out| {
        serde_json::to_writer_pretty(&mut *out, recipes)?;
        writeln!(out)?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecipeEntry;
    use crate::readers::read_recipes;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_recipes_read_back() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("recipes.json");
        let recipes = vec![MergeRecipe::new(
            "eureka",
            vec![RecipeEntry {
                climate_identifier: 2401200,
                start_date: NaiveDate::from_ymd_opt(1947, 5, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2015, 12, 31).unwrap(),
            }],
        )];

        write_recipes(&recipes, &path)?;
        assert_eq!(read_recipes(&path)?, recipes);
        Ok(())
    }
}
