use crate::error::{ProcessingError, Result};
use crate::models::MergeRecipe;
use crate::utils::constants::DEFAULT_BUFFER_SIZE;
use crate::utils::filename::normalize_location;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, warn};

/// Load merge recipes.
///
/// An unreadable or malformed file, or two recipes for one location, is a
/// configuration error and the run stops before any location is processed.
/// Entry-level problems are left to `MergeRecipe::check` per location.
pub fn read_recipes(path: &Path) -> Result<Vec<MergeRecipe>> {
    let file = File::open(path).map_err(|e| {
        ProcessingError::Config(format!("Cannot open recipe file {}: {}", path.display(), e))
    })?;
    let reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
    let recipes: Vec<MergeRecipe> = serde_json::from_reader(reader).map_err(|e| {
        ProcessingError::Config(format!("Malformed recipe file {}: {}", path.display(), e))
    })?;

    check_recipes(&recipes)?;
    debug!("Loaded {} recipes from {}", recipes.len(), path.display());
    Ok(recipes)
}

pub fn check_recipes(recipes: &[MergeRecipe]) -> Result<()> {
    let mut seen = Vec::with_capacity(recipes.len());
    for recipe in recipes {
        let key = normalize_location(&recipe.location);
        if seen.contains(&key) {
            return Err(ProcessingError::Config(format!(
                "Location '{}' has more than one recipe",
                recipe.location
            )));
        }
        seen.push(key);

        for (a, b) in recipe.overlapping_entries() {
            warn!(
                "{}: recipe entries {} and {} overlap; duplicate dates will follow",
                recipe.location, a, b
            );
        }
    }
    Ok(())
}

/// Find the recipe for a location by normalized name.
pub fn find_recipe<'a>(recipes: &'a [MergeRecipe], location: &str) -> Option<&'a MergeRecipe> {
    let key = normalize_location(location);
    recipes
        .iter()
        .find(|recipe| normalize_location(&recipe.location) == key)
}
