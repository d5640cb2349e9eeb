use std::path::{Path, PathBuf};

/// Lowercase words of a location name joined by underscores, e.g.
/// `"Resolute  Bay"` -> `"resolute_bay"`.
pub fn normalize_location(location: &str) -> String {
    location
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Output filename for a location: normalized name followed by `suffix`.
pub fn location_filename(location: &str, suffix: &str) -> String {
    format!("{}{}", normalize_location(location), suffix)
}

pub fn location_path(dir: &Path, location: &str, suffix: &str) -> PathBuf {
    dir.join(location_filename(location, suffix))
}

/// Recover a location name from a multi-station source filename.
///
/// Takes the text before `_Combined` (or before `.csv`), turns underscores
/// into spaces, drops a trailing `.` and a trailing ` A` (airport suffix),
/// and lowercases the result.
pub fn location_from_source_filename(filename: &str) -> Option<String> {
    let stem = match filename.find("_Combined") {
        Some(pos) => &filename[..pos],
        None => filename.strip_suffix(".csv")?,
    };
    if stem.is_empty() {
        return None;
    }

    let mut name = stem.split('_').collect::<Vec<_>>().join(" ");
    if name.ends_with('.') {
        name.pop();
    }
    if name.ends_with(" A") {
        name.truncate(name.len() - 2);
    }
    Some(name.to_lowercase())
}
