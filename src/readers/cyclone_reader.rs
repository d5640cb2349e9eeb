use crate::error::{ProcessingError, Result};
use crate::models::CycloneClimatology;
use crate::utils::constants::CYCLONE_PREFIX;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const LOCATION_COLUMN: &str = "location";
const MONTH_COLUMN: &str = "month";

/// Load per-location, per-month cyclone statistics for the climatology join.
pub fn read_cyclone_climatology(path: &Path) -> Result<CycloneClimatology> {
    let file = File::open(path).map_err(|e| {
        ProcessingError::Config(format!(
            "Cannot open cyclone file {}: {}",
            path.display(),
            e
        ))
    })?;
    parse_cyclone_climatology(file)
        .map_err(|e| ProcessingError::Config(format!("{}: {}", path.display(), e)))
}

/// Every column other than `location` and `month` is numeric and is renamed
/// `CYCLONE_<NAME>` in upper case.
pub fn parse_cyclone_climatology<R: Read>(input: R) -> Result<CycloneClimatology> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let location_idx = find(LOCATION_COLUMN).ok_or_else(|| {
        ProcessingError::InvalidFormat(format!("Missing '{}' column", LOCATION_COLUMN))
    })?;
    let month_idx = find(MONTH_COLUMN).ok_or_else(|| {
        ProcessingError::InvalidFormat(format!("Missing '{}' column", MONTH_COLUMN))
    })?;

    let value_columns: Vec<usize> = (0..headers.len())
        .filter(|&i| i != location_idx && i != month_idx)
        .collect();
    let names = value_columns
        .iter()
        .map(|&i| format!("{}{}", CYCLONE_PREFIX, headers[i].to_uppercase()))
        .collect();

    let mut cyclones = CycloneClimatology::new(names);
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let invalid = |value: &str| {
            ProcessingError::InvalidFormat(format!("Invalid value '{}' at line {}", value, line))
        };

        let location = record.get(location_idx).unwrap_or("");
        let month_cell = record.get(month_idx).unwrap_or("");
        let month = month_cell
            .parse::<u32>()
            .ok()
            .filter(|m| (1..=12).contains(m))
            .ok_or_else(|| invalid(month_cell))?;

        let mut values = Vec::with_capacity(value_columns.len());
        for &i in &value_columns {
            let cell = record.get(i).unwrap_or("");
            if cell.is_empty() {
                values.push(None);
            } else {
                values.push(Some(cell.parse::<f64>().map_err(|_| invalid(cell))?));
            }
        }
        cyclones.insert(location, month, values);
    }
    Ok(cyclones)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_rename_columns() {
        let text = "location,month,track_count,mean_depth\nCape Dyer,1,4.5,980.2\ncape dyer,2,,975.0\n";
        let cyclones = parse_cyclone_climatology(text.as_bytes()).unwrap();

        assert_eq!(
            cyclones.columns,
            vec!["CYCLONE_TRACK_COUNT", "CYCLONE_MEAN_DEPTH"]
        );
        assert_eq!(cyclones.get("cape dyer", 1), Some(&[Some(4.5), Some(980.2)][..]));
        assert_eq!(cyclones.get("Cape Dyer", 2), Some(&[None, Some(975.0)][..]));
        assert_eq!(cyclones.len(), 2);
    }

    #[test]
    fn test_bad_month_rejected() {
        let text = "location,month,track_count\nalert,0,1\n";
        assert!(parse_cyclone_climatology(text.as_bytes()).is_err());
    }
}
