use arctic_precip::config::PipelineConfig;
use arctic_precip::models::{MergeRecipe, Variable};
use arctic_precip::processors::{
    get_quantiles, MergeOptions, Pipeline, RecipeBuilder, ReferenceWindow,
};
use arctic_precip::readers::{read_recipes, MonthlyReader, StationReader};
use arctic_precip::writers::write_recipes;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SCENARIO_RECIPE: &str = r#"[{"location": "test site", "stations": [
    {"climate_identifier": 1001, "start_date": "2000-01-01", "end_date": "2000-01-03"},
    {"climate_identifier": 1002, "start_date": "2000-01-04", "end_date": "2000-01-05"}]}]"#;

fn config_in(dir: &Path) -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.paths.raw_station_dir = dir.join("raw");
    config.paths.combined_dir = dir.join("combined");
    config.paths.monthly_dir = dir.join("monthly");
    config.paths.climatology_dir = dir.join("climatology");
    config.paths.statistics_dir = dir.join("statistics");
    config.paths.qc_dir = dir.join("qc");
    config.paths.recipe_file = dir.join("recipes.json");
    config.locations = vec!["test site".to_string()];
    config
}

/// Raw station file with one precipitation value per listed date.
fn write_raw(dir: &Path, id: u32, rows: &[(&str, &str)]) {
    let raw = dir.join("raw");
    fs::create_dir_all(&raw).unwrap();
    let mut text = String::from(
        "x,y,LOCAL_DATE,STATION_NAME,CLIMATE_IDENTIFIER,TOTAL_PRECIPITATION,TOTAL_PRECIPITATION_FLAG\n",
    );
    for (date, value) in rows {
        text.push_str(&format!("-70.0,70.0,{date},TEST,{id},{value},\n"));
    }
    fs::write(raw.join(format!("{id}.csv")), text).unwrap();
}

fn write_daily_range(dir: &Path, id: u32, start: NaiveDate, end: NaiveDate, value: f64) {
    let dates: Vec<String> = start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect();
    let value = value.to_string();
    let rows: Vec<(&str, &str)> = dates.iter().map(|d| (d.as_str(), value.as_str())).collect();
    write_raw(dir, id, &rows);
}

fn pipeline(config: PipelineConfig) -> Pipeline {
    Pipeline::new(config).with_silent(true)
}

#[test]
fn test_two_station_scenario() {
    let dir = TempDir::new().unwrap();
    write_raw(dir.path(), 1001, &[("2000-01-01", "1.0"), ("2000-01-02", "2.0"), ("2000-01-03", "3.0")]);
    write_raw(dir.path(), 1002, &[("2000-01-04", "4.0"), ("2000-01-05", "5.0")]);
    fs::write(dir.path().join("recipes.json"), SCENARIO_RECIPE).unwrap();

    let pipeline = pipeline(config_in(dir.path()));
    let summary = pipeline
        .combine(&pipeline.locations(&[]), MergeOptions::default())
        .unwrap();
    assert_eq!(summary.succeeded, vec!["test site".to_string()]);
    assert_eq!(summary.anomalies, 0);

    let path = dir.path().join("combined").join("test_site.combined.csv");
    let record = StationReader::new().read_combined(&path, "test site").unwrap();
    assert_eq!(record.len(), 5);
    assert_eq!(record.first_date(), NaiveDate::from_ymd_opt(2000, 1, 1));
    assert_eq!(record.last_date(), NaiveDate::from_ymd_opt(2000, 1, 5));
    assert!(record.is_sorted_by_date());
    let values: Vec<Option<f64>> = record
        .series(Variable::TotalPrecipitation, None, None)
        .into_iter()
        .map(|(_, v)| v)
        .collect();
    assert_eq!(values, vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)]);
    assert_eq!(record.observations[3].climate_identifier, Some(1002));
}

#[test]
fn test_one_bad_location_does_not_stop_batch() {
    let dir = TempDir::new().unwrap();
    write_raw(dir.path(), 1001, &[("2000-01-01", "1.0"), ("2000-01-02", "2.0")]);
    write_raw(dir.path(), 3001, &[("2000-01-01", "1.0"), ("2000-13-02", "2.0")]);
    fs::write(
        dir.path().join("recipes.json"),
        r#"[
        {"location": "good", "stations": [{"climate_identifier": 1001, "start_date": "2000-01-01", "end_date": "2000-01-02"}]},
        {"location": "no raw file", "stations": [{"climate_identifier": 2001, "start_date": "2000-01-01", "end_date": "2000-01-02"}]},
        {"location": "bad date", "stations": [{"climate_identifier": 3001, "start_date": "2000-01-01", "end_date": "2000-01-02"}]}]"#,
    )
    .unwrap();

    let pipeline = pipeline(config_in(dir.path()));
    let locations: Vec<String> = ["no raw file", "good", "bad date", "no recipe"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let summary = pipeline.combine(&locations, MergeOptions::default()).unwrap();

    assert_eq!(summary.succeeded, vec!["good".to_string()]);
    assert_eq!(summary.failed.len(), 3);
    assert!(summary.failed[0].1.contains("2001"));
    assert!(summary.failed[1].1.contains("Invalid date '2000-13-02'"));
    assert!(summary.has_failures());
    assert!(dir.path().join("combined").join("good.combined.csv").exists());
    assert!(!dir.path().join("combined").join("bad_date.combined.csv").exists());
}

#[test]
fn test_malformed_recipe_stops_run() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("recipes.json"), r#"{"location": "not a list"}"#).unwrap();

    let pipeline = pipeline(config_in(dir.path()));
    let err = pipeline
        .combine(&pipeline.locations(&[]), MergeOptions::default())
        .unwrap_err();
    assert!(!err.is_location_scoped());
}

#[test]
fn test_reindex_is_idempotent() {
    let dir = TempDir::new().unwrap();
    write_raw(dir.path(), 1001, &[("2000-01-01", "1.0"), ("2000-01-04", "2.0"), ("2000-01-09", "")]);
    write_raw(dir.path(), 1002, &[("2000-01-12", "3.0")]);
    fs::write(
        dir.path().join("recipes.json"),
        r#"[{"location": "test site", "stations": [
            {"climate_identifier": 1002, "start_date": "2000-01-10", "end_date": "2000-01-31"},
            {"climate_identifier": 1001, "start_date": "2000-01-01", "end_date": "2000-01-09"}]}]"#,
    )
    .unwrap();

    let pipeline = pipeline(config_in(dir.path()));
    let path = dir.path().join("combined").join("test_site.combined.csv");

    let summary = pipeline.combine(&pipeline.locations(&[]), MergeOptions::default()).unwrap();
    assert!(summary.notes.is_empty());
    let first = fs::read_to_string(&path).unwrap();
    pipeline.combine(&pipeline.locations(&[]), MergeOptions::default()).unwrap();
    let second = fs::read_to_string(&path).unwrap();
    assert_eq!(first, second);

    let record = StationReader::new().read_combined(&path, "test site").unwrap();
    assert_eq!(record.len(), 12);
    let nulls = record
        .observations
        .iter()
        .filter(|o| o.value(Variable::TotalPrecipitation).is_none())
        .count();
    assert_eq!(nulls, 9);

    // without reindexing the gaps stay and the span report says so
    let summary = pipeline
        .combine(&pipeline.locations(&[]), MergeOptions { reindex: false })
        .unwrap();
    let record = StationReader::new().read_combined(&path, "test site").unwrap();
    assert_eq!(record.len(), 4);
    assert_eq!(summary.notes.len(), 1);
    let text = summary.summary();
    assert!(text.contains("=== Span Check: test site ==="));
    assert!(text.contains("Rows: 4 (12 expected)"));
    assert!(text.contains("Missing Days: 8"));
    assert!(text.contains("Status: FAIL"));
}

#[test]
fn test_reversed_recipe_entry_fails_its_location_only() {
    let dir = TempDir::new().unwrap();
    write_raw(dir.path(), 1001, &[("2000-01-01", "1.0"), ("2000-01-02", "2.0")]);
    write_raw(dir.path(), 1002, &[("2000-01-01", "1.0"), ("2000-01-05", "2.0")]);
    fs::write(
        dir.path().join("recipes.json"),
        r#"[
        {"location": "good", "stations": [{"climate_identifier": 1001, "start_date": "2000-01-01", "end_date": "2000-01-02"}]},
        {"location": "bad", "stations": [{"climate_identifier": 1002, "start_date": "2000-01-05", "end_date": "2000-01-01"}]}]"#,
    )
    .unwrap();

    let pipeline = pipeline(config_in(dir.path()));
    let locations = vec!["good".to_string(), "bad".to_string()];
    let summary = pipeline.combine(&locations, MergeOptions::default()).unwrap();

    assert_eq!(summary.succeeded, vec!["good".to_string()]);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].0, "bad");
    assert!(summary.failed[0].1.contains("Invalid recipe for 'bad'"));
    assert!(dir.path().join("combined").join("good.combined.csv").exists());
    assert!(!dir.path().join("combined").join("bad.combined.csv").exists());
}

#[test]
fn test_unknown_flag_survives_into_combined_file() {
    let dir = TempDir::new().unwrap();
    let raw = dir.path().join("raw");
    fs::create_dir_all(&raw).unwrap();
    fs::write(
        raw.join("1001.csv"),
        "LOCAL_DATE,CLIMATE_IDENTIFIER,TOTAL_PRECIPITATION,TOTAL_PRECIPITATION_FLAG\n\
         2000-01-01,1001,1.0,Q\n\
         2000-01-02,1001,0.0,T\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("recipes.json"),
        r#"[{"location": "test site", "stations": [
            {"climate_identifier": 1001, "start_date": "2000-01-01", "end_date": "2000-01-02"}]}]"#,
    )
    .unwrap();

    let pipeline = pipeline(config_in(dir.path()));
    let summary = pipeline
        .combine(&pipeline.locations(&[]), MergeOptions::default())
        .unwrap();
    assert_eq!(summary.anomalies, 1);

    let path = dir.path().join("combined").join("test_site.combined.csv");
    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[1], "2000-01-01,1001,1,Q");
    assert_eq!(lines[2], "2000-01-02,1001,0,T");

    // read back, the token is still there and still reported
    let table = StationReader::new()
        .parse_daily_table(&text, None)
        .unwrap();
    assert_eq!(table.anomalies.len(), 1);
    assert_eq!(table.observations[0].flag_cell(Variable::TotalPrecipitation).code(), "Q");
}

#[test]
fn test_override_file_nulls_single_cell() {
    let dir = TempDir::new().unwrap();
    write_raw(dir.path(), 1001, &[("2000-01-01", "1.0"), ("2000-01-02", "2.0"), ("2000-01-03", "3.0")]);
    write_raw(dir.path(), 1002, &[("2000-01-04", "4.0"), ("2000-01-05", "5.0")]);
    fs::write(dir.path().join("recipes.json"), SCENARIO_RECIPE).unwrap();
    fs::write(
        dir.path().join("overrides.csv"),
        "station,date,variable\ntest site,2000-01-04,TOTAL_PRECIPITATION\nother place,2000-01-01,TOTAL_PRECIPITATION\n",
    )
    .unwrap();

    let mut config = config_in(dir.path());
    config.paths.override_file = Some(dir.path().join("overrides.csv"));
    let pipeline = pipeline(config);
    pipeline.combine(&pipeline.locations(&[]), MergeOptions::default()).unwrap();

    let path = dir.path().join("combined").join("test_site.combined.csv");
    let record = StationReader::new().read_combined(&path, "test site").unwrap();
    let values: Vec<Option<f64>> = record
        .observations
        .iter()
        .map(|o| o.value(Variable::TotalPrecipitation))
        .collect();
    assert_eq!(values, vec![Some(1.0), Some(2.0), Some(3.0), None, Some(5.0)]);
}

#[test]
fn test_missing_override_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("recipes.json"), SCENARIO_RECIPE).unwrap();
    let mut config = config_in(dir.path());
    config.paths.override_file = Some(dir.path().join("missing.csv"));

    let pipeline = pipeline(config);
    assert!(pipeline
        .combine(&pipeline.locations(&[]), MergeOptions::default())
        .is_err());
}

#[test]
fn test_downstream_stages() {
    let dir = TempDir::new().unwrap();
    let start = NaiveDate::from_ymd_opt(1960, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(1961, 12, 31).unwrap();
    write_daily_range(dir.path(), 1001, start, end, 2.0);
    fs::write(
        dir.path().join("recipes.json"),
        r#"[{"location": "test site", "stations": [
            {"climate_identifier": 1001, "start_date": "1960-01-01", "end_date": "1961-12-31"}]}]"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("cyclones.csv"),
        "location,month,track_count\ntest site,1,3.5\n",
    )
    .unwrap();

    let mut config = config_in(dir.path());
    config.paths.cyclone_file = Some(dir.path().join("cyclones.csv"));
    let pipeline = pipeline(config);
    let locations = pipeline.locations(&[]);

    pipeline.combine(&locations, MergeOptions::default()).unwrap();

    let summary = pipeline.monthly(&locations).unwrap();
    assert!(!summary.has_failures());
    let monthly = MonthlyReader::new()
        .read_monthly(&dir.path().join("monthly").join("test_site.monthly.csv"), "test site")
        .unwrap();
    assert_eq!(monthly.rows.len(), 24);
    assert_eq!(monthly.variables, vec![Variable::TotalPrecipitation]);
    assert_eq!(monthly.rows[1].value(Variable::TotalPrecipitation), Some(58.0));
    // 7 variables expected, 6 absent
    assert_eq!(summary.anomalies, 6);

    let window = ReferenceWindow::new("1960-01".parse().unwrap(), "1961-12".parse().unwrap()).unwrap();
    pipeline.climatology(&locations, window, true).unwrap();
    let climatology =
        fs::read_to_string(dir.path().join("climatology").join("test_site.climatology.csv")).unwrap();
    let lines: Vec<&str> = climatology.lines().collect();
    assert_eq!(lines.len(), 13);
    assert_eq!(lines[0], "MONTH,TOTAL_PRECIPITATION,CYCLONE_TRACK_COUNT");
    assert_eq!(lines[1], "1,62,3.5");
    assert_eq!(lines[2], "2,57,");

    pipeline.quantiles(&locations, 0.0, None, None).unwrap();
    let quantiles = fs::read_to_string(dir.path().join("statistics").join("quantiles.csv")).unwrap();
    assert_eq!(
        quantiles,
        "location,p1,p5,p25,p50,p75,p95,p99,p100\ntest site,2,2,2,2,2,2,2,2\n"
    );

    pipeline.p95_events(&locations, window, 0.0).unwrap();
    let events = fs::read_to_string(dir.path().join("statistics").join("p95_events.csv")).unwrap();
    assert_eq!(events.lines().nth(1), Some("test site,0,0,0,0,0,0,0,0,0,0,0,0"));
    let shares =
        fs::read_to_string(dir.path().join("statistics").join("p95_event_share.csv")).unwrap();
    assert_eq!(shares.lines().nth(1), Some("test site,,,,,,,,,,,,"));

    let (summary, reports) = pipeline.completeness(&locations).unwrap();
    assert!(!summary.has_failures());
    assert_eq!(reports[0].first_year, 1960);
    assert_eq!(reports[0].missing_percentage(Variable::TotalPrecipitation), Some(0.0));
    assert!(dir
        .path()
        .join("monthly")
        .join("test_site.observation_frequency.csv")
        .exists());

    pipeline.qc_format(&locations).unwrap();
    let qc = fs::read_to_string(dir.path().join("qc").join("test_site.for_qc.txt")).unwrap();
    assert_eq!(qc.lines().next(), Some("1960-01-01    2.0    "));
    assert_eq!(qc.lines().count(), 731);
}

#[test]
fn test_downstream_stage_without_combined_file_fails_location_only() {
    let dir = TempDir::new().unwrap();
    let pipeline = pipeline(config_in(dir.path()));
    let summary = pipeline.monthly(&["nowhere".to_string()]).unwrap();
    assert_eq!(summary.failed.len(), 1);
}

#[test]
fn test_recipes_from_sources_round_trip() {
    let dir = TempDir::new().unwrap();
    let sources = dir.path().join("sources");
    fs::create_dir_all(&sources).unwrap();
    fs::write(
        sources.join("POND_INLET_A_Combined.csv"),
        "preamble one\npreamble two\n\
         x,y,LOCAL_DATE,STATION_NAME,CLIMATE_IDENTIFIER,PROVINCE_CODE\n\
         -77.97,72.69,1975-01-01,POND INLET A,2403201,NU\n\
         -77.97,72.69,2012-12-31,POND INLET A,2403201,NU\n\
         -77.97,72.69,2013-01-01,POND INLET,2403200,NU\n\
         -77.97,72.69,2019-06-30,POND INLET,2403200,NU\n",
    )
    .unwrap();

    let build = RecipeBuilder::new().build(&sources).unwrap();
    let output = dir.path().join("recipes.json");
    write_recipes(&build.recipes, &output).unwrap();
    let recipes: Vec<MergeRecipe> = read_recipes(&output).unwrap();

    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0].location, "pond inlet");
    assert_eq!(recipes[0].climate_identifiers(), vec![2403200, 2403201]);
    assert_eq!(
        recipes[0].stations[0].start_date,
        NaiveDate::from_ymd_opt(2013, 1, 1).unwrap()
    );
}

#[test]
fn test_quantile_lower_interpolation() {
    let values: Vec<Option<f64>> = (1..=5).map(|v| Some(v as f64)).collect();
    assert_eq!(get_quantiles(&values, None, &[0.5]).unwrap(), vec![Some(3.0)]);
}
