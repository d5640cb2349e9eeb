/// Column names shared by raw station files and combined records
pub const DATE_COLUMN: &str = "LOCAL_DATE";
pub const CLIMATE_IDENTIFIER_COLUMN: &str = "CLIMATE_IDENTIFIER";
pub const STATION_NAME_COLUMN: &str = "STATION_NAME";
pub const PROVINCE_CODE_COLUMN: &str = "PROVINCE_CODE";
pub const LONGITUDE_COLUMN: &str = "x";
pub const LATITUDE_COLUMN: &str = "y";
pub const YEAR_COLUMN: &str = "YEAR";
pub const MONTH_COLUMN: &str = "MONTH";

/// Accepted date layouts for the date column
pub const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y-%m-%d %H:%M:%S"];

/// Output file suffixes appended to normalized location names
pub const COMBINED_SUFFIX: &str = ".combined.csv";
pub const MONTHLY_SUFFIX: &str = ".monthly.csv";
pub const CLIMATOLOGY_SUFFIX: &str = ".climatology.csv";
pub const OBSERVATION_FREQUENCY_SUFFIX: &str = ".observation_frequency.csv";
pub const QC_SUFFIX: &str = ".for_qc.txt";

/// Statistics file names
pub const QUANTILES_FILE: &str = "quantiles.csv";
pub const P95_EVENTS_FILE: &str = "p95_events.csv";
pub const P95_EVENT_SHARE_FILE: &str = "p95_event_share.csv";

/// Prefix applied to joined cyclone-statistics columns
pub const CYCLONE_PREFIX: &str = "CYCLONE_";

/// Reference window for climatologies
pub const REFERENCE_START_YEAR: i32 = 1960;
pub const REFERENCE_END_YEAR: i32 = 1995;

/// Quantile defaults
pub const DEFAULT_PROBABILITIES: [f64; 8] = [0.01, 0.05, 0.25, 0.5, 0.75, 0.95, 0.99, 1.0];
pub const EXTREME_PROBABILITY: f64 = 0.95;

/// Preamble lines before the header in multi-station source files
pub const SOURCE_PREAMBLE_LINES: usize = 2;

/// Locations processed when none are named
pub const DEFAULT_LOCATIONS: [&str; 10] = [
    "cape dyer",
    "resolute bay",
    "eureka",
    "alert",
    "clyde river",
    "cambridge bay",
    "hall beach",
    "sachs harbour",
    "inuvik",
    "pond inlet",
];

/// Raw station filename template; `{id}` is replaced by the climate identifier
pub const DEFAULT_RAW_FILE_TEMPLATE: &str = "{id}.csv";

/// Processing defaults
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB
