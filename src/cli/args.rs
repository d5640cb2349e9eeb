use crate::models::YearMonth;
use crate::utils::constants::SOURCE_PREAMBLE_LINES;
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "arctic-precip")]
#[command(about = "Canadian Arctic station precipitation pipeline")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Configuration file (TOML)")]
    pub config: Option<PathBuf>,

    #[arg(
        short,
        long,
        global = true,
        action = ArgAction::Count,
        help = "Increase logging verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Hide progress bars")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Memory-map raw and combined files when reading")]
    pub mmap: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct LocationArgs {
    /// Location to process; repeat for several [default: all configured]
    #[arg(short, long = "location")]
    pub locations: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge raw station segments into combined daily records
    Combine {
        #[command(flatten)]
        locations: LocationArgs,

        #[arg(long, help = "Report calendar gaps without filling them")]
        no_reindex: bool,
    },

    /// Aggregate combined records to completeness-gated monthly values
    Monthly {
        #[command(flatten)]
        locations: LocationArgs,
    },

    /// Build twelve-month climatologies from monthly files
    Climatology {
        #[command(flatten)]
        locations: LocationArgs,

        #[arg(long, help = "First month of the reference window (YYYY-MM)")]
        start: Option<YearMonth>,

        #[arg(long, help = "Last month of the reference window (YYYY-MM)")]
        end: Option<YearMonth>,

        #[arg(long, help = "Skip the cyclone statistics join")]
        no_cyclones: bool,
    },

    /// Empirical precipitation quantiles per location
    Quantiles {
        #[command(flatten)]
        locations: LocationArgs,

        #[arg(long, help = "Only values above this amount (mm) count")]
        threshold: Option<f64>,

        #[arg(long, help = "First date considered (YYYY-MM-DD)")]
        from: Option<NaiveDate>,

        #[arg(long, help = "Last date considered (YYYY-MM-DD)")]
        to: Option<NaiveDate>,
    },

    /// Monthly counts of days above the 95th percentile
    P95Events {
        #[command(flatten)]
        locations: LocationArgs,

        #[arg(long, help = "Only values above this amount (mm) count")]
        threshold: Option<f64>,
    },

    /// Missing-data summary and monthly observation frequency
    Completeness {
        #[command(flatten)]
        locations: LocationArgs,
    },

    /// Fixed-width text files for manual quality control
    QcFormat {
        #[command(flatten)]
        locations: LocationArgs,
    },

    /// Derive merge recipes from multi-station source files
    Recipes {
        #[arg(short, long, help = "Directory of multi-station source CSVs")]
        input_dir: PathBuf,

        #[arg(short, long, help = "Recipe JSON to write")]
        output: PathBuf,

        #[arg(long, default_value_t = SOURCE_PREAMBLE_LINES)]
        preamble_lines: usize,
    },
}
