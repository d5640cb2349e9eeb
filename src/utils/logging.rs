use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::error::Result;

const CRATE_TARGET: &str = "arctic_precip";

/// Initialize tracing based on CLI verbosity level.
///
/// Mapping:
/// - 0 (none) -> warn
/// - 1 (-v)   -> info
/// - 2 (-vv)  -> debug
/// - 3+ (-vvv)-> trace
///
/// `RUST_LOG` env var overrides the CLI flag if set. With `log_file`, output
/// goes to that file instead of stderr.
pub fn init(verbosity: u8, log_file: Option<&Path>) -> Result<()> {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{CRATE_TARGET}={level}")));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    // A subscriber may already be installed (tests, embedding); keep it.
    if installed.is_err() {
        tracing::debug!("tracing subscriber already initialised");
    }
    Ok(())
}
