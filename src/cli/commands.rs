use crate::analyzers::RecordAnalyzer;
use crate::cli::args::{Cli, Commands};
use crate::config::PipelineConfig;
use crate::processors::{
    BatchSummary, MergeOptions, Pipeline, RecipeBuilder, ReferenceWindow,
};
use crate::utils::logging;
use crate::utils::progress::ProgressReporter;
use crate::writers::write_recipes;
use anyhow::{bail, Context, Result};
use tracing::info;

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.verbose, cli.log_file.as_deref()).context("Failed to initialise logging")?;

    let config = PipelineConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?;
    let pipeline = Pipeline::new(config)
        .with_silent(cli.quiet)
        .with_mmap(cli.mmap);

    let summary = match cli.command {
        Commands::Combine {
            locations,
            no_reindex,
        } => {
            let reindex = pipeline.config().merge.reindex && !no_reindex;
            let locations = pipeline.locations(&locations.locations);
            println!("Combining {} locations (reindex: {})", locations.len(), reindex);
            pipeline
                .combine(&locations, MergeOptions { reindex })
                .context("Combine failed")?
        }

        Commands::Monthly { locations } => {
            let locations = pipeline.locations(&locations.locations);
            pipeline
                .monthly(&locations)
                .context("Monthly aggregation failed")?
        }

        Commands::Climatology {
            locations,
            start,
            end,
            no_cyclones,
        } => {
            let configured = pipeline.config().climatology.reference_window()?;
            let window = ReferenceWindow::new(
                start.unwrap_or(configured.start),
                end.unwrap_or(configured.end),
            )?;
            println!("Reference window: {} to {}", window.start, window.end);
            let locations = pipeline.locations(&locations.locations);
            pipeline
                .climatology(&locations, window, !no_cyclones)
                .context("Climatology failed")?
        }

        Commands::Quantiles {
            locations,
            threshold,
            from,
            to,
        } => {
            let threshold = threshold.unwrap_or(pipeline.config().statistics.threshold);
            let locations = pipeline.locations(&locations.locations);
            let summary = pipeline
                .quantiles(&locations, threshold, from, to)
                .context("Quantile extraction failed")?;
            println!("Quantiles written to {}", pipeline.paths().quantiles_path().display());
            summary
        }

        Commands::P95Events {
            locations,
            threshold,
        } => {
            let threshold = threshold.unwrap_or(pipeline.config().statistics.threshold);
            let window = pipeline.config().climatology.reference_window()?;
            let locations = pipeline.locations(&locations.locations);
            let summary = pipeline
                .p95_events(&locations, window, threshold)
                .context("Extreme event counting failed")?;
            println!(
                "Event counts written to {} and {}",
                pipeline.paths().p95_events_path().display(),
                pipeline.paths().p95_event_share_path().display()
            );
            summary
        }

        Commands::Completeness { locations } => {
            let locations = pipeline.locations(&locations.locations);
            let (summary, reports) = pipeline
                .completeness(&locations)
                .context("Completeness analysis failed")?;
            println!("\n{}", RecordAnalyzer::new().generate_summary(&reports));
            summary
        }

        Commands::QcFormat { locations } => {
            let locations = pipeline.locations(&locations.locations);
            pipeline
                .qc_format(&locations)
                .context("QC export failed")?
        }

        Commands::Recipes {
            input_dir,
            output,
            preamble_lines,
        } => {
            let progress = ProgressReporter::new_spinner("Reading source files...", cli.quiet);
            let build = RecipeBuilder::with_preamble_lines(preamble_lines)
                .build(&input_dir)
                .with_context(|| format!("Cannot read sources in {}", input_dir.display()))?;
            write_recipes(&build.recipes, &output)
                .with_context(|| format!("Cannot write {}", output.display()))?;
            progress.finish_with_message(&format!(
                "Wrote {} recipes to {}",
                build.recipes.len(),
                output.display()
            ));

            for (location, entries) in &build.inventory {
                info!("{}: {} stations", location, entries.len());
            }

            let mut summary = BatchSummary::new("recipes");
            summary.succeeded = build.recipes.iter().map(|r| r.location.clone()).collect();
            summary.failed = build
                .skipped
                .iter()
                .map(|(path, reason)| (path.display().to_string(), reason.clone()))
                .collect();
            summary
        }
    };

    println!("\n{}", summary.summary());

    if summary.has_failures() {
        bail!(
            "{} of {} locations failed",
            summary.failed.len(),
            summary.failed.len() + summary.succeeded.len()
        );
    }
    Ok(())
}
