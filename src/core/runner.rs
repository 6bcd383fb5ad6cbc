//! Application runner logic
//!
//! Turns parsed CLI arguments into a configured pipeline run.

use crate::codec::SfntCodec;
use crate::core::cli::CliArgs;
use crate::core::config::SplitConfig;
use crate::core::config_file::ConfigFile;
use crate::logging::{self, LogOptions};
use crate::output::format_size;
use crate::pipeline::{run_pipeline, PipelineOutcome};
use anyhow::{Context, Result};
use tracing::debug;

/// Run fontsplit with the given CLI arguments.
/// Handles special CLI flags and delegates to the pipeline.
pub fn run_app(cli_args: CliArgs) -> Result<()> {
    if cli_args.init_config {
        return ConfigFile::initialize_config_directory()
            .context("Failed to initialize config directory");
    }

    let _guard = logging::init(LogOptions {
        verbosity: cli_args.verbose,
        quiet: cli_args.quiet,
        log_file: cli_args.log_file,
    })?;

    cli_args.validate().map_err(anyhow::Error::msg)?;

    let settings = match &cli_args.config {
        Some(path) => Some(ConfigFile::load_from(path)?),
        None => ConfigFile::load(),
    };
    let config = SplitConfig::resolve(&cli_args, settings)?;
    debug!("Run configuration: {:?}", config);

    let priority = config
        .priority
        .load()
        .context("Failed to load the priority list")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;
    let outcome = runtime.block_on(run_pipeline(&config, &SfntCodec, &priority))?;

    print_summary(&outcome);
    Ok(())
}

fn print_summary(outcome: &PipelineOutcome) {
    println!(
        "Split {} into {} chunks ({}) in {} ms",
        outcome.metadata.get_display_name(),
        outcome.artifacts.len(),
        format_size(outcome.persisted.total_bytes),
        outcome.total_duration().as_millis()
    );
    println!("  stylesheet: {}", outcome.stylesheet.display());
    if let Some(preview) = &outcome.preview {
        println!("  preview:    {}", preview.display());
    }
    if let Some(report) = &outcome.report {
        println!("  report:     {}", report.display());
    }
}
