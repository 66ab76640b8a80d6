//! Command-line entry point for the Areavote allocation simulator.
//!
//! Runs a configured set of allocation rules over a shared randomized vote
//! schedule and prints one report per rule.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing, to stderr)
//! 2. Load configuration from `areavote-config.yaml` (or `AREAVOTE_CONFIG`)
//! 3. Seed the vote generator (configured seed, or a fresh one that is logged)
//! 4. Run every batch through every rule
//! 5. Log the final state and print the reports to stdout

mod error;
mod render;

use std::io::Write as _;
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

use areavote_core::config::{OutputFormat, SimulationConfig};
use areavote_core::runner::{self, TracingCallback};

use crate::error::CliError;

/// Environment variable naming the configuration file.
const CONFIG_ENV: &str = "AREAVOTE_CONFIG";

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "areavote-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration loading, the run, or writing the
/// report fails.
fn main() -> Result<(), CliError> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!("areavote starting");

    // 2. Load configuration.
    let config = load_config()?;

    // 3. Seed the generator.
    let seed = config.simulation.seed.unwrap_or_else(|| rand::rng().random());
    info!(
        seed,
        rules = ?config.rules,
        batch_count = config.batches.len(),
        report_mode = ?config.report.mode,
        "Configuration loaded"
    );
    let rng = StdRng::seed_from_u64(seed);

    // 4. Run.
    let result = runner::run_simulation(&config, rng, &mut TracingCallback)?;
    runner::log_simulation_end(&result);

    // 5. Print.
    let output = match config.report.format {
        OutputFormat::Text => render::render_text(&result.reports),
        OutputFormat::Json => render::render_json(seed, &result)?,
    };
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;

    Ok(())
}

/// Load configuration from `AREAVOTE_CONFIG` or `areavote-config.yaml`.
///
/// A missing file falls back to defaults; environment overrides apply
/// either way.
fn load_config() -> Result<SimulationConfig, CliError> {
    let path = std::env::var_os(CONFIG_ENV)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

    if path.exists() {
        info!(path = %path.display(), "Loading config file");
        Ok(SimulationConfig::from_file(&path)?)
    } else {
        info!(path = %path.display(), "Config file not found, using defaults");
        let mut config = SimulationConfig::default();
        config.apply_env_overrides()?;
        Ok(config)
    }
}
