//! Config-driven run orchestration.
//!
//! [`run_simulation`] turns a [`SimulationConfig`] into rules and batches,
//! runs them through a [`Simulator`], and returns the result. The caller
//! owns the generator so that it decides how the run is seeded.

use rand::Rng;
use tracing::info;

use areavote_rules::AllocationRule;

use crate::config::{ConfigError, SimulationConfig};
use crate::simulator::{BatchCallback, BatchSummary, SimulationResult, Simulator};

/// Errors that can occur during a configured run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The configuration could not be resolved into rules and batches.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },
}

/// Batch callback that logs a one-line progress event per batch.
#[derive(Debug, Default)]
pub struct TracingCallback;

impl BatchCallback for TracingCallback {
    fn on_batch(&mut self, summary: &BatchSummary, rules: &[AllocationRule]) {
        let totals: Vec<f64> = rules.iter().map(|r| r.pool().total_area()).collect();
        info!(
            batch_index = summary.batch_index,
            label = %summary.label,
            votes = summary.votes,
            total_areas = ?totals,
            "Batch finished"
        );
    }
}

/// Build rules and batches from `config` and run them with `rng`.
///
/// # Errors
///
/// Returns [`RunnerError::Config`] if the rules or batches are invalid.
/// The run itself cannot fail.
pub fn run_simulation<R: Rng>(
    config: &SimulationConfig,
    rng: R,
    callback: &mut dyn BatchCallback,
) -> Result<SimulationResult, RunnerError> {
    let rules = config.build_rules()?;
    let batches = config.build_batches()?;

    let mut simulator = Simulator::new(rules, rng);
    Ok(simulator.run(&batches, config.report.mode, callback))
}

/// Log the end-of-run summary for every rule.
pub fn log_simulation_end(result: &SimulationResult) {
    for report in &result.reports {
        let leader_slot = report
            .projects
            .iter()
            .max_by(|a, b| a.area.total_cmp(&b.area))
            .map(|p| p.slot);
        info!(
            rule_index = report.rule_index,
            kind = %report.kind,
            total_area = report.total_area,
            drift = report.drift,
            leader_area = ?report.leader_area,
            leader_slot = ?leader_slot,
            "Rule final state"
        );
    }
    info!(
        batches = result.batches.len(),
        total_votes = result.total_votes,
        "Simulation ended"
    );
}
