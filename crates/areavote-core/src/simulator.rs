//! The simulation driver.
//!
//! [`Simulator`] feeds batches of randomized votes through every rule under
//! test. For each vote it draws one target index and dispatches that same
//! index to every rule, so the rules see an identical vote sequence and any
//! divergence between them comes from their formulas alone.
//!
//! Before each batch the simulator snapshots every rule's pool. Those
//! snapshots are the baseline for [`ReportMode::BatchDelta`] reports.

use rand::Rng;
use tracing::{debug, info, warn};

use areavote_rules::{AllocationRule, PoolHealth, audit_pool, report};
use areavote_types::{PoolSnapshot, ReportMode, RuleReport};

use crate::sampler::draw_index;
use crate::tables::ProbabilityTable;

/// A number of votes to cast with one probability table.
#[derive(Debug, Clone, PartialEq)]
pub struct VoteBatch {
    /// Human-readable label (table name or `"custom"`).
    pub label: String,
    /// Number of votes in the batch.
    pub votes: u32,
    /// Table the target index is drawn from.
    pub table: ProbabilityTable,
}

impl VoteBatch {
    /// Create a batch.
    pub fn new(label: impl Into<String>, votes: u32, table: ProbabilityTable) -> Self {
        Self {
            label: label.into(),
            votes,
            table,
        }
    }
}

/// What happened during one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    /// Position of the batch in the run (0-based).
    pub batch_index: usize,
    /// The batch label.
    pub label: String,
    /// Number of votes cast.
    pub votes: u32,
    /// How many votes were drawn for each index.
    pub hits: Vec<u32>,
}

/// Result of a full run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    /// One summary per batch, in order.
    pub batches: Vec<BatchSummary>,
    /// One final report per rule, in rule order.
    pub reports: Vec<RuleReport>,
    /// Total number of votes cast across all batches.
    pub total_votes: u64,
}

/// Callback invoked after each batch completes.
///
/// Implementations can use this to log progress or capture intermediate
/// state. The callback receives the batch summary and every rule.
pub trait BatchCallback {
    /// Called after a batch completes.
    fn on_batch(&mut self, summary: &BatchSummary, rules: &[AllocationRule]);
}

/// A no-op batch callback.
pub struct NoOpCallback;

impl BatchCallback for NoOpCallback {
    fn on_batch(&mut self, _summary: &BatchSummary, _rules: &[AllocationRule]) {}
}

/// Drives vote batches through a set of rules with an injected generator.
#[derive(Debug)]
pub struct Simulator<R> {
    rules: Vec<AllocationRule>,
    rng: R,
    /// Pool snapshots taken before the most recent batch, one per rule.
    baselines: Vec<PoolSnapshot>,
    votes_cast: u64,
}

impl<R: Rng> Simulator<R> {
    /// Create a simulator over `rules`, drawing randomness from `rng`.
    pub fn new(rules: Vec<AllocationRule>, rng: R) -> Self {
        let baselines = rules.iter().map(AllocationRule::snapshot).collect();
        Self {
            rules,
            rng,
            baselines,
            votes_cast: 0,
        }
    }

    /// The rules under test, in order.
    pub fn rules(&self) -> &[AllocationRule] {
        &self.rules
    }

    /// Total number of votes cast so far.
    pub const fn votes_cast(&self) -> u64 {
        self.votes_cast
    }

    /// Dispatch one vote at `index` to every rule.
    pub fn cast(&mut self, index: usize) {
        for rule in &mut self.rules {
            rule.cast_vote(index);
        }
        self.votes_cast = self.votes_cast.saturating_add(1);
    }

    /// Run one batch: snapshot every rule, then draw and dispatch each vote.
    pub fn run_batch(&mut self, batch_index: usize, batch: &VoteBatch) -> BatchSummary {
        self.baselines = self.rules.iter().map(AllocationRule::snapshot).collect();

        let mut hits = vec![0_u32; batch.table.len().saturating_add(1)];
        for _ in 0..batch.votes {
            let index = draw_index(&batch.table, &mut self.rng);
            if let Some(count) = hits.get_mut(index) {
                *count = count.saturating_add(1);
            }
            self.cast(index);
        }

        debug!(
            batch_index,
            label = %batch.label,
            votes = batch.votes,
            hits = ?hits,
            "Batch complete"
        );

        BatchSummary {
            batch_index,
            label: batch.label.clone(),
            votes: batch.votes,
            hits,
        }
    }

    /// Run every batch in order and report on every rule.
    ///
    /// Each rule's pool is audited after every batch; invariant violations
    /// are logged as warnings.
    pub fn run(
        &mut self,
        batches: &[VoteBatch],
        mode: ReportMode,
        callback: &mut dyn BatchCallback,
    ) -> SimulationResult {
        info!(
            rule_count = self.rules.len(),
            batch_count = batches.len(),
            report_mode = ?mode,
            "Simulation starting"
        );

        let mut summaries = Vec::with_capacity(batches.len());
        for (batch_index, batch) in batches.iter().enumerate() {
            let summary = self.run_batch(batch_index, batch);
            self.warn_on_anomalies(batch_index);
            callback.on_batch(&summary, &self.rules);
            summaries.push(summary);
        }

        SimulationResult {
            batches: summaries,
            reports: self.report(mode),
            total_votes: self.votes_cast,
        }
    }

    /// Report on every rule. Never mutates rule state.
    pub fn report(&self, mode: ReportMode) -> Vec<RuleReport> {
        self.rules
            .iter()
            .enumerate()
            .map(|(rule_index, rule)| {
                report(rule_index, rule, mode, self.baselines.get(rule_index))
            })
            .collect()
    }

    /// Audit every rule's pool.
    pub fn audit(&self) -> Vec<PoolHealth> {
        self.rules.iter().map(|rule| audit_pool(rule.pool())).collect()
    }

    fn warn_on_anomalies(&self, batch_index: usize) {
        for (rule_index, health) in self.audit().iter().enumerate() {
            if let PoolHealth::Anomaly(anomaly) = health {
                warn!(
                    batch_index,
                    rule_index,
                    bad_slots = ?anomaly.bad_slots,
                    drift = anomaly.audit.drift,
                    "{anomaly}"
                );
            }
        }
    }
}
