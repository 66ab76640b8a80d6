//! Console and JSON rendering of simulation results.
//!
//! The text layout prints one block per rule:
//!
//! ```text
//! RULES 1 ===================================
//! P1: 	123 votes  	4567.89 areas  	1.23 dA  	122 d
//! ```
//!
//! `areas` and `dA` always show two decimals; `d` is printed at its
//! rounded value without padding.

use serde::Serialize;

use areavote_core::simulator::{BatchSummary, SimulationResult};
use areavote_types::RuleReport;

/// Render every rule report in the tab-separated console layout.
pub fn render_text(reports: &[RuleReport]) -> String {
    let mut out = String::new();
    for report in reports {
        out.push_str(&format!(
            "RULES {} ===================================\n",
            report.rule_index.saturating_add(1)
        ));
        for p in &report.projects {
            out.push_str(&format!(
                "P{}: \t{} votes  \t{:.2} areas  \t{:.2} dA  \t{} d\n",
                p.slot,
                p.votes,
                p.share,
                p.share_delta,
                // Collapse -0 so it prints as 0.
                p.area_delta + 0.0,
            ));
        }
        out.push('\n');
    }
    out
}

#[derive(Serialize)]
struct BatchOutput<'a> {
    batch_index: usize,
    label: &'a str,
    votes: u32,
    hits: &'a [u32],
}

impl<'a> From<&'a BatchSummary> for BatchOutput<'a> {
    fn from(summary: &'a BatchSummary) -> Self {
        Self {
            batch_index: summary.batch_index,
            label: &summary.label,
            votes: summary.votes,
            hits: &summary.hits,
        }
    }
}

#[derive(Serialize)]
struct RunOutput<'a> {
    seed: u64,
    total_votes: u64,
    batches: Vec<BatchOutput<'a>>,
    reports: &'a [RuleReport],
}

/// Render the full result, including the seed, as pretty-printed JSON.
pub fn render_json(seed: u64, result: &SimulationResult) -> Result<String, serde_json::Error> {
    let output = RunOutput {
        seed,
        total_votes: result.total_votes,
        batches: result.batches.iter().map(BatchOutput::from).collect(),
        reports: &result.reports,
    };
    let mut json = serde_json::to_string_pretty(&output)?;
    json.push('\n');
    Ok(json)
}
