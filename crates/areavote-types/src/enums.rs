//! Enumeration types for rule selection and reporting.

use serde::{Deserialize, Serialize};

/// The allocation formula a rule instance applies to each vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Each vote grants the target project its prior vote count in area.
    ProportionalLinear,
    /// Like [`RuleKind::ProportionalLinear`], but growth is damped once a
    /// project dominates both the leader reference and the pool.
    DampedLeader,
}

impl RuleKind {
    /// Stable lowercase name, matching the configuration spelling.
    pub const fn name(self) -> &'static str {
        match self {
            Self::ProportionalLinear => "proportional_linear",
            Self::DampedLeader => "damped_leader",
        }
    }
}

impl core::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// How per-project deltas are computed when a report is produced.
///
/// Both modes are read-only with respect to the rule being reported on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportMode {
    /// Deltas describe what one more vote for each project would change,
    /// probed on a copy of the rule.
    #[default]
    Marginal,
    /// Deltas compare the current state with the snapshot taken before
    /// the most recent batch.
    BatchDelta,
}
