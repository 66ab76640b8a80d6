//! Allocation rule engine for the Areavote simulator.
//!
//! A rule instance owns one [`Pool`] of project slots and decides how much
//! area each incoming vote grants to its target project. Two formulas are
//! provided, selected by [`RuleKind`]:
//!
//! | Kind | Area granted per vote |
//! |------|-----------------------|
//! | `ProportionalLinear` | the project's prior vote count |
//! | `DampedLeader` | prior vote count scaled by `(1 - k)^2` |
//!
//! where `k` grows toward 1 as a project both exceeds the dominance
//! threshold relative to the running leader area and holds a large
//! fraction of the pool.
//!
//! # Modules
//!
//! - [`params`] -- [`RuleParams`]: slot count and formula constants.
//! - [`rule`] -- [`AllocationRule`]: the vote operation and rule state.
//! - [`audit`] -- Pool invariant checks and drift measurement.
//! - [`report`] -- Read-only per-project report computation.
//!
//! # Usage
//!
//! ```
//! use areavote_rules::AllocationRule;
//!
//! let mut rule = AllocationRule::proportional_linear();
//! rule.cast_vote(0);
//! let outcome = rule.cast_vote(0);
//! assert_eq!(outcome.slot, 0);
//! assert!((rule.pool().total_area() - 1.0).abs() < 1e-12);
//! ```
//!
//! [`Pool`]: areavote_types::Pool
//! [`RuleKind`]: areavote_types::RuleKind

pub mod audit;
pub mod params;
pub mod report;
pub mod rule;

// Re-export primary types at crate root.
pub use audit::{PoolAnomaly, PoolAudit, PoolHealth, audit_pool};
pub use params::RuleParams;
pub use report::{delta_report, marginal_report, report};
pub use rule::{AllocationRule, VoteOutcome};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when constructing a rule instance.
///
/// Casting a vote never fails; only parameter validation does.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// A rule parameter is out of its valid range.
    #[error("invalid rule parameter `{field}`: {reason}")]
    InvalidParams {
        /// The offending parameter name.
        field: &'static str,
        /// Explanation of what is wrong with the value.
        reason: String,
    },
}
