//! Rule parameters: slot count and the constants the formulas depend on.
//!
//! Every field defaults to the named constant in `areavote_types`, so an
//! empty `parameters:` section in the configuration reproduces the
//! reference behavior exactly.

use serde::{Deserialize, Serialize};

use areavote_types::{DOMINANCE_THRESHOLD, INITIAL_LEADER_AREA, SHARE_SCALE, SLOT_COUNT};

use crate::RuleError;

/// Tunable constants shared by every rule variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleParams {
    /// Number of project slots per pool.
    #[serde(default = "default_slot_count")]
    pub slot_count: usize,

    /// Area above which the damped-leader rule starts damping.
    #[serde(default = "default_dominance_threshold")]
    pub dominance_threshold: f64,

    /// Starting value of the damped-leader running maximum.
    #[serde(default = "default_initial_leader_area")]
    pub initial_leader_area: f64,

    /// Scaling applied to shares in reports.
    #[serde(default = "default_share_scale")]
    pub share_scale: f64,
}

impl Default for RuleParams {
    fn default() -> Self {
        Self {
            slot_count: default_slot_count(),
            dominance_threshold: default_dominance_threshold(),
            initial_leader_area: default_initial_leader_area(),
            share_scale: default_share_scale(),
        }
    }
}

impl RuleParams {
    /// Check every field against its valid range.
    ///
    /// The leader area must stay strictly positive because it divides the
    /// threshold excess in the damping factor.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::InvalidParams`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), RuleError> {
        if self.slot_count == 0 {
            return Err(invalid("slot_count", "must be at least 1".to_owned()));
        }
        if !self.dominance_threshold.is_finite() || self.dominance_threshold < 0.0 {
            return Err(invalid(
                "dominance_threshold",
                format!("must be finite and non-negative, got {}", self.dominance_threshold),
            ));
        }
        if !self.initial_leader_area.is_finite() || self.initial_leader_area <= 0.0 {
            return Err(invalid(
                "initial_leader_area",
                format!("must be finite and positive, got {}", self.initial_leader_area),
            ));
        }
        if !self.share_scale.is_finite() || self.share_scale <= 0.0 {
            return Err(invalid(
                "share_scale",
                format!("must be finite and positive, got {}", self.share_scale),
            ));
        }
        Ok(())
    }
}

const fn invalid(field: &'static str, reason: String) -> RuleError {
    RuleError::InvalidParams { field, reason }
}

const fn default_slot_count() -> usize {
    SLOT_COUNT
}

const fn default_dominance_threshold() -> f64 {
    DOMINANCE_THRESHOLD
}

const fn default_initial_leader_area() -> f64 {
    INITIAL_LEADER_AREA
}

const fn default_share_scale() -> f64 {
    SHARE_SCALE
}
