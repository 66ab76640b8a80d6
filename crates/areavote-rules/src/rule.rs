//! The allocation rule: one pool plus the formula that feeds it.
//!
//! [`AllocationRule`] is a single struct whose formula is selected by an
//! internal variant. Each variant carries its own auxiliary state (only the
//! damped-leader formula needs a running leader area), and every vote goes
//! through the same [`AllocationRule::cast_vote`] entry point.
//!
//! # Vote semantics
//!
//! For a vote targeting slot `i`:
//!
//! 1. `i` is saturated into `[0, slot_count)`.
//! 2. `added` is computed from the project's state *before* the vote.
//! 3. The project gains one vote and `added` area; the pool total gains
//!    `added`.
//!
//! Damped-leader formula:
//!
//! ```text
//! k     = clamp((area - threshold) / leader, 0, 1) * area / max(1, total)
//! added = votes * (1 - k)^2
//! ```
//!
//! The `max(1, total)` guard and the positive initial leader area keep
//! the first vote on an empty pool free of `0 / 0`.

use areavote_types::{MIN_TOTAL_AREA_DIVISOR, Pool, PoolSnapshot, Project, RuleKind};

use crate::{RuleError, RuleParams};

/// Formula-specific state.
#[derive(Debug, Clone, Copy, PartialEq)]
enum RuleVariant {
    ProportionalLinear,
    DampedLeader {
        /// Running maximum project area ("top").
        leader_area: f64,
    },
}

impl RuleVariant {
    const fn new(kind: RuleKind, params: &RuleParams) -> Self {
        match kind {
            RuleKind::ProportionalLinear => Self::ProportionalLinear,
            RuleKind::DampedLeader => Self::DampedLeader {
                leader_area: params.initial_leader_area,
            },
        }
    }

    const fn kind(self) -> RuleKind {
        match self {
            Self::ProportionalLinear => RuleKind::ProportionalLinear,
            Self::DampedLeader { .. } => RuleKind::DampedLeader,
        }
    }
}

/// What a single vote did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoteOutcome {
    /// The slot the vote landed on after saturation.
    pub slot: usize,
    /// Area granted to the project and the pool.
    pub added: f64,
    /// Damping factor `k` applied to this vote (always 0 for the linear rule).
    pub damping: f64,
}

/// A rule instance: the pool it owns and the formula it applies.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationRule {
    variant: RuleVariant,
    pool: Pool,
    params: RuleParams,
}

impl AllocationRule {
    /// Create a rule of the given kind with an empty pool.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::InvalidParams`] if `params` fails validation.
    pub fn new(kind: RuleKind, params: RuleParams) -> Result<Self, RuleError> {
        params.validate()?;
        Ok(Self {
            variant: RuleVariant::new(kind, &params),
            pool: Pool::new(params.slot_count),
            params,
        })
    }

    /// Proportional-linear rule with default parameters.
    pub fn proportional_linear() -> Self {
        Self::with_defaults(RuleKind::ProportionalLinear)
    }

    /// Damped-leader rule with default parameters.
    pub fn damped_leader() -> Self {
        Self::with_defaults(RuleKind::DampedLeader)
    }

    fn with_defaults(kind: RuleKind) -> Self {
        let params = RuleParams::default();
        Self {
            variant: RuleVariant::new(kind, &params),
            pool: Pool::new(params.slot_count),
            params,
        }
    }

    /// Which formula this rule applies.
    pub const fn kind(&self) -> RuleKind {
        self.variant.kind()
    }

    /// Parameters the rule was built with.
    pub const fn params(&self) -> &RuleParams {
        &self.params
    }

    /// The pool owned by this rule.
    pub const fn pool(&self) -> &Pool {
        &self.pool
    }

    /// The project at `slot`, if it exists.
    pub fn project(&self, slot: usize) -> Option<&Project> {
        self.pool.project(slot)
    }

    /// Running leader area, for rules that track one.
    pub const fn leader_area(&self) -> Option<f64> {
        match self.variant {
            RuleVariant::ProportionalLinear => None,
            RuleVariant::DampedLeader { leader_area } => Some(leader_area),
        }
    }

    /// Capture the pool state for later comparison.
    pub fn snapshot(&self) -> PoolSnapshot {
        self.pool.snapshot()
    }

    /// Overwrite the pool with `pool`, leaving the variant state as is.
    pub(crate) fn restore_pool(&mut self, pool: &Pool) {
        self.pool.clone_from(pool);
    }

    /// Return the rule to its freshly constructed state.
    pub fn reset(&mut self) {
        self.pool.clear();
        self.variant = RuleVariant::new(self.kind(), &self.params);
    }

    /// Apply one vote targeting `target`.
    ///
    /// Targets at or past the last slot are folded into the last slot.
    /// The operation is total: it never fails and never produces negative
    /// area.
    pub fn cast_vote(&mut self, target: usize) -> VoteOutcome {
        let slot = self.pool.saturate(target);
        let before = self.pool.project(slot).copied().unwrap_or_default();
        let prior_votes = f64::from(before.votes);

        let (added, damping) = match self.variant {
            RuleVariant::ProportionalLinear => (prior_votes, 0.0),
            RuleVariant::DampedLeader { leader_area } => {
                let k = damping_factor(
                    before.area,
                    leader_area,
                    self.pool.total_area(),
                    self.params.dominance_threshold,
                );
                (prior_votes * (1.0 - k).powi(2), k)
            }
        };

        let after = self.pool.credit(slot, added);

        if let (RuleVariant::DampedLeader { leader_area }, Some(project)) =
            (&mut self.variant, after)
        {
            *leader_area = leader_area.max(project.area);
        }

        VoteOutcome {
            slot,
            added,
            damping,
        }
    }
}

/// Damping factor `k` for a project holding `area` of a pool with
/// `total_area`, against the running `leader_area`.
///
/// Returns 0 while the project is at or below `threshold`.
pub fn damping_factor(area: f64, leader_area: f64, total_area: f64, threshold: f64) -> f64 {
    let dominance = ((area - threshold) / leader_area).clamp(0.0, 1.0);
    dominance * area / total_area.max(MIN_TOTAL_AREA_DIVISOR)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn area_of(rule: &AllocationRule, slot: usize) -> f64 {
        rule.project(slot).map_or(f64::NAN, |p| p.area)
    }

    fn votes_of(rule: &AllocationRule, slot: usize) -> u32 {
        rule.project(slot).map_or(u32::MAX, |p| p.votes)
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    #[test]
    fn new_rule_has_ten_empty_slots() {
        for rule in [AllocationRule::proportional_linear(), AllocationRule::damped_leader()] {
            assert_eq!(rule.pool().slot_count(), 10);
            assert!(rule.pool().total_area().abs() < EPS);
            assert!(rule.pool().projects().iter().all(|p| p.votes == 0));
        }
    }

    #[test]
    fn leader_area_only_for_damped_rule() {
        assert_eq!(AllocationRule::proportional_linear().leader_area(), None);
        assert_eq!(AllocationRule::damped_leader().leader_area(), Some(1.0));
    }

    #[test]
    fn invalid_params_rejected() {
        let params = RuleParams {
            slot_count: 0,
            ..RuleParams::default()
        };
        assert!(AllocationRule::new(RuleKind::DampedLeader, params).is_err());
    }

    // -----------------------------------------------------------------------
    // Proportional-linear
    // -----------------------------------------------------------------------

    #[test]
    fn linear_first_vote_grants_nothing() {
        let mut rule = AllocationRule::proportional_linear();
        let outcome = rule.cast_vote(0);
        assert_eq!(outcome.slot, 0);
        assert!(outcome.added.abs() < EPS);
        assert_eq!(votes_of(&rule, 0), 1);
        assert!(area_of(&rule, 0).abs() < EPS);
        assert!(rule.pool().total_area().abs() < EPS);
    }

    #[test]
    fn linear_second_vote_grants_one() {
        let mut rule = AllocationRule::proportional_linear();
        rule.cast_vote(0);
        let outcome = rule.cast_vote(0);
        assert!((outcome.added - 1.0).abs() < EPS);
        assert_eq!(votes_of(&rule, 0), 2);
        assert!((area_of(&rule, 0) - 1.0).abs() < EPS);
        assert!((rule.pool().total_area() - 1.0).abs() < EPS);
    }

    #[test]
    fn linear_added_equals_prior_votes() {
        let mut rule = AllocationRule::proportional_linear();
        for n in 0..50_u32 {
            let before = area_of(&rule, 2);
            let outcome = rule.cast_vote(2);
            assert!((outcome.added - f64::from(n)).abs() < EPS);
            if n > 0 {
                assert!(area_of(&rule, 2) > before);
            }
        }
        // 0 + 1 + ... + 49
        assert!((area_of(&rule, 2) - 1225.0).abs() < EPS);
    }

    #[test]
    fn out_of_range_targets_saturate() {
        let mut a = AllocationRule::proportional_linear();
        let mut b = AllocationRule::proportional_linear();
        for target in [10, 11, 500, usize::MAX] {
            let oa = a.cast_vote(target);
            let ob = b.cast_vote(9);
            assert_eq!(oa.slot, 9);
            assert_eq!(oa, ob);
        }
        assert_eq!(a, b);
    }

    #[test]
    fn damped_rule_saturates_too() {
        let mut a = AllocationRule::damped_leader();
        let mut b = AllocationRule::damped_leader();
        for _ in 0..20 {
            a.cast_vote(42);
            b.cast_vote(9);
        }
        assert_eq!(a, b);
    }

    // -----------------------------------------------------------------------
    // Damped-leader
    // -----------------------------------------------------------------------

    #[test]
    fn damped_first_vote_grants_nothing() {
        let mut rule = AllocationRule::damped_leader();
        let outcome = rule.cast_vote(0);
        assert!(outcome.damping.abs() < EPS);
        assert!(outcome.added.abs() < EPS);
        assert_eq!(votes_of(&rule, 0), 1);
        assert!(rule.pool().total_area().abs() < EPS);
        assert_eq!(rule.leader_area(), Some(1.0));
    }

    #[test]
    fn damped_matches_linear_below_threshold() {
        let mut linear = AllocationRule::proportional_linear();
        let mut damped = AllocationRule::damped_leader();
        // 0 + 1 + ... + 99 = 4950, still under the threshold.
        for _ in 0..100 {
            let a = linear.cast_vote(0);
            let b = damped.cast_vote(0);
            assert!((a.added - b.added).abs() < EPS);
            assert!(b.damping.abs() < EPS);
        }
        assert!((area_of(&damped, 0) - 4950.0).abs() < EPS);
    }

    #[test]
    fn damping_kicks_in_above_threshold() {
        let mut rule = AllocationRule::damped_leader();
        let mut damped_once = false;
        for _ in 0..200 {
            let outcome = rule.cast_vote(0);
            let prior = f64::from(votes_of(&rule, 0).saturating_sub(1));
            assert!(outcome.damping >= 0.0);
            assert!(outcome.damping <= 1.0 + EPS);
            assert!(outcome.added >= 0.0);
            assert!(outcome.added <= prior + EPS);
            if outcome.damping > 0.0 {
                damped_once = true;
            }
        }
        assert!(damped_once);
    }

    #[test]
    fn leader_tracks_maximum_area() {
        let mut rule = AllocationRule::damped_leader();
        let mut last_leader = rule.leader_area().unwrap_or(f64::NAN);
        for n in 0..300_usize {
            let target = if n % 3 == 0 { 1 } else { 4 };
            let outcome = rule.cast_vote(target);
            let leader = rule.leader_area().unwrap_or(f64::NAN);
            assert!(leader >= area_of(&rule, outcome.slot));
            assert!(leader >= last_leader);
            last_leader = leader;
        }
    }

    #[test]
    fn damping_factor_guards_empty_pool() {
        let k = damping_factor(0.0, 1.0, 0.0, 5000.0);
        assert!(k.abs() < EPS);
        assert!(!k.is_nan());
    }

    #[test]
    fn damping_factor_saturates_at_full_dominance() {
        // Project far above the threshold and holding the entire pool.
        let k = damping_factor(20_000.0, 10_000.0, 20_000.0, 5000.0);
        assert!((k - 1.0).abs() < EPS);
    }

    // -----------------------------------------------------------------------
    // Reset
    // -----------------------------------------------------------------------

    #[test]
    fn restore_pool_keeps_leader() {
        let mut rule = AllocationRule::damped_leader();
        let empty = rule.pool().clone();
        for _ in 0..150 {
            rule.cast_vote(3);
        }
        let leader = rule.leader_area();
        rule.restore_pool(&empty);
        assert_eq!(rule.pool(), &empty);
        assert_eq!(rule.leader_area(), leader);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut rule = AllocationRule::damped_leader();
        for _ in 0..150 {
            rule.cast_vote(3);
        }
        rule.reset();
        assert_eq!(rule, AllocationRule::damped_leader());
    }
}
