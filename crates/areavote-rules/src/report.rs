//! Read-only per-project report computation.
//!
//! A report lists, for every slot of a rule's pool, the vote count, the
//! scaled share of the pool, and two deltas: the change in area (`d`) and
//! the change in share (`dA`). What the deltas are measured against
//! depends on the [`ReportMode`]:
//!
//! - [`ReportMode::Marginal`] probes one extra vote per slot on a clone of
//!   the rule, so the deltas describe the marginal value of the next vote.
//!   The clone's pool is restored before every probe but its leader area
//!   is not, so a leader raised by one slot's probe damps the later slots.
//!   The share delta is taken against the *rounded* displayed share.
//! - [`ReportMode::BatchDelta`] compares against a [`PoolSnapshot`] taken
//!   earlier, both shares at full precision.
//!
//! Neither mode mutates the rule being reported on.

use tracing::trace;

use areavote_types::{PoolSnapshot, ProjectStats, ReportMode, RuleReport};

use crate::rule::AllocationRule;

/// Round to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `area / total_area` scaled by `scale`.
///
/// A pool with no area yet reports every share as 0 rather than `NaN`.
pub fn share_of(area: f64, total_area: f64, scale: f64) -> f64 {
    if total_area > 0.0 {
        area / total_area * scale
    } else {
        0.0
    }
}

/// Build a report in the given mode.
///
/// `previous` is only consulted for [`ReportMode::BatchDelta`]; when it is
/// `None` the rule is compared against its own current state and every
/// delta is zero.
pub fn report(
    rule_index: usize,
    rule: &AllocationRule,
    mode: ReportMode,
    previous: Option<&PoolSnapshot>,
) -> RuleReport {
    match mode {
        ReportMode::Marginal => marginal_report(rule_index, rule),
        ReportMode::BatchDelta => previous.map_or_else(
            || delta_report(rule_index, rule, &rule.snapshot()),
            |snapshot| delta_report(rule_index, rule, snapshot),
        ),
    }
}

/// Report the marginal effect of one more vote for each project.
pub fn marginal_report(rule_index: usize, rule: &AllocationRule) -> RuleReport {
    let pool = rule.pool();
    let scale = rule.params().share_scale;
    let total = pool.total_area();
    let mut probe = rule.clone();

    let projects = pool
        .projects()
        .iter()
        .enumerate()
        .map(|(slot, project)| {
            let share = round2(share_of(project.area, total, scale));

            probe.restore_pool(pool);
            let outcome = probe.cast_vote(slot);
            let probed_area = probe
                .project(outcome.slot)
                .map_or(project.area, |p| p.area);
            let probed_share = share_of(probed_area, probe.pool().total_area(), scale);

            trace!(
                rule_index,
                slot,
                added = outcome.added,
                damping = outcome.damping,
                "marginal probe"
            );

            ProjectStats {
                slot: slot.saturating_add(1),
                votes: project.votes,
                area: project.area,
                share,
                share_delta: round2(probed_share - share),
                area_delta: round2(probed_area - project.area),
            }
        })
        .collect();

    finish(rule_index, rule, projects)
}

/// Report the change of every project since `previous` was captured.
///
/// Slots missing from `previous` are treated as empty projects.
pub fn delta_report(
    rule_index: usize,
    rule: &AllocationRule,
    previous: &PoolSnapshot,
) -> RuleReport {
    let pool = rule.pool();
    let scale = rule.params().share_scale;
    let total = pool.total_area();

    let projects = pool
        .projects()
        .iter()
        .enumerate()
        .map(|(slot, project)| {
            let before = previous.projects.get(slot).copied().unwrap_or_default();
            let share_now = share_of(project.area, total, scale);
            let share_before = share_of(before.area, previous.total_area, scale);

            ProjectStats {
                slot: slot.saturating_add(1),
                votes: project.votes,
                area: project.area,
                share: round2(share_now),
                share_delta: round2(share_now - share_before),
                area_delta: round2(project.area - before.area),
            }
        })
        .collect();

    finish(rule_index, rule, projects)
}

fn finish(rule_index: usize, rule: &AllocationRule, projects: Vec<ProjectStats>) -> RuleReport {
    let pool = rule.pool();
    RuleReport {
        rule_index,
        kind: rule.kind(),
        total_area: pool.total_area(),
        drift: pool.total_area() - pool.summed_area(),
        leader_area: rule.leader_area(),
        projects,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::rule::damping_factor;

    const EPS: f64 = 1e-9;

    fn stats(report: &RuleReport, slot: usize) -> &ProjectStats {
        report.projects.get(slot).unwrap()
    }

    #[test]
    fn round2_behaves_like_fixed_two() {
        assert!((round2(1.234) - 1.23).abs() < EPS);
        assert!((round2(1.235_1) - 1.24).abs() < EPS);
        assert!((round2(-0.004) - 0.0).abs() < EPS);
        assert!((round2(2500.0) - 2500.0).abs() < EPS);
    }

    #[test]
    fn share_of_empty_pool_is_zero() {
        assert!(share_of(0.0, 0.0, 10000.0).abs() < EPS);
        assert!(!share_of(0.0, 0.0, 10000.0).is_nan());
    }

    #[test]
    fn share_uses_ten_thousand_scale() {
        assert!((share_of(1.0, 4.0, 10000.0) - 2500.0).abs() < EPS);
    }

    #[test]
    fn marginal_report_is_read_only() {
        let mut rule = AllocationRule::damped_leader();
        for n in 0..40_usize {
            rule.cast_vote(n % 4);
        }
        let before = rule.clone();
        let report = marginal_report(1, &rule);
        assert_eq!(rule, before);
        assert_eq!(report.rule_index, 1);
        assert_eq!(report.projects.len(), 10);
    }

    #[test]
    fn marginal_report_probes_next_vote() {
        let mut rule = AllocationRule::proportional_linear();
        // Slot 0: 3 votes, area 0 + 1 + 2 = 3. Slot 1: 2 votes, area 1.
        for target in [0, 0, 0, 1, 1] {
            rule.cast_vote(target);
        }
        let report = marginal_report(0, &rule);

        let first = stats(&report, 0);
        assert_eq!(first.slot, 1);
        assert_eq!(first.votes, 3);
        assert!((first.share - 7500.0).abs() < EPS);
        // Next vote grants 3: area 6 of 7.
        assert!((first.area_delta - 3.0).abs() < EPS);
        assert!((first.share_delta - round2(6.0 / 7.0 * 10000.0 - 7500.0)).abs() < EPS);

        let empty = stats(&report, 5);
        assert_eq!(empty.votes, 0);
        assert!(empty.area_delta.abs() < EPS);
        assert!(empty.share_delta.abs() < EPS);
    }

    #[test]
    fn marginal_probe_carries_raised_leader_to_later_slots() {
        let mut rule = AllocationRule::damped_leader();
        for _ in 0..400 {
            rule.cast_vote(0);
        }
        for _ in 0..120 {
            rule.cast_vote(1);
        }
        let pool = rule.pool().clone();
        let first = *pool.project(0).unwrap();
        let second = *pool.project(1).unwrap();
        let total = pool.total_area();
        let threshold = rule.params().dominance_threshold;
        let leader = rule.leader_area().unwrap();
        assert!(second.area > threshold);
        assert!((leader - first.area).abs() < EPS);

        // Probing slot 0 grows the leader beyond its stored value.
        let k0 = damping_factor(first.area, leader, total, threshold);
        let raised = leader.max(first.area + f64::from(first.votes) * (1.0 - k0).powi(2));
        assert!(raised > leader);

        // Slot 1 is then damped against the raised leader.
        let k1 = damping_factor(second.area, raised, total, threshold);
        let expected = f64::from(second.votes) * (1.0 - k1).powi(2);

        let report = marginal_report(0, &rule);
        let area_delta = stats(&report, 1).area_delta;
        assert!((area_delta - expected).abs() <= 0.005 + EPS, "{area_delta} vs {expected}");
        assert_eq!(rule.leader_area(), Some(leader));
    }

    #[test]
    fn marginal_report_on_empty_pool_has_no_nan() {
        let report = marginal_report(0, &AllocationRule::damped_leader());
        for p in &report.projects {
            assert!(!p.share.is_nan());
            assert!(!p.share_delta.is_nan());
            assert!(!p.area_delta.is_nan());
        }
    }

    #[test]
    fn delta_report_compares_against_snapshot() {
        let mut rule = AllocationRule::proportional_linear();
        rule.cast_vote(0);
        rule.cast_vote(0);
        let snapshot = rule.snapshot();
        rule.cast_vote(0);
        rule.cast_vote(2);
        rule.cast_vote(2);

        let report = delta_report(0, &rule, &snapshot);
        let first = stats(&report, 0);
        assert_eq!(first.votes, 3);
        assert!((first.area_delta - 2.0).abs() < EPS);
        // Share went from 10000 (1 of 1) to 7500 (3 of 4).
        assert!((first.share_delta + 2500.0).abs() < EPS);

        let third = stats(&report, 2);
        assert!((third.area_delta - 1.0).abs() < EPS);
        assert!((third.share_delta - 2500.0).abs() < EPS);
    }

    #[test]
    fn batch_delta_without_snapshot_is_all_zero() {
        let mut rule = AllocationRule::proportional_linear();
        for _ in 0..5 {
            rule.cast_vote(1);
        }
        let report = report(0, &rule, ReportMode::BatchDelta, None);
        assert!(report.projects.iter().all(|p| p.area_delta.abs() < EPS));
        assert!(report.projects.iter().all(|p| p.share_delta.abs() < EPS));
    }

    #[test]
    fn report_carries_rule_metadata() {
        let mut rule = AllocationRule::damped_leader();
        rule.cast_vote(0);
        rule.cast_vote(0);
        let report = report(3, &rule, ReportMode::Marginal, None);
        assert_eq!(report.kind, areavote_types::RuleKind::DampedLeader);
        assert_eq!(report.leader_area, Some(1.0));
        assert!((report.total_area - 1.0).abs() < EPS);
        assert!(report.drift.abs() < EPS);
    }
}
