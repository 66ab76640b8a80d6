//! Core state structs: projects, the shared pool, and report records.
//!
//! A [`Pool`] owns a fixed number of [`Project`] slots created at
//! construction. Projects are only mutated through [`Pool::credit`], which
//! applies one vote and the area it was granted. Everything else in this
//! module is a read-only view.

use serde::{Deserialize, Serialize};

use crate::enums::RuleKind;

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// Accumulated votes and area for one participant slot.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Project {
    /// Number of votes cast for this project so far.
    pub votes: u32,
    /// Share of the pool currently attributed to this project.
    pub area: f64,
}

// ---------------------------------------------------------------------------
// Pool
// ---------------------------------------------------------------------------

/// The shared aggregate area across all projects under one rule instance.
///
/// `total_area` tracks the running sum of every area grant. It is meant to
/// approximate the sum of the project areas; floating-point drift between
/// the two is accepted and reported, never corrected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    /// Project slots, indexed from 0.
    projects: Vec<Project>,
    /// Running total of all granted area.
    total_area: f64,
}

impl Pool {
    /// Create a pool with `slot_count` empty projects.
    pub fn new(slot_count: usize) -> Self {
        Self {
            projects: vec![Project::default(); slot_count],
            total_area: 0.0,
        }
    }

    /// Number of project slots.
    pub const fn slot_count(&self) -> usize {
        self.projects.len()
    }

    /// Running total of all granted area.
    pub const fn total_area(&self) -> f64 {
        self.total_area
    }

    /// All project slots in index order.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// The project at `slot`, if it exists.
    pub fn project(&self, slot: usize) -> Option<&Project> {
        self.projects.get(slot)
    }

    /// Fold an arbitrary target index into the valid slot range.
    ///
    /// Indices at or past the last slot map to the last slot.
    pub fn saturate(&self, target: usize) -> usize {
        target.min(self.projects.len().saturating_sub(1))
    }

    /// Apply one vote to `slot`, granting it `added` area.
    ///
    /// Increments the project's vote count by one and adds `added` to both
    /// the project area and the pool total. Returns the updated project, or
    /// `None` (leaving the pool untouched) if `slot` does not exist.
    pub fn credit(&mut self, slot: usize, added: f64) -> Option<Project> {
        let project = self.projects.get_mut(slot)?;
        project.votes = project.votes.saturating_add(1);
        project.area += added;
        self.total_area += added;
        Some(*project)
    }

    /// Sum of the individual project areas.
    pub fn summed_area(&self) -> f64 {
        self.projects.iter().map(|p| p.area).sum()
    }

    /// Reset every project and the pool total to zero.
    pub fn clear(&mut self) {
        self.projects.fill(Project::default());
        self.total_area = 0.0;
    }

    /// Capture the current state for later comparison.
    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            total_area: self.total_area,
            projects: self.projects.clone(),
        }
    }
}

/// A point-in-time copy of a [`Pool`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PoolSnapshot {
    /// Pool total at capture time.
    pub total_area: f64,
    /// Project states at capture time.
    pub projects: Vec<Project>,
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Per-project statistics produced by a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectStats {
    /// 1-based display position of the project.
    pub slot: usize,
    /// Current vote count.
    pub votes: u32,
    /// Current area.
    pub area: f64,
    /// `area / total_area` scaled by the share scale, rounded to 2 decimals.
    pub share: f64,
    /// Change in share over the report interval (`dA`).
    pub share_delta: f64,
    /// Change in area over the report interval (`d`).
    pub area_delta: f64,
}

/// The full report for one rule instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleReport {
    /// Position of the rule in the simulator's rule list (0-based).
    pub rule_index: usize,
    /// Which formula the rule applies.
    pub kind: RuleKind,
    /// Pool total at report time.
    pub total_area: f64,
    /// `total_area` minus the sum of project areas.
    pub drift: f64,
    /// Running leader area, for rules that track one.
    pub leader_area: Option<f64>,
    /// Statistics for every project slot, in slot order.
    pub projects: Vec<ProjectStats>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_pool_is_empty() {
        let pool = Pool::new(10);
        assert_eq!(pool.slot_count(), 10);
        assert!(pool.total_area().abs() < f64::EPSILON);
        assert!(pool.projects().iter().all(|p| p.votes == 0 && p.area.abs() < f64::EPSILON));
    }

    #[test]
    fn saturate_folds_into_last_slot() {
        let pool = Pool::new(10);
        assert_eq!(pool.saturate(3), 3);
        assert_eq!(pool.saturate(9), 9);
        assert_eq!(pool.saturate(10), 9);
        assert_eq!(pool.saturate(usize::MAX), 9);
    }

    #[test]
    fn credit_updates_project_and_total() {
        let mut pool = Pool::new(3);
        let updated = pool.credit(1, 2.5);
        assert_eq!(updated.map(|p| p.votes), Some(1));
        assert!((pool.total_area() - 2.5).abs() < 1e-12);
        assert!((pool.summed_area() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn credit_out_of_range_is_ignored() {
        let mut pool = Pool::new(3);
        assert!(pool.credit(3, 1.0).is_none());
        assert!(pool.total_area().abs() < f64::EPSILON);
    }

    #[test]
    fn clear_resets_everything() {
        let mut pool = Pool::new(2);
        pool.credit(0, 4.0);
        pool.clear();
        assert_eq!(pool, Pool::new(2));
    }

    #[test]
    fn snapshot_is_independent_copy() {
        let mut pool = Pool::new(2);
        pool.credit(0, 1.0);
        let snap = pool.snapshot();
        pool.credit(0, 5.0);
        assert!((snap.total_area - 1.0).abs() < 1e-12);
        assert_eq!(snap.projects.first().map(|p| p.votes), Some(1));
    }
}
