//! Pool invariant checks.
//!
//! After every vote a pool must satisfy:
//!
//! ```text
//! total_area >= 0
//! project.area >= 0   for every project
//! ```
//!
//! with every value finite. The gap between `total_area` and the sum of
//! project areas (`drift`) is measured but never treated as a violation:
//! it is an expected artifact of accumulating the same grants in two
//! different floating-point sums.

use areavote_types::Pool;

/// Measurements taken from a healthy pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolAudit {
    /// The pool's running total.
    pub total_area: f64,
    /// Sum of the individual project areas.
    pub summed_area: f64,
    /// `total_area - summed_area`.
    pub drift: f64,
}

/// An invariant violation found by [`audit_pool`].
#[derive(Debug, Clone, PartialEq)]
pub struct PoolAnomaly {
    /// Measurements at the time of the audit.
    pub audit: PoolAudit,
    /// Slots (0-based) whose area is negative or not finite.
    pub bad_slots: Vec<usize>,
    /// Whether the pool total itself is negative or not finite.
    pub bad_total: bool,
    /// Human-readable description of the anomaly.
    pub message: String,
}

impl core::fmt::Display for PoolAnomaly {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// The result of auditing a pool.
#[derive(Debug, Clone, PartialEq)]
pub enum PoolHealth {
    /// All invariants hold.
    Consistent(PoolAudit),
    /// At least one invariant is violated.
    Anomaly(PoolAnomaly),
}

impl PoolHealth {
    /// The measurements, regardless of health.
    pub const fn audit(&self) -> &PoolAudit {
        match self {
            Self::Consistent(audit) => audit,
            Self::Anomaly(anomaly) => &anomaly.audit,
        }
    }

    /// Returns `true` if every invariant holds.
    pub const fn is_consistent(&self) -> bool {
        matches!(self, Self::Consistent(_))
    }
}

fn is_valid_area(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// Check the non-negativity invariants of `pool` and measure its drift.
pub fn audit_pool(pool: &Pool) -> PoolHealth {
    let total_area = pool.total_area();
    let summed_area = pool.summed_area();
    let audit = PoolAudit {
        total_area,
        summed_area,
        drift: total_area - summed_area,
    };

    let bad_slots: Vec<usize> = pool
        .projects()
        .iter()
        .enumerate()
        .filter(|(_, p)| !is_valid_area(p.area))
        .map(|(slot, _)| slot)
        .collect();
    let bad_total = !is_valid_area(total_area);

    if bad_slots.is_empty() && !bad_total {
        return PoolHealth::Consistent(audit);
    }

    let count = bad_slots.len();
    let message = if bad_total {
        format!("POOL_ANOMALY: invalid total area {total_area}, {count} invalid project area(s)")
    } else {
        format!("POOL_ANOMALY: {count} project area(s) negative or not finite")
    };

    PoolHealth::Anomaly(PoolAnomaly {
        audit,
        bad_slots,
        bad_total,
        message,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_pool_is_consistent() {
        let health = audit_pool(&Pool::new(10));
        assert!(health.is_consistent());
        assert!(health.audit().drift.abs() < f64::EPSILON);
    }

    #[test]
    fn drift_is_measured_not_flagged() {
        let mut pool = Pool::new(3);
        pool.credit(0, 0.1);
        pool.credit(1, 0.2);
        pool.credit(2, 0.3);
        let health = audit_pool(&pool);
        assert!(health.is_consistent());
        assert!(health.audit().drift.abs() < 1e-12);
    }

    #[test]
    fn negative_area_is_anomaly() {
        let mut pool = Pool::new(3);
        pool.credit(1, -2.0);
        match audit_pool(&pool) {
            PoolHealth::Anomaly(anomaly) => {
                assert_eq!(anomaly.bad_slots, vec![1]);
                assert!(anomaly.bad_total);
                assert!(anomaly.to_string().starts_with("POOL_ANOMALY"));
            }
            PoolHealth::Consistent(_) => {
                panic!("Expected anomaly for negative area");
            }
        }
    }

    #[test]
    fn nan_area_is_anomaly() {
        let mut pool = Pool::new(2);
        pool.credit(0, f64::NAN);
        assert!(!audit_pool(&pool).is_consistent());
    }
}
