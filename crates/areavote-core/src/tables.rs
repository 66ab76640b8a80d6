//! Probability tables driving the vote sampler.
//!
//! A table is an ordered list of per-index probabilities in `[0, 1]`. It
//! may be shorter than the slot count; the sampler treats any index past
//! the end as an automatic stop. A table can hold at most
//! `slot_count - 1` entries, so the walk always ends on a real slot.
//!
//! The named presets are the scenarios the simulator ships with:
//!
//! | Name | Entries |
//! |------|---------|
//! | `average` / `uniform` | `1/10, 1/9, ..., 1/2` |
//! | `bsc` | `2/7, 1.8/6, 1.6/5, 1.4/4, 1.2/3`, then four `1/2` |
//! | `amass` | nine `0.5` |
//! | `aamass` | `0.76`, then eight `0.6` |
//! | `bamass` | `0.9`, then eight `0.6` |
//! | `attack` | `0.01, 0.9`, then seven `0.5` |
//! | `direct` | empty (every vote lands on slot 0) |

/// Errors that can occur when validating a probability table.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableError {
    /// An entry is NaN or infinite.
    #[error("probability at index {index} is not finite: {value}")]
    NotFinite {
        /// Position of the offending entry.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// An entry lies outside `[0, 1]`.
    #[error("probability at index {index} must be within [0, 1], got {value}")]
    OutOfRange {
        /// Position of the offending entry.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// The table has more entries than the slot count allows.
    #[error("probability table has {len} entries, at most {max} allowed")]
    TooLong {
        /// Number of entries supplied.
        len: usize,
        /// Maximum allowed (`slot_count - 1`).
        max: usize,
    },
}

/// A validated sequence of per-index probabilities.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProbabilityTable {
    values: Vec<f64>,
}

impl ProbabilityTable {
    /// Validate `values` for a pool with `slot_count` slots.
    ///
    /// # Errors
    ///
    /// Returns [`TableError`] if an entry is not finite, lies outside
    /// `[0, 1]`, or the table is longer than `slot_count - 1`.
    pub fn new(values: Vec<f64>, slot_count: usize) -> Result<Self, TableError> {
        let max = slot_count.saturating_sub(1);
        if values.len() > max {
            return Err(TableError::TooLong {
                len: values.len(),
                max,
            });
        }
        for (index, &value) in values.iter().enumerate() {
            if !value.is_finite() {
                return Err(TableError::NotFinite { index, value });
            }
            if !(0.0..=1.0).contains(&value) {
                return Err(TableError::OutOfRange { index, value });
            }
        }
        Ok(Self { values })
    }

    /// The probability at `index`, if the table reaches that far.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// All entries in order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of entries.
    pub const fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the table has no entries.
    pub const fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Named presets
// ---------------------------------------------------------------------------

/// Harmonic walk: each index is accepted with rising probability.
pub const AVERAGE: [f64; 9] = [
    1.0 / 10.0,
    1.0 / 9.0,
    1.0 / 8.0,
    1.0 / 7.0,
    1.0 / 6.0,
    1.0 / 5.0,
    1.0 / 4.0,
    1.0 / 3.0,
    1.0 / 2.0,
];

/// Skewed walk toward the first few slots.
pub const BSC: [f64; 9] = [
    2.0 / 7.0,
    1.8 / 6.0,
    1.6 / 5.0,
    1.4 / 4.0,
    1.2 / 3.0,
    0.5,
    0.5,
    0.5,
    0.5,
];

/// Coin-flip at every index.
pub const AMASS: [f64; 9] = [0.5; 9];

/// Strong bias toward slot 0, coin-ish afterwards.
pub const AAMASS: [f64; 9] = [0.76, 0.6, 0.6, 0.6, 0.6, 0.6, 0.6, 0.6, 0.6];

/// Near-deterministic bias toward slot 0.
pub const BAMASS: [f64; 9] = [0.9, 0.6, 0.6, 0.6, 0.6, 0.6, 0.6, 0.6, 0.6];

/// Almost every vote skips slot 0 and concentrates on slot 1.
pub const ATTACK: [f64; 9] = [0.01, 0.9, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5];

/// No entries: the walk stops at slot 0 immediately.
pub const DIRECT: [f64; 0] = [];

/// Names accepted by [`named_table`].
pub const TABLE_NAMES: [&str; 8] = [
    "average", "uniform", "bsc", "amass", "aamass", "bamass", "attack", "direct",
];

/// Look up a preset by name, ignoring ASCII case.
pub fn named_table(name: &str) -> Option<&'static [f64]> {
    match name.to_ascii_lowercase().as_str() {
        "average" | "uniform" => Some(AVERAGE.as_slice()),
        "bsc" => Some(BSC.as_slice()),
        "amass" => Some(AMASS.as_slice()),
        "aamass" => Some(AAMASS.as_slice()),
        "bamass" => Some(BAMASS.as_slice()),
        "attack" => Some(ATTACK.as_slice()),
        "direct" => Some(DIRECT.as_slice()),
        _ => None,
    }
}
