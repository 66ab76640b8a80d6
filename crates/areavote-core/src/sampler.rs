//! Biased linear-scan index sampling.
//!
//! Starting at index 0, the walk stops at index `i` when a uniform draw in
//! `[0, 1)` is at or below `table[i]`, and advances otherwise. An index
//! past the end of the table always stops the walk. A high entry therefore
//! makes its index *likely to be chosen*; a low entry makes the walk pass
//! through it.
//!
//! An entry of exactly 0 also stops the walk, without consuming a draw.
//! Such an entry is treated like the end of the table.

use rand::Rng;

use crate::tables::ProbabilityTable;

/// Draw one target index from `table`.
///
/// The result is at most `table.len()`. Each visited non-zero entry
/// consumes exactly one `f64` from `rng`.
pub fn draw_index<R: Rng>(table: &ProbabilityTable, rng: &mut R) -> usize {
    let mut index = 0_usize;
    while let Some(probability) = table.get(index) {
        if probability <= 0.0 {
            break;
        }
        let roll: f64 = rng.random();
        if roll <= probability {
            break;
        }
        index = index.saturating_add(1);
    }
    index
}
