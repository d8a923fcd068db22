//! Grid generation
//!
//! One cell holds the target; every other cell gets an independent pick from
//! the decoy set (with replacement, so decoys may repeat).

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

/// A single tappable cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    /// Row-major position (row * grid_size + col)
    pub index: usize,
    pub symbol: char,
}

/// Pick the target cell uniformly from `[0, grid_size² - 1]`
pub fn pick_target_index<R: Rng + ?Sized>(rng: &mut R, grid_size: usize) -> usize {
    let cells = grid_size * grid_size;
    if cells == 0 {
        return 0;
    }
    rng.random_range(0..cells)
}

/// Build a `grid_size²` grid with `target` at `target_index`.
///
/// An empty decoy set leaves non-target cells blank.
pub fn generate<R: Rng + ?Sized>(
    rng: &mut R,
    grid_size: usize,
    target_index: usize,
    target: char,
    decoys: &[char],
) -> Vec<GridCell> {
    debug_assert!(grid_size == 0 || target_index < grid_size * grid_size);

    (0..grid_size * grid_size)
        .map(|index| {
            let symbol = if index == target_index {
                target
            } else {
                decoys.choose(rng).copied().unwrap_or(' ')
            };
            GridCell { index, symbol }
        })
        .collect()
}
