//! Puzzle generation and placement validation
//!
//! Generation runs in two phases. A full solution grid is built by
//! backtracking with the digit order shuffled per cell, then cells are dug
//! out in a shuffled order, keeping only removals that leave the puzzle with
//! exactly one solution. The retained solution grid later backs hints and
//! the solution reveal.
//!
//! Everything here is deterministic given the RNG state.

use crate::core::rng::SimpleRng;
use crate::types::{Difficulty, BOX_SIZE, CELL_COUNT, DIGIT_MAX, DIGIT_MIN, GRID_SIZE};

/// A generated puzzle: the starting grid and its unique completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    /// Starting grid, 0 = hole; non-zero entries become fixed cells
    pub givens: [u8; CELL_COUNT],
    /// The single grid that completes `givens`
    pub solution: [u8; CELL_COUNT],
}

/// Generate a puzzle at the given difficulty.
///
/// Digging stops once the difficulty's givens target is reached, or earlier
/// when no remaining cell can be removed without opening a second solution.
pub fn generate(difficulty: Difficulty, rng: &mut SimpleRng) -> Puzzle {
    let mut solution = [0u8; CELL_COUNT];
    let filled = fill_grid(&mut solution, rng);
    debug_assert!(filled, "an empty grid always completes");

    let mut givens = solution;
    let mut order = [0u8; CELL_COUNT];
    for (i, slot) in order.iter_mut().enumerate() {
        *slot = i as u8;
    }
    rng.shuffle(&mut order);

    let target = difficulty.givens() as usize;
    let mut remaining = CELL_COUNT;
    for &cell in order.iter() {
        if remaining <= target {
            break;
        }
        let idx = cell as usize;
        let saved = givens[idx];
        givens[idx] = 0;
        // count_solutions restores every cell it probes, so the grid is
        // intact afterwards apart from the hole under test.
        if count_solutions(&mut givens, 2) == 1 {
            remaining -= 1;
        } else {
            givens[idx] = saved;
        }
    }

    Puzzle { givens, solution }
}

/// True iff placing `value` at the flat index introduces no duplicate in
/// its row, column, or 3x3 box (the cell itself is ignored)
pub fn placement_allowed(grid: &[u8; CELL_COUNT], idx: usize, value: u8) -> bool {
    let size = GRID_SIZE as usize;
    let row = idx / size;
    let col = idx % size;

    for c in 0..size {
        let i = row * size + c;
        if i != idx && grid[i] == value {
            return false;
        }
    }
    for r in 0..size {
        let i = r * size + col;
        if i != idx && grid[i] == value {
            return false;
        }
    }

    let box_size = BOX_SIZE as usize;
    let box_row = row / box_size * box_size;
    let box_col = col / box_size * box_size;
    for r in box_row..box_row + box_size {
        for c in box_col..box_col + box_size {
            let i = r * size + c;
            if i != idx && grid[i] == value {
                return false;
            }
        }
    }

    true
}

/// Complete the grid in place by backtracking, digit order randomized per
/// cell. Returns false when the partial grid admits no completion.
fn fill_grid(grid: &mut [u8; CELL_COUNT], rng: &mut SimpleRng) -> bool {
    let Some(idx) = first_empty(grid) else {
        return true;
    };

    for v in rng.shuffled_digits() {
        if placement_allowed(grid, idx, v) {
            grid[idx] = v;
            if fill_grid(grid, rng) {
                return true;
            }
            grid[idx] = 0;
        }
    }

    false
}

/// Count completions of the grid, stopping as soon as `limit` are found.
/// Backtracks fully: the grid is unchanged when this returns.
fn count_solutions(grid: &mut [u8; CELL_COUNT], limit: u32) -> u32 {
    let Some(idx) = first_empty(grid) else {
        return 1;
    };

    let mut found = 0;
    for v in DIGIT_MIN..=DIGIT_MAX {
        if placement_allowed(grid, idx, v) {
            grid[idx] = v;
            found += count_solutions(grid, limit - found);
            grid[idx] = 0;
            if found >= limit {
                break;
            }
        }
    }

    found
}

fn first_empty(grid: &[u8; CELL_COUNT]) -> Option<usize> {
    grid.iter().position(|&v| v == 0)
}
