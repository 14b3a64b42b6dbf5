//! Local averaging pass applied around a raised cell.
//!
//! Each visited cell is replaced by the mean of itself and its in-bounds 3x3 neighbours, then
//! the pass recurses into the eight neighbour coordinates one level deeper. Recursion stops at
//! [`SMOOTHING_DEPTH_CAP`], so a single pass visits at most `1 + 8` cells regardless of the grid
//! size. Cells outside the grid are skipped rather than treated as errors.
use super::grid::{CellId, Grid};

/// Number of recursion levels the averaging pass descends (the centre is level 0).
pub const SMOOTHING_DEPTH_CAP: u32 = 2;

/// Smooths the neighbourhood of `center`, invoking `on_write` with every value written.
///
/// Returns the number of cells that were averaged.
pub fn antialias(
    data: &mut [f32],
    grid: &Grid,
    center: CellId,
    mut on_write: impl FnMut(f32),
) -> usize {
    debug_assert_eq!(data.len(), grid.cell_count(), "data must cover the grid");
    let mut visits = 0;
    antialias_at(data, grid, center, 0, &mut visits, &mut on_write);
    visits
}

fn antialias_at(
    data: &mut [f32],
    grid: &Grid,
    cell: CellId,
    depth: u32,
    visits: &mut usize,
    on_write: &mut dyn FnMut(f32),
) {
    if depth == SMOOTHING_DEPTH_CAP {
        return;
    }
    let Some(index) = grid.cell_index(cell) else {
        return;
    };

    let mut sum = 0.0;
    let mut count = 0u32;
    for dy in -1..=1 {
        for dx in -1..=1 {
            if let Some(i) = grid.cell_index(cell.offset(dx, dy)) {
                sum += data[i];
                count += 1;
            }
        }
    }

    // The cell itself is always in bounds here, so `count >= 1`.
    let mean = sum / count as f32;
    data[index] = mean;
    on_write(mean);
    *visits += 1;

    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            antialias_at(data, grid, cell.offset(dx, dy), depth + 1, visits, on_write);
        }
    }
}
