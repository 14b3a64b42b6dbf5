//! Pointer handling: canvas point → cell mapping, hover dwell tracking and the force a tick
//! applies to the hovered cell.
use std::time::Duration;

use glam::Vec2;
use mint::Vector2;

use crate::field::{CellId, Grid};

pub mod hover;

pub use hover::HoverTracker;

/// Divisor applied to the base force while the pointer rests on one cell.
pub const HOVER_FORCE_DIVISOR: f32 = 6.0;

/// Maps a canvas point to the cell under it by scanning the grid lines.
///
/// The column is the index of the first vertical grid line lying strictly right of the point,
/// minus one; rows likewise. Points left of/above the canvas, at or beyond its far edge, or
/// non-finite yield `None`.
pub fn map_pointer_to_cell(point: impl Into<Vector2<f32>>, grid: &Grid) -> Option<CellId> {
    let point: Vector2<f32> = point.into();
    let point = Vec2::from(point);
    let cell_size = grid.cell_size();

    let column = scan_lines(point.x, cell_size.x, grid.column_count())?;
    let row = scan_lines(point.y, cell_size.y, grid.row_count())?;
    Some(CellId(column, row))
}

fn scan_lines(coordinate: f32, spacing: f32, count: usize) -> Option<i32> {
    if !coordinate.is_finite() {
        return None;
    }
    let line = (0..=count).find(|&i| coordinate < spacing * i as f32)?;
    // Line 0 only matches points before the canvas.
    line.checked_sub(1).map(|i| i as i32)
}

/// Force applied to the hovered cell on a tick.
///
/// Moving onto a different cell applies the full `base_force`. Resting on a cell applies
/// `base_force / 6`, fading linearly to zero over the `decay` window. A zero window means a
/// resting pointer applies no force.
pub fn compute_force(hover: Duration, decay: Duration, base_force: f32, moved: bool) -> f32 {
    if moved {
        return base_force;
    }
    if decay.is_zero() {
        return 0.0;
    }
    let window = decay.as_secs_f32();
    let remaining = ((window - hover.as_secs_f32()) / window).max(0.0);
    remaining * base_force / HOVER_FORCE_DIVISOR
}
