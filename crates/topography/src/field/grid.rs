//! Grid geometry mapping a continuous canvas onto a discrete cell lattice.
//!
//! This module defines [`Grid`] and [`CellId`]. A grid is derived from a canvas size and a
//! simplification factor (`scale`, canvas pixels per cell) and is immutable once built; changing
//! the scale means building a new grid.
use glam::Vec2;
use mint::Vector2;

use crate::error::{Error, Result};

/// Relative tolerance used to snap canvas→cell conversions onto exact cell boundaries.
const SNAP_EPSILON: f32 = 1e-4;

/// Largest column or row count; cells are addressed with `i32` coordinates.
pub const MAX_AXIS_CELLS: usize = i32::MAX as usize;

fn check_counts(column_count: usize, row_count: usize) -> Result<()> {
    if column_count == 0 || row_count == 0 {
        return Err(Error::InvalidConfig(format!(
            "grid must have at least one cell, got {column_count}x{row_count}"
        )));
    }
    if column_count > MAX_AXIS_CELLS || row_count > MAX_AXIS_CELLS {
        return Err(Error::InvalidConfig(format!(
            "grid of {column_count}x{row_count} exceeds {MAX_AXIS_CELLS} cells per axis"
        )));
    }
    if column_count.checked_mul(row_count).is_none() {
        return Err(Error::InvalidConfig(format!(
            "grid of {column_count}x{row_count} cells overflows the cell count"
        )));
    }
    Ok(())
}

/// Identifier for a cell in the grid.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellId(
    /// Column index.
    pub i32,
    /// Row index.
    pub i32,
);

impl CellId {
    /// Returns the cell displaced by `(dx, dy)`.
    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        CellId(self.0 + dx, self.1 + dy)
    }
}

/// Discrete lattice covering a canvas.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grid {
    canvas_size: Vec2,
    scale: f32,
    column_count: usize,
    row_count: usize,
}

impl Grid {
    /// Builds a grid with `ceil(width / scale)` columns and `ceil(height / scale)` rows.
    pub fn new(canvas_size: impl Into<Vector2<f32>>, scale: f32) -> Result<Self> {
        let canvas_size: Vector2<f32> = canvas_size.into();
        let canvas_size = Vec2::from(canvas_size);

        if !scale.is_finite() || scale <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "scale must be finite and > 0, got {scale}"
            )));
        }
        if !canvas_size.is_finite() || canvas_size.x <= 0.0 || canvas_size.y <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "canvas size must be > 0 in both components, got {}x{}",
                canvas_size.x, canvas_size.y
            )));
        }

        let counts = (canvas_size / scale).ceil().max(Vec2::ONE);
        if !counts.is_finite() || counts.max_element() > MAX_AXIS_CELLS as f32 {
            return Err(Error::InvalidConfig(format!(
                "{}x{} canvas at scale {scale} needs too many cells",
                canvas_size.x, canvas_size.y
            )));
        }
        let (column_count, row_count) = (counts.x as usize, counts.y as usize);
        check_counts(column_count, row_count)?;

        Ok(Self {
            canvas_size,
            scale,
            column_count,
            row_count,
        })
    }

    /// Builds a grid whose canvas is exactly `column_count x row_count` units at scale 1.
    pub fn from_counts(column_count: usize, row_count: usize) -> Result<Self> {
        check_counts(column_count, row_count)?;
        Ok(Self {
            canvas_size: Vec2::new(column_count as f32, row_count as f32),
            scale: 1.0,
            column_count,
            row_count,
        })
    }

    #[inline]
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Total number of cells, `column_count * row_count`.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.column_count * self.row_count
    }

    #[inline]
    pub fn canvas_size(&self) -> Vec2 {
        self.canvas_size
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Canvas extent of a single cell.
    pub fn cell_size(&self) -> Vec2 {
        self.canvas_size / self.counts()
    }

    /// Ratio of columns to rows.
    pub fn aspect_ratio(&self) -> f32 {
        self.column_count as f32 / self.row_count as f32
    }

    /// Returns `true` if the cell lies inside the lattice.
    #[inline]
    pub fn contains(&self, cell: CellId) -> bool {
        cell.0 >= 0
            && cell.1 >= 0
            && (cell.0 as usize) < self.column_count
            && (cell.1 as usize) < self.row_count
    }

    /// Row-major index of a cell, or `None` outside the lattice. Never wraps across rows.
    #[inline]
    pub fn cell_index(&self, cell: CellId) -> Option<usize> {
        if self.contains(cell) {
            Some(cell.1 as usize * self.column_count + cell.0 as usize)
        } else {
            None
        }
    }

    /// Inverse of [`Grid::cell_index`].
    pub fn cell_at(&self, index: usize) -> Option<CellId> {
        if index >= self.cell_count() {
            return None;
        }
        Some(CellId(
            (index % self.column_count) as i32,
            (index / self.column_count) as i32,
        ))
    }

    /// Maps grid-space coordinates (`[0, column_count] x [0, row_count]`) to canvas space.
    pub fn cell_to_canvas(&self, p: Vec2) -> Vec2 {
        p * self.canvas_size / self.counts()
    }

    /// Maps canvas coordinates to continuous grid space.
    pub fn canvas_to_cell(&self, p: Vec2) -> Vec2 {
        p * self.counts() / self.canvas_size
    }

    /// Returns the cell containing a canvas point, or `None` outside the canvas.
    ///
    /// Points on a cell boundary belong to the cell to the right/below; conversions are snapped
    /// so that `containing_cell(cell_to_canvas(c))` returns `c` for every integer corner `c`.
    pub fn containing_cell(&self, p: impl Into<Vector2<f32>>) -> Option<CellId> {
        let p: Vector2<f32> = p.into();
        let p = Vec2::from(p);
        if !p.is_finite() {
            return None;
        }
        let g = self.canvas_to_cell(p);
        let cell = CellId(snap_floor(g.x) as i32, snap_floor(g.y) as i32);
        self.contains(cell).then_some(cell)
    }

    #[inline]
    fn counts(&self) -> Vec2 {
        Vec2::new(self.column_count as f32, self.row_count as f32)
    }
}

fn snap_floor(v: f32) -> f32 {
    let r = v.round();
    if (v - r).abs() <= SNAP_EPSILON * r.abs().max(1.0) {
        r
    } else {
        v.floor()
    }
}
