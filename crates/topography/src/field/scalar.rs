//! Mutable height matrix with running extrema.
//!
//! [`ScalarField`] owns the row-major backing array for a [`Grid`] together with running `min`
//! and `max` trackers. The trackers are seeded by initialization and widened incrementally on
//! mutation; they are never recomputed by scanning the whole matrix during a raise.
use rand::RngCore;
use tracing::{debug, warn};

use super::grid::{CellId, Grid};
use super::preset::{goldstein_height, sample_random_height, Preset, FILL_VALUE};
use super::smoothing;
use crate::error::{Error, Result};

/// Default divisor applied to a raise delta for the eight neighbours of the raised cell.
pub const DEFAULT_DENSITY: f32 = 4.0;

/// Which writes widen the running `min`/`max` trackers during a raise.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExtremaTracking {
    /// Every value written by the raise and by the smoothing pass widens the bounds, so
    /// `min <= value <= max` holds for every cell.
    #[default]
    Touched,
    /// Only the post-smoothing value of the raised cell is observed. Neighbour heights may
    /// escape the bounds.
    CenterOnly,
}

/// Dense height matrix paired with the grid it was built for.
#[derive(Clone, Debug)]
pub struct ScalarField {
    grid: Grid,
    preset: Preset,
    data: Vec<f32>,
    min: f32,
    max: f32,
    extrema: ExtremaTracking,
}

impl ScalarField {
    /// Creates a field for `grid` initialized with `preset`.
    ///
    /// `rng` is only drawn from by [`Preset::Random`].
    pub fn new(grid: Grid, preset: Preset, rng: &mut dyn RngCore) -> Self {
        let mut field = Self::empty(grid);
        field.initialize(preset, rng);
        field
    }

    /// Creates a field holding [`FILL_VALUE`] everywhere.
    pub fn empty(grid: Grid) -> Self {
        Self {
            grid,
            preset: Preset::Empty,
            data: vec![FILL_VALUE; grid.cell_count()],
            min: FILL_VALUE,
            max: FILL_VALUE,
            extrema: ExtremaTracking::default(),
        }
    }

    /// Sets the extrema tracking policy used by subsequent raises.
    pub fn with_extrema_tracking(mut self, extrema: ExtremaTracking) -> Self {
        self.extrema = extrema;
        self
    }

    /// Refills the matrix according to `preset` and re-seeds `min`/`max` from the new values.
    pub fn initialize(&mut self, preset: Preset, rng: &mut dyn RngCore) {
        let n = self.grid.cell_count();
        self.preset = preset;

        match preset {
            Preset::Empty => {
                self.data.clear();
                self.data.resize(n, FILL_VALUE);
                self.min = FILL_VALUE;
                self.max = FILL_VALUE;
            }
            Preset::Random => {
                self.reset_extrema();
                self.data.clear();
                for _ in 0..n {
                    let z = sample_random_height(rng);
                    self.observe(z);
                    self.data.push(z);
                }
            }
            Preset::Gradient => {
                self.data.clear();
                self.data.extend((0..n).map(|i| i as f32));
                self.min = 0.0;
                self.max = (n - 1) as f32;
            }
            Preset::Goldstein => {
                self.reset_extrema();
                self.data.clear();
                let (columns, rows) = (self.grid.column_count(), self.grid.row_count());
                for row in 0..rows {
                    for column in 0..columns {
                        let z = goldstein_height(column, row, columns, rows);
                        self.observe(z);
                        self.data.push(z);
                    }
                }
            }
        }

        debug!(
            preset = %preset,
            cells = n,
            min = self.min,
            max = self.max,
            "initialized field"
        );
    }

    /// Clears the matrix to [`FILL_VALUE`], discarding the previous extrema.
    pub fn reset(&mut self) {
        self.data.fill(FILL_VALUE);
        self.min = FILL_VALUE;
        self.max = FILL_VALUE;
        self.preset = Preset::Empty;
    }

    /// Re-initializes the matrix with [`Preset::Random`].
    pub fn randomize(&mut self, rng: &mut dyn RngCore) {
        self.initialize(Preset::Random, rng);
    }

    /// Replaces the backing array wholesale. The new extrema are taken from the given values.
    pub fn replace_matrix(&mut self, values: Vec<f32>) -> Result<()> {
        if values.len() != self.grid.cell_count() {
            warn!(
                expected = self.grid.cell_count(),
                actual = values.len(),
                "matrix does not match the grid"
            );
            return Err(Error::MatrixSizeMismatch {
                expected: self.grid.cell_count(),
                actual: values.len(),
            });
        }
        self.data = values;
        self.reset_extrema();
        for i in 0..self.data.len() {
            self.observe(self.data[i]);
        }
        Ok(())
    }

    /// Raises `cell` by `delta` and each in-bounds neighbour by `delta / density`, then smooths
    /// the neighbourhood.
    ///
    /// Returns the post-smoothing height of `cell`, or `None` (leaving the field untouched) if
    /// the cell lies outside the grid, `delta` is not finite, or `density` is not a finite
    /// positive number.
    pub fn raise(&mut self, cell: CellId, delta: f32, density: f32) -> Option<f32> {
        if !delta.is_finite() || !density.is_finite() || density <= 0.0 {
            return None;
        }
        let center = self.deposit(cell, delta, density)?;
        self.smooth(cell);

        let z = self.data[center];
        self.observe(z);
        Some(z)
    }

    /// Adds `delta` to `cell` and `delta / density` to its in-bounds neighbours, without
    /// smoothing. Returns the index of `cell`.
    fn deposit(&mut self, cell: CellId, delta: f32, density: f32) -> Option<usize> {
        let center = self.grid.cell_index(cell)?;
        let track_all = self.extrema == ExtremaTracking::Touched;

        self.data[center] += delta;
        if track_all {
            self.observe(self.data[center]);
        }

        let share = delta / density;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                if let Some(i) = self.grid.cell_index(cell.offset(dx, dy)) {
                    self.data[i] += share;
                    if track_all {
                        self.observe(self.data[i]);
                    }
                }
            }
        }
        Some(center)
    }

    /// Runs the smoothing pass around `cell` and returns the number of cells it averaged.
    pub fn smooth(&mut self, cell: CellId) -> usize {
        let track_all = self.extrema == ExtremaTracking::Touched;
        let (mut lo, mut hi) = (self.min, self.max);
        let visits = smoothing::antialias(&mut self.data, &self.grid, cell, |v| {
            if track_all {
                lo = lo.min(v);
                hi = hi.max(v);
            }
        });
        self.min = lo;
        self.max = hi;
        visits
    }

    /// Height at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: i32, y: i32) -> Option<f32> {
        self.grid.cell_index(CellId(x, y)).map(|i| self.data[i])
    }

    /// Height at a flat row-major index, or `None` outside `[0, cell_count)`.
    pub fn value_at(&self, index: isize) -> Option<f32> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.data.get(i).copied())
    }

    /// The flattened, row-major height matrix.
    #[inline]
    pub fn matrix(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Preset of the last initialization (`Empty` after a reset).
    #[inline]
    pub fn preset(&self) -> Preset {
        self.preset
    }

    #[inline]
    pub fn min(&self) -> f32 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> f32 {
        self.max
    }

    #[inline]
    pub fn extrema_tracking(&self) -> ExtremaTracking {
        self.extrema
    }

    #[inline]
    fn observe(&mut self, z: f32) {
        if z < self.min {
            self.min = z;
        }
        if z > self.max {
            self.max = z;
        }
    }

    fn reset_extrema(&mut self) {
        self.min = f32::INFINITY;
        self.max = f32::NEG_INFINITY;
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn grid(n: usize, m: usize) -> Grid {
        Grid::from_counts(n, m).unwrap()
    }

    fn assert_bounded(field: &ScalarField) {
        for &v in field.matrix() {
            assert!(
                field.min() <= v && v <= field.max(),
                "{v} outside [{}, {}]",
                field.min(),
                field.max()
            );
        }
    }

    #[test]
    fn empty_fill_seeds_extrema() {
        let field = ScalarField::empty(grid(4, 3));
        assert_eq!(field.matrix().len(), 12);
        assert!(field.matrix().iter().all(|v| *v == FILL_VALUE));
        assert_eq!((field.min(), field.max()), (FILL_VALUE, FILL_VALUE));
    }

    #[test]
    fn gradient_is_a_ramp() {
        let mut rng = StdRng::seed_from_u64(1);
        let field = ScalarField::new(grid(5, 4), Preset::Gradient, &mut rng);
        for (i, v) in field.matrix().iter().enumerate() {
            assert_eq!(*v, i as f32);
        }
        assert_eq!((field.min(), field.max()), (0.0, 19.0));
    }

    #[test]
    fn random_fill_tracks_extrema() {
        let mut rng = StdRng::seed_from_u64(99);
        let field = ScalarField::new(grid(16, 12), Preset::Random, &mut rng);
        assert_bounded(&field);
        assert!(field.min() >= 0.0 && field.max() <= 100.0);
        let actual_max = field.matrix().iter().cloned().fold(f32::MIN, f32::max);
        assert_eq!(field.max(), actual_max);
    }

    #[test]
    fn goldstein_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(3);
        let a = ScalarField::new(grid(30, 20), Preset::Goldstein, &mut rng);
        let b = ScalarField::new(grid(30, 20), Preset::Goldstein, &mut rng);
        assert_eq!(a.matrix(), b.matrix());
        assert_bounded(&a);
        assert!(a.min() >= 3.0);
    }

    #[test]
    fn raise_deposits_before_smoothing() {
        let mut field = ScalarField::empty(grid(10, 10));
        let center = field.deposit(CellId(5, 5), 100.0, DEFAULT_DENSITY);
        assert_eq!(center, field.grid().cell_index(CellId(5, 5)));
        assert_eq!(field.get(5, 5), Some(110.0));
        for (x, y) in [(4, 4), (5, 4), (6, 4), (4, 5), (6, 5), (4, 6), (5, 6), (6, 6)] {
            assert_eq!(field.get(x, y), Some(35.0), "neighbour ({x}, {y})");
        }
        assert_eq!(field.get(3, 3), Some(10.0));
        assert_eq!(field.get(7, 5), Some(10.0));
        assert_eq!(field.max(), 110.0);
    }

    #[test]
    fn deposit_at_edges_and_corners() {
        let mut field = ScalarField::empty(grid(6, 6));
        field.deposit(CellId(0, 0), 40.0, DEFAULT_DENSITY);
        assert_eq!(field.get(0, 0), Some(50.0));
        assert_eq!(field.get(1, 0), Some(20.0));
        assert_eq!(field.get(0, 1), Some(20.0));
        assert_eq!(field.get(1, 1), Some(20.0));
        // No wraparound onto the last column of the same or previous row.
        assert_eq!(field.get(5, 0), Some(FILL_VALUE));
        assert_eq!(field.get(5, 5), Some(FILL_VALUE));
        let touched = field.matrix().iter().filter(|v| **v != FILL_VALUE).count();
        assert_eq!(touched, 4);

        let mut field = ScalarField::empty(grid(6, 6));
        field.deposit(CellId(3, 5), 8.0, 2.0);
        assert_eq!(field.get(3, 5), Some(18.0));
        for (x, y) in [(2, 5), (4, 5), (2, 4), (3, 4), (4, 4)] {
            assert_eq!(field.get(x, y), Some(14.0), "neighbour ({x}, {y})");
        }
        let touched = field.matrix().iter().filter(|v| **v != FILL_VALUE).count();
        assert_eq!(touched, 6);

        assert_eq!(field.deposit(CellId(6, 0), 8.0, 2.0), None);
    }

    #[test]
    fn raise_rejects_non_finite_delta_and_bad_density() {
        let mut field = ScalarField::empty(grid(5, 5));
        assert_eq!(field.raise(CellId(2, 2), f32::NAN, DEFAULT_DENSITY), None);
        assert_eq!(field.raise(CellId(2, 2), f32::INFINITY, DEFAULT_DENSITY), None);
        assert_eq!(field.raise(CellId(2, 2), f32::NEG_INFINITY, DEFAULT_DENSITY), None);
        assert_eq!(field.raise(CellId(2, 2), 10.0, 0.0), None);
        assert_eq!(field.raise(CellId(2, 2), 10.0, -4.0), None);
        assert_eq!(field.raise(CellId(2, 2), 10.0, f32::NAN), None);
        assert_eq!(field.raise(CellId(2, 2), 10.0, f32::INFINITY), None);
        assert!(field.matrix().iter().all(|v| *v == FILL_VALUE));
        assert_eq!((field.min(), field.max()), (FILL_VALUE, FILL_VALUE));
    }

    #[test]
    fn raise_keeps_every_cell_within_extrema() {
        let mut field = ScalarField::empty(grid(10, 10));
        let z = field.raise(CellId(5, 5), 100.0, DEFAULT_DENSITY).unwrap();
        assert!(z > FILL_VALUE);
        assert!(field.min() <= 10.0);
        assert!(field.max() >= 35.0);
        assert_bounded(&field);

        for (i, cell) in [(0, 0), (9, 9), (0, 5), (9, 0), (3, 7)].into_iter().enumerate() {
            field.raise(CellId(cell.0, cell.1), 40.0 + i as f32, DEFAULT_DENSITY);
            assert_bounded(&field);
        }
    }

    #[test]
    fn negative_raise_lowers_min() {
        let mut field = ScalarField::empty(grid(8, 8));
        field.raise(CellId(4, 4), -80.0, DEFAULT_DENSITY);
        assert!(field.min() < FILL_VALUE);
        assert_bounded(&field);
    }

    #[test]
    fn center_only_tracking_observes_raised_cell() {
        let mut field = ScalarField::empty(grid(10, 10)).with_extrema_tracking(ExtremaTracking::CenterOnly);
        let z = field.raise(CellId(5, 5), 100.0, DEFAULT_DENSITY).unwrap();
        assert_eq!(field.max(), z);
        assert_eq!(field.min(), FILL_VALUE);
    }

    #[test]
    fn raise_outside_grid_is_ignored() {
        let mut field = ScalarField::empty(grid(6, 6));
        assert_eq!(field.raise(CellId(-1, 2), 50.0, DEFAULT_DENSITY), None);
        assert_eq!(field.raise(CellId(2, 6), 50.0, DEFAULT_DENSITY), None);
        assert!(field.matrix().iter().all(|v| *v == FILL_VALUE));
    }

    #[test]
    fn edge_raise_skips_missing_neighbours() {
        let mut field = ScalarField::empty(grid(6, 6));
        assert!(field.raise(CellId(0, 0), 60.0, DEFAULT_DENSITY).is_some());
        // The opposite edge of the previous row is never touched (no wraparound).
        assert_eq!(field.get(5, 5), Some(FILL_VALUE));
        assert_bounded(&field);
    }

    #[test]
    fn reset_restores_uniform_fill() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut field = ScalarField::new(grid(7, 9), Preset::Random, &mut rng);
        field.raise(CellId(3, 3), 250.0, DEFAULT_DENSITY);
        field.reset();
        assert!(field.matrix().iter().all(|v| *v == FILL_VALUE));
        assert_eq!((field.min(), field.max()), (FILL_VALUE, FILL_VALUE));
        assert_eq!(field.preset(), Preset::Empty);
    }

    #[test]
    fn out_of_range_reads_return_none() {
        let field = ScalarField::empty(grid(3, 3));
        assert_eq!(field.get(-1, 0), None);
        assert_eq!(field.get(3, 0), None);
        assert_eq!(field.value_at(-1), None);
        assert_eq!(field.value_at(9), None);
        assert_eq!(field.value_at(8), Some(FILL_VALUE));
    }

    #[test]
    fn replace_matrix_validates_length() {
        let mut field = ScalarField::empty(grid(2, 2));
        let err = field.replace_matrix(vec![1.0; 3]).unwrap_err();
        assert!(matches!(
            err,
            Error::MatrixSizeMismatch {
                expected: 4,
                actual: 3
            }
        ));
        field.replace_matrix(vec![4.0, -2.0, 8.0, 1.0]).unwrap();
        assert_eq!((field.min(), field.max()), (-2.0, 8.0));
    }

    #[test]
    fn smoothing_is_bounded_on_large_grid() {
        let mut field = ScalarField::empty(grid(20, 20));
        assert_eq!(field.smooth(CellId(10, 10)), 9);
        let mut big = ScalarField::empty(grid(120, 80));
        assert_eq!(big.smooth(CellId(60, 40)), 9);
    }
}
