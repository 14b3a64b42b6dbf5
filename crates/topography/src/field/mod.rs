//! Height field subsystem: grid geometry, presets, the mutable scalar matrix and its smoothing
//! pass.
pub mod grid;
pub mod preset;
pub mod scalar;
pub mod smoothing;

pub use grid::{CellId, Grid, MAX_AXIS_CELLS};
pub use preset::{Preset, FILL_VALUE};
pub use scalar::{ExtremaTracking, ScalarField, DEFAULT_DENSITY};
