#![forbid(unsafe_code)]
//! topography: an interactive scalar height field rendered as contour bands.
//!
//! Modules:
//! - field: grid geometry, presets, the height matrix with running extrema, smoothing
//! - contour: marching-squares isobands and contours, polygon assembly, threshold policies
//! - interaction: pointer → cell mapping, hover dwell and force decay
//! - session: the [`Topography`](session::Topography) tick driver, its config and events
//!
//! For examples and docs, see README and docs.rs.
pub mod contour;
pub mod error;
pub mod field;
pub mod interaction;
pub mod session;

/// Convenient re-exports for common types. Import with `use topography::prelude::*;`.
pub mod prelude {
    pub use crate::contour::{
        validate_thresholds, Contour, ContourExtractor, FieldSummary, IsoBand, MultiPolygon,
        Polygon, Ring, ThresholdOrder, ThresholdPolicy, CONTOUR_INTERVAL,
    };
    pub use crate::error::{Error, Result};
    pub use crate::field::{
        CellId, ExtremaTracking, Grid, Preset, ScalarField, DEFAULT_DENSITY, FILL_VALUE,
    };
    pub use crate::interaction::{compute_force, map_pointer_to_cell, HoverTracker};
    pub use crate::session::{
        EventSink, FnSink, Topography, TopographyConfig, TopographyEvent, TopographyEventKind,
        VecSink,
    };
}
