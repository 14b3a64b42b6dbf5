//! Contour extraction: marching-squares ring tracing, polygon assembly and per-preset threshold
//! policies.
pub mod extractor;
pub mod isoring;
pub mod polygon;
pub mod threshold;

pub use extractor::{Contour, ContourExtractor, IsoBand};
pub use polygon::{MultiPolygon, Polygon, Ring};
pub use threshold::{
    validate_thresholds, FieldSummary, ThresholdOrder, ThresholdPolicy, CONTOUR_INTERVAL,
};
