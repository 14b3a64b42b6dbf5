use tracing::warn;

use super::isoring::isorings;
use super::polygon::{assemble, MultiPolygon, Ring};
use super::threshold::threshold_ordering;
use crate::field::Grid;

/// Region of a field at or above `value`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Contour {
    pub value: f32,
    pub geometry: MultiPolygon,
}

/// Region between two adjacent thresholds: `lower <= value < upper`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct IsoBand {
    pub lower: f32,
    pub upper: f32,
    pub geometry: MultiPolygon,
}

/// Marching-squares extraction over a fixed `column_count x row_count` lattice.
///
/// The extractor is a pure read of the values it is handed. Degenerate input (a value array of
/// the wrong length, a threshold sequence that is too short, not strictly monotonic, or contains
/// NaN) yields an empty result and a warning rather than an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContourExtractor {
    column_count: usize,
    row_count: usize,
}

impl ContourExtractor {
    pub fn new(column_count: usize, row_count: usize) -> Self {
        Self {
            column_count,
            row_count,
        }
    }

    pub fn for_grid(grid: &Grid) -> Self {
        Self::new(grid.column_count(), grid.row_count())
    }

    #[inline]
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// The multipolygon enclosing `{ value >= threshold }`.
    pub fn contour(&self, values: &[f32], threshold: f32) -> MultiPolygon {
        if !self.accepts(values) || threshold.is_nan() {
            return MultiPolygon::default();
        }
        assemble(self.rings(values, threshold))
    }

    /// One [`Contour`] per threshold, in the order given.
    pub fn contours(&self, values: &[f32], thresholds: &[f32]) -> Vec<Contour> {
        if !self.accepts(values) || !usable_levels(thresholds, 1) {
            return Vec::new();
        }
        thresholds
            .iter()
            .map(|&value| Contour {
                value,
                geometry: assemble(self.rings(values, value)),
            })
            .collect()
    }

    /// One [`IsoBand`] per adjacent pair of thresholds, in the order given.
    ///
    /// The thresholds may run in either direction; each band's `lower`/`upper` are normalized.
    pub fn isobands(&self, values: &[f32], thresholds: &[f32]) -> Vec<IsoBand> {
        if !self.accepts(values) || !usable_levels(thresholds, 2) {
            return Vec::new();
        }

        // Each threshold's rings feed two bands; trace them once.
        let rings: Vec<Vec<Ring>> = thresholds
            .iter()
            .map(|&t| self.rings(values, t))
            .collect();

        thresholds
            .windows(2)
            .zip(rings.windows(2))
            .map(|(levels, rings)| {
                let (lower, upper, below, above) = if levels[0] < levels[1] {
                    (levels[0], levels[1], &rings[0], &rings[1])
                } else {
                    (levels[1], levels[0], &rings[1], &rings[0])
                };

                // {v >= lower} minus {v >= upper}: the upper rings flip orientation, so its
                // exteriors become holes and its holes become islands. Rings traced identically
                // at both levels (runs along the grid border) cancel out.
                let mut above: Vec<&Ring> = above.iter().collect();
                let mut band: Vec<Ring> = Vec::with_capacity(below.len() + above.len());
                for ring in below {
                    match above.iter().position(|other| same_ring(other, ring)) {
                        Some(i) => {
                            above.swap_remove(i);
                        }
                        None => band.push(ring.clone()),
                    }
                }
                band.extend(
                    above
                        .into_iter()
                        .map(|ring| ring.iter().rev().copied().collect::<Ring>()),
                );

                IsoBand {
                    lower,
                    upper,
                    geometry: assemble(band),
                }
            })
            .collect()
    }

    fn rings(&self, values: &[f32], threshold: f32) -> Vec<Ring> {
        isorings(values, self.column_count, self.row_count, threshold)
    }

    fn accepts(&self, values: &[f32]) -> bool {
        let expected = self.column_count * self.row_count;
        if values.len() != expected {
            warn!(
                expected,
                actual = values.len(),
                "value array does not match the grid; skipping extraction"
            );
            return false;
        }
        true
    }
}

/// Whether two closed rings visit the same points in the same cyclic order.
fn same_ring(a: &Ring, b: &Ring) -> bool {
    if a.len() != b.len() || a.len() < 2 {
        return false;
    }
    let n = a.len() - 1;
    let (a, b) = (&a[..n], &b[..n]);
    let Some(offset) = b.iter().position(|p| *p == a[0]) else {
        return false;
    };
    (0..n).all(|i| a[i] == b[(i + offset) % n])
}

fn usable_levels(thresholds: &[f32], minimum: usize) -> bool {
    if thresholds.len() < minimum {
        if !thresholds.is_empty() {
            warn!(levels = thresholds.len(), "too few thresholds to form a band");
        }
        return false;
    }
    if thresholds.iter().any(|t| t.is_nan()) || threshold_ordering(thresholds).is_none() {
        warn!(?thresholds, "thresholds are not strictly monotonic");
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contour::polygon::{ring_contains_point, Containment};
    use glam::Vec2;

    /// Concentric pit: rim of 30, a ring of 20 around a floor of 0.
    #[rustfmt::skip]
    const PIT: [f32; 25] = [
        30.0, 30.0, 30.0, 30.0, 30.0,
        30.0, 20.0, 20.0, 20.0, 30.0,
        30.0, 20.0,  0.0, 20.0, 30.0,
        30.0, 20.0, 20.0, 20.0, 30.0,
        30.0, 30.0, 30.0, 30.0, 30.0,
    ];

    fn locate(band: &IsoBand, point: Vec2) -> bool {
        band.geometry.iter().any(|polygon| {
            ring_contains_point(polygon.exterior(), point) == Containment::Inside
                && polygon
                    .holes()
                    .iter()
                    .all(|hole| ring_contains_point(hole, point) == Containment::Outside)
        })
    }

    #[test]
    fn fewer_than_two_thresholds_yield_no_bands() {
        let extractor = ContourExtractor::new(5, 5);
        assert!(extractor.isobands(&PIT, &[]).is_empty());
        assert!(extractor.isobands(&PIT, &[10.0]).is_empty());
    }

    #[test]
    fn non_monotonic_thresholds_yield_no_bands() {
        let extractor = ContourExtractor::new(5, 5);
        assert!(extractor.isobands(&PIT, &[1.0, 25.0, 10.0]).is_empty());
        assert!(extractor.isobands(&PIT, &[1.0, 1.0]).is_empty());
        assert!(extractor.isobands(&PIT, &[1.0, f32::NAN]).is_empty());
    }

    #[test]
    fn mismatched_values_yield_nothing() {
        let extractor = ContourExtractor::new(4, 4);
        assert!(extractor.isobands(&PIT, &[1.0, 10.0]).is_empty());
        assert!(extractor.contours(&PIT, &[1.0]).is_empty());
        assert!(extractor.contour(&PIT, 1.0).is_empty());
    }

    #[test]
    fn bands_follow_threshold_order() {
        let extractor = ContourExtractor::new(5, 5);
        let ascending = extractor.isobands(&PIT, &[-1.0, 10.0, 25.0, 40.0]);
        let bounds: Vec<_> = ascending.iter().map(|b| (b.lower, b.upper)).collect();
        assert_eq!(bounds, vec![(-1.0, 10.0), (10.0, 25.0), (25.0, 40.0)]);

        let descending = extractor.isobands(&PIT, &[40.0, 25.0, 10.0, -1.0]);
        let bounds: Vec<_> = descending.iter().map(|b| (b.lower, b.upper)).collect();
        assert_eq!(bounds, vec![(25.0, 40.0), (10.0, 25.0), (-1.0, 10.0)]);
    }

    #[test]
    fn middle_band_is_an_annulus() {
        let extractor = ContourExtractor::new(5, 5);
        let bands = extractor.isobands(&PIT, &[-1.0, 10.0, 25.0, 40.0]);
        let middle = &bands[1];
        assert_eq!(middle.geometry.len(), 1);
        assert_eq!(middle.geometry.polygons[0].holes().len(), 1);

        let center = Vec2::new(2.5, 2.5);
        let ring_cell = Vec2::new(1.5, 2.5);
        let rim_cell = Vec2::new(0.5, 0.5);
        assert!(locate(&bands[0], center));
        assert!(locate(middle, ring_cell));
        assert!(!locate(middle, center));
        assert!(!locate(middle, rim_cell));
        assert!(locate(&bands[2], rim_cell));
    }

    #[test]
    fn band_areas_partition_the_traced_extent() {
        let extractor = ContourExtractor::new(5, 5);
        let bands = extractor.isobands(&PIT, &[-1.0, 10.0, 25.0, 40.0]);
        let total: f64 = bands.iter().map(|b| b.geometry.area()).sum();
        let whole = extractor.contour(&PIT, -1.0).area();
        assert!((total - whole).abs() < 1e-3, "{total} vs {whole}");
    }

    #[test]
    fn contours_are_superlevel_sets() {
        let extractor = ContourExtractor::new(5, 5);
        let contours = extractor.contours(&PIT, &[25.0, 10.0]);
        assert_eq!(contours.len(), 2);
        assert_eq!(contours[0].value, 25.0);
        // The rim: one polygon with the inner 3x3 block cut out.
        assert_eq!(contours[0].geometry.len(), 1);
        assert_eq!(contours[0].geometry.polygons[0].holes().len(), 1);
        // Everything but the floor.
        assert_eq!(contours[1].geometry.polygons[0].holes().len(), 1);
        assert!(contours[1].geometry.area() > contours[0].geometry.area());
    }

    #[test]
    fn single_threshold_contour_is_allowed() {
        let extractor = ContourExtractor::new(5, 5);
        assert_eq!(extractor.contours(&PIT, &[10.0]).len(), 1);
        assert!(extractor.contours(&PIT, &[]).is_empty());
    }
}
