//! Polygon geometry produced by contour extraction.
//!
//! Coordinates are in grid space: `x ∈ [0, column_count]`, `y ∈ [0, row_count]`, with the value
//! of cell `(i, j)` sitting at the centre `(i + 0.5, j + 0.5)`. Rings are closed (the first point
//! is repeated at the end).
use glam::Vec2;

/// Closed sequence of grid-space points.
pub type Ring = Vec<Vec2>;

/// Exterior ring followed by zero or more hole rings.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    pub rings: Vec<Ring>,
}

impl Polygon {
    pub fn new(exterior: Ring) -> Self {
        Self {
            rings: vec![exterior],
        }
    }

    /// The outer boundary (ring 0).
    pub fn exterior(&self) -> &[Vec2] {
        self.rings.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Rings 1..n.
    pub fn holes(&self) -> &[Ring] {
        self.rings.get(1..).unwrap_or(&[])
    }

    /// Enclosed area with holes subtracted.
    pub fn area(&self) -> f64 {
        let mut rings = self.rings.iter();
        let Some(exterior) = rings.next() else {
            return 0.0;
        };
        let outer = ring_area(exterior).abs();
        let holes: f64 = rings.map(|r| ring_area(r).abs()).sum();
        (outer - holes) * 0.5
    }
}

/// Set of polygons making up one contour or band.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultiPolygon {
    pub polygons: Vec<Polygon>,
}

impl MultiPolygon {
    #[inline]
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Polygon> {
        self.polygons.iter()
    }

    /// Total enclosed area of all polygons.
    pub fn area(&self) -> f64 {
        self.polygons.iter().map(Polygon::area).sum()
    }

    /// Returns a copy with every point passed through `f` (e.g. grid → canvas space).
    pub fn map_points(&self, mut f: impl FnMut(Vec2) -> Vec2) -> MultiPolygon {
        MultiPolygon {
            polygons: self
                .polygons
                .iter()
                .map(|polygon| Polygon {
                    rings: polygon
                        .rings
                        .iter()
                        .map(|ring| ring.iter().map(|p| f(*p)).collect())
                        .collect(),
                })
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a MultiPolygon {
    type Item = &'a Polygon;
    type IntoIter = std::slice::Iter<'a, Polygon>;

    fn into_iter(self) -> Self::IntoIter {
        self.polygons.iter()
    }
}

/// Twice the signed area of a ring. Exteriors traced by the extractor are positive, holes
/// negative.
pub fn ring_area(ring: &[Vec2]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0f64;
    let mut prev = ring[n - 1];
    for &p in ring {
        area += prev.y as f64 * p.x as f64 - prev.x as f64 * p.y as f64;
        prev = p;
    }
    area
}

/// Where a point lies relative to a ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Containment {
    Outside,
    Boundary,
    Inside,
}

/// Even-odd point-in-ring test. Points on an edge report [`Containment::Boundary`].
pub fn ring_contains_point(ring: &[Vec2], point: Vec2) -> Containment {
    let n = ring.len();
    if n == 0 {
        return Containment::Outside;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (ring[i], ring[j]);
        if segment_contains(pi, pj, point) {
            return Containment::Boundary;
        }
        if (pi.y > point.y) != (pj.y > point.y)
            && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    if inside {
        Containment::Inside
    } else {
        Containment::Outside
    }
}

/// Whether `hole` lies inside `ring`, decided by the first hole point not on the boundary.
/// A hole lying entirely on the boundary counts as contained.
pub fn ring_contains_ring(ring: &[Vec2], hole: &[Vec2]) -> bool {
    for &p in hole {
        match ring_contains_point(ring, p) {
            Containment::Boundary => continue,
            Containment::Inside => return true,
            Containment::Outside => return false,
        }
    }
    true
}

fn segment_contains(a: Vec2, b: Vec2, c: Vec2) -> bool {
    let collinear = (b.x - a.x) * (c.y - a.y) == (c.x - a.x) * (b.y - a.y);
    if !collinear {
        return false;
    }
    if a.x == b.x {
        within(a.y, c.y, b.y)
    } else {
        within(a.x, c.x, b.x)
    }
}

#[inline]
fn within(p: f32, q: f32, r: f32) -> bool {
    (p <= q && q <= r) || (r <= q && q <= p)
}

/// Sorts rings into polygons: positive rings become exteriors, negative rings become holes of
/// the smallest exterior that contains them. Holes with no containing exterior are dropped.
pub(crate) fn assemble(rings: Vec<Ring>) -> MultiPolygon {
    let mut exteriors: Vec<(f64, Ring)> = Vec::new();
    let mut holes: Vec<Ring> = Vec::new();

    for ring in rings {
        let area = ring_area(&ring);
        if area > 0.0 {
            exteriors.push((area, ring));
        } else if area < 0.0 {
            holes.push(ring);
        }
    }

    let mut polygons: Vec<Polygon> = exteriors
        .iter()
        .map(|(_, ring)| Polygon::new(ring.clone()))
        .collect();

    for hole in holes {
        let owner = exteriors
            .iter()
            .enumerate()
            .filter(|(_, (_, ring))| ring_contains_ring(ring, &hole))
            .min_by(|(_, (a, _)), (_, (b, _))| a.total_cmp(b))
            .map(|(i, _)| i);
        if let Some(i) = owner {
            polygons[i].rings.push(hole);
        }
    }

    MultiPolygon { polygons }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f32, y0: f32, size: f32) -> Ring {
        // Positive under `ring_area`, i.e. an exterior.
        vec![
            Vec2::new(x0, y0),
            Vec2::new(x0, y0 + size),
            Vec2::new(x0 + size, y0 + size),
            Vec2::new(x0 + size, y0),
            Vec2::new(x0, y0),
        ]
    }

    fn reversed(mut ring: Ring) -> Ring {
        ring.reverse();
        ring
    }

    #[test]
    fn area_sign_follows_orientation() {
        let ring = square(0.0, 0.0, 2.0);
        assert_eq!(ring_area(&ring), 8.0);
        assert_eq!(ring_area(&reversed(ring)), -8.0);
    }

    #[test]
    fn point_containment() {
        let ring = square(0.0, 0.0, 4.0);
        assert_eq!(
            ring_contains_point(&ring, Vec2::new(2.0, 2.0)),
            Containment::Inside
        );
        assert_eq!(
            ring_contains_point(&ring, Vec2::new(4.0, 1.0)),
            Containment::Boundary
        );
        assert_eq!(
            ring_contains_point(&ring, Vec2::new(5.0, 1.0)),
            Containment::Outside
        );
    }

    #[test]
    fn assemble_nests_holes_into_smallest_exterior() {
        // outer ⊃ hole_a ⊃ island ⊃ hole_b
        let outer = square(0.0, 0.0, 10.0);
        let hole_a = reversed(square(1.0, 1.0, 8.0));
        let island = square(3.0, 3.0, 4.0);
        let hole_b = reversed(square(4.0, 4.0, 2.0));

        let mp = assemble(vec![hole_b, outer, island, hole_a]);
        assert_eq!(mp.len(), 2);
        let big = mp
            .iter()
            .find(|p| ring_area(p.exterior()) == 200.0)
            .unwrap();
        let small = mp
            .iter()
            .find(|p| ring_area(p.exterior()) == 32.0)
            .unwrap();
        assert_eq!(big.holes().len(), 1);
        assert_eq!(ring_area(&big.holes()[0]), -128.0);
        assert_eq!(small.holes().len(), 1);
        assert_eq!(ring_area(&small.holes()[0]), -8.0);
        assert_eq!(mp.area(), 100.0 - 64.0 + 16.0 - 4.0);
    }

    #[test]
    fn orphan_holes_are_dropped() {
        let mp = assemble(vec![reversed(square(0.0, 0.0, 3.0))]);
        assert!(mp.is_empty());
    }

    #[test]
    fn map_points_transforms_every_ring() {
        let mut polygon = Polygon::new(square(0.0, 0.0, 1.0));
        polygon.rings.push(reversed(square(0.25, 0.25, 0.5)));
        let mp = MultiPolygon {
            polygons: vec![polygon],
        };
        let scaled = mp.map_points(|p| p * 10.0);
        assert_eq!(scaled.polygons[0].exterior()[2], Vec2::new(10.0, 10.0));
        assert_eq!(scaled.polygons[0].holes()[0][0], Vec2::new(2.5, 2.5));
    }
}
