//! Marching-squares ring tracing over a row-major scalar grid.
//!
//! For a threshold `t`, [`isorings`] traces the closed boundaries of the region where
//! `value >= t`. Out-of-grid samples count as below the threshold, so every ring is closed.
//! Segments are emitted per 2x2 window and stitched into rings as they arrive; vertices are then
//! moved along their edge by linear interpolation between the two adjacent samples.
//!
//! Exterior rings come out with positive [`ring_area`](super::polygon::ring_area), holes with
//! negative area.
use std::collections::{HashMap, VecDeque};

use glam::Vec2;

use super::polygon::Ring;

/// Vertex key in doubled grid coordinates (`2x`, `2y`); every vertex sits on an edge midpoint.
type Key = (i32, i32);

/// Segments per marching-squares case, in doubled coordinates relative to the window origin.
/// Case bits: 1 = bottom-left, 2 = bottom-right, 4 = top-right, 8 = top-left.
const CASES: [&[[Key; 2]]; 16] = [
    &[],
    &[[(2, 3), (1, 2)]],
    &[[(3, 2), (2, 3)]],
    &[[(3, 2), (1, 2)]],
    &[[(2, 1), (3, 2)]],
    &[[(2, 3), (1, 2)], [(2, 1), (3, 2)]],
    &[[(2, 1), (2, 3)]],
    &[[(2, 1), (1, 2)]],
    &[[(1, 2), (2, 1)]],
    &[[(2, 3), (2, 1)]],
    &[[(1, 2), (2, 1)], [(3, 2), (2, 3)]],
    &[[(3, 2), (2, 1)]],
    &[[(1, 2), (3, 2)]],
    &[[(2, 3), (3, 2)]],
    &[[(1, 2), (2, 3)]],
    &[],
];

/// Traces the boundaries of `{ value >= threshold }` on a `dx x dy` grid.
///
/// `values.len()` must equal `dx * dy`.
pub fn isorings(values: &[f32], dx: usize, dy: usize, threshold: f32) -> Vec<Ring> {
    debug_assert_eq!(values.len(), dx * dy, "values must cover the grid");
    if dx == 0 || dy == 0 {
        return Vec::new();
    }

    let above = |x: isize, y: isize| -> usize {
        let inside = x >= 0 && y >= 0 && (x as usize) < dx && (y as usize) < dy;
        (inside && values[y as usize * dx + x as usize] >= threshold) as usize
    };

    let mut tracer = RingTracer::default();
    for y in -1..dy as isize {
        for x in -1..dx as isize {
            let case = above(x, y + 1)
                | above(x + 1, y + 1) << 1
                | above(x + 1, y) << 2
                | above(x, y) << 3;
            let (ox, oy) = (2 * x as i32, 2 * y as i32);
            for [start, end] in CASES[case] {
                tracer.stitch((start.0 + ox, start.1 + oy), (end.0 + ox, end.1 + oy));
            }
        }
    }

    tracer
        .rings
        .into_iter()
        .map(|ring| {
            ring.into_iter()
                .map(|key| interpolate_vertex(key, values, dx, dy, threshold))
                .collect()
        })
        .collect()
}

struct Fragment {
    start: Key,
    end: Key,
    points: VecDeque<Key>,
}

#[derive(Default)]
struct RingTracer {
    fragments: Vec<Option<Fragment>>,
    by_start: HashMap<Key, usize>,
    by_end: HashMap<Key, usize>,
    rings: Vec<Vec<Key>>,
}

impl RingTracer {
    fn stitch(&mut self, start: Key, end: Key) {
        if let Some(&f) = self.by_end.get(&start) {
            self.by_end.remove(&start);
            if let Some(&g) = self.by_start.get(&end) {
                self.by_start.remove(&end);
                if f == g {
                    if let Some(mut fragment) = self.fragments[f].take() {
                        fragment.points.push_back(end);
                        self.rings.push(fragment.points.into());
                    }
                } else if let (Some(head), Some(tail)) =
                    (self.fragments[f].take(), self.fragments[g].take())
                {
                    let mut points = head.points;
                    points.extend(tail.points);
                    self.insert(Fragment {
                        start: head.start,
                        end: tail.end,
                        points,
                    });
                }
            } else if let Some(fragment) = self.fragments[f].as_mut() {
                fragment.points.push_back(end);
                fragment.end = end;
                self.by_end.insert(end, f);
            }
        } else if let Some(&f) = self.by_start.get(&end) {
            self.by_start.remove(&end);
            if let Some(fragment) = self.fragments[f].as_mut() {
                fragment.points.push_front(start);
                fragment.start = start;
                self.by_start.insert(start, f);
            }
        } else {
            self.insert(Fragment {
                start,
                end,
                points: VecDeque::from([start, end]),
            });
        }
    }

    fn insert(&mut self, fragment: Fragment) {
        let id = self.fragments.len();
        self.by_start.insert(fragment.start, id);
        self.by_end.insert(fragment.end, id);
        self.fragments.push(Some(fragment));
    }
}

/// Converts a doubled-coordinate vertex to grid space, sliding it along its edge to where the
/// linear interpolation of the two adjacent samples crosses `threshold`.
fn interpolate_vertex(key: Key, values: &[f32], dx: usize, dy: usize, threshold: f32) -> Vec2 {
    let (x2, y2) = key;
    let mut p = Vec2::new(x2 as f32 * 0.5, y2 as f32 * 0.5);

    // Vertical edge between samples (xt - 1, yt) and (xt, yt).
    if x2 % 2 == 0 {
        let (xt, yt) = (x2 / 2, y2.div_euclid(2));
        if xt > 0 && (xt as usize) < dx && yt >= 0 && (yt as usize) < dy {
            let row = yt as usize * dx;
            let v0 = sample(values[row + xt as usize - 1]);
            let v1 = sample(values[row + xt as usize]);
            p.x = slide(p.x, v0, v1, threshold);
        }
    }

    // Horizontal edge between samples (xt, yt - 1) and (xt, yt).
    if y2 % 2 == 0 {
        let (xt, yt) = (x2.div_euclid(2), y2 / 2);
        if yt > 0 && (yt as usize) < dy && xt >= 0 && (xt as usize) < dx {
            let v0 = sample(values[(yt as usize - 1) * dx + xt as usize]);
            let v1 = sample(values[yt as usize * dx + xt as usize]);
            p.y = slide(p.y, v0, v1, threshold);
        }
    }

    p
}

#[inline]
fn sample(v: f32) -> f32 {
    if v.is_nan() {
        f32::NEG_INFINITY
    } else {
        v
    }
}

#[inline]
fn slide(x: f32, v0: f32, v1: f32, threshold: f32) -> f32 {
    let a = threshold - v0;
    let b = v1 - v0;
    let d = if a.is_finite() || b.is_finite() {
        a / b
    } else {
        a.signum() / b.signum()
    };
    if d.is_nan() {
        x
    } else {
        x + d - 0.5
    }
}
