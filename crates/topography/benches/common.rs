use std::time::Duration;

use criterion::{Criterion, Throughput};
use glam::Vec2;
use topography::field::Grid;

/// Square canvas sizes (pixels) benchmarked at [`BENCH_SCALE`].
pub const CANVAS_SIZES: [f32; 3] = [400.0, 1000.0, 2000.0];
pub const BENCH_SCALE: f32 = 20.0;

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(30)
        .warm_up_time(Duration::from_millis(500))
        .measurement_time(Duration::from_secs(2))
}

pub fn bench_grid(canvas: f32) -> Grid {
    Grid::new(Vec2::splat(canvas), BENCH_SCALE).expect("valid bench grid")
}

pub fn cells_throughput(grid: &Grid) -> Throughput {
    Throughput::Elements(grid.cell_count().max(1) as u64)
}
