use std::time::{Duration, Instant};

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use topography::prelude::*;
use topography_examples::{init_tracing, render_isobands_to_png, RenderConfig};

const FRAME: Duration = Duration::from_millis(16);

fn main() -> anyhow::Result<()> {
    init_tracing();

    let canvas = Vec2::new(900.0, 600.0);
    let config = TopographyConfig::new(canvas)
        .with_scale(15.0)
        .with_force(12.0);
    let mut topo = Topography::try_new(config)?;

    // Simulated pointer: a jittered figure-eight, with a few pauses where the
    // resting force takes over and decays.
    let mut rng = StdRng::seed_from_u64(42);
    let mut raised = 0usize;
    let mut sink = FnSink::new(|event| {
        if let TopographyEvent::Raised { .. } = event {
            raised += 1;
        }
    });

    let start = Instant::now();
    let mut now = start;
    for i in 0..1500u32 {
        let t = i as f32 / 1500.0 * std::f32::consts::TAU * 2.0;
        let jitter = Vec2::new(unit(&mut rng), unit(&mut rng)) * 6.0;
        let point = canvas * 0.5 + Vec2::new(t.sin() * 360.0, (2.0 * t).sin() * 200.0) + jitter;

        if i % 300 != 0 {
            topo.pointer_moved(point, now);
        }
        topo.poll(now, &mut sink);
        now += FRAME;
    }
    topo.pointer_left();
    drop(sink);

    tracing::info!(
        raised,
        min = topo.field().min(),
        max = topo.field().max(),
        elapsed_ms = now.duration_since(start).as_millis() as u64,
        "simulated pointer trail"
    );

    let rc = RenderConfig::new((1350, 900), canvas).with_outline([40, 40, 40]);
    render_isobands_to_png(&topo.canvas_isobands(), &rc, "interaction-pointer-trail.png")?;

    // Same trail on a finer grid starts from scratch.
    topo.reset(Some(7.5), &mut ())?;
    tracing::info!(
        columns = topo.grid().column_count(),
        rows = topo.grid().row_count(),
        "rebuilt grid"
    );

    Ok(())
}

/// Uniform sample in [-1, 1).
fn unit(rng: &mut impl RngCore) -> f32 {
    (rng.next_u32() as f64 / u32::MAX as f64 * 2.0 - 1.0) as f32
}
