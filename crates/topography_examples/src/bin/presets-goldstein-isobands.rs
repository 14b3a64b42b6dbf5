use glam::Vec2;
use topography::prelude::*;
use topography_examples::{init_tracing, render_isobands_to_png, Palette, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // The Goldstein-Price surface spans several orders of magnitude, so its
    // thresholds are powers of two.
    let canvas = Vec2::new(800.0, 600.0);
    let config = TopographyConfig::new(canvas)
        .with_scale(8.0)
        .with_preset(Preset::Goldstein);
    let topo = Topography::try_new(config)?;

    let bands = topo.canvas_isobands();
    tracing::info!(
        bands = bands.len(),
        min = topo.field().min(),
        max = topo.field().max(),
        "extracted goldstein isobands"
    );

    let rc = RenderConfig::new((1200, 900), canvas)
        .with_palette(Palette::Ramp {
            low: [18, 40, 72],
            high: [250, 220, 150],
        })
        .with_outline([20, 20, 20]);
    render_isobands_to_png(&bands, &rc, "presets-goldstein-isobands.png")?;

    Ok(())
}
