use glam::Vec2;
use topography::prelude::*;
use topography_examples::{init_tracing, render_contours_to_png, Palette, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let canvas = Vec2::new(640.0, 640.0);
    let config = TopographyConfig::new(canvas)
        .with_scale(16.0)
        .with_preset(Preset::Random)
        .with_seed(7);
    let mut topo = Topography::try_new(config)?;

    // Render the raw noise, then the same field after a few smoothing sweeps.
    let rc = RenderConfig::new((960, 960), canvas).with_palette(Palette::Fixed(vec![
        [30, 60, 90],
        [50, 90, 120],
        [80, 120, 140],
        [120, 150, 150],
        [160, 175, 155],
        [195, 195, 160],
        [220, 205, 165],
        [235, 215, 180],
        [245, 230, 205],
        [252, 245, 235],
    ]));
    render_contours_to_png(&topo.canvas_contours(), &rc, "presets-random-contours-raw.png")?;

    let grid = *topo.grid();
    for _ in 0..3 {
        for row in 0..grid.row_count() {
            for column in 0..grid.column_count() {
                let centre = grid.cell_to_canvas(Vec2::new(column as f32 + 0.5, row as f32 + 0.5));
                topo.raise_at_point(centre, 0.0, &mut ());
            }
        }
    }
    render_contours_to_png(
        &topo.canvas_contours(),
        &rc,
        "presets-random-contours-smoothed.png",
    )?;

    Ok(())
}
