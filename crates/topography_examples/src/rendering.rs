use std::path::Path;

use glam::Vec2;
use image::{Rgb, RgbImage};
use topography::contour::{Contour, IsoBand, MultiPolygon};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Fill colors assigned to bands from lowest to highest.
#[derive(Clone, Debug)]
pub enum Palette {
    /// Linear blend between two colors.
    Ramp { low: [u8; 3], high: [u8; 3] },
    /// Explicit colors, cycled if there are more bands than entries.
    Fixed(Vec<[u8; 3]>),
}

impl Palette {
    pub fn color(&self, index: usize, count: usize) -> [u8; 3] {
        match self {
            Palette::Ramp { low, high } => {
                let t = if count <= 1 {
                    0.0
                } else {
                    index as f32 / (count - 1) as f32
                };
                let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
                [
                    mix(low[0], high[0]),
                    mix(low[1], high[1]),
                    mix(low[2], high[2]),
                ]
            }
            Palette::Fixed(colors) if colors.is_empty() => [0, 0, 0],
            Palette::Fixed(colors) => colors[index % colors.len()],
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette::Ramp {
            low: [24, 52, 88],
            high: [246, 232, 196],
        }
    }
}

#[derive(Clone, Debug)]
pub struct RenderConfig {
    /// Output size in pixels.
    pub image_size: (u32, u32),
    /// Canvas extent the geometry is expressed in.
    pub canvas_size: Vec2,
    pub background: [u8; 3],
    pub palette: Palette,
    /// Ring outline color; `None` draws fills only.
    pub outline: Option<[u8; 3]>,
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32), canvas_size: Vec2) -> Self {
        Self {
            image_size,
            canvas_size,
            background: [250, 250, 250],
            palette: Palette::default(),
            outline: None,
        }
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_outline(mut self, outline: [u8; 3]) -> Self {
        self.outline = Some(outline);
        self
    }

    fn to_image(&self) -> Vec2 {
        Vec2::new(
            self.image_size.0 as f32 / self.canvas_size.x,
            self.image_size.1 as f32 / self.canvas_size.y,
        )
    }
}

/// Paints each band with its palette color (lowest band first) and writes a PNG.
pub fn render_isobands_to_png(
    bands: &[IsoBand],
    rc: &RenderConfig,
    out_path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let mut order: Vec<&IsoBand> = bands.iter().collect();
    order.sort_by(|a, b| a.lower.total_cmp(&b.lower));

    let mut img = blank(rc);
    for (i, band) in order.iter().enumerate() {
        fill(&mut img, &band.geometry, rc, rc.palette.color(i, order.len()));
    }
    if let Some(color) = rc.outline {
        for band in &order {
            stroke(&mut img, &band.geometry, rc, color);
        }
    }
    save(img, out_path.as_ref())
}

/// Paints contours stacked from the lowest level up, so higher regions cover lower ones.
pub fn render_contours_to_png(
    contours: &[Contour],
    rc: &RenderConfig,
    out_path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let mut order: Vec<&Contour> = contours.iter().collect();
    order.sort_by(|a, b| a.value.total_cmp(&b.value));

    let mut img = blank(rc);
    for (i, contour) in order.iter().enumerate() {
        fill(&mut img, &contour.geometry, rc, rc.palette.color(i, order.len()));
        if let Some(color) = rc.outline {
            stroke(&mut img, &contour.geometry, rc, color);
        }
    }
    save(img, out_path.as_ref())
}

fn blank(rc: &RenderConfig) -> RgbImage {
    let (w, h) = rc.image_size;
    RgbImage::from_pixel(w, h, Rgb(rc.background))
}

fn save(img: RgbImage, path: &Path) -> anyhow::Result<()> {
    img.save(path)?;
    info!(path = %path.display(), "wrote image");
    Ok(())
}

/// Even-odd scanline fill of every polygon (exterior and holes together).
fn fill(img: &mut RgbImage, geometry: &MultiPolygon, rc: &RenderConfig, color: [u8; 3]) {
    let scale = rc.to_image();
    let (w, h) = img.dimensions();
    let mut crossings: Vec<f32> = Vec::new();

    for polygon in geometry {
        let edges: Vec<(Vec2, Vec2)> = polygon
            .rings
            .iter()
            .flat_map(|ring| ring.windows(2).map(|e| (e[0] * scale, e[1] * scale)))
            .collect();
        let Some((y_min, y_max)) = edges.iter().fold(None, |acc: Option<(f32, f32)>, (a, b)| {
            let (lo, hi) = (a.y.min(b.y), a.y.max(b.y));
            Some(acc.map_or((lo, hi), |(l, u)| (l.min(lo), u.max(hi))))
        }) else {
            continue;
        };

        let first_row = y_min.floor().max(0.0) as u32;
        let last_row = (y_max.ceil() as u32).min(h);
        for py in first_row..last_row {
            let yc = py as f32 + 0.5;
            crossings.clear();
            for (a, b) in &edges {
                if (a.y > yc) != (b.y > yc) {
                    crossings.push(a.x + (yc - a.y) * (b.x - a.x) / (b.y - a.y));
                }
            }
            crossings.sort_by(f32::total_cmp);
            for span in crossings.chunks_exact(2) {
                let start = (span[0] - 0.5).ceil().max(0.0) as u32;
                let end = ((span[1] - 0.5).ceil().max(0.0) as u32).min(w);
                for px in start..end {
                    img.put_pixel(px, py, Rgb(color));
                }
            }
        }
    }
}

fn stroke(img: &mut RgbImage, geometry: &MultiPolygon, rc: &RenderConfig, color: [u8; 3]) {
    let scale = rc.to_image();
    let (w, h) = img.dimensions();
    for polygon in geometry {
        for ring in &polygon.rings {
            for edge in ring.windows(2) {
                let (a, b) = (edge[0] * scale, edge[1] * scale);
                let steps = (b - a).abs().max_element().ceil().max(1.0) as u32;
                for s in 0..=steps {
                    let p = a.lerp(b, s as f32 / steps as f32);
                    let (x, y) = (p.x.floor(), p.y.floor());
                    if x >= 0.0 && y >= 0.0 && (x as u32) < w && (y as u32) < h {
                        img.put_pixel(x as u32, y as u32, Rgb(color));
                    }
                }
            }
        }
    }
}
