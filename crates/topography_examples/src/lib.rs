#![forbid(unsafe_code)]

mod rendering;

pub use rendering::{
    init_tracing, render_contours_to_png, render_isobands_to_png, Palette, RenderConfig,
};
