//! Presets selecting how a field is initialized and which thresholds slice it.
use std::fmt;
use std::str::FromStr;

use rand::RngCore;

use crate::error::Error;

/// Height every cell holds after an `Empty` initialization or a reset.
pub const FILL_VALUE: f32 = 10.0;

/// Upper bound of the `Random` preset's height range.
pub const RANDOM_RANGE: f32 = 100.0;

/// Named initialization/threshold strategy.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Preset {
    /// Constant fill of [`FILL_VALUE`].
    #[default]
    Empty,
    /// Clamped normal noise in `[0, RANDOM_RANGE]`.
    Random,
    /// Each cell holds its own row-major index.
    Gradient,
    /// Goldstein–Price test function sampled over `x ∈ [-2, 2]`, `y ∈ [-2, 1]`.
    Goldstein,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::Empty,
        Preset::Random,
        Preset::Gradient,
        Preset::Goldstein,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Empty => "empty",
            Preset::Random => "random",
            Preset::Gradient => "gradient",
            Preset::Goldstein => "goldstein",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownPreset { name: s.to_owned() })
    }
}

/// The Goldstein–Price function.
pub fn goldstein_price(x: f64, y: f64) -> f64 {
    let a = 1.0
        + (x + y + 1.0).powi(2)
            * (19.0 - 14.0 * x + 3.0 * x * x - 14.0 * y + 6.0 * x * y + 3.0 * y * y);
    let b = 30.0
        + (2.0 * x - 3.0 * y).powi(2)
            * (18.0 - 32.0 * x + 12.0 * x * x + 48.0 * y - 36.0 * x * y + 27.0 * y * y);
    a * b
}

/// Goldstein–Price height of the cell `(column, row)` in a `columns x rows` lattice.
///
/// Cell centers are mapped onto `x = i/n*4-2`, `y = 1-j/m*3` with `i = column + 0.5`,
/// `j = row + 0.5`.
pub fn goldstein_height(column: usize, row: usize, columns: usize, rows: usize) -> f32 {
    let i = column as f64 + 0.5;
    let j = row as f64 + 0.5;
    let x = i / columns as f64 * 4.0 - 2.0;
    let y = 1.0 - j / rows as f64 * 3.0;
    goldstein_price(x, y) as f32
}

/// Draws a height in `[0, RANDOM_RANGE]` from a normal distribution centred on the middle of
/// the range (σ = 0.1 of the range), resampling values outside it.
pub fn sample_random_height(rng: &mut dyn RngCore) -> f32 {
    loop {
        let u = open01(rng);
        let v = open01(rng);
        let n = (-2.0 * u.ln()).sqrt() * (std::f64::consts::TAU * v).cos();
        let n = n / 10.0 + 0.5;
        if (0.0..=1.0).contains(&n) {
            return (n as f32) * RANDOM_RANGE;
        }
    }
}

/// Uniform sample in the open interval `(0, 1)`.
#[inline]
fn open01(rng: &mut dyn RngCore) -> f64 {
    loop {
        let u = (rng.next_u32() as f64) / ((u32::MAX as f64) + 1.0);
        if u > 0.0 {
            return u;
        }
    }
}
