use std::time::Duration;

use glam::Vec2;

use crate::error::{Error, Result};
use crate::field::{ExtremaTracking, Preset, DEFAULT_DENSITY};

/// Default simplification factor (canvas pixels per cell).
pub const DEFAULT_SCALE: f32 = 20.0;
/// Default height added to the hovered cell per tick while the pointer moves.
pub const DEFAULT_FORCE: f32 = 8.0;
/// Default dwell after which a resting pointer stops raising its cell.
pub const DEFAULT_DECAY: Duration = Duration::from_millis(2000);
/// Default interval between scheduled updates.
pub const DEFAULT_PING: Duration = Duration::from_millis(15);

/// Configuration for a [`Topography`](crate::session::Topography) session.
#[non_exhaustive]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TopographyConfig {
    /// Canvas size in pixels.
    pub canvas_size: Vec2,
    /// Canvas pixels per grid cell.
    pub scale: f32,
    /// Initialization and threshold preset.
    pub preset: Preset,
    /// Base force applied per tick.
    pub force: f32,
    /// Dwell window over which a resting pointer's force fades to zero.
    pub decay: Duration,
    /// Interval between scheduled updates.
    pub ping: Duration,
    /// Divisor for the share of a raise given to neighbouring cells.
    pub density: f32,
    /// Seed of the session RNG used by [`Preset::Random`].
    pub seed: u64,
    /// Running min/max policy of the field.
    pub extrema: ExtremaTracking,
}

impl Default for TopographyConfig {
    fn default() -> Self {
        Self {
            canvas_size: Vec2::ZERO,
            scale: DEFAULT_SCALE,
            preset: Preset::Empty,
            force: DEFAULT_FORCE,
            decay: DEFAULT_DECAY,
            ping: DEFAULT_PING,
            density: DEFAULT_DENSITY,
            seed: 0,
            extrema: ExtremaTracking::default(),
        }
    }
}

impl TopographyConfig {
    /// Creates a new [`TopographyConfig`] for a canvas of the given size.
    pub fn new(canvas_size: Vec2) -> Self {
        Self {
            canvas_size,
            ..Default::default()
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.preset = preset;
        self
    }

    pub fn with_force(mut self, force: f32) -> Self {
        self.force = force;
        self
    }

    pub fn with_decay(mut self, decay: Duration) -> Self {
        self.decay = decay;
        self
    }

    pub fn with_ping(mut self, ping: Duration) -> Self {
        self.ping = ping;
        self
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_extrema_tracking(mut self, extrema: ExtremaTracking) -> Self {
        self.extrema = extrema;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !self.canvas_size.is_finite() || self.canvas_size.x <= 0.0 || self.canvas_size.y <= 0.0
        {
            return Err(Error::InvalidConfig(
                "canvas_size must be > 0 in both components".into(),
            ));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(Error::InvalidConfig("scale must be > 0".into()));
        }
        if !self.force.is_finite() {
            return Err(Error::InvalidConfig("force must be finite".into()));
        }
        if !self.density.is_finite() || self.density <= 0.0 {
            return Err(Error::InvalidConfig("density must be > 0".into()));
        }
        if self.ping.is_zero() {
            return Err(Error::InvalidConfig("ping must be > 0".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = TopographyConfig::new(Vec2::new(800.0, 600.0));
        assert_eq!(config.scale, 20.0);
        assert_eq!(config.force, 8.0);
        assert_eq!(config.decay, Duration::from_millis(2000));
        assert_eq!(config.ping, Duration::from_millis(15));
        assert_eq!(config.density, 4.0);
        assert_eq!(config.preset, Preset::Empty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_sets_fields() {
        let config = TopographyConfig::new(Vec2::new(100.0, 100.0))
            .with_scale(5.0)
            .with_preset(Preset::Goldstein)
            .with_force(3.0)
            .with_decay(Duration::from_secs(1))
            .with_ping(Duration::from_millis(30))
            .with_density(2.0)
            .with_seed(42)
            .with_extrema_tracking(ExtremaTracking::CenterOnly);
        assert_eq!(config.scale, 5.0);
        assert_eq!(config.preset, Preset::Goldstein);
        assert_eq!(config.seed, 42);
        assert_eq!(config.extrema, ExtremaTracking::CenterOnly);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let base = TopographyConfig::new(Vec2::new(100.0, 100.0));
        assert!(TopographyConfig::default().validate().is_err());
        assert!(base.clone().with_scale(0.0).validate().is_err());
        assert!(base.clone().with_scale(f32::INFINITY).validate().is_err());
        assert!(base.clone().with_density(0.0).validate().is_err());
        assert!(base.clone().with_force(f32::NAN).validate().is_err());
        assert!(base.clone().with_ping(Duration::ZERO).validate().is_err());
        assert!(matches!(
            base.with_scale(-1.0).validate(),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn zero_decay_is_allowed() {
        let config = TopographyConfig::new(Vec2::new(10.0, 10.0)).with_decay(Duration::ZERO);
        assert!(config.validate().is_ok());
    }
}
