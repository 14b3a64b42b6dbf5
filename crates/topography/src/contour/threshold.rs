//! Threshold sequences per preset.
//!
//! A threshold set is never stored; [`ThresholdPolicy::thresholds`] derives it from a
//! [`FieldSummary`] every time contours are extracted.
use tracing::debug;

use crate::error::{Error, Result};
use crate::field::{Preset, ScalarField};

/// Spacing between levels of the [`Preset::Empty`] policy.
pub const CONTOUR_INTERVAL: f32 = 20.0;

/// Upper bound on the number of interval levels; the interval is widened beyond it.
const MAX_INTERVAL_LEVELS: f32 = 4096.0;

/// The parts of a field the policies depend on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldSummary {
    pub min: f32,
    pub max: f32,
    pub cell_count: usize,
}

impl FieldSummary {
    pub fn of(field: &ScalarField) -> Self {
        Self {
            min: field.min(),
            max: field.max(),
            cell_count: field.grid().cell_count(),
        }
    }
}

/// Direction of a strictly monotonic threshold sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThresholdOrder {
    Ascending,
    Descending,
}

/// Strategy producing the ordered threshold levels for a field.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub enum ThresholdPolicy {
    /// Levels `base, base + interval, ...` covering the field range, returned in descending
    /// order. The highest level always lies strictly above the field maximum.
    Interval { base: f32, interval: f32 },
    /// A fixed list, independent of the field.
    Fixed(Vec<f32>),
    /// `count` levels evenly spaced over `[0, cell_count)`.
    EvenlySpaced { count: usize },
    /// `2^from ..= 2^to`.
    PowersOfTwo { from: i32, to: i32 },
}

impl ThresholdPolicy {
    /// The policy used for `preset`.
    pub fn for_preset(preset: Preset) -> Self {
        match preset {
            Preset::Empty => ThresholdPolicy::Interval {
                base: 1.0,
                interval: CONTOUR_INTERVAL,
            },
            Preset::Random => ThresholdPolicy::Fixed((0..10).map(|i| i as f32 * 10.0).collect()),
            Preset::Gradient => ThresholdPolicy::EvenlySpaced { count: 10 },
            Preset::Goldstein => ThresholdPolicy::PowersOfTwo { from: 2, to: 20 },
        }
    }

    /// Computes the threshold sequence for `summary`.
    pub fn thresholds(&self, summary: &FieldSummary) -> Vec<f32> {
        match self {
            ThresholdPolicy::Interval { base, interval } => {
                interval_levels(*base, *interval, summary.min, summary.max)
            }
            ThresholdPolicy::Fixed(levels) => levels.clone(),
            ThresholdPolicy::EvenlySpaced { count } => {
                let step = summary.cell_count as f32 / *count as f32;
                (0..*count).map(|i| i as f32 * step).collect()
            }
            ThresholdPolicy::PowersOfTwo { from, to } => {
                (*from..=*to).map(|p| 2f32.powi(p)).collect()
            }
        }
    }
}

impl From<Preset> for ThresholdPolicy {
    fn from(preset: Preset) -> Self {
        Self::for_preset(preset)
    }
}

impl Preset {
    /// Shorthand for [`ThresholdPolicy::for_preset`].
    pub fn threshold_policy(self) -> ThresholdPolicy {
        ThresholdPolicy::for_preset(self)
    }
}

fn interval_levels(base: f32, interval: f32, min: f32, max: f32) -> Vec<f32> {
    if !(min.is_finite() && max.is_finite() && interval.is_finite() && interval > 0.0) {
        return Vec::new();
    }

    // Nominal top bound: one bucket's worth above the range.
    let bucket_count = (max / interval).ceil();
    let z_range = (max - min).ceil();
    let upper = if bucket_count > 0.0 {
        (bucket_count + 1.0) * z_range / bucket_count
    } else {
        0.0
    };

    let mut interval = interval;
    let mut widened = false;
    while (upper.max(max) - base) / interval > MAX_INTERVAL_LEVELS {
        interval *= 2.0;
        widened = true;
    }
    if widened {
        debug!(interval, max, "widened contour interval");
    }

    let level = |k: usize| base + k as f32 * interval;
    let mut levels = Vec::new();
    let mut k = 0;
    while level(k) < upper {
        levels.push(level(k));
        k += 1;
    }
    // The nominal bound can fall short of `max`; keep going until a level clears it.
    while levels.last().is_none_or(|&top| top <= max) {
        levels.push(level(k));
        k += 1;
    }

    levels.reverse();
    levels
}

/// Checks that `thresholds` can delimit bands: at least two finite levels, strictly
/// monotonic in either direction.
pub fn validate_thresholds(thresholds: &[f32]) -> Result<ThresholdOrder> {
    if thresholds.len() < 2 {
        return Err(Error::InvalidThresholds(format!(
            "need at least 2 levels, got {}",
            thresholds.len()
        )));
    }
    if let Some(bad) = thresholds.iter().find(|t| !t.is_finite()) {
        return Err(Error::InvalidThresholds(format!("non-finite level {bad}")));
    }
    threshold_ordering(thresholds).ok_or_else(|| {
        Error::InvalidThresholds("levels must be strictly increasing or decreasing".into())
    })
}

/// Direction of `thresholds`, or `None` if it is not strictly monotonic. A single level counts
/// as ascending.
pub(crate) fn threshold_ordering(thresholds: &[f32]) -> Option<ThresholdOrder> {
    if thresholds.windows(2).all(|w| w[0] < w[1]) {
        Some(ThresholdOrder::Ascending)
    } else if thresholds.windows(2).all(|w| w[0] > w[1]) {
        Some(ThresholdOrder::Descending)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(min: f32, max: f32) -> FieldSummary {
        FieldSummary {
            min,
            max,
            cell_count: 100,
        }
    }

    fn empty_levels(min: f32, max: f32) -> Vec<f32> {
        Preset::Empty.threshold_policy().thresholds(&summary(min, max))
    }

    #[test]
    fn empty_levels_descend_to_base() {
        let levels = empty_levels(10.0, 110.0);
        assert_eq!(levels.last(), Some(&1.0));
        assert_eq!(threshold_ordering(&levels), Some(ThresholdOrder::Descending));
        assert!(levels.windows(2).all(|w| w[0] - w[1] == CONTOUR_INTERVAL));
    }

    #[test]
    fn empty_top_level_exceeds_max() {
        for max in [11.0, 20.0, 35.0, 40.0, 100.0, 110.0, 200.0, 219.5, 1000.0] {
            let levels = empty_levels(10.0, max);
            assert!(levels[0] > max, "top {} <= max {max}", levels[0]);
        }
    }

    #[test]
    fn empty_top_level_exceeds_max_on_interval_multiples() {
        for k in 1..50 {
            let max = k as f32 * CONTOUR_INTERVAL;
            for min in [0.0, 1.0, 10.0, max - 1.0] {
                let levels = empty_levels(min, max);
                assert!(levels[0] > max, "min {min} max {max}: top {}", levels[0]);
            }
        }
    }

    #[test]
    fn huge_range_widens_interval() {
        let levels = empty_levels(0.0, 1.0e7);
        assert!(levels.len() as f32 <= MAX_INTERVAL_LEVELS + 2.0);
        assert!(levels[0] > 1.0e7);
    }

    #[test]
    fn non_finite_summary_yields_no_levels() {
        assert!(empty_levels(f32::INFINITY, f32::NEG_INFINITY).is_empty());
    }

    #[test]
    fn random_levels_are_fixed() {
        let levels = Preset::Random
            .threshold_policy()
            .thresholds(&summary(-50.0, 500.0));
        assert_eq!(
            levels,
            vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0]
        );
    }

    #[test]
    fn gradient_levels_span_cell_range() {
        let levels = Preset::Gradient
            .threshold_policy()
            .thresholds(&FieldSummary {
                min: 0.0,
                max: 199.0,
                cell_count: 200,
            });
        assert_eq!(levels.len(), 10);
        assert_eq!(levels[0], 0.0);
        assert_eq!(levels[9], 180.0);
        assert!(validate_thresholds(&levels).is_ok());
    }

    #[test]
    fn goldstein_levels_are_powers_of_two() {
        let levels = Preset::Goldstein
            .threshold_policy()
            .thresholds(&summary(3.0, 1.0e6));
        assert_eq!(levels.len(), 19);
        assert_eq!(levels[0], 4.0);
        assert_eq!(levels[18], 1_048_576.0);
    }

    #[test]
    fn validation_rejects_degenerate_sets() {
        assert!(validate_thresholds(&[]).is_err());
        assert!(validate_thresholds(&[1.0]).is_err());
        assert!(validate_thresholds(&[1.0, 1.0]).is_err());
        assert!(validate_thresholds(&[1.0, 3.0, 2.0]).is_err());
        assert!(validate_thresholds(&[1.0, f32::NAN]).is_err());
        assert_eq!(
            validate_thresholds(&[3.0, 2.0]).unwrap(),
            ThresholdOrder::Descending
        );
        assert_eq!(
            validate_thresholds(&[2.0, 3.0]).unwrap(),
            ThresholdOrder::Ascending
        );
    }
}
