use std::time::{Duration, Instant};

use glam::Vec2;
use mint::Vector2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, trace, warn};

use crate::contour::{Contour, ContourExtractor, FieldSummary, IsoBand, ThresholdPolicy};
use crate::error::{Error, Result};
use crate::field::{CellId, Grid, Preset, ScalarField};
use crate::interaction::{compute_force, map_pointer_to_cell, HoverTracker};
use crate::session::config::TopographyConfig;
use crate::session::events::{EventSink, TopographyEvent, TopographyEventKind};

/// An interactive height field driven by pointer input.
///
/// The session owns the grid and its field as one unit (a new scale or canvas size replaces
/// both), the hover state of the pointer and the RNG used by [`Preset::Random`]. It is meant to
/// be driven from a single loop: feed pointer samples through [`pointer_moved`], call
/// [`poll`] on every frame, and read [`isobands`] or [`contours`] when a tick reported a change.
///
/// [`pointer_moved`]: Topography::pointer_moved
/// [`poll`]: Topography::poll
/// [`isobands`]: Topography::isobands
/// [`contours`]: Topography::contours
#[derive(Debug, Clone)]
pub struct Topography {
    config: TopographyConfig,
    field: ScalarField,
    rng: StdRng,
    hover: HoverTracker,
    last_update: Option<Instant>,
}

impl Topography {
    /// Validates `config` and builds the grid and field it describes.
    pub fn try_new(config: TopographyConfig) -> Result<Self> {
        config.validate()?;
        let grid = Grid::new(config.canvas_size, config.scale)?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let field =
            ScalarField::new(grid, config.preset, &mut rng).with_extrema_tracking(config.extrema);

        debug!(
            columns = grid.column_count(),
            rows = grid.row_count(),
            preset = %config.preset,
            "created topography"
        );

        Ok(Self {
            config,
            field,
            rng,
            hover: HoverTracker::new(),
            last_update: None,
        })
    }

    #[inline]
    pub fn config(&self) -> &TopographyConfig {
        &self.config
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        self.field.grid()
    }

    #[inline]
    pub fn field(&self) -> &ScalarField {
        &self.field
    }

    #[inline]
    pub fn hover(&self) -> &HoverTracker {
        &self.hover
    }

    /// The flattened, row-major height matrix.
    #[inline]
    pub fn matrix(&self) -> &[f32] {
        self.field.matrix()
    }

    /// Records a pointer position in canvas coordinates and returns the cell under it.
    pub fn pointer_moved(&mut self, point: impl Into<Vector2<f32>>, now: Instant) -> Option<CellId> {
        let cell = map_pointer_to_cell(point, self.field.grid());
        if self.hover.pointer_moved(cell, now) {
            trace!(?cell, "pointer changed cell");
        }
        cell
    }

    /// Stops interaction until the next pointer sample.
    pub fn pointer_left(&mut self) {
        self.hover.disable();
    }

    /// Raises the hovered cell by the current force.
    ///
    /// Returns the new height of the cell, or `None` when nothing is hovered or the resting
    /// force has decayed to zero.
    pub fn update(&mut self, now: Instant, sink: &mut dyn EventSink) -> Option<f32> {
        self.last_update = Some(now);
        let Some(cell) = self.hover.current() else {
            self.hover.settle();
            return None;
        };

        let moved = self.hover.moved_to_different_cell();
        let force = compute_force(
            self.hover.hover_duration(now),
            self.config.decay,
            self.config.force,
            moved,
        );
        self.hover.settle();
        if force == 0.0 {
            return None;
        }

        let height = self.field.raise(cell, force, self.config.density)?;
        trace!(?cell, force, height, moved, "raised cell");
        if sink.wants(TopographyEventKind::Raised) {
            sink.send(TopographyEvent::Raised {
                cell,
                force,
                height,
            });
        }
        Some(height)
    }

    /// Runs [`update`](Topography::update) if at least one ping interval passed since the last
    /// update.
    pub fn poll(&mut self, now: Instant, sink: &mut dyn EventSink) -> Option<f32> {
        let due = self
            .last_update
            .is_none_or(|last| now.saturating_duration_since(last) >= self.config.ping);
        if due {
            self.update(now, sink)
        } else {
            None
        }
    }

    /// Raises the cell under a canvas point by `delta`, independent of the hover state.
    pub fn raise_at_point(
        &mut self,
        point: impl Into<Vector2<f32>>,
        delta: f32,
        sink: &mut dyn EventSink,
    ) -> Option<f32> {
        let point = Vec2::from(point.into());
        if !delta.is_finite() {
            warn!(delta, "non-finite raise; ignoring");
            warning(sink, format!("raise by {delta} is not finite"));
            return None;
        }
        let Some(cell) = map_pointer_to_cell(point, self.field.grid()) else {
            warn!(x = point.x, y = point.y, "raise outside the canvas; ignoring");
            warning(
                sink,
                format!("point ({}, {}) is outside the canvas", point.x, point.y),
            );
            return None;
        };

        let height = self.field.raise(cell, delta, self.config.density)?;
        if sink.wants(TopographyEventKind::Raised) {
            sink.send(TopographyEvent::Raised {
                cell,
                force: delta,
                height,
            });
        }
        Some(height)
    }

    /// Clears the field to the uniform fill.
    ///
    /// With `Some(scale)` the grid is rebuilt for the new scale first and the field replaced
    /// along with it. An invalid scale leaves the session untouched.
    pub fn reset(&mut self, scale: Option<f32>, sink: &mut dyn EventSink) -> Result<()> {
        match scale {
            None => {
                self.field.reset();
                debug!("reset field");
                if sink.wants(TopographyEventKind::Reset) {
                    sink.send(TopographyEvent::Reset);
                }
            }
            Some(scale) => {
                let grid = Grid::new(self.config.canvas_size, scale)?;
                self.config.scale = scale;
                self.field = ScalarField::empty(grid).with_extrema_tracking(self.config.extrema);
                self.rebuilt(grid, sink);
            }
        }
        Ok(())
    }

    /// Rebuilds the grid for a new canvas size and re-initializes the field with the configured
    /// preset.
    pub fn resize(
        &mut self,
        canvas_size: impl Into<Vector2<f32>>,
        sink: &mut dyn EventSink,
    ) -> Result<()> {
        let canvas_size = Vec2::from(canvas_size.into());
        let grid = Grid::new(canvas_size, self.config.scale)?;
        self.config.canvas_size = canvas_size;
        self.field = ScalarField::new(grid, self.config.preset, &mut self.rng)
            .with_extrema_tracking(self.config.extrema);
        self.rebuilt(grid, sink);
        Ok(())
    }

    /// Re-initializes the field with the random preset.
    pub fn randomize(&mut self, sink: &mut dyn EventSink) {
        self.field.randomize(&mut self.rng);
        debug!(min = self.field.min(), max = self.field.max(), "randomized field");
        if sink.wants(TopographyEventKind::Randomized) {
            sink.send(TopographyEvent::Randomized);
        }
    }

    /// Switches to `preset`, re-initializing the field and the threshold policy.
    pub fn set_preset(&mut self, preset: Preset, sink: &mut dyn EventSink) {
        self.config.preset = preset;
        self.field.initialize(preset, &mut self.rng);
        if sink.wants(TopographyEventKind::Initialized) {
            sink.send(TopographyEvent::Initialized { preset });
        }
    }

    pub fn set_force(&mut self, force: f32) -> Result<()> {
        if !force.is_finite() {
            return Err(Error::InvalidConfig("force must be finite".into()));
        }
        self.config.force = force;
        Ok(())
    }

    pub fn set_decay(&mut self, decay: Duration) {
        self.config.decay = decay;
    }

    pub fn set_ping(&mut self, ping: Duration) -> Result<()> {
        if ping.is_zero() {
            return Err(Error::InvalidConfig("ping must be > 0".into()));
        }
        debug!(?ping, "changed update interval");
        self.config.ping = ping;
        Ok(())
    }

    /// Threshold levels for the current field under the configured preset's policy.
    pub fn thresholds(&self) -> Vec<f32> {
        ThresholdPolicy::for_preset(self.config.preset).thresholds(&FieldSummary::of(&self.field))
    }

    /// Isobands of the current field, in grid space.
    pub fn isobands(&self) -> Vec<IsoBand> {
        self.extractor()
            .isobands(self.field.matrix(), &self.thresholds())
    }

    /// Superlevel contours of the current field, in grid space.
    pub fn contours(&self) -> Vec<Contour> {
        self.extractor()
            .contours(self.field.matrix(), &self.thresholds())
    }

    /// [`isobands`](Topography::isobands) mapped to canvas coordinates.
    pub fn canvas_isobands(&self) -> Vec<IsoBand> {
        let grid = *self.field.grid();
        self.isobands()
            .into_iter()
            .map(|band| IsoBand {
                geometry: band.geometry.map_points(|p| grid.cell_to_canvas(p)),
                ..band
            })
            .collect()
    }

    /// [`contours`](Topography::contours) mapped to canvas coordinates.
    pub fn canvas_contours(&self) -> Vec<Contour> {
        let grid = *self.field.grid();
        self.contours()
            .into_iter()
            .map(|contour| Contour {
                geometry: contour.geometry.map_points(|p| grid.cell_to_canvas(p)),
                ..contour
            })
            .collect()
    }

    fn extractor(&self) -> ContourExtractor {
        ContourExtractor::for_grid(self.field.grid())
    }

    fn rebuilt(&mut self, grid: Grid, sink: &mut dyn EventSink) {
        self.hover.disable();
        self.last_update = None;
        debug!(
            columns = grid.column_count(),
            rows = grid.row_count(),
            scale = grid.scale(),
            "rebuilt grid"
        );
        if sink.wants(TopographyEventKind::GridRebuilt) {
            sink.send(TopographyEvent::GridRebuilt { grid });
        }
    }
}

fn warning(sink: &mut dyn EventSink, message: String) {
    if sink.wants(TopographyEventKind::Warning) {
        sink.send(TopographyEvent::Warning {
            context: "raise_at_point".into(),
            message,
        });
    }
}
