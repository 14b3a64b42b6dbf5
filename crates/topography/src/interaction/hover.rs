use std::time::{Duration, Instant};

use crate::field::CellId;

/// Tracks which cell the pointer rests on and for how long.
///
/// `previous` is the cell seen at the last [`settle`](HoverTracker::settle) (one per tick), so
/// [`moved_to_different_cell`](HoverTracker::moved_to_different_cell) answers "did the pointer
/// change cells since the last tick" regardless of how many move events arrived in between.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HoverTracker {
    current: Option<CellId>,
    previous: Option<CellId>,
    hover_start: Option<Instant>,
}

impl HoverTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a pointer sample. `cell` is `None` when the pointer is off the grid.
    ///
    /// Returns `true` if the hovered cell changed; the dwell timer restarts in that case.
    pub fn pointer_moved(&mut self, cell: Option<CellId>, now: Instant) -> bool {
        let changed = self.current != cell;
        self.current = cell;
        if changed || self.hover_start.is_none() {
            self.hover_start = cell.map(|_| now);
        }
        changed
    }

    /// The hovered cell, if any.
    #[inline]
    pub fn current(&self) -> Option<CellId> {
        self.current
    }

    /// The hovered cell as of the last tick.
    #[inline]
    pub fn previous(&self) -> Option<CellId> {
        self.previous
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    pub fn moved_to_different_cell(&self) -> bool {
        self.current.is_some() && self.current != self.previous
    }

    /// Time spent on the current cell. Zero when nothing is hovered.
    pub fn hover_duration(&self, now: Instant) -> Duration {
        self.hover_start
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or_default()
    }

    /// Marks the end of a tick.
    pub fn settle(&mut self) {
        self.previous = self.current;
    }

    /// Forgets all pointer state, e.g. when the pointer leaves the canvas.
    pub fn disable(&mut self) {
        *self = Self::default();
    }
}
