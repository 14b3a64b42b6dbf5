//! Event types and sinks for observing a [`Topography`](crate::session::Topography) session.
//!
//! Renderers typically redraw only after a tick reported [`TopographyEvent::Raised`] or one of
//! the reinitialization events.
use crate::field::{CellId, Grid, Preset};

/// Describes events emitted by session operations.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum TopographyEvent {
    /// A tick raised the hovered cell.
    Raised {
        /// The raised cell.
        cell: CellId,
        /// Force applied to the cell.
        force: f32,
        /// Height of the cell after smoothing.
        height: f32,
    },

    /// The field was cleared to the uniform fill.
    Reset,

    /// The field was re-randomized.
    Randomized,

    /// The field was re-initialized with a preset.
    Initialized {
        preset: Preset,
    },

    /// The grid was rebuilt for a new scale, replacing the field along with it.
    GridRebuilt {
        grid: Grid,
    },

    /// Non-fatal warning generated during a session operation.
    Warning {
        /// Context string (e.g. operation name).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

impl TopographyEvent {
    pub fn kind(&self) -> TopographyEventKind {
        match self {
            TopographyEvent::Raised { .. } => TopographyEventKind::Raised,
            TopographyEvent::Reset => TopographyEventKind::Reset,
            TopographyEvent::Randomized => TopographyEventKind::Randomized,
            TopographyEvent::Initialized { .. } => TopographyEventKind::Initialized,
            TopographyEvent::GridRebuilt { .. } => TopographyEventKind::GridRebuilt,
            TopographyEvent::Warning { .. } => TopographyEventKind::Warning,
        }
    }
}

/// Discriminant of [`TopographyEvent`], used by sinks to filter what they receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopographyEventKind {
    Raised,
    Reset,
    Randomized,
    Initialized,
    GridRebuilt,
    Warning,
}

/// A generic event sink that accepts [`TopographyEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: TopographyEvent);

    /// Whether events of `kind` should be built and sent at all.
    #[inline]
    fn wants(&self, _kind: TopographyEventKind) -> bool {
        true
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: TopographyEvent) {}

    #[inline]
    fn wants(&self, _kind: TopographyEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(TopographyEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(TopographyEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(TopographyEvent),
{
    #[inline]
    fn send(&mut self, event: TopographyEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<TopographyEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<TopographyEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[TopographyEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of collected events of `kind`.
    pub fn count(&self, kind: TopographyEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: TopographyEvent) {
        self.events.push(event);
    }
}
