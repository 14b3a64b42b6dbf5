//! Interactive session: configuration, the [`Topography`] tick driver and its events.
pub mod config;
pub mod events;
pub mod topography;

pub use config::{TopographyConfig, DEFAULT_DECAY, DEFAULT_FORCE, DEFAULT_PING, DEFAULT_SCALE};
pub use events::{EventSink, FnSink, TopographyEvent, TopographyEventKind, VecSink};
pub use topography::Topography;
