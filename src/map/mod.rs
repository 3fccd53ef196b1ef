//! Map surface synchronization
//!
//! Abstracts the rendering backend behind a handful of retained-mode
//! primitives and reconciles the overlay set against each new position.

pub mod backend;
pub mod recording;
pub mod sync;
pub mod types;

pub use backend::{MapBackend, MapError, MapResult, OverlayId, SurfaceId};
pub use recording::{BackendCall, OverlayKind, RecordingBackend};
pub use sync::{MapSyncController, ReconcileOutcome};
pub use types::{CircleStyle, LatLngBounds, MapOptions};
