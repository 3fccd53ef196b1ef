//! Geofenced Check-in
//!
//! Live location tracking, geofence evaluation and map-overlay
//! synchronization for confirming a user's presence at a fixed location.

pub mod core;
pub mod algorithms;
pub mod platform;
pub mod api;
pub mod map;
pub mod checkin;
pub mod utils;
pub mod session;

// Re-export commonly used types
pub use crate::core::{Coordinate, GeofenceSpec, PositionSample, RangeState, UserIdentity, GeoValueError, EARTH_RADIUS_M};
pub use crate::algorithms::{distance, evaluate};
pub use crate::platform::{GeolocationProvider, MockGeolocationProvider, PositionOptions, PositionFix, LocationError, LocationResult};
pub use crate::api::{LocationTracker, LocationUpdate, TrackerState, TrackerError};
pub use crate::map::{MapBackend, MapSyncController, MapOptions, RecordingBackend, ReconcileOutcome, LatLngBounds, MapError};
pub use crate::checkin::{CheckInRecord, CheckInRecorder, CheckInError, CheckInStore, MemoryStore, JsonFileStore, StoreError};
pub use crate::utils::{AppConfig, ConfigurationManager, ConfigError};
pub use crate::session::{CheckInSession, SessionError, SessionResult};
