//! Event-driven location tracking API
//!
//! The tracker normalizes platform callbacks into one ordered stream of
//! location updates and owns the subscription lifecycle.

pub mod tracker;
pub mod types;

pub use tracker::LocationTracker;
pub use types::{LocationCallback, LocationUpdate, TrackerError, TrackerResult, TrackerState};
