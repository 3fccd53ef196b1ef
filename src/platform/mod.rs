//! Platform abstraction layer for geolocation
//!
//! This module decouples the tracker from any particular geolocation binding.
//! A platform delivers raw fixes or numeric error codes; normalization into
//! [`crate::core::PositionSample`] and [`LocationError`] happens in the tracker.

pub mod provider;
pub mod mock;
pub mod error;

pub use provider::{GeolocationProvider, PositionOptions, WatchId, PlatformEvent};
pub use mock::MockGeolocationProvider;
pub use error::{LocationError, LocationResult};

use chrono::Utc;

/// Raw position fix as reported by the platform
#[derive(Debug, Clone, PartialEq)]
pub struct PositionFix {
    pub latitude: f64,
    pub longitude: f64,
    /// Horizontal accuracy (meters)
    pub accuracy_m: f64,
    /// Fix time (milliseconds since epoch); 0 when the platform gave none
    pub timestamp_ms: u64,
}

impl PositionFix {
    /// Fix stamped with the current time
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_m: 0.0,
            timestamp_ms: u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0),
        }
    }

    pub fn with_accuracy(mut self, accuracy_m: f64) -> Self {
        self.accuracy_m = accuracy_m;
        self
    }

    pub fn with_timestamp(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }
}

/// Raw platform failure: a W3C geolocation error code plus message
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformError {
    pub code: u16,
    pub message: String,
}

impl PlatformError {
    pub const PERMISSION_DENIED: u16 = 1;
    pub const POSITION_UNAVAILABLE: u16 = 2;
    pub const TIMEOUT: u16 = 3;

    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}
