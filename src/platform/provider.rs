//! Geolocation provider trait and request options

use crate::platform::{PlatformError, PositionFix};
use serde::{Deserialize, Serialize};

/// A raw event produced by the platform for a watch or a single request
pub type PlatformEvent = Result<PositionFix, PlatformError>;

/// Handle of a continuous-sampling subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(pub u32);

/// Platform abstraction over continuous and single-shot geolocation
pub trait GeolocationProvider {
    /// Subscribe to continuous position sampling
    fn watch_position(&mut self, options: &PositionOptions) -> WatchId;

    /// Release a subscription
    fn clear_watch(&mut self, watch: WatchId);

    /// Take the next queued event for a subscription.
    /// Returns None when nothing is pending (non-blocking)
    fn next_event(&mut self, watch: WatchId) -> Option<PlatformEvent>;

    /// Single-shot position request, independent of any subscription
    fn current_position(&mut self, options: &PositionOptions) -> PlatformEvent;
}

impl<P: GeolocationProvider + ?Sized> GeolocationProvider for &mut P {
    fn watch_position(&mut self, options: &PositionOptions) -> WatchId {
        (**self).watch_position(options)
    }

    fn clear_watch(&mut self, watch: WatchId) {
        (**self).clear_watch(watch)
    }

    fn next_event(&mut self, watch: WatchId) -> Option<PlatformEvent> {
        (**self).next_event(watch)
    }

    fn current_position(&mut self, options: &PositionOptions) -> PlatformEvent {
        (**self).current_position(options)
    }
}

/// Options passed to the platform with each request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionOptions {
    /// Request best-effort precision at higher power/latency cost
    pub high_accuracy: bool,
    /// Accept a cached fix no older than this (milliseconds)
    pub max_cached_age_ms: u64,
    /// Fail an individual request if no fix arrives in time (milliseconds)
    pub timeout_ms: u64,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            max_cached_age_ms: 10_000,
            timeout_ms: 10_000,
        }
    }
}
