//! Common tracker types

use crate::core::PositionSample;
use crate::platform::LocationResult;
use thiserror::Error;

/// One normalized delivery from the tracker: a sample or a location error
pub type LocationUpdate = LocationResult<PositionSample>;

/// Callback invoked for every update while tracking
pub type LocationCallback = Box<dyn FnMut(LocationUpdate)>;

/// Lifecycle of a location tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    /// Never started
    Idle,
    /// Subscribed to continuous sampling
    Tracking,
    /// Subscription released; may be started again
    Stopped,
}

/// Misuse of the tracker lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    #[error("tracker is already tracking")]
    AlreadyTracking,
}

/// Result type for tracker lifecycle operations
pub type TrackerResult<T> = Result<T, TrackerError>;
