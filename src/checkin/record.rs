//! Check-in record and validation errors

use crate::core::Coordinate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Immutable record of a confirmed check-in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRecord {
    /// Sequence number within the user's records, starting at 1
    pub id: u64,
    pub user_id: u32,
    /// Local time formatted `YYYY-MM-DD HH:mm:ss`
    pub time: String,
    pub location: Coordinate,
}

/// Reasons a check-in attempt is refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CheckInError {
    #[error("current position is outside the check-in area")]
    NotInRange,
    #[error("no position available yet")]
    MissingPosition,
}
