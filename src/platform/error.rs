//! Location error types and normalization

use crate::platform::PlatformError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures of a position request, reported to the caller without retry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum LocationError {
    /// The user or platform refused access to location
    #[error("location permission denied")]
    PermissionDenied,
    /// No fix could be determined
    #[error("position unavailable")]
    Unavailable,
    /// No fix arrived within the configured timeout
    #[error("timed out waiting for a position fix")]
    Timeout,
}

/// Result type for location operations
pub type LocationResult<T> = Result<T, LocationError>;

impl LocationError {
    /// Map a W3C geolocation error code; unknown codes count as unavailable
    pub fn from_platform_code(code: u16) -> Self {
        match code {
            PlatformError::PERMISSION_DENIED => LocationError::PermissionDenied,
            PlatformError::TIMEOUT => LocationError::Timeout,
            _ => LocationError::Unavailable,
        }
    }

    pub fn platform_code(&self) -> u16 {
        match self {
            LocationError::PermissionDenied => PlatformError::PERMISSION_DENIED,
            LocationError::Unavailable => PlatformError::POSITION_UNAVAILABLE,
            LocationError::Timeout => PlatformError::TIMEOUT,
        }
    }

    /// Whether only the user can resolve this (e.g. by granting permission)
    pub fn is_user_actionable(&self) -> bool {
        matches!(self, LocationError::PermissionDenied)
    }
}

impl From<&PlatformError> for LocationError {
    fn from(error: &PlatformError) -> Self {
        LocationError::from_platform_code(error.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_code_mapping() {
        assert_eq!(LocationError::from_platform_code(1), LocationError::PermissionDenied);
        assert_eq!(LocationError::from_platform_code(2), LocationError::Unavailable);
        assert_eq!(LocationError::from_platform_code(3), LocationError::Timeout);
        assert_eq!(LocationError::from_platform_code(42), LocationError::Unavailable);

        for error in [LocationError::PermissionDenied, LocationError::Unavailable, LocationError::Timeout] {
            assert_eq!(LocationError::from_platform_code(error.platform_code()), error);
        }
    }

    #[test]
    fn test_user_actionable() {
        assert!(LocationError::PermissionDenied.is_user_actionable());
        assert!(!LocationError::Timeout.is_user_actionable());
        assert!(!LocationError::Unavailable.is_user_actionable());
    }
}
