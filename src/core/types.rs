//! Core data types for the check-in system

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Errors raised when constructing geographic values from raw numbers
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoValueError {
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("geofence radius must be a positive number of meters, got {0}")]
    InvalidRadius(f64),
}

/// Geodetic coordinate in decimal degrees
///
/// Serialized as `{ "lat": .., "lng": .. }`. Construction always validates
/// the ranges, including through serde.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Serialize, Deserialize)]
struct RawCoordinate {
    lat: f64,
    lng: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting out-of-range or non-finite values
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoValueError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoValueError::LatitudeOutOfRange(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoValueError::LongitudeOutOfRange(longitude));
        }
        Ok(Self { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl Serialize for Coordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RawCoordinate {
            lat: self.latitude,
            lng: self.longitude,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawCoordinate::deserialize(deserializer)?;
        Coordinate::new(raw.lat, raw.lng).map_err(serde::de::Error::custom)
    }
}

/// Circular presence boundary used to validate check-ins
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeofenceSpec {
    center: Coordinate,
    radius_m: f64,
}

impl GeofenceSpec {
    pub fn new(center: Coordinate, radius_m: f64) -> Result<Self, GeoValueError> {
        if !radius_m.is_finite() || radius_m <= 0.0 {
            return Err(GeoValueError::InvalidRadius(radius_m));
        }
        Ok(Self { center, radius_m })
    }

    pub fn center(&self) -> Coordinate {
        self.center
    }

    /// Radius in meters
    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }
}

/// A single position fix delivered by the location tracker
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSample {
    pub coordinate: Coordinate,
    pub observed_at: DateTime<Utc>,
    /// Horizontal accuracy reported by the platform (meters), if any
    pub accuracy_m: Option<f64>,
}

impl PositionSample {
    pub fn new(coordinate: Coordinate, observed_at: DateTime<Utc>) -> Self {
        Self {
            coordinate,
            observed_at,
            accuracy_m: None,
        }
    }

    pub fn with_accuracy(mut self, accuracy_m: f64) -> Self {
        self.accuracy_m = Some(accuracy_m);
        self
    }
}

/// Whether the current position lies within the geofence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RangeState {
    /// No position has been observed yet, or the last attempt failed
    #[default]
    Unknown,
    Inside,
    Outside,
}

impl RangeState {
    pub fn is_inside(&self) -> bool {
        matches!(self, RangeState::Inside)
    }
}

/// Identity of the user performing check-ins, supplied by the auth layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: u32,
    pub name: String,
}

impl UserIdentity {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_bounds() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert_eq!(
            Coordinate::new(90.5, 0.0),
            Err(GeoValueError::LatitudeOutOfRange(90.5))
        );
        assert_eq!(
            Coordinate::new(0.0, -180.1),
            Err(GeoValueError::LongitudeOutOfRange(-180.1))
        );
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_coordinate_serde_shape() {
        let coordinate = Coordinate::new(24.998527, 121.457033).unwrap();
        let json = serde_json::to_value(coordinate).unwrap();
        assert_eq!(json, serde_json::json!({ "lat": 24.998527, "lng": 121.457033 }));

        let invalid: Result<Coordinate, _> = serde_json::from_str(r#"{"lat": 120.0, "lng": 0.0}"#);
        assert!(invalid.is_err());
    }

    #[test]
    fn test_geofence_radius_validation() {
        let center = Coordinate::new(0.0, 0.0).unwrap();
        assert!(GeofenceSpec::new(center, 100.0).is_ok());
        assert_eq!(GeofenceSpec::new(center, 0.0), Err(GeoValueError::InvalidRadius(0.0)));
        assert!(GeofenceSpec::new(center, -5.0).is_err());
        assert!(GeofenceSpec::new(center, f64::INFINITY).is_err());
    }

    #[test]
    fn test_range_state_default() {
        assert_eq!(RangeState::default(), RangeState::Unknown);
        assert!(RangeState::Inside.is_inside());
        assert!(!RangeState::Outside.is_inside());
    }
}
