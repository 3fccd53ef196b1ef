//! Geofence evaluation

use crate::algorithms::distance::distance;
use crate::core::{GeofenceSpec, PositionSample, RangeState};

/// Derive the range state of a position relative to a fence.
///
/// `None` maps to [`RangeState::Unknown`]. The boundary is inclusive.
pub fn evaluate(position: Option<&PositionSample>, fence: &GeofenceSpec) -> RangeState {
    match position {
        None => RangeState::Unknown,
        Some(sample) => {
            if distance(&sample.coordinate, &fence.center()) <= fence.radius_m() {
                RangeState::Inside
            } else {
                RangeState::Outside
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Coordinate, EARTH_RADIUS_M};
    use chrono::Utc;

    fn fence() -> GeofenceSpec {
        GeofenceSpec::new(Coordinate::new(24.998527, 121.457033).unwrap(), 100.0).unwrap()
    }

    fn sample(lat: f64, lng: f64) -> PositionSample {
        PositionSample::new(Coordinate::new(lat, lng).unwrap(), Utc::now())
    }

    /// Latitude offset (degrees) that moves a point `meters` due north
    fn north_offset(meters: f64) -> f64 {
        (meters / EARTH_RADIUS_M).to_degrees()
    }

    #[test]
    fn test_unknown_without_position() {
        assert_eq!(evaluate(None, &fence()), RangeState::Unknown);
    }

    #[test]
    fn test_center_is_inside() {
        assert_eq!(evaluate(Some(&sample(24.998527, 121.457033)), &fence()), RangeState::Inside);
    }

    #[test]
    fn test_beyond_radius_is_outside() {
        let far = sample(24.998527 + north_offset(100.5), 121.457033);
        assert_eq!(evaluate(Some(&far), &fence()), RangeState::Outside);

        let very_far = sample(25.033, 121.5654);
        assert_eq!(evaluate(Some(&very_far), &fence()), RangeState::Outside);
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let center = fence().center();
        let edge = sample(24.998527 + north_offset(100.0), 121.457033);
        let d = distance(&edge.coordinate, &center);

        // A fence whose radius is exactly the computed distance must contain the point
        let exact = GeofenceSpec::new(center, d).unwrap();
        assert_eq!(evaluate(Some(&edge), &exact), RangeState::Inside);
    }
}
