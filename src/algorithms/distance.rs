//! Great-circle distance on a spherical Earth

use crate::core::{Coordinate, EARTH_RADIUS_M};

/// Haversine distance between two coordinates in meters.
///
/// Symmetric and zero for identical inputs. The haversine term is clamped
/// to `[0, 1]` so rounding near antipodal or coincident points cannot feed
/// an out-of-domain value to `asin`.
pub fn distance(a: &Coordinate, b: &Coordinate) -> f64 {
    let phi1 = a.latitude().to_radians();
    let phi2 = b.latitude().to_radians();
    let d_phi = (b.latitude() - a.latitude()).to_radians();
    let d_lambda = (b.longitude() - a.longitude()).to_radians();

    let h = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    #[test]
    fn test_zero_distance_for_same_point() {
        for (lat, lng) in [(0.0, 0.0), (24.998527, 121.457033), (-89.9, 179.9), (90.0, -180.0)] {
            let a = coord(lat, lng);
            assert_eq!(distance(&a, &a), 0.0);
        }
    }

    #[test]
    fn test_symmetry() {
        let a = coord(24.998527, 121.457033);
        let b = coord(25.033, 121.5654);
        assert_eq!(distance(&a, &b), distance(&b, &a));
    }

    #[test]
    fn test_one_degree_along_equator() {
        let a = coord(0.0, 0.0);
        let b = coord(0.0, 1.0);
        let expected = EARTH_RADIUS_M * PI / 180.0;
        assert!((distance(&a, &b) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_antipodal_points_are_finite() {
        let a = coord(0.0, 0.0);
        let b = coord(0.0, 180.0);
        let d = distance(&a, &b);
        assert!(d.is_finite());
        assert!((d - EARTH_RADIUS_M * PI).abs() < 1e-3);

        let north = coord(90.0, 0.0);
        let south = coord(-90.0, 0.0);
        assert!(distance(&north, &south).is_finite());
    }
}
