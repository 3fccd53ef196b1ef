//! Map options, overlay styling and viewport bounds

use crate::core::{Coordinate, DEFAULT_ZOOM, EARTH_RADIUS_M, FIT_PADDING_FACTOR, SETTLE_DELAY_MS};
use serde::{Deserialize, Serialize};

/// Stroke and fill styling of the geofence circle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircleStyle {
    pub stroke_color: String,
    pub stroke_opacity: f32,
    pub stroke_weight: u32,
    pub fill_color: String,
    pub fill_opacity: f32,
}

impl Default for CircleStyle {
    fn default() -> Self {
        Self {
            stroke_color: "#0000FF".to_string(),
            stroke_opacity: 0.8,
            stroke_weight: 2,
            fill_color: "#0000FF".to_string(),
            fill_opacity: 0.3,
        }
    }
}

/// Map synchronization settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapOptions {
    /// Zoom level used when the surface is created
    pub default_zoom: f64,
    /// Delay before fitting the viewport after overlays change (milliseconds)
    pub settle_delay_ms: u64,
    /// Fraction of the bounding box added on each side when fitting
    pub fit_padding_factor: f64,
    /// Label of the user-position marker
    pub user_label: String,
    /// Label of the geofence-center marker
    pub fence_label: String,
    pub circle_style: CircleStyle,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            default_zoom: DEFAULT_ZOOM,
            settle_delay_ms: SETTLE_DELAY_MS,
            fit_padding_factor: FIT_PADDING_FACTOR,
            user_label: "Check-in user".to_string(),
            fence_label: "Check-in point".to_string(),
            circle_style: CircleStyle::default(),
        }
    }
}

/// Axis-aligned latitude/longitude box.
///
/// Does not handle boxes crossing the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLngBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl LatLngBounds {
    /// Degenerate box containing a single point
    pub fn from_point(point: &Coordinate) -> Self {
        Self {
            south: point.latitude(),
            west: point.longitude(),
            north: point.latitude(),
            east: point.longitude(),
        }
    }

    pub fn extend(&mut self, point: &Coordinate) {
        self.south = self.south.min(point.latitude());
        self.north = self.north.max(point.latitude());
        self.west = self.west.min(point.longitude());
        self.east = self.east.max(point.longitude());
    }

    /// Grow the box to contain a circle of `radius_m` meters around `center`.
    ///
    /// Uses the spherical-cap extent on the same Earth radius as
    /// [`crate::algorithms::distance`], so every point within `radius_m` by
    /// that measure falls inside the box.
    pub fn extend_circle(&mut self, center: &Coordinate, radius_m: f64) {
        let angular = radius_m / EARTH_RADIUS_M;
        let d_lat = angular.to_degrees();
        let cos_lat = center.latitude().to_radians().cos().abs();
        let d_lng = if angular.sin() >= cos_lat {
            180.0
        } else {
            (angular.sin() / cos_lat).asin().to_degrees()
        };

        self.south = self.south.min((center.latitude() - d_lat).max(-90.0));
        self.north = self.north.max((center.latitude() + d_lat).min(90.0));
        self.west = self.west.min((center.longitude() - d_lng).max(-180.0));
        self.east = self.east.max((center.longitude() + d_lng).min(180.0));
    }

    /// Copy of the box expanded by `factor` of its span on every side
    pub fn padded(&self, factor: f64) -> Self {
        let lat_pad = (self.north - self.south) * factor;
        let lng_pad = (self.east - self.west) * factor;
        Self {
            south: (self.south - lat_pad).max(-90.0),
            west: (self.west - lng_pad).max(-180.0),
            north: (self.north + lat_pad).min(90.0),
            east: (self.east + lng_pad).min(180.0),
        }
    }

    pub fn contains(&self, point: &Coordinate) -> bool {
        (self.south..=self.north).contains(&point.latitude())
            && (self.west..=self.east).contains(&point.longitude())
    }
}
