//! Physical constants and system parameters

/// Mean Earth radius used for great-circle distances (m)
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Zoom level used when the map surface is first created
pub const DEFAULT_ZOOM: f64 = 15.0;

/// Delay between overlay placement and viewport fitting (ms)
pub const SETTLE_DELAY_MS: u64 = 300;

/// Fraction of the bounding box added on every side when fitting the viewport
pub const FIT_PADDING_FACTOR: f64 = 0.1;

/// Timestamp layout of check-in records
pub const CHECK_IN_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
