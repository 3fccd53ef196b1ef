//! Distance and geofence algorithms

pub mod distance;
pub mod geofence;

pub use distance::distance;
pub use geofence::evaluate;
