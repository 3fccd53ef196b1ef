//! Rendering backend abstraction

use crate::core::Coordinate;
use crate::map::types::{CircleStyle, LatLngBounds};
use thiserror::Error;

/// Handle of a map surface created by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u32);

/// Handle of a marker or circle placed on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(pub u32);

/// Map backend failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    #[error("map backend is not available: {0}")]
    BackendUnavailable(String),
    #[error("unknown surface {0:?}")]
    UnknownSurface(SurfaceId),
    #[error("unknown overlay {0:?}")]
    UnknownOverlay(OverlayId),
    #[error("map controller has been disposed")]
    Disposed,
}

/// Result type for map operations
pub type MapResult<T> = Result<T, MapError>;

/// Minimal retained-mode map primitives
pub trait MapBackend {
    /// Create a surface centered on `center` at `zoom`
    fn create_surface(&mut self, center: Coordinate, zoom: f64) -> MapResult<SurfaceId>;

    /// Place a labelled point marker
    fn place_marker(&mut self, surface: SurfaceId, position: Coordinate, label: &str) -> MapResult<OverlayId>;

    /// Place a circle of `radius_m` meters
    fn place_circle(
        &mut self,
        surface: SurfaceId,
        center: Coordinate,
        radius_m: f64,
        style: &CircleStyle,
    ) -> MapResult<OverlayId>;

    /// Remove a previously placed overlay
    fn remove_overlay(&mut self, overlay: OverlayId) -> MapResult<()>;

    /// Move and zoom the viewport so `bounds` is fully visible
    fn fit_bounds(&mut self, surface: SurfaceId, bounds: &LatLngBounds) -> MapResult<()>;

    /// Destroy a surface and any platform resources it holds
    fn release_surface(&mut self, surface: SurfaceId) -> MapResult<()>;
}

impl<B: MapBackend + ?Sized> MapBackend for &mut B {
    fn create_surface(&mut self, center: Coordinate, zoom: f64) -> MapResult<SurfaceId> {
        (**self).create_surface(center, zoom)
    }

    fn place_marker(&mut self, surface: SurfaceId, position: Coordinate, label: &str) -> MapResult<OverlayId> {
        (**self).place_marker(surface, position, label)
    }

    fn place_circle(
        &mut self,
        surface: SurfaceId,
        center: Coordinate,
        radius_m: f64,
        style: &CircleStyle,
    ) -> MapResult<OverlayId> {
        (**self).place_circle(surface, center, radius_m, style)
    }

    fn remove_overlay(&mut self, overlay: OverlayId) -> MapResult<()> {
        (**self).remove_overlay(overlay)
    }

    fn fit_bounds(&mut self, surface: SurfaceId, bounds: &LatLngBounds) -> MapResult<()> {
        (**self).fit_bounds(surface, bounds)
    }

    fn release_surface(&mut self, surface: SurfaceId) -> MapResult<()> {
        (**self).release_surface(surface)
    }
}
