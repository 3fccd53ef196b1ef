//! Recording map backend for testing and headless runs

use crate::core::Coordinate;
use crate::map::backend::{MapBackend, MapError, MapResult, OverlayId, SurfaceId};
use crate::map::types::{CircleStyle, LatLngBounds};
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// Kind of a live overlay
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayKind {
    Marker { position: Coordinate, label: String },
    Circle { center: Coordinate, radius_m: f64 },
}

/// Every primitive call received, in order
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    CreateSurface { center: Coordinate, zoom: f64 },
    PlaceMarker { label: String },
    PlaceCircle { radius_m: f64 },
    RemoveOverlay(OverlayId),
    FitBounds(LatLngBounds),
    ReleaseSurface(SurfaceId),
}

/// In-memory backend that tracks live surfaces and overlays
#[derive(Debug, Default)]
pub struct RecordingBackend {
    next_id: u32,
    surfaces: HashSet<SurfaceId>,
    surfaces_created: usize,
    overlays: HashMap<OverlayId, (SurfaceId, OverlayKind)>,
    fits: Vec<(SurfaceId, LatLngBounds)>,
    calls: Vec<BackendCall>,
    fail_next_remove: bool,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    pub fn surfaces_created(&self) -> usize {
        self.surfaces_created
    }

    pub fn live_surface_count(&self) -> usize {
        self.surfaces.len()
    }

    pub fn live_overlay_count(&self) -> usize {
        self.overlays.len()
    }

    /// Live markers carrying `label`
    pub fn live_markers_labelled(&self, label: &str) -> usize {
        self.overlays
            .values()
            .filter(|(_, kind)| matches!(kind, OverlayKind::Marker { label: l, .. } if l == label))
            .count()
    }

    pub fn live_circle_count(&self) -> usize {
        self.overlays
            .values()
            .filter(|(_, kind)| matches!(kind, OverlayKind::Circle { .. }))
            .count()
    }

    pub fn fit_count(&self) -> usize {
        self.fits.len()
    }

    pub fn last_fit(&self) -> Option<&LatLngBounds> {
        self.fits.last().map(|(_, bounds)| bounds)
    }

    /// Make the next `remove_overlay` call fail
    pub fn fail_next_remove(&mut self) {
        self.fail_next_remove = true;
    }

    fn allocate(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn check_surface(&self, surface: SurfaceId) -> MapResult<()> {
        if self.surfaces.contains(&surface) {
            Ok(())
        } else {
            Err(MapError::UnknownSurface(surface))
        }
    }
}

impl MapBackend for RecordingBackend {
    fn create_surface(&mut self, center: Coordinate, zoom: f64) -> MapResult<SurfaceId> {
        let surface = SurfaceId(self.allocate());
        self.surfaces.insert(surface);
        self.surfaces_created += 1;
        self.calls.push(BackendCall::CreateSurface { center, zoom });
        trace!(surface = surface.0, zoom, "surface created");
        Ok(surface)
    }

    fn place_marker(&mut self, surface: SurfaceId, position: Coordinate, label: &str) -> MapResult<OverlayId> {
        self.check_surface(surface)?;
        let overlay = OverlayId(self.allocate());
        self.overlays.insert(
            overlay,
            (surface, OverlayKind::Marker { position, label: label.to_string() }),
        );
        self.calls.push(BackendCall::PlaceMarker { label: label.to_string() });
        trace!(overlay = overlay.0, label, "marker placed");
        Ok(overlay)
    }

    fn place_circle(
        &mut self,
        surface: SurfaceId,
        center: Coordinate,
        radius_m: f64,
        _style: &CircleStyle,
    ) -> MapResult<OverlayId> {
        self.check_surface(surface)?;
        let overlay = OverlayId(self.allocate());
        self.overlays.insert(overlay, (surface, OverlayKind::Circle { center, radius_m }));
        self.calls.push(BackendCall::PlaceCircle { radius_m });
        trace!(overlay = overlay.0, radius_m, "circle placed");
        Ok(overlay)
    }

    fn remove_overlay(&mut self, overlay: OverlayId) -> MapResult<()> {
        self.calls.push(BackendCall::RemoveOverlay(overlay));
        if self.fail_next_remove {
            self.fail_next_remove = false;
            return Err(MapError::BackendUnavailable("simulated removal failure".to_string()));
        }
        self.overlays
            .remove(&overlay)
            .map(|_| ())
            .ok_or(MapError::UnknownOverlay(overlay))
    }

    fn fit_bounds(&mut self, surface: SurfaceId, bounds: &LatLngBounds) -> MapResult<()> {
        self.check_surface(surface)?;
        self.fits.push((surface, *bounds));
        self.calls.push(BackendCall::FitBounds(*bounds));
        trace!(surface = surface.0, "viewport fitted");
        Ok(())
    }

    fn release_surface(&mut self, surface: SurfaceId) -> MapResult<()> {
        self.calls.push(BackendCall::ReleaseSurface(surface));
        if !self.surfaces.remove(&surface) {
            return Err(MapError::UnknownSurface(surface));
        }
        self.overlays.retain(|_, (owner, _)| *owner != surface);
        Ok(())
    }
}
