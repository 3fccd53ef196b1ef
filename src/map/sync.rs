//! Map synchronization controller
//!
//! Keeps one long-lived map surface consistent with the latest user position
//! and geofence. Each reconciliation pass removes the previous overlays before
//! placing new ones, and viewport fits are debounced through a single
//! cancellable pending task that the event loop drives with [`MapSyncController::poll`].

use crate::core::{Coordinate, GeofenceSpec};
use crate::map::backend::{MapBackend, MapError, MapResult, OverlayId, SurfaceId};
use crate::map::types::{LatLngBounds, MapOptions};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Result of a reconciliation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// No position yet; nothing was drawn
    Placeholder,
    /// Overlays were rebuilt
    Rendered {
        /// Live overlays after the pass
        overlays: usize,
        /// Whether a viewport fit is now pending
        fit_scheduled: bool,
    },
}

/// Overlays owned by the controller; at most one of each
#[derive(Debug, Default)]
struct OverlaySet {
    user_marker: Option<OverlayId>,
    fence_marker: Option<OverlayId>,
    fence_circle: Option<OverlayId>,
}

impl OverlaySet {
    fn len(&self) -> usize {
        [self.user_marker, self.fence_marker, self.fence_circle]
            .iter()
            .filter(|slot| slot.is_some())
            .count()
    }

    fn slots_mut(&mut self) -> [&mut Option<OverlayId>; 3] {
        [&mut self.user_marker, &mut self.fence_marker, &mut self.fence_circle]
    }
}

/// Viewport fit waiting for the settle delay to elapse
#[derive(Debug, Clone, Copy)]
struct PendingFit {
    due: Instant,
    bounds: LatLngBounds,
}

/// Sole owner of the map surface and its overlays
pub struct MapSyncController<B: MapBackend> {
    backend: B,
    options: MapOptions,
    surface: Option<SurfaceId>,
    overlays: OverlaySet,
    pending_fit: Option<PendingFit>,
    fits_executed: u64,
    disposed: bool,
}

impl<B: MapBackend> MapSyncController<B> {
    pub fn new(backend: B, options: MapOptions) -> Self {
        Self {
            backend,
            options,
            surface: None,
            overlays: OverlaySet::default(),
            pending_fit: None,
            fits_executed: 0,
            disposed: false,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    /// Surface handle, once the first position has been rendered
    pub fn surface(&self) -> Option<SurfaceId> {
        self.surface
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    pub fn has_pending_fit(&self) -> bool {
        self.pending_fit.is_some()
    }

    /// When the pending fit becomes due, if any
    pub fn pending_fit_due(&self) -> Option<Instant> {
        self.pending_fit.map(|fit| fit.due)
    }

    pub fn fits_executed(&self) -> u64 {
        self.fits_executed
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Reconcile overlays against the latest inputs, using the current time
    pub fn reconcile(&mut self, user: Option<Coordinate>, fence: Option<&GeofenceSpec>) -> MapResult<ReconcileOutcome> {
        self.reconcile_at(user, fence, Instant::now())
    }

    /// Reconcile overlays against the latest inputs.
    ///
    /// Creates the surface on the first position, replaces all overlays and,
    /// when both a position and a fence are present, schedules a viewport fit
    /// `settle_delay_ms` after `now`. Any previously pending fit is cancelled.
    pub fn reconcile_at(
        &mut self,
        user: Option<Coordinate>,
        fence: Option<&GeofenceSpec>,
        now: Instant,
    ) -> MapResult<ReconcileOutcome> {
        if self.disposed {
            return Err(MapError::Disposed);
        }

        let Some(user) = user else {
            debug!("no position yet, showing placeholder");
            return Ok(ReconcileOutcome::Placeholder);
        };

        let surface = self.ensure_surface(user)?;

        if self.pending_fit.take().is_some() {
            debug!("cancelled pending viewport fit");
        }

        self.clear_overlays()?;

        self.overlays.user_marker = Some(self.backend.place_marker(surface, user, &self.options.user_label)?);

        let mut fit_scheduled = false;
        if let Some(fence) = fence {
            let center = fence.center();
            self.overlays.fence_marker =
                Some(self.backend.place_marker(surface, center, &self.options.fence_label)?);
            self.overlays.fence_circle = Some(self.backend.place_circle(
                surface,
                center,
                fence.radius_m(),
                &self.options.circle_style,
            )?);

            let mut bounds = LatLngBounds::from_point(&user);
            bounds.extend_circle(&center, fence.radius_m());
            self.pending_fit = Some(PendingFit {
                due: now + Duration::from_millis(self.options.settle_delay_ms),
                bounds: bounds.padded(self.options.fit_padding_factor),
            });
            fit_scheduled = true;
            debug!(delay_ms = self.options.settle_delay_ms, "viewport fit scheduled");
        }

        Ok(ReconcileOutcome::Rendered {
            overlays: self.overlays.len(),
            fit_scheduled,
        })
    }

    /// Run the pending viewport fit if its settle delay has elapsed.
    /// Returns whether a fit was applied.
    pub fn poll(&mut self, now: Instant) -> MapResult<bool> {
        let (Some(surface), Some(fit)) = (self.surface, self.pending_fit) else {
            return Ok(false);
        };
        if fit.due > now {
            return Ok(false);
        }

        self.pending_fit = None;
        self.backend.fit_bounds(surface, &fit.bounds)?;
        self.fits_executed += 1;
        debug!(
            south = fit.bounds.south,
            west = fit.bounds.west,
            north = fit.bounds.north,
            east = fit.bounds.east,
            "viewport fitted"
        );
        Ok(true)
    }

    /// Remove all overlays, cancel the pending fit and release the surface.
    ///
    /// The controller rejects further reconciliation afterwards.
    pub fn dispose(&mut self) -> MapResult<()> {
        if self.disposed {
            return Ok(());
        }
        self.disposed = true;
        self.pending_fit = None;

        let cleared = self.clear_overlays();
        let released = match self.surface.take() {
            Some(surface) => self.backend.release_surface(surface),
            None => Ok(()),
        };
        info!("map surface disposed");
        cleared.and(released)
    }

    fn ensure_surface(&mut self, center: Coordinate) -> MapResult<SurfaceId> {
        if let Some(surface) = self.surface {
            return Ok(surface);
        }
        let surface = self.backend.create_surface(center, self.options.default_zoom)?;
        self.surface = Some(surface);
        info!(
            lat = center.latitude(),
            lng = center.longitude(),
            zoom = self.options.default_zoom,
            "map surface created"
        );
        Ok(surface)
    }

    /// Remove every live overlay. Overlays whose removal failed stay in the
    /// set so the next pass retries them; no new overlays are added meanwhile.
    fn clear_overlays(&mut self) -> MapResult<()> {
        let mut first_error = None;
        for slot in self.overlays.slots_mut() {
            let Some(overlay) = *slot else { continue };
            match self.backend.remove_overlay(overlay) {
                Ok(()) | Err(MapError::UnknownOverlay(_)) => *slot = None,
                Err(error) => {
                    warn!(overlay = overlay.0, %error, "failed to remove overlay");
                    first_error.get_or_insert(error);
                }
            }
        }
        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl<B: MapBackend> Drop for MapSyncController<B> {
    fn drop(&mut self) {
        if let Err(error) = self.dispose() {
            warn!(%error, "map teardown incomplete");
        }
    }
}
