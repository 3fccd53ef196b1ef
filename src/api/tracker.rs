//! Callback-based location tracker
//!
//! Bridges a [`GeolocationProvider`] to a single stream of
//! `Result<PositionSample, LocationError>` deliveries. Drive it by calling
//! [`LocationTracker::process`] from the event loop.

use crate::api::types::{LocationCallback, LocationUpdate, TrackerError, TrackerResult, TrackerState};
use crate::core::{Coordinate, PositionSample};
use crate::platform::{GeolocationProvider, LocationError, PlatformEvent, PositionOptions, WatchId};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// Continuous location tracker with an Idle/Tracking/Stopped lifecycle
pub struct LocationTracker<P: GeolocationProvider> {
    provider: P,
    options: PositionOptions,
    state: TrackerState,
    watch: Option<WatchId>,
    callback: Option<LocationCallback>,
    delivered: u64,
}

impl<P: GeolocationProvider> LocationTracker<P> {
    pub fn new(provider: P, options: PositionOptions) -> Self {
        Self {
            provider,
            options,
            state: TrackerState::Idle,
            watch: None,
            callback: None,
            delivered: 0,
        }
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn options(&self) -> &PositionOptions {
        &self.options
    }

    /// Total number of updates handed to callbacks
    pub fn delivered_count(&self) -> u64 {
        self.delivered
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    /// Subscribe to continuous sampling and deliver updates to `callback`.
    ///
    /// Allowed from Idle or Stopped; each start opens a fresh subscription.
    pub fn start(&mut self, callback: LocationCallback) -> TrackerResult<()> {
        if self.state == TrackerState::Tracking {
            return Err(TrackerError::AlreadyTracking);
        }

        let watch = self.provider.watch_position(&self.options);
        self.watch = Some(watch);
        self.callback = Some(callback);
        self.state = TrackerState::Tracking;
        info!(watch = watch.0, high_accuracy = self.options.high_accuracy, "location tracking started");
        Ok(())
    }

    /// Release the subscription. No callback fires after this returns.
    pub fn stop(&mut self) {
        if self.state != TrackerState::Tracking {
            return;
        }

        self.release();
        self.state = TrackerState::Stopped;
        info!(delivered = self.delivered, "location tracking stopped");
    }

    /// Deliver every event the platform has queued for the active
    /// subscription, in platform order. Returns the number delivered.
    pub fn process(&mut self) -> usize {
        let (Some(watch), Some(callback)) = (self.watch, self.callback.as_mut()) else {
            return 0;
        };

        let mut count = 0;
        while let Some(event) = self.provider.next_event(watch) {
            let update = normalize(event);
            match &update {
                Ok(sample) => debug!(
                    lat = sample.coordinate.latitude(),
                    lng = sample.coordinate.longitude(),
                    "position sample"
                ),
                Err(error) => warn!(%error, "position sampling failed"),
            }
            callback(update);
            count += 1;
        }

        self.delivered += count as u64;
        count
    }

    /// Single-shot fetch with the tracker's options
    pub fn fetch_once(&mut self) -> LocationUpdate {
        let options = self.options.clone();
        self.fetch_once_with(&options)
    }

    /// Single-shot fetch, independent of any active subscription
    pub fn fetch_once_with(&mut self, options: &PositionOptions) -> LocationUpdate {
        let update = normalize(self.provider.current_position(options));
        if let Err(error) = &update {
            warn!(%error, "one-shot position fetch failed");
        }
        update
    }

    fn release(&mut self) {
        if let Some(watch) = self.watch.take() {
            self.provider.clear_watch(watch);
            debug!(watch = watch.0, "released location subscription");
        }
        self.callback = None;
    }
}

impl<P: GeolocationProvider> Drop for LocationTracker<P> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Convert a raw platform event into a tracker update
pub(crate) fn normalize(event: PlatformEvent) -> LocationUpdate {
    match event {
        Ok(fix) => {
            let coordinate = Coordinate::new(fix.latitude, fix.longitude)
                .map_err(|_| LocationError::Unavailable)?;
            let observed_at = Some(fix.timestamp_ms)
                .filter(|ms| *ms > 0)
                .and_then(|ms| i64::try_from(ms).ok())
                .and_then(DateTime::<Utc>::from_timestamp_millis)
                .unwrap_or_else(Utc::now);
            let mut sample = PositionSample::new(coordinate, observed_at);
            if fix.accuracy_m > 0.0 {
                sample = sample.with_accuracy(fix.accuracy_m);
            }
            Ok(sample)
        }
        Err(error) => Err(LocationError::from(&error)),
    }
}
