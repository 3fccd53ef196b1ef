//! Check-in session
//!
//! Wires the control flow: tracker updates are evaluated against the
//! geofence, the map is reconciled, and a user-triggered check-in is recorded
//! only while the latest position is inside the fence. Everything runs on one
//! thread; [`CheckInSession::pump`] is the event-loop step.

use crate::algorithms::evaluate;
use crate::api::{LocationTracker, LocationUpdate, TrackerError};
use crate::checkin::{CheckInError, CheckInRecord, CheckInRecorder, CheckInStore, StoreError};
use crate::core::{GeofenceSpec, PositionSample, RangeState, UserIdentity};
use crate::map::{MapBackend, MapError, MapSyncController};
use crate::platform::{GeolocationProvider, LocationError};
use chrono::{DateTime, Local};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors surfaced by session operations
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Location(#[from] LocationError),
    #[error(transparent)]
    Tracker(#[from] TrackerError),
    #[error(transparent)]
    Map(#[from] MapError),
    #[error(transparent)]
    CheckIn(#[from] CheckInError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Live check-in session for one user and one geofence
pub struct CheckInSession<P: GeolocationProvider, B: MapBackend> {
    user: UserIdentity,
    fence: GeofenceSpec,
    tracker: LocationTracker<P>,
    map: MapSyncController<B>,
    recorder: CheckInRecorder,
    inbox: Rc<RefCell<VecDeque<LocationUpdate>>>,
    position: Option<PositionSample>,
    range: RangeState,
    last_error: Option<LocationError>,
}

impl<P: GeolocationProvider, B: MapBackend> CheckInSession<P, B> {
    pub fn new(
        user: UserIdentity,
        fence: GeofenceSpec,
        tracker: LocationTracker<P>,
        map: MapSyncController<B>,
    ) -> Self {
        Self {
            user,
            fence,
            tracker,
            map,
            recorder: CheckInRecorder::new(),
            inbox: Rc::new(RefCell::new(VecDeque::new())),
            position: None,
            range: RangeState::Unknown,
            last_error: None,
        }
    }

    pub fn user(&self) -> &UserIdentity {
        &self.user
    }

    pub fn fence(&self) -> &GeofenceSpec {
        &self.fence
    }

    pub fn range_state(&self) -> RangeState {
        self.range
    }

    /// Whether the check-in action should be enabled
    pub fn can_check_in(&self) -> bool {
        self.range.is_inside()
    }

    pub fn position(&self) -> Option<&PositionSample> {
        self.position.as_ref()
    }

    pub fn last_error(&self) -> Option<LocationError> {
        self.last_error
    }

    pub fn tracker(&self) -> &LocationTracker<P> {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut LocationTracker<P> {
        &mut self.tracker
    }

    pub fn map(&self) -> &MapSyncController<B> {
        &self.map
    }

    /// Begin continuous tracking
    pub fn start(&mut self) -> SessionResult<()> {
        let inbox = Rc::clone(&self.inbox);
        self.tracker
            .start(Box::new(move |update| inbox.borrow_mut().push_back(update)))?;
        Ok(())
    }

    /// Stop tracking. Updates not yet pumped are discarded.
    pub fn stop(&mut self) {
        self.tracker.stop();
        self.inbox.borrow_mut().clear();
    }

    /// Process every pending tracker update in order, then run a due
    /// viewport fit. Returns the number of updates applied.
    pub fn pump(&mut self, now: Instant) -> SessionResult<usize> {
        self.tracker.process();

        let mut applied = 0;
        loop {
            let next = self.inbox.borrow_mut().pop_front();
            let Some(update) = next else { break };
            self.apply(update, now)?;
            applied += 1;
        }

        self.map.poll(now)?;
        Ok(applied)
    }

    /// Manual "reload position": one single-shot fetch, applied like a
    /// tracker update. A failure is recorded and also returned.
    pub fn reload_position(&mut self, now: Instant) -> SessionResult<RangeState> {
        let update = self.tracker.fetch_once();
        let failure = update.as_ref().err().copied();
        self.apply(update, now)?;
        match failure {
            Some(error) => Err(error.into()),
            None => Ok(self.range),
        }
    }

    /// Record a check-in at the current local time and append it to `store`
    pub fn check_in<S: CheckInStore + ?Sized>(&self, store: &mut S) -> SessionResult<CheckInRecord> {
        self.check_in_at(store, Local::now())
    }

    /// Record a check-in stamped `now` and append it to `store`.
    /// Nothing is appended when the check-in is refused.
    pub fn check_in_at<S: CheckInStore + ?Sized>(
        &self,
        store: &mut S,
        now: DateTime<Local>,
    ) -> SessionResult<CheckInRecord> {
        let existing = store.records_for(self.user.id);
        let record = self.recorder.record_at(
            &self.user,
            self.position.as_ref(),
            &self.fence,
            self.range,
            &existing,
            now,
        )?;
        store.append(record.clone())?;
        Ok(record)
    }

    /// Stop tracking and tear down the map surface
    pub fn shutdown(&mut self) -> SessionResult<()> {
        self.stop();
        self.map.dispose()?;
        info!(user = self.user.id, "session shut down");
        Ok(())
    }

    fn apply(&mut self, update: LocationUpdate, now: Instant) -> SessionResult<()> {
        match update {
            Ok(sample) => {
                let range = evaluate(Some(&sample), &self.fence);
                if range != self.range {
                    info!(from = ?self.range, to = ?range, "range state changed");
                }
                let coordinate = sample.coordinate;
                self.range = range;
                self.position = Some(sample);
                self.last_error = None;
                self.map.reconcile_at(Some(coordinate), Some(&self.fence), now)?;
                debug!(?range, "position applied");
            }
            Err(error) => {
                warn!(%error, "location unavailable, check-in disabled");
                self.position = None;
                self.range = RangeState::Unknown;
                self.last_error = Some(error);
            }
        }
        Ok(())
    }
}
