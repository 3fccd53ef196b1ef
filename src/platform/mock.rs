//! Mock geolocation provider for testing and development

use crate::platform::{
    GeolocationProvider, PlatformError, PlatformEvent, PositionFix, PositionOptions, WatchId,
};
use std::collections::{HashSet, VecDeque};
use std::time::{SystemTime, UNIX_EPOCH};

/// Scripted geolocation platform.
///
/// Events are queued per subscription and stay queued after `clear_watch`,
/// the way a real platform may still hold a late callback. Consumers must
/// stop polling a released watch themselves.
pub struct MockGeolocationProvider {
    next_watch: u32,
    active_watches: HashSet<WatchId>,
    cleared_watches: Vec<WatchId>,
    queued: VecDeque<(WatchId, PlatformEvent)>,
    one_shot: VecDeque<PlatformEvent>,
    cached_fix: Option<PositionFix>,
    clock_ms: Option<u64>,
    permission_denied: bool,
    simulate_errors: bool,
    error_probability: f32,
    last_options: Option<PositionOptions>,
}

impl MockGeolocationProvider {
    /// Create a new mock provider
    pub fn new() -> Self {
        Self {
            next_watch: 0,
            active_watches: HashSet::new(),
            cleared_watches: Vec::new(),
            queued: VecDeque::new(),
            one_shot: VecDeque::new(),
            cached_fix: None,
            clock_ms: None,
            permission_denied: false,
            simulate_errors: false,
            error_probability: 0.0,
            last_options: None,
        }
    }

    /// Queue a fix for the most recently created subscription
    pub fn push_fix(&mut self, fix: PositionFix) {
        self.push_event(Ok(fix));
    }

    /// Queue a platform error code for the most recently created subscription
    pub fn push_error(&mut self, code: u16) {
        self.push_event(Err(PlatformError::new(code, "mock platform error")));
    }

    /// Queue an event for the most recently created subscription,
    /// whether or not it has been cleared
    pub fn push_event(&mut self, event: PlatformEvent) {
        if self.next_watch == 0 {
            return;
        }
        let watch = WatchId(self.next_watch);
        self.queued.push_back((watch, event));
    }

    /// Queue the answer to the next single-shot request
    pub fn push_one_shot(&mut self, event: PlatformEvent) {
        self.one_shot.push_back(event);
    }

    /// Refuse every subsequent request with PERMISSION_DENIED
    pub fn deny_permission(&mut self) {
        self.permission_denied = true;
    }

    pub fn grant_permission(&mut self) {
        self.permission_denied = false;
    }

    /// Pin the mock clock used to judge cached fix age (milliseconds since epoch)
    pub fn set_clock_ms(&mut self, now_ms: u64) {
        self.clock_ms = Some(now_ms);
    }

    /// Enable timeout simulation with given probability (0.0 to 1.0)
    pub fn simulate_errors(&mut self, enable: bool, probability: f32) {
        self.simulate_errors = enable;
        self.error_probability = probability.clamp(0.0, 1.0);
    }

    /// Number of subscriptions not yet released
    pub fn active_watch_count(&self) -> usize {
        self.active_watches.len()
    }

    pub fn cleared_watches(&self) -> &[WatchId] {
        &self.cleared_watches
    }

    /// Number of events still waiting in the queue, across all watches
    pub fn queued_event_count(&self) -> usize {
        self.queued.len()
    }

    /// Options passed with the latest request
    pub fn last_options(&self) -> Option<&PositionOptions> {
        self.last_options.as_ref()
    }

    fn now_ms(&self) -> u64 {
        self.clock_ms.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        })
    }

    fn should_simulate_error(&self) -> bool {
        if !self.simulate_errors {
            return false;
        }

        use rand::Rng;
        let mut rng = rand::thread_rng();
        rng.gen::<f32>() < self.error_probability
    }

    fn denied() -> PlatformEvent {
        Err(PlatformError::new(
            PlatformError::PERMISSION_DENIED,
            "User denied Geolocation",
        ))
    }

    fn timed_out(timeout_ms: u64) -> PlatformEvent {
        Err(PlatformError::new(
            PlatformError::TIMEOUT,
            format!("Timeout expired after {} ms", timeout_ms),
        ))
    }
}

impl Default for MockGeolocationProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl GeolocationProvider for MockGeolocationProvider {
    fn watch_position(&mut self, options: &PositionOptions) -> WatchId {
        self.next_watch += 1;
        let watch = WatchId(self.next_watch);
        self.active_watches.insert(watch);
        self.last_options = Some(options.clone());
        if self.permission_denied {
            self.queued.push_back((watch, Self::denied()));
        }
        watch
    }

    fn clear_watch(&mut self, watch: WatchId) {
        if self.active_watches.remove(&watch) {
            self.cleared_watches.push(watch);
        }
    }

    fn next_event(&mut self, watch: WatchId) -> Option<PlatformEvent> {
        let index = self.queued.iter().position(|(id, _)| *id == watch)?;
        let (_, event) = self.queued.remove(index)?;

        if self.should_simulate_error() {
            let timeout = self.last_options.as_ref().map(|o| o.timeout_ms).unwrap_or(0);
            return Some(Self::timed_out(timeout));
        }

        if let Ok(fix) = &event {
            self.cached_fix = Some(fix.clone());
        }
        Some(event)
    }

    fn current_position(&mut self, options: &PositionOptions) -> PlatformEvent {
        self.last_options = Some(options.clone());
        if self.permission_denied {
            return Self::denied();
        }

        if let Some(cached) = &self.cached_fix {
            if self.now_ms().saturating_sub(cached.timestamp_ms) <= options.max_cached_age_ms {
                return Ok(cached.clone());
            }
        }

        match self.one_shot.pop_front() {
            Some(Ok(fix)) => {
                self.cached_fix = Some(fix.clone());
                Ok(fix)
            }
            Some(Err(error)) => Err(error),
            None => Self::timed_out(options.timeout_ms),
        }
    }
}
