//! Route animation state machine
//!
//! [`RouteAnimator`] owns the single active route and turns clock ticks into
//! [`ProgressSample`]s for registered callbacks. Every arm or re-arm of a
//! traversal gets a new epoch; a tick that names a retired epoch is dropped,
//! so a scheduler can never move the marker of a route that was replaced.

use crate::algorithms::geomath;
use crate::api::types::{
    AnimationState, AnimatorEvent, AnimatorStats, CallbackHandle, RetireReason, RouteOverlay,
};
use crate::core::{ProgressSample, Route};
use crate::platform::{Clock, SystemClock};
use crate::validation::error::{AnimationError, Result};
use log::{debug, info};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Callback function type for marker samples
pub type SampleCallback = Box<dyn Fn(&ProgressSample) + Send>;

/// Callback function type for lifecycle events
pub type EventCallback = Box<dyn Fn(&AnimatorEvent) + Send>;

/// Repeating one-way route animator
pub struct RouteAnimator {
    /// Time source for arming epochs and hide samples
    clock: Arc<dyn Clock>,
    /// Current lifecycle state
    state: AnimationState,
    /// Bearing of the active route
    bearing_deg: f64,
    /// Last epoch handed out
    epoch_counter: u64,
    /// Callback handle counter
    callback_counter: u32,
    /// Sample callbacks, delivered in registration order
    sample_callbacks: BTreeMap<CallbackHandle, SampleCallback>,
    /// Event callbacks, delivered in registration order
    event_callbacks: BTreeMap<CallbackHandle, EventCallback>,
    /// Most recent emitted sample
    last_sample: Option<ProgressSample>,
    stats: AnimatorStats,
}

impl RouteAnimator {
    /// Create an idle animator reading time from `clock`
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: AnimationState::Idle,
            bearing_deg: 0.0,
            epoch_counter: 0,
            callback_counter: 0,
            sample_callbacks: BTreeMap::new(),
            event_callbacks: BTreeMap::new(),
            last_sample: None,
            stats: AnimatorStats::default(),
        }
    }

    /// Register a sample callback
    pub fn register_sample_callback(&mut self, callback: SampleCallback) -> CallbackHandle {
        self.callback_counter += 1;
        let handle = CallbackHandle::new(self.callback_counter);
        self.sample_callbacks.insert(handle, callback);
        handle
    }

    /// Register an event callback
    pub fn register_event_callback(&mut self, callback: EventCallback) -> CallbackHandle {
        self.callback_counter += 1;
        let handle = CallbackHandle::new(self.callback_counter);
        self.event_callbacks.insert(handle, callback);
        handle
    }

    /// Unregister a callback
    pub fn unregister_callback(&mut self, handle: CallbackHandle) -> Result<()> {
        let removed = self.sample_callbacks.remove(&handle).is_some()
            || self.event_callbacks.remove(&handle).is_some();

        if removed {
            Ok(())
        } else {
            Err(AnimationError::UnknownCallback(handle))
        }
    }

    /// Number of registered (sample, event) callbacks
    pub fn callback_count(&self) -> (usize, usize) {
        (self.sample_callbacks.len(), self.event_callbacks.len())
    }

    /// Start animating `route`, replacing whatever was running
    ///
    /// The previous epoch, if any, is retired first and its marker hidden.
    /// Restarting the route that is already running begins again at the
    /// origin. Routes whose endpoints coincide are accepted and re-arm on
    /// every tick.
    pub fn start(&mut self, route: Route) {
        self.retire(RetireReason::Replaced);

        let now = self.clock.now_millis();
        let distance_m = geomath::distance_meters(&route.origin, &route.destination);
        let duration_ms = geomath::traversal_duration_millis(&route.origin, &route.destination);
        self.bearing_deg = geomath::initial_bearing_degrees(&route.origin, &route.destination);
        self.stats.routes_started += 1;

        let epoch = self.arm(route, now, duration_ms);
        info!(
            "Route {} -> {} armed as epoch {} ({:.0} m, {} ms per traversal)",
            route.origin, route.destination, epoch, distance_m, duration_ms
        );

        let overlay = RouteOverlay {
            origin: route.origin,
            destination: route.destination,
            bounds: geomath::bounds(&route.origin, &route.destination),
            bearing_deg: self.bearing_deg,
            distance_m,
            duration_ms,
        };
        self.trigger_event(AnimatorEvent::RouteArmed { epoch, overlay });
        self.emit_origin_sample(route, epoch, now);
    }

    /// Stop the running route and hide the marker
    ///
    /// Does nothing when idle or already cancelled.
    pub fn cancel(&mut self) {
        if self.retire(RetireReason::Cancelled) {
            self.state = AnimationState::Cancelled;
        }
    }

    /// Advance the running traversal to `now_ms`
    ///
    /// Returns false when nothing is running.
    pub fn on_tick(&mut self, now_ms: u64) -> bool {
        let (route, epoch, start_time_ms, duration_ms) = match self.state {
            AnimationState::Running {
                route,
                epoch,
                start_time_ms,
                duration_ms,
            } => (route, epoch, start_time_ms, duration_ms),
            _ => return false,
        };

        let fraction = progress_fraction(now_ms, start_time_ms, duration_ms);
        self.emit_sample(ProgressSample {
            position: geomath::interpolate(&route.origin, &route.destination, fraction),
            bearing_deg: self.bearing_deg,
            marker_visible: true,
            fraction,
            epoch,
            timestamp_ms: now_ms,
        });

        if fraction >= 1.0 {
            let next = self.arm(route, now_ms, duration_ms);
            debug!("Epoch {} completed, re-armed as epoch {}", epoch, next);
            self.trigger_event(AnimatorEvent::Rearmed { epoch: next });
            self.emit_origin_sample(route, next, now_ms);
        }

        true
    }

    /// Advance only if `epoch` is still the running epoch
    ///
    /// Schedulers capture the epoch when they schedule a tick and deliver it
    /// through here, so ticks scheduled before a `start` or `cancel` are
    /// dropped.
    pub fn on_tick_for(&mut self, epoch: u64, now_ms: u64) -> bool {
        if self.current_epoch() != Some(epoch) {
            self.stats.stale_ticks_discarded += 1;
            debug!("Discarding tick for stale epoch {}", epoch);
            return false;
        }
        self.on_tick(now_ms)
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// Epoch of the running traversal
    pub fn current_epoch(&self) -> Option<u64> {
        match self.state {
            AnimationState::Running { epoch, .. } => Some(epoch),
            _ => None,
        }
    }

    /// Route being animated
    pub fn route(&self) -> Option<Route> {
        match self.state {
            AnimationState::Running { route, .. } => Some(route),
            _ => None,
        }
    }

    pub fn last_sample(&self) -> Option<&ProgressSample> {
        self.last_sample.as_ref()
    }

    pub fn stats(&self) -> AnimatorStats {
        self.stats
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    fn arm(&mut self, route: Route, start_time_ms: u64, duration_ms: u64) -> u64 {
        self.epoch_counter += 1;
        self.stats.epochs_armed += 1;
        self.state = AnimationState::Running {
            route,
            epoch: self.epoch_counter,
            start_time_ms,
            duration_ms,
        };
        self.epoch_counter
    }

    /// Tear down the running epoch, emitting its hide sample
    fn retire(&mut self, reason: RetireReason) -> bool {
        let (route, epoch) = match self.state {
            AnimationState::Running { route, epoch, .. } => (route, epoch),
            _ => return false,
        };

        let (position, fraction) = match self.last_sample {
            Some(sample) if sample.epoch == epoch => (sample.position, sample.fraction),
            _ => (route.origin, 0.0),
        };
        self.emit_sample(ProgressSample {
            position,
            bearing_deg: self.bearing_deg,
            marker_visible: false,
            fraction,
            epoch,
            timestamp_ms: self.clock.now_millis(),
        });
        self.trigger_event(AnimatorEvent::RouteRetired { epoch, reason });

        if reason == RetireReason::Cancelled {
            info!("Route animation cancelled at epoch {}", epoch);
        }
        self.state = AnimationState::Idle;
        true
    }

    fn emit_origin_sample(&mut self, route: Route, epoch: u64, now_ms: u64) {
        self.emit_sample(ProgressSample {
            position: route.origin,
            bearing_deg: self.bearing_deg,
            marker_visible: true,
            fraction: 0.0,
            epoch,
            timestamp_ms: now_ms,
        });
    }

    fn emit_sample(&mut self, sample: ProgressSample) {
        self.last_sample = Some(sample);
        self.stats.samples_emitted += 1;
        for callback in self.sample_callbacks.values() {
            callback(&sample);
        }
    }

    fn trigger_event(&self, event: AnimatorEvent) {
        for callback in self.event_callbacks.values() {
            callback(&event);
        }
    }
}

impl Default for RouteAnimator {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock::new()))
    }
}

/// `clamp(elapsed / duration, 0, 1)`; a zero duration is always complete
fn progress_fraction(now_ms: u64, start_time_ms: u64, duration_ms: u64) -> f64 {
    if duration_ms == 0 {
        return 1.0;
    }
    let elapsed = now_ms.saturating_sub(start_time_ms);
    (elapsed as f64 / duration_ms as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Coordinate;
    use crate::platform::ManualClock;
    use std::sync::Mutex;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn equator_route() -> Route {
        Route::new(coord(0.0, 0.0), coord(0.0, 1.0))
    }

    struct Harness {
        clock: ManualClock,
        animator: RouteAnimator,
        samples: Arc<Mutex<Vec<ProgressSample>>>,
        events: Arc<Mutex<Vec<AnimatorEvent>>>,
    }

    impl Harness {
        fn new() -> Self {
            let clock = ManualClock::new(0);
            let mut animator = RouteAnimator::new(Arc::new(clock.clone()));
            let samples = Arc::new(Mutex::new(Vec::new()));
            let events = Arc::new(Mutex::new(Vec::new()));

            let sink = Arc::clone(&samples);
            animator.register_sample_callback(Box::new(move |s: &ProgressSample| sink.lock().unwrap().push(*s)));
            let sink = Arc::clone(&events);
            animator.register_event_callback(Box::new(move |e: &AnimatorEvent| sink.lock().unwrap().push(e.clone())));

            Self { clock, animator, samples, events }
        }

        fn take_samples(&self) -> Vec<ProgressSample> {
            std::mem::take(&mut *self.samples.lock().unwrap())
        }

        fn take_events(&self) -> Vec<AnimatorEvent> {
            std::mem::take(&mut *self.events.lock().unwrap())
        }
    }

    #[test]
    fn test_start_emits_visible_origin_sample() {
        let mut h = Harness::new();
        h.animator.start(equator_route());

        let samples = h.take_samples();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].position, coord(0.0, 0.0));
        assert_eq!(samples[0].fraction, 0.0);
        assert!(samples[0].marker_visible);
        assert!((samples[0].bearing_deg - 90.0).abs() < 1e-9);

        match h.animator.state() {
            AnimationState::Running { duration_ms, start_time_ms, .. } => {
                assert_eq!(duration_ms, 111);
                assert_eq!(start_time_ms, 0);
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_traversal_completes_and_rearms() {
        let mut h = Harness::new();
        h.animator.start(equator_route());
        h.take_samples();

        assert!(h.animator.on_tick(0));
        let samples = h.take_samples();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].position, coord(0.0, 0.0));
        assert!(samples[0].marker_visible);

        let first_epoch = h.animator.current_epoch().unwrap();
        h.animator.on_tick(111);
        let samples = h.take_samples();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].fraction, 1.0);
        assert_eq!(samples[0].position, coord(0.0, 1.0));
        assert_eq!(samples[0].epoch, first_epoch);
        assert_eq!(samples[1].fraction, 0.0);
        assert_eq!(samples[1].position, coord(0.0, 0.0));
        assert!(samples[1].marker_visible);
        assert!(samples[1].epoch > first_epoch);

        match h.animator.state() {
            AnimationState::Running { start_time_ms, .. } => assert_eq!(start_time_ms, 111),
            other => panic!("unexpected state {:?}", other),
        }
        assert!(h
            .take_events()
            .contains(&AnimatorEvent::Rearmed { epoch: samples[1].epoch }));
    }

    #[test]
    fn test_midway_tick_interpolates() {
        let mut h = Harness::new();
        let route = Route::new(coord(10.0, 10.0), coord(12.0, 14.0));
        h.animator.start(route);
        let duration = geomath::traversal_duration_millis(&route.origin, &route.destination);
        h.take_samples();

        h.animator.on_tick(duration / 2);
        let sample = h.take_samples()[0];
        let expected = (duration / 2) as f64 / duration as f64;
        assert_eq!(sample.fraction, expected);
        assert_eq!(
            sample.position,
            geomath::interpolate(&route.origin, &route.destination, expected)
        );
    }

    #[test]
    fn test_tick_past_duration_is_clamped() {
        let mut h = Harness::new();
        h.animator.start(equator_route());
        h.take_samples();

        h.animator.on_tick(5_000);
        let samples = h.take_samples();
        assert_eq!(samples[0].fraction, 1.0);
        assert_eq!(samples[0].position, coord(0.0, 1.0));
        assert_eq!(samples[1].fraction, 0.0);
    }

    #[test]
    fn test_tick_before_start_time_is_fraction_zero() {
        let mut h = Harness::new();
        h.clock.set(500);
        h.animator.start(equator_route());
        h.take_samples();

        h.animator.on_tick(400);
        assert_eq!(h.take_samples()[0].fraction, 0.0);
    }

    #[test]
    fn test_replacing_route_hides_previous_once() {
        let mut h = Harness::new();
        let route_a = equator_route();
        let route_b = Route::new(coord(5.0, 5.0), coord(6.0, 6.0));

        h.animator.start(route_a);
        let epoch_a = h.animator.current_epoch().unwrap();
        h.animator.start(route_b);
        let epoch_b = h.animator.current_epoch().unwrap();
        assert_ne!(epoch_a, epoch_b);

        let samples = h.take_samples();
        let hidden: Vec<_> = samples.iter().filter(|s| !s.marker_visible).collect();
        assert_eq!(hidden.len(), 1);
        assert_eq!(hidden[0].epoch, epoch_a);

        // The hide sample comes before anything from route B
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[1].epoch, epoch_a);
        assert!(!samples[1].marker_visible);
        assert_eq!(samples[2].epoch, epoch_b);
        assert_eq!(samples[2].fraction, 0.0);
        assert_eq!(samples[2].position, route_b.origin);

        // A tick scheduled for A is dropped
        assert!(!h.animator.on_tick_for(epoch_a, 10));
        assert!(h.take_samples().is_empty());
        assert_eq!(h.animator.stats().stale_ticks_discarded, 1);

        assert!(h.animator.on_tick_for(epoch_b, 10));
        assert!(h.take_samples().iter().all(|s| s.epoch == epoch_b));

        let events = h.take_events();
        assert!(events.contains(&AnimatorEvent::RouteRetired {
            epoch: epoch_a,
            reason: RetireReason::Replaced,
        }));
    }

    #[test]
    fn test_restarting_same_route_resets_progress() {
        let mut h = Harness::new();
        h.animator.start(equator_route());
        h.animator.on_tick(50);
        h.clock.set(60);
        h.animator.start(equator_route());

        let last = *h.animator.last_sample().unwrap();
        assert_eq!(last.fraction, 0.0);
        assert!(last.marker_visible);
        match h.animator.state() {
            AnimationState::Running { start_time_ms, .. } => assert_eq!(start_time_ms, 60),
            other => panic!("unexpected state {:?}", other),
        }
        assert_eq!(h.animator.stats().routes_started, 2);
    }

    #[test]
    fn test_cancel_from_idle_is_silent() {
        let mut h = Harness::new();
        h.animator.cancel();
        assert!(h.take_samples().is_empty());
        assert!(h.take_events().is_empty());
        assert_eq!(h.animator.state(), AnimationState::Idle);
    }

    #[test]
    fn test_cancel_hides_marker_and_stops_ticks() {
        let mut h = Harness::new();
        h.animator.start(equator_route());
        h.animator.on_tick(40);
        let epoch = h.animator.current_epoch().unwrap();
        let position = h.animator.last_sample().unwrap().position;
        h.take_samples();

        h.animator.cancel();
        let samples = h.take_samples();
        assert_eq!(samples.len(), 1);
        assert!(!samples[0].marker_visible);
        assert_eq!(samples[0].epoch, epoch);
        assert_eq!(samples[0].position, position);
        assert_eq!(h.animator.state(), AnimationState::Cancelled);

        assert!(!h.animator.on_tick(80));
        assert!(!h.animator.on_tick_for(epoch, 80));
        assert!(h.take_samples().is_empty());

        // Cancelling twice is a no-op
        h.animator.cancel();
        assert!(h.take_samples().is_empty());

        // And the animator can be started again
        h.animator.start(equator_route());
        assert!(h.animator.state().is_running());
    }

    #[test]
    fn test_degenerate_route_rearms_every_tick() {
        let mut h = Harness::new();
        let point = coord(45.0, 7.0);
        h.animator.start(Route::new(point, point));
        h.take_samples();

        for now in [1, 2, 3] {
            let before = h.animator.current_epoch().unwrap();
            h.animator.on_tick(now);
            let samples = h.take_samples();
            assert_eq!(samples.len(), 2);
            assert_eq!(samples[0].fraction, 1.0);
            assert_eq!(samples[0].position, point);
            assert_eq!(samples[1].fraction, 0.0);
            assert_eq!(h.animator.current_epoch().unwrap(), before + 1);
        }

        match h.animator.state() {
            AnimationState::Running { duration_ms, .. } => assert_eq!(duration_ms, 0),
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_route_armed_event_carries_overlay() {
        let mut h = Harness::new();
        h.animator.start(equator_route());

        let events = h.take_events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            AnimatorEvent::RouteArmed { overlay, .. } => {
                assert_eq!(overlay.duration_ms, 111);
                assert_eq!(overlay.bounds.south_west, coord(0.0, 0.0));
                assert_eq!(overlay.bounds.north_east, coord(0.0, 1.0));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_unregister_callback() {
        let mut h = Harness::new();
        assert_eq!(h.animator.callback_count(), (1, 1));

        let handle = h.animator.register_sample_callback(Box::new(|_: &ProgressSample| {}));
        assert_eq!(h.animator.callback_count(), (2, 1));
        h.animator.unregister_callback(handle).unwrap();
        assert!(matches!(
            h.animator.unregister_callback(handle),
            Err(AnimationError::UnknownCallback(_))
        ));
    }

    #[test]
    fn test_progress_fraction() {
        assert_eq!(progress_fraction(0, 0, 0), 1.0);
        assert_eq!(progress_fraction(50, 0, 100), 0.5);
        assert_eq!(progress_fraction(250, 0, 100), 1.0);
        assert_eq!(progress_fraction(10, 20, 100), 0.0);
    }
}
