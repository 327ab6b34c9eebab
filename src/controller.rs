//! Cross-device interaction controller.
//!
//! Decides whether the overlay bound to one element is open, given hover,
//! touch and click input. Hover is low-intent and debounced through a
//! single deferred-open deadline; touch and click are high-intent and flip
//! the state immediately.
//!
//! The controller is a plain owned state machine. It never spawns work: the
//! owner's event loop sleeps until [`InteractionController::next_deadline`]
//! and calls [`InteractionController::poll`]. Each handler also fires a
//! deadline that is already due before acting on its event, so expiry and
//! events are applied in time order.
//!
//! # Example
//!
//! ```
//! use hoverlay::config::InteractionConfig;
//! use hoverlay::controller::InteractionController;
//! use hoverlay::traits::ManualClock;
//!
//! let clock = ManualClock::new();
//! let mut controller = InteractionController::with_clock(InteractionConfig::default(), clock.clone());
//!
//! controller.on_pointer_enter();
//! clock.advance_ms(200);
//! controller.poll();
//! assert!(controller.is_open());
//! ```

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::config::InteractionConfig;
use crate::events::InteractionEvent;
use crate::timer::DeferredTimer;
use crate::traits::{Clock, SystemClock};

/// Owns the open/closed state of one overlay and its pending delayed open.
#[derive(Debug)]
pub struct InteractionController<C: Clock = SystemClock> {
    config: InteractionConfig,
    clock: C,
    is_open: bool,
    /// At most one outstanding delayed open
    pending_open: DeferredTimer,
    /// When a touch last opened the overlay (for tap click suppression)
    last_touch_open: Option<Instant>,
    /// Set whenever `is_open` changes, cleared by `take_redraw`
    needs_redraw: bool,
    torn_down: bool,
}

impl InteractionController<SystemClock> {
    /// Create a controller driven by the wall clock.
    pub fn new(config: InteractionConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for InteractionController<SystemClock> {
    fn default() -> Self {
        Self::new(InteractionConfig::default())
    }
}

impl<C: Clock> InteractionController<C> {
    /// Create a controller that reads time from `clock`.
    pub fn with_clock(config: InteractionConfig, clock: C) -> Self {
        Self {
            config,
            clock,
            is_open: false,
            pending_open: DeferredTimer::new(),
            last_touch_open: None,
            needs_redraw: false,
            torn_down: false,
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// Whether the overlay should currently be rendered.
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Whether a delayed open is in flight.
    pub fn has_pending_open(&self) -> bool {
        self.pending_open.is_pending()
    }

    /// Deadline of the in-flight delayed open.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending_open.deadline()
    }

    /// Time left until the in-flight delayed open fires.
    pub fn time_until_open(&self) -> Option<Duration> {
        self.pending_open.remaining(self.clock.now())
    }

    /// Whether `is_open` changed since the last [`take_redraw`](Self::take_redraw).
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Read and clear the redraw flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    // ========================================================================
    // Owner overrides
    // ========================================================================

    /// Force the state, bypassing the delay and the trigger mode.
    ///
    /// Used by the owner for dismissal from outside the element, e.g. a tap
    /// elsewhere. Any pending delayed open is cancelled first.
    ///
    /// The `disabled` flag is not consulted either: `set_open(true)` opens a
    /// disabled controller. Disabling only blocks opens from input events.
    pub fn set_open(&mut self, value: bool) {
        if self.torn_down {
            trace!("set_open({}) after teardown ignored", value);
            return;
        }
        self.cancel_pending();
        self.last_touch_open = None;
        self.set_state(value);
    }

    /// Update the disabled flag.
    ///
    /// Disabling cancels an in-flight delayed open but leaves an open
    /// overlay open; call `set_open(false)` to hide it as well.
    pub fn set_disabled(&mut self, disabled: bool) {
        if self.config.disabled == disabled {
            return;
        }
        self.config.disabled = disabled;
        if disabled && self.cancel_pending() {
            debug!("Disabled while a delayed open was pending, cancelled it");
        }
    }

    /// Cancel the in-flight delayed open. Safe to call at any time.
    ///
    /// Returns true if a delayed open was cancelled.
    pub fn cancel_pending(&mut self) -> bool {
        let cancelled = self.pending_open.cancel();
        if cancelled {
            debug!("Delayed open cancelled");
        }
        cancelled
    }

    /// Cancel any pending work and stop reacting to input.
    ///
    /// Called on unmount. Idempotent, and also run on drop.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.cancel_pending();
        self.last_touch_open = None;
        self.torn_down = true;
        debug!("Interaction controller torn down");
    }

    // ========================================================================
    // Timer
    // ========================================================================

    /// Fire the delayed open if its deadline has passed.
    ///
    /// Returns true if the overlay state changed.
    pub fn poll(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        self.fire_due()
    }

    fn fire_due(&mut self) -> bool {
        let now = self.clock.now();
        match self.pending_open.fire_if_due(now) {
            Some(id) => {
                debug!("Delayed open {:?} fired", id);
                self.set_state(true)
            }
            None => false,
        }
    }

    // ========================================================================
    // Handlers
    // ========================================================================

    /// Dispatch an event to its handler.
    pub fn handle(&mut self, event: InteractionEvent) {
        match event {
            InteractionEvent::PointerEnter => self.on_pointer_enter(),
            InteractionEvent::PointerLeave => self.on_pointer_leave(),
            InteractionEvent::TouchStart => self.on_touch_start(),
            InteractionEvent::TouchEnd => self.on_touch_end(),
            InteractionEvent::Click => self.on_click(),
        }
    }

    pub fn on_pointer_enter(&mut self) {
        if !self.begin(InteractionEvent::PointerEnter) {
            return;
        }
        if !self.config.trigger_mode.allows_hover() {
            trace!("Pointer enter ignored in {:?} mode", self.config.trigger_mode);
            return;
        }
        self.request_delayed_open();
    }

    pub fn on_pointer_leave(&mut self) {
        if !self.begin(InteractionEvent::PointerLeave) {
            return;
        }
        if !self.config.trigger_mode.allows_hover() {
            trace!("Pointer leave ignored in {:?} mode", self.config.trigger_mode);
            return;
        }
        self.close_now();
    }

    pub fn on_touch_start(&mut self) {
        if !self.begin(InteractionEvent::TouchStart) {
            return;
        }
        if !self.config.trigger_mode.allows_click() {
            trace!("Touch start ignored in {:?} mode", self.config.trigger_mode);
            return;
        }
        self.cancel_pending();
        if self.config.disabled {
            trace!("Touch start ignored while disabled");
            return;
        }
        if self.open_now() {
            self.last_touch_open = Some(self.clock.now());
        }
    }

    /// Intentionally does nothing: touch dismissal belongs to the owner's
    /// tap-elsewhere handling, which needs the overlay still open when it
    /// runs.
    pub fn on_touch_end(&mut self) {
        if self.begin(InteractionEvent::TouchEnd) {
            trace!("Touch end is a no-op");
        }
    }

    pub fn on_click(&mut self) {
        if !self.begin(InteractionEvent::Click) {
            return;
        }
        if !self.config.trigger_mode.allows_click() {
            trace!("Click ignored in {:?} mode", self.config.trigger_mode);
            return;
        }
        let from_tap = self.take_tap_click();
        if self.is_open {
            if from_tap {
                trace!("Click synthesized by the opening tap ignored");
                return;
            }
            self.close_now();
        } else if self.config.disabled {
            trace!("Click ignored while disabled");
        } else {
            // Intentional action: no debounce
            self.open_now();
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Shared prologue of every handler. Returns false if the event must be
    /// dropped.
    fn begin(&mut self, event: InteractionEvent) -> bool {
        if self.torn_down {
            trace!("{} after teardown ignored", event.handler_name());
            return false;
        }
        self.fire_due();
        true
    }

    fn request_delayed_open(&mut self) {
        if self.config.disabled {
            trace!("Delayed open suppressed while disabled");
            return;
        }
        let deadline = self.clock.now() + self.config.delay();
        let id = self.pending_open.schedule(deadline);
        debug!("Delayed open {:?} scheduled in {}ms", id, self.config.delay_ms);
    }

    fn open_now(&mut self) -> bool {
        self.cancel_pending();
        self.set_state(true)
    }

    fn close_now(&mut self) {
        self.cancel_pending();
        self.last_touch_open = None;
        self.set_state(false);
    }

    /// Whether this click is the compatibility click of the tap that just
    /// opened the overlay. Consumes the tap record.
    fn take_tap_click(&mut self) -> bool {
        let window = self.config.touch_click_window();
        match self.last_touch_open.take() {
            Some(at) if !window.is_zero() => {
                self.clock.now().saturating_duration_since(at) <= window
            }
            _ => false,
        }
    }

    fn set_state(&mut self, open: bool) -> bool {
        if self.is_open == open {
            return false;
        }
        self.is_open = open;
        self.needs_redraw = true;
        debug!("Overlay {}", if open { "opened" } else { "closed" });
        true
    }
}

impl<C: Clock> Drop for InteractionController<C> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TriggerMode;
    use crate::traits::ManualClock;

    fn tap_config() -> InteractionConfig {
        InteractionConfig::new().with_touch_click_window_ms(500)
    }

    fn controller(config: InteractionConfig) -> (InteractionController<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        (InteractionController::with_clock(config, clock.clone()), clock)
    }

    #[test]
    fn test_starts_closed_without_timer() {
        let (c, _) = controller(InteractionConfig::default());
        assert!(!c.is_open());
        assert!(!c.has_pending_open());
        assert!(!c.needs_redraw());
    }

    #[test]
    fn test_enter_opens_only_after_delay() {
        let (mut c, clock) = controller(InteractionConfig::default());
        c.on_pointer_enter();
        assert!(c.has_pending_open());

        clock.advance_ms(199);
        assert!(!c.poll());
        assert!(!c.is_open());

        clock.advance_ms(1);
        assert!(c.poll());
        assert!(c.is_open());
        assert!(!c.has_pending_open());
    }

    #[test]
    fn test_due_timer_fires_before_next_event() {
        let (mut c, clock) = controller(InteractionConfig::default());
        c.on_pointer_enter();
        clock.advance_ms(250);

        // No poll in between: the leave must still observe the open first
        c.on_pointer_leave();

        assert!(!c.is_open());
        assert!(c.take_redraw());
    }

    #[test]
    fn test_zero_delay_fires_on_next_poll() {
        let (mut c, _) = controller(InteractionConfig::new().with_delay_ms(0));
        c.on_pointer_enter();
        assert!(!c.is_open());
        assert!(c.poll());
        assert!(c.is_open());
    }

    #[test]
    fn test_time_until_open() {
        let (mut c, clock) = controller(InteractionConfig::default());
        assert_eq!(c.time_until_open(), None);

        c.on_pointer_enter();
        clock.advance_ms(50);

        assert_eq!(c.time_until_open(), Some(Duration::from_millis(150)));
        assert_eq!(c.next_deadline(), Some(clock.now() + Duration::from_millis(150)));
    }

    #[test]
    fn test_repeated_enter_restarts_delay() {
        let (mut c, clock) = controller(InteractionConfig::default());
        c.on_pointer_enter();
        clock.advance_ms(150);
        c.on_pointer_enter();
        clock.advance_ms(150);

        c.poll();
        assert!(!c.is_open(), "first deadline must have been replaced");

        clock.advance_ms(50);
        c.poll();
        assert!(c.is_open());
    }

    #[test]
    fn test_click_toggles_immediately() {
        let (mut c, _) = controller(InteractionConfig::default());
        c.on_click();
        assert!(c.is_open());
        assert!(!c.has_pending_open());

        c.on_click();
        assert!(!c.is_open());
    }

    #[test]
    fn test_click_cancels_pending_hover_open() {
        let (mut c, clock) = controller(InteractionConfig::default());
        c.on_pointer_enter();
        c.on_click();
        assert!(c.is_open());
        assert!(!c.has_pending_open());

        c.on_click();
        clock.advance_ms(500);
        c.poll();
        assert!(!c.is_open());
    }

    #[test]
    fn test_tap_click_is_suppressed_once() {
        let (mut c, clock) = controller(tap_config());
        c.on_touch_start();
        c.on_touch_end();
        clock.advance_ms(40);
        c.on_click();
        assert!(c.is_open(), "tap's own click must not close the overlay");

        c.on_click();
        assert!(!c.is_open());
    }

    #[test]
    fn test_late_click_after_tap_toggles() {
        let (mut c, clock) = controller(tap_config());
        c.on_touch_start();
        clock.advance_ms(501);
        c.on_click();
        assert!(!c.is_open());
    }

    #[test]
    fn test_default_config_click_after_touch_toggles_closed() {
        let (mut c, clock) = controller(InteractionConfig::default());
        c.on_touch_start();
        assert!(c.is_open());

        clock.advance_ms(100);
        c.on_click();
        assert!(!c.is_open(), "click on an open overlay must close it by default");
    }

    #[test]
    fn test_zero_tap_window_uses_literal_toggle() {
        let (mut c, _) = controller(InteractionConfig::new().with_touch_click_window_ms(0));
        c.on_touch_start();
        c.on_click();
        assert!(!c.is_open());
    }

    #[test]
    fn test_second_tap_on_open_overlay_closes_it() {
        let (mut c, clock) = controller(tap_config());
        c.on_touch_start();
        c.on_click();
        clock.advance_ms(1000);

        // Already open: this touch does not arm suppression
        c.on_touch_start();
        c.on_click();
        assert!(!c.is_open());
    }

    #[test]
    fn test_hover_mode_ignores_touch_and_click() {
        let (mut c, _) = controller(InteractionConfig::new().with_trigger_mode(TriggerMode::Hover));
        c.on_touch_start();
        c.on_click();
        assert!(!c.is_open());

        c.on_pointer_enter();
        assert!(c.has_pending_open());
    }

    #[test]
    fn test_click_mode_ignores_hover() {
        let (mut c, clock) = controller(InteractionConfig::new().with_trigger_mode(TriggerMode::Click));
        c.on_pointer_enter();
        assert!(!c.has_pending_open());
        clock.advance_ms(500);
        c.poll();
        assert!(!c.is_open());

        c.on_click();
        c.on_pointer_leave();
        assert!(c.is_open(), "leave is not honored in click mode");
    }

    #[test]
    fn test_set_open_bypasses_mode_and_cancels_timer() {
        let (mut c, clock) = controller(InteractionConfig::new().with_trigger_mode(TriggerMode::Hover));
        c.on_pointer_enter();
        c.set_open(false);
        assert!(!c.has_pending_open());

        clock.advance_ms(300);
        c.poll();
        assert!(!c.is_open());

        c.set_open(true);
        assert!(c.is_open());
    }

    #[test]
    fn test_set_open_overrides_disabled() {
        let (mut c, _) = controller(InteractionConfig::new().with_disabled(true));
        c.on_click();
        assert!(!c.is_open());

        c.set_open(true);
        assert!(c.is_open());
    }

    #[test]
    fn test_set_disabled_cancels_pending_but_keeps_open_state() {
        let (mut c, clock) = controller(InteractionConfig::default());
        c.on_pointer_enter();
        c.set_disabled(true);
        assert!(!c.has_pending_open());
        clock.advance_ms(300);
        c.poll();
        assert!(!c.is_open());

        c.set_disabled(false);
        c.on_click();
        c.set_disabled(true);
        assert!(c.is_open(), "disabling must not close an open overlay");

        c.on_click();
        assert!(!c.is_open(), "closing still works while disabled");
    }

    #[test]
    fn test_teardown_is_inert_and_idempotent() {
        let (mut c, clock) = controller(InteractionConfig::default());
        c.on_pointer_enter();
        c.teardown();
        c.teardown();

        clock.advance_ms(500);
        assert!(!c.poll());
        c.on_click();
        c.set_open(true);

        assert!(c.is_torn_down());
        assert!(!c.is_open());
        assert!(!c.has_pending_open());
    }

    #[test]
    fn test_redraw_flag_tracks_changes() {
        let (mut c, _) = controller(InteractionConfig::default());
        c.on_click();
        assert!(c.take_redraw());
        assert!(!c.take_redraw());

        // No change, no redraw
        c.set_open(true);
        assert!(!c.needs_redraw());
    }

    #[test]
    fn test_handle_dispatches() {
        let (mut c, _) = controller(InteractionConfig::default());
        c.handle(InteractionEvent::TouchStart);
        assert!(c.is_open());
        c.handle(InteractionEvent::TouchEnd);
        assert!(c.is_open());
        c.handle(InteractionEvent::PointerLeave);
        assert!(!c.is_open());
        c.handle(InteractionEvent::PointerEnter);
        assert!(c.has_pending_open());
    }
}
