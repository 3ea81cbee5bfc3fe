//! Gesture state machine: remote pointer events to host strokes and actions.
//!
//! # States (for beginners)
//!
//! ```text
//!            primary-down                 primary-up / pan-end
//!   Idle ───────────────────► PointerDown ─────────────────────► Idle
//!                               │   ▲                  (stroke dispatched)
//!                 (armed on     ▼   │ move > slop
//!                  down)   LongPressArmed
//!                               │
//!                               └── timer fires ──► Idle (synthetic up)
//! ```
//!
//! A primary-down opens a [`GesturePath`] and arms a long-press timer. Moves
//! extend the path. The matching up closes it into a single [`Stroke`] whose
//! duration is the real time the button was held. If no up arrives before
//! the timer fires, and the pointer has not wandered past the slop
//! threshold, the timer performs the up itself: a held mouse button becomes
//! a long press on the device.
//!
//! The wheel button maps to navigation: a quick click is "home", holding it
//! past the base delay is "recents". The secondary button is "back".
//!
//! # Timer races
//!
//! Timers run as spawned tokio tasks that take the state lock when they fire.
//! Every arm bumps a generation counter; a timer only acts if its generation
//! is still current, so a timer that was replaced (or whose up already
//! arrived) does nothing even if it wakes before its abort lands.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tracing::{debug, trace, warn, Instrument, Span};
use touchbridge_core::protocol::messages::{PointerAction, PointerEvent, TouchAction, TouchEvent};
use touchbridge_core::{GesturePath, Point, PointerState, ScrollDirection};

use crate::application::host::{AutomationHost, GlobalAction};
use crate::application::session::SessionConfig;
use crate::application::wheel_queue::WheelDispatchQueue;

/// Observable state of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    PointerDown,
    LongPressArmed,
}

#[derive(Default)]
struct GestureInner {
    pointer: PointerState,
    path: Option<GesturePath>,
    long_press: Option<JoinHandle<()>>,
    long_press_generation: u64,
    recents: Option<JoinHandle<()>>,
    recents_generation: u64,
}

/// Translates pointer and touch events into strokes and global actions.
///
/// All methods that may arm a timer or enqueue a scroll must run inside a
/// tokio runtime.
pub struct GestureStateMachine {
    host: Arc<dyn AutomationHost>,
    wheel: WheelDispatchQueue,
    scale: i32,
    long_press_delay: Duration,
    long_press_slop: u32,
    hold_delay: Duration,
    screen_width: Option<i32>,
    screen_height: Option<i32>,
    inner: Arc<Mutex<GestureInner>>,
}

impl GestureStateMachine {
    pub fn new(host: Arc<dyn AutomationHost>, session: &SessionConfig) -> Self {
        Self {
            wheel: WheelDispatchQueue::new(Arc::clone(&host), session),
            host,
            scale: session.scale.max(1),
            long_press_delay: session.timing.long_press_delay(),
            long_press_slop: session.timing.long_press_slop_px,
            hold_delay: session.timing.long_tap_delay,
            screen_width: session.screen_width,
            screen_height: session.screen_height,
            inner: Arc::new(Mutex::new(GestureInner::default())),
        }
    }

    /// Current state.
    pub fn phase(&self) -> GesturePhase {
        let inner = lock(&self.inner);
        match (&inner.path, inner.pointer.long_press_armed) {
            (None, _) => GesturePhase::Idle,
            (Some(_), true) => GesturePhase::LongPressArmed,
            (Some(_), false) => GesturePhase::PointerDown,
        }
    }

    /// Current pointer position in host pixels.
    pub fn position(&self) -> Point {
        lock(&self.inner).pointer.position()
    }

    pub fn wheel_queue(&self) -> &WheelDispatchQueue {
        &self.wheel
    }

    /// Handles one decoded mouse event.
    ///
    /// Overlay toggle and open-URL are session commands, not gestures; the
    /// input service handles them and they are ignored here.
    pub fn handle_pointer(&self, event: &PointerEvent) {
        let at = self.scaled(event.x, event.y);
        match &event.action {
            PointerAction::Move => self.on_move(at),
            PointerAction::PrimaryDown => self.on_primary_down(at),
            PointerAction::PrimaryUp => self.on_primary_up(at),
            PointerAction::SecondaryUp => self.perform(GlobalAction::Back),
            PointerAction::WheelButtonDown => self.on_wheel_button_down(),
            PointerAction::WheelButtonUp => self.on_wheel_button_up(),
            PointerAction::ScrollDown => self.on_scroll(ScrollDirection::Down),
            PointerAction::ScrollUp => self.on_scroll(ScrollDirection::Up),
            PointerAction::OverlayToggle | PointerAction::OpenUrl(_) => {}
        }
    }

    /// Handles one decoded touch event. Scale events are ignored.
    pub fn handle_touch(&self, event: &TouchEvent) {
        match event.action {
            TouchAction::PanStart => self.on_pan_start(self.scaled(event.x, event.y)),
            TouchAction::PanUpdate => self.on_pan_update(event.x, event.y),
            TouchAction::PanEnd => self.on_pan_end(self.scaled(event.x, event.y)),
            TouchAction::ScaleStart | TouchAction::Scale | TouchAction::ScaleEnd => {
                trace!(action = ?event.action, "scale gesture ignored");
            }
        }
    }

    // ── Primary button ────────────────────────────────────────────────────────

    fn on_move(&self, to: Point) {
        let mut inner = lock(&self.inner);
        inner.pointer.move_to(to, now());
        if inner.pointer.button_down {
            if let Some(path) = inner.path.as_mut() {
                path.line_to(to);
            }
        }
        if inner.pointer.long_press_armed && inner.pointer.travel_since_down > self.long_press_slop {
            debug!(travel = inner.pointer.travel_since_down, "long press disarmed by movement");
            inner.pointer.long_press_armed = false;
            if let Some(timer) = inner.long_press.take() {
                timer.abort();
            }
        }
    }

    fn on_primary_down(&self, at: Point) {
        let mut inner = lock(&self.inner);
        if let Some(timer) = inner.long_press.take() {
            timer.abort();
        }
        if inner.path.is_some() {
            debug!("abandoning open gesture path on new primary down");
        }
        inner.pointer.set_position(at);
        inner.pointer.press();
        inner.pointer.long_press_armed = true;
        inner.path = Some(GesturePath::begin(at, now()));

        inner.long_press_generation += 1;
        let generation = inner.long_press_generation;
        let state = Arc::clone(&self.inner);
        let host = Arc::clone(&self.host);
        let delay = self.long_press_delay;
        inner.long_press = Some(tokio::spawn(
            async move {
                tokio::time::sleep(delay).await;
                fire_long_press(&state, host.as_ref(), generation);
            }
            .instrument(Span::current()),
        ));
    }

    fn on_primary_up(&self, at: Point) {
        let path = {
            let mut inner = lock(&self.inner);
            inner.pointer.set_position(at);
            if !inner.pointer.button_down {
                trace!("primary up without a matching down ignored");
                return;
            }
            if let Some(timer) = inner.long_press.take() {
                timer.abort();
            }
            inner.pointer.release();
            inner.path.take()
        };
        if let Some(path) = path {
            finish_and_dispatch(self.host.as_ref(), path, at);
        }
    }

    // ── Touch pan ─────────────────────────────────────────────────────────────

    fn on_pan_start(&self, at: Point) {
        let mut inner = lock(&self.inner);
        if inner.path.is_some() {
            debug!("abandoning open gesture path on pan start");
        }
        // A long press armed by an earlier primary down must not close the pan.
        if let Some(timer) = inner.long_press.take() {
            timer.abort();
        }
        inner.long_press_generation += 1;
        inner.pointer.release();
        inner.pointer.set_position(at);
        inner.path = Some(GesturePath::begin(at, now()));
    }

    fn on_pan_update(&self, dx: i32, dy: i32) {
        let mut inner = lock(&self.inner);
        let current = inner.pointer.position();
        let to = Point::new(
            current.x.saturating_sub(dx.saturating_mul(self.scale)),
            current.y.saturating_sub(dy.saturating_mul(self.scale)),
        );
        let to = self.on_screen(to);
        inner.pointer.move_to(to, now());
        if let Some(path) = inner.path.as_mut() {
            path.line_to(to);
        }
    }

    fn on_pan_end(&self, reset_to: Point) {
        let (path, end) = {
            let mut inner = lock(&self.inner);
            let end = inner.pointer.position();
            inner.pointer.set_position(reset_to);
            (inner.path.take(), end)
        };
        match path {
            Some(path) => finish_and_dispatch(self.host.as_ref(), path, end),
            None => trace!("pan end without an open path ignored"),
        }
    }

    // ── Wheel button and wheel ────────────────────────────────────────────────

    fn on_wheel_button_down(&self) {
        let mut inner = lock(&self.inner);
        if let Some(timer) = inner.recents.take() {
            timer.abort();
        }
        inner.recents_generation += 1;
        let generation = inner.recents_generation;
        let state = Arc::clone(&self.inner);
        let host = Arc::clone(&self.host);
        let delay = self.hold_delay;
        inner.recents = Some(tokio::spawn(
            async move {
                tokio::time::sleep(delay).await;
                let fire = {
                    let mut inner = lock(&state);
                    let current = inner.recents_generation == generation && inner.recents.is_some();
                    if current {
                        inner.recents = None;
                    }
                    current
                };
                if fire {
                    perform_on(host.as_ref(), GlobalAction::Recents);
                }
            }
            .instrument(Span::current()),
        ));
    }

    fn on_wheel_button_up(&self) {
        let pending = lock(&self.inner).recents.take();
        match pending {
            Some(timer) => {
                timer.abort();
                self.perform(GlobalAction::Home);
            }
            None => trace!("wheel button released after hold; recents already shown"),
        }
    }

    fn on_scroll(&self, direction: ScrollDirection) {
        let origin = self.position();
        self.wheel.enqueue_scroll(origin, direction);
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn perform(&self, action: GlobalAction) {
        perform_on(self.host.as_ref(), action);
    }

    fn scaled(&self, x: i32, y: i32) -> Point {
        self.on_screen(Point::new(x.saturating_mul(self.scale), y.saturating_mul(self.scale)))
    }

    /// Clamps `p` to the screen: never negative, and inside any configured size.
    fn on_screen(&self, p: Point) -> Point {
        let p = p.clamped();
        let limit = |v: i32, size: Option<i32>| match size {
            Some(size) if size > 0 => v.min(size - 1),
            _ => v,
        };
        Point::new(limit(p.x, self.screen_width), limit(p.y, self.screen_height))
    }
}

impl Drop for GestureStateMachine {
    fn drop(&mut self) {
        let mut inner = lock(&self.inner);
        for timer in [inner.long_press.take(), inner.recents.take()].into_iter().flatten() {
            timer.abort();
        }
    }
}

/// Long-press timer body: performs the synthetic up if still armed.
fn fire_long_press(state: &Mutex<GestureInner>, host: &dyn AutomationHost, generation: u64) {
    let (path, end) = {
        let mut inner = lock(state);
        if inner.long_press_generation != generation || !inner.pointer.long_press_armed {
            return;
        }
        inner.long_press = None;
        inner.pointer.release();
        (inner.path.take(), inner.pointer.position())
    };
    debug!(x = end.x, y = end.y, "long press: synthesizing up");
    if let Some(path) = path {
        finish_and_dispatch(host, path, end);
    }
}

/// Closes `path` at `end` and dispatches the stroke. Failures are logged.
fn finish_and_dispatch(host: &dyn AutomationHost, path: GesturePath, end: Point) {
    let stroke = match path.finish(end, now()) {
        Ok(stroke) => stroke,
        Err(e) => {
            warn!("gesture dropped: {e}");
            return;
        }
    };
    debug!(
        x = end.x,
        y = end.y,
        points = stroke.points().len(),
        duration_ms = stroke.duration().as_millis() as u64,
        "end gesture"
    );
    if let Err(e) = host.dispatch_gesture(&stroke) {
        warn!("gesture dispatch failed: {e}");
    }
}

fn perform_on(host: &dyn AutomationHost, action: GlobalAction) {
    if let Err(e) = host.perform_global_action(action) {
        warn!("global action failed: {e}");
    }
}

/// The runtime clock as a std instant, so paused test clocks apply.
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

fn lock(state: &Mutex<GestureInner>) -> MutexGuard<'_, GestureInner> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::host::mock::RecordingHost;
    use tokio::time::sleep;

    fn make_machine(scale: i32) -> (GestureStateMachine, Arc<RecordingHost>) {
        let host = Arc::new(RecordingHost::new());
        let session = SessionConfig {
            scale,
            ..SessionConfig::default()
        };
        let machine = GestureStateMachine::new(Arc::clone(&host) as Arc<dyn AutomationHost>, &session);
        (machine, host)
    }

    fn mouse(action: PointerAction, x: i32, y: i32) -> PointerEvent {
        PointerEvent { action, x, y }
    }

    fn touch(action: TouchAction, x: i32, y: i32) -> TouchEvent {
        TouchEvent { action, x, y }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    // ── Click and drag ────────────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn test_down_move_up_dispatches_one_stroke() {
        // Arrange
        let (m, host) = make_machine(1);

        // Act
        m.handle_pointer(&mouse(PointerAction::PrimaryDown, 100, 200));
        assert_eq!(m.phase(), GesturePhase::LongPressArmed);
        sleep(ms(30)).await;
        m.handle_pointer(&mouse(PointerAction::Move, 150, 260));
        sleep(ms(70)).await;
        m.handle_pointer(&mouse(PointerAction::PrimaryUp, 180, 300));

        // Assert
        let strokes = host.gestures();
        assert_eq!(strokes.len(), 1);
        assert_eq!(strokes[0].start(), Point::new(100, 200));
        assert_eq!(strokes[0].end(), Point::new(180, 300));
        assert_eq!(strokes[0].duration(), ms(100));
        assert_eq!(m.phase(), GesturePhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_instant_click_has_one_millisecond_duration() {
        let (m, host) = make_machine(1);

        m.handle_pointer(&mouse(PointerAction::PrimaryDown, 5, 5));
        m.handle_pointer(&mouse(PointerAction::PrimaryUp, 5, 5));

        assert_eq!(host.gestures()[0].duration(), ms(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_up_in_idle_is_ignored() {
        let (m, host) = make_machine(1);

        m.handle_pointer(&mouse(PointerAction::PrimaryUp, 5, 5));

        assert!(host.gestures().is_empty());
        assert_eq!(m.phase(), GesturePhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_coordinates_are_scaled() {
        let (m, host) = make_machine(2);

        m.handle_pointer(&mouse(PointerAction::PrimaryDown, 10, 20));
        m.handle_pointer(&mouse(PointerAction::PrimaryUp, 15, 25));

        let stroke = &host.gestures()[0];
        assert_eq!(stroke.start(), Point::new(20, 40));
        assert_eq!(stroke.end(), Point::new(30, 50));
    }

    #[tokio::test(start_paused = true)]
    async fn test_points_are_clamped_to_configured_screen() {
        // Arrange
        let host = Arc::new(RecordingHost::new());
        let session = SessionConfig {
            scale: 2,
            screen_width: Some(1080),
            screen_height: Some(2400),
            ..SessionConfig::default()
        };
        let m = GestureStateMachine::new(Arc::clone(&host) as Arc<dyn AutomationHost>, &session);

        // Act
        m.handle_pointer(&mouse(PointerAction::PrimaryDown, 600, 100));
        m.handle_pointer(&mouse(PointerAction::PrimaryUp, 10, 1500));
        m.handle_touch(&touch(TouchAction::PanStart, 100, 100));
        m.handle_touch(&touch(TouchAction::PanUpdate, -1000, -1000));
        m.handle_touch(&touch(TouchAction::PanEnd, 0, 0));

        // Assert
        let strokes = host.gestures();
        assert_eq!(strokes[0].start(), Point::new(1079, 200));
        assert_eq!(strokes[0].end(), Point::new(20, 2399));
        assert_eq!(strokes[1].end(), Point::new(1079, 2200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_dispatch_still_returns_to_idle() {
        let (m, host) = make_machine(1);
        host.fail_gestures(true);

        m.handle_pointer(&mouse(PointerAction::PrimaryDown, 10, 10));
        m.handle_pointer(&mouse(PointerAction::PrimaryUp, 20, 20));

        assert_eq!(m.phase(), GesturePhase::Idle);
    }

    // ── Long press ────────────────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn test_held_button_becomes_long_press() {
        // Arrange
        let (m, host) = make_machine(1);

        // Act
        m.handle_pointer(&mouse(PointerAction::PrimaryDown, 300, 400));
        m.handle_pointer(&mouse(PointerAction::Move, 303, 402));
        sleep(ms(900)).await;

        // Assert
        let strokes = host.gestures();
        assert_eq!(strokes.len(), 1);
        assert_eq!(strokes[0].end(), Point::new(303, 402));
        assert_eq!(strokes[0].duration(), ms(800));
        assert_eq!(m.phase(), GesturePhase::Idle);

        // A late up after the synthetic one does nothing.
        m.handle_pointer(&mouse(PointerAction::PrimaryUp, 303, 402));
        assert_eq!(host.gestures().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_movement_past_slop_disarms_long_press() {
        // Arrange
        let (m, host) = make_machine(1);

        // Act
        m.handle_pointer(&mouse(PointerAction::PrimaryDown, 300, 400));
        m.handle_pointer(&mouse(PointerAction::Move, 305, 405));
        assert_eq!(m.phase(), GesturePhase::PointerDown);
        sleep(ms(2000)).await;

        // Assert: the timer fire was a no-op, the drag is still open
        assert!(host.gestures().is_empty());
        m.handle_pointer(&mouse(PointerAction::PrimaryUp, 320, 420));
        assert_eq!(host.gestures().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_down_replaces_pending_long_press_timer() {
        let (m, host) = make_machine(1);

        m.handle_pointer(&mouse(PointerAction::PrimaryDown, 10, 10));
        m.handle_pointer(&mouse(PointerAction::PrimaryUp, 10, 10));
        sleep(ms(500)).await;
        m.handle_pointer(&mouse(PointerAction::PrimaryDown, 20, 20));
        sleep(ms(500)).await;

        // 1000ms after the first down, 500ms after the second: only the click so far.
        assert_eq!(host.gestures().len(), 1);
        sleep(ms(400)).await;
        assert_eq!(host.gestures().len(), 2);
    }

    // ── Touch pan ─────────────────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn test_pan_follows_inverted_deltas_and_resets_on_end() {
        // Arrange
        let (m, host) = make_machine(1);

        // Act
        m.handle_touch(&touch(TouchAction::PanStart, 500, 500));
        m.handle_touch(&touch(TouchAction::PanUpdate, 10, -20));
        m.handle_touch(&touch(TouchAction::PanUpdate, 600, 0));
        sleep(ms(40)).await;
        m.handle_touch(&touch(TouchAction::PanEnd, 50, 60));

        // Assert
        let stroke = &host.gestures()[0];
        assert_eq!(
            stroke.points(),
            &[Point::new(500, 500), Point::new(490, 520), Point::new(0, 520)]
        );
        assert_eq!(stroke.duration(), ms(40));
        assert_eq!(m.position(), Point::new(50, 60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pan_start_cancels_long_press_from_earlier_down() {
        // Arrange
        let (m, host) = make_machine(1);
        m.handle_pointer(&mouse(PointerAction::PrimaryDown, 10, 10));
        sleep(ms(100)).await;

        // Act: the pan outlives the earlier down's long-press deadline
        m.handle_touch(&touch(TouchAction::PanStart, 500, 500));
        m.handle_touch(&touch(TouchAction::PanUpdate, 10, 10));
        sleep(ms(800)).await;
        assert!(host.gestures().is_empty());
        assert_eq!(m.phase(), GesturePhase::PointerDown);
        m.handle_touch(&touch(TouchAction::PanUpdate, 10, 10));
        m.handle_touch(&touch(TouchAction::PanEnd, 500, 500));

        // Assert
        let strokes = host.gestures();
        assert_eq!(strokes.len(), 1);
        assert_eq!(
            strokes[0].points(),
            &[Point::new(500, 500), Point::new(490, 490), Point::new(480, 480)]
        );
        assert_eq!(strokes[0].duration(), ms(800));
    }

    #[tokio::test(start_paused = true)]
    async fn test_scale_events_are_ignored() {
        let (m, host) = make_machine(1);

        m.handle_touch(&touch(TouchAction::ScaleStart, 1, 1));
        m.handle_touch(&touch(TouchAction::ScaleEnd, 1, 1));

        assert!(host.gestures().is_empty());
        assert_eq!(m.phase(), GesturePhase::Idle);
    }

    // ── Buttons ───────────────────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn test_secondary_up_is_back_and_leaves_path_alone() {
        let (m, host) = make_machine(1);

        m.handle_pointer(&mouse(PointerAction::PrimaryDown, 10, 10));
        m.handle_pointer(&mouse(PointerAction::SecondaryUp, 10, 10));

        assert_eq!(host.actions(), vec![GlobalAction::Back]);
        assert_ne!(m.phase(), GesturePhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wheel_button_tap_is_home() {
        let (m, host) = make_machine(1);

        m.handle_pointer(&mouse(PointerAction::WheelButtonDown, 0, 0));
        sleep(ms(50)).await;
        m.handle_pointer(&mouse(PointerAction::WheelButtonUp, 0, 0));
        sleep(ms(500)).await;

        assert_eq!(host.actions(), vec![GlobalAction::Home]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wheel_button_hold_is_recents_only() {
        let (m, host) = make_machine(1);

        m.handle_pointer(&mouse(PointerAction::WheelButtonDown, 0, 0));
        sleep(ms(250)).await;
        m.handle_pointer(&mouse(PointerAction::WheelButtonUp, 0, 0));

        assert_eq!(host.actions(), vec![GlobalAction::Recents]);
    }

    // ── Scroll ────────────────────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn test_scroll_uses_current_pointer_position() {
        let (m, host) = make_machine(1);

        m.handle_pointer(&mouse(PointerAction::Move, 40, 300));
        m.handle_pointer(&mouse(PointerAction::ScrollDown, 0, 0));
        sleep(ms(1)).await;

        let stroke = &host.gestures()[0];
        assert_eq!(stroke.start(), Point::new(40, 300));
        assert_eq!(stroke.end(), Point::new(40, 180));
    }
}
