//! Wheel dispatch queue: one scroll stroke in flight at a time.
//!
//! The host replays a single gesture at a time; a second dispatch while one is
//! running cancels the first. Wheel notches arrive far faster than a stroke
//! takes to replay, so each notch becomes a short stroke that waits its turn
//! here.
//!
//! # How the drain loop works (for beginners)
//!
//! ```text
//! enqueue ──► [stroke, stroke, stroke] ──► drain task ──► host.dispatch_gesture
//!                                            │  ▲
//!                                            └──┘ sleep(duration + margin)
//! ```
//!
//! The first enqueue on an idle queue spawns the drain task. Later enqueues
//! only append; the `draining` flag guarantees there is never a second task.
//! The task pops, dispatches, sleeps, and clears the flag in the same locked
//! step that finds the queue empty, so an enqueue can never be stranded.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::Notify;
use tracing::{debug, warn, Instrument, Span};
use touchbridge_core::{scroll_stroke, Point, ScrollDirection, Stroke};

use crate::application::host::AutomationHost;
use crate::application::session::SessionConfig;

#[derive(Default)]
struct WheelState {
    queue: VecDeque<Stroke>,
    draining: bool,
}

/// Serializing queue of scroll strokes.
pub struct WheelDispatchQueue {
    host: Arc<dyn AutomationHost>,
    step: i32,
    duration: Duration,
    pace: Duration,
    screen_height: Option<i32>,
    state: Arc<Mutex<WheelState>>,
    idle: Arc<Notify>,
}

impl WheelDispatchQueue {
    pub fn new(host: Arc<dyn AutomationHost>, session: &SessionConfig) -> Self {
        Self {
            host,
            step: session.timing.wheel_step,
            duration: session.timing.wheel_duration,
            pace: session.timing.wheel_pace(),
            screen_height: session.screen_height,
            state: Arc::new(Mutex::new(WheelState::default())),
            idle: Arc::new(Notify::new()),
        }
    }

    /// Builds the stroke for one wheel notch at `origin` and queues it.
    ///
    /// Returns `false` when the notch is dropped: the cursor is closer than
    /// one step to the top, or a scroll-up would run past the configured
    /// screen height.
    ///
    /// Must be called from within a tokio runtime.
    pub fn enqueue_scroll(&self, origin: Point, direction: ScrollDirection) -> bool {
        if origin.y < self.step {
            debug!(y = origin.y, step = self.step, "scroll dropped: cursor within one step of the top");
            return false;
        }
        if direction == ScrollDirection::Up {
            if let Some(height) = self.screen_height {
                if origin.y.saturating_add(self.step) > height {
                    debug!(y = origin.y, height, "scroll up dropped: stroke would leave the screen");
                    return false;
                }
            }
        }
        let stroke = match scroll_stroke(origin, direction, self.step, self.duration) {
            Ok(s) => s,
            Err(e) => {
                warn!("scroll stroke rejected: {e}");
                return false;
            }
        };
        self.enqueue(stroke);
        true
    }

    /// Appends a pre-built stroke and starts the drain task if none is running.
    pub fn enqueue(&self, stroke: Stroke) {
        {
            let mut state = lock(&self.state);
            state.queue.push_back(stroke);
            if state.draining {
                return;
            }
            state.draining = true;
        }
        let task = drain(
            Arc::clone(&self.state),
            Arc::clone(&self.idle),
            Arc::clone(&self.host),
            self.pace,
        );
        tokio::spawn(task.instrument(Span::current()));
    }

    /// Strokes waiting to be dispatched (not counting the one in flight).
    pub fn pending(&self) -> usize {
        lock(&self.state).queue.len()
    }

    /// Whether a drain task is currently running.
    pub fn is_draining(&self) -> bool {
        lock(&self.state).draining
    }

    /// Resolves once the queue is empty and no drain task is running.
    pub async fn wait_idle(&self) {
        loop {
            // Registered before the check so a drain finishing in between is seen.
            let notified = self.idle.notified();
            if !self.is_draining() {
                return;
            }
            notified.await;
        }
    }
}

async fn drain(
    state: Arc<Mutex<WheelState>>,
    idle: Arc<Notify>,
    host: Arc<dyn AutomationHost>,
    pace: Duration,
) {
    loop {
        let next = {
            let mut guard = lock(&state);
            match guard.queue.pop_front() {
                Some(stroke) => stroke,
                None => {
                    guard.draining = false;
                    idle.notify_waiters();
                    return;
                }
            }
        };
        if let Err(e) = host.dispatch_gesture(&next) {
            warn!("scroll dispatch failed: {e}");
        }
        tokio::time::sleep(pace).await;
    }
}

fn lock(state: &Mutex<WheelState>) -> MutexGuard<'_, WheelState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
