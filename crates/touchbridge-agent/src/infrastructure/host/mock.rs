//! Recording automation host for tests and session replay.
//!
//! # Why a recording host?
//!
//! The real automation layer replays strokes on a physical screen and edits
//! live text fields. None of that is observable from Rust test code. The
//! `RecordingHost` replaces every host call with in-memory recording: each
//! call is pushed into a `Mutex<Vec<...>>` so assertions can inspect exactly
//! what was requested and in what order.
//!
//! Gestures are stamped with the runtime clock, so tests running with a
//! paused clock can assert on the spacing between dispatches.
//!
//! # Failure injection
//!
//! [`RecordingHost::fail_gestures`] makes every `dispatch_gesture` return a
//! [`HostError`]; the call is still recorded. Use it to exercise the
//! error-handling paths of callers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use touchbridge_core::{AndroidKeyCode, KeyAction, Stroke};

use crate::application::host::{AutomationHost, GlobalAction, HostError, InputConnection};

/// One recorded gesture dispatch.
#[derive(Debug, Clone)]
pub struct GestureRecord {
    pub stroke: Stroke,
    pub at: tokio::time::Instant,
}

/// One recorded volume call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeCall {
    Raise,
    Lower,
    ToggleMute,
}

/// An input connection that records commits and keys.
#[derive(Default)]
pub struct RecordingInputConnection {
    commits: Mutex<Vec<String>>,
    keys: Mutex<Vec<(AndroidKeyCode, KeyAction)>>,
}

impl RecordingInputConnection {
    pub fn commits(&self) -> Vec<String> {
        guard(&self.commits).clone()
    }

    pub fn keys(&self) -> Vec<(AndroidKeyCode, KeyAction)> {
        guard(&self.keys).clone()
    }
}

impl InputConnection for RecordingInputConnection {
    fn commit_text(&self, text: &str) -> Result<(), HostError> {
        guard(&self.commits).push(text.to_string());
        Ok(())
    }

    fn send_key(&self, code: AndroidKeyCode, action: KeyAction) -> Result<(), HostError> {
        guard(&self.keys).push((code, action));
        Ok(())
    }
}

/// An automation host that records every call without touching a device.
#[derive(Default)]
pub struct RecordingHost {
    gestures: Mutex<Vec<GestureRecord>>,
    actions: Mutex<Vec<GlobalAction>>,
    volume: Mutex<Vec<VolumeCall>>,
    urls: Mutex<Vec<String>>,
    overlay: Mutex<Vec<bool>>,
    connection: Option<Arc<RecordingInputConnection>>,
    fail_gestures: AtomicBool,
}

impl RecordingHost {
    /// A host without a direct input connection.
    pub fn new() -> Self {
        Self::default()
    }

    /// A host that offers a recording input connection.
    pub fn with_input_connection() -> Self {
        Self {
            connection: Some(Arc::new(RecordingInputConnection::default())),
            ..Self::default()
        }
    }

    /// When `true`, gesture dispatches are recorded but reported as rejected.
    pub fn fail_gestures(&self, fail: bool) {
        self.fail_gestures.store(fail, Ordering::SeqCst);
    }

    pub fn gestures(&self) -> Vec<Stroke> {
        guard(&self.gestures).iter().map(|r| r.stroke.clone()).collect()
    }

    pub fn gesture_records(&self) -> Vec<GestureRecord> {
        guard(&self.gestures).clone()
    }

    pub fn actions(&self) -> Vec<GlobalAction> {
        guard(&self.actions).clone()
    }

    pub fn volume_calls(&self) -> Vec<VolumeCall> {
        guard(&self.volume).clone()
    }

    pub fn urls(&self) -> Vec<String> {
        guard(&self.urls).clone()
    }

    /// Every overlay visibility the host was told, in order.
    pub fn overlay_changes(&self) -> Vec<bool> {
        guard(&self.overlay).clone()
    }

    pub fn connection(&self) -> Option<Arc<RecordingInputConnection>> {
        self.connection.clone()
    }

    /// Total number of recorded calls of every kind.
    pub fn call_count(&self) -> usize {
        let connection_calls = self
            .connection
            .as_ref()
            .map_or(0, |c| c.commits().len() + c.keys().len());
        guard(&self.gestures).len()
            + guard(&self.actions).len()
            + guard(&self.volume).len()
            + guard(&self.urls).len()
            + guard(&self.overlay).len()
            + connection_calls
    }
}

impl AutomationHost for RecordingHost {
    fn dispatch_gesture(&self, stroke: &Stroke) -> Result<(), HostError> {
        guard(&self.gestures).push(GestureRecord {
            stroke: stroke.clone(),
            at: tokio::time::Instant::now(),
        });
        if self.fail_gestures.load(Ordering::SeqCst) {
            return Err(HostError::GestureRejected("injected failure".to_string()));
        }
        Ok(())
    }

    fn perform_global_action(&self, action: GlobalAction) -> Result<(), HostError> {
        guard(&self.actions).push(action);
        Ok(())
    }

    fn raise_volume(&self) {
        guard(&self.volume).push(VolumeCall::Raise);
    }

    fn lower_volume(&self) {
        guard(&self.volume).push(VolumeCall::Lower);
    }

    fn toggle_mute(&self) {
        guard(&self.volume).push(VolumeCall::ToggleMute);
    }

    fn open_url(&self, url: &str) -> Result<(), HostError> {
        guard(&self.urls).push(url.to_string());
        Ok(())
    }

    fn set_overlay_visible(&self, visible: bool) {
        guard(&self.overlay).push(visible);
    }

    fn input_connection(&self) -> Option<Arc<dyn InputConnection>> {
        self.connection
            .clone()
            .map(|c| c as Arc<dyn InputConnection>)
    }
}

fn guard<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
