//! Contracts the agent needs from the controlled device.
//!
//! The agent never talks to the device directly. Everything it does goes
//! through these traits, so production adapters and the recording/synthetic
//! implementations in `infrastructure` are interchangeable.
//!
//! # Why are these traits synchronous? (for beginners)
//!
//! Each host call is a single fire-and-forget request: "replay this stroke",
//! "press back", "set this text". None of them wait on I/O the agent could
//! overlap with other work, so plain `fn` keeps the call sites simple. The
//! places that *do* wait (timers, the wheel queue's pacing, the UI worker)
//! are async or threaded on the agent side instead.

use std::sync::Arc;

use thiserror::Error;
use touchbridge_core::{AndroidKeyCode, KeyAction, Stroke};

/// Error type for host calls.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostError {
    /// The host refused to replay a gesture (another one is in flight, the
    /// service is disconnected, ...).
    #[error("gesture rejected by host: {0}")]
    GestureRejected(String),

    /// The host refused a global action.
    #[error("global action {0:?} rejected by host")]
    ActionRejected(GlobalAction),

    /// The input connection refused a key or a text commit.
    #[error("input connection rejected: {0}")]
    InputRejected(String),

    /// The host has no handler for a URL.
    #[error("cannot open url {0}")]
    UrlRejected(String),
}

/// System-wide navigation actions the host exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlobalAction {
    Back,
    Home,
    Recents,
    PowerDialog,
}

/// The device automation surface.
pub trait AutomationHost: Send + Sync {
    /// Replays one single-stroke gesture.
    fn dispatch_gesture(&self, stroke: &Stroke) -> Result<(), HostError>;

    fn perform_global_action(&self, action: GlobalAction) -> Result<(), HostError>;

    fn raise_volume(&self);
    fn lower_volume(&self);
    fn toggle_mute(&self);

    /// Opens `url` in whatever handles it on the device.
    fn open_url(&self, url: &str) -> Result<(), HostError>;

    /// Shows or hides the session overlay.
    fn set_overlay_visible(&self, visible: bool);

    /// The direct input connection, when the host currently offers one.
    ///
    /// When this returns `None` text must go through the accessibility tree.
    fn input_connection(&self) -> Option<Arc<dyn InputConnection>>;
}

/// A direct channel into the focused editor.
#[cfg_attr(test, mockall::automock)]
pub trait InputConnection: Send + Sync {
    fn commit_text(&self, text: &str) -> Result<(), HostError>;
    fn send_key(&self, code: AndroidKeyCode, action: KeyAction) -> Result<(), HostError>;
}

/// A unit of work for the host's UI thread.
pub type UiJob = Box<dyn FnOnce() + Send + 'static>;

/// Runs jobs on the host's UI thread, one at a time, in posting order.
///
/// Tree nodes and the scratch editor must only be touched from inside a job.
pub trait UiExecutor: Send + Sync {
    /// Queues `job`. Returns `false` if the UI thread is gone.
    fn execute(&self, job: UiJob) -> bool;
}

/// Resolves once every job queued on `ui` before this call has run.
///
/// Returns at once if the executor no longer accepts jobs.
pub async fn flush_ui(ui: &dyn UiExecutor) {
    let (done_tx, done_rx) = tokio::sync::oneshot::channel();
    if !ui.execute(Box::new(move || {
        let _ = done_tx.send(());
    })) {
        return;
    }
    let _ = done_rx.await;
}

// ── Accessibility tree ────────────────────────────────────────────────────────

/// Stable identity of a UI node, used to deduplicate candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

/// Screen rectangle in host pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }
}

/// Read access to the host's UI tree.
pub trait AccessibilityTree: Send + Sync {
    /// The element holding input-method focus.
    fn input_focus(&self) -> Option<Arc<dyn UiNode>>;
    /// The element holding accessibility focus.
    fn accessibility_focus(&self) -> Option<Arc<dyn UiNode>>;
    /// Root element of the active window.
    fn active_window_root(&self) -> Option<Arc<dyn UiNode>>;
}

/// One element of the host UI tree.
///
/// Selection bounds are character offsets; a negative bound means the node
/// has no selection.
pub trait UiNode: Send + Sync {
    fn id(&self) -> NodeId;
    /// Re-reads the node's state from the host. Returns `false` if the node is gone.
    fn refresh(&self) -> bool;
    fn text(&self) -> Option<String>;
    /// `true` when [`text`](Self::text) is placeholder hint text, not content.
    fn is_showing_hint(&self) -> bool;
    fn selection(&self) -> (i32, i32);
    fn bounds(&self) -> Rect;
    fn is_editable(&self) -> bool;
    fn is_focusable(&self) -> bool;
    fn children(&self) -> Vec<Arc<dyn UiNode>>;
    /// Performs the "set text" action. Returns whether the host accepted it.
    fn set_text(&self, text: &str) -> bool;
    /// Performs the "set selection" action. Returns whether the host accepted it.
    fn set_selection(&self, start: i32, end: i32) -> bool;
}
