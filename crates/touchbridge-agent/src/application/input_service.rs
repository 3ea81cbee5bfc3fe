//! Input service: the single entry point the transport calls.
//!
//! # Data flow (for beginners)
//!
//! ```text
//! handle_pointer(kind, mask, x, y, aux)
//!   └─ decode_pointer ─┬─ overlay toggle ──► host.set_overlay_visible
//!                      ├─ open url ────────► UI thread ──► host.open_url
//!                      └─ everything else ─► GestureStateMachine
//!
//! handle_key(bytes)
//!   └─ decode_key_message ─► translate ─┬─ volume / power ──► host
//!                                       ├─ input connection ─► commit / send_key
//!                                       └─ otherwise ─► UI thread ─► AccessibilityTextInjector
//! ```
//!
//! Decoding and translation happen on the caller's task. Anything that
//! touches the UI tree or opens a URL is posted to the [`UiExecutor`] so it
//! runs on the host's UI thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tracing::{debug, info, info_span, warn, Span};
use touchbridge_core::protocol::messages::{PointerAction, PointerKind};
use touchbridge_core::{decode_key_message, decode_pointer, InputEvent, ProtocolError};
use uuid::Uuid;

use crate::application::gesture::GestureStateMachine;
use crate::application::host::{
    flush_ui, AccessibilityTree, AutomationHost, GlobalAction, InputConnection, UiExecutor,
};
use crate::application::session::SessionConfig;
use crate::application::text_injector::{AccessibilityTextInjector, InjectRequest, ScratchEditor};
use crate::application::translate_key::{intercepts, translate, Intercept, KeyOutput, KeyTranslation, TranslateError};

/// Error type returned to the transport.
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("key translation failed: {0}")]
    Translate(#[from] TranslateError),
}

/// Routes decoded remote input to the host for one session.
pub struct InputService {
    session_id: Uuid,
    span: Span,
    host: Arc<dyn AutomationHost>,
    gestures: GestureStateMachine,
    injector: Arc<Mutex<AccessibilityTextInjector>>,
    ui: Arc<dyn UiExecutor>,
    overlay_visible: AtomicBool,
}

impl InputService {
    /// Builds a service for one session.
    ///
    /// Must be called from within a tokio runtime (the gesture machine spawns
    /// its timers on it).
    pub fn new(
        host: Arc<dyn AutomationHost>,
        tree: Arc<dyn AccessibilityTree>,
        scratch: Box<dyn ScratchEditor>,
        ui: Arc<dyn UiExecutor>,
        session: SessionConfig,
    ) -> Self {
        let session_id = Uuid::new_v4();
        let span = info_span!("session", id = %session_id);
        span.in_scope(|| {
            info!(scale = session.scale, overlay = session.overlay_visible, "input session started");
        });
        Self {
            session_id,
            span,
            gestures: GestureStateMachine::new(Arc::clone(&host), &session),
            host,
            injector: Arc::new(Mutex::new(AccessibilityTextInjector::new(tree, scratch))),
            ui,
            overlay_visible: AtomicBool::new(session.overlay_visible),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible.load(Ordering::SeqCst)
    }

    /// Read access to the gesture machine, mainly for diagnostics.
    pub fn gestures(&self) -> &GestureStateMachine {
        &self.gestures
    }

    // ── Pointer ───────────────────────────────────────────────────────────────

    /// Decodes one pointer or touch call and acts on it.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::Protocol`] for an unknown mask or an open-URL call
    /// without a URL. The event is dropped.
    pub fn handle_pointer(
        &self,
        kind: PointerKind,
        mask: i32,
        x: i32,
        y: i32,
        aux: Option<&str>,
    ) -> Result<(), InputError> {
        let _entered = self.span.enter();
        let event = decode_pointer(kind, mask, x, y, aux).map_err(|e| {
            warn!("pointer event dropped: {e}");
            e
        })?;
        match event {
            InputEvent::Pointer(p) => match &p.action {
                PointerAction::OverlayToggle => self.toggle_overlay(),
                PointerAction::OpenUrl(url) => self.open_url(url.clone()),
                _ => self.gestures.handle_pointer(&p),
            },
            InputEvent::Touch(t) => self.gestures.handle_touch(&t),
            InputEvent::Key(_) => debug!("key event on the pointer path ignored"),
        }
        Ok(())
    }

    fn toggle_overlay(&self) {
        let visible = !self.overlay_visible.fetch_xor(true, Ordering::SeqCst);
        debug!(visible, "overlay toggled");
        self.host.set_overlay_visible(visible);
    }

    fn open_url(&self, url: String) {
        let host = Arc::clone(&self.host);
        let span = self.span.clone();
        let posted = self.ui.execute(Box::new(move || {
            let _entered = span.enter();
            if let Err(e) = host.open_url(&url) {
                warn!("open url failed: {e}");
            }
        }));
        if !posted {
            warn!("UI thread unavailable; open url dropped");
        }
    }

    // ── Keys ──────────────────────────────────────────────────────────────────

    /// Decodes, translates and delivers one key message.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::Protocol`] for a malformed message and
    /// [`InputError::Translate`] for a key that resolves to nothing. Delivery
    /// failures are logged, not returned.
    pub fn handle_key(&self, bytes: &[u8]) -> Result<(), InputError> {
        let _entered = self.span.enter();
        let msg = decode_key_message(bytes).map_err(|e| {
            warn!("key message dropped: {e}");
            e
        })?;
        let translation = translate(&msg).map_err(|e| {
            debug!(?msg, "key dropped: {e}");
            e
        })?;

        if let Some(actions) = intercepts(&translation) {
            for action in actions {
                self.perform_intercept(action);
            }
            return Ok(());
        }

        if let Some(connection) = self.host.input_connection() {
            deliver_direct(connection.as_ref(), &translation);
            return Ok(());
        }

        self.post_injection(translation);
        Ok(())
    }

    fn perform_intercept(&self, action: Intercept) {
        debug!(?action, "key intercepted");
        match action {
            Intercept::RaiseVolume => self.host.raise_volume(),
            Intercept::LowerVolume => self.host.lower_volume(),
            Intercept::ToggleMute => self.host.toggle_mute(),
            Intercept::PowerDialog => {
                if let Err(e) = self.host.perform_global_action(GlobalAction::PowerDialog) {
                    warn!("power dialog failed: {e}");
                }
            }
        }
    }

    fn post_injection(&self, translation: KeyTranslation) {
        let request = match translation.output {
            KeyOutput::Text(text) => InjectRequest::Text(text),
            KeyOutput::Key { code, action } => InjectRequest::Key {
                code,
                action,
                press: translation.press,
            },
        };
        let injector = Arc::clone(&self.injector);
        let span = self.span.clone();
        let posted = self.ui.execute(Box::new(move || {
            let _entered = span.enter();
            let mut injector = injector.lock().unwrap_or_else(PoisonError::into_inner);
            match injector.inject(&request) {
                Ok(node) => debug!(?node, "text injected"),
                Err(e) => warn!(?request, "text injection dropped: {e}"),
            }
        }));
        if !posted {
            warn!("UI thread unavailable; key dropped");
        }
    }

    /// Resolves once every UI job posted before this call has run.
    pub async fn flush_ui(&self) {
        flush_ui(self.ui.as_ref()).await;
    }
}

fn deliver_direct(connection: &dyn InputConnection, translation: &KeyTranslation) {
    match &translation.output {
        KeyOutput::Text(text) => {
            if let Err(e) = connection.commit_text(text) {
                warn!("commit text failed: {e}");
            }
        }
        KeyOutput::Key { .. } => {
            for (code, action) in translation.key_halves() {
                if let Err(e) = connection.send_key(code, action) {
                    warn!(?code, ?action, "send key failed: {e}");
                }
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
