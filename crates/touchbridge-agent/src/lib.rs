//! touchbridge-agent library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does the agent do? (for beginners)
//!
//! The agent runs on the *controlled* device. A remote viewer sends it mouse,
//! touch and keyboard events; the device, however, can only be driven through
//! its automation layer, which replays timed touch strokes and edits text in
//! on-screen fields. The agent bridges the two:
//!
//! 1. Decodes each inbound pointer call or key message
//!    (`touchbridge_core::protocol`).
//! 2. Feeds pointer events to a gesture state machine that turns
//!    down/move/up sequences into strokes, detects long presses, and maps the
//!    extra mouse buttons to back/home/recents.
//! 3. Serializes wheel scrolls through a queue, because the host only replays
//!    one gesture at a time.
//! 4. Translates key events into host key codes or literal text, intercepting
//!    the volume and power keys.
//! 5. Delivers text either through a direct input connection or, when none
//!    exists, by finding the focused text field in the accessibility tree and
//!    rewriting its contents.

/// Application layer: the translator's use cases and the host contracts.
pub mod application;

/// Infrastructure layer: host adapters, UI worker thread, config and replay.
pub mod infrastructure;
