//! # touchbridge-core
//!
//! Shared library for the touchbridge remote input agent containing the wire
//! protocol decoder, key code tables, and the gesture domain types.
//!
//! This crate has zero dependencies on the host automation layer, UI trees or
//! async runtimes. Everything here is pure data and pure functions.
//!
//! # Architecture overview (for beginners)
//!
//! A remote viewer drives the controlled device with a mouse and a keyboard,
//! but the device only understands *gestures*: timed touch paths replayed by
//! its automation layer. The agent translates one model into the other.
//!
//! This crate (`touchbridge-core`) is the shared foundation. It defines:
//!
//! - **`protocol`** – How inbound events look. Pointer calls arrive as a
//!   `(mask, x, y)` triple whose mask selects the action; key events arrive
//!   as a compact binary message. The decoder turns both into typed events.
//!
//! - **`keymap`** – Host key code constants and the tables that map wire
//!   control keys and characters onto them.
//!
//! - **`domain`** – Pointer state, gesture paths and the validated [`Stroke`]
//!   the host replays.

pub mod domain;
pub mod keymap;
pub mod protocol;

pub use domain::gesture::{
    scroll_stroke, GestureError, GesturePath, Point, PointerState, ScrollDirection, Stroke,
};
pub use keymap::{AndroidKeyCode, ControlKey, KeyAction, KeyMapper};
pub use protocol::codec::{
    decode_key_message, decode_pointer, encode_key_message, ProtocolError, MAX_SEQUENCE_LEN,
};
pub use protocol::messages::{InputEvent, KeyEventMessage, KeyboardMode};
