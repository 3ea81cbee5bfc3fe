//! All inbound event types understood by the agent.
//!
//! Pointer calls arrive as `(kind, mask, x, y, aux)` tuples; the mask values
//! below are the wire constants the remote viewer sends. Key events arrive as
//! a binary [`KeyEventMessage`] (see [`crate::protocol::codec`]).

use serde::{Deserialize, Serialize};

use crate::keymap::android::AndroidKeyCode;
use crate::keymap::control_key::ControlKey;

// ── Mouse mask constants ──────────────────────────────────────────────────────

/// Plain cursor move (no button state change).
pub const MASK_MOVE: i32 = 0;
/// Cursor move while the primary button is held.
pub const MASK_PRIMARY_MOVE: i32 = 8;
/// Primary (left) button pressed.
pub const MASK_PRIMARY_DOWN: i32 = 9;
/// Primary (left) button released.
pub const MASK_PRIMARY_UP: i32 = 10;
/// Secondary (right) button released.
pub const MASK_SECONDARY_UP: i32 = 18;
/// Wheel button pressed.
pub const MASK_WHEEL_BUTTON_DOWN: i32 = 33;
/// Wheel button released.
pub const MASK_WHEEL_BUTTON_UP: i32 = 34;
/// Auxiliary button 5: toggles the session overlay.
pub const MASK_OVERLAY_TOGGLE: i32 = 37;
/// Auxiliary button 6: opens the URL carried in the aux payload.
pub const MASK_OPEN_URL: i32 = 38;
/// Wheel scrolled down one notch.
pub const MASK_SCROLL_DOWN: i32 = 523_331;
/// Wheel scrolled up one notch.
pub const MASK_SCROLL_UP: i32 = 963;

// ── Touch mask constants ──────────────────────────────────────────────────────

pub const TOUCH_SCALE_START: i32 = 1;
pub const TOUCH_SCALE: i32 = 2;
pub const TOUCH_SCALE_END: i32 = 3;
pub const TOUCH_PAN_START: i32 = 4;
pub const TOUCH_PAN_UPDATE: i32 = 5;
pub const TOUCH_PAN_END: i32 = 6;

// ── Pointer events ────────────────────────────────────────────────────────────

/// Which family of pointer call the transport delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// Decoded mouse action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerAction {
    Move,
    PrimaryDown,
    PrimaryUp,
    SecondaryUp,
    WheelButtonDown,
    WheelButtonUp,
    OverlayToggle,
    OpenUrl(String),
    ScrollDown,
    ScrollUp,
}

/// A decoded mouse event. Coordinates are clamped to ≥0 but not yet scaled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub x: i32,
    pub y: i32,
}

/// Decoded touch action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchAction {
    ScaleStart,
    Scale,
    ScaleEnd,
    PanStart,
    PanUpdate,
    PanEnd,
}

/// A decoded touch event.
///
/// For [`TouchAction::PanUpdate`] `x`/`y` are a signed delta; for every other
/// action they are an absolute position clamped to ≥0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchEvent {
    pub action: TouchAction,
    pub x: i32,
    pub y: i32,
}

// ── Key events ────────────────────────────────────────────────────────────────

/// How the remote side encoded the key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum KeyboardMode {
    /// Character-oriented: `chr` carries a Unicode code point.
    Legacy = 0x00,
    /// Key-code oriented: resolve to a host key code only.
    Translate = 0x01,
    /// Literal text sequences in `seq`.
    Sequence = 0x02,
}

impl TryFrom<u8> for KeyboardMode {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(KeyboardMode::Legacy),
            0x01 => Ok(KeyboardMode::Translate),
            0x02 => Ok(KeyboardMode::Sequence),
            _ => Err(()),
        }
    }
}

/// A decoded key message. Transient: one per inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEventMessage {
    /// Key state: `true` = down, `false` = up.
    pub down: bool,
    /// Composite click: a down immediately followed by an up.
    pub press: bool,
    pub mode: KeyboardMode,
    /// Unicode code point (Legacy mode).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chr: Option<u32>,
    /// Literal text to commit verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq: Option<String>,
    /// Host key code, when the remote side already resolved one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keycode: Option<AndroidKeyCode>,
    /// Wire control key (arrows, function keys, volume, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_key: Option<ControlKey>,
}

impl KeyEventMessage {
    /// An empty message in the given mode; callers fill in the fields they need.
    pub fn new(mode: KeyboardMode) -> Self {
        Self {
            down: false,
            press: false,
            mode,
            chr: None,
            seq: None,
            keycode: None,
            control_key: None,
        }
    }
}

// ── Top-level event enum ──────────────────────────────────────────────────────

/// Every inbound event the agent handles, discriminated by family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Pointer(PointerEvent),
    Touch(TouchEvent),
    Key(KeyEventMessage),
}
