//! Host (Android) key code values.
//!
//! Values match `android.view.KeyEvent.KEYCODE_*`. Only the codes the agent
//! produces or intercepts are named here; any other code arriving on the wire
//! passes through as a raw [`AndroidKeyCode`].
//!
//! # Why a newtype instead of an enum? (for beginners)
//!
//! The remote side may send any host key code, including ones this table has
//! never heard of. A closed enum would force us to reject those; a newtype
//! around `u32` lets unknown codes flow through untouched while the named
//! constants keep call sites readable.

use serde::{Deserialize, Serialize};

/// A host key code (`KeyEvent.KEYCODE_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AndroidKeyCode(pub u32);

impl AndroidKeyCode {
    pub const UNKNOWN: Self = Self(0);
    pub const HOME: Self = Self(3);
    pub const BACK: Self = Self(4);
    pub const DIGIT_0: Self = Self(7);
    pub const DIGIT_9: Self = Self(16);
    pub const STAR: Self = Self(17);
    pub const POUND: Self = Self(18);
    pub const DPAD_UP: Self = Self(19);
    pub const DPAD_DOWN: Self = Self(20);
    pub const DPAD_LEFT: Self = Self(21);
    pub const DPAD_RIGHT: Self = Self(22);
    pub const VOLUME_UP: Self = Self(24);
    pub const VOLUME_DOWN: Self = Self(25);
    pub const POWER: Self = Self(26);
    pub const CLEAR: Self = Self(28);
    pub const A: Self = Self(29);
    pub const Z: Self = Self(54);
    pub const COMMA: Self = Self(55);
    pub const PERIOD: Self = Self(56);
    pub const ALT_LEFT: Self = Self(57);
    pub const ALT_RIGHT: Self = Self(58);
    pub const SHIFT_LEFT: Self = Self(59);
    pub const SHIFT_RIGHT: Self = Self(60);
    pub const TAB: Self = Self(61);
    pub const SPACE: Self = Self(62);
    pub const ENTER: Self = Self(66);
    /// Backspace.
    pub const DEL: Self = Self(67);
    pub const GRAVE: Self = Self(68);
    pub const MINUS: Self = Self(69);
    pub const EQUALS: Self = Self(70);
    pub const LEFT_BRACKET: Self = Self(71);
    pub const RIGHT_BRACKET: Self = Self(72);
    pub const BACKSLASH: Self = Self(73);
    pub const SEMICOLON: Self = Self(74);
    pub const APOSTROPHE: Self = Self(75);
    pub const SLASH: Self = Self(76);
    pub const AT: Self = Self(77);
    pub const PLUS: Self = Self(81);
    pub const MENU: Self = Self(82);
    pub const PAGE_UP: Self = Self(92);
    pub const PAGE_DOWN: Self = Self(93);
    pub const ESCAPE: Self = Self(111);
    pub const FORWARD_DEL: Self = Self(112);
    pub const CTRL_LEFT: Self = Self(113);
    pub const CTRL_RIGHT: Self = Self(114);
    pub const CAPS_LOCK: Self = Self(115);
    pub const SCROLL_LOCK: Self = Self(116);
    pub const META_LEFT: Self = Self(117);
    pub const META_RIGHT: Self = Self(118);
    pub const SYSRQ: Self = Self(120);
    pub const BREAK: Self = Self(121);
    pub const MOVE_HOME: Self = Self(122);
    pub const MOVE_END: Self = Self(123);
    pub const INSERT: Self = Self(124);
    pub const F1: Self = Self(131);
    pub const F12: Self = Self(142);
    pub const NUM_LOCK: Self = Self(143);
    pub const NUMPAD_0: Self = Self(144);
    pub const NUMPAD_9: Self = Self(153);
    pub const NUMPAD_DIVIDE: Self = Self(154);
    pub const NUMPAD_MULTIPLY: Self = Self(155);
    pub const NUMPAD_SUBTRACT: Self = Self(156);
    pub const NUMPAD_ADD: Self = Self(157);
    pub const NUMPAD_DOT: Self = Self(158);
    pub const NUMPAD_ENTER: Self = Self(160);
    pub const NUMPAD_EQUALS: Self = Self(161);
    pub const VOLUME_MUTE: Self = Self(164);
    pub const SLEEP: Self = Self(223);
    pub const HELP: Self = Self(259);

    /// Letter key for `'a'..='z'` (case-insensitive).
    pub fn letter(c: char) -> Option<Self> {
        let lower = c.to_ascii_lowercase();
        lower
            .is_ascii_lowercase()
            .then(|| Self(Self::A.0 + (lower as u32 - 'a' as u32)))
    }

    /// Top-row digit key for `'0'..='9'`.
    pub fn digit(c: char) -> Option<Self> {
        c.to_digit(10).map(|d| Self(Self::DIGIT_0.0 + d))
    }

    /// Function key `F1..=F12`.
    pub fn function(n: u8) -> Option<Self> {
        (1..=12).contains(&n).then(|| Self(Self::F1.0 + u32::from(n) - 1))
    }

    /// Numeric keypad digit `0..=9`.
    pub fn numpad(n: u8) -> Option<Self> {
        (n <= 9).then(|| Self(Self::NUMPAD_0.0 + u32::from(n)))
    }

    /// Returns `true` for the three volume keys.
    pub fn is_volume(self) -> bool {
        matches!(self, Self::VOLUME_UP | Self::VOLUME_DOWN | Self::VOLUME_MUTE)
    }
}

/// Whether a key event is the press or the release half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    Down,
    Up,
}
