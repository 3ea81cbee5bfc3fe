//! Wire control keys: non-character keys the remote viewer names explicitly.
//!
//! The numeric value of each variant is its wire identifier in the key
//! message's `control_key` field.

use serde::{Deserialize, Serialize};

use super::android::AndroidKeyCode;

/// Control key identifier as sent by the remote viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u16)]
pub enum ControlKey {
    Alt = 1,
    Backspace = 2,
    CapsLock = 3,
    Control = 4,
    Delete = 5,
    DownArrow = 6,
    End = 7,
    Escape = 8,
    F1 = 9,
    F2 = 10,
    F3 = 11,
    F4 = 12,
    F5 = 13,
    F6 = 14,
    F7 = 15,
    F8 = 16,
    F9 = 17,
    F10 = 18,
    F11 = 19,
    F12 = 20,
    Home = 21,
    LeftArrow = 22,
    Meta = 23,
    PageDown = 25,
    PageUp = 26,
    Return = 27,
    RightArrow = 28,
    Shift = 29,
    Space = 30,
    Tab = 31,
    UpArrow = 32,
    Numpad0 = 33,
    Numpad1 = 34,
    Numpad2 = 35,
    Numpad3 = 36,
    Numpad4 = 37,
    Numpad5 = 38,
    Numpad6 = 39,
    Numpad7 = 40,
    Numpad8 = 41,
    Numpad9 = 42,
    Clear = 44,
    Menu = 45,
    Pause = 46,
    Snapshot = 57,
    Insert = 58,
    Help = 59,
    Sleep = 60,
    Scroll = 62,
    NumLock = 63,
    RWin = 64,
    Multiply = 66,
    Add = 67,
    Subtract = 68,
    Decimal = 69,
    Divide = 70,
    Equals = 71,
    NumpadEnter = 72,
    RShift = 73,
    RControl = 74,
    RAlt = 75,
    VolumeMute = 76,
    VolumeUp = 77,
    VolumeDown = 78,
    Power = 79,
}

impl TryFrom<u16> for ControlKey {
    type Error = ();

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        use ControlKey::*;
        let key = match value {
            1 => Alt,
            2 => Backspace,
            3 => CapsLock,
            4 => Control,
            5 => Delete,
            6 => DownArrow,
            7 => End,
            8 => Escape,
            9 => F1,
            10 => F2,
            11 => F3,
            12 => F4,
            13 => F5,
            14 => F6,
            15 => F7,
            16 => F8,
            17 => F9,
            18 => F10,
            19 => F11,
            20 => F12,
            21 => Home,
            22 => LeftArrow,
            23 => Meta,
            25 => PageDown,
            26 => PageUp,
            27 => Return,
            28 => RightArrow,
            29 => Shift,
            30 => Space,
            31 => Tab,
            32 => UpArrow,
            33 => Numpad0,
            34 => Numpad1,
            35 => Numpad2,
            36 => Numpad3,
            37 => Numpad4,
            38 => Numpad5,
            39 => Numpad6,
            40 => Numpad7,
            41 => Numpad8,
            42 => Numpad9,
            44 => Clear,
            45 => Menu,
            46 => Pause,
            57 => Snapshot,
            58 => Insert,
            59 => Help,
            60 => Sleep,
            62 => Scroll,
            63 => NumLock,
            64 => RWin,
            66 => Multiply,
            67 => Add,
            68 => Subtract,
            69 => Decimal,
            70 => Divide,
            71 => Equals,
            72 => NumpadEnter,
            73 => RShift,
            74 => RControl,
            75 => RAlt,
            76 => VolumeMute,
            77 => VolumeUp,
            78 => VolumeDown,
            79 => Power,
            _ => return Err(()),
        };
        Ok(key)
    }
}

/// Translates a [`ControlKey`] to its host key code.
///
/// Every control key has a host equivalent, so this never fails.
pub fn control_key_to_android(key: ControlKey) -> AndroidKeyCode {
    use ControlKey::*;
    match key {
        Alt => AndroidKeyCode::ALT_LEFT,
        Backspace => AndroidKeyCode::DEL,
        CapsLock => AndroidKeyCode::CAPS_LOCK,
        Control => AndroidKeyCode::CTRL_LEFT,
        Delete => AndroidKeyCode::FORWARD_DEL,
        DownArrow => AndroidKeyCode::DPAD_DOWN,
        End => AndroidKeyCode::MOVE_END,
        Escape => AndroidKeyCode::ESCAPE,
        F1 => AndroidKeyCode(131),
        F2 => AndroidKeyCode(132),
        F3 => AndroidKeyCode(133),
        F4 => AndroidKeyCode(134),
        F5 => AndroidKeyCode(135),
        F6 => AndroidKeyCode(136),
        F7 => AndroidKeyCode(137),
        F8 => AndroidKeyCode(138),
        F9 => AndroidKeyCode(139),
        F10 => AndroidKeyCode(140),
        F11 => AndroidKeyCode(141),
        F12 => AndroidKeyCode(142),
        Home => AndroidKeyCode::MOVE_HOME,
        LeftArrow => AndroidKeyCode::DPAD_LEFT,
        Meta => AndroidKeyCode::META_LEFT,
        PageDown => AndroidKeyCode::PAGE_DOWN,
        PageUp => AndroidKeyCode::PAGE_UP,
        Return => AndroidKeyCode::ENTER,
        RightArrow => AndroidKeyCode::DPAD_RIGHT,
        Shift => AndroidKeyCode::SHIFT_LEFT,
        Space => AndroidKeyCode::SPACE,
        Tab => AndroidKeyCode::TAB,
        UpArrow => AndroidKeyCode::DPAD_UP,
        Numpad0 => AndroidKeyCode(144),
        Numpad1 => AndroidKeyCode(145),
        Numpad2 => AndroidKeyCode(146),
        Numpad3 => AndroidKeyCode(147),
        Numpad4 => AndroidKeyCode(148),
        Numpad5 => AndroidKeyCode(149),
        Numpad6 => AndroidKeyCode(150),
        Numpad7 => AndroidKeyCode(151),
        Numpad8 => AndroidKeyCode(152),
        Numpad9 => AndroidKeyCode(153),
        Clear => AndroidKeyCode::CLEAR,
        Menu => AndroidKeyCode::MENU,
        Pause => AndroidKeyCode::BREAK,
        Snapshot => AndroidKeyCode::SYSRQ,
        Insert => AndroidKeyCode::INSERT,
        Help => AndroidKeyCode::HELP,
        Sleep => AndroidKeyCode::SLEEP,
        Scroll => AndroidKeyCode::SCROLL_LOCK,
        NumLock => AndroidKeyCode::NUM_LOCK,
        RWin => AndroidKeyCode::META_RIGHT,
        Multiply => AndroidKeyCode::NUMPAD_MULTIPLY,
        Add => AndroidKeyCode::NUMPAD_ADD,
        Subtract => AndroidKeyCode::NUMPAD_SUBTRACT,
        Decimal => AndroidKeyCode::NUMPAD_DOT,
        Divide => AndroidKeyCode::NUMPAD_DIVIDE,
        Equals => AndroidKeyCode::NUMPAD_EQUALS,
        NumpadEnter => AndroidKeyCode::NUMPAD_ENTER,
        RShift => AndroidKeyCode::SHIFT_RIGHT,
        RControl => AndroidKeyCode::CTRL_RIGHT,
        RAlt => AndroidKeyCode::ALT_RIGHT,
        VolumeMute => AndroidKeyCode::VOLUME_MUTE,
        VolumeUp => AndroidKeyCode::VOLUME_UP,
        VolumeDown => AndroidKeyCode::VOLUME_DOWN,
        Power => AndroidKeyCode::POWER,
    }
}
