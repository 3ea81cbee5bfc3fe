//! Key code translation tables for the host key model.
//!
//! The remote viewer names keys three ways: a host key code it already
//! resolved, a wire [`ControlKey`], or a character. All three are translated
//! to an [`AndroidKeyCode`] here.

pub mod android;
pub mod control_key;

pub use android::{AndroidKeyCode, KeyAction};
pub use control_key::ControlKey;

/// Unified key mapper providing all translation directions.
pub struct KeyMapper;

impl KeyMapper {
    /// Translates a wire [`ControlKey`] to a host key code.
    pub fn control_key_to_android(key: ControlKey) -> AndroidKeyCode {
        control_key::control_key_to_android(key)
    }

    /// Translates a character to the host key that types it on a US layout.
    ///
    /// Returns `None` if no single key produces `c`.
    pub fn char_to_android(c: char) -> Option<AndroidKeyCode> {
        if let Some(code) = AndroidKeyCode::letter(c).or_else(|| AndroidKeyCode::digit(c)) {
            return Some(code);
        }
        char_to_android_punct(c)
    }
}

/// Punctuation and whitespace characters with a dedicated host key.
fn char_to_android_punct(c: char) -> Option<AndroidKeyCode> {
    match c {
        ' ' => Some(AndroidKeyCode::SPACE),
        '\t' => Some(AndroidKeyCode::TAB),
        '\r' | '\n' => Some(AndroidKeyCode::ENTER),
        '\u{8}' => Some(AndroidKeyCode::DEL),
        '\u{7f}' => Some(AndroidKeyCode::FORWARD_DEL),
        '\u{1b}' => Some(AndroidKeyCode::ESCAPE),
        ',' => Some(AndroidKeyCode::COMMA),
        '.' => Some(AndroidKeyCode::PERIOD),
        '`' => Some(AndroidKeyCode::GRAVE),
        '-' => Some(AndroidKeyCode::MINUS),
        '=' => Some(AndroidKeyCode::EQUALS),
        '[' => Some(AndroidKeyCode::LEFT_BRACKET),
        ']' => Some(AndroidKeyCode::RIGHT_BRACKET),
        '\\' => Some(AndroidKeyCode::BACKSLASH),
        ';' => Some(AndroidKeyCode::SEMICOLON),
        '\'' => Some(AndroidKeyCode::APOSTROPHE),
        '/' => Some(AndroidKeyCode::SLASH),
        '@' => Some(AndroidKeyCode::AT),
        '+' => Some(AndroidKeyCode::PLUS),
        '*' => Some(AndroidKeyCode::STAR),
        '#' => Some(AndroidKeyCode::POUND),
        _ => None,
    }
}
