//! Key translation: decoded key messages to host key codes or literal text.
//!
//! A remote key event becomes exactly one of two things:
//!
//! - **Text** to commit verbatim (an explicit sequence, or a Legacy-mode
//!   character typed on key-down), or
//! - **A host key code** plus a down/up action.
//!
//! Volume and power keys never reach the focused editor; [`intercepts`]
//! tells the caller what to do with them instead.

use thiserror::Error;
use touchbridge_core::{AndroidKeyCode, KeyAction, KeyEventMessage, KeyMapper, KeyboardMode};

/// Error type for key translation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TranslateError {
    /// `chr` is not a Unicode scalar value (lone surrogate, out of range).
    #[error("invalid code point: 0x{0:X}")]
    InvalidCodePoint(u32),

    /// Nothing in the message resolves to a host key code.
    #[error("key message resolves to no host key code")]
    Unmapped,
}

/// What a key message turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutput {
    Text(String),
    Key { code: AndroidKeyCode, action: KeyAction },
}

/// A translated key message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTranslation {
    pub output: KeyOutput,
    /// The message was a composite click: a release follows the key-down.
    pub press: bool,
}

impl KeyTranslation {
    /// The key halves to deliver, in order. Empty for text.
    ///
    /// A press yields the down and then the synthetic up for the same code.
    pub fn key_halves(&self) -> Vec<(AndroidKeyCode, KeyAction)> {
        match self.output {
            KeyOutput::Text(_) => Vec::new(),
            KeyOutput::Key { code, action } => {
                let mut halves = vec![(code, action)];
                if self.press && action == KeyAction::Down {
                    halves.push((code, KeyAction::Up));
                }
                halves
            }
        }
    }
}

/// A device-level action triggered by an intercepted key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intercept {
    RaiseVolume,
    LowerVolume,
    ToggleMute,
    PowerDialog,
}

/// Translates one decoded key message.
///
/// Rules, first match wins:
/// 1. `seq` present: commit it verbatim, whatever the mode.
/// 2. Legacy mode with `chr` on down or press: commit the character.
/// 3. Otherwise resolve a host key code: `keycode`, then `control_key`, then
///    the character table for `chr`.
///
/// # Errors
///
/// [`TranslateError::InvalidCodePoint`] for a Legacy `chr` that is not a
/// scalar value, [`TranslateError::Unmapped`] when rule 3 finds no code.
pub fn translate(msg: &KeyEventMessage) -> Result<KeyTranslation, TranslateError> {
    let press = msg.press;

    if let Some(seq) = &msg.seq {
        return Ok(KeyTranslation {
            output: KeyOutput::Text(seq.clone()),
            press,
        });
    }

    if msg.mode == KeyboardMode::Legacy && (msg.down || msg.press) {
        if let Some(raw) = msg.chr.filter(|&c| c != 0) {
            let ch = decode_code_point(raw)?;
            return Ok(KeyTranslation {
                output: KeyOutput::Text(ch.to_string()),
                press,
            });
        }
    }

    let code = resolve_key_code(msg).ok_or(TranslateError::Unmapped)?;
    let action = if msg.down || msg.press {
        KeyAction::Down
    } else {
        KeyAction::Up
    };
    Ok(KeyTranslation {
        output: KeyOutput::Key { code, action },
        press,
    })
}

/// Checks a translated key against the volume and power interceptors.
///
/// Returns `None` when the key passes through to the editor. Otherwise the key
/// is swallowed and the returned list holds the actions to perform, one per
/// key half that triggers something: volume keys act on the down half, power
/// acts on the up half.
pub fn intercepts(translation: &KeyTranslation) -> Option<Vec<Intercept>> {
    let halves = translation.key_halves();
    let (code, _) = *halves.first()?;
    if !code.is_volume() && code != AndroidKeyCode::POWER {
        return None;
    }
    let actions = halves
        .into_iter()
        .filter_map(|(code, action)| match (code, action) {
            (AndroidKeyCode::VOLUME_UP, KeyAction::Down) => Some(Intercept::RaiseVolume),
            (AndroidKeyCode::VOLUME_DOWN, KeyAction::Down) => Some(Intercept::LowerVolume),
            (AndroidKeyCode::VOLUME_MUTE, KeyAction::Down) => Some(Intercept::ToggleMute),
            (AndroidKeyCode::POWER, KeyAction::Up) => Some(Intercept::PowerDialog),
            _ => None,
        })
        .collect();
    Some(actions)
}

fn resolve_key_code(msg: &KeyEventMessage) -> Option<AndroidKeyCode> {
    if let Some(code) = msg.keycode {
        return Some(code);
    }
    if let Some(key) = msg.control_key {
        return Some(KeyMapper::control_key_to_android(key));
    }
    let ch = decode_code_point(msg.chr?).ok()?;
    KeyMapper::char_to_android(ch)
}

/// Decodes a wire `chr` into a `char`.
///
/// Accepts a plain scalar value or a UTF-16 surrogate pair packed as
/// `(high << 16) | low`.
fn decode_code_point(raw: u32) -> Result<char, TranslateError> {
    let high = raw >> 16;
    let low = raw & 0xFFFF;
    if (0xD800..=0xDBFF).contains(&high) && (0xDC00..=0xDFFF).contains(&low) {
        let combined = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
        return char::from_u32(combined).ok_or(TranslateError::InvalidCodePoint(raw));
    }
    char::from_u32(raw).ok_or(TranslateError::InvalidCodePoint(raw))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
