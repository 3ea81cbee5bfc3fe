//! Decoder for inbound pointer calls and binary key messages.
//!
//! Key message wire format:
//! ```text
//! [flags:1][mode:1][chr:4]?[keycode:4]?[control_key:2]?[seq_len:2][seq:N]?
//! ```
//! Flag bits: 0 down, 1 press, 2 has_chr, 3 has_keycode, 4 has_control_key,
//! 5 has_seq. Bits 6 and 7 are reserved and must be zero. All multi-byte
//! integers are big-endian. Optional fields appear in the order listed.

use thiserror::Error;
use tracing::trace;

use crate::keymap::android::AndroidKeyCode;
use crate::keymap::control_key::ControlKey;
use crate::protocol::messages::{
    InputEvent, KeyEventMessage, KeyboardMode, PointerAction, PointerEvent, PointerKind,
    TouchAction, TouchEvent, MASK_MOVE, MASK_OPEN_URL, MASK_OVERLAY_TOGGLE, MASK_PRIMARY_DOWN,
    MASK_PRIMARY_MOVE, MASK_PRIMARY_UP, MASK_SCROLL_DOWN, MASK_SCROLL_UP, MASK_SECONDARY_UP,
    MASK_WHEEL_BUTTON_DOWN, MASK_WHEEL_BUTTON_UP, TOUCH_PAN_END, TOUCH_PAN_START,
    TOUCH_PAN_UPDATE, TOUCH_SCALE, TOUCH_SCALE_END, TOUCH_SCALE_START,
};

const FLAG_DOWN: u8 = 1 << 0;
const FLAG_PRESS: u8 = 1 << 1;
const FLAG_HAS_CHR: u8 = 1 << 2;
const FLAG_HAS_KEYCODE: u8 = 1 << 3;
const FLAG_HAS_CONTROL_KEY: u8 = 1 << 4;
const FLAG_HAS_SEQ: u8 = 1 << 5;
const FLAG_RESERVED: u8 = 0b1100_0000;

/// Minimum key message size: flags + mode.
const KEY_HEADER_SIZE: usize = 2;

/// Errors that can occur while decoding an inbound event.
#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    /// The byte slice is shorter than the fields it declares.
    #[error("insufficient data: need at least {needed} bytes, got {available}")]
    InsufficientData { needed: usize, available: usize },

    /// The pointer mask is not a recognized value for its kind.
    #[error("unknown {kind:?} mask: {mask}")]
    UnknownMask { kind: PointerKind, mask: i32 },

    /// The keyboard mode byte is not a recognized value.
    #[error("unknown keyboard mode: 0x{0:02X}")]
    UnknownMode(u8),

    /// The payload could not be parsed (reserved bits, UTF-8 error, etc.).
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// Bytes remain after the last declared field.
    #[error("{0} trailing bytes after key message")]
    TrailingBytes(usize),
}

// ── Pointer calls ─────────────────────────────────────────────────────────────

/// Decodes one pointer or touch call into a typed [`InputEvent`].
///
/// Absolute coordinates are clamped to ≥0. Touch pan-update coordinates are
/// signed deltas and pass through unchanged.
///
/// # Errors
///
/// Returns [`ProtocolError::UnknownMask`] for masks outside the wire table and
/// [`ProtocolError::MalformedPayload`] for an open-URL call without a URL.
///
/// # Examples
///
/// ```rust
/// use touchbridge_core::protocol::{decode_pointer, InputEvent, PointerAction, PointerKind};
///
/// let event = decode_pointer(PointerKind::Mouse, 9, -4, 30, None).unwrap();
/// match event {
///     InputEvent::Pointer(p) => {
///         assert_eq!(p.action, PointerAction::PrimaryDown);
///         assert_eq!((p.x, p.y), (0, 30));
///     }
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
pub fn decode_pointer(
    kind: PointerKind,
    mask: i32,
    x: i32,
    y: i32,
    aux: Option<&str>,
) -> Result<InputEvent, ProtocolError> {
    match kind {
        PointerKind::Mouse => decode_mouse(mask, x, y, aux).map(InputEvent::Pointer),
        PointerKind::Touch => decode_touch(mask, x, y).map(InputEvent::Touch),
    }
}

fn decode_mouse(mask: i32, x: i32, y: i32, aux: Option<&str>) -> Result<PointerEvent, ProtocolError> {
    let action = match mask {
        MASK_MOVE | MASK_PRIMARY_MOVE => PointerAction::Move,
        MASK_PRIMARY_DOWN => PointerAction::PrimaryDown,
        MASK_PRIMARY_UP => PointerAction::PrimaryUp,
        MASK_SECONDARY_UP => PointerAction::SecondaryUp,
        MASK_WHEEL_BUTTON_DOWN => PointerAction::WheelButtonDown,
        MASK_WHEEL_BUTTON_UP => PointerAction::WheelButtonUp,
        MASK_OVERLAY_TOGGLE => PointerAction::OverlayToggle,
        MASK_OPEN_URL => {
            let url = aux.map(str::trim).filter(|u| !u.is_empty()).ok_or_else(|| {
                ProtocolError::MalformedPayload("open-url call without a url".to_string())
            })?;
            PointerAction::OpenUrl(url.to_string())
        }
        MASK_SCROLL_DOWN => PointerAction::ScrollDown,
        MASK_SCROLL_UP => PointerAction::ScrollUp,
        _ => {
            return Err(ProtocolError::UnknownMask {
                kind: PointerKind::Mouse,
                mask,
            })
        }
    };
    Ok(PointerEvent {
        action,
        x: x.max(0),
        y: y.max(0),
    })
}

fn decode_touch(mask: i32, x: i32, y: i32) -> Result<TouchEvent, ProtocolError> {
    let action = match mask {
        TOUCH_SCALE_START => TouchAction::ScaleStart,
        TOUCH_SCALE => TouchAction::Scale,
        TOUCH_SCALE_END => TouchAction::ScaleEnd,
        TOUCH_PAN_START => TouchAction::PanStart,
        TOUCH_PAN_UPDATE => TouchAction::PanUpdate,
        TOUCH_PAN_END => TouchAction::PanEnd,
        _ => {
            return Err(ProtocolError::UnknownMask {
                kind: PointerKind::Touch,
                mask,
            })
        }
    };
    if action == TouchAction::PanUpdate {
        trace!(dx = x, dy = y, "touch pan delta");
        return Ok(TouchEvent { action, x, y });
    }
    Ok(TouchEvent {
        action,
        x: x.max(0),
        y: y.max(0),
    })
}

// ── Key messages ──────────────────────────────────────────────────────────────

/// Longest `seq` payload, in UTF-8 bytes, the key message format can carry.
pub const MAX_SEQUENCE_LEN: usize = u16::MAX as usize;

/// Encodes a [`KeyEventMessage`] into its binary wire form.
///
/// A `seq` longer than [`MAX_SEQUENCE_LEN`] bytes is cut at the last char
/// boundary that fits; callers holding untrusted text should check first.
///
/// # Examples
///
/// ```rust
/// use touchbridge_core::protocol::{decode_key_message, encode_key_message, KeyEventMessage, KeyboardMode};
///
/// let mut msg = KeyEventMessage::new(KeyboardMode::Sequence);
/// msg.seq = Some("hi".to_string());
/// let bytes = encode_key_message(&msg);
/// assert_eq!(decode_key_message(&bytes).unwrap(), msg);
/// ```
pub fn encode_key_message(msg: &KeyEventMessage) -> Vec<u8> {
    let mut flags = 0u8;
    if msg.down {
        flags |= FLAG_DOWN;
    }
    if msg.press {
        flags |= FLAG_PRESS;
    }
    if msg.chr.is_some() {
        flags |= FLAG_HAS_CHR;
    }
    if msg.keycode.is_some() {
        flags |= FLAG_HAS_KEYCODE;
    }
    if msg.control_key.is_some() {
        flags |= FLAG_HAS_CONTROL_KEY;
    }
    if msg.seq.is_some() {
        flags |= FLAG_HAS_SEQ;
    }

    let mut buf = Vec::with_capacity(KEY_HEADER_SIZE + 12);
    buf.push(flags);
    buf.push(msg.mode as u8);
    if let Some(chr) = msg.chr {
        buf.extend_from_slice(&chr.to_be_bytes());
    }
    if let Some(code) = msg.keycode {
        buf.extend_from_slice(&code.0.to_be_bytes());
    }
    if let Some(key) = msg.control_key {
        buf.extend_from_slice(&(key as u16).to_be_bytes());
    }
    if let Some(seq) = &msg.seq {
        let mut end = seq.len().min(MAX_SEQUENCE_LEN);
        while !seq.is_char_boundary(end) {
            end -= 1;
        }
        buf.extend_from_slice(&(end as u16).to_be_bytes());
        buf.extend_from_slice(&seq.as_bytes()[..end]);
    }
    buf
}

/// Decodes one [`KeyEventMessage`] from `bytes`.
///
/// The whole slice must be consumed; the decoder fails closed on any
/// inconsistency so a malformed message never reaches the translator.
///
/// # Errors
///
/// Returns [`ProtocolError`] if the bytes are truncated, carry an unknown mode
/// or control key, set reserved flag bits, hold invalid UTF-8, or have
/// trailing bytes.
pub fn decode_key_message(bytes: &[u8]) -> Result<KeyEventMessage, ProtocolError> {
    require_len(bytes, KEY_HEADER_SIZE)?;
    let flags = bytes[0];
    if flags & FLAG_RESERVED != 0 {
        return Err(ProtocolError::MalformedPayload(format!(
            "reserved flag bits set: 0x{flags:02X}"
        )));
    }
    let mode = KeyboardMode::try_from(bytes[1]).map_err(|_| ProtocolError::UnknownMode(bytes[1]))?;

    let mut off = KEY_HEADER_SIZE;
    let chr = if flags & FLAG_HAS_CHR != 0 {
        let v = read_u32(bytes, off)?;
        off += 4;
        Some(v)
    } else {
        None
    };
    let keycode = if flags & FLAG_HAS_KEYCODE != 0 {
        let v = read_u32(bytes, off)?;
        off += 4;
        Some(AndroidKeyCode(v))
    } else {
        None
    };
    let control_key = if flags & FLAG_HAS_CONTROL_KEY != 0 {
        let raw = read_u16(bytes, off)?;
        off += 2;
        let key = ControlKey::try_from(raw)
            .map_err(|_| ProtocolError::MalformedPayload(format!("unknown control key: {raw}")))?;
        Some(key)
    } else {
        None
    };
    let seq = if flags & FLAG_HAS_SEQ != 0 {
        let len = read_u16(bytes, off)? as usize;
        off += 2;
        require_len(bytes, off + len)?;
        let s = std::str::from_utf8(&bytes[off..off + len])
            .map_err(|e| ProtocolError::MalformedPayload(format!("sequence is not UTF-8: {e}")))?;
        off += len;
        Some(s.to_string())
    } else {
        None
    };

    if off != bytes.len() {
        return Err(ProtocolError::TrailingBytes(bytes.len() - off));
    }

    Ok(KeyEventMessage {
        down: flags & FLAG_DOWN != 0,
        press: flags & FLAG_PRESS != 0,
        mode,
        chr,
        seq,
        keycode,
        control_key,
    })
}

// ── Low-level read helpers ────────────────────────────────────────────────────

fn require_len(bytes: &[u8], needed: usize) -> Result<(), ProtocolError> {
    if bytes.len() < needed {
        return Err(ProtocolError::InsufficientData {
            needed,
            available: bytes.len(),
        });
    }
    Ok(())
}

fn read_u16(bytes: &[u8], off: usize) -> Result<u16, ProtocolError> {
    require_len(bytes, off + 2)?;
    Ok(u16::from_be_bytes([bytes[off], bytes[off + 1]]))
}

fn read_u32(bytes: &[u8], off: usize) -> Result<u32, ProtocolError> {
    require_len(bytes, off + 4)?;
    Ok(u32::from_be_bytes([
        bytes[off],
        bytes[off + 1],
        bytes[off + 2],
        bytes[off + 3],
    ]))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn mouse(mask: i32, x: i32, y: i32) -> Result<PointerEvent, ProtocolError> {
        match decode_pointer(PointerKind::Mouse, mask, x, y, None)? {
            InputEvent::Pointer(p) => Ok(p),
            other => panic!("expected pointer event, got {other:?}"),
        }
    }

    // ── Pointer masks ─────────────────────────────────────────────────────────

    #[test]
    fn test_mask_zero_and_eight_both_decode_as_move() {
        assert_eq!(mouse(0, 1, 2).unwrap().action, PointerAction::Move);
        assert_eq!(mouse(8, 1, 2).unwrap().action, PointerAction::Move);
    }

    #[test]
    fn test_button_masks_map_to_actions() {
        assert_eq!(mouse(9, 0, 0).unwrap().action, PointerAction::PrimaryDown);
        assert_eq!(mouse(10, 0, 0).unwrap().action, PointerAction::PrimaryUp);
        assert_eq!(mouse(18, 0, 0).unwrap().action, PointerAction::SecondaryUp);
        assert_eq!(mouse(33, 0, 0).unwrap().action, PointerAction::WheelButtonDown);
        assert_eq!(mouse(34, 0, 0).unwrap().action, PointerAction::WheelButtonUp);
        assert_eq!(mouse(37, 0, 0).unwrap().action, PointerAction::OverlayToggle);
    }

    #[test]
    fn test_scroll_masks_map_to_directions() {
        assert_eq!(mouse(523_331, 0, 0).unwrap().action, PointerAction::ScrollDown);
        assert_eq!(mouse(963, 0, 0).unwrap().action, PointerAction::ScrollUp);
    }

    #[test]
    fn test_negative_coordinates_are_clamped_to_zero() {
        // Arrange / Act
        let event = mouse(0, -50, -1).unwrap();

        // Assert
        assert_eq!((event.x, event.y), (0, 0));
    }

    #[test]
    fn test_unknown_mouse_mask_is_rejected() {
        let err = mouse(77, 0, 0).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::UnknownMask {
                kind: PointerKind::Mouse,
                mask: 77
            }
        );
    }

    #[test]
    fn test_open_url_carries_trimmed_payload() {
        let event = decode_pointer(PointerKind::Mouse, 38, 0, 0, Some("  https://example.org ")).unwrap();
        assert_eq!(
            event,
            InputEvent::Pointer(PointerEvent {
                action: PointerAction::OpenUrl("https://example.org".to_string()),
                x: 0,
                y: 0,
            })
        );
    }

    #[test]
    fn test_open_url_without_payload_is_malformed() {
        let missing = decode_pointer(PointerKind::Mouse, 38, 0, 0, None);
        let blank = decode_pointer(PointerKind::Mouse, 38, 0, 0, Some("   "));
        assert!(matches!(missing, Err(ProtocolError::MalformedPayload(_))));
        assert!(matches!(blank, Err(ProtocolError::MalformedPayload(_))));
    }

    #[test]
    fn test_touch_pan_update_keeps_signed_delta() {
        let event = decode_pointer(PointerKind::Touch, TOUCH_PAN_UPDATE, -3, 7, None).unwrap();
        assert_eq!(
            event,
            InputEvent::Touch(TouchEvent {
                action: TouchAction::PanUpdate,
                x: -3,
                y: 7
            })
        );
    }

    #[test]
    fn test_touch_pan_start_clamps_position() {
        let event = decode_pointer(PointerKind::Touch, TOUCH_PAN_START, -3, 7, None).unwrap();
        assert_eq!(
            event,
            InputEvent::Touch(TouchEvent {
                action: TouchAction::PanStart,
                x: 0,
                y: 7
            })
        );
    }

    #[test]
    fn test_unknown_touch_mask_is_rejected() {
        let result = decode_pointer(PointerKind::Touch, 9, 0, 0, None);
        assert!(matches!(result, Err(ProtocolError::UnknownMask { kind: PointerKind::Touch, .. })));
    }

    // ── Key messages ──────────────────────────────────────────────────────────

    #[test]
    fn test_decode_minimal_key_message() {
        // Arrange: down flag, Translate mode, nothing else
        let bytes = [FLAG_DOWN, KeyboardMode::Translate as u8];

        // Act
        let msg = decode_key_message(&bytes).unwrap();

        // Assert
        assert!(msg.down);
        assert!(!msg.press);
        assert_eq!(msg.mode, KeyboardMode::Translate);
        assert_eq!(msg.chr, None);
        assert_eq!(msg.seq, None);
    }

    #[test]
    fn test_decode_reads_fields_in_declared_order() {
        // Arrange
        let mut bytes = vec![
            FLAG_PRESS | FLAG_HAS_CHR | FLAG_HAS_KEYCODE | FLAG_HAS_SEQ,
            KeyboardMode::Legacy as u8,
        ];
        bytes.extend_from_slice(&0x1F600u32.to_be_bytes());
        bytes.extend_from_slice(&66u32.to_be_bytes());
        bytes.extend_from_slice(&2u16.to_be_bytes());
        bytes.extend_from_slice(b"ok");

        // Act
        let msg = decode_key_message(&bytes).unwrap();

        // Assert
        assert!(msg.press);
        assert_eq!(msg.chr, Some(0x1F600));
        assert_eq!(msg.keycode, Some(AndroidKeyCode::ENTER));
        assert_eq!(msg.seq.as_deref(), Some("ok"));
    }

    #[test]
    fn test_decode_empty_slice_fails() {
        assert_eq!(
            decode_key_message(&[]),
            Err(ProtocolError::InsufficientData { needed: 2, available: 0 })
        );
    }

    #[test]
    fn test_decode_truncated_chr_fails() {
        let bytes = [FLAG_HAS_CHR, 0x00, 0x00, 0x41];
        assert!(matches!(
            decode_key_message(&bytes),
            Err(ProtocolError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_decode_unknown_mode_fails() {
        assert_eq!(decode_key_message(&[0, 9]), Err(ProtocolError::UnknownMode(9)));
    }

    #[test]
    fn test_decode_reserved_bits_fail() {
        assert!(matches!(
            decode_key_message(&[0x80, 0]),
            Err(ProtocolError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_decode_trailing_bytes_fail() {
        assert_eq!(decode_key_message(&[0, 0, 0xFF]), Err(ProtocolError::TrailingBytes(1)));
    }

    #[test]
    fn test_decode_invalid_utf8_sequence_fails() {
        let bytes = [FLAG_HAS_SEQ, 2, 0x00, 0x02, 0xC3, 0x28];
        assert!(matches!(
            decode_key_message(&bytes),
            Err(ProtocolError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_decode_unknown_control_key_fails() {
        let bytes = [FLAG_HAS_CONTROL_KEY, 1, 0xFF, 0xFF];
        assert!(matches!(
            decode_key_message(&bytes),
            Err(ProtocolError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_encode_sets_flags_for_present_fields_only() {
        let mut msg = KeyEventMessage::new(KeyboardMode::Translate);
        msg.down = true;
        msg.control_key = Some(ControlKey::Return);

        let bytes = encode_key_message(&msg);

        assert_eq!(bytes[0], FLAG_DOWN | FLAG_HAS_CONTROL_KEY);
        assert_eq!(bytes.len(), 4);
        assert_eq!(decode_key_message(&bytes).unwrap(), msg);
    }
}
