//! Offscreen scratch editor: computes what a key does to a piece of text.
//!
//! [`OffscreenEditor`] keeps the buffer as a `Vec<char>` so every offset is a
//! character index, matching the selection offsets reported by UI nodes.
//!
//! # Supported keys (for beginners)
//!
//! | Key                          | Effect                                         |
//! |------------------------------|------------------------------------------------|
//! | letters, digits, punctuation | replace the selection with the character       |
//! | `SPACE`, `TAB`, `ENTER`      | insert `' '`, `'\t'`, `'\n'`                   |
//! | `DEL`                        | delete the selection, or the char before it    |
//! | `FORWARD_DEL`                | delete the selection, or the char after it     |
//! | `DPAD_LEFT` / `DPAD_RIGHT`   | collapse the selection, or move one char       |
//! | `DPAD_UP` / `DPAD_DOWN`      | move one line, keeping the column              |
//! | `MOVE_HOME` / `MOVE_END`     | start / end of the current line                |
//!
//! Anything else (modifiers, function keys) leaves the buffer unchanged.
//! Key-up halves never edit.

use touchbridge_core::{AndroidKeyCode, KeyAction};

use crate::application::host::Rect;
use crate::application::text_injector::{EditState, ScratchEditor, ScratchError};

/// In-memory [`ScratchEditor`].
#[derive(Debug, Default)]
pub struct OffscreenEditor {
    text: Vec<char>,
    selection: Option<(usize, usize)>,
    bounds: Option<Rect>,
}

impl OffscreenEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cursor range to edit. With no selection the cursor sits at the end.
    fn range(&self) -> (usize, usize) {
        let len = self.text.len();
        match self.selection {
            Some((a, b)) => (a.min(b).min(len), a.max(b).min(len)),
            None => (len, len),
        }
    }

    fn replace(&mut self, start: usize, end: usize, with: &[char]) {
        self.text.splice(start..end, with.iter().copied());
        let cursor = start + with.len();
        self.selection = Some((cursor, cursor));
    }

    fn collapse(&mut self, at: usize) {
        self.selection = Some((at, at));
    }

    fn line_start(&self, at: usize) -> usize {
        self.text[..at]
            .iter()
            .rposition(|&c| c == '\n')
            .map_or(0, |i| i + 1)
    }

    fn line_end(&self, at: usize) -> usize {
        self.text[at..]
            .iter()
            .position(|&c| c == '\n')
            .map_or(self.text.len(), |i| at + i)
    }

    fn vertical(&self, at: usize, down: bool) -> usize {
        let start = self.line_start(at);
        let column = at - start;
        if down {
            let end = self.line_end(at);
            if end == self.text.len() {
                return self.text.len();
            }
            let next_start = end + 1;
            let next_end = self.line_end(next_start);
            (next_start + column).min(next_end)
        } else {
            if start == 0 {
                return 0;
            }
            let prev_start = self.line_start(start - 1);
            (prev_start + column).min(start - 1)
        }
    }
}

impl ScratchEditor for OffscreenEditor {
    fn load(&mut self, text: &str, selection: Option<(usize, usize)>) {
        self.text = text.chars().collect();
        let len = self.text.len();
        // Anchor and focus may arrive in either order.
        self.selection = selection.map(|(s, e)| (s.min(e).min(len), s.max(e).min(len)));
        self.bounds = None;
    }

    fn layout(&mut self, bounds: Rect) {
        self.bounds = Some(bounds);
    }

    fn insert(&mut self, at: usize, text: &str) {
        let at = at.min(self.text.len());
        let inserted: Vec<char> = text.chars().collect();
        let n = inserted.len();
        self.text.splice(at..at, inserted);
        self.selection = self.selection.map(|(s, e)| {
            let shift = |p: usize| if p >= at { p + n } else { p };
            (shift(s), shift(e))
        });
    }

    fn apply_key(&mut self, code: AndroidKeyCode, action: KeyAction) -> Result<EditState, ScratchError> {
        if self.bounds.is_none() {
            return Err(ScratchError::NotLaidOut);
        }
        if action == KeyAction::Up {
            return Ok(self.state());
        }

        let (start, end) = self.range();
        let len = self.text.len();
        match code {
            AndroidKeyCode::DEL => {
                if start != end {
                    self.replace(start, end, &[]);
                } else if start > 0 {
                    self.replace(start - 1, start, &[]);
                } else {
                    self.collapse(0);
                }
            }
            AndroidKeyCode::FORWARD_DEL => {
                if start != end {
                    self.replace(start, end, &[]);
                } else if end < len {
                    self.replace(end, end + 1, &[]);
                } else {
                    self.collapse(end);
                }
            }
            AndroidKeyCode::DPAD_LEFT => {
                let at = if start != end { start } else { start.saturating_sub(1) };
                self.collapse(at);
            }
            AndroidKeyCode::DPAD_RIGHT => {
                let at = if start != end { end } else { (end + 1).min(len) };
                self.collapse(at);
            }
            AndroidKeyCode::DPAD_UP => self.collapse(self.vertical(start, false)),
            AndroidKeyCode::DPAD_DOWN => self.collapse(self.vertical(end, true)),
            AndroidKeyCode::MOVE_HOME => self.collapse(self.line_start(start)),
            AndroidKeyCode::MOVE_END => self.collapse(self.line_end(end)),
            other => {
                if let Some(ch) = typed_char(other) {
                    self.replace(start, end, &[ch]);
                }
            }
        }
        Ok(self.state())
    }

    fn state(&self) -> EditState {
        EditState {
            text: self.text.iter().collect(),
            selection: self.selection,
        }
    }
}

/// The character an unshifted key types, if any.
fn typed_char(code: AndroidKeyCode) -> Option<char> {
    let AndroidKeyCode(raw) = code;
    if (AndroidKeyCode::A.0..=AndroidKeyCode::Z.0).contains(&raw) {
        return char::from_u32('a' as u32 + (raw - AndroidKeyCode::A.0));
    }
    if (AndroidKeyCode::DIGIT_0.0..=AndroidKeyCode::DIGIT_9.0).contains(&raw) {
        return char::from_u32('0' as u32 + (raw - AndroidKeyCode::DIGIT_0.0));
    }
    if (AndroidKeyCode::NUMPAD_0.0..=AndroidKeyCode::NUMPAD_9.0).contains(&raw) {
        return char::from_u32('0' as u32 + (raw - AndroidKeyCode::NUMPAD_0.0));
    }
    let ch = match code {
        AndroidKeyCode::SPACE => ' ',
        AndroidKeyCode::TAB => '\t',
        AndroidKeyCode::ENTER | AndroidKeyCode::NUMPAD_ENTER => '\n',
        AndroidKeyCode::COMMA => ',',
        AndroidKeyCode::PERIOD | AndroidKeyCode::NUMPAD_DOT => '.',
        AndroidKeyCode::GRAVE => '`',
        AndroidKeyCode::MINUS | AndroidKeyCode::NUMPAD_SUBTRACT => '-',
        AndroidKeyCode::EQUALS | AndroidKeyCode::NUMPAD_EQUALS => '=',
        AndroidKeyCode::LEFT_BRACKET => '[',
        AndroidKeyCode::RIGHT_BRACKET => ']',
        AndroidKeyCode::BACKSLASH => '\\',
        AndroidKeyCode::SEMICOLON => ';',
        AndroidKeyCode::APOSTROPHE => '\'',
        AndroidKeyCode::SLASH | AndroidKeyCode::NUMPAD_DIVIDE => '/',
        AndroidKeyCode::AT => '@',
        AndroidKeyCode::PLUS | AndroidKeyCode::NUMPAD_ADD => '+',
        AndroidKeyCode::STAR | AndroidKeyCode::NUMPAD_MULTIPLY => '*',
        AndroidKeyCode::POUND => '#',
        _ => return None,
    };
    Some(ch)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
