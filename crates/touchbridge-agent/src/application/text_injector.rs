//! Accessibility text injector: typing into a field with no input connection.
//!
//! When the host offers no direct input connection, the only way to change a
//! text field is the accessibility "set text" / "set selection" actions. Those
//! replace the whole text, so the injector has to work out what the text
//! *would* become if the key were typed, then push that result.
//!
//! # How one key is injected (for beginners)
//!
//! ```text
//! 1. find candidates      input focus, a11y focus, their editable
//!                         descendants, window root, fallbacks
//! 2. for each candidate:
//!      read text + selection ──► load into scratch editor
//!      apply key / insert text in the scratch editor
//!      push the scratch text (and selection) back to the node
//!      host accepted "set text"?  yes ─► done
//!                                 no  ─► next candidate
//! ```
//!
//! The scratch editor ([`ScratchEditor`]) is a hidden editor used purely as an
//! oracle for "what does this key do to this text". It is overwritten before
//! and ignored after every computation.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, trace};
use touchbridge_core::{AndroidKeyCode, KeyAction};

use crate::application::host::{AccessibilityTree, NodeId, Rect, UiNode};

/// Error type for text injection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InjectError {
    /// Nothing in the UI tree could receive text.
    #[error("no candidate text target found")]
    NoCandidate,

    /// Every candidate refused the "set text" action.
    #[error("all {tried} candidate text targets rejected the edit")]
    AllRejected { tried: usize },
}

/// Error type for scratch editor misuse.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScratchError {
    /// A key was applied before the buffer was laid out.
    #[error("scratch editor must be laid out before applying keys")]
    NotLaidOut,
}

/// Text and selection of the scratch editor. Offsets count characters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditState {
    pub text: String,
    pub selection: Option<(usize, usize)>,
}

/// An offscreen editor that computes the effect of edits.
pub trait ScratchEditor: Send {
    /// Replaces the buffer. Loading discards any previous layout.
    fn load(&mut self, text: &str, selection: Option<(usize, usize)>);
    /// Lays the buffer out at `bounds`; required before [`apply_key`](Self::apply_key).
    fn layout(&mut self, bounds: Rect);
    /// Inserts `text` at character offset `at`. Selection endpoints at or
    /// after `at` shift right by the inserted length.
    fn insert(&mut self, at: usize, text: &str);
    /// Applies one key half to the buffer and returns the result.
    fn apply_key(&mut self, code: AndroidKeyCode, action: KeyAction) -> Result<EditState, ScratchError>;
    fn state(&self) -> EditState;
}

/// What to inject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectRequest {
    /// Commit literal text. Never repeated, even for a press.
    Text(String),
    /// Apply a key. With `press`, a release follows a successful down.
    Key {
        code: AndroidKeyCode,
        action: KeyAction,
        press: bool,
    },
}

enum Edit<'a> {
    Commit(&'a str),
    Key(AndroidKeyCode, KeyAction),
}

/// Resolves text targets in the accessibility tree and edits them.
pub struct AccessibilityTextInjector {
    tree: Arc<dyn AccessibilityTree>,
    scratch: Box<dyn ScratchEditor>,
}

impl AccessibilityTextInjector {
    pub fn new(tree: Arc<dyn AccessibilityTree>, scratch: Box<dyn ScratchEditor>) -> Self {
        Self { tree, scratch }
    }

    /// Collects candidate targets in priority order, deduplicated by identity.
    ///
    /// 1. input focus, if editable and focusable (else kept as a fallback)
    /// 2. accessibility focus, same rule
    /// 3. first editable descendant of the input focus
    /// 4. first editable descendant of the accessibility focus
    /// 5. active window root
    /// 6. the fallbacks from 1 and 2
    pub fn candidates(&self) -> Vec<Arc<dyn UiNode>> {
        let input = self.tree.input_focus();
        let a11y = self.tree.accessibility_focus();

        let mut list = CandidateList::default();
        let mut fallbacks = CandidateList::default();
        for node in [&input, &a11y].into_iter().flatten() {
            if is_text_target(node.as_ref()) {
                list.push(Arc::clone(node));
            } else {
                fallbacks.push(Arc::clone(node));
            }
        }
        for node in [&input, &a11y].into_iter().flatten() {
            if let Some(found) = find_text_target(node) {
                list.push(found);
            }
        }
        if let Some(root) = self.tree.active_window_root() {
            list.push(root);
        }
        for node in fallbacks.nodes {
            list.push(node);
        }
        list.nodes
    }

    /// Injects `request` into the first candidate that accepts it.
    ///
    /// Returns the identity of the node that took the edit.
    ///
    /// # Errors
    ///
    /// [`InjectError::NoCandidate`] when the tree offers nothing,
    /// [`InjectError::AllRejected`] when every candidate refused.
    pub fn inject(&mut self, request: &InjectRequest) -> Result<NodeId, InjectError> {
        let candidates = self.candidates();
        if candidates.is_empty() {
            return Err(InjectError::NoCandidate);
        }
        let (first, release) = match request {
            InjectRequest::Text(text) => (Edit::Commit(text), None),
            InjectRequest::Key { code, action, press } => {
                let release = (*press && *action == KeyAction::Down).then_some(Edit::Key(*code, KeyAction::Up));
                (Edit::Key(*code, *action), release)
            }
        };
        for node in &candidates {
            if !self.try_edit(node.as_ref(), &first) {
                continue;
            }
            if let Some(release) = &release {
                if !self.try_edit(node.as_ref(), release) {
                    debug!(node = ?node.id(), "synthetic release rejected");
                }
            }
            return Ok(node.id());
        }
        Err(InjectError::AllRejected {
            tried: candidates.len(),
        })
    }

    /// Applies one edit to one node. `true` when the host accepted the text.
    fn try_edit(&mut self, node: &dyn UiNode, edit: &Edit<'_>) -> bool {
        if !node.refresh() {
            trace!(node = ?node.id(), "candidate vanished");
            return false;
        }
        let existing = node.text().unwrap_or_default();

        match *edit {
            Edit::Commit(new_text) => {
                let selection = clamp_selection(node.selection(), existing.chars().count());
                match selection {
                    None => {
                        self.scratch.load(new_text, None);
                        push_text(node, &self.scratch.state())
                    }
                    Some((start, end)) => {
                        self.scratch.load(&existing, Some((start, end)));
                        self.scratch.insert(start, new_text);
                        push_text_and_selection(node, &self.scratch.state())
                    }
                }
            }
            Edit::Key(code, action) => {
                let base = if node.is_showing_hint() { "" } else { existing.as_str() };
                let selection = clamp_selection(node.selection(), base.chars().count());
                self.scratch.load(base, selection);
                self.scratch.layout(node.bounds());
                match self.scratch.apply_key(code, action) {
                    Ok(state) => push_text_and_selection(node, &state),
                    Err(e) => {
                        debug!(node = ?node.id(), "scratch editor refused key: {e}");
                        false
                    }
                }
            }
        }
    }
}

#[derive(Default)]
struct CandidateList {
    nodes: Vec<Arc<dyn UiNode>>,
    seen: HashSet<NodeId>,
}

impl CandidateList {
    fn push(&mut self, node: Arc<dyn UiNode>) {
        if self.seen.insert(node.id()) {
            self.nodes.push(node);
        }
    }
}

fn is_text_target(node: &dyn UiNode) -> bool {
    node.is_editable() && node.is_focusable()
}

/// First text target at or below `node`: the node itself, then its direct
/// children in order, then each child's subtree in order.
fn find_text_target(node: &Arc<dyn UiNode>) -> Option<Arc<dyn UiNode>> {
    if is_text_target(node.as_ref()) {
        return Some(Arc::clone(node));
    }
    let children = node.children();
    if let Some(child) = children.iter().find(|c| is_text_target(c.as_ref())) {
        return Some(Arc::clone(child));
    }
    children.iter().find_map(find_text_target)
}

/// Turns raw node bounds into a usable selection.
///
/// A negative bound means "no selection". Otherwise both bounds are clamped
/// into `[0, len]` and `start` is pulled down to `end` if it overshoots.
fn clamp_selection((start, end): (i32, i32), len: usize) -> Option<(usize, usize)> {
    if start < 0 || end < 0 {
        return None;
    }
    let end = (end as usize).min(len);
    let start = (start as usize).min(len).min(end);
    Some((start, end))
}

fn push_text(node: &dyn UiNode, state: &EditState) -> bool {
    node.set_text(&state.text)
}

fn push_text_and_selection(node: &dyn UiNode, state: &EditState) -> bool {
    if !push_text(node, state) {
        return false;
    }
    if let Some((start, end)) = state.selection {
        if !node.set_selection(start as i32, end as i32) {
            debug!(node = ?node.id(), start, end, "selection update rejected");
        }
    }
    true
}

// ── Tests ─────────────────────────────────────────────────────────────────────
