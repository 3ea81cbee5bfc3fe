//! Synthetic UI tree for tests and session replay.
//!
//! # How to build a tree (for beginners)
//!
//! ```text
//! let field = SyntheticNode::new(2).editable().text("hello").selection(5, 5).build();
//! let form  = SyntheticNode::new(1).child(Arc::clone(&field)).build();
//! let tree  = SyntheticTree::new().input_focus(field).root(form);
//! ```
//!
//! Nodes are shared as `Arc<SyntheticNode>`. Each node keeps its mutable
//! state (text, selection) behind a `Mutex` and records every "set text" and
//! "set selection" call, so a test can check both the final text and the
//! exact sequence of edits the injector performed.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::application::host::{AccessibilityTree, NodeId, Rect, UiNode};

/// Default node bounds: a single-line field near the top of a phone screen.
const DEFAULT_BOUNDS: Rect = Rect {
    left: 0,
    top: 100,
    right: 720,
    bottom: 160,
};

#[derive(Debug, Clone)]
struct NodeState {
    text: Option<String>,
    hint_showing: bool,
    selection: (i32, i32),
    set_text_calls: Vec<String>,
    selection_calls: Vec<(i32, i32)>,
}

/// An in-memory UI element.
#[derive(Debug)]
pub struct SyntheticNode {
    id: NodeId,
    editable: bool,
    focusable: bool,
    rejects_text: bool,
    detached: bool,
    bounds: Rect,
    children: Vec<Arc<SyntheticNode>>,
    state: Mutex<NodeState>,
}

/// Builder for [`SyntheticNode`].
#[derive(Debug)]
pub struct SyntheticNodeBuilder {
    node: SyntheticNode,
}

impl SyntheticNode {
    /// Starts a node with no text, no selection, not editable.
    #[allow(clippy::new_ret_no_self)]
    pub fn new(id: u64) -> SyntheticNodeBuilder {
        SyntheticNodeBuilder {
            node: SyntheticNode {
                id: NodeId(id),
                editable: false,
                focusable: false,
                rejects_text: false,
                detached: false,
                bounds: DEFAULT_BOUNDS,
                children: Vec::new(),
                state: Mutex::new(NodeState {
                    text: None,
                    hint_showing: false,
                    selection: (-1, -1),
                    set_text_calls: Vec::new(),
                    selection_calls: Vec::new(),
                }),
            },
        }
    }

    pub fn current_text(&self) -> Option<String> {
        guard(&self.state).text.clone()
    }

    pub fn current_selection(&self) -> (i32, i32) {
        guard(&self.state).selection
    }

    /// Every text passed to "set text", accepted or not.
    pub fn set_text_calls(&self) -> Vec<String> {
        guard(&self.state).set_text_calls.clone()
    }

    pub fn selection_calls(&self) -> Vec<(i32, i32)> {
        guard(&self.state).selection_calls.clone()
    }
}

impl SyntheticNodeBuilder {
    /// Makes the node an editable, focusable text field.
    pub fn editable(mut self) -> Self {
        self.node.editable = true;
        self.node.focusable = true;
        self
    }

    /// Editable but not focusable. Such a node is only ever a fallback target.
    pub fn editable_unfocusable(mut self) -> Self {
        self.node.editable = true;
        self.node.focusable = false;
        self
    }

    pub fn text(self, text: &str) -> Self {
        guard(&self.node.state).text = Some(text.to_string());
        self
    }

    /// Marks the current text as placeholder hint.
    pub fn hint_showing(self) -> Self {
        guard(&self.node.state).hint_showing = true;
        self
    }

    pub fn selection(self, start: i32, end: i32) -> Self {
        guard(&self.node.state).selection = (start, end);
        self
    }

    pub fn bounds(mut self, bounds: Rect) -> Self {
        self.node.bounds = bounds;
        self
    }

    /// Every "set text" is recorded and refused.
    pub fn rejecting_text(mut self) -> Self {
        self.node.rejects_text = true;
        self
    }

    /// The node is gone from the host: `refresh` fails.
    pub fn detached(mut self) -> Self {
        self.node.detached = true;
        self
    }

    pub fn child(mut self, child: Arc<SyntheticNode>) -> Self {
        self.node.children.push(child);
        self
    }

    pub fn build(self) -> Arc<SyntheticNode> {
        Arc::new(self.node)
    }
}

impl UiNode for SyntheticNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn refresh(&self) -> bool {
        !self.detached
    }

    fn text(&self) -> Option<String> {
        guard(&self.state).text.clone()
    }

    fn is_showing_hint(&self) -> bool {
        guard(&self.state).hint_showing
    }

    fn selection(&self) -> (i32, i32) {
        guard(&self.state).selection
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn is_editable(&self) -> bool {
        self.editable
    }

    fn is_focusable(&self) -> bool {
        self.focusable
    }

    fn children(&self) -> Vec<Arc<dyn UiNode>> {
        self.children
            .iter()
            .map(|c| Arc::clone(c) as Arc<dyn UiNode>)
            .collect()
    }

    fn set_text(&self, text: &str) -> bool {
        let mut state = guard(&self.state);
        state.set_text_calls.push(text.to_string());
        if self.rejects_text || self.detached {
            return false;
        }
        state.text = Some(text.to_string());
        state.hint_showing = false;
        true
    }

    fn set_selection(&self, start: i32, end: i32) -> bool {
        let mut state = guard(&self.state);
        state.selection_calls.push((start, end));
        if self.detached {
            return false;
        }
        state.selection = (start, end);
        true
    }
}

/// An in-memory accessibility tree.
#[derive(Debug, Default)]
pub struct SyntheticTree {
    input_focus: Option<Arc<SyntheticNode>>,
    accessibility_focus: Option<Arc<SyntheticNode>>,
    root: Option<Arc<SyntheticNode>>,
}

impl SyntheticTree {
    /// An empty tree: no focus, no window.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_focus(mut self, node: Arc<SyntheticNode>) -> Self {
        self.input_focus = Some(node);
        self
    }

    pub fn accessibility_focus(mut self, node: Arc<SyntheticNode>) -> Self {
        self.accessibility_focus = Some(node);
        self
    }

    pub fn root(mut self, node: Arc<SyntheticNode>) -> Self {
        self.root = Some(node);
        self
    }
}

impl AccessibilityTree for SyntheticTree {
    fn input_focus(&self) -> Option<Arc<dyn UiNode>> {
        self.input_focus.clone().map(|n| n as Arc<dyn UiNode>)
    }

    fn accessibility_focus(&self) -> Option<Arc<dyn UiNode>> {
        self.accessibility_focus.clone().map(|n| n as Arc<dyn UiNode>)
    }

    fn active_window_root(&self) -> Option<Arc<dyn UiNode>> {
        self.root.clone().map(|n| n as Arc<dyn UiNode>)
    }
}

fn guard<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
