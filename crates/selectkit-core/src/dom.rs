//! Retained element tree with focus tracking.
//!
//! This is the headless stand-in for a browser document: elements carry a
//! tag, an optional reconciliation key, classes, an optional tab index, text
//! and event handlers. Moving focus produces blur/focus notification pairs in
//! the same order a browser emits them (blur of the old element first).

use crate::error::DomError;
use crate::event::{Event, EventKind, FocusEvent, FocusKind};
use crate::schedule::Scheduler;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Identifier of an element in a [`Dom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl NodeId {
    /// The document node every attached element descends from.
    pub const DOCUMENT: Self = Self(0);
}

/// Event handler attached to an element.
pub type Handler = Rc<dyn Fn(&Event, &mut dyn Scheduler)>;

pub(crate) struct Element {
    pub(crate) tag: String,
    pub(crate) key: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) tab_index: Option<i32>,
    pub(crate) text: Option<String>,
    pub(crate) handlers: Vec<(EventKind, Handler)>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Element {
    pub(crate) fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            key: None,
            classes: Vec::new(),
            tab_index: None,
            text: None,
            handlers: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.tag)
            .field("key", &self.key)
            .field("classes", &self.classes)
            .field("tab_index", &self.tab_index)
            .field("text", &self.text)
            .field("handler_count", &self.handlers.len())
            .field("parent", &self.parent)
            .field("children", &self.children)
            .finish()
    }
}

/// Element tree owned by a host.
#[derive(Debug)]
pub struct Dom {
    nodes: HashMap<NodeId, Element>,
    next_id: u64,
    focused: Option<NodeId>,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    /// Create a tree containing only the document node.
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(NodeId::DOCUMENT, Element::new("#document"));
        Self {
            nodes,
            next_id: 1,
            focused: None,
        }
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        self.insert_element(Element::new(tag))
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if child == NodeId::DOCUMENT {
            return Err(DomError::DocumentNode);
        }
        self.element(parent)?;
        self.element(child)?;
        if self.contains(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        self.unlink(child);
        if let Some(el) = self.nodes.get_mut(&child) {
            el.parent = Some(parent);
        }
        if let Some(el) = self.nodes.get_mut(&parent) {
            el.children.push(child);
        }
        Ok(())
    }

    /// Remove `node` and its whole subtree.
    ///
    /// If the focused element is inside the subtree, focus is cleared
    /// without a blur notification.
    pub fn remove(&mut self, node: NodeId) -> Result<(), DomError> {
        if node == NodeId::DOCUMENT {
            return Err(DomError::DocumentNode);
        }
        self.element(node)?;
        self.unlink(node);
        self.discard(node);
        Ok(())
    }

    /// Check if a node exists.
    #[must_use]
    pub fn exists(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Number of nodes, including the document node.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if only the document node exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|el| el.parent)
    }

    /// Get the children of a node (empty for unknown nodes).
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(&node)
            .map_or(&[][..], |el| el.children.as_slice())
    }

    /// Get the tag name of a node.
    #[must_use]
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(&node).map(|el| el.tag.as_str())
    }

    /// Get the reconciliation key of a node.
    #[must_use]
    pub fn key(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(&node).and_then(|el| el.key.as_deref())
    }

    /// Get the classes of a node.
    #[must_use]
    pub fn classes(&self, node: NodeId) -> &[String] {
        self.nodes
            .get(&node)
            .map_or(&[][..], |el| el.classes.as_slice())
    }

    /// Check if a node carries a class.
    #[must_use]
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.classes(node).iter().any(|c| c == class)
    }

    /// Get the tab index of a node.
    #[must_use]
    pub fn tab_index(&self, node: NodeId) -> Option<i32> {
        self.nodes.get(&node).and_then(|el| el.tab_index)
    }

    /// Get the node's own text.
    #[must_use]
    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(&node).and_then(|el| el.text.as_deref())
    }

    /// Concatenated text of the node and all its descendants, in order.
    #[must_use]
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        if let Some(el) = self.nodes.get(&node) {
            if let Some(text) = &el.text {
                out.push_str(text);
            }
            for &child in &el.children {
                self.collect_text(child, out);
            }
        }
    }

    /// Handlers registered on `node` for an event kind.
    #[must_use]
    pub fn handlers(&self, node: NodeId, kind: EventKind) -> Vec<Handler> {
        self.nodes.get(&node).map_or_else(Vec::new, |el| {
            el.handlers
                .iter()
                .filter(|(k, _)| *k == kind)
                .map(|(_, h)| Rc::clone(h))
                .collect()
        })
    }

    /// Check if `node` is `ancestor` or one of its descendants.
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return self.exists(id);
            }
            current = self.parent(id);
        }
        false
    }

    /// Check if a node is connected to the document.
    #[must_use]
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.exists(node) && self.contains(NodeId::DOCUMENT, node)
    }

    /// Node followed by its ancestors.
    pub fn path(&self, node: NodeId) -> Result<Vec<NodeId>, DomError> {
        self.element(node)?;
        let mut path = vec![node];
        let mut current = self.parent(node);
        while let Some(id) = current {
            path.push(id);
            current = self.parent(id);
        }
        Ok(path)
    }

    /// Depth-first search for a keyed element within `root` (inclusive).
    #[must_use]
    pub fn find_by_key(&self, root: NodeId, key: &str) -> Option<NodeId> {
        if self.key(root) == Some(key) {
            return Some(root);
        }
        self.children(root)
            .iter()
            .find_map(|&child| self.find_by_key(child, key))
    }

    /// Nearest focusable node among `node` and its ancestors.
    #[must_use]
    pub fn focusable_ancestor(&self, node: NodeId) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(id) = current {
            if self.tab_index(id).is_some() {
                return Some(id);
            }
            current = self.parent(id);
        }
        None
    }

    // === Focus ===

    /// Currently focused element.
    #[must_use]
    pub const fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Move focus to `node`.
    ///
    /// Returns the notifications to deliver: a blur for the previously
    /// focused element (if any) followed by a focus for `node`. Focusing the
    /// already focused element produces nothing.
    pub fn focus(&mut self, node: NodeId) -> Result<Vec<FocusEvent>, DomError> {
        self.element(node)?;
        if !self.is_attached(node) {
            return Err(DomError::Detached(node));
        }
        if self.tab_index(node).is_none() {
            return Err(DomError::NotFocusable(node));
        }
        if self.focused == Some(node) {
            return Ok(Vec::new());
        }

        let mut events = self.blur();
        self.focused = Some(node);
        events.push(FocusEvent::new(FocusKind::Focus, node, self.path(node)?));
        Ok(events)
    }

    /// Clear focus, returning the blur notification if something was focused.
    pub fn blur(&mut self) -> Vec<FocusEvent> {
        let Some(old) = self.focused.take() else {
            return Vec::new();
        };
        match self.path(old) {
            Ok(path) => vec![FocusEvent::new(FocusKind::Blur, old, path)],
            Err(_) => Vec::new(),
        }
    }

    // === Internal ===

    fn element(&self, node: NodeId) -> Result<&Element, DomError> {
        self.nodes.get(&node).ok_or(DomError::UnknownNode(node))
    }

    pub(crate) fn element_mut(&mut self, node: NodeId) -> Result<&mut Element, DomError> {
        self.nodes.get_mut(&node).ok_or(DomError::UnknownNode(node))
    }

    pub(crate) fn insert_element(&mut self, element: Element) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, element);
        id
    }

    pub(crate) fn set_children(&mut self, parent: NodeId, children: Vec<NodeId>) {
        for &child in &children {
            if let Some(el) = self.nodes.get_mut(&child) {
                el.parent = Some(parent);
            }
        }
        if let Some(el) = self.nodes.get_mut(&parent) {
            el.children = children;
        }
    }

    fn unlink(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get_mut(&node).and_then(|el| el.parent.take()) else {
            return;
        };
        if let Some(el) = self.nodes.get_mut(&parent) {
            el.children.retain(|&c| c != node);
        }
    }

    /// Drop a subtree that is already unlinked from its parent.
    pub(crate) fn discard(&mut self, node: NodeId) {
        if let Some(el) = self.nodes.remove(&node) {
            if self.focused == Some(node) {
                self.focused = None;
            }
            for child in el.children {
                self.discard(child);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn focusable(dom: &mut Dom, tag: &str) -> NodeId {
        let id = dom.create_element(tag);
        dom.element_mut(id).unwrap().tab_index = Some(0);
        id
    }

    // =========================================================================
    // Tree Tests
    // =========================================================================

    #[test]
    fn test_new_dom_has_document() {
        let dom = Dom::new();
        assert!(dom.exists(NodeId::DOCUMENT));
        assert!(dom.is_empty());
        assert_eq!(dom.tag(NodeId::DOCUMENT), Some("#document"));
    }

    #[test]
    fn test_append_and_contains() {
        let mut dom = Dom::new();
        let a = dom.create_element("div");
        let b = dom.create_element("div");
        dom.append_child(NodeId::DOCUMENT, a).unwrap();
        dom.append_child(a, b).unwrap();

        assert!(dom.contains(a, b));
        assert!(dom.contains(a, a));
        assert!(!dom.contains(b, a));
        assert!(dom.is_attached(b));
        assert_eq!(dom.path(b).unwrap(), vec![b, a, NodeId::DOCUMENT]);
    }

    #[test]
    fn test_append_rejects_cycles() {
        let mut dom = Dom::new();
        let a = dom.create_element("div");
        let b = dom.create_element("div");
        dom.append_child(a, b).unwrap();
        assert_eq!(
            dom.append_child(b, a),
            Err(DomError::HierarchyRequest {
                parent: b,
                child: a
            })
        );
        assert_eq!(
            dom.append_child(a, NodeId::DOCUMENT),
            Err(DomError::DocumentNode)
        );
    }

    #[test]
    fn test_append_moves_node() {
        let mut dom = Dom::new();
        let a = dom.create_element("div");
        let b = dom.create_element("div");
        let c = dom.create_element("span");
        dom.append_child(a, c).unwrap();
        dom.append_child(b, c).unwrap();
        assert!(dom.children(a).is_empty());
        assert_eq!(dom.children(b), &[c]);
        assert_eq!(dom.parent(c), Some(b));
    }

    #[test]
    fn test_remove_subtree() {
        let mut dom = Dom::new();
        let a = dom.create_element("div");
        let b = dom.create_element("div");
        dom.append_child(NodeId::DOCUMENT, a).unwrap();
        dom.append_child(a, b).unwrap();
        dom.remove(a).unwrap();
        assert!(!dom.exists(a));
        assert!(!dom.exists(b));
        assert!(dom.children(NodeId::DOCUMENT).is_empty());
        assert_eq!(dom.remove(a), Err(DomError::UnknownNode(a)));
    }

    #[test]
    fn test_text_content_and_find_by_key() {
        let mut dom = Dom::new();
        let a = dom.create_element("div");
        let b = dom.create_element("span");
        dom.element_mut(a).unwrap().text = Some("Hello ".to_string());
        dom.element_mut(b).unwrap().text = Some("World".to_string());
        dom.element_mut(b).unwrap().key = Some("greeting".to_string());
        dom.append_child(a, b).unwrap();

        assert_eq!(dom.text_content(a), "Hello World");
        assert_eq!(dom.find_by_key(a, "greeting"), Some(b));
        assert_eq!(dom.find_by_key(a, "missing"), None);
    }

    // =========================================================================
    // Focus Tests
    // =========================================================================

    #[test]
    fn test_focus_emits_blur_then_focus() {
        let mut dom = Dom::new();
        let a = focusable(&mut dom, "div");
        let b = focusable(&mut dom, "div");
        dom.append_child(NodeId::DOCUMENT, a).unwrap();
        dom.append_child(NodeId::DOCUMENT, b).unwrap();

        let first = dom.focus(a).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].kind, FocusKind::Focus);

        let events = dom.focus(b).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, FocusKind::Blur);
        assert_eq!(events[0].target, a);
        assert_eq!(events[1].kind, FocusKind::Focus);
        assert_eq!(events[1].target, b);
        assert_eq!(dom.focused(), Some(b));
    }

    #[test]
    fn test_focus_same_node_is_silent() {
        let mut dom = Dom::new();
        let a = focusable(&mut dom, "div");
        dom.append_child(NodeId::DOCUMENT, a).unwrap();
        dom.focus(a).unwrap();
        assert!(dom.focus(a).unwrap().is_empty());
    }

    #[test]
    fn test_focus_rejects_unfocusable_and_detached() {
        let mut dom = Dom::new();
        let plain = dom.create_element("div");
        dom.append_child(NodeId::DOCUMENT, plain).unwrap();
        assert_eq!(dom.focus(plain), Err(DomError::NotFocusable(plain)));

        let detached = focusable(&mut dom, "div");
        assert_eq!(dom.focus(detached), Err(DomError::Detached(detached)));
        assert_eq!(dom.focus(NodeId(99)), Err(DomError::UnknownNode(NodeId(99))));
    }

    #[test]
    fn test_blur_clears_focus() {
        let mut dom = Dom::new();
        let a = focusable(&mut dom, "div");
        dom.append_child(NodeId::DOCUMENT, a).unwrap();
        dom.focus(a).unwrap();
        let events = dom.blur();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, FocusKind::Blur);
        assert_eq!(dom.focused(), None);
        assert!(dom.blur().is_empty());
    }

    #[test]
    fn test_removing_focused_node_clears_focus() {
        let mut dom = Dom::new();
        let a = dom.create_element("div");
        let b = focusable(&mut dom, "div");
        dom.append_child(NodeId::DOCUMENT, a).unwrap();
        dom.append_child(a, b).unwrap();
        dom.focus(b).unwrap();
        dom.remove(a).unwrap();
        assert_eq!(dom.focused(), None);
    }

    #[test]
    fn test_focusable_ancestor() {
        let mut dom = Dom::new();
        let a = focusable(&mut dom, "div");
        let b = dom.create_element("span");
        dom.append_child(a, b).unwrap();
        assert_eq!(dom.focusable_ancestor(b), Some(a));
        assert_eq!(dom.focusable_ancestor(NodeId::DOCUMENT), None);
    }
}
