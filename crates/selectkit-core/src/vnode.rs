//! Declarative view description and keyed patching.
//!
//! Components describe their view as a [`VNode`] tree on every render. The
//! host patches that description into the [`Dom`], reusing existing elements
//! where the tag and key match so that focused elements keep their identity
//! across redraws.

use crate::dom::{Dom, Element, Handler, NodeId};
use crate::error::DomError;
use crate::event::{Event, EventKind};
use crate::schedule::Scheduler;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

/// Tag used for bare text nodes.
pub const TEXT_TAG: &str = "#text";

/// Description of one element and its subtree.
#[derive(Clone, Default)]
pub struct VNode {
    tag: String,
    key: Option<String>,
    classes: Vec<String>,
    tab_index: Option<i32>,
    text: Option<String>,
    children: Vec<VNode>,
    handlers: Vec<(EventKind, Handler)>,
}

impl VNode {
    /// Create an element description.
    #[must_use]
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Create a bare text node.
    #[must_use]
    pub fn text_node(text: impl Into<String>) -> Self {
        Self {
            tag: TEXT_TAG.to_string(),
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Set the reconciliation key.
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Add a class.
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !class.is_empty() && !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    /// Add a class when `condition` holds.
    #[must_use]
    pub fn class_if(self, condition: bool, class: impl Into<String>) -> Self {
        if condition {
            self.class(class)
        } else {
            self
        }
    }

    /// Add every whitespace-separated class in `classes`.
    #[must_use]
    pub fn class_list(self, classes: &str) -> Self {
        classes.split_whitespace().fold(self, Self::class)
    }

    /// Make the element focusable.
    #[must_use]
    pub const fn tab_index(mut self, index: i32) -> Self {
        self.tab_index = Some(index);
        self
    }

    /// Set the element's own text.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Append a child.
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children.
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }

    /// Register a handler for an event kind.
    #[must_use]
    pub fn on(mut self, kind: EventKind, handler: Handler) -> Self {
        self.handlers.push((kind, handler));
        self
    }

    /// Register a click handler.
    #[must_use]
    pub fn on_click(self, handler: impl Fn(&mut dyn Scheduler) + 'static) -> Self {
        self.on(
            EventKind::Click,
            Rc::new(move |_: &Event, scheduler: &mut dyn Scheduler| handler(scheduler)),
        )
    }

    /// Get the tag.
    #[must_use]
    pub fn get_tag(&self) -> &str {
        &self.tag
    }

    /// Get the key.
    #[must_use]
    pub fn get_key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Get the classes.
    #[must_use]
    pub fn get_classes(&self) -> &[String] {
        &self.classes
    }

    /// Get the own text.
    #[must_use]
    pub fn get_text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Get the children.
    #[must_use]
    pub fn get_children(&self) -> &[Self] {
        &self.children
    }

    /// Number of nodes in this subtree, including itself.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    fn to_element(&self) -> Element {
        let mut element = Element::new(self.tag.clone());
        self.apply_to(&mut element);
        element
    }

    fn apply_to(&self, element: &mut Element) {
        element.key.clone_from(&self.key);
        element.classes.clone_from(&self.classes);
        element.tab_index = self.tab_index;
        element.text.clone_from(&self.text);
        element.handlers.clone_from(&self.handlers);
    }
}

impl fmt::Debug for VNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VNode")
            .field("tag", &self.tag)
            .field("key", &self.key)
            .field("classes", &self.classes)
            .field("tab_index", &self.tab_index)
            .field("text", &self.text)
            .field("handler_count", &self.handlers.len())
            .field("children", &self.children)
            .finish()
    }
}

impl Dom {
    /// Build `vnode` and append it under `parent`.
    pub fn mount(&mut self, parent: NodeId, vnode: &VNode) -> Result<NodeId, DomError> {
        let node = self.build(vnode);
        self.append_child(parent, node)?;
        Ok(node)
    }

    /// Bring the subtree at `node` in line with `vnode`.
    ///
    /// Children are matched by key when the description has one, otherwise
    /// by position among unkeyed children. A match must also agree on the
    /// tag. Unmatched old children are removed; unmatched descriptions are
    /// built fresh.
    pub fn patch(&mut self, node: NodeId, vnode: &VNode) -> Result<(), DomError> {
        vnode.apply_to(self.element_mut(node)?);

        let old_children = self.children(node).to_vec();
        let mut reused = HashSet::new();
        let mut new_children = Vec::with_capacity(vnode.children.len());

        for (index, child) in vnode.children.iter().enumerate() {
            let candidate = match child.key.as_deref() {
                Some(key) => old_children
                    .iter()
                    .copied()
                    .find(|&old| !reused.contains(&old) && self.key(old) == Some(key)),
                None => old_children
                    .get(index)
                    .copied()
                    .filter(|&old| !reused.contains(&old) && self.key(old).is_none()),
            }
            .filter(|&old| self.tag(old) == Some(child.tag.as_str()));

            let id = match candidate {
                Some(old) => {
                    reused.insert(old);
                    self.patch(old, child)?;
                    old
                }
                None => self.build(child),
            };
            new_children.push(id);
        }

        for old in old_children {
            if !reused.contains(&old) {
                self.discard(old);
            }
        }
        self.set_children(node, new_children);
        Ok(())
    }

    fn build(&mut self, vnode: &VNode) -> NodeId {
        let node = self.insert_element(vnode.to_element());
        let children: Vec<NodeId> = vnode.children.iter().map(|c| self.build(c)).collect();
        self.set_children(node, children);
        node
    }
}
