//! Test harness for selectkit components.

use selectkit_core::{Component, Dom, DomError, Key, MountId, NodeId, Runtime};
use std::time::Duration;
use tracing::debug;

use crate::selector::Selector;

/// Test harness for interacting with mounted components.
///
/// Every simulated interaction is followed by a frame, the way a browser
/// renders between user inputs. Time only moves through [`Harness::tick`].
pub struct Harness {
    runtime: Runtime,
    mounted: Vec<MountId>,
}

impl Default for Harness {
    fn default() -> Self {
        Self::empty()
    }
}

impl Harness {
    /// Create a harness with one mounted component.
    ///
    /// # Panics
    ///
    /// Panics if the component cannot be mounted.
    pub fn new(component: impl Component + 'static) -> Self {
        let mut harness = Self::empty();
        harness.mount(component);
        harness
    }

    /// Create a harness with an empty document.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            runtime: Runtime::new(),
            mounted: Vec::new(),
        }
    }

    /// Mount another component after the existing ones.
    ///
    /// # Panics
    ///
    /// Panics if the component cannot be mounted.
    pub fn mount(&mut self, component: impl Component + 'static) -> MountId {
        let id = self
            .runtime
            .mount(component)
            .unwrap_or_else(|err| panic!("failed to mount component: {err}"));
        self.mounted.push(id);
        id
    }

    /// Unmount a component. Returns `false` if it was not mounted.
    pub fn unmount(&mut self, id: MountId) -> bool {
        self.mounted.retain(|m| *m != id);
        let removed = check(self.runtime.unmount(id), "unmount");
        self.frame();
        removed
    }

    /// Mounted components, in mount order.
    #[must_use]
    pub fn mounted(&self) -> &[MountId] {
        &self.mounted
    }

    /// The runtime.
    #[must_use]
    pub const fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// The runtime, for driving it directly.
    pub fn runtime_mut(&mut self) -> &mut Runtime {
        &mut self.runtime
    }

    /// The element tree.
    #[must_use]
    pub const fn dom(&self) -> &Dom {
        self.runtime.dom()
    }

    // === Event Simulation ===

    /// Simulate a click on the first element matching the selector.
    pub fn click(&mut self, selector: &str) -> &mut Self {
        if let Some(node) = self.query(selector) {
            check(self.runtime.click(node), "click");
            self.frame();
        } else {
            debug!(selector, "click target not found");
        }
        self
    }

    /// Simulate a key press on the focused element.
    pub fn press_key(&mut self, key: Key) -> &mut Self {
        self.key_down(key);
        self.key_up(key)
    }

    /// Simulate a key down on the focused element.
    pub fn key_down(&mut self, key: Key) -> &mut Self {
        check(self.runtime.key_down(key), "key down");
        self.frame()
    }

    /// Simulate a key up on the focused element.
    pub fn key_up(&mut self, key: Key) -> &mut Self {
        check(self.runtime.key_up(key), "key up");
        self.frame()
    }

    /// Move focus to the first element matching the selector.
    pub fn focus(&mut self, selector: &str) -> &mut Self {
        if let Some(node) = self.query(selector) {
            check(self.runtime.focus(node), "focus");
            self.frame();
        } else {
            debug!(selector, "focus target not found");
        }
        self
    }

    /// Move focus out of every element.
    pub fn blur(&mut self) -> &mut Self {
        self.runtime.blur();
        self.frame()
    }

    /// Advance simulated time, fire due timers and run a frame.
    pub fn tick(&mut self, ms: u64) -> &mut Self {
        self.runtime.advance(Duration::from_millis(ms));
        self.frame()
    }

    /// Run a frame: apply pending redraws, then after-paint tasks.
    pub fn frame(&mut self) -> &mut Self {
        check(self.runtime.frame(), "frame");
        self
    }

    // === Queries ===

    /// First element matching the selector, in document order.
    #[must_use]
    pub fn query(&self, selector: &str) -> Option<NodeId> {
        let sel = Selector::parse(selector).ok()?;
        let dom = self.dom();
        descendants(dom, NodeId::DOCUMENT)
            .into_iter()
            .find(|&node| sel.matches(dom, node))
    }

    /// All elements matching the selector, in document order.
    #[must_use]
    pub fn query_all(&self, selector: &str) -> Vec<NodeId> {
        let Ok(sel) = Selector::parse(selector) else {
            return Vec::new();
        };
        let dom = self.dom();
        descendants(dom, NodeId::DOCUMENT)
            .into_iter()
            .filter(|&node| sel.matches(dom, node))
            .collect()
    }

    /// Text content of the first matching element.
    #[must_use]
    pub fn text(&self, selector: &str) -> String {
        self.query(selector)
            .map(|node| self.dom().text_content(node))
            .unwrap_or_default()
    }

    /// Check if an element exists.
    #[must_use]
    pub fn exists(&self, selector: &str) -> bool {
        self.query(selector).is_some()
    }

    /// Check if the first matching element has a class.
    #[must_use]
    pub fn has_class(&self, selector: &str, class: &str) -> bool {
        self.query(selector)
            .is_some_and(|node| self.dom().has_class(node, class))
    }

    /// Currently focused element.
    #[must_use]
    pub const fn focused(&self) -> Option<NodeId> {
        self.dom().focused()
    }

    /// Check if the first matching element has focus.
    #[must_use]
    pub fn is_focused(&self, selector: &str) -> bool {
        self.focused().is_some() && self.query(selector) == self.focused()
    }

    // === Assertions ===

    /// Assert that an element exists.
    ///
    /// # Panics
    ///
    /// Panics if the element does not exist.
    pub fn assert_exists(&self, selector: &str) -> &Self {
        assert!(
            self.exists(selector),
            "Expected element matching '{selector}' to exist"
        );
        self
    }

    /// Assert that an element does not exist.
    ///
    /// # Panics
    ///
    /// Panics if the element exists.
    pub fn assert_not_exists(&self, selector: &str) -> &Self {
        assert!(
            !self.exists(selector),
            "Expected element matching '{selector}' to not exist"
        );
        self
    }

    /// Assert that text matches exactly.
    ///
    /// # Panics
    ///
    /// Panics if the text does not match.
    pub fn assert_text(&self, selector: &str, expected: &str) -> &Self {
        let actual = self.text(selector);
        assert_eq!(
            actual, expected,
            "Expected text '{expected}' but got '{actual}' for '{selector}'"
        );
        self
    }

    /// Assert that text contains a substring.
    ///
    /// # Panics
    ///
    /// Panics if the text does not contain the substring.
    pub fn assert_text_contains(&self, selector: &str, substring: &str) -> &Self {
        let actual = self.text(selector);
        assert!(
            actual.contains(substring),
            "Expected text for '{selector}' to contain '{substring}' but got '{actual}'"
        );
        self
    }

    /// Assert the count of matching elements.
    ///
    /// # Panics
    ///
    /// Panics if the count does not match.
    pub fn assert_count(&self, selector: &str, expected: usize) -> &Self {
        let actual = self.query_all(selector).len();
        assert_eq!(
            actual, expected,
            "Expected {expected} elements matching '{selector}' but found {actual}"
        );
        self
    }

    /// Assert that the first matching element has a class.
    ///
    /// # Panics
    ///
    /// Panics if the element is missing or lacks the class.
    pub fn assert_class(&self, selector: &str, class: &str) -> &Self {
        assert!(
            self.has_class(selector, class),
            "Expected element matching '{selector}' to have class '{class}'"
        );
        self
    }

    /// Assert that the first matching element lacks a class.
    ///
    /// # Panics
    ///
    /// Panics if the element is missing or has the class.
    pub fn assert_no_class(&self, selector: &str, class: &str) -> &Self {
        assert!(
            self.exists(selector) && !self.has_class(selector, class),
            "Expected element matching '{selector}' without class '{class}'"
        );
        self
    }

    /// Assert that the first matching element has focus.
    ///
    /// # Panics
    ///
    /// Panics if another element (or nothing) has focus.
    pub fn assert_focused(&self, selector: &str) -> &Self {
        assert!(
            self.is_focused(selector),
            "Expected element matching '{selector}' to have focus, focused is {:?}",
            self.focused()
        );
        self
    }
}

fn check<T>(result: Result<T, DomError>, action: &str) -> T {
    result.unwrap_or_else(|err| panic!("{action} failed: {err}"))
}

/// Every element below `root` in document order, excluding `root`.
fn descendants(dom: &Dom, root: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack: Vec<NodeId> = dom.children(root).iter().rev().copied().collect();
    while let Some(node) = stack.pop() {
        out.push(node);
        stack.extend(dom.children(node).iter().rev().copied());
    }
    out
}
