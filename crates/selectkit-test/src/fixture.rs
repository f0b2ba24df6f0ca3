//! Shared test data and recorders.

use std::cell::RefCell;
use std::rc::Rc;

/// Country options as `(value, label)` pairs.
pub const COUNTRIES: &[(&str, &str)] = &[
    ("canada", "Canada"),
    ("germany", "Germany"),
    ("romania", "Romania"),
    ("uk", "United Kingdom"),
    ("usa", "United States"),
];

/// Colour options, value equals label.
pub const COLOURS: &[&str] = &["red", "blue", "green", "yellow", "orange", "pink"];

/// Records every value passed to a selection callback.
///
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct SelectionLog {
    values: Rc<RefCell<Vec<String>>>,
}

impl SelectionLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Callback that appends to this log.
    pub fn recorder(&self) -> impl Fn(&str) + 'static {
        let values = Rc::clone(&self.values);
        move |value: &str| values.borrow_mut().push(value.to_string())
    }

    /// Recorded values in call order.
    #[must_use]
    pub fn values(&self) -> Vec<String> {
        self.values.borrow().clone()
    }

    /// Most recent value.
    #[must_use]
    pub fn last(&self) -> Option<String> {
        self.values.borrow().last().cloned()
    }

    /// Number of recorded calls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    /// Check if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }
}
