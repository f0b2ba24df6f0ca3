//! Select state machine.
//!
//! Pure state: every operation takes the option list it needs and returns a
//! [`Transition`] telling the caller which side effects to perform (move
//! focus after the next paint, report a committed value).

use crate::option::OptionList;
use serde::{Deserialize, Serialize};

/// Keyboard navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Previous option (Left/Up)
    Previous,
    /// Next option (Right/Down)
    Next,
}

impl Direction {
    const fn delta(self) -> isize {
        match self {
            Self::Previous => -1,
            Self::Next => 1,
        }
    }
}

/// Element that should receive focus after the next paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusTarget {
    /// The head
    Head,
    /// The option at this index
    Option(usize),
}

/// Side effects of a state operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transition {
    /// Whether any state changed
    pub changed: bool,
    /// Focus request to run after the next paint
    pub focus: Option<FocusTarget>,
    /// Value to report to the selection callback
    pub committed: Option<String>,
}

impl Transition {
    /// Nothing happened.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            changed: false,
            focus: None,
            committed: None,
        }
    }

    const fn changed(focus: Option<FocusTarget>) -> Self {
        Self {
            changed: true,
            focus,
            committed: None,
        }
    }
}

/// Move `index` by `delta` within `0..len`, wrapping at both ends.
///
/// Returns `None` for an empty range.
#[must_use]
pub fn wrap_index(index: usize, delta: isize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let len = len as isize;
    Some((index as isize + delta).rem_euclid(len) as usize)
}

/// State of one select widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectState {
    selected: Option<String>,
    open: bool,
    focused: bool,
    nav_index: Option<usize>,
}

impl SelectState {
    /// Create a closed, unfocused state with an optional selection.
    #[must_use]
    pub const fn new(selected: Option<String>) -> Self {
        Self {
            selected,
            open: false,
            focused: false,
            nav_index: None,
        }
    }

    /// Committed value.
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Check if the dropdown is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Check if focus is inside the widget.
    #[must_use]
    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    /// Option index under keyboard navigation, only while open.
    #[must_use]
    pub const fn nav_index(&self) -> Option<usize> {
        self.nav_index
    }

    /// Open if closed, close if open.
    pub fn toggle(&mut self, options: &OptionList) -> Transition {
        if self.open {
            self.close()
        } else {
            self.open(options)
        }
    }

    /// Open the dropdown and focus the selected option (or the first).
    pub fn open(&mut self, options: &OptionList) -> Transition {
        if self.open {
            return Transition::none();
        }
        self.open = true;
        self.nav_index = if options.is_empty() {
            None
        } else {
            Some(
                self.selected
                    .as_deref()
                    .and_then(|value| options.position(value))
                    .unwrap_or(0),
            )
        };
        Transition::changed(self.nav_index.map(FocusTarget::Option))
    }

    /// Close the dropdown and return focus to the head.
    pub fn close(&mut self) -> Transition {
        if !self.open {
            return Transition::none();
        }
        self.open = false;
        self.nav_index = None;
        Transition::changed(Some(FocusTarget::Head))
    }

    /// Select the option at `index`, close and report its value.
    ///
    /// Re-selecting the current value still reports it.
    pub fn commit(&mut self, index: usize, options: &OptionList) -> Transition {
        let Some(option) = options.get(index) else {
            return Transition::none();
        };
        self.selected = Some(option.value.clone());
        self.focused = false;
        self.open = false;
        self.nav_index = None;
        Transition {
            changed: true,
            focus: Some(FocusTarget::Head),
            committed: Some(option.value.clone()),
        }
    }

    /// Move navigation from the option at `from` one step, wrapping.
    pub fn navigate(
        &mut self,
        from: usize,
        direction: Direction,
        options: &OptionList,
    ) -> Transition {
        if !self.open {
            return Transition::none();
        }
        let Some(next) = wrap_index(from, direction.delta(), options.len()) else {
            return Transition::none();
        };
        self.nav_index = Some(next);
        Transition::changed(Some(FocusTarget::Option(next)))
    }

    /// Record whether focus is inside the widget.
    pub fn set_focused(&mut self, focused: bool) -> bool {
        let changed = self.focused != focused;
        self.focused = focused;
        changed
    }

    /// Close if focus left the widget and did not come back.
    pub fn settle(&mut self) -> Transition {
        if !self.open || self.focused {
            return Transition::none();
        }
        self.open = false;
        self.nav_index = None;
        Transition::changed(None)
    }

    /// Text for the head.
    ///
    /// The selected option's label, else the static label, else the first
    /// option's label, else empty.
    #[must_use]
    pub fn header_label(&self, options: &OptionList, static_label: Option<&str>) -> String {
        if let Some(option) = self.selected.as_deref().and_then(|v| options.find(v)) {
            return option.display_label().to_string();
        }
        if let Some(label) = static_label.filter(|l| !l.is_empty()) {
            return label.to_string();
        }
        options
            .get(0)
            .map(|o| o.display_label().to_string())
            .unwrap_or_default()
    }
}
