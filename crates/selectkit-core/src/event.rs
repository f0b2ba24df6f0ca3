//! Input events and focus notifications.

use crate::dom::NodeId;
use serde::{Deserialize, Serialize};

/// Input event delivered to element handlers.
///
/// Events are dispatched to the target element first and then bubble up
/// through its ancestors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Primary button click
    Click,
    /// Key pressed
    KeyDown {
        /// Key pressed
        key: Key,
    },
    /// Key released
    KeyUp {
        /// Key released
        key: Key,
    },
}

impl Event {
    /// Get the kind used to look up handlers for this event.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Click => EventKind::Click,
            Self::KeyDown { .. } => EventKind::KeyDown,
            Self::KeyUp { .. } => EventKind::KeyUp,
        }
    }

    /// Get the key for keyboard events.
    #[must_use]
    pub const fn key(&self) -> Option<Key> {
        match self {
            Self::Click => None,
            Self::KeyDown { key } | Self::KeyUp { key } => Some(*key),
        }
    }
}

/// Event discriminant used when registering handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Click events
    Click,
    /// Key down events
    KeyDown,
    /// Key up events
    KeyUp,
}

/// Keyboard key.
///
/// Only the keys the widgets react to are named; everything else is
/// carried as [`Key::Other`] with its legacy key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Enter/Return key
    Enter,
    /// Escape key
    Escape,
    /// Space bar
    Space,
    /// Tab key
    Tab,
    /// Left arrow
    ArrowLeft,
    /// Up arrow
    ArrowUp,
    /// Right arrow
    ArrowRight,
    /// Down arrow
    ArrowDown,
    /// Any other key, by legacy key code
    Other(u32),
}

impl Key {
    /// Decode a legacy DOM `keyCode`.
    #[must_use]
    pub const fn from_key_code(code: u32) -> Self {
        match code {
            9 => Self::Tab,
            13 => Self::Enter,
            27 => Self::Escape,
            32 => Self::Space,
            37 => Self::ArrowLeft,
            38 => Self::ArrowUp,
            39 => Self::ArrowRight,
            40 => Self::ArrowDown,
            other => Self::Other(other),
        }
    }

    /// Legacy DOM `keyCode` for this key.
    #[must_use]
    pub const fn key_code(self) -> u32 {
        match self {
            Self::Tab => 9,
            Self::Enter => 13,
            Self::Escape => 27,
            Self::Space => 32,
            Self::ArrowLeft => 37,
            Self::ArrowUp => 38,
            Self::ArrowRight => 39,
            Self::ArrowDown => 40,
            Self::Other(code) => code,
        }
    }
}

/// Kind of a document-wide focus notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FocusKind {
    /// An element gained focus
    Focus,
    /// An element lost focus
    Blur,
}

/// Focus or blur notification for one element.
///
/// The composed path is captured when the notification is emitted, so a
/// listener can test containment even if the element is gone by the time
/// the notification is processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusEvent {
    /// Notification kind
    pub kind: FocusKind,
    /// Element that gained or lost focus
    pub target: NodeId,
    path: Vec<NodeId>,
}

impl FocusEvent {
    /// Create a notification with an explicit composed path (target first).
    #[must_use]
    pub fn new(kind: FocusKind, target: NodeId, path: Vec<NodeId>) -> Self {
        Self { kind, target, path }
    }

    /// Target followed by its ancestors up to the document.
    #[must_use]
    pub fn composed_path(&self) -> &[NodeId] {
        &self.path
    }

    /// Check if the target is `root` or one of its descendants.
    #[must_use]
    pub fn is_within(&self, root: NodeId) -> bool {
        self.path.contains(&root)
    }
}
