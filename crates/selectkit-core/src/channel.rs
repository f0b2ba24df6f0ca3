//! Document-wide focus and blur notifications.
//!
//! Every element's focus changes are published on one shared channel, the
//! way a browser window observes `focus`/`blur` in the capture phase.
//! Subscribers filter for the elements they care about.
//!
//! Focus notifications do not bubble, so a listener registered without
//! `capture` only observes notifications targeted at the document itself.

use crate::dom::NodeId;
use crate::event::{FocusEvent, FocusKind};
use crate::schedule::Scheduler;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::trace;

/// Callback invoked for each delivered notification.
pub type FocusListener = Box<dyn FnMut(&FocusEvent, &mut dyn Scheduler)>;

/// Unique ID for a listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Registration options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListenerOptions {
    /// Observe notifications for every element, not only the document.
    pub capture: bool,
}

impl ListenerOptions {
    /// Options for a capture-phase listener.
    #[must_use]
    pub const fn capture() -> Self {
        Self { capture: true }
    }
}

struct Registration {
    id: ListenerId,
    kind: FocusKind,
    options: ListenerOptions,
    callback: Rc<RefCell<FocusListener>>,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<Registration>,
}

impl Registry {
    fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|r| r.id != id);
        self.listeners.len() != before
    }

    fn is_registered(&self, id: ListenerId) -> bool {
        self.listeners.iter().any(|r| r.id == id)
    }
}

/// Shared focus notification channel.
///
/// Cloning yields another handle to the same channel.
#[derive(Clone, Default)]
pub struct FocusChannel {
    registry: Rc<RefCell<Registry>>,
}

impl FocusChannel {
    /// Create an empty channel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for one notification kind.
    ///
    /// The listener stays registered until the returned [`Subscription`] is
    /// dropped or cancelled.
    pub fn listen(
        &self,
        kind: FocusKind,
        options: ListenerOptions,
        callback: FocusListener,
    ) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = ListenerId(registry.next_id);
        registry.next_id += 1;
        registry.listeners.push(Registration {
            id,
            kind,
            options,
            callback: Rc::new(RefCell::new(callback)),
        });
        trace!(?id, ?kind, capture = options.capture, "focus listener added");

        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Deliver a notification to every matching listener.
    ///
    /// Listeners may subscribe or unsubscribe while being called; a listener
    /// removed during delivery is not called afterwards. Returns the number
    /// of listeners called.
    pub fn dispatch(&self, event: &FocusEvent, scheduler: &mut dyn Scheduler) -> usize {
        let targets: Vec<(ListenerId, Rc<RefCell<FocusListener>>)> = self
            .registry
            .borrow()
            .listeners
            .iter()
            .filter(|r| r.kind == event.kind)
            .filter(|r| r.options.capture || event.target == NodeId::DOCUMENT)
            .map(|r| (r.id, Rc::clone(&r.callback)))
            .collect();

        let mut delivered = 0;
        for (id, callback) in targets {
            if !self.registry.borrow().is_registered(id) {
                continue;
            }
            let Ok(mut listener) = callback.try_borrow_mut() else {
                trace!(?id, "focus listener re-entered, skipping");
                continue;
            };
            (&mut *listener)(event, &mut *scheduler);
            delivered += 1;
        }
        delivered
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }

    /// Number of registered listeners for one notification kind.
    #[must_use]
    pub fn listener_count_for(&self, kind: FocusKind) -> usize {
        self.registry
            .borrow()
            .listeners
            .iter()
            .filter(|r| r.kind == kind)
            .count()
    }
}

impl fmt::Debug for FocusChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusChannel")
            .field("listener_count", &self.listener_count())
            .finish()
    }
}

/// Handle that keeps a listener registered.
///
/// Dropping the handle removes the listener. The handle does not keep the
/// channel alive.
#[must_use = "dropping a Subscription removes its listener"]
#[derive(Debug)]
pub struct Subscription {
    id: ListenerId,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    /// ID of the registration.
    #[must_use]
    pub const fn id(&self) -> ListenerId {
        self.id
    }

    /// Check if the listener is still registered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.borrow().is_registered(self.id))
    }

    /// Remove the listener now.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            if registry.borrow_mut().remove(self.id) {
                trace!(id = ?self.id, "focus listener removed");
            }
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("next_id", &self.next_id)
            .field("listener_count", &self.listeners.len())
            .finish()
    }
}
