//! Component lifecycle contract between hosts and widgets.

use crate::channel::FocusChannel;
use crate::dom::NodeId;
use crate::vnode::VNode;

/// Lifecycle phase of a mounted component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecyclePhase {
    /// Before the first view is built.
    Init,
    /// After the first view has been attached to the document.
    Create,
    /// After a redraw patched the view.
    Update,
    /// Before the view is detached.
    Remove,
}

/// A stateful view that a host can mount.
///
/// The host calls [`Component::init`] once, builds the first view, attaches
/// it and then calls [`Component::create`] with the root element. On every
/// redraw it rebuilds the view and patches it in place. Before detaching it
/// calls [`Component::remove`].
pub trait Component {
    /// Validate configuration and set up initial state.
    fn init(&mut self) {}

    /// Describe the current view.
    fn view(&self) -> VNode;

    /// The first view is attached at `root`. Global subscriptions are made
    /// here.
    fn create(&mut self, _root: NodeId, _channel: &FocusChannel) {}

    /// The view is about to be detached. Everything registered in
    /// [`Component::create`] must be released here.
    fn remove(&mut self) {}
}
