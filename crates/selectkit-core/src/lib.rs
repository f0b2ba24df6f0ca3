//! Core types for selectkit widgets.
//!
//! This crate provides the host-side plumbing that widgets are built on:
//! - Input events: [`Event`], [`Key`], [`FocusEvent`]
//! - An element tree with focus: [`Dom`], [`NodeId`]
//! - Declarative views and keyed patching: [`VNode`]
//! - Document-wide focus notifications: [`FocusChannel`], [`Subscription`]
//! - Deferred work: [`Scheduler`], [`PaintContext`]
//! - A headless host with a virtual clock: [`Runtime`], [`FrameScheduler`]

mod channel;
mod component;
mod dom;
mod error;
mod event;
mod runtime;
mod schedule;
mod vnode;

pub use channel::{FocusChannel, FocusListener, ListenerId, ListenerOptions, Subscription};
pub use component::{Component, LifecyclePhase};
pub use dom::{Dom, Handler, NodeId};
pub use error::DomError;
pub use event::{Event, EventKind, FocusEvent, FocusKind, Key};
pub use runtime::{FrameScheduler, MountId, Runtime};
pub use schedule::{PaintContext, PaintTask, Scheduler, TimerTask};
pub use vnode::{VNode, TEXT_TAG};

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ==========================================================================
    // KEY CODE PROPERTIES
    // ==========================================================================

    proptest! {
        #[test]
        fn prop_key_code_roundtrip(code in 0u32..1024) {
            prop_assert_eq!(Key::from_key_code(code).key_code(), code);
        }

        #[test]
        fn prop_path_ends_at_document(depth in 1usize..12) {
            let mut dom = Dom::new();
            let mut parent = NodeId::DOCUMENT;
            for _ in 0..depth {
                let node = dom.create_element("div");
                dom.append_child(parent, node).unwrap();
                parent = node;
            }
            let path = dom.path(parent).unwrap();
            prop_assert_eq!(path.len(), depth + 1);
            prop_assert_eq!(path.first().copied(), Some(parent));
            prop_assert_eq!(path.last().copied(), Some(NodeId::DOCUMENT));
        }
    }
}
