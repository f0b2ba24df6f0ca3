//! Deferred work primitives provided by the host renderer.
//!
//! Components never touch the renderer directly. They ask for three things:
//!
//! - a redraw of the view (coalesced, happens on the next frame)
//! - a task to run once the next frame has been painted
//! - a task to run after a delay
//!
//! None of these can be cancelled. Tasks are expected to re-check whatever
//! state they depend on before acting.

use crate::channel::FocusChannel;
use crate::dom::{Dom, NodeId};
use crate::error::DomError;
use std::time::Duration;

/// Task run after the next paint, with access to the painted tree.
pub type PaintTask = Box<dyn FnOnce(&mut PaintContext<'_>)>;

/// Task run when a timeout elapses.
pub type TimerTask = Box<dyn FnOnce(&mut dyn Scheduler)>;

/// Scheduling capability handed to event handlers, listeners and tasks.
pub trait Scheduler {
    /// Request that all views are rebuilt and patched on the next frame.
    fn request_redraw(&mut self);

    /// Run `task` after the next frame's patch has been applied.
    fn after_paint(&mut self, task: PaintTask);

    /// Run `task` once `delay` has elapsed.
    fn set_timeout(&mut self, delay: Duration, task: TimerTask);
}

/// Access to the document given to after-paint tasks.
pub struct PaintContext<'a> {
    dom: &'a mut Dom,
    channel: &'a FocusChannel,
    scheduler: &'a mut dyn Scheduler,
}

impl<'a> PaintContext<'a> {
    /// Create a context over a painted tree.
    pub fn new(
        dom: &'a mut Dom,
        channel: &'a FocusChannel,
        scheduler: &'a mut dyn Scheduler,
    ) -> Self {
        Self {
            dom,
            channel,
            scheduler,
        }
    }

    /// The painted tree.
    #[must_use]
    pub fn dom(&self) -> &Dom {
        &*self.dom
    }

    /// Move focus to `node` and deliver the resulting blur/focus
    /// notifications on the focus channel.
    pub fn focus(&mut self, node: NodeId) -> Result<(), DomError> {
        let events = self.dom.focus(node)?;
        for event in &events {
            self.channel.dispatch(event, &mut *self.scheduler);
        }
        Ok(())
    }
}
