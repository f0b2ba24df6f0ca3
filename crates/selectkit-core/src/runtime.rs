//! Headless host runtime.
//!
//! [`Runtime`] owns a [`Dom`], the shared [`FocusChannel`] and a
//! [`FrameScheduler`] with a virtual clock. It mounts components, turns
//! simulated input into element events and focus notifications, and runs
//! frames: patch every mounted view if a redraw was requested, then run the
//! after-paint tasks queued before the frame started.

use crate::channel::FocusChannel;
use crate::component::{Component, LifecyclePhase};
use crate::dom::{Dom, NodeId};
use crate::error::DomError;
use crate::event::{Event, FocusEvent, Key};
use crate::schedule::{PaintContext, PaintTask, Scheduler, TimerTask};
use crate::vnode::VNode;
use std::fmt;
use std::time::Duration;
use tracing::{debug, trace};

// =============================================================================
// Frame Scheduler
// =============================================================================

struct PendingTimer {
    due: Duration,
    seq: u64,
    task: TimerTask,
}

/// [`Scheduler`] backed by a virtual clock.
///
/// Timers fire only when the clock is advanced; ties on due time fire in
/// scheduling order.
#[derive(Default)]
pub struct FrameScheduler {
    now: Duration,
    redraw_requested: bool,
    paint_queue: Vec<PaintTask>,
    timers: Vec<PendingTimer>,
    next_seq: u64,
}

impl FrameScheduler {
    /// Create a scheduler at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Check if a redraw is pending.
    #[must_use]
    pub const fn redraw_requested(&self) -> bool {
        self.redraw_requested
    }

    /// Number of queued after-paint tasks.
    #[must_use]
    pub fn pending_paint_tasks(&self) -> usize {
        self.paint_queue.len()
    }

    /// Number of timers that have not fired yet.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Advance the clock, firing every timer that comes due on the way.
    ///
    /// Timers scheduled by a firing timer are eligible in the same advance.
    /// Returns the number of timers fired.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        let target = self.now + elapsed;
        let mut fired = 0;
        while let Some(timer) = self.pop_due(target) {
            self.now = self.now.max(timer.due);
            (timer.task)(self);
            fired += 1;
        }
        self.now = target;
        fired
    }

    fn pop_due(&mut self, limit: Duration) -> Option<PendingTimer> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= limit)
            .min_by_key(|(_, t)| (t.due, t.seq))
            .map(|(i, _)| i)?;
        Some(self.timers.remove(index))
    }

    fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    fn take_paint_tasks(&mut self) -> Vec<PaintTask> {
        std::mem::take(&mut self.paint_queue)
    }
}

impl Scheduler for FrameScheduler {
    fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }

    fn after_paint(&mut self, task: PaintTask) {
        self.paint_queue.push(task);
    }

    fn set_timeout(&mut self, delay: Duration, task: TimerTask) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.push(PendingTimer {
            due: self.now + delay,
            seq,
            task,
        });
    }
}

impl fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("now", &self.now)
            .field("redraw_requested", &self.redraw_requested)
            .field("paint_queue", &self.paint_queue.len())
            .field("timers", &self.timers.len())
            .finish()
    }
}

// =============================================================================
// Runtime
// =============================================================================

/// Handle to a mounted component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MountId(pub u64);

struct Mounted {
    id: MountId,
    root: NodeId,
    component: Box<dyn Component>,
}

/// Headless host for components.
pub struct Runtime {
    dom: Dom,
    channel: FocusChannel,
    scheduler: FrameScheduler,
    mounted: Vec<Mounted>,
    next_mount: u64,
    frames: u64,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dom: Dom::new(),
            channel: FocusChannel::new(),
            scheduler: FrameScheduler::new(),
            mounted: Vec::new(),
            next_mount: 0,
            frames: 0,
        }
    }

    /// The element tree.
    #[must_use]
    pub const fn dom(&self) -> &Dom {
        &self.dom
    }

    /// The shared focus channel.
    #[must_use]
    pub const fn channel(&self) -> &FocusChannel {
        &self.channel
    }

    /// The scheduler.
    #[must_use]
    pub const fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    /// Current virtual time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Number of frames run so far.
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Number of mounted components.
    #[must_use]
    pub fn mounted_count(&self) -> usize {
        self.mounted.len()
    }

    // === Mounting ===

    /// Mount a component at the end of the document.
    pub fn mount(&mut self, component: impl Component + 'static) -> Result<MountId, DomError> {
        self.mount_under(NodeId::DOCUMENT, component)
    }

    /// Mount a component as the last child of `parent`.
    pub fn mount_under(
        &mut self,
        parent: NodeId,
        component: impl Component + 'static,
    ) -> Result<MountId, DomError> {
        let mut component: Box<dyn Component> = Box::new(component);
        let id = MountId(self.next_mount);
        self.next_mount += 1;

        trace!(?id, phase = ?LifecyclePhase::Init, "lifecycle");
        component.init();
        let root = self.dom.mount(parent, &component.view())?;
        trace!(?id, phase = ?LifecyclePhase::Create, ?root, "lifecycle");
        component.create(root, &self.channel);

        debug!(?id, ?root, "component mounted");
        self.mounted.push(Mounted {
            id,
            root,
            component,
        });
        Ok(id)
    }

    /// Append static content that no component owns.
    pub fn append(&mut self, parent: NodeId, vnode: &VNode) -> Result<NodeId, DomError> {
        self.dom.mount(parent, vnode)
    }

    /// Root element of a mounted component.
    #[must_use]
    pub fn root_of(&self, id: MountId) -> Option<NodeId> {
        self.mounted.iter().find(|m| m.id == id).map(|m| m.root)
    }

    /// Unmount a component. Returns `false` if it was not mounted.
    pub fn unmount(&mut self, id: MountId) -> Result<bool, DomError> {
        let Some(index) = self.mounted.iter().position(|m| m.id == id) else {
            return Ok(false);
        };
        let mut mounted = self.mounted.remove(index);
        trace!(?id, phase = ?LifecyclePhase::Remove, "lifecycle");
        mounted.component.remove();
        self.dom.remove(mounted.root)?;
        debug!(?id, "component unmounted");
        Ok(true)
    }

    // === Input ===

    /// Dispatch an event at `target`, bubbling through its ancestors.
    ///
    /// Any handled event requests a redraw. Returns the number of handlers
    /// called.
    pub fn dispatch(&mut self, target: NodeId, event: Event) -> Result<usize, DomError> {
        let path = self.dom.path(target)?;
        let mut handled = 0;
        for node in path {
            for handler in self.dom.handlers(node, event.kind()) {
                handler(&event, &mut self.scheduler);
                handled += 1;
            }
        }
        if handled > 0 {
            self.scheduler.request_redraw();
        }
        Ok(handled)
    }

    /// Move focus to `node`, delivering blur/focus notifications.
    pub fn focus(&mut self, node: NodeId) -> Result<(), DomError> {
        let events = self.dom.focus(node)?;
        self.deliver(&events);
        Ok(())
    }

    /// Clear focus, delivering a blur notification if something was focused.
    pub fn blur(&mut self) {
        let events = self.dom.blur();
        self.deliver(&events);
    }

    /// Simulate a pointer click: focus moves to the nearest focusable
    /// ancestor of `target` (or is cleared), then the click is dispatched.
    pub fn click(&mut self, target: NodeId) -> Result<usize, DomError> {
        match self.dom.focusable_ancestor(target) {
            Some(node) => self.focus(node)?,
            None => self.blur(),
        }
        self.dispatch(target, Event::Click)
    }

    /// Dispatch a key down at the focused element (or the document).
    pub fn key_down(&mut self, key: Key) -> Result<usize, DomError> {
        let target = self.dom.focused().unwrap_or(NodeId::DOCUMENT);
        self.dispatch(target, Event::KeyDown { key })
    }

    /// Dispatch a key up at the focused element (or the document).
    pub fn key_up(&mut self, key: Key) -> Result<usize, DomError> {
        let target = self.dom.focused().unwrap_or(NodeId::DOCUMENT);
        self.dispatch(target, Event::KeyUp { key })
    }

    /// Key down followed by key up, without a frame in between.
    pub fn press(&mut self, key: Key) -> Result<usize, DomError> {
        Ok(self.key_down(key)? + self.key_up(key)?)
    }

    fn deliver(&mut self, events: &[FocusEvent]) {
        for event in events {
            trace!(kind = ?event.kind, target = ?event.target, "focus notification");
            self.channel.dispatch(event, &mut self.scheduler);
        }
    }

    // === Frames and time ===

    /// Run one frame.
    pub fn frame(&mut self) -> Result<(), DomError> {
        if self.scheduler.take_redraw() {
            for mounted in &self.mounted {
                let view = mounted.component.view();
                self.dom.patch(mounted.root, &view)?;
                trace!(id = ?mounted.id, phase = ?LifecyclePhase::Update, "lifecycle");
            }
        }

        for task in self.scheduler.take_paint_tasks() {
            let mut cx = PaintContext::new(&mut self.dom, &self.channel, &mut self.scheduler);
            task(&mut cx);
        }

        self.frames += 1;
        Ok(())
    }

    /// Advance the virtual clock, firing due timers. Returns the number of
    /// timers fired.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        self.scheduler.advance(elapsed)
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("dom_nodes", &self.dom.len())
            .field("channel", &self.channel)
            .field("scheduler", &self.scheduler)
            .field("mounted", &self.mounted.len())
            .field("frames", &self.frames)
            .finish()
    }
}
