//! Focus tracking with a debounced close.
//!
//! Moving focus between two elements of the same widget produces a blur
//! followed by a focus. The tracker marks the widget unfocused on the blur,
//! then checks again once the settle window has passed: if no focus
//! notification for the widget arrived in between, the sink is asked to
//! settle (close).

use selectkit_core::{FocusChannel, FocusKind, ListenerOptions, NodeId, Subscription};
use std::rc::Weak;
use std::time::Duration;
use tracing::trace;

/// Default settle window.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(50);

/// Receiver of focus decisions for one widget.
pub trait FocusSink {
    /// Focus entered (`true`) or left (`false`) the widget.
    fn focus_changed(&self, focused: bool);

    /// The settle window after a blur has passed. Returns `true` if the
    /// widget changed and needs a redraw.
    fn settle(&self) -> bool;
}

/// Document-wide focus listener for one widget root.
///
/// Both subscriptions are released on [`FocusTracker::detach`] or drop.
#[derive(Debug)]
pub struct FocusTracker {
    root: NodeId,
    delay: Duration,
    focus: Option<Subscription>,
    blur: Option<Subscription>,
}

impl FocusTracker {
    /// Start listening for focus changes inside `root`.
    ///
    /// The sink is held weakly; notifications and settle checks arriving
    /// after it is gone are ignored.
    pub fn attach(
        channel: &FocusChannel,
        root: NodeId,
        sink: Weak<dyn FocusSink>,
        delay: Duration,
    ) -> Self {
        let focus_sink = Weak::clone(&sink);
        let focus = channel.listen(
            FocusKind::Focus,
            ListenerOptions::capture(),
            Box::new(move |event, _| {
                if !event.is_within(root) {
                    return;
                }
                trace!(?root, target = ?event.target, "focus inside widget");
                if let Some(sink) = focus_sink.upgrade() {
                    sink.focus_changed(true);
                }
            }),
        );

        let blur = channel.listen(
            FocusKind::Blur,
            ListenerOptions::capture(),
            Box::new(move |event, scheduler| {
                if !event.is_within(root) {
                    return;
                }
                trace!(?root, target = ?event.target, "blur inside widget");
                let Some(strong) = sink.upgrade() else {
                    return;
                };
                strong.focus_changed(false);

                let deferred = Weak::clone(&sink);
                scheduler.set_timeout(
                    delay,
                    Box::new(move |scheduler| {
                        let Some(sink) = deferred.upgrade() else {
                            trace!(?root, "settle check after teardown");
                            return;
                        };
                        if sink.settle() {
                            scheduler.request_redraw();
                        }
                    }),
                );
            }),
        );

        Self {
            root,
            delay,
            focus: Some(focus),
            blur: Some(blur),
        }
    }

    /// Root element being tracked.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Settle window.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Check if both listeners are still registered.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.focus.as_ref().is_some_and(Subscription::is_active)
            && self.blur.as_ref().is_some_and(Subscription::is_active)
    }

    /// Release both listeners. Safe to call more than once.
    pub fn detach(&mut self) {
        let released = self.focus.take().is_some();
        let released = self.blur.take().is_some() || released;
        if released {
            trace!(root = ?self.root, "focus tracker detached");
        }
    }
}
