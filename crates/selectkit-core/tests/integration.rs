//! Integration tests for selectkit-core: components, focus and frames
//! working together through the headless runtime.

use selectkit_core::{
    Component, FocusChannel, FocusKind, Key, ListenerOptions, NodeId, Runtime, Scheduler,
    Subscription, VNode,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

// =============================================================================
// Test components
// =============================================================================

/// Two focusable buttons. Records which of its own elements gain focus.
struct Pair {
    focus_log: Rc<RefCell<Vec<NodeId>>>,
    subscription: Option<Subscription>,
}

impl Pair {
    fn new(focus_log: &Rc<RefCell<Vec<NodeId>>>) -> Self {
        Self {
            focus_log: Rc::clone(focus_log),
            subscription: None,
        }
    }
}

impl Component for Pair {
    fn view(&self) -> VNode {
        VNode::element("div")
            .class("pair")
            .child(VNode::element("button").key("first").tab_index(0))
            .child(VNode::element("button").key("second").tab_index(0))
    }

    fn create(&mut self, root: NodeId, channel: &FocusChannel) {
        let log = Rc::clone(&self.focus_log);
        self.subscription = Some(channel.listen(
            FocusKind::Focus,
            ListenerOptions::capture(),
            Box::new(move |event, _| {
                if event.is_within(root) {
                    log.borrow_mut().push(event.target);
                }
            }),
        ));
    }

    fn remove(&mut self) {
        self.subscription = None;
    }
}

/// A counter whose button schedules a delayed reset.
struct DelayedReset {
    count: Rc<Cell<u32>>,
}

impl Component for DelayedReset {
    fn view(&self) -> VNode {
        let count = Rc::clone(&self.count);
        VNode::element("button")
            .key("reset")
            .tab_index(0)
            .text(self.count.get().to_string())
            .on_click(move |scheduler: &mut dyn Scheduler| {
                count.set(count.get() + 1);
                let count = Rc::clone(&count);
                scheduler.set_timeout(
                    Duration::from_millis(50),
                    Box::new(move |scheduler| {
                        count.set(0);
                        scheduler.request_redraw();
                    }),
                );
            })
    }
}

// =============================================================================
// Focus
// =============================================================================

#[test]
fn test_focus_listener_sees_only_own_elements() {
    let mut runtime = Runtime::new();
    let log_a = Rc::new(RefCell::new(Vec::new()));
    let log_b = Rc::new(RefCell::new(Vec::new()));
    let a = runtime.mount(Pair::new(&log_a)).unwrap();
    let b = runtime.mount(Pair::new(&log_b)).unwrap();

    let root_a = runtime.root_of(a).unwrap();
    let root_b = runtime.root_of(b).unwrap();
    let first_a = runtime.dom().find_by_key(root_a, "first").unwrap();
    let second_b = runtime.dom().find_by_key(root_b, "second").unwrap();

    runtime.click(first_a).unwrap();
    runtime.click(second_b).unwrap();

    assert_eq!(*log_a.borrow(), vec![first_a]);
    assert_eq!(*log_b.borrow(), vec![second_b]);
}

#[test]
fn test_unmount_releases_listener() {
    let mut runtime = Runtime::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let id = runtime.mount(Pair::new(&log)).unwrap();
    assert_eq!(runtime.channel().listener_count(), 1);

    runtime.unmount(id).unwrap();
    assert_eq!(runtime.channel().listener_count(), 0);
}

#[test]
fn test_keys_without_focus_go_to_document() {
    let mut runtime = Runtime::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    runtime.mount(Pair::new(&log)).unwrap();
    assert_eq!(runtime.press(Key::Space).unwrap(), 0);
    assert!(log.borrow().is_empty());
}

// =============================================================================
// Frames and timers
// =============================================================================

#[test]
fn test_timer_redraw_reaches_view() {
    let mut runtime = Runtime::new();
    let count = Rc::new(Cell::new(0));
    let id = runtime
        .mount(DelayedReset {
            count: Rc::clone(&count),
        })
        .unwrap();
    let root = runtime.root_of(id).unwrap();

    runtime.click(root).unwrap();
    runtime.frame().unwrap();
    assert_eq!(runtime.dom().text_content(root), "1");

    assert_eq!(runtime.advance(Duration::from_millis(49)), 0);
    assert_eq!(runtime.advance(Duration::from_millis(1)), 1);
    runtime.frame().unwrap();
    assert_eq!(count.get(), 0);
    assert_eq!(runtime.dom().text_content(root), "0");
}

#[test]
fn test_redraw_keeps_focus_on_keyed_element() {
    let mut runtime = Runtime::new();
    let count = Rc::new(Cell::new(0));
    let id = runtime.mount(DelayedReset { count }).unwrap();
    let root = runtime.root_of(id).unwrap();

    runtime.click(root).unwrap();
    runtime.frame().unwrap();
    runtime.advance(Duration::from_millis(100));
    runtime.frame().unwrap();

    assert_eq!(runtime.dom().focused(), Some(root));
    assert_eq!(runtime.frame_count(), 2);
}
