//! Select/Dropdown widget for choosing from options.
//!
//! Element structure, with the classes hosts can style:
//!
//! ```text
//! div.select [+ configured class]
//! ├── div.select-head           tabindex=0, header label
//! └── div.select-body           + select-body-open while open
//!     └── div.select-options
//!         └── div.select-option tabindex=0, one per option
//!                               + select-option-selected, select-option-active
//! ```
//!
//! Keyboard: on the head Space/Enter toggle and Escape closes. On an option
//! Enter/Space commit, Escape closes, Left/Up and Right/Down move between
//! options with wraparound.

use crate::config::{SelectConfig, Validation};
use crate::error::ConfigWarning;
use crate::focus_tracker::{FocusSink, FocusTracker};
use crate::option::OptionList;
use crate::select_state::{Direction, FocusTarget, SelectState, Transition};
use selectkit_core::{
    Component, Event, EventKind, FocusChannel, Handler, Key, NodeId, Scheduler, VNode,
};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, trace, warn};

/// Reconciliation key of the head element.
pub const HEAD_KEY: &str = "head";

/// Reconciliation key of the option element for `value`.
#[must_use]
pub fn option_key(value: &str) -> String {
    format!("option:{value}")
}

type SelectCallback = Rc<dyn Fn(&str)>;

/// State shared between the widget, its element handlers and its focus
/// tracker. Handlers and deferred tasks only hold weak references.
struct Shared {
    config: SelectConfig,
    state: RefCell<SelectState>,
    on_select: RefCell<Option<SelectCallback>>,
    root: Cell<Option<NodeId>>,
}

impl Shared {
    fn update(
        self: &Rc<Self>,
        scheduler: &mut dyn Scheduler,
        op: impl FnOnce(&mut SelectState, &OptionList) -> Transition,
    ) {
        let transition = {
            let Ok(mut state) = self.state.try_borrow_mut() else {
                debug!("select state busy, event dropped");
                return;
            };
            op(&mut state, &self.config.options)
        };
        if transition.changed {
            debug!(?transition, "select transition");
        }
        self.apply(transition, scheduler);
    }

    fn apply(&self, transition: Transition, scheduler: &mut dyn Scheduler) {
        if let Some(target) = transition.focus {
            self.schedule_focus(target, scheduler);
        }
        if let Some(value) = transition.committed {
            let callback = self.on_select.borrow().clone();
            if let Some(callback) = callback {
                callback(&value);
            }
        }
    }

    /// Focus `target` once the next frame is painted, if it still exists.
    fn schedule_focus(&self, target: FocusTarget, scheduler: &mut dyn Scheduler) {
        let Some(root) = self.root.get() else {
            return;
        };
        let key = match target {
            FocusTarget::Head => HEAD_KEY.to_string(),
            FocusTarget::Option(index) => match self.config.options.get(index) {
                Some(option) => option_key(&option.value),
                None => return,
            },
        };
        scheduler.after_paint(Box::new(move |cx| {
            let Some(node) = cx.dom().find_by_key(root, &key) else {
                trace!(%key, "focus target gone");
                return;
            };
            if let Err(err) = cx.focus(node) {
                trace!(%key, %err, "focus request ignored");
            }
        }));
    }

    fn snapshot(&self) -> Option<SelectState> {
        self.state.try_borrow().ok().map(|state| state.clone())
    }
}

impl FocusSink for Shared {
    fn focus_changed(&self, focused: bool) {
        match self.state.try_borrow_mut() {
            Ok(mut state) => {
                state.set_focused(focused);
            }
            Err(_) => debug!(focused, "select state busy, focus change dropped"),
        }
    }

    fn settle(&self) -> bool {
        if self.root.get().is_none() {
            return false;
        }
        let Ok(mut state) = self.state.try_borrow_mut() else {
            debug!("select state busy, settle check dropped");
            return false;
        };
        let transition = state.settle();
        if transition.changed {
            debug!("select closed after focus left");
        }
        transition.changed
    }
}

/// Build an element handler that is a no-op once the widget is gone.
fn handler(
    shared: &Rc<Shared>,
    f: impl Fn(&Rc<Shared>, &Event, &mut dyn Scheduler) + 'static,
) -> Handler {
    let weak = Rc::downgrade(shared);
    Rc::new(move |event: &Event, scheduler: &mut dyn Scheduler| {
        if let Some(shared) = weak.upgrade() {
            f(&shared, event, scheduler);
        }
    })
}

/// Select/Dropdown widget.
pub struct Select {
    shared: Rc<Shared>,
    initial: Option<String>,
    warnings: Vec<ConfigWarning>,
    tracker: Option<FocusTracker>,
}

impl Select {
    /// Create a select widget.
    ///
    /// The configuration is validated here; see [`Select::warnings`].
    #[must_use]
    pub fn new(config: SelectConfig) -> Self {
        let Validation { initial, warnings } = config.validate();
        Self {
            shared: Rc::new(Shared {
                config,
                state: RefCell::new(SelectState::new(initial.clone())),
                on_select: RefCell::new(None),
                root: Cell::new(None),
            }),
            initial,
            warnings,
            tracker: None,
        }
    }

    /// Call `callback` with the value of every committed selection.
    #[must_use]
    pub fn on_select(self, callback: impl Fn(&str) + 'static) -> Self {
        *self.shared.on_select.borrow_mut() = Some(Rc::new(callback));
        self
    }

    /// Configuration.
    #[must_use]
    pub fn config(&self) -> &SelectConfig {
        &self.shared.config
    }

    /// Warnings found when the widget initialized.
    #[must_use]
    pub fn warnings(&self) -> &[ConfigWarning] {
        &self.warnings
    }

    /// Copy of the current state.
    #[must_use]
    pub fn state(&self) -> SelectState {
        self.shared.snapshot().unwrap_or_default()
    }

    /// Handle for observing the widget after it is handed to a host.
    #[must_use]
    pub fn handle(&self) -> SelectHandle {
        SelectHandle {
            shared: Rc::downgrade(&self.shared),
        }
    }

    fn head(&self, state: &SelectState) -> VNode {
        let shared = &self.shared;
        let label = state.header_label(
            &shared.config.options,
            shared.config.header_label.as_deref(),
        );

        VNode::element("div")
            .key(HEAD_KEY)
            .class("select-head")
            .tab_index(0)
            .text(label)
            .on(
                EventKind::Click,
                handler(shared, |shared, _, scheduler| {
                    shared.update(scheduler, SelectState::toggle);
                }),
            )
            .on(
                EventKind::KeyDown,
                handler(shared, |shared, event, scheduler| match event.key() {
                    Some(Key::Space | Key::Enter) => shared.update(scheduler, SelectState::toggle),
                    Some(Key::Escape) => shared.update(scheduler, |state, _| state.close()),
                    _ => {}
                }),
            )
    }

    fn options(&self, state: &SelectState) -> Vec<VNode> {
        let shared = &self.shared;
        shared
            .config
            .options
            .iter()
            .enumerate()
            .map(|(index, option)| {
                let content = option
                    .content
                    .clone()
                    .unwrap_or_else(|| VNode::text_node(option.display_label()));

                VNode::element("div")
                    .key(option_key(&option.value))
                    .class("select-option")
                    .class_if(
                        state.selected() == Some(option.value.as_str()),
                        "select-option-selected",
                    )
                    .class_if(state.nav_index() == Some(index), "select-option-active")
                    .tab_index(0)
                    .child(content)
                    .on(
                        EventKind::Click,
                        handler(shared, move |shared, _, scheduler| {
                            shared.update(scheduler, |state, options| state.commit(index, options));
                        }),
                    )
                    .on(
                        EventKind::KeyDown,
                        handler(shared, move |shared, event, scheduler| {
                            option_key_down(shared, index, event, scheduler);
                        }),
                    )
            })
            .collect()
    }
}

fn option_key_down(
    shared: &Rc<Shared>,
    index: usize,
    event: &Event,
    scheduler: &mut dyn Scheduler,
) {
    let direction = match event.key() {
        Some(Key::Enter | Key::Space) => {
            shared.update(scheduler, |state, options| state.commit(index, options));
            return;
        }
        Some(Key::Escape) => {
            shared.update(scheduler, |state, _| state.close());
            return;
        }
        Some(Key::ArrowLeft | Key::ArrowUp) => Direction::Previous,
        Some(Key::ArrowRight | Key::ArrowDown) => Direction::Next,
        _ => return,
    };
    shared.update(scheduler, |state, options| state.navigate(index, direction, options));
}

impl Component for Select {
    fn init(&mut self) {
        for warning in &self.warnings {
            warn!(%warning, "select configuration");
        }
        *self.shared.state.borrow_mut() = SelectState::new(self.initial.clone());
    }

    fn view(&self) -> VNode {
        let state = self.state();
        let class = self.shared.config.class.as_deref().unwrap_or("");

        VNode::element("div")
            .class("select")
            .class_list(class)
            .child(self.head(&state))
            .child(
                VNode::element("div")
                    .key("body")
                    .class("select-body")
                    .class_if(state.is_open(), "select-body-open")
                    .child(
                        VNode::element("div")
                            .key("options")
                            .class("select-options")
                            .children(self.options(&state)),
                    ),
            )
    }

    fn create(&mut self, root: NodeId, channel: &FocusChannel) {
        self.shared.root.set(Some(root));
        let sink: Rc<dyn FocusSink> = self.shared.clone();
        self.tracker = Some(FocusTracker::attach(
            channel,
            root,
            Rc::downgrade(&sink),
            self.shared.config.settle_delay(),
        ));
        debug!(?root, "select created");
    }

    fn remove(&mut self) {
        if let Some(mut tracker) = self.tracker.take() {
            tracker.detach();
        }
        self.shared.root.set(None);
        debug!("select removed");
    }
}

impl fmt::Debug for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Select")
            .field("config", &self.shared.config)
            .field("state", &self.shared.snapshot())
            .field("root", &self.shared.root.get())
            .field("initial", &self.initial)
            .field("warnings", &self.warnings)
            .field("tracker", &self.tracker)
            .finish()
    }
}

/// Weak observer of a [`Select`] owned elsewhere.
#[derive(Clone)]
pub struct SelectHandle {
    shared: Weak<Shared>,
}

impl SelectHandle {
    /// Copy of the widget's state, or `None` once the widget is dropped.
    #[must_use]
    pub fn state(&self) -> Option<SelectState> {
        self.shared.upgrade().and_then(|shared| shared.snapshot())
    }

    /// Root element while mounted.
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.shared.upgrade().and_then(|shared| shared.root.get())
    }

    /// Check if the widget is mounted.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.root().is_some()
    }
}

impl fmt::Debug for SelectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectHandle")
            .field("alive", &(self.shared.strong_count() > 0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::SelectOption;
    use selectkit_core::Runtime;
    use std::time::Duration;

    fn colours() -> SelectConfig {
        SelectConfig::new(
            ["red", "blue", "green"]
                .into_iter()
                .map(SelectOption::simple)
                .collect::<Vec<_>>(),
        )
    }

    fn mounted(select: Select) -> (Runtime, SelectHandle, NodeId) {
        let handle = select.handle();
        let mut runtime = Runtime::new();
        runtime.mount(select).unwrap();
        let root = handle.root().unwrap();
        (runtime, handle, root)
    }

    fn option_node(runtime: &Runtime, root: NodeId, value: &str) -> NodeId {
        runtime.dom().find_by_key(root, &option_key(value)).unwrap()
    }

    // =========================================================================
    // Construction Tests
    // =========================================================================

    #[test]
    fn test_new_is_closed_and_unselected() {
        let select = Select::new(colours());
        let state = select.state();
        assert!(!state.is_open());
        assert!(state.selected().is_none());
        assert!(select.warnings().is_empty());
    }

    #[test]
    fn test_new_validates_config() {
        let select = Select::new(colours().initial_value("mars"));
        assert_eq!(
            select.warnings(),
            &[ConfigWarning::InitialValueNotFound {
                value: "mars".to_string()
            }]
        );
        assert!(select.state().selected().is_none());

        let select = Select::new(colours().initial_value("blue"));
        assert!(select.warnings().is_empty());
        assert_eq!(select.state().selected(), Some("blue"));
    }

    #[test]
    fn test_init_resets_to_initial_value() {
        let mut select = Select::new(colours().initial_value("green"));
        select.shared.state.borrow_mut().commit(0, &select.shared.config.options);
        assert_eq!(select.state().selected(), Some("red"));

        select.init();
        assert_eq!(select.state().selected(), Some("green"));
    }

    #[test]
    fn test_init_applies_initial_value() {
        let mut select = Select::new(colours().initial_value("green"));
        select.init();
        assert_eq!(select.state().selected(), Some("green"));
    }

    #[test]
    fn test_init_records_warning() {
        let mut select = Select::new(colours().initial_value("purple"));
        select.init();
        assert!(select.state().selected().is_none());
        assert_eq!(
            select.warnings(),
            &[ConfigWarning::InitialValueNotFound {
                value: "purple".to_string()
            }]
        );
    }

    #[test]
    fn test_option_key() {
        assert_eq!(option_key("red"), "option:red");
    }

    // =========================================================================
    // View Tests
    // =========================================================================

    #[test]
    fn test_view_structure() {
        let select = Select::new(colours().class("app-select"));
        let view = select.view();
        assert_eq!(view.get_classes(), &["select", "app-select"]);

        let head = &view.get_children()[0];
        assert_eq!(head.get_key(), Some(HEAD_KEY));
        assert_eq!(head.get_text(), Some("red"));

        let body = &view.get_children()[1];
        assert_eq!(body.get_classes(), &["select-body"]);
        let options = body.get_children()[0].get_children();
        assert_eq!(options.len(), 3);
        assert_eq!(options[1].get_key(), Some("option:blue"));
    }

    #[test]
    fn test_view_uses_custom_content() {
        let config = SelectConfig::new(vec![
            SelectOption::simple("red").with_content(VNode::element("b").text("RED"))
        ]);
        let view = Select::new(config).view();
        let option = &view.get_children()[1].get_children()[0].get_children()[0];
        assert_eq!(option.get_children()[0].get_tag(), "b");
    }

    // =========================================================================
    // Interaction Tests
    // =========================================================================

    #[test]
    fn test_head_click_opens_and_focuses_first_option() {
        let (mut runtime, handle, root) = mounted(Select::new(colours()));
        let head = runtime.dom().find_by_key(root, HEAD_KEY).unwrap();

        runtime.click(head).unwrap();
        runtime.frame().unwrap();

        assert!(handle.state().unwrap().is_open());
        let body = runtime.dom().find_by_key(root, "body").unwrap();
        assert!(runtime.dom().has_class(body, "select-body-open"));
        assert_eq!(runtime.dom().focused(), Some(option_node(&runtime, root, "red")));
    }

    #[test]
    fn test_option_click_commits_once() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let select =
            Select::new(colours()).on_select(move |v| sink.borrow_mut().push(v.to_string()));
        let (mut runtime, handle, root) = mounted(select);
        let head = runtime.dom().find_by_key(root, HEAD_KEY).unwrap();

        runtime.click(head).unwrap();
        runtime.frame().unwrap();
        runtime.click(option_node(&runtime, root, "blue")).unwrap();
        runtime.frame().unwrap();
        runtime.advance(Duration::from_millis(100));
        runtime.frame().unwrap();

        assert_eq!(*seen.borrow(), vec!["blue".to_string()]);
        let state = handle.state().unwrap();
        assert_eq!(state.selected(), Some("blue"));
        assert!(!state.is_open());
        assert_eq!(runtime.dom().focused(), Some(head));
        assert_eq!(runtime.dom().text(head), Some("blue"));
    }

    #[test]
    fn test_remove_detaches_tracker() {
        let select = Select::new(colours());
        let handle = select.handle();
        let mut runtime = Runtime::new();
        let id = runtime.mount(select).unwrap();
        assert_eq!(runtime.channel().listener_count(), 2);

        runtime.unmount(id).unwrap();
        assert_eq!(runtime.channel().listener_count(), 0);
        assert!(!handle.is_mounted());
        assert!(handle.state().is_none());
    }
}
