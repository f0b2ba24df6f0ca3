//! Dropdown select widget for selectkit.
//!
//! - [`OptionList`] / [`SelectOption`]: the options offered
//! - [`SelectState`]: open/closed, selection and keyboard navigation
//! - [`FocusTracker`]: closes the dropdown once focus has really left
//! - [`Select`]: the component tying them to a view

pub mod config;
pub mod error;
pub mod focus_tracker;
pub mod option;
pub mod select;
pub mod select_state;

pub use config::{InitialValue, SelectConfig, Validation, DEFAULT_SETTLE_DELAY_MS};
pub use error::{ConfigError, ConfigWarning};
pub use focus_tracker::{FocusSink, FocusTracker, DEFAULT_SETTLE_DELAY};
pub use option::{OptionList, SelectOption};
pub use select::{option_key, Select, SelectHandle, HEAD_KEY};
pub use select_state::{wrap_index, Direction, FocusTarget, SelectState, Transition};
