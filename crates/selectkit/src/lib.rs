//! selectkit: a dropdown select widget for component-based UIs.
//!
//! Opens on click or Space/Enter, commits on click or Enter, navigates with
//! the arrow keys (wrapping) and closes once focus has left the widget for
//! longer than a short settle window.
//!
//! ```ignore
//! use selectkit::{Runtime, widgets::{Select, SelectConfig, SelectOption}};
//!
//! let config = SelectConfig::new(vec![
//!     SelectOption::new("red", "Red"),
//!     SelectOption::new("blue", "Blue"),
//! ])
//! .header_label("Pick a colour");
//!
//! let mut runtime = Runtime::new();
//! runtime.mount(Select::new(config).on_select(|value| println!("{value}")))?;
//! ```

pub use selectkit_core::*;
pub use selectkit_widgets as widgets;

pub use selectkit_widgets::{Select, SelectConfig, SelectHandle, SelectOption};
