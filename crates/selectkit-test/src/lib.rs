#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::new_without_default)]
//! Testing harness for selectkit components.
//!
//! ```ignore
//! use selectkit_test::Harness;
//!
//! let mut harness = Harness::new(Select::new(config));
//! harness.click(".select-head").tick(50);
//! harness.assert_class(".select-body", "select-body-open");
//! ```

pub mod fixture;
mod harness;
mod selector;

pub use fixture::{SelectionLog, COLOURS, COUNTRIES};
pub use harness::Harness;
pub use selector::{Selector, SelectorError, SelectorParser};
