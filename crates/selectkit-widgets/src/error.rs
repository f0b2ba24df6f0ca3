//! Configuration diagnostics.

use thiserror::Error;

/// Non-fatal problems found while validating a [`SelectConfig`].
///
/// Warnings are logged when a widget initializes and kept for inspection;
/// the widget keeps working with the offending setting ignored.
///
/// [`SelectConfig`]: crate::SelectConfig
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigWarning {
    /// The initial value is present but is not a string.
    #[error("initial value must be a string")]
    InitialValueNotString,

    /// No option carries the initial value.
    #[error("initial value {value:?} does not exist in options")]
    InitialValueNotFound {
        /// The requested value
        value: String,
    },

    /// Two or more options share a value. Lookups resolve to the first.
    #[error("option value {value:?} is used more than once")]
    DuplicateValue {
        /// The repeated value
        value: String,
    },
}

/// Errors loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Malformed JSON or a shape that does not match the configuration.
    #[error("invalid select configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
