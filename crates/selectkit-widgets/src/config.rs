//! Select widget configuration.
//!
//! A [`SelectConfig`] is fixed for the lifetime of a widget instance. It can
//! be built in code or loaded from JSON:
//!
//! ```json
//! {
//!   "options": [{ "value": "red", "label": "Red" }],
//!   "header_label": "Pick a colour",
//!   "initial_value": "red",
//!   "class": "app-select"
//! }
//! ```

use crate::error::{ConfigError, ConfigWarning};
use crate::option::{OptionList, SelectOption};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default settle window in milliseconds.
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 50;

const fn default_settle_delay_ms() -> u64 {
    DEFAULT_SETTLE_DELAY_MS
}

/// Requested initial value as supplied by the caller.
///
/// Only a string can name an option. Anything else is kept so that it can be
/// reported instead of silently dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InitialValue {
    /// A value to look up among the options
    Text(String),
    /// Any other JSON value
    Other(serde_json::Value),
}

impl InitialValue {
    /// Empty strings, `false`, zero and `null` request nothing.
    fn is_set(&self) -> bool {
        match self {
            Self::Text(text) => !text.is_empty(),
            Self::Other(value) => match value {
                serde_json::Value::Null | serde_json::Value::Bool(false) => false,
                serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
                _ => true,
            },
        }
    }
}

impl From<&str> for InitialValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for InitialValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<serde_json::Value> for InitialValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(text) => Self::Text(text),
            other => Self::Other(other),
        }
    }
}

/// Outcome of validating a configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    /// Value to select at mount, if the initial value was usable
    pub initial: Option<String>,
    /// Problems found, in discovery order
    pub warnings: Vec<ConfigWarning>,
}

/// Configuration of one select widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectConfig {
    /// Options in display order
    #[serde(default)]
    pub options: OptionList,
    /// Header text shown while nothing is selected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_label: Option<String>,
    /// Value to select at mount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_value: Option<InitialValue>,
    /// Extra class on the root element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// Settle window after a blur before the dropdown closes
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self::new(OptionList::default())
    }
}

impl SelectConfig {
    /// Create a configuration with the given options.
    #[must_use]
    pub fn new(options: impl Into<OptionList>) -> Self {
        Self {
            options: options.into(),
            header_label: None,
            initial_value: None,
            class: None,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
        }
    }

    /// Load a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set options.
    #[must_use]
    pub fn options(mut self, options: impl IntoIterator<Item = SelectOption>) -> Self {
        self.options = options.into_iter().collect();
        self
    }

    /// Set the header label.
    #[must_use]
    pub fn header_label(mut self, label: impl Into<String>) -> Self {
        self.header_label = Some(label.into());
        self
    }

    /// Set the initial value.
    #[must_use]
    pub fn initial_value(mut self, value: impl Into<InitialValue>) -> Self {
        self.initial_value = Some(value.into());
        self
    }

    /// Set an extra class for the root element.
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Set the settle window.
    #[must_use]
    pub const fn settle_delay_ms(mut self, millis: u64) -> Self {
        self.settle_delay_ms = millis;
        self
    }

    /// Settle window as a duration.
    #[must_use]
    pub const fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Check the configuration and resolve the initial selection.
    #[must_use]
    pub fn validate(&self) -> Validation {
        let mut warnings: Vec<ConfigWarning> = self
            .options
            .duplicate_values()
            .into_iter()
            .map(|value| ConfigWarning::DuplicateValue {
                value: value.to_string(),
            })
            .collect();

        let initial = match &self.initial_value {
            Some(requested) if requested.is_set() => match requested {
                InitialValue::Text(value) if self.options.find(value).is_some() => {
                    Some(value.clone())
                }
                InitialValue::Text(value) => {
                    warnings.push(ConfigWarning::InitialValueNotFound {
                        value: value.clone(),
                    });
                    None
                }
                InitialValue::Other(_) => {
                    warnings.push(ConfigWarning::InitialValueNotString);
                    None
                }
            },
            _ => None,
        };

        Validation { initial, warnings }
    }
}
