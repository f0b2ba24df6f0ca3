//! Options offered by a select widget.

use selectkit_core::VNode;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A selectable option.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectOption {
    /// Unique value for this option
    pub value: String,
    /// Display label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Custom content shown instead of the label
    #[serde(skip)]
    pub content: Option<VNode>,
}

impl SelectOption {
    /// Create a new option.
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: Some(label.into()),
            content: None,
        }
    }

    /// Create an option where value equals label.
    #[must_use]
    pub fn simple(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            value: text.clone(),
            label: Some(text),
            content: None,
        }
    }

    /// Create an option with no label.
    #[must_use]
    pub fn unlabeled(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: None,
            content: None,
        }
    }

    /// Show custom content instead of the label.
    #[must_use]
    pub fn with_content(mut self, content: VNode) -> Self {
        self.content = Some(content);
        self
    }

    /// Label, or the empty string if the option has none.
    #[must_use]
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or("")
    }
}

/// Ordered, immutable list of options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionList {
    options: Vec<SelectOption>,
}

impl OptionList {
    /// Create a list from options in display order.
    #[must_use]
    pub fn new(options: Vec<SelectOption>) -> Self {
        Self { options }
    }

    /// First option with exactly this value.
    #[must_use]
    pub fn find(&self, value: &str) -> Option<&SelectOption> {
        self.options.iter().find(|o| o.value == value)
    }

    /// Index of the first option with exactly this value.
    #[must_use]
    pub fn position(&self, value: &str) -> Option<usize> {
        self.options.iter().position(|o| o.value == value)
    }

    /// Option at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SelectOption> {
        self.options.get(index)
    }

    /// Number of options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Check if there are no options.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Iterate in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, SelectOption> {
        self.options.iter()
    }

    /// Values used by more than one option, each reported once in order of
    /// first repetition.
    #[must_use]
    pub fn duplicate_values(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        self.options
            .iter()
            .map(|o| o.value.as_str())
            .filter(|value| !seen.insert(*value) && reported.insert(*value))
            .collect()
    }
}

impl From<Vec<SelectOption>> for OptionList {
    fn from(options: Vec<SelectOption>) -> Self {
        Self::new(options)
    }
}

impl FromIterator<SelectOption> for OptionList {
    fn from_iter<I: IntoIterator<Item = SelectOption>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a OptionList {
    type Item = &'a SelectOption;
    type IntoIter = std::slice::Iter<'a, SelectOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colours() -> OptionList {
        ["red", "blue", "green"]
            .into_iter()
            .map(SelectOption::simple)
            .collect()
    }

    // =========================================================================
    // SelectOption Tests
    // =========================================================================

    #[test]
    fn test_select_option_new() {
        let opt = SelectOption::new("uk", "United Kingdom");
        assert_eq!(opt.value, "uk");
        assert_eq!(opt.display_label(), "United Kingdom");
        assert!(opt.content.is_none());
    }

    #[test]
    fn test_select_option_simple() {
        let opt = SelectOption::simple("red");
        assert_eq!(opt.value, "red");
        assert_eq!(opt.label.as_deref(), Some("red"));
    }

    #[test]
    fn test_unlabeled_displays_empty() {
        assert_eq!(SelectOption::unlabeled("x").display_label(), "");
    }

    #[test]
    fn test_with_content() {
        let opt = SelectOption::simple("red").with_content(VNode::element("span").text("R"));
        assert_eq!(opt.content.as_ref().map(VNode::get_tag), Some("span"));
    }

    #[test]
    fn test_option_json_skips_content() {
        let opt = SelectOption::simple("red").with_content(VNode::element("span"));
        let json = serde_json::to_string(&opt).unwrap();
        assert_eq!(json, r#"{"value":"red","label":"red"}"#);

        let back: SelectOption = serde_json::from_str(r#"{"value":"blue"}"#).unwrap();
        assert_eq!(back.value, "blue");
        assert!(back.label.is_none());
    }

    // =========================================================================
    // OptionList Tests
    // =========================================================================

    #[test]
    fn test_find_exact_match() {
        let options = colours();
        assert_eq!(options.find("blue").map(|o| o.value.as_str()), Some("blue"));
        assert!(options.find("Blue").is_none());
        assert!(options.find("").is_none());
    }

    #[test]
    fn test_position_and_get() {
        let options = colours();
        assert_eq!(options.position("green"), Some(2));
        assert_eq!(options.get(0).map(|o| o.value.as_str()), Some("red"));
        assert!(options.get(3).is_none());
        assert_eq!(options.len(), 3);
        assert!(!options.is_empty());
    }

    #[test]
    fn test_iteration_order() {
        let options = colours();
        let values: Vec<&str> = (&options).into_iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["red", "blue", "green"]);
    }

    #[test]
    fn test_empty_list() {
        let options = OptionList::default();
        assert!(options.is_empty());
        assert!(options.find("red").is_none());
    }

    #[test]
    fn test_duplicates_first_wins() {
        let options = OptionList::new(vec![
            SelectOption::new("a", "First"),
            SelectOption::new("b", "B"),
            SelectOption::new("a", "Second"),
            SelectOption::new("a", "Third"),
        ]);
        assert_eq!(options.duplicate_values(), vec!["a"]);
        assert_eq!(options.find("a").map(SelectOption::display_label), Some("First"));
        assert_eq!(options.position("a"), Some(0));
    }
}
