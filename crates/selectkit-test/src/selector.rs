//! CSS-like selector parsing for element queries.
//!
//! Supports:
//! - `"div"` - by tag
//! - `"#head"` - by reconciliation key
//! - `".select-option"` - by class
//! - `"[tabindex='0']"`, `"[key='option:red']"`, `"[text='Red']"`, `"[tabindex]"` - by attribute
//! - `"div.select-option.select-option-selected"` - compound
//! - `".app-select .select-head"` - descendant
//! - `".select-options > div"` - child

use selectkit_core::{Dom, NodeId};
use thiserror::Error;

/// Parsed selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Match by tag name
    Tag(String),
    /// Match by key (e.g., `#head`)
    Key(String),
    /// Match by class (e.g., `.my-class`)
    Class(String),
    /// Match by attribute (e.g., `[tabindex='0']`), or presence when no value is given
    Attribute {
        /// One of `key`, `tabindex`, `text`
        name: String,
        /// Required value
        value: Option<String>,
    },
    /// Every part matches the same element (e.g., `div.open`)
    Compound(Vec<Selector>),
    /// Descendant combinator (e.g., `.select .select-head`)
    Descendant(Box<Selector>, Box<Selector>),
    /// Child combinator (e.g., `.select-options > div`)
    Child(Box<Selector>, Box<Selector>),
}

impl Selector {
    /// Parse a selector string.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        SelectorParser::new(input).parse()
    }

    /// Check if this selector matches `node`.
    ///
    /// The document node itself never matches.
    #[must_use]
    pub fn matches(&self, dom: &Dom, node: NodeId) -> bool {
        if node == NodeId::DOCUMENT || !dom.exists(node) {
            return false;
        }
        match self {
            Self::Tag(name) => dom.tag(node) == Some(name.as_str()),
            Self::Key(key) => dom.key(node) == Some(key.as_str()),
            Self::Class(class) => dom.has_class(node, class),
            Self::Attribute { name, value } => {
                let actual = match name.as_str() {
                    "key" => dom.key(node).map(str::to_string),
                    "tabindex" => dom.tab_index(node).map(|i| i.to_string()),
                    "text" => Some(dom.text_content(node)),
                    _ => None,
                };
                match (actual, value) {
                    (Some(actual), Some(expected)) => actual == *expected,
                    (Some(_), None) => true,
                    (None, _) => false,
                }
            }
            Self::Compound(parts) => parts.iter().all(|part| part.matches(dom, node)),
            Self::Descendant(ancestor, selector) => {
                selector.matches(dom, node)
                    && std::iter::successors(dom.parent(node), |&id| dom.parent(id))
                        .any(|id| ancestor.matches(dom, id))
            }
            Self::Child(parent, selector) => {
                selector.matches(dom, node)
                    && dom.parent(node).is_some_and(|p| parent.matches(dom, p))
            }
        }
    }
}

/// Selector parser.
#[derive(Debug)]
pub struct SelectorParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> SelectorParser<'a> {
    /// Create a new parser.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Parse the selector.
    pub fn parse(&mut self) -> Result<Selector, SelectorError> {
        self.skip_whitespace();
        if self.peek_char().is_none() {
            return Err(SelectorError::Empty);
        }

        let mut selector = self.parse_compound()?;
        loop {
            let had_space = self.skip_whitespace();
            match self.peek_char() {
                None => return Ok(selector),
                Some('>') => {
                    self.advance();
                    self.skip_whitespace();
                    let right = self.parse_compound()?;
                    selector = Selector::Child(Box::new(selector), Box::new(right));
                }
                Some(_) if had_space => {
                    let right = self.parse_compound()?;
                    selector = Selector::Descendant(Box::new(selector), Box::new(right));
                }
                Some(c) => return Err(SelectorError::UnexpectedChar(c)),
            }
        }
    }

    fn parse_compound(&mut self) -> Result<Selector, SelectorError> {
        let mut parts = vec![self.parse_simple()?];
        while matches!(self.peek_char(), Some('#' | '.' | '[')) {
            parts.push(self.parse_simple()?);
        }
        if parts.len() == 1 {
            Ok(parts.remove(0))
        } else {
            Ok(Selector::Compound(parts))
        }
    }

    fn parse_simple(&mut self) -> Result<Selector, SelectorError> {
        let first = self.peek_char().ok_or(SelectorError::ExpectedIdentifier)?;

        match first {
            '#' => {
                self.advance();
                Ok(Selector::Key(self.read_identifier()?))
            }
            '.' => {
                self.advance();
                Ok(Selector::Class(self.read_identifier()?))
            }
            '[' => self.parse_attribute(),
            _ if first.is_alphabetic() => Ok(Selector::Tag(self.read_identifier()?)),
            _ => Err(SelectorError::UnexpectedChar(first)),
        }
    }

    fn parse_attribute(&mut self) -> Result<Selector, SelectorError> {
        self.advance(); // '['

        let name = self.read_until_any(&['=', ']']).trim().to_string();
        if name.is_empty() {
            return Err(SelectorError::InvalidAttribute);
        }

        let value = if self.peek_char() == Some('=') {
            self.advance();
            let quote = self.peek_char().filter(|c| *c == '\'' || *c == '"');
            if let Some(quote) = quote {
                self.advance();
                let value = self.read_until_any(&[quote]);
                if self.peek_char() != Some(quote) {
                    return Err(SelectorError::UnclosedAttribute);
                }
                self.advance();
                Some(value)
            } else {
                Some(self.read_until_any(&[']']))
            }
        } else {
            None
        };

        if self.peek_char() != Some(']') {
            return Err(SelectorError::UnclosedAttribute);
        }
        self.advance();

        Ok(Selector::Attribute { name, value })
    }

    fn read_identifier(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | ':') {
                self.advance();
            } else {
                break;
            }
        }

        if self.pos == start {
            return Err(SelectorError::ExpectedIdentifier);
        }

        Ok(self.input[start..self.pos].to_string())
    }

    fn read_until_any(&mut self, stops: &[char]) -> String {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if stops.contains(&c) {
                break;
            }
            self.advance();
        }
        self.input[start..self.pos].to_string()
    }

    /// Returns `true` if anything was skipped.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
        self.pos != start
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }
}

/// Selector parsing error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// Empty selector
    #[error("empty selector")]
    Empty,
    /// Unexpected character
    #[error("unexpected character: '{0}'")]
    UnexpectedChar(char),
    /// Expected identifier
    #[error("expected identifier")]
    ExpectedIdentifier,
    /// Invalid attribute syntax
    #[error("invalid attribute syntax")]
    InvalidAttribute,
    /// Unclosed attribute bracket or quote
    #[error("unclosed attribute bracket")]
    UnclosedAttribute,
}
