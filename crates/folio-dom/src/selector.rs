//! Selector matching
//!
//! The subset of CSS selectors element queries need: comma lists of
//! compound selectors built from type, `#id`, `.class`, attribute tests and
//! `:not()`. Combinators are rejected.

use crate::{DomError, ElementData, Result};

/// Attribute selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    pub name: String,
    pub matcher: Option<AttributeMatcher>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeMatcher {
    /// [attr=value] - exact match
    Exact(String),
    /// [attr~=value] - whitespace-separated list contains
    Contains(String),
    /// [attr^=value] - starts with
    Prefix(String),
    /// [attr$=value] - ends with
    Suffix(String),
    /// [attr*=value] - contains substring
    Substring(String),
}

impl AttributeSelector {
    /// `[name]`
    pub fn exists(name: &str) -> Self {
        Self { name: name.to_ascii_lowercase(), matcher: None }
    }

    /// Check if an attribute value matches
    pub fn matches(&self, value: Option<&str>) -> bool {
        match (&self.matcher, value) {
            (None, Some(_)) => true,
            (_, None) => false,
            (Some(matcher), Some(val)) => match matcher {
                AttributeMatcher::Exact(expected) => val == expected,
                AttributeMatcher::Contains(expected) => val.split_whitespace().any(|w| w == expected),
                AttributeMatcher::Prefix(expected) => !expected.is_empty() && val.starts_with(expected),
                AttributeMatcher::Suffix(expected) => !expected.is_empty() && val.ends_with(expected),
                AttributeMatcher::Substring(expected) => !expected.is_empty() && val.contains(expected),
            },
        }
    }

    fn matches_element(&self, element: &ElementData) -> bool {
        if self.name == "class" {
            let value = element.classes.value();
            return self.matches(element.has_attr("class").then_some(value.as_str()));
        }
        self.matches(element.get_attr(&self.name))
    }
}

/// Compound selector such as `button:not([disabled])`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundSelector {
    /// Type selector; `None` is the universal selector
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<AttributeSelector>,
    pub negations: Vec<CompoundSelector>,
}

impl CompoundSelector {
    /// `.name`
    pub fn class(name: &str) -> Self {
        Self { classes: vec![name.to_string()], ..Self::default() }
    }

    /// `tag`
    pub fn tag(tag: &str) -> Self {
        Self { tag: Some(tag.to_ascii_lowercase()), ..Self::default() }
    }

    /// Add an attribute test
    pub fn with_attribute(mut self, attribute: AttributeSelector) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn matches(&self, element: &ElementData) -> bool {
        if let Some(tag) = &self.tag {
            if !element.is(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.id() != Some(id.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|c| element.classes.contains(c))
            && self.attributes.iter().all(|a| a.matches_element(element))
            && !self.negations.iter().any(|n| n.matches(element))
    }
}

/// Comma-separated selector list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorList {
    pub selectors: Vec<CompoundSelector>,
}

impl SelectorList {
    pub fn new(selectors: Vec<CompoundSelector>) -> Self {
        Self { selectors }
    }

    /// Parse a selector list
    pub fn parse(input: &str) -> Result<Self> {
        let mut parser = Parser { input, chars: input.chars().collect(), pos: 0 };
        let mut selectors = Vec::new();
        loop {
            parser.skip_whitespace();
            selectors.push(parser.compound()?);
            parser.skip_whitespace();
            match parser.bump() {
                None => break,
                Some(',') => continue,
                Some(_) => return Err(parser.error("combinators are not supported")),
            }
        }
        Ok(Self { selectors })
    }

    /// True when any selector in the list matches
    pub fn matches(&self, element: &ElementData) -> bool {
        self.selectors.iter().any(|s| s.matches(element))
    }
}

struct Parser<'a> {
    input: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl Parser<'_> {
    fn error(&self, reason: &str) -> DomError {
        DomError::InvalidSelector {
            selector: self.input.to_string(),
            reason: format!("{} at offset {}", reason, self.pos),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, expected: &str) -> bool {
        let end = self.pos + expected.chars().count();
        if end <= self.chars.len() && self.chars[self.pos..end].iter().copied().eq(expected.chars()) {
            self.pos = end;
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn ident(&mut self) -> Result<String> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '-' || c == '_') {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.error("expected identifier"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn compound(&mut self) -> Result<CompoundSelector> {
        let mut selector = CompoundSelector::default();
        let mut parts = 0;

        if self.eat('*') {
            parts += 1;
        } else if self.peek().is_some_and(|c| c.is_alphabetic()) {
            selector.tag = Some(self.ident()?.to_ascii_lowercase());
            parts += 1;
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    selector.id = Some(self.ident()?);
                }
                Some('.') => {
                    self.pos += 1;
                    selector.classes.push(self.ident()?);
                }
                Some('[') => {
                    self.pos += 1;
                    selector.attributes.push(self.attribute()?);
                }
                Some(':') => {
                    self.pos += 1;
                    if !self.eat_str("not(") {
                        return Err(self.error("only :not() is supported"));
                    }
                    self.skip_whitespace();
                    let inner = self.compound()?;
                    self.skip_whitespace();
                    if !self.eat(')') {
                        return Err(self.error("unterminated :not("));
                    }
                    selector.negations.push(inner);
                }
                _ => break,
            }
            parts += 1;
        }

        if parts == 0 {
            return Err(self.error("empty selector"));
        }
        Ok(selector)
    }

    fn attribute(&mut self) -> Result<AttributeSelector> {
        self.skip_whitespace();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_whitespace();

        if self.eat(']') {
            return Ok(AttributeSelector { name, matcher: None });
        }

        let op = match self.bump() {
            Some('=') => None,
            Some(c @ ('^' | '$' | '*' | '~')) if self.eat('=') => Some(c),
            _ => return Err(self.error("expected attribute operator")),
        };
        self.skip_whitespace();
        let value = self.attribute_value()?;
        self.skip_whitespace();
        if !self.eat(']') {
            return Err(self.error("unterminated attribute selector"));
        }

        let matcher = match op {
            None => AttributeMatcher::Exact(value),
            Some('^') => AttributeMatcher::Prefix(value),
            Some('$') => AttributeMatcher::Suffix(value),
            Some('*') => AttributeMatcher::Substring(value),
            Some(_) => AttributeMatcher::Contains(value),
        };
        Ok(AttributeSelector { name, matcher: Some(matcher) })
    }

    fn attribute_value(&mut self) -> Result<String> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let start = self.pos;
                while self.peek().is_some_and(|c| c != quote) {
                    self.pos += 1;
                }
                let value = self.chars[start..self.pos].iter().collect();
                if !self.eat(quote) {
                    return Err(self.error("unterminated string"));
                }
                Ok(value)
            }
            _ => self.ident(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(tag: &str, attrs: &[(&str, &str)]) -> ElementData {
        let mut el = ElementData::new(tag);
        for (name, value) in attrs {
            el.set_attr(name, value);
        }
        el
    }

    #[test]
    fn test_parse_focusable_list() {
        let list = SelectorList::parse(
            "a[href], button:not([disabled]), textarea:not([disabled]), input:not([disabled]), select:not([disabled]), [tabindex]:not([tabindex=\"-1\"])",
        )
        .unwrap();
        assert_eq!(list.selectors.len(), 6);

        assert!(list.matches(&element("a", &[("href", "#top")])));
        assert!(!list.matches(&element("a", &[])));
        assert!(list.matches(&element("button", &[])));
        assert!(!list.matches(&element("button", &[("disabled", "")])));
        assert!(list.matches(&element("div", &[("tabindex", "0")])));
        assert!(!list.matches(&element("div", &[("tabindex", "-1")])));
    }

    #[test]
    fn test_prefix_match() {
        let list = SelectorList::parse("a[href^='#']").unwrap();
        assert!(list.matches(&element("a", &[("href", "#projects")])));
        assert!(!list.matches(&element("a", &[("href", "https://example.com")])));
    }

    #[test]
    fn test_class_and_id() {
        let list = SelectorList::parse("section#about.fade-up").unwrap();
        let mut el = element("section", &[("id", "about")]);
        assert!(!list.matches(&el));
        el.classes.add("fade-up");
        assert!(list.matches(&el));
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in ["", "div p", "[href", ".", "a:hover", "[x^]", "a,"] {
            assert!(
                matches!(SelectorList::parse(bad), Err(DomError::InvalidSelector { .. })),
                "accepted {bad:?}"
            );
        }
    }
}
