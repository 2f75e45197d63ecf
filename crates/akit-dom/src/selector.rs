//! Selector Matching
//!
//! Compound selectors only: `tag`, `*`, `#id`, `.class`, `[attr]`,
//! `[attr="value"]` and `:not(<compound>)`, optionally joined into a
//! comma-separated list. Combinators are not supported.

use crate::{DomError, DomResult, ElementData};

/// Parsed selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    compounds: Vec<Compound>,
}

/// One compound selector (all parts must match)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    parts: Vec<SimpleSelector>,
}

/// Simple selector component
#[derive(Debug, Clone, PartialEq, Eq)]
enum SimpleSelector {
    Universal,
    Tag(String),
    Id(String),
    Class(String),
    HasAttr(String),
    AttrEquals(String, String),
    Not(Box<Compound>),
}

impl Selector {
    /// Parse a selector list
    pub fn parse(input: &str) -> DomResult<Self> {
        let mut parser = Parser {
            source: input,
            chars: input.char_indices().peekable(),
        };

        let mut compounds = Vec::new();
        loop {
            parser.skip_whitespace();
            compounds.push(parser.compound()?);
            parser.skip_whitespace();
            match parser.next() {
                None => break,
                Some(',') => continue,
                Some(c) => return Err(parser.error(format!("unexpected `{c}`"))),
            }
        }

        Ok(Self { compounds })
    }

    /// Check an element against the selector list
    pub fn matches(&self, element: &ElementData) -> bool {
        self.compounds.iter().any(|c| c.matches(element))
    }
}

impl std::str::FromStr for Selector {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Compound {
    fn matches(&self, element: &ElementData) -> bool {
        self.parts.iter().all(|part| part.matches(element))
    }
}

impl SimpleSelector {
    fn matches(&self, element: &ElementData) -> bool {
        match self {
            Self::Universal => true,
            Self::Tag(tag) => element.tag.eq_ignore_ascii_case(tag),
            Self::Id(id) => element.get_attr("id") == Some(id.as_str()),
            Self::Class(class) => element.classes().any(|c| c == class),
            Self::HasAttr(name) => element.attrs.contains(name),
            Self::AttrEquals(name, value) => element.get_attr(name) == Some(value.as_str()),
            Self::Not(inner) => !inner.matches(element),
        }
    }
}

struct Parser<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl Parser<'_> {
    fn error(&self, reason: impl Into<String>) -> DomError {
        DomError::InvalidSelector {
            selector: self.source.to_string(),
            reason: reason.into(),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn next(&mut self) -> Option<char> {
        self.chars.next().map(|(_, c)| c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.next();
        }
    }

    fn expect(&mut self, expected: char) -> DomResult<()> {
        match self.next() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(self.error(format!("expected `{expected}`, found `{c}`"))),
            None => Err(self.error(format!("expected `{expected}`"))),
        }
    }

    fn ident(&mut self) -> DomResult<String> {
        let mut ident = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                ident.push(c);
                self.next();
            } else {
                break;
            }
        }
        if ident.is_empty() {
            return Err(self.error("expected identifier"));
        }
        Ok(ident)
    }

    fn compound(&mut self) -> DomResult<Compound> {
        let mut compound = Compound::default();

        match self.peek() {
            Some('*') => {
                self.next();
                compound.parts.push(SimpleSelector::Universal);
            }
            Some(c) if c.is_alphabetic() => {
                compound.parts.push(SimpleSelector::Tag(self.ident()?.to_ascii_lowercase()));
            }
            _ => {}
        }

        while let Some(c) = self.peek() {
            let part = match c {
                '#' => {
                    self.next();
                    SimpleSelector::Id(self.ident()?)
                }
                '.' => {
                    self.next();
                    SimpleSelector::Class(self.ident()?)
                }
                '[' => {
                    self.next();
                    self.attribute()?
                }
                ':' => {
                    self.next();
                    let pseudo = self.ident()?;
                    if pseudo != "not" {
                        return Err(self.error(format!("unsupported pseudo-class `:{pseudo}`")));
                    }
                    self.expect('(')?;
                    self.skip_whitespace();
                    let inner = self.compound()?;
                    self.skip_whitespace();
                    self.expect(')')?;
                    SimpleSelector::Not(Box::new(inner))
                }
                _ => break,
            };
            compound.parts.push(part);
        }

        if compound.parts.is_empty() {
            return Err(self.error("empty compound selector"));
        }
        Ok(compound)
    }

    fn attribute(&mut self) -> DomResult<SimpleSelector> {
        self.skip_whitespace();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_whitespace();

        if self.peek() == Some(']') {
            self.next();
            return Ok(SimpleSelector::HasAttr(name));
        }

        self.expect('=')?;
        self.skip_whitespace();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.next();
                let mut value = String::new();
                loop {
                    match self.next() {
                        Some(c) if c == quote => break,
                        Some(c) => value.push(c),
                        None => return Err(self.error("unterminated string")),
                    }
                }
                value
            }
            _ => self.ident()?,
        };
        self.skip_whitespace();
        self.expect(']')?;

        Ok(SimpleSelector::AttrEquals(name, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(tag: &str, attrs: &[(&str, &str)]) -> ElementData {
        let mut data = ElementData::new(tag);
        for (name, value) in attrs {
            data.attrs.set(name, value);
        }
        data
    }

    #[test]
    fn test_attribute_selectors() {
        let tab = element("button", &[("role", "tab"), ("aria-selected", "true")]);

        assert!(Selector::parse(r#"[role="tab"]"#).unwrap().matches(&tab));
        assert!(Selector::parse("[aria-selected]").unwrap().matches(&tab));
        assert!(Selector::parse("button[role='tab']").unwrap().matches(&tab));
        assert!(!Selector::parse(r#"[role="tabpanel"]"#).unwrap().matches(&tab));
    }

    #[test]
    fn test_not_selector() {
        let region = element("div", &[("role", "region")]);
        let title = element("h3", &[]);
        let selector = Selector::parse(r#":not([role="region"])"#).unwrap();

        assert!(!selector.matches(&region));
        assert!(selector.matches(&title));
    }

    #[test]
    fn test_id_class_and_list() {
        let el = element("li", &[("id", "first"), ("class", "item open")]);

        assert!(Selector::parse("#first").unwrap().matches(&el));
        assert!(Selector::parse("li.open").unwrap().matches(&el));
        assert!(Selector::parse("span, .item").unwrap().matches(&el));
        assert!(Selector::parse("*").unwrap().matches(&el));
    }

    #[test]
    fn test_invalid_selectors() {
        for input in ["", "[role=", "div > p", ":hover", "[=x]", "a,"] {
            assert!(
                matches!(Selector::parse(input), Err(DomError::InvalidSelector { .. })),
                "{input:?} should not parse"
            );
        }
    }
}
