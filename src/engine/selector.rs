//! Selector parser and matcher.
//!
//! Supports the subset of CSS selectors the declarative contract needs:
//! - type (`div`), universal (`*`), `#id`, `.class`
//! - `[attr]`, `[attr=value]`, `[attr="value"]`, `[attr='value']`
//! - descendant (whitespace) and child (`>`) combinators
//! - selector lists (`a, button`)
//!
//! Backslash escapes a single character inside identifiers and quoted
//! values, so escaped ids (`#sign\.up`) resolve like `CSS.escape` output.

use crate::error::SelectorError;
use crate::types::NodeId;

use super::document::Document;

// =============================================================================
// Types
// =============================================================================

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Complex>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    /// Leftmost compound first.
    compounds: Vec<Compound>,
    /// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`.
    combinators: Vec<Combinator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Compound {
    tag: Option<String>,
    simples: Vec<Simple>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Simple {
    Id(String),
    Class(String),
    Attr { name: String, value: Option<String> },
}

// =============================================================================
// Parser
// =============================================================================

struct Parser<'a> {
    input: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().collect(),
            pos: 0,
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

    /// Skip whitespace. Returns true if any was skipped.
    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(found) => SelectorError::Unexpected {
                input: self.input.to_string(),
                offset: self.pos,
                found,
            },
            None => SelectorError::UnexpectedEnd {
                input: self.input.to_string(),
            },
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), SelectorError> {
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn is_ident_char(c: char) -> bool {
        c.is_alphanumeric() || c == '-' || c == '_' || c == '\\' || !c.is_ascii()
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if !Self::is_ident_char(c) {
                break;
            }
            self.pos += 1;
            if c == '\\' {
                let escaped = self.bump().ok_or_else(|| self.unexpected())?;
                out.push(escaped);
            } else {
                out.push(c);
            }
        }
        if out.is_empty() {
            return Err(self.unexpected());
        }
        Ok(out)
    }

    fn quoted(&mut self, quote: char) -> Result<String, SelectorError> {
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.unexpected()),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => {
                    let escaped = self.bump().ok_or_else(|| self.unexpected())?;
                    out.push(escaped);
                }
                Some(c) => out.push(c),
            }
        }
    }

    fn list(&mut self) -> Result<Selector, SelectorError> {
        let mut alternatives = Vec::new();
        loop {
            self.skip_ws();
            alternatives.push(self.complex()?);
            self.skip_ws();
            match self.peek() {
                None => break,
                Some(',') => self.pos += 1,
                Some(_) => return Err(self.unexpected()),
            }
        }
        Ok(Selector { alternatives })
    }

    fn complex(&mut self) -> Result<Complex, SelectorError> {
        let mut compounds = vec![self.compound()?];
        let mut combinators = Vec::new();
        loop {
            let had_ws = self.skip_ws();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.pos += 1;
                    self.skip_ws();
                    Combinator::Child
                }
                Some(_) if had_ws => Combinator::Descendant,
                Some(_) => return Err(self.unexpected()),
            };
            combinators.push(combinator);
            compounds.push(self.compound()?);
        }
        Ok(Complex {
            compounds,
            combinators,
        })
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();
        let mut universal = false;

        match self.peek() {
            Some('*') => {
                self.pos += 1;
                universal = true;
            }
            Some(c) if Self::is_ident_char(c) => {
                compound.tag = Some(self.ident()?.to_ascii_lowercase());
            }
            _ => {}
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    compound.simples.push(Simple::Id(self.ident()?));
                }
                Some('.') => {
                    self.pos += 1;
                    compound.simples.push(Simple::Class(self.ident()?));
                }
                Some('[') => {
                    self.pos += 1;
                    compound.simples.push(self.attribute()?);
                }
                _ => break,
            }
        }

        if compound.tag.is_none() && compound.simples.is_empty() && !universal {
            return Err(self.unexpected());
        }
        Ok(compound)
    }

    fn attribute(&mut self) -> Result<Simple, SelectorError> {
        self.skip_ws();
        let name = self.ident()?;
        self.skip_ws();
        let value = match self.peek() {
            Some('=') => {
                self.pos += 1;
                self.skip_ws();
                let value = match self.peek() {
                    Some(q @ ('"' | '\'')) => {
                        self.pos += 1;
                        self.quoted(q)?
                    }
                    _ => self.ident()?,
                };
                self.skip_ws();
                Some(value)
            }
            _ => None,
        };
        self.expect(']')?;
        Ok(Simple::Attr { name, value })
    }
}

// =============================================================================
// Matching
// =============================================================================

impl Selector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        if input.trim().is_empty() {
            return Err(SelectorError::Empty);
        }
        Parser::new(input).list()
    }

    /// Selector matching elements that carry `name`, i.e. `[name]`.
    pub fn attribute(name: &str) -> Self {
        Self {
            alternatives: vec![Complex {
                compounds: vec![Compound {
                    tag: None,
                    simples: vec![Simple::Attr {
                        name: name.to_string(),
                        value: None,
                    }],
                }],
                combinators: Vec::new(),
            }],
        }
    }

    /// Union of two selector lists (`a, b`).
    pub fn or(mut self, other: Selector) -> Self {
        self.alternatives.extend(other.alternatives);
        self
    }

    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.alternatives.iter().any(|c| c.matches(doc, node))
    }
}

impl Complex {
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let last = self.compounds.len() - 1;
        self.compounds[last].matches(doc, node) && self.matches_left_of(doc, last, node)
    }

    /// `compounds[i]` already matched at `node`; check everything to its left.
    fn matches_left_of(&self, doc: &Document, i: usize, node: NodeId) -> bool {
        if i == 0 {
            return true;
        }
        let left = &self.compounds[i - 1];
        match self.combinators[i - 1] {
            Combinator::Child => doc
                .parent(node)
                .is_some_and(|p| left.matches(doc, p) && self.matches_left_of(doc, i - 1, p)),
            Combinator::Descendant => doc
                .self_and_ancestors(node)
                .skip(1)
                .any(|a| left.matches(doc, a) && self.matches_left_of(doc, i - 1, a)),
        }
    }
}

impl Compound {
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        if let Some(tag) = &self.tag {
            if doc.tag(node) != Some(tag.as_str()) {
                return false;
            }
        } else if !doc.exists(node) {
            return false;
        }
        self.simples.iter().all(|simple| match simple {
            Simple::Id(id) => doc.attribute(node, "id") == Some(id.as_str()),
            Simple::Class(class) => doc.has_class(node, class),
            Simple::Attr { name, value: None } => doc.has_attribute(node, name),
            Simple::Attr {
                name,
                value: Some(value),
            } => doc.attribute(node, name) == Some(value.as_str()),
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let modal = doc.element(body, "div", &[("data-rs-modal", "signup"), ("id", "m")]);
        let content = doc.element(modal, "section", &[("class", "modal_content")]);
        let button = doc.element(content, "button", &[("data-rs-modal-close", "")]);
        (doc, modal, content, button)
    }

    #[test]
    fn test_simple_selectors() {
        let (doc, modal, content, button) = setup();
        assert!(Selector::parse("#m").unwrap().matches(&doc, modal));
        assert!(Selector::parse(".modal_content").unwrap().matches(&doc, content));
        assert!(Selector::parse("BUTTON").unwrap().matches(&doc, button));
        assert!(Selector::parse("[data-rs-modal-close]").unwrap().matches(&doc, button));
        assert!(Selector::parse("[data-rs-modal=\"signup\"]").unwrap().matches(&doc, modal));
        assert!(Selector::parse("[data-rs-modal=signup]").unwrap().matches(&doc, modal));
        assert!(!Selector::parse("[data-rs-modal='other']").unwrap().matches(&doc, modal));
        assert!(Selector::parse("*").unwrap().matches(&doc, content));
    }

    #[test]
    fn test_class_and_style_attribute_selectors() {
        let (mut doc, modal, content, _) = setup();
        doc.set_style(modal, "max-height", "0px");
        assert!(Selector::parse("[class]").unwrap().matches(&doc, content));
        assert!(Selector::parse("[class=modal_content]").unwrap().matches(&doc, content));
        assert!(!Selector::parse("[class]").unwrap().matches(&doc, modal));
        assert!(Selector::parse("[style]").unwrap().matches(&doc, modal));
    }

    #[test]
    fn test_combinators() {
        let (doc, modal, content, button) = setup();
        assert!(Selector::parse("#m button").unwrap().matches(&doc, button));
        assert!(Selector::parse("#m > .modal_content > button").unwrap().matches(&doc, button));
        assert!(!Selector::parse("#m > button").unwrap().matches(&doc, button));
        assert!(!Selector::parse("section #m").unwrap().matches(&doc, modal));
        assert!(Selector::parse("body section").unwrap().matches(&doc, content));
    }

    #[test]
    fn test_list_and_query() {
        let (doc, _modal, content, button) = setup();
        let sel = Selector::parse("[data-rs-modal-content], .modal_content").unwrap();
        assert_eq!(doc.query_selector(&sel), Some(content));
        let controls = Selector::parse("a,button,input").unwrap();
        assert_eq!(doc.closest(button, &controls), Some(button));
        assert_eq!(doc.closest(content, &controls), None);
    }

    #[test]
    fn test_escaped_identifier() {
        let mut doc = Document::new();
        let body = doc.body();
        let el = doc.element(body, "div", &[("id", "sign.up")]);
        assert!(Selector::parse(r"#sign\.up").unwrap().matches(&doc, el));
    }

    #[test]
    fn test_malformed_selectors() {
        assert_eq!(Selector::parse("  "), Err(SelectorError::Empty));
        assert!(matches!(
            Selector::parse("div,"),
            Err(SelectorError::UnexpectedEnd { .. })
        ));
        assert!(matches!(
            Selector::parse("[data-x"),
            Err(SelectorError::UnexpectedEnd { .. })
        ));
        assert!(matches!(
            Selector::parse("#"),
            Err(SelectorError::UnexpectedEnd { .. })
        ));
        assert!(matches!(
            Selector::parse("div!"),
            Err(SelectorError::Unexpected { found: '!', .. })
        ));
    }

    #[test]
    fn test_or_combines_lists() {
        let (doc, modal, content, _) = setup();
        let sel = Selector::attribute("data-rs-modal").or(Selector::parse(".modal_content").unwrap());
        assert!(sel.matches(&doc, modal));
        assert!(sel.matches(&doc, content));
    }
}
