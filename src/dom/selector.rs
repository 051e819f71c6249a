// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! CSS selector parsing and matching
//!
//! Compound selectors only: tag, `#id`, `.class` and attribute tests, in any
//! combination (`a[href]`, `link[rel=stylesheet]`, `div#main.wide`).
//! Combinators and pseudo-classes are not part of the replacement-selector
//! contract and are rejected at parse time.

use crate::error::{Error, Result};

use super::node::{Node, NodeData, NodeType};

/// A parsed compound selector
#[derive(Debug, Clone)]
pub struct Selector {
    parts: Vec<SelectorPart>,
}

/// A single simple selector within a compound
#[derive(Debug, Clone)]
pub enum SelectorPart {
    /// Universal selector (*)
    Universal,
    /// Tag name (lowercase)
    Tag(String),
    /// ID selector (#id)
    Id(String),
    /// Class selector (.class)
    Class(String),
    /// Attribute selector ([attr], [attr=value], ...)
    Attribute(AttributeTest),
}

/// Attribute selector test
#[derive(Debug, Clone)]
pub struct AttributeTest {
    pub name: String,
    pub operator: Option<AttributeOperator>,
    pub value: Option<String>,
}

/// Attribute selector operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOperator {
    /// [attr=value] - exact match
    Equals,
    /// [attr~=value] - word in space-separated list
    Includes,
    /// [attr|=value] - exact or hyphen-prefixed
    DashMatch,
    /// [attr^=value] - starts with
    Prefix,
    /// [attr$=value] - ends with
    Suffix,
    /// [attr*=value] - contains substring
    Substring,
}

impl Selector {
    /// Parse a compound selector string
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(Error::selector(input, "empty selector"));
        }
        SelectorParser::new(trimmed).parse()
    }

    /// Check whether an element node matches every simple selector
    pub fn matches(&self, node: &Node) -> bool {
        let arena = node.arena.read();
        match arena.get(&node.id) {
            Some(data) => self.matches_data(data),
            None => false,
        }
    }

    /// Match against already-borrowed node data. Takes no locks, so it is
    /// safe under a held arena guard.
    pub(crate) fn matches_data(&self, data: &NodeData) -> bool {
        if data.node_type != NodeType::Element {
            return false;
        }
        self.parts.iter().all(|part| part_matches(part, data))
    }
}

fn part_matches(part: &SelectorPart, data: &NodeData) -> bool {
    match part {
        SelectorPart::Universal => true,
        SelectorPart::Tag(tag) => data
            .tag_name
            .as_deref()
            .map(|t| t.eq_ignore_ascii_case(tag))
            .unwrap_or(false),
        SelectorPart::Id(id) => data.attr("id").map(|v| v == id.as_str()).unwrap_or(false),
        SelectorPart::Class(class) => data
            .attr("class")
            .map(|c| c.split_whitespace().any(|c| c == class.as_str()))
            .unwrap_or(false),
        SelectorPart::Attribute(test) => attribute_matches(test, data),
    }
}

fn attribute_matches(test: &AttributeTest, data: &NodeData) -> bool {
    let value = match data.attr(&test.name) {
        Some(v) => v,
        None => return false,
    };

    let (Some(op), Some(target)) = (&test.operator, &test.value) else {
        // bare [attr] existence test
        return true;
    };

    match op {
        AttributeOperator::Equals => value == target.as_str(),
        AttributeOperator::Includes => value.split_whitespace().any(|w| w == target.as_str()),
        AttributeOperator::DashMatch => {
            value == target.as_str() || value.starts_with(&format!("{}-", target))
        }
        AttributeOperator::Prefix => value.starts_with(target.as_str()),
        AttributeOperator::Suffix => value.ends_with(target.as_str()),
        AttributeOperator::Substring => value.contains(target.as_str()),
    }
}

struct SelectorParser {
    input: Vec<char>,
    pos: usize,
}

impl SelectorParser {
    fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
        }
    }

    fn parse(mut self) -> Result<Selector> {
        let mut parts = Vec::new();
        let original: String = self.input.iter().collect();

        while let Some(c) = self.peek() {
            match c {
                '#' => {
                    self.advance();
                    parts.push(SelectorPart::Id(self.ident(&original)?));
                }
                '.' => {
                    self.advance();
                    parts.push(SelectorPart::Class(self.ident(&original)?));
                }
                '[' => {
                    parts.push(SelectorPart::Attribute(self.attribute(&original)?));
                }
                '*' => {
                    self.advance();
                    parts.push(SelectorPart::Universal);
                }
                c if c.is_alphabetic() || c == '_' || c == '-' => {
                    parts.push(SelectorPart::Tag(self.ident(&original)?.to_lowercase()));
                }
                c => {
                    return Err(Error::selector(
                        original,
                        format!("unsupported character '{}'", c),
                    ));
                }
            }
        }

        if parts.is_empty() {
            return Err(Error::selector(original, "no simple selectors"));
        }

        Ok(Selector { parts })
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        self.pos += 1;
        c
    }

    fn ident(&mut self, context: &str) -> Result<String> {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                out.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if out.is_empty() {
            return Err(Error::selector(context, "expected identifier"));
        }
        Ok(out)
    }

    fn attribute(&mut self, context: &str) -> Result<AttributeTest> {
        self.advance(); // consume '['
        self.skip_ws();
        let name = self.ident(context)?.to_lowercase();
        self.skip_ws();

        let mut operator = None;
        let mut value = None;

        if let Some(c) = self.peek() {
            if c != ']' {
                let op = match c {
                    '=' => {
                        self.advance();
                        AttributeOperator::Equals
                    }
                    '~' | '|' | '^' | '$' | '*' => {
                        self.advance();
                        if self.advance() != Some('=') {
                            return Err(Error::selector(context, "expected '='"));
                        }
                        match c {
                            '~' => AttributeOperator::Includes,
                            '|' => AttributeOperator::DashMatch,
                            '^' => AttributeOperator::Prefix,
                            '$' => AttributeOperator::Suffix,
                            _ => AttributeOperator::Substring,
                        }
                    }
                    c => {
                        return Err(Error::selector(
                            context,
                            format!("unknown attribute operator '{}'", c),
                        ));
                    }
                };
                operator = Some(op);
                self.skip_ws();
                value = Some(self.string_or_ident(context)?);
                self.skip_ws();
            }
        }

        match self.advance() {
            Some(']') => Ok(AttributeTest {
                name,
                operator,
                value,
            }),
            _ => Err(Error::selector(context, "unclosed attribute selector")),
        }
    }

    fn string_or_ident(&mut self, context: &str) -> Result<String> {
        match self.peek() {
            Some(q @ ('"' | '\'')) => {
                self.advance();
                let mut out = String::new();
                loop {
                    match self.advance() {
                        Some(c) if c == q => break,
                        Some('\\') => {
                            if let Some(escaped) = self.advance() {
                                out.push(escaped);
                            }
                        }
                        Some(c) => out.push(c),
                        None => return Err(Error::selector(context, "unterminated string")),
                    }
                }
                Ok(out)
            }
            _ => self.ident(context),
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }
}
