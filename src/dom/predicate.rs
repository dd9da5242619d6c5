//! Structural predicates over a parsed page.
//!
//! Profiles describe their selectors as plain strings. A [`Predicate`] is the
//! compiled form: plain CSS alternatives go through `scraper`, while a
//! top-level `subject:has(descendant)` alternative is compiled into a
//! composable [`Predicate::Has`] so it works regardless of selector engine
//! support for relational pseudo-classes.

use crate::error::{PrintError, Result};
use scraper::{ElementRef, Selector};
use std::fmt;

/// Capability shared by everything that can test a single element
pub trait Matches {
    /// Whether `element` satisfies this predicate
    fn matches(&self, element: &ElementRef<'_>) -> bool;
}

/// A compiled structural predicate
#[derive(Clone)]
pub enum Predicate {
    /// A CSS selector list
    Css { source: String, selector: Selector },
    /// Element matches `subject` and has a strict descendant matching `descendant`
    Has {
        subject: Box<Predicate>,
        descendant: Box<Predicate>,
    },
    /// Any of the alternatives matches
    AnyOf(Vec<Predicate>),
}

impl Predicate {
    /// Compile a selector string
    pub fn parse(source: &str) -> Result<Self> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Err(invalid(source, "selector is empty"));
        }

        let alternatives = split_top_level(trimmed, ',');
        if alternatives.len() > 1 {
            let compiled = alternatives
                .into_iter()
                .map(Predicate::parse)
                .collect::<Result<Vec<_>>>()?;
            return Ok(Predicate::AnyOf(compiled));
        }

        if let Some((subject, descendant)) = split_has(trimmed) {
            return Ok(Predicate::Has {
                subject: Box::new(Predicate::parse(subject)?),
                descendant: Box::new(Predicate::parse(descendant)?),
            });
        }

        let selector = Selector::parse(trimmed).map_err(|e| invalid(source, &e.to_string()))?;
        Ok(Predicate::Css {
            source: trimmed.to_string(),
            selector,
        })
    }

    /// Compile an optional selector, disabling the field when it is malformed
    pub fn parse_optional(field: &str, source: Option<&str>) -> Option<Self> {
        let source = source?;
        match Predicate::parse(source) {
            Ok(predicate) => Some(predicate),
            Err(e) => {
                log::warn!("Ignoring {}: {}", field, e);
                None
            }
        }
    }

    /// Every element below `scope` (scope excluded) that matches, in document order
    pub fn find_all<'a>(&self, scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        scope
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .filter(|el| self.matches(el))
            .collect()
    }

    /// First element below `scope` that matches
    pub fn find_first<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        scope
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .find(|el| self.matches(el))
    }
}

impl Matches for Predicate {
    fn matches(&self, element: &ElementRef<'_>) -> bool {
        match self {
            Predicate::Css { selector, .. } => selector.matches(element),
            Predicate::Has { subject, descendant } => {
                subject.matches(element)
                    && element
                        .descendants()
                        .skip(1)
                        .filter_map(ElementRef::wrap)
                        .any(|d| descendant.matches(&d))
            }
            Predicate::AnyOf(alternatives) => alternatives.iter().any(|p| p.matches(element)),
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Predicate({})", self)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Css { source, .. } => write!(f, "{}", source),
            Predicate::Has { subject, descendant } => write!(f, "{}:has({})", subject, descendant),
            Predicate::AnyOf(alternatives) => {
                let parts: Vec<String> = alternatives.iter().map(|p| p.to_string()).collect();
                write!(f, "{}", parts.join(", "))
            }
        }
    }
}

fn invalid(selector: &str, reason: &str) -> PrintError {
    PrintError::InvalidSelector {
        selector: selector.to_string(),
        reason: reason.to_string(),
    }
}

/// Split on `sep` outside of brackets, parentheses and quotes
fn split_top_level(source: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in source.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => quote = Some(c),
                '(' | '[' => depth += 1,
                ')' | ']' => depth = depth.saturating_sub(1),
                c if c == sep && depth == 0 => {
                    parts.push(source[start..i].trim());
                    start = i + c.len_utf8();
                }
                _ => {}
            },
        }
    }
    parts.push(source[start..].trim());
    parts
}

/// Split `subject:has(descendant)` when the `:has(...)` suffix closes the selector
fn split_has(source: &str) -> Option<(&str, &str)> {
    if !source.ends_with(')') {
        return None;
    }

    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut open = None;
    for (i, c) in source.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => quote = Some(c),
                '(' => {
                    if depth == 0 {
                        open = Some(i);
                    }
                    depth += 1;
                }
                ')' => depth = depth.saturating_sub(1),
                _ => {}
            },
        }
    }

    let open = open?;
    let subject = source[..open].strip_suffix(":has")?;
    let descendant = &source[open + 1..source.len() - 1];
    if subject.trim().is_empty() || descendant.trim().is_empty() {
        return None;
    }
    Some((subject.trim(), descendant.trim()))
}
