use indexmap::IndexMap;
use scraper::ElementRef;
use serde::{Deserialize, Serialize};

/// Elements that never have an end tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr",
];

/// Elements whose text is emitted without escaping
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// A node of a detached content fragment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Element(ElementNode),
    Text { text: String },
}

/// An owned element copied out of a page.
///
/// Fragments never point back into the document they were copied from, so
/// mutating one can not affect the source page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementNode {
    /// HTML tag name (e.g., "div", "pre", "code")
    pub tag_name: String,

    /// Element attributes in source order
    #[serde(default)]
    pub attributes: IndexMap<String, String>,

    /// Child nodes in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl ElementNode {
    /// Create a new ElementNode
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Deep copy `source` into an owned tree.
    ///
    /// Every descendant element for which `prune` returns true is left out
    /// together with its subtree. The source element itself is always copied.
    pub fn detach<F>(source: ElementRef<'_>, prune: &F) -> Self
    where
        F: Fn(&ElementRef<'_>) -> bool,
    {
        let value = source.value();
        let mut node = ElementNode::new(value.name());
        for (key, val) in value.attrs() {
            node.add_attribute(key, val);
        }

        for child in source.children() {
            match child.value() {
                scraper::Node::Text(text) => node.add_text(&**text),
                scraper::Node::Element(_) => {
                    if let Some(child_ref) = ElementRef::wrap(child) {
                        if prune(&child_ref) {
                            continue;
                        }
                        node.add_child(ElementNode::detach(child_ref, prune));
                    }
                }
                _ => {}
            }
        }

        node
    }

    /// Builder method: append a text child
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.add_text(text);
        self
    }

    /// Builder method: append element children
    pub fn with_children(mut self, children: Vec<ElementNode>) -> Self {
        for child in children {
            self.add_child(child);
        }
        self
    }

    /// Add a single attribute
    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Add a child element
    pub fn add_child(&mut self, child: ElementNode) {
        self.children.push(Node::Element(child));
    }

    /// Add a text node
    pub fn add_text(&mut self, text: impl Into<String>) {
        self.children.push(Node::Text { text: text.into() });
    }

    /// Get attribute value by key
    pub fn get_attribute(&self, key: &str) -> Option<&String> {
        self.attributes.get(key)
    }

    /// Check if element has a specific class
    pub fn has_class(&self, class_name: &str) -> bool {
        if let Some(classes) = self.attributes.get("class") {
            classes.split_whitespace().any(|c| c == class_name)
        } else {
            false
        }
    }

    /// Check if element is a specific tag
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag)
    }

    /// Concatenated text of every descendant text node, like `textContent`
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text { text } => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
            }
        }
    }

    /// Whether any element in this subtree (self included) satisfies `pred`
    pub fn any_element<F>(&self, pred: &F) -> bool
    where
        F: Fn(&ElementNode) -> bool,
    {
        pred(self)
            || self.children.iter().any(|child| match child {
                Node::Element(element) => element.any_element(pred),
                Node::Text { .. } => false,
            })
    }

    /// Count elements in this subtree, self included
    pub fn count_elements(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|child| match child {
                Node::Element(element) => element.count_elements(),
                Node::Text { .. } => 0,
            })
            .sum::<usize>()
    }

    /// Serialize this element and its subtree as HTML
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let tag = self.tag_name.to_ascii_lowercase();
        out.push('<');
        out.push_str(&tag);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape_attribute(value));
            out.push('"');
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&tag.as_str()) {
            return;
        }

        self.write_children(out);
        out.push_str("</");
        out.push_str(&tag);
        out.push('>');
    }

    fn write_children(&self, out: &mut String) {
        let raw = RAW_TEXT_ELEMENTS.iter().any(|t| self.is_tag(t));
        for child in &self.children {
            match child {
                Node::Text { text } if raw => out.push_str(text),
                Node::Text { text } => out.push_str(&escape_text(text)),
                Node::Element(element) => element.write_html(out),
            }
        }
    }
}

/// Escape text for use as HTML element content
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
    out
}

/// Escape text for use inside a double-quoted attribute value
pub fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
    out
}
