// crates/sanitizer/src/tree.rs
//! Owned markup tree
//!
//! The fragment is repaired by html5ever through `scraper`, then copied into
//! plain owned nodes that the filter can rewrite in place.

use ego_tree::NodeRef;
use scraper::{Html, Node};

/// Nesting deeper than this is dropped while copying the repaired tree
pub const MAX_DEPTH: usize = 256;

/// Elements serialized without an end tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MarkupNode {
    Element(MarkupElement),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MarkupElement {
    /// Lowercase local name
    pub name: String,
    /// Attributes in source order
    pub attributes: Vec<(String, String)>,
    pub children: Vec<MarkupNode>,
}

/// Repairs `markup` as a body fragment and copies the result
pub(crate) fn parse_fragment(markup: &str) -> Vec<MarkupNode> {
    let fragment = Html::parse_fragment(markup);
    // The fragment parser always wraps its content in an <html> element
    let wrapper = fragment.root_element();
    copy_children(*wrapper, 1)
}

fn copy_children(node: NodeRef<'_, Node>, depth: usize) -> Vec<MarkupNode> {
    if depth > MAX_DEPTH {
        log::trace!("Dropping markup nested deeper than {}", MAX_DEPTH);
        return Vec::new();
    }
    node.children()
        .filter_map(|child| copy_node(child, depth))
        .collect()
}

fn copy_node(node: NodeRef<'_, Node>, depth: usize) -> Option<MarkupNode> {
    match node.value() {
        Node::Text(text) => Some(MarkupNode::Text(String::from(&**text))),
        Node::Element(element) => Some(MarkupNode::Element(MarkupElement {
            name: element.name().to_string(),
            attributes: element
                .attrs()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            children: copy_children(node, depth + 1),
        })),
        // Comments, doctypes and processing instructions
        _ => None,
    }
}

/// Serializes nodes back to HTML
pub(crate) fn serialize(nodes: &[MarkupNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(node, &mut out);
    }
    out
}

fn write_node(node: &MarkupNode, out: &mut String) {
    match node {
        MarkupNode::Text(text) => escape_into(text, false, out),
        MarkupNode::Element(element) => write_element(element, out),
    }
}

fn write_element(element: &MarkupElement, out: &mut String) {
    out.push('<');
    out.push_str(&element.name);
    for (name, value) in &element.attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_into(value, true, out);
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&element.name.as_str()) {
        return;
    }

    // The parser drops one newline right after <pre>
    if element.name == "pre" {
        if let Some(MarkupNode::Text(text)) = element.children.first() {
            if text.starts_with('\n') {
                out.push('\n');
            }
        }
    }

    for child in &element.children {
        write_node(child, out);
    }
    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
