// crates/feed-parser/src/xml.rs
//! Lenient XML reading
//!
//! Feeds are read into a small owned element tree before any dialect logic
//! runs. The reader tolerates the usual publisher mistakes:
//!
//! - end tags that do not match the innermost open element close the
//!   nearest matching ancestor, stray end tags are ignored
//! - a syntax error ends the read, every element still open is closed and
//!   flagged as unterminated
//! - unknown or broken character references stay literal text
//!
//! Namespace prefixes are resolved here as well, against the `xmlns`
//! declarations in scope when the element was opened.

use crate::error::{FeedResult, FormatError};
use quick_xml::escape::{resolve_html5_entity, unescape_with};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

pub(crate) const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";
pub(crate) const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

/// Longest entity name considered when recovering broken references
const MAX_ENTITY_LEN: usize = 32;

/// A node of the lenient tree
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An element with its resolved namespace
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct XmlElement {
    /// Qualified name as written in the document
    pub name: String,
    /// Namespace URI the prefix (or default namespace) resolved to
    pub namespace: Option<String>,
    /// Attributes with qualified names, values already unescaped
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
    /// False when the element was closed implicitly
    pub terminated: bool,
}

impl XmlElement {
    fn new(name: String, attributes: Vec<(String, String)>) -> Self {
        Self {
            name,
            namespace: None,
            attributes,
            children: Vec::new(),
            terminated: false,
        }
    }

    /// Name without prefix
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// Prefix as written, if any
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// True when the element has the given namespace and local name.
    ///
    /// An element with an undeclared prefix never matches a core element.
    pub fn is(&self, namespace: Option<&str>, local: &str) -> bool {
        self.namespace.as_deref() == namespace
            && self.local_name() == local
            && (namespace.is_some() || self.prefix().is_none())
    }

    /// Matches an extension module element such as `dc:date`.
    ///
    /// Publishers regularly forget to declare the module namespace, so an
    /// unbound element carrying the conventional prefix matches too.
    pub fn is_module(&self, namespace: &str, prefix: &str, local: &str) -> bool {
        if self.local_name() != local {
            return false;
        }
        match self.namespace.as_deref() {
            Some(ns) => ns == namespace,
            None => self.prefix() == Some(prefix),
        }
    }

    /// Attribute value by exact qualified name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Attribute value by local name, whatever its prefix
    pub fn attr_local(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| local_part(key) == local)
            .map(|(_, value)| value.as_str())
    }

    /// Child elements in document order
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// First child element matching namespace and local name
    pub fn child(&self, namespace: Option<&str>, local: &str) -> Option<&XmlElement> {
        self.elements().find(|element| element.is(namespace, local))
    }

    /// Concatenated text of all descendants
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                XmlNode::Text(text) => out.push_str(text),
                XmlNode::Element(element) => element.collect_text(out),
            }
        }
    }

    /// Trimmed text, `None` when empty
    pub fn trimmed_text(&self) -> Option<String> {
        let text = self.text();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Children serialized back to markup
    pub fn inner_markup(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            write_node(node, &mut out);
        }
        out
    }
}

fn local_part(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

fn write_node(node: &XmlNode, out: &mut String) {
    match node {
        XmlNode::Text(text) => escape_into(text, false, out),
        XmlNode::Element(element) => {
            // XHTML content is re-emitted as plain HTML names
            let xhtml = element.namespace.as_deref() == Some(XHTML_NS);
            let name = if xhtml { element.local_name() } else { element.name.as_str() };
            out.push('<');
            out.push_str(name);
            for (key, value) in &element.attributes {
                if xhtml && (key == "xmlns" || key.starts_with("xmlns:")) {
                    continue;
                }
                out.push(' ');
                out.push_str(key);
                out.push_str("=\"");
                escape_into(value, true, out);
                out.push('"');
            }
            if element.children.is_empty() {
                out.push_str("/>");
                return;
            }
            out.push('>');
            for child in &element.children {
                write_node(child, out);
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
    }
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

/// Resolves XML predefined entities and the HTML named entity table
fn resolve_entity(entity: &str) -> Option<&'static str> {
    resolve_html5_entity(entity)
}

/// Decodes character references without ever failing.
///
/// Well-formed input goes through quick-xml directly. Otherwise each `&` is
/// tried on its own and kept literally when it does not start a resolvable
/// reference.
pub(crate) fn unescape_lenient(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    if let Ok(text) = unescape_with(raw, resolve_entity) {
        return text.into_owned();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let candidate = rest[1..]
            .char_indices()
            .take(MAX_ENTITY_LEN)
            .find(|(_, c)| *c == ';' || *c == '&' || c.is_whitespace())
            .filter(|(_, c)| *c == ';')
            .map(|(end, _)| &rest[..end + 2]);

        match candidate.and_then(|reference| {
            unescape_with(reference, resolve_entity)
                .ok()
                .map(|decoded| (reference.len(), decoded))
        }) {
            Some((consumed, decoded)) => {
                out.push_str(&decoded);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Deepest element nesting kept in the tree. Anything below is dropped.
pub(crate) const MAX_ELEMENT_DEPTH: usize = 256;

/// `xmlns` declarations made by the open element at `level`
struct Scope {
    level: usize,
    /// `None` prefix is the default namespace
    bindings: Vec<(Option<String>, String)>,
}

/// Builds the lenient tree while the reader emits events
struct TreeBuilder {
    stack: Vec<XmlElement>,
    /// Only elements that declare namespaces get a scope
    scopes: Vec<Scope>,
    /// Elements opened past `MAX_ELEMENT_DEPTH` and not yet closed
    overflow: usize,
    root: Option<XmlElement>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: Vec::new(),
            scopes: Vec::new(),
            overflow: 0,
            root: None,
        }
    }

    fn started(&self) -> bool {
        !self.stack.is_empty() || self.root.is_some()
    }

    /// Opens an element, returns false when it was dropped for depth
    fn open(&mut self, start: &BytesStart<'_>) -> bool {
        if self.overflow > 0 || self.stack.len() >= MAX_ELEMENT_DEPTH {
            if self.overflow == 0 {
                log::debug!("Dropping elements nested deeper than {}", MAX_ELEMENT_DEPTH);
            }
            self.overflow += 1;
            return false;
        }

        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let attributes: Vec<(String, String)> = start
            .attributes()
            .with_checks(false)
            .map_while(Result::ok)
            .map(|attr| {
                let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                let value = unescape_lenient(&String::from_utf8_lossy(&attr.value));
                (key, value)
            })
            .collect();

        let bindings: Vec<(Option<String>, String)> = attributes
            .iter()
            .filter_map(|(key, value)| {
                if key == "xmlns" {
                    Some((None, value.clone()))
                } else {
                    key.strip_prefix("xmlns:")
                        .map(|prefix| (Some(prefix.to_string()), value.clone()))
                }
            })
            .collect();
        if !bindings.is_empty() {
            self.scopes.push(Scope {
                level: self.stack.len(),
                bindings,
            });
        }

        let mut element = XmlElement::new(name, attributes);
        element.namespace = self.resolve(element.prefix());
        self.stack.push(element);
        true
    }

    /// Resolves a prefix against the declarations in scope
    fn resolve(&self, prefix: Option<&str>) -> Option<String> {
        if prefix == Some("xml") {
            return Some(XML_NS.to_string());
        }
        self.scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.bindings.iter())
            .find(|(bound, _)| bound.as_deref() == prefix)
            .and_then(|(_, uri)| (!uri.is_empty()).then(|| uri.clone()))
    }

    /// Closes the innermost open element named `name`
    fn close(&mut self, name: &str) {
        if self.overflow > 0 {
            self.overflow -= 1;
            return;
        }
        let Some(index) = self.stack.iter().rposition(|element| element.name == name) else {
            log::trace!("Ignoring stray end tag </{}>", name);
            return;
        };
        while self.stack.len() > index + 1 {
            self.pop(false);
        }
        self.pop(true);
    }

    fn pop(&mut self, terminated: bool) {
        if let Some(mut element) = self.stack.pop() {
            let level = self.stack.len();
            while self.scopes.last().is_some_and(|scope| scope.level >= level) {
                self.scopes.pop();
            }
            element.terminated = terminated;
            self.attach(XmlNode::Element(element));
        }
    }

    fn attach(&mut self, node: XmlNode) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => {
                if let XmlNode::Element(element) = node {
                    if self.root.is_none() {
                        self.root = Some(element);
                    }
                }
            }
        }
    }

    fn text(&mut self, text: String) {
        if self.overflow > 0 {
            return;
        }
        if let Some(parent) = self.stack.last_mut() {
            match parent.children.last_mut() {
                Some(XmlNode::Text(previous)) => previous.push_str(&text),
                _ => parent.children.push(XmlNode::Text(text)),
            }
        }
    }

    fn finish(mut self) -> Option<XmlElement> {
        while !self.stack.is_empty() {
            self.pop(false);
        }
        self.root
    }
}

/// Reads the document element of `content` into a lenient tree
pub(crate) fn read_document(content: &str) -> FeedResult<XmlElement> {
    let mut reader = Reader::from_str(content);
    {
        let config = reader.config_mut();
        config.check_end_names = false;
        config.allow_unmatched_ends = true;
        config.check_comments = false;
    }

    let mut builder = TreeBuilder::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                builder.open(&e);
            }
            Ok(Event::Empty(e)) => {
                if builder.open(&e) {
                    builder.pop(true);
                } else {
                    builder.overflow -= 1;
                }
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                builder.close(&name);
            }
            Ok(Event::Text(e)) => {
                builder.text(unescape_lenient(&String::from_utf8_lossy(&e)));
            }
            Ok(Event::CData(e)) => {
                builder.text(String::from_utf8_lossy(&e).into_owned());
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                if !builder.started() {
                    return Err(FormatError::from(e));
                }
                log::debug!(
                    "XML error at byte {}, keeping what was read: {}",
                    reader.buffer_position(),
                    e
                );
                break;
            }
            _ => {}
        }
        if builder.root.is_some() {
            break;
        }
        buf.clear();
    }

    builder.finish().ok_or(FormatError::NoRootElement)
}
