// crates/feed-parser/src/dialect/mod.rs
//! Per-dialect extraction
//!
//! Each dialect reads the lenient tree into the same plain field records.
//! Identity, address resolution and soft-failure accounting happen once,
//! afterwards, in the parser.

mod atom;
mod rdf;
mod rss;

use crate::date::parse_date;
use crate::feed::{Enclosure, FeedType};
use crate::xml::XmlElement;
use chrono::{DateTime, Utc};

pub(crate) const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
pub(crate) const ATOM03_NS: &str = "http://purl.org/atom/ns#";
pub(crate) const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub(crate) const CONTENT_NS: &str = "http://purl.org/rss/1.0/modules/content/";
pub(crate) const DC_NS: &str = "http://purl.org/dc/elements/1.1/";

/// Feed-level values as found in the document
#[derive(Debug, Default)]
pub(crate) struct FeedFields {
    pub self_link: Option<String>,
    pub site_link: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub language: Option<String>,
    pub updated: Option<DateTime<Utc>>,
}

/// Entry values as found in the document
#[derive(Debug, Default)]
pub(crate) struct EntryFields {
    pub identifier: Option<String>,
    pub title: Option<String>,
    pub link: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub author: Option<String>,
    pub comments_link: Option<String>,
    pub enclosure: Option<Enclosure>,
    pub description: Option<String>,
    pub base_address: Option<String>,
    /// False when the entry was cut off by a syntax error
    pub terminated: bool,
}

#[derive(Debug, Default)]
pub(crate) struct Extracted {
    pub feed: FeedFields,
    pub entries: Vec<EntryFields>,
}

/// Runs the extractor of `feed_type` over the document element
pub(crate) fn extract(feed_type: FeedType, root: &XmlElement) -> Extracted {
    match feed_type {
        FeedType::Rss1 => rdf::extract(root),
        FeedType::Rss2 => rss::extract(root),
        FeedType::Atom => atom::extract(root),
    }
}

/// True for values with a URI scheme, e.g. `http:` or `urn:`
pub(crate) fn is_absolute(value: &str) -> bool {
    let Some((scheme, _)) = value.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn text(element: Option<&XmlElement>) -> Option<String> {
    element.and_then(XmlElement::trimmed_text)
}

fn date(element: Option<&XmlElement>) -> Option<DateTime<Utc>> {
    element.and_then(|e| parse_date(&e.text()))
}

/// First child matching an extension module element
fn module_child<'a>(
    parent: &'a XmlElement,
    namespace: &str,
    prefix: &str,
    local: &str,
) -> Option<&'a XmlElement> {
    parent
        .elements()
        .find(|e| e.is_module(namespace, prefix, local))
}

/// `item` elements directly under `root` or inside `channel`, in document order
fn items<'a>(
    root: &'a XmlElement,
    channel: Option<&'a XmlElement>,
    ns: Option<&str>,
) -> Vec<&'a XmlElement> {
    let mut items = Vec::new();
    for element in root.elements() {
        match channel {
            Some(channel) if std::ptr::eq(element, channel) => {
                items.extend(channel.elements().filter(|e| e.is(ns, "item")));
            }
            _ if element.is(ns, "item") => items.push(element),
            _ => {}
        }
    }
    items
}

/// Raw markup of a description element, `None` when blank
fn markup(element: Option<&XmlElement>) -> Option<String> {
    let raw = element?.text();
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// `atom:link rel="self"` embedded in RSS channels
fn atom_self_link(parent: &XmlElement) -> Option<String> {
    parent
        .elements()
        .filter(|e| e.is_module(ATOM_NS, "atom", "link"))
        .find(|e| e.attr("rel") == Some("self"))
        .and_then(|e| e.attr("href"))
        .map(|href| href.trim().to_string())
}

/// `xml:base` of an element, kept only when absolute
fn xml_base(element: &XmlElement) -> Option<String> {
    element
        .attr("xml:base")
        .map(str::trim)
        .filter(|base| is_absolute(base))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_absolute() {
        assert!(is_absolute("http://example.com/"));
        assert!(is_absolute("urn:uuid:1234"));
        assert!(is_absolute("svn+ssh://host/x"));
        assert!(!is_absolute("/feed.xml"));
        assert!(!is_absolute("feed.xml"));
        assert!(!is_absolute("//cdn.example.com/x"));
        assert!(!is_absolute("1http://x"));
    }
}
