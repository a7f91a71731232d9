// crates/feed-parser/src/dialect/rdf.rs
//! RSS 1.0 (RDF Site Summary)

use super::{
    date, is_absolute, items, markup, module_child, text, xml_base, EntryFields, Extracted,
    FeedFields, CONTENT_NS, DC_NS,
};
use crate::xml::XmlElement;

pub(super) fn extract(root: &XmlElement) -> Extracted {
    // RSS 0.90 uses its own namespace, so the core namespace comes from the
    // channel rather than from a constant
    let channel = root.elements().find(|e| e.local_name() == "channel");
    let ns = channel.and_then(|c| c.namespace.as_deref());

    let mut feed = FeedFields::default();
    if let Some(channel) = channel {
        feed.self_link = rdf_attr(channel, "about")
            .map(str::trim)
            .filter(|about| is_absolute(about))
            .map(str::to_string);
        feed.site_link = text(channel.child(ns, "link"));
        feed.title = text(channel.child(ns, "title"));
        feed.description = text(channel.child(ns, "description"));
        feed.language = text(module_child(channel, DC_NS, "dc", "language"));
        feed.updated = date(module_child(channel, DC_NS, "dc", "date"));
        feed.icon = root
            .child(ns, "image")
            .and_then(|image| text(image.child(ns, "url")))
            .or_else(|| {
                channel
                    .child(ns, "image")
                    .and_then(|image| rdf_attr(image, "resource"))
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .map(str::to_string)
            });
    }

    Extracted {
        feed,
        entries: items(root, channel, ns)
            .into_iter()
            .map(|item| entry(item, ns))
            .collect(),
    }
}

fn entry(item: &XmlElement, ns: Option<&str>) -> EntryFields {
    EntryFields {
        identifier: rdf_attr(item, "about")
            .map(str::trim)
            .filter(|about| !about.is_empty())
            .map(str::to_string),
        title: text(item.child(ns, "title")),
        link: text(item.child(ns, "link")),
        published: date(module_child(item, DC_NS, "dc", "date")),
        author: text(module_child(item, DC_NS, "dc", "creator")),
        comments_link: None,
        enclosure: None,
        description: markup(module_child(item, CONTENT_NS, "content", "encoded"))
            .or_else(|| markup(item.child(ns, "description"))),
        base_address: xml_base(item),
        terminated: item.terminated,
    }
}

/// An `rdf:` attribute, found by local name when the prefix differs
fn rdf_attr<'a>(element: &'a XmlElement, local: &str) -> Option<&'a str> {
    element
        .attr(&format!("rdf:{}", local))
        .or_else(|| element.attr_local(local))
}
