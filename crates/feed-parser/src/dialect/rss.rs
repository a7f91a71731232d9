// crates/feed-parser/src/dialect/rss.rs
//! RSS 2.0 and the 0.9x family

use super::{
    atom_self_link, date, items, markup, module_child, text, xml_base, EntryFields, Extracted,
    FeedFields, CONTENT_NS, DC_NS,
};
use crate::feed::Enclosure;
use crate::xml::XmlElement;

pub(super) fn extract(root: &XmlElement) -> Extracted {
    let ns = root.namespace.as_deref();
    // Some publishers put items straight under <rss>
    let found = root.child(ns, "channel");
    let channel = found.unwrap_or(root);

    let feed = FeedFields {
        self_link: atom_self_link(channel),
        site_link: text(channel.child(ns, "link")),
        title: text(channel.child(ns, "title")),
        description: text(channel.child(ns, "description")),
        icon: channel
            .child(ns, "image")
            .and_then(|image| text(image.child(ns, "url"))),
        language: text(channel.child(ns, "language")),
        updated: date(channel.child(ns, "lastBuildDate"))
            .or_else(|| date(channel.child(ns, "pubDate")))
            .or_else(|| date(module_child(channel, DC_NS, "dc", "date"))),
    };

    Extracted {
        feed,
        entries: items(root, found, ns)
            .into_iter()
            .map(|item| entry(item, ns))
            .collect(),
    }
}

fn entry(item: &XmlElement, ns: Option<&str>) -> EntryFields {
    let guid = item.child(ns, "guid");
    let identifier = text(guid);

    // A permalink guid doubles as the link when <link> is missing
    let link = text(item.child(ns, "link")).or_else(|| {
        let guid = guid?;
        let permalink = guid.attr("isPermaLink").map(str::trim) != Some("false");
        identifier
            .clone()
            .filter(|id| permalink && (id.starts_with("http://") || id.starts_with("https://")))
    });

    let description = markup(module_child(item, CONTENT_NS, "content", "encoded"))
        .or_else(|| markup(item.child(ns, "description")));

    EntryFields {
        identifier,
        title: text(item.child(ns, "title")),
        link,
        published: date(item.child(ns, "pubDate"))
            .or_else(|| date(module_child(item, DC_NS, "dc", "date"))),
        author: text(item.child(ns, "author"))
            .or_else(|| text(module_child(item, DC_NS, "dc", "creator"))),
        comments_link: text(item.child(ns, "comments")),
        enclosure: item.child(ns, "enclosure").and_then(enclosure),
        description,
        base_address: xml_base(item),
        terminated: item.terminated,
    }
}

fn enclosure(element: &XmlElement) -> Option<Enclosure> {
    let url = element.attr("url")?.trim();
    if url.is_empty() {
        return None;
    }
    let mut enclosure = Enclosure::new(url.to_string());
    enclosure.mime_type = element
        .attr("type")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);
    enclosure.length = element.attr("length").and_then(|l| l.trim().parse().ok());
    Some(enclosure)
}
