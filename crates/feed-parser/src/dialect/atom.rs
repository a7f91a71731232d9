// crates/feed-parser/src/dialect/atom.rs
//! Atom 1.0 and the 0.3 draft

use super::{date, text, xml_base, EntryFields, Extracted, FeedFields};
use crate::feed::Enclosure;
use crate::xml::{XmlElement, XmlNode};
use quick_xml::escape::escape;

pub(super) fn extract(root: &XmlElement) -> Extracted {
    let ns = root.namespace.as_deref();

    let feed = FeedFields {
        self_link: link(root, ns, "self"),
        site_link: link(root, ns, "alternate"),
        title: text(root.child(ns, "title")),
        description: text(root.child(ns, "subtitle")).or_else(|| text(root.child(ns, "tagline"))),
        icon: text(root.child(ns, "icon")).or_else(|| text(root.child(ns, "logo"))),
        language: root
            .attr("xml:lang")
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
            .map(str::to_string),
        updated: date(root.child(ns, "updated")).or_else(|| date(root.child(ns, "modified"))),
    };

    let feed_author = author(root, ns);
    let entries = root
        .elements()
        .filter(|e| e.is(ns, "entry"))
        .map(|e| entry(e, ns, feed_author.as_deref()))
        .collect();

    Extracted { feed, entries }
}

fn entry(element: &XmlElement, ns: Option<&str>, feed_author: Option<&str>) -> EntryFields {
    let content = element.child(ns, "content");
    let description = content
        .and_then(body)
        .or_else(|| element.child(ns, "summary").and_then(body));

    let enclosure = links(element, ns, "enclosure").next().map(|link| {
        let mut enclosure = Enclosure::new(link.href.to_string());
        enclosure.mime_type = link.element.attr("type").map(|t| t.trim().to_string());
        enclosure.length = link.element.attr("length").and_then(|l| l.trim().parse().ok());
        enclosure
    });

    EntryFields {
        identifier: text(element.child(ns, "id")),
        title: text(element.child(ns, "title")),
        link: link(element, ns, "alternate"),
        published: date(element.child(ns, "published"))
            .or_else(|| date(element.child(ns, "issued")))
            .or_else(|| date(element.child(ns, "updated")))
            .or_else(|| date(element.child(ns, "modified"))),
        author: author(element, ns).or_else(|| feed_author.map(str::to_string)),
        comments_link: link(element, ns, "replies"),
        enclosure,
        description,
        base_address: content.and_then(xml_base).or_else(|| xml_base(element)),
        terminated: element.terminated,
    }
}

struct Link<'a> {
    element: &'a XmlElement,
    href: &'a str,
}

/// `link` children with the given relation, a missing `rel` means alternate
fn links<'a>(
    parent: &'a XmlElement,
    ns: Option<&'a str>,
    rel: &'a str,
) -> impl Iterator<Item = Link<'a>> + 'a {
    parent
        .elements()
        .filter(move |e| e.is(ns, "link"))
        .filter(move |e| e.attr("rel").map_or("alternate", str::trim) == rel)
        .filter_map(|element| {
            let href = element.attr("href")?.trim();
            (!href.is_empty()).then_some(Link { element, href })
        })
}

fn link(parent: &XmlElement, ns: Option<&str>, rel: &str) -> Option<String> {
    links(parent, ns, rel).next().map(|link| link.href.to_string())
}

fn author(parent: &XmlElement, ns: Option<&str>) -> Option<String> {
    parent
        .child(ns, "author")
        .and_then(|author| text(author.child(ns, "name")))
}

/// Markup of a content construct, `None` when blank
fn body(element: &XmlElement) -> Option<String> {
    let kind = element.attr("type").map(str::trim).unwrap_or("text");
    let mode = element.attr("mode").map(str::trim);

    let markup = if kind == "xhtml" || mode == Some("xml") {
        xhtml_markup(element)
    } else if kind == "text" || kind == "text/plain" {
        escape(element.text().trim()).into_owned()
    } else {
        element.text()
    };

    let trimmed = markup.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Child markup with the customary wrapping `div` removed
fn xhtml_markup(element: &XmlElement) -> String {
    let mut elements = element.elements();
    let only_div = match (elements.next(), elements.next()) {
        (Some(div), None) if div.local_name() == "div" => Some(div),
        _ => None,
    };
    let loose_text = element
        .children
        .iter()
        .any(|node| matches!(node, XmlNode::Text(t) if !t.trim().is_empty()));

    match only_div {
        Some(div) if !loose_text => div.inner_markup(),
        _ => element.inner_markup(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::read_document;
    use pretty_assertions::assert_eq;

    fn extract_str(doc: &str) -> Extracted {
        extract(&read_document(doc).expect("root"))
    }

    #[test]
    fn test_feed_links_by_rel() {
        let result = extract_str(
            r#"<feed xmlns="http://www.w3.org/2005/Atom" xml:lang="en">
                <title>Blog</title>
                <subtitle>Notes</subtitle>
                <link rel="self" href="http://blog.example.com/feed"/>
                <link href="http://blog.example.com/"/>
                <icon>http://blog.example.com/favicon.ico</icon>
                <updated>2024-01-01T12:00:00Z</updated>
            </feed>"#,
        );
        let feed = result.feed;
        assert_eq!(feed.self_link.as_deref(), Some("http://blog.example.com/feed"));
        assert_eq!(feed.site_link.as_deref(), Some("http://blog.example.com/"));
        assert_eq!(feed.description.as_deref(), Some("Notes"));
        assert_eq!(feed.icon.as_deref(), Some("http://blog.example.com/favicon.ico"));
        assert_eq!(feed.language.as_deref(), Some("en"));
        assert!(feed.updated.is_some());
    }

    #[test]
    fn test_entry_fields() {
        let result = extract_str(
            r#"<feed xmlns="http://www.w3.org/2005/Atom">
                <author><name>Feed Author</name></author>
                <entry>
                  <id>tag:example.com,2024:1</id>
                  <title>Hello</title>
                  <link rel="alternate" type="text/html" href="http://example.com/1"/>
                  <link rel="replies" href="http://example.com/1#comments"/>
                  <link rel="enclosure" type="audio/mpeg" length="42" href="http://example.com/1.mp3"/>
                  <updated>2024-01-01T12:00:00Z</updated>
                  <summary>short</summary>
                </entry>
            </feed>"#,
        );
        let entry = &result.entries[0];
        assert_eq!(entry.identifier.as_deref(), Some("tag:example.com,2024:1"));
        assert_eq!(entry.link.as_deref(), Some("http://example.com/1"));
        assert_eq!(entry.comments_link.as_deref(), Some("http://example.com/1#comments"));
        assert_eq!(entry.author.as_deref(), Some("Feed Author"));
        assert_eq!(entry.description.as_deref(), Some("short"));
        assert!(entry.published.is_some());
        let enclosure = entry.enclosure.as_ref().expect("enclosure");
        assert_eq!(enclosure.length, Some(42));
        assert!(enclosure.is_audio());
    }

    #[test]
    fn test_published_wins_over_updated() {
        let result = extract_str(
            r#"<feed xmlns="http://www.w3.org/2005/Atom"><entry><title>T</title>
                <updated>2024-02-01T00:00:00Z</updated>
                <published>2024-01-01T00:00:00Z</published>
            </entry></feed>"#,
        );
        let published = result.entries[0].published.expect("date");
        assert_eq!(published.timestamp(), 1_704_067_200);
    }

    #[test]
    fn test_content_preferred_over_summary() {
        let result = extract_str(
            r#"<feed xmlns="http://www.w3.org/2005/Atom"><entry><title>T</title>
                <summary>short</summary>
                <content type="html">&lt;p&gt;long&lt;/p&gt;</content>
            </entry></feed>"#,
        );
        assert_eq!(result.entries[0].description.as_deref(), Some("<p>long</p>"));
    }

    #[test]
    fn test_xhtml_content_is_markup() {
        let result = extract_str(
            r#"<feed xmlns="http://www.w3.org/2005/Atom"><entry><title>T</title>
                <content type="xhtml"><div xmlns="http://www.w3.org/1999/xhtml"><p>a &amp; <b>b</b></p><img src="/x.png"/></div></content>
            </entry></feed>"#,
        );
        assert_eq!(
            result.entries[0].description.as_deref(),
            Some(r#"<p>a &amp; <b>b</b></p><img src="/x.png"/>"#)
        );
    }

    #[test]
    fn test_text_content_is_escaped() {
        let result = extract_str(
            r#"<feed xmlns="http://www.w3.org/2005/Atom"><entry><title>T</title>
                <content type="text">1 &lt; 2</content>
            </entry></feed>"#,
        );
        assert_eq!(result.entries[0].description.as_deref(), Some("1 &lt; 2"));
    }

    #[test]
    fn test_atom03_names() {
        let result = extract_str(
            r#"<feed version="0.3" xmlns="http://purl.org/atom/ns#">
                <tagline>Old</tagline>
                <modified>2024-01-01T12:00:00Z</modified>
                <entry><title>T</title><issued>2024-01-01T12:00:00Z</issued>
                  <content type="application/xhtml+xml" mode="xml"><div><em>x</em></div></content>
                </entry>
            </feed>"#,
        );
        assert_eq!(result.feed.description.as_deref(), Some("Old"));
        assert!(result.feed.updated.is_some());
        let entry = &result.entries[0];
        assert!(entry.published.is_some());
        assert_eq!(entry.description.as_deref(), Some("<em>x</em>"));
    }

    #[test]
    fn test_content_base_wins() {
        let result = extract_str(
            r#"<feed xmlns="http://www.w3.org/2005/Atom">
                <entry xml:base="http://example.com/a/"><title>T</title>
                  <content type="html" xml:base="http://example.com/b/">x</content>
                </entry>
                <entry xml:base="http://example.com/a/"><title>U</title></entry>
            </feed>"#,
        );
        assert_eq!(
            result.entries[0].base_address.as_deref(),
            Some("http://example.com/b/")
        );
        assert_eq!(
            result.entries[1].base_address.as_deref(),
            Some("http://example.com/a/")
        );
    }
}
