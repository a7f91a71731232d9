// crates/feed-parser/src/lib.rs
//! Lenient parser for RSS 1.0, RSS 2.0 and Atom feeds
//!
//! This crate turns the raw bytes of a syndication feed into a [`Feed`] and
//! an ordered list of [`Article`]s. It is built for untrusted input:
//! - the dialect is detected from the document element alone
//! - broken XML is read as far as it goes, cut-off entries are skipped
//! - unknown entities, odd date formats and wrong encodings never fail the call
//!
//! Article bodies are returned exactly as extracted. Sanitizing them is a
//! separate pass owned by the caller.
//!
//! # Example
//!
//! ```rust
//! use readerkit_feed_parser::FeedParser;
//!
//! let atom = br#"<?xml version="1.0"?>
//! <feed xmlns="http://www.w3.org/2005/Atom">
//!   <title>My Blog</title>
//!   <link rel="self" href="http://blog.example.com/"/>
//!   <entry>
//!     <id>tag:blog.example.com,2024:1</id>
//!     <title>Hello</title>
//!     <content type="html">&lt;p&gt;Hi&lt;/p&gt;</content>
//!   </entry>
//! </feed>"#;
//!
//! let parsed = FeedParser::parse(atom, "http://blog.example.com/atom").expect("Failed to parse feed");
//! assert_eq!(&*parsed.feed.address, "http://blog.example.com/");
//! println!("Feed: {} with {} articles", parsed.feed.title, parsed.article_count());
//! ```

mod date;
mod dialect;
mod encoding;
mod error;
mod feed;
mod identity;
mod parser;
mod xml;

pub use date::parse_date;
pub use encoding::{decode, detect_encoding};
pub use error::{FeedResult, FormatError};
pub use feed::{Article, Enclosure, Feed, FeedType, ParsedFeed};
pub use identity::article_key;
pub use parser::FeedParser;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        // Verify all types are exported
        let _: FeedType = FeedType::Rss2;
        let _: Feed = Feed::new(FeedType::Atom, "http://example.com/");
        let _: Enclosure = Enclosure::new("http://example.com".to_string());
        let _: Option<chrono::DateTime<chrono::Utc>> = parse_date("2024-01-01");
    }

    #[test]
    fn test_complete_workflow() {
        let rss = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>
<rss version=\"2.0\">
  <channel>
    <title>Caf\xe9 News</title>
    <link>http://example.com/</link>
    <item>
      <title>Story 1</title>
      <link>http://example.com/1</link>
      <description>&lt;p&gt;First &amp;amp; best&lt;/p&gt;</description>
      <enclosure url=\"http://example.com/1.mp3\" type=\"audio/mpeg\" length=\"5000000\"/>
      <pubDate>Mon, 01 Jan 2024 12:00:00 GMT</pubDate>
    </item>
  </channel>
</rss>";

        let parsed = FeedParser::parse(rss, "http://example.com/rss").expect("Should parse");
        assert_eq!(parsed.feed.title, "Café News");
        assert_eq!(&*parsed.feed.address, "http://example.com/rss");
        assert_eq!(parsed.article_count(), 1);

        let item = &parsed.articles[0];
        assert_eq!(item.title, "Story 1");
        assert_eq!(item.raw_description, "<p>First &amp; best</p>");
        assert!(item.has_audio());
        assert!(item.published.is_some());
        assert!(!item.is_sanitized());
        assert_eq!(item.key, article_key(None, Some("http://example.com/1"), "Story 1"));
    }
}
