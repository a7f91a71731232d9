// crates/feed-parser/src/feed.rs
//! Feed data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Supported feed dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedType {
    /// RSS 1.0 (RDF Site Summary)
    Rss1,
    /// RSS 2.0 and the 0.9x family
    Rss2,
    /// Atom 1.0 (and the 0.3 draft)
    Atom,
}

impl FeedType {
    /// Short lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            FeedType::Rss1 => "rss1",
            FeedType::Rss2 => "rss2",
            FeedType::Atom => "atom",
        }
    }
}

impl std::fmt::Display for FeedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Feed-level metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feed {
    /// Dialect the document was read as
    pub feed_type: FeedType,
    /// Canonical feed address, the sanitization base for its articles
    pub address: Arc<str>,
    /// Feed title (empty when the document has none)
    pub title: String,
    /// Feed description or subtitle (empty when absent)
    pub description: String,
    /// Icon or logo address
    pub icon_address: Option<String>,
    /// Web site the feed belongs to
    pub site_link: Option<String>,
    /// Declared language
    pub language: Option<String>,
    /// Last update time declared by the feed
    pub updated: Option<DateTime<Utc>>,
}

impl Feed {
    /// Creates a feed with only its dialect and address set
    pub fn new(feed_type: FeedType, address: impl Into<Arc<str>>) -> Self {
        Self {
            feed_type,
            address: address.into(),
            title: String::new(),
            description: String::new(),
            icon_address: None,
            site_link: None,
            language: None,
            updated: None,
        }
    }
}

/// A single entry of a feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Stable identity, see [`crate::article_key`]
    pub key: String,
    /// Entry title
    pub title: String,
    /// Entry link
    pub link: Option<String>,
    /// Publication date, absent when missing or unparseable
    pub published: Option<DateTime<Utc>>,
    /// Author or creator
    pub author: Option<String>,
    /// Discussion page
    pub comments_link: Option<String>,
    /// Media enclosure
    pub enclosure: Option<Enclosure>,
    /// Body markup exactly as extracted
    pub raw_description: String,
    /// Body markup after the sanitization pass
    pub sanitized_description: Option<String>,
    /// `xml:base` declared on the entry
    pub base_address: Option<String>,
    /// Address of the feed the entry came from
    feed_address: Arc<str>,
}

impl Article {
    /// Creates an article belonging to the feed at `feed_address`
    pub fn new(key: String, title: String, feed_address: Arc<str>) -> Self {
        Self {
            key,
            title,
            link: None,
            published: None,
            author: None,
            comments_link: None,
            enclosure: None,
            raw_description: String::new(),
            sanitized_description: None,
            base_address: None,
            feed_address,
        }
    }

    /// Address of the feed this article was read from
    pub fn feed_address(&self) -> &str {
        &self.feed_address
    }

    /// Address relative references in the body resolve against
    ///
    /// The entry's own `xml:base` wins over the feed address.
    pub fn base_address(&self) -> &str {
        self.base_address.as_deref().unwrap_or(&self.feed_address)
    }

    /// Stores the output of the sanitization pass
    pub fn set_sanitized_description(&mut self, markup: String) {
        self.sanitized_description = Some(markup);
    }

    /// True once the sanitization pass ran
    pub fn is_sanitized(&self) -> bool {
        self.sanitized_description.is_some()
    }

    /// Returns true if this item has an audio enclosure
    pub fn has_audio(&self) -> bool {
        self.enclosure.as_ref().is_some_and(|e| e.is_audio())
    }
}

/// Media enclosure (typically audio or video)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enclosure {
    /// URL to the media file
    pub url: String,
    /// MIME type (e.g., "audio/mpeg")
    pub mime_type: Option<String>,
    /// File size in bytes
    pub length: Option<u64>,
}

impl Enclosure {
    /// Creates a new enclosure
    pub fn new(url: String) -> Self {
        Self {
            url,
            mime_type: None,
            length: None,
        }
    }

    /// Returns true if this is an audio enclosure
    pub fn is_audio(&self) -> bool {
        self.mime_type
            .as_ref()
            .is_some_and(|mime| mime.starts_with("audio/"))
    }

    /// Returns true if this is a video enclosure
    pub fn is_video(&self) -> bool {
        self.mime_type
            .as_ref()
            .is_some_and(|mime| mime.starts_with("video/"))
    }
}

/// Everything one parse call produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedFeed {
    pub feed: Feed,
    /// Extracted entries in document order
    pub articles: Vec<Article>,
    /// Entries that could not be extracted
    pub skipped: usize,
}

impl ParsedFeed {
    /// Returns the number of articles
    pub fn article_count(&self) -> usize {
        self.articles.len()
    }

    /// Returns true if no article was extracted
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}
