// crates/feed-parser/src/parser.rs
//! Feed parsing entry points

use crate::dialect::{self, is_absolute, EntryFields, Extracted, ATOM03_NS, ATOM_NS, RDF_NS};
use crate::encoding::decode;
use crate::error::{FeedResult, FormatError};
use crate::feed::{Article, Feed, FeedType, ParsedFeed};
use crate::identity::article_key;
use crate::xml::{read_document, XmlElement};
use std::sync::Arc;

/// Feed parser
///
/// Stateless: every call reads one document and returns fresh values.
pub struct FeedParser;

impl FeedParser {
    /// Parses a feed from raw bytes fetched from `origin`
    pub fn parse(bytes: &[u8], origin: &str) -> FeedResult<ParsedFeed> {
        Self::parse_with_encoding(bytes, origin, None)
    }

    /// Parses a feed, decoding with `declared_encoding` when it is a known label
    pub fn parse_with_encoding(
        bytes: &[u8],
        origin: &str,
        declared_encoding: Option<&str>,
    ) -> FeedResult<ParsedFeed> {
        let content = decode(bytes, declared_encoding);
        Self::parse_str(&content, origin)
    }

    /// Parses an already decoded document
    pub fn parse_str(content: &str, origin: &str) -> FeedResult<ParsedFeed> {
        let root = read_document(content)?;
        let feed_type = Self::detect_type(&root)?;
        let extracted = dialect::extract(feed_type, &root);
        let parsed = Self::assemble(feed_type, extracted, origin);

        log::debug!(
            "Parsed {} feed {}: {} articles, {} skipped",
            feed_type,
            parsed.feed.address,
            parsed.article_count(),
            parsed.skipped
        );
        Ok(parsed)
    }

    /// Detects the dialect from the document element alone
    fn detect_type(root: &XmlElement) -> FeedResult<FeedType> {
        let namespace = root.namespace.as_deref();
        match root.local_name() {
            "rss" if root.prefix().is_none() => Ok(FeedType::Rss2),
            "RDF" if namespace == Some(RDF_NS) || root.prefix() == Some("rdf") => {
                Ok(FeedType::Rss1)
            }
            "feed" if matches!(namespace, None | Some(ATOM_NS) | Some(ATOM03_NS)) => {
                Ok(FeedType::Atom)
            }
            _ => Err(FormatError::UnsupportedFormat(root.name.clone())),
        }
    }

    fn assemble(feed_type: FeedType, extracted: Extracted, origin: &str) -> ParsedFeed {
        let Extracted { feed: fields, entries } = extracted;

        let address = fields
            .self_link
            .filter(|link| is_absolute(link))
            .unwrap_or_else(|| origin.trim().to_string());

        let mut feed = Feed::new(feed_type, address);
        feed.title = fields.title.unwrap_or_default();
        feed.description = fields.description.unwrap_or_default();
        feed.icon_address = fields.icon;
        feed.site_link = fields.site_link;
        feed.language = fields.language;
        feed.updated = fields.updated;

        let mut articles = Vec::with_capacity(entries.len());
        let mut skipped = 0;
        for (index, entry) in entries.into_iter().enumerate() {
            match Self::article(entry, &feed.address) {
                Some(article) => articles.push(article),
                None => {
                    log::debug!("Skipping entry {} of {}", index, feed.address);
                    skipped += 1;
                }
            }
        }

        ParsedFeed {
            feed,
            articles,
            skipped,
        }
    }

    /// Builds an article, `None` for entries that cannot be identified
    fn article(entry: EntryFields, feed_address: &Arc<str>) -> Option<Article> {
        if !entry.terminated {
            return None;
        }
        if entry.identifier.is_none() && entry.link.is_none() && entry.title.is_none() {
            return None;
        }

        let title = entry.title.unwrap_or_default();
        let key = article_key(entry.identifier.as_deref(), entry.link.as_deref(), &title);

        let mut article = Article::new(key, title, Arc::clone(feed_address));
        article.link = entry.link;
        article.published = entry.published;
        article.author = entry.author;
        article.comments_link = entry.comments_link;
        article.enclosure = entry.enclosure;
        article.raw_description = entry.description.unwrap_or_default();
        article.base_address = entry.base_address;
        Some(article)
    }
}
