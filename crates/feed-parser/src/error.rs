// crates/feed-parser/src/error.rs
//! Error types for feed parsing
//!
//! Only whole-document failures are errors. Problems with a single entry
//! are counted in [`crate::ParsedFeed::skipped`] instead.

use thiserror::Error;

/// Result type for feed parser operations
pub type FeedResult<T> = Result<T, FormatError>;

/// The byte stream could not be identified as a supported feed dialect
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// No root element could be read
    #[error("No root element found")]
    NoRootElement,

    /// The reader failed before a root element was identified
    #[error("Invalid XML: {0}")]
    InvalidXml(String),

    /// Root element matches none of the supported dialects
    #[error("Unsupported feed format: {0}")]
    UnsupportedFormat(String),
}

impl From<quick_xml::Error> for FormatError {
    fn from(err: quick_xml::Error) -> Self {
        FormatError::InvalidXml(err.to_string())
    }
}
