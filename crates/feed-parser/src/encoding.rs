// crates/feed-parser/src/encoding.rs
//! Character encoding detection and decoding

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

/// How far into the document the XML declaration is searched for
const DECLARATION_WINDOW: usize = 1024;

/// Picks the encoding of a feed document.
///
/// The caller's declaration wins, then a byte-order mark, then the
/// `encoding` pseudo-attribute of the XML declaration, then UTF-8.
/// Labels `encoding_rs` does not know are skipped.
pub fn detect_encoding(bytes: &[u8], declared: Option<&str>) -> &'static Encoding {
    if let Some(label) = declared {
        match Encoding::for_label(label.trim().as_bytes()) {
            Some(encoding) => return encoding,
            None => log::debug!("Ignoring unknown declared encoding '{}'", label),
        }
    }

    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    if let Some(label) = declaration_encoding(bytes) {
        match Encoding::for_label(label.as_bytes()) {
            // The declaration was readable as ASCII, so the bytes cannot be UTF-16
            Some(encoding) if encoding == UTF_16LE || encoding == UTF_16BE => return UTF_8,
            Some(encoding) => return encoding,
            None => log::debug!("Ignoring unknown document encoding '{}'", label),
        }
    }

    UTF_8
}

/// Decodes `bytes`, replacing malformed sequences instead of failing
pub fn decode(bytes: &[u8], declared: Option<&str>) -> String {
    let encoding = detect_encoding(bytes, declared);
    let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
    if had_errors {
        log::debug!("Replaced malformed {} sequences", encoding.name());
    }
    text.into_owned()
}

/// Reads the `encoding` pseudo-attribute of a leading XML declaration
fn declaration_encoding(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(DECLARATION_WINDOW)];
    let head = String::from_utf8_lossy(head);
    let declaration = head.trim_start().strip_prefix("<?xml")?;
    let declaration = &declaration[..declaration.find("?>")?];

    let (_, rest) = declaration.split_once("encoding")?;
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &rest[1..];
    let end = value.find(quote)?;
    Some(value[..end].trim().to_string())
}
