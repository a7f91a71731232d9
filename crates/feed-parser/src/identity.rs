// crates/feed-parser/src/identity.rs
//! Article identity

use sha2::{Digest, Sha256};

/// Derives the stable key of an entry.
///
/// The declared identifier wins when it is non-blank. Otherwise the key is
/// the SHA-256 of link and title, so identical input always maps to the
/// same key.
pub fn article_key(identifier: Option<&str>, link: Option<&str>, title: &str) -> String {
    if let Some(id) = identifier {
        let trimmed = id.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let input = format!("{}|{}", link.map(str::trim).unwrap_or(""), title.trim());
    let hash = Sha256::digest(input.as_bytes());
    format!("{:x}", hash)
}
