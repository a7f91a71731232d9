// crates/sanitizer/src/resolve.rs
//! Reference resolution against the article base address

use url::{ParseError, Url};

/// A reference that passed resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Resolved {
    /// Value to write back into the attribute
    pub value: String,
    pub url: Url,
}

/// Resolves an attribute value against `base`.
///
/// Absolute references are kept exactly as written, apart from surrounding
/// whitespace. Relative references are completed against the base. `None`
/// when the value cannot be parsed, when it is relative and there is no
/// usable base, or when its scheme is not in `schemes`.
pub(crate) fn resolve_reference(
    value: &str,
    base: Option<&Url>,
    schemes: &[&str],
) -> Option<Resolved> {
    let value = value.trim();

    let resolved = match Url::parse(value) {
        Ok(url) => Resolved {
            value: value.to_string(),
            url,
        },
        Err(ParseError::RelativeUrlWithoutBase) => {
            let url = base?.join(value).ok()?;
            Resolved {
                value: url.to_string(),
                url,
            }
        }
        Err(e) => {
            log::trace!("Dropping unparseable reference '{}': {}", value, e);
            return None;
        }
    };

    if !schemes.contains(&resolved.url.scheme()) {
        log::trace!("Dropping reference with scheme '{}'", resolved.url.scheme());
        return None;
    }
    Some(resolved)
}

/// Parses the base address, `None` when it is unusable
pub(crate) fn parse_base(base: &str) -> Option<Url> {
    match Url::parse(base.trim()) {
        Ok(url) if !url.cannot_be_a_base() => Some(url),
        Ok(_) | Err(_) => {
            log::debug!("Unusable base address '{}'", base);
            None
        }
    }
}
