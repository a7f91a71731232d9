// crates/feed-parser/src/date.rs
//! Date parsing for every dialect
//!
//! RSS 2.0 uses RFC 822 dates, Atom and Dublin Core use RFC 3339. Real
//! feeds mix both and add their own variations, so every date goes through
//! the same chain and anything that still fails is simply absent.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Offsets for zone abbreviations chrono's RFC 2822 parser does not know
const ZONE_ABBREVIATIONS: &[(&str, &str)] = &[
    ("UTC", "+0000"),
    ("GMT", "+0000"),
    ("Z", "+0000"),
    ("WET", "+0000"),
    ("BST", "+0100"),
    ("CET", "+0100"),
    ("CEST", "+0200"),
    ("MET", "+0100"),
    ("MEST", "+0200"),
    ("EET", "+0200"),
    ("EEST", "+0300"),
    ("MSK", "+0300"),
    ("IST", "+0530"),
    ("JST", "+0900"),
    ("AEST", "+1000"),
    ("AEDT", "+1100"),
];

/// Formats with an explicit offset
///
/// `%A` and `%B` accept abbreviated and full names when parsing.
const OFFSET_FORMATS: &[&str] = &[
    "%A, %d %B %Y %H:%M:%S %z",
    "%A, %d %B %Y %H:%M %z",
    "%A %d %B %Y %H:%M:%S %z",
    "%d %B %Y %H:%M:%S %z",
    "%d %B %Y %H:%M %z",
    "%A, %d %B %Y %H:%M:%S%.f %z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f %z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
];

/// Formats without an offset, read as UTC
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%A, %d %B %Y %H:%M:%S",
    "%d %B %Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%A, %d %B %Y", "%d %B %Y"];

/// Parses a feed date, `None` when no known format matches
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    // Abbreviations are swapped first: chrono reads unknown short zone names
    // as UTC instead of rejecting them.
    DateTime::parse_from_rfc3339(value)
        .ok()
        .or_else(|| parse_lenient(&replace_zone_abbreviation(value)))
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            log::trace!("Unparseable date '{}'", value);
            None
        })
}

/// Swaps a trailing zone abbreviation for its numeric offset
fn replace_zone_abbreviation(value: &str) -> String {
    if let Some((head, zone)) = value.rsplit_once(' ') {
        if let Some((_, offset)) = ZONE_ABBREVIATIONS.iter().find(|(abbr, _)| *abbr == zone) {
            return format!("{} {}", head.trim_end(), offset);
        }
    }
    value.to_string()
}

fn parse_lenient(value: &str) -> Option<DateTime<FixedOffset>> {
    let utc = FixedOffset::east_opt(0)?;

    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt);
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return utc.from_local_datetime(&naive).single();
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            let naive = date.and_hms_opt(0, 0, 0)?;
            return utc.from_local_datetime(&naive).single();
        }
    }
    None
}
