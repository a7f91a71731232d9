// crates/sanitizer/src/policy.rs
//! Element, attribute and frame allowlists

/// What happens to an element and its content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagAction {
    /// Keep the element, filter its attributes
    Allow,
    /// Drop the tag, keep its children
    Unwrap,
    /// Drop the tag and everything inside it
    Remove,
}

/// Elements that execute code, load active content or take input
const REMOVED_ELEMENTS: &[&str] = &[
    "script", "style", "object", "embed", "applet", "param", "noscript", "template", "frame",
    "frameset", "noframes", "noembed", "link", "meta", "base", "head", "title", "svg", "math",
    "form", "input", "button", "select", "option", "optgroup", "textarea", "canvas", "plaintext",
    "xmp",
];

/// Allowed elements with their own attributes
const ALLOWED_ELEMENTS: &[(&str, &[&str])] = &[
    ("a", &["href", "hreflang"]),
    ("abbr", &[]),
    ("audio", &["src", "controls", "loop", "muted", "preload"]),
    ("b", &[]),
    ("bdi", &[]),
    ("bdo", &[]),
    ("blockquote", &["cite"]),
    ("br", &[]),
    ("caption", &[]),
    ("cite", &[]),
    ("code", &[]),
    ("col", &["span", "width"]),
    ("colgroup", &["span", "width"]),
    ("dd", &[]),
    ("del", &["cite", "datetime"]),
    ("details", &["open"]),
    ("dfn", &[]),
    ("div", &[]),
    ("dl", &[]),
    ("dt", &[]),
    ("em", &[]),
    ("figcaption", &[]),
    ("figure", &[]),
    ("h1", &[]),
    ("h2", &[]),
    ("h3", &[]),
    ("h4", &[]),
    ("h5", &[]),
    ("h6", &[]),
    ("hr", &[]),
    ("i", &[]),
    ("iframe", &["src", "width", "height", "allowfullscreen", "frameborder"]),
    ("img", &["src", "alt", "width", "height"]),
    ("ins", &["cite", "datetime"]),
    ("kbd", &[]),
    ("li", &["value"]),
    ("mark", &[]),
    ("ol", &["start", "reversed", "type"]),
    ("p", &[]),
    ("pre", &[]),
    ("q", &["cite"]),
    ("rp", &[]),
    ("rt", &[]),
    ("ruby", &[]),
    ("s", &[]),
    ("samp", &[]),
    ("small", &[]),
    ("source", &["src", "type", "media"]),
    ("span", &[]),
    ("strike", &[]),
    ("strong", &[]),
    ("sub", &[]),
    ("summary", &[]),
    ("sup", &[]),
    ("table", &[]),
    ("tbody", &[]),
    ("td", &["colspan", "rowspan", "headers"]),
    ("tfoot", &[]),
    ("th", &["colspan", "rowspan", "headers", "scope", "abbr"]),
    ("thead", &[]),
    ("time", &["datetime"]),
    ("tr", &[]),
    ("track", &["src", "kind", "srclang", "label", "default"]),
    ("tt", &[]),
    ("u", &[]),
    ("ul", &[]),
    ("var", &[]),
    ("video", &["src", "poster", "width", "height", "controls", "loop", "muted", "preload"]),
    ("wbr", &[]),
];

/// Attributes allowed on every allowed element
const GLOBAL_ATTRIBUTES: &[&str] = &["title", "lang", "dir"];

const WEB_SCHEMES: &[&str] = &["http", "https"];
const LINK_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Video and audio embedding providers trusted by default
pub const DEFAULT_TRUSTED_FRAME_HOSTS: &[&str] = &[
    "youtube.com",
    "youtube-nocookie.com",
    "player.vimeo.com",
    "dailymotion.com",
    "w.soundcloud.com",
    "bandcamp.com",
    "open.spotify.com",
];

/// Allowlists applied by [`crate::ContentSanitizer`]
///
/// Element and attribute rules are fixed. Only the trusted frame hosts
/// can be replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizerPolicy {
    trusted_frame_hosts: Vec<String>,
}

impl Default for SanitizerPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl SanitizerPolicy {
    /// Creates the default policy
    pub fn new() -> Self {
        Self {
            trusted_frame_hosts: DEFAULT_TRUSTED_FRAME_HOSTS
                .iter()
                .map(|host| host.to_string())
                .collect(),
        }
    }

    /// Replaces the trusted frame hosts
    ///
    /// Hosts are matched case-insensitively, blank entries are ignored.
    pub fn with_trusted_frame_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.trusted_frame_hosts = hosts
            .into_iter()
            .map(|host| normalize_host(host.as_ref()))
            .filter(|host| !host.is_empty())
            .collect();
        self
    }

    pub fn trusted_frame_hosts(&self) -> &[String] {
        &self.trusted_frame_hosts
    }

    /// Classifies an element by its lowercase local name
    pub fn tag_action(&self, element: &str) -> TagAction {
        if REMOVED_ELEMENTS.contains(&element) {
            TagAction::Remove
        } else if allowed_attributes(element).is_some() {
            TagAction::Allow
        } else {
            TagAction::Unwrap
        }
    }

    /// True when `attribute` may stay on the allowed `element`
    pub fn is_allowed_attribute(&self, element: &str, attribute: &str) -> bool {
        GLOBAL_ATTRIBUTES.contains(&attribute)
            || allowed_attributes(element).is_some_and(|attrs| attrs.contains(&attribute))
    }

    /// Schemes accepted when `attribute` of `element` carries an address.
    ///
    /// `None` for attributes that are not addresses.
    pub fn url_schemes(&self, element: &str, attribute: &str) -> Option<&'static [&'static str]> {
        match (element, attribute) {
            ("a", "href") => Some(LINK_SCHEMES),
            ("img" | "iframe" | "audio" | "source" | "track" | "video", "src")
            | ("video", "poster")
            | ("blockquote" | "q" | "del" | "ins", "cite") => Some(WEB_SCHEMES),
            _ => None,
        }
    }

    /// True when `host` is a trusted frame host or one of its subdomains
    pub fn is_trusted_frame_host(&self, host: &str) -> bool {
        let host = normalize_host(host);
        self.trusted_frame_hosts.iter().any(|trusted| {
            host == *trusted
                || host
                    .strip_suffix(trusted.as_str())
                    .is_some_and(|rest| rest.ends_with('.'))
        })
    }
}

fn allowed_attributes(element: &str) -> Option<&'static [&'static str]> {
    ALLOWED_ELEMENTS
        .iter()
        .find(|(name, _)| *name == element)
        .map(|(_, attrs)| *attrs)
}

fn normalize_host(host: &str) -> String {
    host.trim().trim_end_matches('.').to_ascii_lowercase()
}
