// crates/sanitizer/src/lib.rs
//! Allowlist sanitizer for article markup
//!
//! Feed bodies are arbitrary HTML from untrusted publishers. This crate
//! repairs them, removes everything that can execute code or load active
//! content, and resolves relative references against the article's base
//! address. Embedded frames survive only when they point to a trusted
//! media provider.
//!
//! # Example
//!
//! ```rust
//! let safe = readerkit_sanitizer::sanitize(
//!     r#"<p onclick="steal()">Hi <img src="/themes/x/smiley.png"><script>x()</script></p>"#,
//!     "http://blog.akewea.com/",
//! );
//! assert_eq!(safe, r#"<p>Hi <img src="http://blog.akewea.com/themes/x/smiley.png"></p>"#);
//! ```

mod policy;
mod resolve;
mod sanitizer;
mod tree;

pub use policy::{SanitizerPolicy, TagAction, DEFAULT_TRUSTED_FRAME_HOSTS};
pub use sanitizer::ContentSanitizer;
pub use tree::MAX_DEPTH;

/// Sanitizes `raw` with the default policy
pub fn sanitize(raw: &str, base_address: &str) -> String {
    ContentSanitizer::default().sanitize(raw, base_address)
}
