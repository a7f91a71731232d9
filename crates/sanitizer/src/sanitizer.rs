// crates/sanitizer/src/sanitizer.rs
//! The sanitization pass

use crate::policy::{SanitizerPolicy, TagAction};
use crate::resolve::{parse_base, resolve_reference};
use crate::tree::{parse_fragment, serialize, MarkupElement, MarkupNode};
use url::Url;

/// Upper bound on repair-filter rounds per call
///
/// Unwrapping can join elements the tree builder would split again on the
/// next parse, so the pass repeats until the output is stable.
const MAX_PASSES: usize = 4;

/// Makes untrusted article markup safe to render
///
/// Holds only its policy, so one instance can be shared between threads.
#[derive(Debug, Clone, Default)]
pub struct ContentSanitizer {
    policy: SanitizerPolicy,
}

impl ContentSanitizer {
    pub fn new(policy: SanitizerPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &SanitizerPolicy {
        &self.policy
    }

    /// Sanitizes `raw` and resolves its references against `base_address`
    ///
    /// Never fails. Markup with nothing worth keeping yields an empty string.
    pub fn sanitize(&self, raw: &str, base_address: &str) -> String {
        let base = parse_base(base_address);

        let mut output = self.pass(raw, base.as_ref());
        for _ in 1..MAX_PASSES {
            let again = self.pass(&output, base.as_ref());
            if again == output {
                break;
            }
            output = again;
        }
        output
    }

    fn pass(&self, markup: &str, base: Option<&Url>) -> String {
        let mut nodes = parse_fragment(markup);
        self.filter(&mut nodes, base);
        serialize(&nodes)
    }

    /// Applies the policy to `nodes` in place
    fn filter(&self, nodes: &mut Vec<MarkupNode>, base: Option<&Url>) {
        let mut kept = Vec::with_capacity(nodes.len());
        for node in nodes.drain(..) {
            match node {
                MarkupNode::Text(_) => kept.push(node),
                MarkupNode::Element(mut element) => match self.policy.tag_action(&element.name) {
                    TagAction::Remove => {
                        log::trace!("Removing <{}>", element.name);
                    }
                    TagAction::Unwrap => {
                        self.filter(&mut element.children, base);
                        kept.append(&mut element.children);
                    }
                    TagAction::Allow => {
                        if self.filter_element(&mut element, base) {
                            kept.push(MarkupNode::Element(element));
                        }
                    }
                },
            }
        }
        *nodes = kept;
    }

    /// Filters an allowed element, false when it has to go entirely
    fn filter_element(&self, element: &mut MarkupElement, base: Option<&Url>) -> bool {
        let name = element.name.as_str();
        let mut frame_host = None;

        let attributes = std::mem::take(&mut element.attributes);
        for (attribute, value) in attributes {
            if !self.policy.is_allowed_attribute(name, &attribute) {
                continue;
            }
            match self.policy.url_schemes(name, &attribute) {
                Some(schemes) => {
                    let Some(resolved) = resolve_reference(&value, base, schemes) else {
                        continue;
                    };
                    if name == "iframe" && attribute == "src" {
                        frame_host = resolved.url.host_str().map(str::to_string);
                    }
                    element.attributes.push((attribute, resolved.value));
                }
                None => element.attributes.push((attribute, value)),
            }
        }

        if name == "iframe" {
            let trusted = frame_host
                .as_deref()
                .is_some_and(|host| self.policy.is_trusted_frame_host(host));
            if !trusted {
                log::debug!("Removing iframe from untrusted host {:?}", frame_host);
                return false;
            }
            // Fallback content is only shown when frames are unsupported
            element.children.clear();
            return true;
        }

        self.filter(&mut element.children, base);
        true
    }
}
