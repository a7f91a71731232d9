//! Sanitization pass configuration section

use crate::validation::{ConfigSection, ValidationError, Validator};
use readerkit_sanitizer::{SanitizerPolicy, DEFAULT_TRUSTED_FRAME_HOSTS};
use serde::{Deserialize, Serialize};

/// Upper bound on the number of trusted frame hosts
pub const MAX_TRUSTED_FRAME_HOSTS: usize = 256;

/// Sanitization settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SanitizerConfig {
    /// Hosts whose `iframe` embeds survive sanitization, subdomains included
    pub trusted_frame_hosts: Vec<String>,

    /// Run the sanitization pass on every parsed article
    pub sanitize_on_parse: bool,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            trusted_frame_hosts: DEFAULT_TRUSTED_FRAME_HOSTS
                .iter()
                .map(|host| host.to_string())
                .collect(),
            sanitize_on_parse: true,
        }
    }
}

impl SanitizerConfig {
    /// Builds the sanitizer policy these settings describe
    pub fn policy(&self) -> SanitizerPolicy {
        SanitizerPolicy::new().with_trusted_frame_hosts(&self.trusted_frame_hosts)
    }
}

impl ConfigSection for SanitizerConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut results = vec![Validator::in_range(
            self.trusted_frame_hosts.len(),
            0,
            MAX_TRUSTED_FRAME_HOSTS,
            "sanitizer.trusted_frame_hosts",
        )];

        for (index, host) in self.trusted_frame_hosts.iter().enumerate() {
            results.push(Validator::host_name(
                host,
                &format!("sanitizer.trusted_frame_hosts[{}]", index),
            ));
        }

        Validator::collect_errors(results)
    }

    fn merge(&mut self, other: Self) {
        self.trusted_frame_hosts = other.trusted_frame_hosts;
        self.sanitize_on_parse = other.sanitize_on_parse;
    }

    fn section_name(&self) -> &'static str {
        "sanitizer"
    }
}
