//! readerkit configuration
//!
//! Settings for the command-line driver and the sanitization pass, stored
//! as TOML in the platform config directory. Every section implements
//! [`ConfigSection`], so new sections plug into validation and merging
//! without touching the others.
//!
//! - **Graceful degradation**: an unreadable file falls back to defaults with a warning
//! - **Atomic writes**: the file is replaced through a temporary file, never rewritten in place
//! - **Environment overrides**: `READERKIT_SECTION_FIELD` variables win over the file
//!
//! # Example
//!
//! ```rust,no_run
//! use readerkit_config::{Config, ConfigManager};
//!
//! let manager = ConfigManager::new().expect("Failed to initialize config");
//! let config = manager.load().unwrap_or_else(|e| {
//!     eprintln!("Config error: {}, using defaults", e);
//!     Config::default()
//! });
//!
//! let policy = config.sanitizer.policy();
//! println!("{} trusted frame hosts", policy.trusted_frame_hosts().len());
//! ```

mod error;
mod manager;
mod persistence;
mod validation;

// Config sections
pub mod app_config;
pub mod sanitizer_config;

pub use error::{ConfigError, ConfigResult, ValidationError};
pub use manager::{
    ConfigManager, ENV_LOG_LEVEL, ENV_PRETTY_OUTPUT, ENV_SANITIZE_ON_PARSE,
    ENV_TRUSTED_FRAME_HOSTS,
};
pub use validation::{ConfigSection, Validator};

pub use app_config::{AppConfig, LogLevel};
pub use sanitizer_config::{SanitizerConfig, MAX_TRUSTED_FRAME_HOSTS};

use serde::{Deserialize, Serialize};

/// Current config file format version
pub const CONFIG_VERSION: u32 = 1;

/// Root configuration structure
///
/// Missing sections and fields take their default values when loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Config file format version
    pub version: u32,

    /// Command-line driver settings
    pub app: AppConfig,

    /// Sanitization pass settings
    pub sanitizer: SanitizerConfig,
}

impl Config {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the entire configuration
    ///
    /// Returns all validation errors found across all sections.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(mut e) = self.app.validate() {
            errors.append(&mut e);
        }

        if let Err(mut e) = self.sanitizer.validate() {
            errors.append(&mut e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Renders the config as it would be written to disk
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Merges this config with another, preferring values from `other`
    ///
    /// Override chain: defaults < file < env vars < CLI args
    pub fn merge(&mut self, other: Config) {
        self.app.merge(other.app);
        self.sanitizer.merge(other.sanitizer);
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            app: AppConfig::default(),
            sanitizer: SanitizerConfig::default(),
        }
    }
}
