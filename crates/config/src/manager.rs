//! Configuration manager - main API for config operations

use crate::persistence::ConfigPersistence;
use crate::{Config, ConfigError, ConfigResult, LogLevel, ValidationError};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.toml";

pub const ENV_LOG_LEVEL: &str = "READERKIT_APP_LOG_LEVEL";
pub const ENV_PRETTY_OUTPUT: &str = "READERKIT_APP_PRETTY_OUTPUT";
/// Comma-separated host list
pub const ENV_TRUSTED_FRAME_HOSTS: &str = "READERKIT_SANITIZER_TRUSTED_FRAME_HOSTS";
pub const ENV_SANITIZE_ON_PARSE: &str = "READERKIT_SANITIZER_SANITIZE_ON_PARSE";

/// Entry point for everything that touches the config file
#[derive(Debug)]
pub struct ConfigManager {
    persistence: ConfigPersistence,
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Uses the platform config directory
    ///
    /// - Linux: `$XDG_CONFIG_HOME/readerkit/` or `~/.config/readerkit/`
    /// - macOS: `~/Library/Application Support/readerkit/`
    /// - Windows: `%APPDATA%\readerkit\config\`
    pub fn new() -> ConfigResult<Self> {
        let dirs = ProjectDirs::from("", "", "readerkit").ok_or_else(|| {
            ConfigError::NoConfigDirectory("no home directory for the current user".to_string())
        })?;
        Self::with_directory(dirs.config_dir())
    }

    /// Uses `config_dir` in place of the platform directory
    ///
    /// The directory is created on the first write, not here.
    pub fn with_directory(config_dir: impl Into<PathBuf>) -> ConfigResult<Self> {
        let config_dir = config_dir.into();
        Ok(Self {
            persistence: ConfigPersistence::new(config_dir.join(CONFIG_FILE_NAME)),
            config_dir,
        })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// Reads the config file, or the defaults when there is none
    pub fn load(&self) -> ConfigResult<Config> {
        self.persistence.load()
    }

    /// Like [`load`](Self::load), but a broken file degrades to the defaults
    pub fn load_or_default(&self) -> Config {
        self.load().unwrap_or_else(|e| {
            log::warn!("{}, using default config", e);
            Config::default()
        })
    }

    /// Validates `config` and writes it atomically
    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        self.persistence.save(config)
    }

    /// Load, modify, save
    ///
    /// Nothing is written when the modified config fails validation.
    ///
    /// ```rust,no_run
    /// # use readerkit_config::ConfigManager;
    /// # fn main() -> readerkit_config::ConfigResult<()> {
    /// let manager = ConfigManager::new()?;
    /// manager.update(|config| {
    ///     config.sanitizer.trusted_frame_hosts.push("media.example.org".to_string());
    /// })?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn update<F>(&self, modify: F) -> ConfigResult<()>
    where
        F: FnOnce(&mut Config),
    {
        let mut config = self.load()?;
        modify(&mut config);
        self.save(&config)
    }

    /// Writes a commented default file unless one exists
    ///
    /// Returns whether a file was written.
    pub fn initialize(&self) -> ConfigResult<bool> {
        let path = self.config_path();
        if path.exists() {
            log::info!("Keeping existing config at {}", path.display());
            return Ok(false);
        }
        self.persistence.generate_default_with_comments()?;
        Ok(true)
    }

    /// Overwrites the file with the defaults, keeping a backup of the old one
    pub fn reset(&self) -> ConfigResult<()> {
        self.save(&Config::default())
    }

    /// Validation errors of the file as it is on disk
    pub fn validate(&self) -> ConfigResult<Vec<ValidationError>> {
        Ok(self.load()?.validate().err().unwrap_or_default())
    }

    /// Loads the configuration with environment variable overrides applied
    ///
    /// Environment variables follow the pattern: READERKIT_SECTION_FIELD
    /// Example: READERKIT_APP_LOG_LEVEL=debug
    pub fn load_with_env_overrides(&self) -> ConfigResult<Config> {
        let mut config = self.load()?;
        Self::apply_overrides(&mut config, |name| std::env::var(name).ok());
        Ok(config)
    }

    /// Applies `READERKIT_*` overrides read through `lookup`
    ///
    /// Unparseable values are ignored with a warning and leave the field
    /// unchanged.
    pub fn apply_overrides<F>(config: &mut Config, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            match level.parse::<LogLevel>() {
                Ok(level) => config.app.log_level = level,
                Err(e) => log::warn!("Ignoring {}: {}", ENV_LOG_LEVEL, e),
            }
        }

        if let Some(pretty) = lookup(ENV_PRETTY_OUTPUT) {
            match parse_flag(&pretty) {
                Some(pretty) => config.app.pretty_output = pretty,
                None => log::warn!("Ignoring {}: not a boolean ({})", ENV_PRETTY_OUTPUT, pretty),
            }
        }

        if let Some(hosts) = lookup(ENV_TRUSTED_FRAME_HOSTS) {
            config.sanitizer.trusted_frame_hosts = hosts
                .split(',')
                .map(str::trim)
                .filter(|host| !host.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(enabled) = lookup(ENV_SANITIZE_ON_PARSE) {
            match parse_flag(&enabled) {
                Some(enabled) => config.sanitizer.sanitize_on_parse = enabled,
                None => log::warn!(
                    "Ignoring {}: not a boolean ({})",
                    ENV_SANITIZE_ON_PARSE,
                    enabled
                ),
            }
        }

        // Validate after applying overrides
        if let Err(errors) = config.validate() {
            log::warn!(
                "Config validation warnings after env overrides: {:?}",
                errors
            );
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn setup_test_manager() -> (TempDir, ConfigManager) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let manager = ConfigManager::with_directory(temp_dir.path().to_path_buf())
            .expect("Failed to create manager");
        (temp_dir, manager)
    }

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_load_or_default_with_missing_file() {
        let (_temp_dir, manager) = setup_test_manager();
        let config = manager.load_or_default();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_or_default_with_corrupt_file() {
        let (_temp_dir, manager) = setup_test_manager();
        std::fs::write(manager.config_path(), "[app\nlog_level = ").expect("Should write");

        assert!(manager.load().is_err());
        assert_eq!(manager.load_or_default(), Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let (_temp_dir, manager) = setup_test_manager();

        let mut config = Config::default();
        config.app.log_level = LogLevel::Debug;

        manager.save(&config).expect("Should save config");
        let loaded = manager.load().expect("Should load config");

        assert_eq!(loaded.app.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_update() {
        let (_temp_dir, manager) = setup_test_manager();

        manager.save(&Config::default()).expect("Should save");

        manager
            .update(|config| {
                config.sanitizer.sanitize_on_parse = false;
            })
            .expect("Should update");

        let loaded = manager.load().expect("Should load");
        assert!(!loaded.sanitizer.sanitize_on_parse);
    }

    #[test]
    fn test_initialize_creates_file() {
        let (_temp_dir, manager) = setup_test_manager();

        let created = manager.initialize().expect("Should initialize");
        assert!(created);
        assert!(manager.config_path().exists());
        assert_eq!(manager.load().expect("Should load"), Config::default());
    }

    #[test]
    fn test_initialize_with_existing_file() {
        let (_temp_dir, manager) = setup_test_manager();

        manager.save(&Config::default()).expect("Should save");

        let created = manager.initialize().expect("Should initialize");
        assert!(!created);
    }

    #[test]
    fn test_reset() {
        let (_temp_dir, manager) = setup_test_manager();

        let mut config = Config::default();
        config.sanitizer.trusted_frame_hosts = vec!["example.com".to_string()];
        manager.save(&config).expect("Should save");

        manager.reset().expect("Should reset");

        let loaded = manager.load().expect("Should load");
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_validate_valid_config() {
        let (_temp_dir, manager) = setup_test_manager();
        manager.save(&Config::default()).expect("Should save");

        let errors = manager.validate().expect("Should validate");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_validate_reports_hand_edited_errors() {
        let (_temp_dir, manager) = setup_test_manager();
        std::fs::write(
            manager.config_path(),
            "[sanitizer]\ntrusted_frame_hosts = [\"https://www.youtube.com/\"]\n",
        )
        .expect("Should write");

        let errors = manager.validate().expect("Should validate");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "sanitizer.trusted_frame_hosts[0]");
    }

    #[test]
    fn test_save_rejects_invalid_config() {
        let (_temp_dir, manager) = setup_test_manager();

        let mut config = Config::default();
        config.sanitizer.trusted_frame_hosts = vec!["player.vimeo.com/video".to_string()];
        manager
            .save(&config)
            .expect_err("Should not save invalid config");
        assert!(!manager.config_path().exists());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        ConfigManager::apply_overrides(
            &mut config,
            lookup_from(&[
                (ENV_LOG_LEVEL, "trace"),
                (ENV_PRETTY_OUTPUT, "false"),
                (ENV_TRUSTED_FRAME_HOSTS, " media.example.org, ,player.vimeo.com "),
                (ENV_SANITIZE_ON_PARSE, "0"),
            ]),
        );

        assert_eq!(config.app.log_level, LogLevel::Trace);
        assert!(!config.app.pretty_output);
        assert_eq!(
            config.sanitizer.trusted_frame_hosts,
            vec!["media.example.org".to_string(), "player.vimeo.com".to_string()]
        );
        assert!(!config.sanitizer.sanitize_on_parse);
    }

    #[test]
    fn test_unparseable_env_overrides_are_ignored() {
        let mut config = Config::default();
        ConfigManager::apply_overrides(
            &mut config,
            lookup_from(&[(ENV_LOG_LEVEL, "loud"), (ENV_SANITIZE_ON_PARSE, "maybe")]),
        );
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_no_env_overrides() {
        let mut config = Config::default();
        ConfigManager::apply_overrides(&mut config, |_| None);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_file_path() {
        let (temp_dir, manager) = setup_test_manager();
        assert_eq!(manager.config_dir(), temp_dir.path());
        assert!(manager.config_path().ends_with("config.toml"));
    }
}
