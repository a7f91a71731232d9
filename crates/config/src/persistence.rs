//! Reading and writing `config.toml`
//!
//! Writes never touch the live file in place: the previous file is copied to
//! `config.toml.backup`, the new contents go to a temporary file in the same
//! directory, and that file is renamed over the old one.

use crate::{Config, ConfigError, ConfigResult, CONFIG_VERSION};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const BACKUP_EXTENSION: &str = "toml.backup";

/// Header written above a freshly generated config file
const DEFAULT_HEADER: &str = "\
# readerkit configuration
#
# [app]
#   log_level          off, error, warn, info, debug or trace
#   pretty_output      indent JSON output
#
# [sanitizer]
#   trusted_frame_hosts  hosts whose iframe embeds are kept, subdomains included
#   sanitize_on_parse    sanitize article markup after parsing
#
# Environment variables READERKIT_SECTION_FIELD override these values.

";

/// The config file on disk
#[derive(Debug)]
pub struct ConfigPersistence {
    path: PathBuf,
}

impl ConfigPersistence {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn backup_path(&self) -> PathBuf {
        self.path.with_extension(BACKUP_EXTENSION)
    }

    /// Reads the config file
    ///
    /// A missing file yields the defaults. An empty or malformed file is an
    /// error. Values that parse but fail validation are kept and logged so a
    /// hand-edited file can still be fixed through the tool.
    pub fn load(&self) -> ConfigResult<Config> {
        let Some(contents) = self.read()? else {
            log::info!("No config file at {}, using defaults", self.path.display());
            return Ok(Config::default());
        };

        let mut config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })?;
        check_version(&mut config);

        if let Err(errors) = config.validate() {
            for error in &errors {
                log::warn!("{}: {}", self.path.display(), error);
            }
        }
        Ok(config)
    }

    /// Validates and writes `config`
    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        config
            .validate()
            .map_err(|errors| ConfigError::Invalid { errors })?;

        self.replace(&config.to_toml_string()?)?;
        log::info!("Config saved to {}", self.path.display());
        Ok(())
    }

    /// Writes the default config below an explanatory header
    pub fn generate_default_with_comments(&self) -> ConfigResult<()> {
        let body = Config::default().to_toml_string()?;
        self.replace(&format!("{}{}", DEFAULT_HEADER, body))?;
        log::info!("Generated default config at {}", self.path.display());
        Ok(())
    }

    /// `None` when the file does not exist
    fn read(&self) -> ConfigResult<Option<String>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if contents.trim().is_empty() {
            return Err(ConfigError::Empty {
                path: self.path.clone(),
            });
        }
        Ok(Some(contents))
    }

    fn replace(&self, contents: &str) -> ConfigResult<()> {
        let dir = self
            .path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        create_directory(dir)?;

        if self.path.exists() {
            let backup = self.backup_path();
            fs::copy(&self.path, &backup).map_err(|source| ConfigError::Backup {
                path: backup.clone(),
                source,
            })?;
            log::debug!("Backed up config to {}", backup.display());
        }

        let write_error = |source: std::io::Error| ConfigError::Write {
            path: self.path.clone(),
            source,
        };
        let mut temp = NamedTempFile::new_in(dir).map_err(write_error)?;
        temp.write_all(contents.as_bytes()).map_err(write_error)?;
        temp.as_file().sync_all().map_err(write_error)?;
        temp.persist(&self.path).map_err(|e| write_error(e.error))?;
        Ok(())
    }
}

fn create_directory(dir: &Path) -> ConfigResult<()> {
    if dir.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|source| ConfigError::CreateDirectory {
        path: dir.to_path_buf(),
        source,
    })?;
    log::info!("Created config directory {}", dir.display());
    Ok(())
}

fn check_version(config: &mut Config) {
    if config.version > CONFIG_VERSION {
        log::warn!(
            "Config version {} is newer than supported version {}, unknown settings are ignored",
            config.version,
            CONFIG_VERSION
        );
    } else if config.version < CONFIG_VERSION {
        log::info!(
            "Upgrading config version {} to {}",
            config.version,
            CONFIG_VERSION
        );
        config.version = CONFIG_VERSION;
    }
}
