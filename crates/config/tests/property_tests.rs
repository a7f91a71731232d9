//! Property-style tests for the configuration system

use readerkit_config::{Config, ConfigManager, LogLevel};
use tempfile::TempDir;

const ALL_LEVELS: [LogLevel; 6] = [
    LogLevel::Off,
    LogLevel::Error,
    LogLevel::Warn,
    LogLevel::Info,
    LogLevel::Debug,
    LogLevel::Trace,
];

#[test]
fn property_serialization_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    let toml_string = toml::to_string(&config)?;
    let deserialized: Config = toml::from_str(&toml_string)?;
    assert_eq!(config, deserialized);
    Ok(())
}

#[test]
fn property_default_always_valid() {
    let config = Config::default();
    assert!(config.validate().is_ok());
}

#[test]
fn property_load_save_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let manager = ConfigManager::with_directory(temp_dir.path().to_path_buf())?;

    let config = Config::default();
    manager.save(&config)?;
    let loaded = manager.load()?;
    manager.save(&loaded)?;
    let loaded2 = manager.load()?;
    assert_eq!(loaded, loaded2);
    Ok(())
}

#[test]
fn property_validation_deterministic() {
    let mut config = Config::default();
    config.sanitizer.trusted_frame_hosts = vec!["https://x".to_string()];

    let result1 = config.validate();
    let result2 = config.validate();
    assert_eq!(result1, result2);
}

#[test]
fn property_merge_preserves_validity() {
    let mut base = Config::default();
    let mut other = Config::default();
    other.app.log_level = LogLevel::Error;

    base.merge(other);
    assert!(base.validate().is_ok());
}

#[test]
fn property_every_log_level_survives_save() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let manager = ConfigManager::with_directory(temp_dir.path().to_path_buf())?;

    for level in ALL_LEVELS {
        let mut config = Config::default();
        config.app.log_level = level;
        manager.save(&config)?;
        assert_eq!(manager.load()?.app.log_level, level);
        assert_eq!(level.to_string().parse::<LogLevel>(), Ok(level));
    }
    Ok(())
}

#[test]
fn property_invalid_hosts_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let manager = ConfigManager::with_directory(temp_dir.path().to_path_buf())?;

    for bad in ["", " ", "http://a.com", "a.com/b", "a.com:80", "a b", "a.com?x", "u@a.com"] {
        let mut config = Config::default();
        config.sanitizer.trusted_frame_hosts = vec![bad.to_string()];
        assert!(manager.save(&config).is_err(), "{:?} should be rejected", bad);
    }
    Ok(())
}

#[test]
fn property_config_file_size_bounded() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let manager = ConfigManager::with_directory(temp_dir.path().to_path_buf())?;
    manager.initialize()?;

    let size = std::fs::metadata(manager.config_path())?.len();
    assert!(size < 4096, "config file unexpectedly large: {} bytes", size);
    Ok(())
}

#[test]
fn property_update_never_corrupts() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let manager = ConfigManager::with_directory(temp_dir.path().to_path_buf())?;
    manager.initialize()?;

    for i in 0..20 {
        let _ = manager.update(|config| {
            config.sanitizer.trusted_frame_hosts = if i % 3 == 0 {
                vec![format!("bad host {}", i)]
            } else {
                vec![format!("h{}.example.com", i)]
            };
        });
        let loaded = manager.load()?;
        assert!(loaded.validate().is_ok());
    }
    Ok(())
}
