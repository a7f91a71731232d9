//! Integration tests for the configuration system

use readerkit_config::{
    AppConfig, Config, ConfigManager, ConfigSection, LogLevel, SanitizerConfig, CONFIG_VERSION,
    ENV_LOG_LEVEL, ENV_TRUSTED_FRAME_HOSTS,
};
use pretty_assertions::assert_eq;
use readerkit_sanitizer::ContentSanitizer;
use tempfile::TempDir;

fn setup_test_manager() -> Result<(TempDir, ConfigManager), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let manager = ConfigManager::with_directory(temp_dir.path().to_path_buf())?;
    Ok((temp_dir, manager))
}

#[test]
fn test_full_lifecycle() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;

    let created = manager.initialize()?;
    assert!(created);

    let config = manager.load()?;
    assert_eq!(config.version, CONFIG_VERSION);

    let mut modified = config.clone();
    modified.app.log_level = LogLevel::Info;
    modified.sanitizer.sanitize_on_parse = false;
    manager.save(&modified)?;

    let reloaded = manager.load()?;
    assert_eq!(reloaded.app.log_level, LogLevel::Info);
    assert!(!reloaded.sanitizer.sanitize_on_parse);

    manager.reset()?;
    let after_reset = manager.load()?;
    assert_eq!(after_reset, Config::default());

    Ok(())
}

#[test]
fn test_config_validation_integration() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;

    manager.save(&Config::default())?;

    let errors = manager.validate()?;
    assert!(errors.is_empty());

    let mut invalid = Config::default();
    invalid.sanitizer.trusted_frame_hosts = vec!["https://player.vimeo.com".to_string()];
    let result = manager.save(&invalid);
    assert!(result.is_err());

    Ok(())
}

#[test]
fn test_atomic_save() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;

    let config = Config::default();
    manager.save(&config)?;

    assert!(manager.config_path().exists());

    manager.save(&config)?;

    let backup_path = manager.config_path().with_extension("toml.backup");
    assert!(backup_path.exists());

    Ok(())
}

#[test]
fn test_merge_functionality() {
    let mut base = Config::default();
    let mut override_config = Config::default();

    override_config.app.pretty_output = false;
    override_config.sanitizer.trusted_frame_hosts = vec!["media.example.org".to_string()];

    base.merge(override_config);

    assert!(!base.app.pretty_output);
    assert_eq!(
        base.sanitizer.trusted_frame_hosts,
        vec!["media.example.org".to_string()]
    );
}

#[test]
fn test_all_sections_default_are_valid() {
    let app = AppConfig::default();
    assert!(app.validate().is_ok());

    let sanitizer = SanitizerConfig::default();
    assert!(sanitizer.validate().is_ok());
}

#[test]
fn test_update_closure() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    manager.initialize()?;

    manager.update(|config| {
        config
            .sanitizer
            .trusted_frame_hosts
            .push("media.example.org".to_string());
    })?;

    let config = manager.load()?;
    assert!(config
        .sanitizer
        .trusted_frame_hosts
        .contains(&"media.example.org".to_string()));

    Ok(())
}

#[test]
fn test_graceful_degradation_on_load_error() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    std::fs::write(manager.config_path(), "version = \"one\"")?;

    let config = manager.load_or_default();
    assert_eq!(config, Config::default());

    Ok(())
}

#[test]
fn test_serialization_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::default();
    config.app.log_level = LogLevel::Trace;
    config.sanitizer.trusted_frame_hosts = vec!["w.soundcloud.com".to_string()];

    let toml_string = toml::to_string(&config)?;
    let deserialized: Config = toml::from_str(&toml_string)?;
    assert_eq!(config, deserialized);
    Ok(())
}

#[test]
fn test_env_overrides_on_loaded_file() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;

    let mut saved = Config::default();
    saved.app.pretty_output = false;
    manager.save(&saved)?;

    let mut config = manager.load()?;
    ConfigManager::apply_overrides(&mut config, |name| match name {
        n if n == ENV_LOG_LEVEL => Some("debug".to_string()),
        n if n == ENV_TRUSTED_FRAME_HOSTS => Some("media.example.org".to_string()),
        _ => None,
    });

    assert_eq!(config.app.log_level, LogLevel::Debug);
    assert!(!config.app.pretty_output);
    assert_eq!(
        config.sanitizer.trusted_frame_hosts,
        vec!["media.example.org".to_string()]
    );

    Ok(())
}

#[test]
fn test_config_version_is_preserved() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    manager.save(&Config::default())?;

    let loaded = manager.load()?;
    assert_eq!(loaded.version, CONFIG_VERSION);

    Ok(())
}

#[test]
fn test_multiple_validation_errors_collected() {
    let mut config = Config::default();
    config.sanitizer.trusted_frame_hosts = vec![
        "".to_string(),
        "player.vimeo.com:443".to_string(),
        "www.youtube.com".to_string(),
        "has space.com".to_string(),
    ];

    let errors = config.validate().expect_err("Should be invalid");
    assert_eq!(errors.len(), 3);
}

#[test]
fn test_configured_policy_drives_sanitizer() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;

    let mut config = Config::default();
    config.sanitizer.trusted_frame_hosts = vec!["media.example.org".to_string()];
    manager.save(&config)?;

    let sanitizer = ContentSanitizer::new(manager.load()?.sanitizer.policy());
    let body = r#"<iframe src="https://media.example.org/embed/1"></iframe><iframe src="http://player.vimeo.com/video/1"></iframe>"#;
    let html = sanitizer.sanitize(body, "http://blog.example.com/");

    assert!(html.contains("media.example.org"));
    assert!(!html.contains("vimeo"));

    Ok(())
}
