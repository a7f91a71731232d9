//! Benchmarks for configuration system
//!
//! Run with: cargo bench --package readerkit-config

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use readerkit_config::{Config, ConfigManager, ENV_TRUSTED_FRAME_HOSTS};
use tempfile::TempDir;

fn setup_manager() -> (TempDir, ConfigManager) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let manager = ConfigManager::with_directory(temp_dir.path().to_path_buf())
        .expect("Failed to create manager");
    (temp_dir, manager)
}

fn bench_config_validation(c: &mut Criterion) {
    let config = Config::default();

    c.bench_function("config_validate", |b| {
        b.iter(|| {
            let result = config.validate();
            black_box(result);
        });
    });
}

fn bench_config_deserialization(c: &mut Criterion) {
    let toml_string = toml::to_string(&Config::default()).expect("Failed to serialize");

    c.bench_function("config_deserialize_toml", |b| {
        b.iter(|| {
            let config: Config =
                toml::from_str(black_box(&toml_string)).expect("Failed to deserialize");
            black_box(config);
        });
    });
}

fn bench_config_save(c: &mut Criterion) {
    let (_temp_dir, manager) = setup_manager();
    let config = Config::default();

    c.bench_function("config_save", |b| {
        b.iter(|| {
            manager.save(&config).expect("Failed to save");
        });
    });
}

fn bench_config_load(c: &mut Criterion) {
    let (_temp_dir, manager) = setup_manager();
    manager.initialize().expect("Failed to initialize");

    c.bench_function("config_load", |b| {
        b.iter(|| {
            let loaded = manager.load().expect("Failed to load");
            black_box(loaded);
        });
    });
}

fn bench_env_overrides(c: &mut Criterion) {
    let hosts = "www.youtube.com, player.vimeo.com, media.example.org".to_string();

    c.bench_function("config_apply_overrides", |b| {
        b.iter(|| {
            let mut config = Config::default();
            ConfigManager::apply_overrides(&mut config, |name| {
                (name == ENV_TRUSTED_FRAME_HOSTS).then(|| hosts.clone())
            });
            black_box(config);
        });
    });
}

fn bench_policy_from_config(c: &mut Criterion) {
    let config = Config::default();

    c.bench_function("config_sanitizer_policy", |b| {
        b.iter(|| {
            let policy = config.sanitizer.policy();
            black_box(policy);
        });
    });
}

criterion_group!(
    benches,
    bench_config_validation,
    bench_config_deserialization,
    bench_config_save,
    bench_config_load,
    bench_env_overrides,
    bench_policy_from_config
);

criterion_main!(benches);
