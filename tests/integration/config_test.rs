use sb::core::{Config, ConfigSource, DEFAULT_DELIMITER};
use sb::error::SbError;
use sb::providers::builtin_registry;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_missing_file_gives_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::load_from(&temp_dir.path().join("config.toml")).unwrap();

    assert_eq!(config, Config::default());
    assert_eq!(config.delimiter, DEFAULT_DELIMITER);
}

#[test]
fn test_malformed_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "[blocks\ncpu = true").unwrap();

    match Config::load_from(&path) {
        Err(SbError::ConfigParse { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected ConfigParse, got {:?}", other),
    }
}

#[test]
fn test_overrides_applied_and_unknown_ignored() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(
        &path,
        "[blocks]\ncpu = true\ntime = false\nnot_a_block = true\n",
    )
    .unwrap();

    let config = ConfigSource::File(path).load().unwrap();
    let mut registry = builtin_registry();
    config.apply_to(&mut registry);

    let enabled: Vec<_> = registry.enabled().map(|(_, b)| b.name()).collect();
    assert_eq!(enabled, vec!["cpu"]);
}

#[test]
fn test_removed_key_restores_default() {
    let mut registry = builtin_registry();

    let config = Config::parse("[blocks]\ntime = false").unwrap();
    config.apply_to(&mut registry);
    assert_eq!(registry.enabled().count(), 0);

    Config::default().apply_to(&mut registry);
    let enabled: Vec<_> = registry.enabled().map(|(_, b)| b.name()).collect();
    assert_eq!(enabled, vec!["time"]);
}

#[test]
fn test_provider_settings_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(
        &path,
        "delimiter = \" / \"\n[providers]\nbattery = \"BAT1\"\nnotify = false\n",
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.delimiter, " / ");
    assert_eq!(config.providers.battery, "BAT1");
    assert!(!config.providers.notify);
    assert_eq!(config.providers.mpv_socket, "/tmp/mpvsocket");
}
