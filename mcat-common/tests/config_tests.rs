//! Unit tests for bootstrap configuration resolution
//!
//! Covers the priority order CLI → ENV → TOML → compiled default for the
//! data directory, host and port, and tolerance of a missing default config.
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate MCAT_* variables are marked with #[serial].

use mcat_common::config::{
    resolve_data_dir, BootstrapConfig, CliOverrides, CompiledDefaults, TomlConfig, CONFIG_ENV,
    DATA_DIR_ENV, HOST_ENV, PORT_ENV,
};
use serial_test::serial;
use std::env;
use std::path::PathBuf;

fn clear_env() {
    env::remove_var(DATA_DIR_ENV);
    env::remove_var(HOST_ENV);
    env::remove_var(PORT_ENV);
    env::remove_var(CONFIG_ENV);
}

fn toml_with_everything() -> TomlConfig {
    TomlConfig::parse(
        r#"
        data_dir = "/tmp/mcat-from-toml"
        host = "10.0.0.1"
        port = 7000
        "#,
    )
    .unwrap()
}

#[test]
#[serial]
fn test_no_overrides_uses_compiled_defaults() {
    clear_env();

    let config = BootstrapConfig::resolve(CliOverrides::default(), &TomlConfig::default());
    let defaults = CompiledDefaults::default();

    assert_eq!(config.data.root(), defaults.data_dir.as_path());
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 8000);
    assert_eq!(config.log_level, "info");
    assert_eq!(config.bind_address(), "127.0.0.1:8000");
}

#[test]
#[serial]
fn test_toml_overrides_defaults() {
    clear_env();

    let config = BootstrapConfig::resolve(CliOverrides::default(), &toml_with_everything());

    assert_eq!(config.data.root(), PathBuf::from("/tmp/mcat-from-toml").as_path());
    assert_eq!(config.host, "10.0.0.1");
    assert_eq!(config.port, 7000);
}

#[test]
#[serial]
fn test_env_overrides_toml() {
    clear_env();
    env::set_var(DATA_DIR_ENV, "/tmp/mcat-from-env");
    env::set_var(HOST_ENV, "0.0.0.0");
    env::set_var(PORT_ENV, "7100");

    let config = BootstrapConfig::resolve(CliOverrides::default(), &toml_with_everything());

    assert_eq!(config.data.root(), PathBuf::from("/tmp/mcat-from-env").as_path());
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 7100);

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_env() {
    clear_env();
    env::set_var(DATA_DIR_ENV, "/tmp/mcat-from-env");
    env::set_var(PORT_ENV, "7100");

    let cli = CliOverrides {
        data_dir: Some(PathBuf::from("/tmp/mcat-from-cli")),
        host: Some("192.168.1.5".to_string()),
        port: Some(7200),
    };
    let config = BootstrapConfig::resolve(cli, &toml_with_everything());

    assert_eq!(config.data.root(), PathBuf::from("/tmp/mcat-from-cli").as_path());
    assert_eq!(config.host, "192.168.1.5");
    assert_eq!(config.port, 7200);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_port_env_falls_through_to_toml() {
    clear_env();
    env::set_var(PORT_ENV, "not-a-port");

    let config = BootstrapConfig::resolve(CliOverrides::default(), &toml_with_everything());
    assert_eq!(config.port, 7000);

    clear_env();
}

#[test]
#[serial]
fn test_resolve_data_dir_layout() {
    clear_env();

    let dir = resolve_data_dir(Some(PathBuf::from("/srv/catalog")), &TomlConfig::default());
    let config = BootstrapConfig::resolve(
        CliOverrides {
            data_dir: Some(dir),
            ..Default::default()
        },
        &TomlConfig::default(),
    );

    assert_eq!(config.data.catalog_path(), PathBuf::from("/srv/catalog/music.json"));
    assert_eq!(config.data.audio_root(), PathBuf::from("/srv/catalog/audio"));
}

#[test]
#[serial]
fn test_explicit_config_file_is_loaded() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mcat.toml");
    std::fs::write(&path, "port = 8123\n[logging]\nlevel = \"warn\"\n").unwrap();

    let (config, source) = TomlConfig::load_or_default(Some(&path)).unwrap();

    assert_eq!(source, Some(path));
    assert_eq!(config.port, Some(8123));
    assert_eq!(config.logging.level, "warn");
}

#[test]
#[serial]
fn test_explicit_config_from_env() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("env.toml");
    std::fs::write(&path, "host = \"::1\"\n").unwrap();
    env::set_var(CONFIG_ENV, &path);

    let (config, source) = TomlConfig::load_or_default(None).unwrap();

    assert_eq!(source, Some(path));
    assert_eq!(config.host.as_deref(), Some("::1"));

    clear_env();
}

#[test]
#[serial]
fn test_missing_explicit_config_is_an_error() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let result = TomlConfig::load_or_default(Some(&path));
    assert!(matches!(result, Err(mcat_common::Error::Config(_))));
}
