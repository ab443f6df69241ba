//! Integration tests for configuration resolution and graceful degradation
//!
//! Uses serial_test to prevent environment variable races: tests that set
//! SRDB_CONFIG are marked with #[serial] so they never run in parallel.

use serial_test::serial;
use srdb_common::config::{
    load_config, resolve_config_path, CatalogConfig, ConfigOrigin, CONFIG_ENV_VAR,
};
use srdb_common::Error;
use std::env;
use std::fs;
use tempfile::TempDir;

#[test]
#[serial]
fn test_env_var_names_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("srdb.toml");
    fs::write(&path, "[server]\nport = 9100\n").unwrap();

    env::set_var(CONFIG_ENV_VAR, &path);
    let (config, origin) = load_config(None).unwrap();
    env::remove_var(CONFIG_ENV_VAR);

    assert_eq!(config.server.port, 9100);
    assert_eq!(origin, ConfigOrigin::File(path));
}

#[test]
#[serial]
fn test_cli_path_overrides_env_var() {
    let dir = TempDir::new().unwrap();
    let cli_path = dir.path().join("cli.toml");
    let env_path = dir.path().join("env.toml");
    fs::write(&cli_path, "[server]\nport = 7001\n").unwrap();
    fs::write(&env_path, "[server]\nport = 7002\n").unwrap();

    env::set_var(CONFIG_ENV_VAR, &env_path);
    let resolved = resolve_config_path(Some(&cli_path), CONFIG_ENV_VAR);
    let (config, _) = load_config(Some(&cli_path)).unwrap();
    env::remove_var(CONFIG_ENV_VAR);

    assert_eq!(resolved, Some(cli_path));
    assert_eq!(config.server.port, 7001);
}

#[test]
#[serial]
fn test_blank_env_var_is_ignored() {
    env::set_var(CONFIG_ENV_VAR, "   ");
    let resolved = resolve_config_path(None, CONFIG_ENV_VAR);
    env::remove_var(CONFIG_ENV_VAR);

    // Either nothing, or the per-user file if one happens to exist
    if let Some(path) = resolved {
        assert!(path.ends_with("srdb/config.toml"));
    }
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("does-not-exist.toml");
    let (config, origin) = CatalogConfig::load(&path).unwrap();
    assert_eq!(config, CatalogConfig::default());
    // Reported back so the warning can be logged once tracing is up
    assert_eq!(origin, ConfigOrigin::MissingFile(path));
}

#[test]
#[serial]
fn test_missing_cli_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nonexistent.toml");

    let (config, origin) = load_config(Some(&path)).unwrap();
    assert_eq!(config, CatalogConfig::default());
    assert_eq!(origin, ConfigOrigin::MissingFile(path));
}

#[test]
fn test_malformed_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[pagination.desktop]\nrows_per_page_options = \"many\"\n").unwrap();

    let err = CatalogConfig::load(&path).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(err.to_string().contains("broken.toml"));
}

#[test]
fn test_full_file() {
    let config = CatalogConfig::from_toml_str(
        r#"
[server]
host = "0.0.0.0"
port = 8080

[data]
base = "/srv/srdb/data"

[data.files]
song_plays = "plays.yml"
songs = ["songs.yml"]

[pagination.desktop]
default_rows_per_page = 25
rows_per_page_options = [10, 25, 50]

[pagination.mobile]
default_rows_per_page = 5

[featured]
heading = "Cliff Richard Songs"
performer_match = "cliff"

[logging]
level = "debug"
file = "/var/log/srdb.log"
"#,
    )
    .unwrap();

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.data.files.song_plays, "plays.yml");
    assert_eq!(config.data.files.songs, vec!["songs.yml"]);
    assert_eq!(config.data.files.performers, "performers.yml");
    assert_eq!(config.pagination.desktop.rows_per_page_options, vec![10, 25, 50]);
    assert_eq!(config.pagination.mobile.default_rows_per_page, 5);
    assert_eq!(config.featured.performer_match, "cliff");
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.file.as_deref(), Some(std::path::Path::new("/var/log/srdb.log")));
}
