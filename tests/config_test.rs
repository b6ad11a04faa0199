//! Integration tests for layered config loading.
//!
//! Layering: app `default.toml` → app `site.toml` → `<PREFIX>__*` environment.
//! The global layer is disabled so results do not depend on the host.
//! Every test that touches the environment uses its own prefix.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use appfront::config::{AppConfig, ConfigLoader, FileConfigLoader};

fn write_config(root: &Path, name: &str, content: &str) {
    let dir = root.join("config");
    fs::create_dir_all(&dir).expect("create config dir");
    fs::write(dir.join(name), content).expect("write config");
}

#[test]
fn given_default_and_site_when_load_then_site_overrides_scalars() {
    // Arrange
    let root = TempDir::new().expect("tempdir");
    write_config(
        root.path(),
        "default.toml",
        r#"
[cli.class-lookup]
suffix = "Command"
prefix = "App"
"#,
    );
    write_config(
        root.path(),
        "site.toml",
        r#"
[cli.class-lookup]
suffix = "Cmd"
"#,
    );

    // Act
    let cfg = FileConfigLoader::new(root.path())
        .without_global()
        .without_env()
        .load()
        .expect("load");

    // Assert
    assert_eq!(cfg.get_str("cli/class-lookup/suffix", ""), "Cmd");
    assert_eq!(cfg.get_str("cli/class-lookup/prefix", ""), "App", "untouched keys survive");
}

#[test]
fn given_no_config_files_when_load_then_empty_config() {
    let root = TempDir::new().expect("tempdir");

    let cfg = FileConfigLoader::new(root.path())
        .without_global()
        .without_env()
        .load()
        .expect("load");

    assert_eq!(cfg, AppConfig::default());
    assert!(!cfg.get_bool("debug/enable"));
}

#[test]
fn given_missing_app_root_when_load_then_config_error() {
    let root = TempDir::new().expect("tempdir");
    let missing = root.path().join("does-not-exist");

    let err = FileConfigLoader::new(&missing)
        .without_global()
        .without_env()
        .load()
        .unwrap_err();

    assert!(err.to_string().contains("app root not found"), "got: {err}");
}

#[test]
fn given_invalid_toml_when_load_then_config_error() {
    let root = TempDir::new().expect("tempdir");
    write_config(root.path(), "default.toml", "[cli\nbroken = ");

    let result = FileConfigLoader::new(root.path())
        .without_global()
        .without_env()
        .load();

    assert!(result.is_err());
}

#[test]
fn given_custom_file_list_when_load_then_only_listed_files_read() {
    let root = TempDir::new().expect("tempdir");
    write_config(root.path(), "default.toml", "[debug]\nenable = true\n");
    write_config(root.path(), "staging.toml", "[cli.di-lookup]\nenable = true\n");

    let cfg = FileConfigLoader::new(root.path())
        .with_files(&["staging.toml"])
        .without_global()
        .without_env()
        .load()
        .expect("load");

    assert!(!cfg.has_param("debug/enable"));
    assert!(cfg.get_bool("cli/di-lookup/enable"));
}

#[test]
fn given_env_override_when_load_then_env_wins_over_files() {
    // Arrange
    let root = TempDir::new().expect("tempdir");
    write_config(root.path(), "default.toml", "[debug]\nenable = false\n");
    std::env::set_var("APPFRONTTESTA__DEBUG__ENABLE", "true");

    // Act
    let cfg = FileConfigLoader::new(root.path())
        .with_env_prefix("APPFRONTTESTA")
        .without_global()
        .load()
        .expect("load");
    std::env::remove_var("APPFRONTTESTA__DEBUG__ENABLE");

    // Assert
    assert!(cfg.get_bool("debug/enable"));
}

#[test]
fn given_env_namespace_list_when_load_then_split_on_commas() {
    let root = TempDir::new().expect("tempdir");
    std::env::set_var("APPFRONTTESTB__CLI__CLASS-LOOKUP__NAMESPACE", "app::jobs,cli::command");

    let cfg = FileConfigLoader::new(root.path())
        .with_env_prefix("APPFRONTTESTB")
        .without_global()
        .load()
        .expect("load");
    std::env::remove_var("APPFRONTTESTB__CLI__CLASS-LOOKUP__NAMESPACE");

    assert_eq!(
        cfg.get_str_array("cli/class-lookup/namespace", &[]),
        vec!["app::jobs".to_string(), "cli::command".to_string()]
    );
}

#[test]
fn given_loader_when_config_dir_then_under_app_root() {
    let root = TempDir::new().expect("tempdir");
    let loader = FileConfigLoader::new(root.path());
    assert_eq!(loader.app_root(), root.path());
    assert_eq!(loader.config_dir(), root.path().join("config"));
}
