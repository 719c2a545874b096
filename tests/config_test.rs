//! Integration tests for layered Settings loading.
//!
//! Layers (lowest to highest): defaults, global file, local file, JSLAYOUT_* env.
//! These tests pass explicit file locations, so no real global config is read.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use jslayout::application::ApplicationError;
use jslayout::config::{local_config_path, Settings};

fn write_config(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn given_no_config_files_when_loading_then_defaults() {
    let settings = Settings::load_from(None, None).expect("load settings");

    assert_eq!(settings, Settings::default());
}

#[test]
fn given_global_config_when_loading_then_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let global = write_config(&dir, "global.toml", "separator = \"/\"\nroot = \"checkout\"\n");

    let settings = Settings::load_from(Some(&global), None).expect("load settings");

    assert_eq!(settings.separator, "/");
    assert_eq!(settings.root.as_deref(), Some("checkout"));
    assert!(settings.pretty, "unspecified fields keep their defaults");
}

#[test]
fn given_global_and_local_config_when_loading_then_local_wins_per_field() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let global = write_config(
        &dir,
        "global.toml",
        "separator = \"/\"\nroot = \"checkout\"\npretty = false\n",
    );
    let local = write_config(&dir, "local.toml", "root = \"minicart\"\n");

    // Act
    let settings = Settings::load_from(Some(&global), Some(&local)).expect("load settings");

    // Assert
    assert_eq!(settings.separator, "/");
    assert_eq!(settings.root.as_deref(), Some("minicart"));
    assert!(!settings.pretty);
}

#[test]
fn given_project_dir_with_local_config_when_loading_then_picked_up() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "separator = \"::\"\n").unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(settings.separator, "::");
}

#[test]
fn given_malformed_toml_when_loading_then_config_error() {
    let dir = TempDir::new().unwrap();
    let local = write_config(&dir, "local.toml", "separator = \n");

    let result = Settings::load_from(None, Some(&local));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_empty_separator_in_config_when_loading_then_rejected() {
    let dir = TempDir::new().unwrap();
    let local = write_config(&dir, "local.toml", "separator = \"\"\n");

    let result = Settings::load_from(None, Some(&local));

    match result {
        Err(ApplicationError::Config { message }) => assert!(message.contains("separator")),
        other => panic!("expected config error, got {:?}", other),
    }
}

#[test]
fn given_settings_when_round_tripping_through_toml_then_equal() {
    let dir = TempDir::new().unwrap();
    let settings = Settings {
        separator: "/".to_string(),
        root: Some("checkout".to_string()),
        pretty: false,
    };
    let path = write_config(&dir, "roundtrip.toml", &settings.to_toml().unwrap());

    let loaded = Settings::load_from(None, Some(&path)).expect("load settings");

    assert_eq!(loaded, settings);
}
