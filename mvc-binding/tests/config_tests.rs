//! Binding options loading and resolution
//!
//! Covers:
//! - Priority order: command-line path, then MVC_BINDING_CONFIG, then the
//!   platform config directory
//! - Missing options file → warning + compiled defaults
//! - Malformed or invalid files are reported, not silently ignored
//!
//! Tests that touch MVC_BINDING_CONFIG are marked #[serial] so they never
//! race on the process environment.

use mvc_binding::config::{load_options, resolve_config_path, CONFIG_ENV_VAR};
use mvc_binding::{BindingOptions, BindingSource, Error};
use serial_test::serial;
use std::env;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_options(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
#[serial]
fn test_cli_path_wins_over_env() {
    let dir = TempDir::new().unwrap();
    let cli = write_options(&dir, "cli.toml", "max_allowed_errors = 5\n");
    let from_env = write_options(&dir, "env.toml", "max_allowed_errors = 9\n");
    env::set_var(CONFIG_ENV_VAR, &from_env);

    assert_eq!(resolve_config_path(Some(&cli)), Some(cli.clone()));
    let options = load_options(Some(&cli)).unwrap();
    assert_eq!(options.max_allowed_errors, 5);

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_env_var_used_without_cli_path() {
    let dir = TempDir::new().unwrap();
    let path = write_options(
        &dir,
        "binding.toml",
        "provider_order = [\"form\", \"query\"]\nmax_collection_size = 10\n",
    );
    env::set_var(CONFIG_ENV_VAR, &path);

    let options = load_options(None).unwrap();
    assert_eq!(options.provider_order, vec![BindingSource::Form, BindingSource::Query]);
    assert_eq!(options.max_collection_size, 10);
    assert_eq!(options.max_allowed_errors, BindingOptions::default().max_allowed_errors);

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_blank_env_var_is_ignored() {
    env::set_var(CONFIG_ENV_VAR, "   ");

    let resolved = resolve_config_path(None);
    assert_ne!(resolved, Some(PathBuf::from("   ")));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_missing_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("does-not-exist.toml");

    let options = load_options(Some(&missing)).unwrap();
    assert_eq!(options, BindingOptions::default());
}

#[test]
#[serial]
fn test_malformed_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write_options(&dir, "bad.toml", "max_allowed_errors = \"many\"\n");

    match load_options(Some(&path)) {
        Err(Error::Configuration(message)) => assert!(message.contains("bad.toml")),
        other => panic!("expected configuration error, got {:?}", other),
    }
}

#[test]
#[serial]
fn test_invalid_values_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_options(&dir, "zero.toml", "max_recursion_depth = 0\n");

    assert!(matches!(load_options(Some(&path)), Err(Error::Configuration(_))));
}
