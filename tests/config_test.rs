// tests/config_test.rs
use guarded_push::config::{load_config, parse_config, Config, LOCAL_CONFIG_FILE};
use guarded_push::logging::{Level, Style};
use guarded_push::PushSettings;
use serial_test::serial;
use std::env;
use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/guardedpush.toml");

#[test]
fn test_load_from_fixture() {
    let config = load_config(Some(FIXTURE)).unwrap();

    assert_eq!(config.remote.name, "upstream");
    assert_eq!(config.stash.message, "guarded-push: set aside before rebase");
    assert!(!config.stash.include_untracked);
    assert_eq!(config.logging.level, Level::Debug);
    assert_eq!(config.logging.style, Style::Default);
    assert_eq!(
        config.deletions.message_for("old.txt"),
        "chore(cleanup): remove old.txt\n\nSigned-off-by: Release Bot <bot@example.com>"
    );
}

#[test]
fn test_load_partial_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file
        .write_all(b"[remote]\nname = \"mirror\"\n")
        .unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path().to_str().unwrap())).unwrap();
    assert_eq!(config.remote.name, "mirror");
    assert_eq!(config.stash, Config::default().stash);
    assert_eq!(config.deletions, Config::default().deletions);
}

#[test]
fn test_missing_explicit_file_is_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");

    let err = load_config(Some(missing.to_str().unwrap())).unwrap_err();
    assert!(err.to_string().contains("Configuration error"));
}

#[test]
fn test_invalid_toml_is_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[remote\nname = ").unwrap();
    temp_file.flush().unwrap();

    let err = load_config(Some(temp_file.path().to_str().unwrap())).unwrap_err();
    assert!(err.to_string().contains("Invalid"));
}

#[test]
fn test_wrong_type_is_error() {
    assert!(parse_config("[stash]\ninclude_untracked = \"yes\"\n").is_err());
}

#[test]
#[serial]
fn test_local_file_found_in_working_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(LOCAL_CONFIG_FILE),
        "[stash]\nmessage = \"from cwd\"\n",
    )
    .unwrap();

    let previous = env::current_dir().unwrap();
    env::set_current_dir(dir.path()).unwrap();
    let loaded = load_config(None);
    env::set_current_dir(previous).unwrap();

    assert_eq!(loaded.unwrap().stash.message, "from cwd");
}

#[test]
fn test_settings_from_config() {
    let config = load_config(Some(FIXTURE)).unwrap();
    let settings = PushSettings::from(&config);

    assert_eq!(settings.remote, "upstream");
    assert_eq!(settings.stash_message, "guarded-push: set aside before rebase");
    assert!(!settings.include_untracked);
    assert_eq!(settings.deletions, config.deletions);
}

#[test]
fn test_default_settings() {
    let settings = PushSettings::default();
    assert_eq!(settings.remote, "origin");
    assert_eq!(settings.stash_message, "Auto stash before rebase");
    assert!(settings.include_untracked);
}
