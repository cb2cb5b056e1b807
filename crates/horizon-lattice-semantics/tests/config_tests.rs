//! Loading delegate configuration from disk.

use std::io::Write;

use horizon_lattice_semantics::{DelegateConfig, SemanticsError};

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "accessibility_enabled = false").unwrap();
    writeln!(file, "password_mask_char = \"*\"").unwrap();

    let config = DelegateConfig::from_file(file.path()).unwrap();
    assert!(!config.accessibility_enabled);
    assert!(config.content_capture_enabled);
    assert_eq!(config.password_mask_char, '*');
}

#[test]
fn test_saved_config_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("semantics.toml");

    let config = DelegateConfig {
        log_events: true,
        ..Default::default()
    };
    std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();

    assert_eq!(DelegateConfig::from_file(&path).unwrap(), config);
}

#[test]
fn test_invalid_file_reports_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "log_events = [").unwrap();

    let err = DelegateConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, SemanticsError::ConfigParse(_)), "unexpected error: {err}");
}
