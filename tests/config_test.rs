//! Configuration file loading and saving

use headmouse::{
    config::{Config, EXAMPLE_CONFIG},
    gesture_detector::PrimaryEye,
    Error,
};
use std::path::PathBuf;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("headmouse-{}-{name}", std::process::id()))
}

#[test]
fn test_config_file_round_trip() {
    let path = temp_path("config.yaml");
    let mut config = Config::default();
    config.motion.thresh_x = 12.0;
    config.eyes.primary_eye = PrimaryEye::Left;
    config.mouth.enabled = true;
    config.controller.kind = "keyboard".to_string();

    config.to_file(&path).unwrap();
    let loaded = Config::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded, config);
}

#[test]
fn test_example_config_file() {
    let path = temp_path("example.yaml");
    std::fs::write(&path, EXAMPLE_CONFIG).unwrap();
    let loaded = Config::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded, Config::default());
}

#[test]
fn test_missing_config_file() {
    assert!(matches!(
        Config::from_file(temp_path("missing.yaml")),
        Err(Error::Io(_))
    ));
}

#[test]
fn test_unknown_primary_eye_rejected() {
    let result = Config::from_yaml("eyes:\n  primary_eye: middle\n");
    assert!(matches!(result, Err(Error::ConfigError(_))));
}

#[test]
fn test_empty_document_is_default() {
    assert_eq!(Config::from_yaml("{}").unwrap(), Config::default());
}
