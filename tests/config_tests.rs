// SPDX-License-Identifier: MPL-2.0

//! Integration tests for configuration module

use digi_pro::Config;
use digi_pro::constants::{DEFAULT_EXPOSURE, FacingMode, IDEAL_HEIGHT, IDEAL_WIDTH};
use digi_pro::filters::find_filter;

#[test]
fn test_config_default() {
    // Test that default config can be created
    let config = Config::default();

    assert!(
        find_filter(&config.default_filter).is_some(),
        "Default filter should exist in the catalog"
    );
    assert_eq!(config.default_exposure, DEFAULT_EXPOSURE);
    assert_eq!(config.camera_facing, FacingMode::Environment);
}

#[test]
fn test_config_camera_request() {
    let request = Config::default().camera_request();
    assert_eq!(request.ideal_width, IDEAL_WIDTH);
    assert_eq!(request.ideal_height, IDEAL_HEIGHT);
    assert_eq!(request.facing, FacingMode::Environment);
}

#[test]
fn test_config_export_dir() {
    let config = Config::default();
    assert!(
        config.export_dir.ends_with("digi-pro"),
        "Export dir should be app specific: {}",
        config.export_dir.display()
    );
}

#[test]
fn test_config_missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_from(&dir.path().join("absent.json"));
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_json_field_names() {
    let json = serde_json::to_value(Config::default()).unwrap();
    for key in [
        "default_filter",
        "default_exposure",
        "export_dir",
        "camera_facing",
        "ai_model",
        "api_key_env",
    ] {
        assert!(json.get(key).is_some(), "Missing config key {}", key);
    }
}
