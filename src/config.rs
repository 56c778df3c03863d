// SPDX-License-Identifier: GPL-3.0-only

use crate::constants::{
    DEFAULT_AI_ENDPOINT, DEFAULT_AI_MODEL, DEFAULT_API_KEY_ENV, DEFAULT_EXPOSURE, FacingMode,
    IDEAL_HEIGHT, IDEAL_WIDTH,
};
use crate::backends::camera::CameraRequest;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const APP_DIR: &str = "digi-pro";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Preset id the viewfinder starts with
    pub default_filter: String,
    /// Exposure compensation the session starts with
    pub default_exposure: f32,
    /// Where exported photos are written
    pub export_dir: PathBuf,
    /// Preferred camera
    pub camera_facing: FacingMode,
    /// Preferred capture resolution
    pub ideal_width: u32,
    pub ideal_height: u32,
    /// Remote image model
    pub ai_model: String,
    /// Base URL of the generative API
    pub ai_endpoint: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_filter: crate::filters::default_filter().id.to_string(),
            default_exposure: DEFAULT_EXPOSURE,
            export_dir: default_export_dir(),
            camera_facing: FacingMode::default(),
            ideal_width: IDEAL_WIDTH,
            ideal_height: IDEAL_HEIGHT,
            ai_model: DEFAULT_AI_MODEL.to_string(),
            ai_endpoint: DEFAULT_AI_ENDPOINT.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

impl Config {
    /// Default location: `<config dir>/digi-pro/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load config from the default location, falling back to defaults
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                warn!("No config directory available, using defaults");
                Self::default()
            }
        }
    }

    /// Load config from a file; a missing or unreadable file yields defaults
    pub fn load_from(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Self::default();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read config, using defaults");
                return Self::default();
            }
        };

        match serde_json::from_str(&text) {
            Ok(config) => {
                info!(path = %path.display(), "Loaded config");
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Invalid config, using defaults");
                Self::default()
            }
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> AppResult<()> {
        let path = Self::default_path()
            .ok_or_else(|| AppError::Config("No config directory available".to_string()))?;
        self.save_to(&path)
    }

    /// Write config as pretty JSON, creating parent directories
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), "Saved config");
        Ok(())
    }

    /// Camera request derived from the preferences
    pub fn camera_request(&self) -> CameraRequest {
        CameraRequest {
            facing: self.camera_facing,
            ideal_width: self.ideal_width,
            ideal_height: self.ideal_height,
        }
    }
}

/// `~/Pictures/digi-pro`, or the working directory if no picture dir exists
fn default_export_dir() -> PathBuf {
    dirs::picture_dir()
        .or_else(dirs::home_dir)
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "default_filter": "vapor" }"#).unwrap();

        let config = Config::load_from(&path);
        assert_eq!(config.default_filter, "vapor");
        assert_eq!(config.ai_model, DEFAULT_AI_MODEL);
        assert_eq!(config.default_exposure, DEFAULT_EXPOSURE);
    }

    #[test]
    fn test_invalid_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            camera_facing: FacingMode::User,
            ideal_width: 640,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path), config);
        assert_eq!(config.camera_request().ideal_width, 640);
    }
}
