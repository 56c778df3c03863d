// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Lowest accepted exposure compensation (EV)
pub const EXPOSURE_MIN: f32 = -1.0;
/// Highest accepted exposure compensation (EV)
pub const EXPOSURE_MAX: f32 = 2.0;
/// Exposure a fresh session starts with
pub const DEFAULT_EXPOSURE: f32 = 0.5;
/// Brightness gained per EV of exposure compensation
pub const EXPOSURE_BRIGHTNESS_STEP: f32 = 0.2;

/// Opacity of the second, screen-blended pass that produces the glow
pub const GLOW_OPACITY: f32 = 0.15;

/// How long the "capturing" indicator stays up after a shot
pub const CAPTURE_PULSE_MS: u64 = 150;

/// Viewfinder zoom range
pub const ZOOM_MIN: f32 = 1.0;
pub const ZOOM_MAX: f32 = 3.0;

/// Preferred capture resolution requested from the camera
pub const IDEAL_WIDTH: u32 = 1920;
pub const IDEAL_HEIGHT: u32 = 1080;

/// Prefix for exported files (`DIGI-PRO-<millis>.png`)
pub const EXPORT_PREFIX: &str = "DIGI-PRO-";

/// Preset id of the identity filter
pub const IDENTITY_FILTER_ID: &str = "none";

/// Remote image model defaults
pub const DEFAULT_AI_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_AI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Upper bound on a single enhancement round-trip
pub const ENHANCE_TIMEOUT: Duration = Duration::from_secs(120);

/// Which way the requested camera faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FacingMode {
    /// Front camera
    User,
    /// Rear camera (default)
    #[default]
    Environment,
}

impl FacingMode {
    /// Get all variants for UI iteration
    pub const ALL: [FacingMode; 2] = [FacingMode::User, FacingMode::Environment];

    /// Get display name for the facing mode
    pub fn display_name(&self) -> &'static str {
        match self {
            FacingMode::User => "Front",
            FacingMode::Environment => "Rear",
        }
    }
}

/// Clamp an exposure value into the supported range
pub fn clamp_exposure(exposure: f32) -> f32 {
    if exposure.is_nan() {
        return 0.0;
    }
    exposure.clamp(EXPOSURE_MIN, EXPOSURE_MAX)
}

/// Brightness multiplier applied on top of a preset for a given exposure
pub fn exposure_brightness(exposure: f32) -> f32 {
    1.0 + clamp_exposure(exposure) * EXPOSURE_BRIGHTNESS_STEP
}
