// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for the camera capability

use crate::constants::{FacingMode, IDEAL_HEIGHT, IDEAL_WIDTH};
use std::sync::Arc;
use std::time::Instant;

/// What the application asks of the camera when it starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraRequest {
    /// Which camera to prefer
    pub facing: FacingMode,
    /// Preferred frame width (a hint, not a requirement)
    pub ideal_width: u32,
    /// Preferred frame height (a hint, not a requirement)
    pub ideal_height: u32,
}

impl Default for CameraRequest {
    fn default() -> Self {
        Self {
            facing: FacingMode::default(),
            ideal_width: IDEAL_WIDTH,
            ideal_height: IDEAL_HEIGHT,
        }
    }
}

/// A single frame pulled from the live source
///
/// Pixel data is tightly packed straight RGBA8 at the source's native
/// resolution.
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// RGBA pixels, `width * height * 4` bytes
    pub data: Arc<[u8]>,
    /// Timestamp when frame was captured
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Wrap RGBA pixels in a frame, checking the buffer size
    pub fn from_rgba(width: u32, height: u32, data: impl Into<Arc<[u8]>>) -> BackendResult<Self> {
        let data = data.into();
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || data.len() != expected {
            return Err(BackendError::InvalidFrame(format!(
                "{}x{} frame needs {} bytes, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }

        Ok(Self {
            width,
            height,
            data,
            captured_at: Instant::now(),
        })
    }

    /// Copy the frame into an owned RGBA image
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.data.to_vec())
    }
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Error types for camera operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// User or system refused camera access
    PermissionDenied(String),
    /// No usable camera device
    DeviceNotFound(String),
    /// The source was released or never opened
    NotInitialized,
    /// Frame payload does not match its dimensions
    InvalidFrame(String),
    /// General I/O error
    IoError(String),
    /// Other errors
    Other(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            BackendError::DeviceNotFound(msg) => write!(f, "Device not found: {}", msg),
            BackendError::NotInitialized => write!(f, "Camera not initialized"),
            BackendError::InvalidFrame(msg) => write!(f, "Invalid frame: {}", msg),
            BackendError::IoError(msg) => write!(f, "I/O error: {}", msg),
            BackendError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_size_checked() {
        assert!(CameraFrame::from_rgba(2, 2, vec![0u8; 16]).is_ok());
        assert!(matches!(
            CameraFrame::from_rgba(2, 2, vec![0u8; 15]),
            Err(BackendError::InvalidFrame(_))
        ));
        assert!(CameraFrame::from_rgba(0, 2, Vec::<u8>::new()).is_err());
    }

    #[test]
    fn test_default_request() {
        let request = CameraRequest::default();
        assert_eq!(request.facing, FacingMode::Environment);
        assert_eq!((request.ideal_width, request.ideal_height), (1920, 1080));
    }
}
