// SPDX-License-Identifier: MPL-2.0

//! Still-image camera backend
//!
//! Serves a decoded image as the live frame. Used by the command line front
//! end (which has no viewfinder) and by tests.

use super::types::{BackendError, BackendResult, CameraFrame, CameraRequest};
use super::{CameraBackend, FrameSource};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Backend whose "camera" always shows the same picture
#[derive(Debug, Clone)]
pub struct StillImageBackend {
    width: u32,
    height: u32,
    rgba: Arc<[u8]>,
    label: String,
}

impl StillImageBackend {
    /// Load an image file and convert it to RGBA
    ///
    /// Supports common image formats: PNG, JPEG, GIF, BMP, WebP
    pub fn from_path(path: &Path) -> BackendResult<Self> {
        info!(path = %path.display(), "Loading still frame source");

        let img = image::open(path).map_err(|e| match e {
            image::ImageError::IoError(io) => {
                BackendError::IoError(format!("{}: {}", path.display(), io))
            }
            other => BackendError::InvalidFrame(format!(
                "Failed to load image '{}': {}",
                path.display(),
                other
            )),
        })?;

        Ok(Self::from_image(img.to_rgba8(), path_label(path)))
    }

    /// Decode an in-memory encoded image
    pub fn from_bytes(bytes: &[u8]) -> BackendResult<Self> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| BackendError::InvalidFrame(e.to_string()))?;
        Ok(Self::from_image(img.to_rgba8(), "memory".to_string()))
    }

    /// Use an already decoded image
    pub fn from_image(image: image::RgbaImage, label: String) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            rgba: Arc::from(image.into_raw()),
            label,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

fn path_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| PathBuf::from(path).display().to_string())
}

impl CameraBackend for StillImageBackend {
    fn open(&self, request: &CameraRequest) -> BackendResult<Box<dyn FrameSource>> {
        // A still source has one native size; the ideal size is only a hint
        info!(
            label = %self.label,
            native_width = self.width,
            native_height = self.height,
            ideal_width = request.ideal_width,
            ideal_height = request.ideal_height,
            "Opening still frame source"
        );

        Ok(Box::new(StillSource {
            frame: Some(CameraFrame::from_rgba(
                self.width,
                self.height,
                Arc::clone(&self.rgba),
            )?),
            label: self.label.clone(),
        }))
    }
}

struct StillSource {
    frame: Option<CameraFrame>,
    label: String,
}

impl FrameSource for StillSource {
    fn capture_frame(&mut self) -> BackendResult<CameraFrame> {
        let frame = self.frame.as_ref().ok_or(BackendError::NotInitialized)?;
        Ok(CameraFrame {
            captured_at: std::time::Instant::now(),
            ..frame.clone()
        })
    }

    fn release(&mut self) {
        self.frame = None;
    }

    fn name(&self) -> &str {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_still_source_serves_frames_until_released() {
        let backend = StillImageBackend::from_image(
            RgbaImage::from_pixel(3, 2, Rgba([9, 8, 7, 255])),
            "test".to_string(),
        );
        let mut source = backend.open(&CameraRequest::default()).unwrap();

        let frame = source.capture_frame().unwrap();
        assert_eq!((frame.width, frame.height), (3, 2));
        assert_eq!(&frame.data[..4], &[9, 8, 7, 255]);

        source.release();
        assert_eq!(
            source.capture_frame().unwrap_err(),
            BackendError::NotInitialized
        );
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(StillImageBackend::from_bytes(b"not an image").is_err());
    }
}
