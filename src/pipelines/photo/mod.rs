// SPDX-License-Identifier: MPL-2.0

//! Photo capture and re-rendering pipeline
//!
//! ```text
//! Camera Frame → Filter chain + exposure → Screen glow pass → PNG
//! Stored PNG   → Decode → Filter chain → PNG (overwrites the stored photo)
//! ```
//!
//! Re-rendering works on whatever pixels the photo currently holds, so
//! applying filters repeatedly compounds them. There is no pristine copy to
//! fall back to.

pub mod encoding;
pub mod processing;

pub use encoding::{decode_image, encode_png, export_file_name, export_photo, normalize_import};
pub use processing::{CaptureSettings, render_capture, render_filtered, screen_composite};

use crate::backends::camera::CameraFrame;
use crate::constants::clamp_exposure;
use crate::errors::PhotoError;
use crate::filters::FilterPreset;
use std::sync::Arc;
use tracing::{debug, info};

/// Capture and re-render pipeline
#[derive(Debug, Clone, Copy, Default)]
pub struct PhotoPipeline;

impl PhotoPipeline {
    pub fn new() -> Self {
        Self
    }

    /// Render a live frame through a preset and encode it
    ///
    /// # Arguments
    /// * `frame` - Current camera frame (RGBA)
    /// * `preset` - Active film simulation
    /// * `exposure` - Exposure compensation, clamped to [-1, 2]
    ///
    /// # Returns
    /// * `Ok(Vec<u8>)` - PNG payload
    /// * `Err(PhotoError)` - Frame was malformed or encoding failed
    pub fn capture(
        &self,
        frame: &CameraFrame,
        preset: &FilterPreset,
        exposure: f32,
    ) -> Result<Vec<u8>, PhotoError> {
        let exposure = clamp_exposure(exposure);
        info!(
            width = frame.width,
            height = frame.height,
            filter = preset.id,
            exposure,
            "Capturing photo"
        );

        let settings = CaptureSettings::new(preset, exposure);
        let raster = render_capture(frame, &settings)?;
        encode_png(&raster)
    }

    /// Decode a stored photo, run it through a preset and re-encode it
    pub fn reapply(&self, data: &[u8], preset: &FilterPreset) -> Result<Vec<u8>, PhotoError> {
        let image = decode_image(data)?;
        let filtered = render_filtered(&image, &preset.chain());
        debug!(filter = preset.id, "Filter re-applied");
        encode_png(&filtered)
    }

    /// [`Self::reapply`] on the blocking thread pool
    pub async fn reapply_async(
        &self,
        data: Arc<[u8]>,
        preset: &'static FilterPreset,
    ) -> Result<Vec<u8>, PhotoError> {
        let pipeline = *self;
        tokio::task::spawn_blocking(move || pipeline.reapply(&data, preset))
            .await
            .map_err(|e| PhotoError::EncodingFailed(format!("Filter task error: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{find_filter, identity_filter};
    use image::{Rgba, RgbaImage};

    fn sample_png() -> Vec<u8> {
        let img = RgbaImage::from_fn(6, 4, |x, y| {
            Rgba([40 + x as u8 * 20, 90 + y as u8 * 15, 160 - x as u8 * 10, 255])
        });
        encode_png(&img).unwrap()
    }

    #[test]
    fn test_identity_reapply_preserves_pixels() {
        let png = sample_png();
        let out = PhotoPipeline::new().reapply(&png, identity_filter()).unwrap();
        assert_eq!(decode_image(&out).unwrap(), decode_image(&png).unwrap());
    }

    #[test]
    fn test_reapply_compounds() {
        let pipeline = PhotoPipeline::new();
        let vapor = find_filter("vapor").unwrap();

        let once = pipeline.reapply(&sample_png(), vapor).unwrap();
        let twice = pipeline.reapply(&once, vapor).unwrap();

        assert_ne!(decode_image(&once).unwrap(), decode_image(&twice).unwrap());
    }

    #[test]
    fn test_capture_rejects_truncated_frame() {
        let frame = CameraFrame {
            width: 4,
            height: 4,
            data: Arc::from(vec![0u8; 8]),
            captured_at: std::time::Instant::now(),
        };
        let result = PhotoPipeline::new().capture(&frame, identity_filter(), 0.0);
        assert!(matches!(result, Err(PhotoError::InvalidFrame(_))));
    }

    #[tokio::test]
    async fn test_reapply_async_matches_sync() {
        let png = sample_png();
        let preset = find_filter("twilight").unwrap();
        let pipeline = PhotoPipeline::new();

        let sync = pipeline.reapply(&png, preset).unwrap();
        let via_pool = pipeline.reapply_async(Arc::from(png), preset).await.unwrap();
        assert_eq!(sync, via_pool);
    }
}
