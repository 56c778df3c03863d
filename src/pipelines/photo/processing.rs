// SPDX-License-Identifier: MPL-2.0

//! Rasterisation and compositing for captured frames
//!
//! Capture renders the frame through the preset chain (plus an exposure
//! brightness term), then draws that filtered frame over the result a second
//! time with a screen blend at low opacity. The second pass lifts the highlights
//! and gives the soft sensor bloom the presets are tuned for.

use crate::backends::camera::CameraFrame;
use crate::constants::{GLOW_OPACITY, exposure_brightness};
use crate::errors::PhotoError;
use crate::filters::{FilterChain, FilterOp, FilterPreset};
use image::RgbaImage;
use tracing::debug;

/// Settings for a single capture render
#[derive(Debug, Clone)]
pub struct CaptureSettings {
    /// Preset chain, applied first
    pub chain: FilterChain,
    /// Exposure compensation in EV
    pub exposure: f32,
    /// Opacity of the screen-blended glow pass
    pub glow_opacity: f32,
}

impl CaptureSettings {
    pub fn new(preset: &FilterPreset, exposure: f32) -> Self {
        Self {
            chain: preset.chain(),
            exposure,
            glow_opacity: GLOW_OPACITY,
        }
    }

    /// Preset chain with the exposure brightness appended
    pub fn effective_chain(&self) -> FilterChain {
        let mut chain = self.chain.clone();
        chain.push(FilterOp::Brightness(exposure_brightness(self.exposure)));
        chain
    }
}

/// Render a camera frame into a composited RGBA raster
pub fn render_capture(
    frame: &CameraFrame,
    settings: &CaptureSettings,
) -> Result<RgbaImage, PhotoError> {
    let source = frame.to_rgba_image().ok_or_else(|| {
        PhotoError::InvalidFrame(format!(
            "{}x{} frame has {} bytes",
            frame.width,
            frame.height,
            frame.data.len()
        ))
    })?;

    // Pass 1: filtered frame
    let chain = settings.effective_chain();
    let filtered = render_filtered(&source, &chain);

    // Pass 2: the same filtered frame screened on top
    let mut raster = filtered.clone();
    screen_composite(&mut raster, &filtered, settings.glow_opacity);

    debug!(
        width = frame.width,
        height = frame.height,
        chain = %chain,
        "Frame rasterized"
    );

    Ok(raster)
}

/// Re-render an existing raster through a chain
pub fn render_filtered(image: &RgbaImage, chain: &FilterChain) -> RgbaImage {
    let mut raster = image.clone();
    chain.apply(&mut raster);
    raster
}

/// Draw `src` over `dst` with a screen blend at the given opacity
///
/// Both images must have the same dimensions; extra pixels are ignored.
/// Per channel: `blend = 1 - (1 - d)(1 - s)`, then
/// `out = d + (blend - d) * opacity * src_alpha`. Destination alpha is kept.
pub fn screen_composite(dst: &mut RgbaImage, src: &RgbaImage, opacity: f32) {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity == 0.0 {
        return;
    }

    for (d, s) in dst.pixels_mut().zip(src.pixels()) {
        let weight = opacity * s[3] as f32 / 255.0;
        for c in 0..3 {
            let dv = d[c] as f32 / 255.0;
            let sv = s[c] as f32 / 255.0;
            let screened = 1.0 - (1.0 - dv) * (1.0 - sv);
            let out = dv + (screened - dv) * weight;
            d[c] = (out.clamp(0.0, 1.0) * 255.0).round() as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::identity_filter;
    use image::Rgba;

    #[test]
    fn test_screen_never_darkens() {
        let mut dst = RgbaImage::from_pixel(2, 2, Rgba([100, 0, 255, 255]));
        let src = RgbaImage::from_pixel(2, 2, Rgba([50, 200, 10, 255]));
        screen_composite(&mut dst, &src, 0.15);
        let p = dst.get_pixel(0, 0);
        assert!(p[0] >= 100);
        assert!(p[1] > 0);
        assert_eq!(p[2], 255);
    }

    #[test]
    fn test_screen_black_source_is_noop() {
        let original = RgbaImage::from_pixel(2, 2, Rgba([120, 60, 30, 255]));
        let mut dst = original.clone();
        screen_composite(&mut dst, &RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255])), 1.0);
        assert_eq!(dst, original);
    }

    #[test]
    fn test_screen_value() {
        // d = s = 128: screen adds d(1 - d) ≈ 0.25, at 15% that is +9.6
        let mut dst = RgbaImage::from_pixel(1, 1, Rgba([128, 128, 128, 255]));
        let src = dst.clone();
        screen_composite(&mut dst, &src, 0.15);
        assert_eq!(dst.get_pixel(0, 0)[0], 138);
    }

    #[test]
    fn test_exposure_appended_last() {
        let settings = CaptureSettings::new(identity_filter(), 0.5);
        let chain = settings.effective_chain();
        let last = *chain.ops().last().unwrap();
        match last {
            FilterOp::Brightness(k) => assert!((k - 1.1).abs() < 1e-6),
            other => panic!("unexpected op {:?}", other),
        }
    }

    #[test]
    fn test_render_capture_keeps_dimensions() {
        let frame = CameraFrame::from_rgba(3, 2, vec![90u8; 3 * 2 * 4]).unwrap();
        let raster =
            render_capture(&frame, &CaptureSettings::new(identity_filter(), 0.0)).unwrap();
        assert_eq!(raster.dimensions(), (3, 2));
        // Identity preset at 0 EV still brightens through the glow pass
        assert!(raster.get_pixel(0, 0)[0] > 90);
    }

    #[test]
    fn test_glow_pass_uses_filtered_frame() {
        let frame = CameraFrame::from_rgba(1, 1, vec![200u8, 200, 200, 255]).unwrap();
        let settings = CaptureSettings {
            chain: FilterChain::new(vec![FilterOp::Brightness(0.0)]),
            exposure: 0.0,
            glow_opacity: GLOW_OPACITY,
        };
        let raster = render_capture(&frame, &settings).unwrap();
        assert_eq!(*raster.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
    }
}
