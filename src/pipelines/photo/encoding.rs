// SPDX-License-Identifier: GPL-3.0-only

//! Photo encoding, decoding and export
//!
//! Every photo payload is a self-contained PNG. Imports are decoded and
//! re-encoded so the roll never holds anything else.

use crate::constants::EXPORT_PREFIX;
use crate::errors::PhotoError;
use chrono::{DateTime, Local};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Encode a raster as PNG
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, PhotoError> {
    let mut buffer = Vec::new();

    image
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|e| PhotoError::EncodingFailed(format!("PNG encoding failed: {}", e)))?;

    debug!(
        width = image.width(),
        height = image.height(),
        size = buffer.len(),
        "PNG encoded"
    );
    Ok(buffer)
}

/// Decode any supported image payload to RGBA
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage, PhotoError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| PhotoError::DecodeFailed(e.to_string()))?;
    Ok(img.to_rgba8())
}

/// Turn an imported file (PNG, JPEG, WebP, ...) into a PNG payload
pub fn normalize_import(bytes: &[u8]) -> Result<Vec<u8>, PhotoError> {
    let image = decode_image(bytes)?;
    encode_png(&image)
}

/// File name for an exported photo, e.g. `DIGI-PRO-1718035200123.png`
pub fn export_file_name(at: DateTime<Local>) -> String {
    format!("{}{}.png", EXPORT_PREFIX, at.timestamp_millis())
}

/// Write a photo payload into `output_dir`
///
/// The directory is created if needed. Returns the written path.
pub async fn export_photo(data: &[u8], output_dir: &Path) -> Result<PathBuf, PhotoError> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|e| PhotoError::SaveFailed(format!("{}: {}", output_dir.display(), e)))?;

    let filepath = output_dir.join(export_file_name(Local::now()));
    info!(path = %filepath.display(), "Exporting photo");

    tokio::fs::write(&filepath, data)
        .await
        .map_err(|e| PhotoError::SaveFailed(format!("Failed to save photo: {}", e)))?;

    info!(path = %filepath.display(), size = data.len(), "Photo exported");
    Ok(filepath)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use image::Rgba;

    #[test]
    fn test_png_is_lossless() {
        let img = RgbaImage::from_fn(4, 3, |x, y| Rgba([x as u8 * 60, y as u8 * 80, 7, 255]));
        let encoded = encode_png(&img).unwrap();
        assert_eq!(&encoded[1..4], b"PNG");
        assert_eq!(decode_image(&encoded).unwrap(), img);
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(
            decode_image(b"definitely not an image"),
            Err(PhotoError::DecodeFailed(_))
        ));
    }

    #[test]
    fn test_export_file_name() {
        let at = Local.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(export_file_name(at), "DIGI-PRO-1700000000123.png");
    }

    #[tokio::test]
    async fn test_export_writes_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested");
        let path = export_photo(b"payload", &target).await.unwrap();

        assert!(path.starts_with(&target));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("DIGI-PRO-") && name.ends_with(".png"));
        assert_eq!(std::fs::read(&path).unwrap(), b"payload");
    }
}
