//! Serialization of finished canvases.
//!
//! Encoding happens entirely in memory; the backend writes the returned bytes
//! in one call, so a failed encode never leaves a partial file behind.

use super::backend::ImagingError;
use super::params::OutputFormat;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ExtendedColorType, ImageEncoder};

/// Encode `img` in the requested format.
///
/// JPEG is 3-channel only: a buffer with an alpha channel is rejected rather
/// than silently flattened.
pub fn encode(img: &DynamicImage, format: OutputFormat) -> Result<Vec<u8>, ImagingError> {
    let mut buf = Vec::new();
    match format {
        OutputFormat::Jpeg { quality } => {
            if img.color().has_alpha() {
                return Err(ImagingError::Encoding(
                    "JPEG cannot represent an alpha channel".into(),
                ));
            }
            let rgb = img.to_rgb8();
            JpegEncoder::new_with_quality(&mut buf, quality.value() as u8)
                .write_image(
                    rgb.as_raw(),
                    rgb.width(),
                    rgb.height(),
                    ExtendedColorType::Rgb8,
                )
                .map_err(|e| ImagingError::Encoding(format!("JPEG encode failed: {}", e)))?;
        }
        OutputFormat::Png => {
            PngEncoder::new_with_quality(&mut buf, CompressionType::Best, FilterType::Adaptive)
                .write_image(
                    img.as_bytes(),
                    img.width(),
                    img.height(),
                    img.color().into(),
                )
                .map_err(|e| ImagingError::Encoding(format!("PNG encode failed: {}", e)))?;
        }
    }
    Ok(buf)
}
