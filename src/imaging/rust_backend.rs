//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG) | `image` crate |
//! | Decode (palette PNG) | `png` crate, indices kept unexpanded |
//! | Resize | `image::imageops::resize` with `Lanczos3` filter |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` at the requested quality |
//! | Encode → PNG | `image::codecs::png::PngEncoder`, best compression |
//! | Icon | [`render_icon`](super::icon::render_icon) rasterizer |

use super::backend::{Dimensions, ImageBackend, ImagingError};
use super::encode::encode;
use super::icon::render_icon;
use super::normalize::normalize;
use super::params::{IconParams, NormalizeParams, OutputFormat, Quality};
use super::source::{ColorMode, SourceImage};
use image::DynamicImage;
use std::path::Path;

/// Input extensions the driver picks up as screenshot sources.
const SOURCE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Returns the lowercase file extensions accepted as screenshot sources.
pub fn supported_input_extensions() -> &'static [&'static str] {
    SOURCE_EXTENSIONS
}

/// Production backend: everything in-process, nothing shelled out.
#[derive(Debug, Clone, Copy)]
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode fully in memory, then write the file in a single call.
fn save_image(img: &DynamicImage, path: &Path, format: OutputFormat) -> Result<(), ImagingError> {
    let bytes = encode(img, format)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    Ok(())
}

impl ImageBackend for RustBackend {
    fn normalize(&self, params: &NormalizeParams) -> Result<ColorMode, ImagingError> {
        // Resolve the format up front: an unwritable target fails before decoding
        let format = OutputFormat::from_path(&params.output, params.quality)?;
        let source = SourceImage::open(&params.source)?;
        let canvas = normalize(
            &source,
            Dimensions::new(params.width, params.height),
            params.background,
        )?;
        save_image(&DynamicImage::ImageRgb8(canvas), &params.output, format)?;
        Ok(source.color_mode())
    }

    fn render_icon(&self, params: &IconParams) -> Result<(), ImagingError> {
        let format = OutputFormat::from_path(&params.output, Quality::default())?;
        if !format.supports_alpha() {
            return Err(ImagingError::Encoding(format!(
                "icons keep their transparent background; {} cannot store alpha",
                params.output.display()
            )));
        }
        let icon = render_icon(params.edge)?;
        save_image(&DynamicImage::ImageRgba8(icon), &params.output, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::normalize::WHITE;
    use crate::test_helpers::{gradient_rgb, write_jpeg, write_palette_png};
    use image::{ImageFormat, Rgb};

    fn params(source: &Path, output: &Path, width: u32, height: u32) -> NormalizeParams {
        NormalizeParams {
            source: source.to_path_buf(),
            output: output.to_path_buf(),
            width,
            height,
            background: WHITE,
            quality: Quality::default(),
        }
    }

    #[test]
    fn supported_extensions_cover_jpeg_and_png() {
        let exts = supported_input_extensions();
        for expected in &["jpg", "jpeg", "png"] {
            assert!(exts.contains(expected), "expected {expected}");
        }
    }

    #[test]
    fn normalize_writes_exact_size_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("shot.jpg");
        write_jpeg(&source, &gradient_rgb(2000, 1000));

        let output = tmp.path().join("screenshots/screenshot_1_1280x800.jpg");
        let mode = RustBackend::new()
            .normalize(&params(&source, &output, 1280, 800))
            .unwrap();

        assert_eq!(mode, ColorMode::Opaque);
        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1280, 800));
    }

    #[test]
    fn normalize_palette_source_to_png_is_lossless() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("logo.png");
        // Left half transparent, right half opaque red
        write_palette_png(&source, 4, 2, &[0, 0, 1, 1, 0, 0, 1, 1], &[[0, 0, 0], [255, 0, 0]], &[0]);

        let output = tmp.path().join("out.png");
        let mode = RustBackend::new()
            .normalize(&params(&source, &output, 4, 2))
            .unwrap();

        assert_eq!(mode, ColorMode::Palette);
        let decoded = image::open(&output).unwrap().into_rgb8();
        assert_eq!(decoded.get_pixel(0, 0), &WHITE);
        assert_eq!(decoded.get_pixel(3, 1), &Rgb([255, 0, 0]));
    }

    #[test]
    fn normalize_corrupt_source_writes_nothing() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("broken.jpg");
        std::fs::write(&source, b"not a jpeg").unwrap();

        let output = tmp.path().join("out.jpg");
        let result = RustBackend::new().normalize(&params(&source, &output, 440, 280));
        assert!(matches!(result, Err(ImagingError::InvalidImage(_))));
        assert!(!output.exists());
    }

    #[test]
    fn normalize_zero_target_writes_nothing() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("shot.jpg");
        write_jpeg(&source, &gradient_rgb(10, 10));

        let output = tmp.path().join("out.jpg");
        let result = RustBackend::new().normalize(&params(&source, &output, 0, 280));
        assert!(matches!(result, Err(ImagingError::InvalidTarget { .. })));
        assert!(!output.exists());
    }

    #[test]
    fn normalize_unsupported_output_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("shot.jpg");
        write_jpeg(&source, &gradient_rgb(10, 10));

        let output = tmp.path().join("out.webp");
        let result = RustBackend::new().normalize(&params(&source, &output, 10, 10));
        assert!(matches!(result, Err(ImagingError::Encoding(_))));
    }

    #[test]
    fn render_icon_writes_png_with_alpha() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("icons/icon48.png");
        RustBackend::new()
            .render_icon(&IconParams {
                output: output.clone(),
                edge: 48,
            })
            .unwrap();

        let decoded = image::open(&output).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (48, 48));
        assert!(decoded.color().has_alpha());
        assert_eq!(decoded.into_rgba8().get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn render_icon_to_jpeg_is_encoding_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("icon16.jpg");
        let result = RustBackend::new().render_icon(&IconParams {
            output: output.clone(),
            edge: 16,
        });
        assert!(matches!(result, Err(ImagingError::Encoding(_))));
        assert!(!output.exists());
    }
}
