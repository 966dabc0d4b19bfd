//! Parameter types for image operations.
//!
//! These structs describe *what* to produce, not *how*. They are the
//! interface between the planning functions in
//! [`operations`](super::operations) and the [`backend`](super::backend)
//! that does the pixel work, which lets tests swap in a recording mock.
//!
//! ## Types
//!
//! - [`Quality`] — Lossy encoding quality (1–100, default 95). Clamped on construction.
//! - [`OutputFormat`] — JPEG at a quality, or lossless PNG.
//! - [`NormalizeParams`] — source, output path, exact target size, background, quality.
//! - [`IconParams`] — output path and edge length of a rendered icon.

use image::Rgb;
use std::path::{Path, PathBuf};

use super::backend::ImagingError;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(95)
    }
}

/// The two raster encodings the crate writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Lossy, 3-channel only.
    Jpeg { quality: Quality },
    /// Lossless, alpha preserved.
    Png,
}

impl OutputFormat {
    /// Pick the encoding from an output path's extension.
    ///
    /// `quality` only applies when the extension selects JPEG.
    pub fn from_path(path: &Path, quality: Quality) -> Result<Self, ImagingError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg { quality }),
            "png" => Ok(OutputFormat::Png),
            other => Err(ImagingError::Encoding(format!(
                "Unsupported output format: {:?}",
                other
            ))),
        }
    }

    pub fn supports_alpha(self) -> bool {
        matches!(self, OutputFormat::Png)
    }
}

/// Parameters for a normalize operation (fit + pad to an exact size).
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Exact output dimensions.
    pub width: u32,
    pub height: u32,
    pub background: Rgb<u8>,
    pub quality: Quality,
}

/// Parameters for rendering one procedural icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconParams {
    pub output: PathBuf,
    pub edge: u32,
}
