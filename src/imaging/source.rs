//! Source images, classified by color mode.
//!
//! A decoded source is one of three closed variants, and each variant has
//! exactly one conversion to an opaque RGB buffer:
//!
//! | Variant | Pixels | Conversion |
//! |---|---|---|
//! | [`SourceImage::Opaque`] | `RgbImage` | [`opaque_to_rgb`]: copied unchanged |
//! | [`SourceImage::AlphaChannel`] | `RgbaImage` | [`alpha_to_rgb`]: composited over the background |
//! | [`SourceImage::Palette`] | [`PaletteImage`] | [`palette_to_rgb`]: expanded through `PLTE`/`tRNS`, then composited |
//!
//! Palette PNGs are decoded with the `png` crate directly so the palette and
//! its transparency table survive until compositing. Every other input goes
//! through `image::load_from_memory` and is classified by whether it carries
//! an alpha channel (gray, 16-bit and float layouts are narrowed to 8-bit
//! RGB/RGBA on the way).

use super::backend::{Dimensions, ImagingError};
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::Path;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
const PNG_COLOR_TYPE_INDEXED: u8 = 3;

/// Channel layout of a source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    Opaque,
    AlphaChannel,
    Palette,
}

/// Palette-indexed pixels: one index per pixel into `palette`.
///
/// `transparency` holds per-entry alpha (PNG `tRNS`); entries past its end
/// are fully opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteImage {
    pub width: u32,
    pub height: u32,
    pub indices: Vec<u8>,
    pub palette: Vec<Rgb<u8>>,
    pub transparency: Vec<u8>,
}

impl PaletteImage {
    /// Resolve a palette index to a color with alpha.
    fn color(&self, index: u8) -> Result<Rgba<u8>, ImagingError> {
        let Rgb([r, g, b]) = *self.palette.get(index as usize).ok_or_else(|| {
            ImagingError::InvalidImage(format!(
                "palette index {} out of range (palette has {} entries)",
                index,
                self.palette.len()
            ))
        })?;
        let a = self
            .transparency
            .get(index as usize)
            .copied()
            .unwrap_or(255);
        Ok(Rgba([r, g, b, a]))
    }
}

/// A decoded source image tagged with its color mode.
#[derive(Debug, Clone)]
pub enum SourceImage {
    Opaque(RgbImage),
    AlphaChannel(RgbaImage),
    Palette(PaletteImage),
}

impl SourceImage {
    /// Read and decode a source file.
    pub fn open(path: &Path) -> Result<Self, ImagingError> {
        let bytes = std::fs::read(path)?;
        Self::decode(&bytes).map_err(|e| match e {
            ImagingError::InvalidImage(msg) => {
                ImagingError::InvalidImage(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Decode an encoded image held in memory.
    pub fn decode(bytes: &[u8]) -> Result<Self, ImagingError> {
        if is_indexed_png(bytes) {
            return decode_palette_png(bytes).map(SourceImage::Palette);
        }
        let img = image::load_from_memory(bytes)
            .map_err(|e| ImagingError::InvalidImage(e.to_string()))?;
        Ok(Self::from_dynamic(img))
    }

    /// Classify an already-decoded `image` buffer.
    pub fn from_dynamic(img: DynamicImage) -> Self {
        if img.color().has_alpha() {
            SourceImage::AlphaChannel(img.into_rgba8())
        } else {
            SourceImage::Opaque(img.into_rgb8())
        }
    }

    pub fn color_mode(&self) -> ColorMode {
        match self {
            SourceImage::Opaque(_) => ColorMode::Opaque,
            SourceImage::AlphaChannel(_) => ColorMode::AlphaChannel,
            SourceImage::Palette(_) => ColorMode::Palette,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        match self {
            SourceImage::Opaque(img) => img.dimensions().into(),
            SourceImage::AlphaChannel(img) => img.dimensions().into(),
            SourceImage::Palette(img) => Dimensions::new(img.width, img.height),
        }
    }

    /// Flatten to opaque RGB, compositing any transparency over `background`.
    pub fn to_opaque(&self, background: Rgb<u8>) -> Result<RgbImage, ImagingError> {
        match self {
            SourceImage::Opaque(img) => Ok(opaque_to_rgb(img)),
            SourceImage::AlphaChannel(img) => Ok(alpha_to_rgb(img, background)),
            SourceImage::Palette(img) => palette_to_rgb(img, background),
        }
    }
}

/// Opaque sources pass through unchanged (into a fresh buffer).
pub fn opaque_to_rgb(img: &RgbImage) -> RgbImage {
    img.clone()
}

/// Composite every pixel over `background`.
pub fn alpha_to_rgb(img: &RgbaImage, background: Rgb<u8>) -> RgbImage {
    RgbImage::from_fn(img.width(), img.height(), |x, y| {
        composite_over(*img.get_pixel(x, y), background)
    })
}

/// Expand indices through the palette, then composite over `background`.
pub fn palette_to_rgb(img: &PaletteImage, background: Rgb<u8>) -> Result<RgbImage, ImagingError> {
    let expected = img.width as usize * img.height as usize;
    if img.indices.len() != expected {
        return Err(ImagingError::InvalidImage(format!(
            "palette image has {} indices, expected {}",
            img.indices.len(),
            expected
        )));
    }

    let mut out = RgbImage::new(img.width, img.height);
    for (pixel, &index) in out.pixels_mut().zip(&img.indices) {
        *pixel = composite_over(img.color(index)?, background);
    }
    Ok(out)
}

/// Blend one pixel over an opaque background, rounding to nearest.
///
/// `a == 0` yields `background` exactly and `a == 255` yields the color exactly.
pub fn composite_over(pixel: Rgba<u8>, background: Rgb<u8>) -> Rgb<u8> {
    let Rgba([r, g, b, a]) = pixel;
    let a = a as u32;
    let mix = |c: u8, bg: u8| ((c as u32 * a + bg as u32 * (255 - a) + 127) / 255) as u8;
    Rgb([
        mix(r, background[0]),
        mix(g, background[1]),
        mix(b, background[2]),
    ])
}

/// Peek at the IHDR chunk: is this a PNG with an indexed color type?
fn is_indexed_png(bytes: &[u8]) -> bool {
    bytes.len() > 25
        && bytes.starts_with(PNG_SIGNATURE)
        && &bytes[12..16] == b"IHDR"
        && bytes[25] == PNG_COLOR_TYPE_INDEXED
}

fn decode_palette_png(bytes: &[u8]) -> Result<PaletteImage, ImagingError> {
    let invalid = |e: png::DecodingError| ImagingError::InvalidImage(e.to_string());

    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::IDENTITY);
    let mut reader = decoder.read_info().map_err(invalid)?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf).map_err(invalid)?;
    let info = reader.info();

    let palette: Vec<Rgb<u8>> = info
        .palette
        .as_ref()
        .ok_or_else(|| ImagingError::InvalidImage("indexed PNG without PLTE chunk".into()))?
        .chunks_exact(3)
        .map(|c| Rgb([c[0], c[1], c[2]]))
        .collect();
    let transparency = info.trns.as_ref().map(|t| t.to_vec()).unwrap_or_default();

    let bits = match frame.bit_depth {
        png::BitDepth::One => 1,
        png::BitDepth::Two => 2,
        png::BitDepth::Four => 4,
        png::BitDepth::Eight => 8,
        png::BitDepth::Sixteen => {
            return Err(ImagingError::InvalidImage(
                "indexed PNG with 16-bit depth".into(),
            ));
        }
    };

    let indices = unpack_indices(
        &buf,
        frame.width as usize,
        frame.height as usize,
        frame.line_size,
        bits,
    );

    Ok(PaletteImage {
        width: frame.width,
        height: frame.height,
        indices,
        palette,
        transparency,
    })
}

/// Unpack 1/2/4/8-bit scanlines into one index per pixel.
fn unpack_indices(
    buf: &[u8],
    width: usize,
    height: usize,
    line_size: usize,
    bits: usize,
) -> Vec<u8> {
    let mask = ((1u16 << bits) - 1) as u8;
    let mut indices = Vec::with_capacity(width * height);
    for row in buf.chunks(line_size).take(height) {
        for x in 0..width {
            let bit = x * bits;
            let shift = 8 - bits - bit % 8;
            indices.push((row[bit / 8] >> shift) & mask);
        }
    }
    indices
}
