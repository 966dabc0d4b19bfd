//! Shared test utilities: synthetic source images and encoders.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! write_jpeg(&tmp.path().join("001.jpg"), &gradient_rgb(2000, 1000));
//! ```

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::path::Path;

// =========================================================================
// Pixel sources
// =========================================================================

/// Deterministic RGB gradient, distinct enough per pixel to catch misplacement.
pub fn gradient_rgb(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    })
}

// =========================================================================
// Encoders
// =========================================================================

/// Encode any buffer as PNG in memory.
pub fn encode_png(img: &DynamicImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

/// Encode an indexed PNG with an explicit palette and optional `tRNS` table.
///
/// `indices` holds one entry per pixel; they are packed to `depth` here.
pub fn encode_palette_png(
    width: u32,
    height: u32,
    indices: &[u8],
    palette: &[[u8; 3]],
    transparency: &[u8],
    depth: png::BitDepth,
) -> Vec<u8> {
    let bits = match depth {
        png::BitDepth::One => 1,
        png::BitDepth::Two => 2,
        png::BitDepth::Four => 4,
        png::BitDepth::Eight => 8,
        png::BitDepth::Sixteen => panic!("indexed PNGs are at most 8-bit"),
    };
    let row_bytes = (width as usize * bits).div_ceil(8);
    let mut packed = vec![0u8; row_bytes * height as usize];
    for (i, &index) in indices.iter().enumerate() {
        let (x, y) = (i % width as usize, i / width as usize);
        let bit = x * bits;
        packed[y * row_bytes + bit / 8] |= index << (8 - bits - bit % 8);
    }

    let mut buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(depth);
        encoder.set_palette(palette.concat());
        if !transparency.is_empty() {
            encoder.set_trns(transparency.to_vec());
        }
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&packed).unwrap();
        writer.finish().unwrap();
    }
    buf
}

// =========================================================================
// File fixtures
// =========================================================================

pub fn write_jpeg(path: &Path, img: &RgbImage) {
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    JpegEncoder::new_with_quality(writer, 90).encode_image(img).unwrap();
}

/// Write an 8-bit indexed PNG.
pub fn write_palette_png(
    path: &Path,
    width: u32,
    height: u32,
    indices: &[u8],
    palette: &[[u8; 3]],
    transparency: &[u8],
) {
    let bytes = encode_palette_png(
        width,
        height,
        indices,
        palette,
        transparency,
        png::BitDepth::Eight,
    );
    std::fs::write(path, bytes).unwrap();
}
