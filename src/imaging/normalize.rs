//! Canvas normalization: any source in, an exact-size opaque canvas out.
//!
//! ```text
//! SourceImage ──to_opaque(bg)──▶ RgbImage ──Lanczos3──▶ scaled ──center──▶ target canvas
//! ```
//!
//! The scaled content always fits inside the target on both axes; the
//! remaining area is filled with the background color, split evenly between
//! opposite sides (±1px).

use super::backend::{Dimensions, ImagingError};
use super::calculations::{calculate_fit_dimensions, center_offset};
use super::source::SourceImage;
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

/// Default background for compositing and padding.
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Fit `source` into a `target`-sized canvas filled with `background`.
pub fn normalize(
    source: &SourceImage,
    target: Dimensions,
    background: Rgb<u8>,
) -> Result<RgbImage, ImagingError> {
    validate_target(target)?;
    let source_dims = source.dimensions();
    if source_dims.is_empty() {
        return Err(ImagingError::InvalidImage(format!(
            "source has zero area ({}x{})",
            source_dims.width, source_dims.height
        )));
    }

    let flattened = source.to_opaque(background)?;
    let fit = calculate_fit_dimensions(source_dims, target);
    let scaled = if fit == source_dims {
        flattened
    } else {
        imageops::resize(&flattened, fit.width, fit.height, FilterType::Lanczos3)
    };

    let mut canvas = RgbImage::from_pixel(target.width, target.height, background);
    let (x, y) = center_offset(target, fit);
    imageops::replace(&mut canvas, &scaled, x as i64, y as i64);
    Ok(canvas)
}

pub(crate) fn validate_target(target: Dimensions) -> Result<(), ImagingError> {
    if target.is_empty() {
        return Err(ImagingError::InvalidTarget {
            width: target.width,
            height: target.height,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::calculations::padding;
    use crate::imaging::source::PaletteImage;
    use crate::test_helpers::gradient_rgb;
    use image::{Rgba, RgbaImage};

    const RED: Rgb<u8> = Rgb([255, 0, 0]);

    /// Bounding box of pixels that differ from `background`.
    fn content_bounds(img: &RgbImage, background: Rgb<u8>) -> (u32, u32, u32, u32) {
        let (mut x0, mut y0, mut x1, mut y1) = (u32::MAX, u32::MAX, 0, 0);
        for (x, y, p) in img.enumerate_pixels() {
            if *p != background {
                x0 = x0.min(x);
                y0 = y0.min(y);
                x1 = x1.max(x);
                y1 = y1.max(y);
            }
        }
        (x0, y0, x1, y1)
    }

    #[test]
    fn wide_source_letterboxed_into_screenshot() {
        let source = SourceImage::Opaque(RgbImage::from_pixel(2000, 1000, RED));
        let out = normalize(&source, Dimensions::new(1280, 800), WHITE).unwrap();

        assert_eq!(out.dimensions(), (1280, 800));
        // 80px of padding above and below, none left/right
        assert_eq!(content_bounds(&out, WHITE), (0, 80, 1279, 719));
        assert_eq!(out.get_pixel(640, 79), &WHITE);
        assert_eq!(out.get_pixel(640, 80), &RED);
        assert_eq!(out.get_pixel(640, 720), &WHITE);
    }

    #[test]
    fn tall_source_pillarboxed() {
        let source = SourceImage::Opaque(RgbImage::from_pixel(300, 900, RED));
        let target = Dimensions::new(440, 280);
        let out = normalize(&source, target, WHITE).unwrap();

        assert_eq!(out.dimensions(), (440, 280));
        let (x0, y0, x1, y1) = content_bounds(&out, WHITE);
        assert_eq!((y0, y1), (0, 279));
        let left = x0;
        let right = 439 - x1;
        assert!(left.abs_diff(right) <= 1, "left {left} right {right}");
    }

    #[test]
    fn small_source_is_enlarged() {
        let source = SourceImage::Opaque(RgbImage::from_pixel(10, 4, RED));
        let out = normalize(&source, Dimensions::new(1400, 560), WHITE).unwrap();
        assert_eq!(out.dimensions(), (1400, 560));
        // 10x4 scaled by 140 = 1400x560: fills the canvas
        assert_eq!(out.get_pixel(0, 0), &RED);
        assert_eq!(out.get_pixel(1399, 559), &RED);
    }

    #[test]
    fn output_is_always_exact_target() {
        let shapes = [(1, 1), (7, 3), (3, 7), (1919, 1081), (640, 400)];
        let targets = [(1280, 800), (640, 400), (440, 280), (1400, 560), (1, 1)];
        for (sw, sh) in shapes {
            let source = SourceImage::Opaque(gradient_rgb(sw, sh));
            for (tw, th) in targets {
                let out = normalize(&source, Dimensions::new(tw, th), WHITE).unwrap();
                assert_eq!(out.dimensions(), (tw, th), "{sw}x{sh} → {tw}x{th}");
            }
        }
    }

    #[test]
    fn padding_is_symmetric_within_one_pixel() {
        let target = Dimensions::new(641, 401);
        for (sw, sh) in [(1000, 333), (333, 1000), (999, 501)] {
            let fit = calculate_fit_dimensions(Dimensions::new(sw, sh), target);
            let (left, right, top, bottom) = padding(target, fit);
            assert!(left.abs_diff(right) <= 1);
            assert!(top.abs_diff(bottom) <= 1);
            assert!(left <= right && top <= bottom);
        }
    }

    #[test]
    fn same_size_opaque_source_is_identity() {
        let img = gradient_rgb(64, 40);
        let source = SourceImage::Opaque(img.clone());
        let out = normalize(&source, Dimensions::new(64, 40), WHITE).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn unscaled_source_is_still_centered_and_padded() {
        let img = gradient_rgb(640, 300);
        let source = SourceImage::Opaque(img.clone());
        let out = normalize(&source, Dimensions::new(640, 400), WHITE).unwrap();

        assert_eq!(out.dimensions(), (640, 400));
        for x in [0, 320, 639] {
            assert_eq!(out.get_pixel(x, 49), &WHITE);
            assert_eq!(out.get_pixel(x, 350), &WHITE);
        }
        for (x, y, p) in img.enumerate_pixels() {
            assert_eq!(out.get_pixel(x, y + 50), p, "pixel {x},{y}");
        }
    }

    #[test]
    fn transparent_pixels_resolve_to_background() {
        let bg = Rgb([30, 60, 90]);
        let mut img = RgbaImage::from_pixel(20, 10, Rgba([200, 10, 10, 255]));
        img.put_pixel(3, 4, Rgba([0, 255, 0, 0]));
        let source = SourceImage::AlphaChannel(img);

        // Same size: the transparent pixel maps to the same output position
        let out = normalize(&source, Dimensions::new(20, 10), bg).unwrap();
        assert_eq!(out.get_pixel(3, 4), &bg);
        assert_eq!(out.get_pixel(4, 4), &Rgb([200, 10, 10]));
    }

    #[test]
    fn fully_transparent_source_scaled_is_all_background() {
        let bg = Rgb([30, 60, 90]);
        let source = SourceImage::AlphaChannel(RgbaImage::from_pixel(50, 30, Rgba([9, 9, 9, 0])));
        let out = normalize(&source, Dimensions::new(440, 280), bg).unwrap();
        assert!(out.pixels().all(|p| *p == bg));
    }

    #[test]
    fn palette_transparency_resolves_to_background() {
        let source = SourceImage::Palette(PaletteImage {
            width: 2,
            height: 1,
            indices: vec![0, 1],
            palette: vec![Rgb([0, 0, 0]), RED],
            transparency: vec![0],
        });
        let out = normalize(&source, Dimensions::new(2, 1), WHITE).unwrap();
        assert_eq!(out.get_pixel(0, 0), &WHITE);
        assert_eq!(out.get_pixel(1, 0), &RED);
    }

    #[test]
    fn zero_width_source_is_invalid_image() {
        let source = SourceImage::Opaque(RgbImage::new(0, 10));
        let result = normalize(&source, Dimensions::new(1280, 800), WHITE);
        assert!(matches!(result, Err(ImagingError::InvalidImage(_))));
    }

    #[test]
    fn zero_target_is_invalid_target() {
        let source = SourceImage::Opaque(gradient_rgb(10, 10));
        let result = normalize(&source, Dimensions::new(0, 800), WHITE);
        assert!(matches!(
            result,
            Err(ImagingError::InvalidTarget {
                width: 0,
                height: 800
            })
        ));
    }
}
