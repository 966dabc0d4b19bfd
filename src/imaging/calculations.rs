//! Pure calculation functions for canvas geometry.
//!
//! All functions here are pure and testable without any I/O or images.

use super::backend::Dimensions;

/// Uniform scale factor that fits `source` inside `target` on both axes.
///
/// The binding axis is whichever would otherwise overflow. May be below 1
/// (shrink) or above 1 (enlarge). Callers validate that neither input is empty.
pub fn fit_scale(source: Dimensions, target: Dimensions) -> f64 {
    let scale_x = target.width as f64 / source.width as f64;
    let scale_y = target.height as f64 / source.height as f64;
    scale_x.min(scale_y)
}

/// Calculate the size of `source` scaled to fit inside `target`.
///
/// Each axis is `round(source * scale)`, clamped to `1..=target` so float
/// error can never overflow the canvas and extreme aspect ratios never
/// collapse an axis to zero.
///
/// # Examples
/// ```
/// # use store_assets::imaging::{Dimensions, calculate_fit_dimensions};
/// // 2:1 source into a 1.6:1 box → width binds, height letterboxed
/// let fit = calculate_fit_dimensions(Dimensions::new(2000, 1000), Dimensions::new(1280, 800));
/// assert_eq!(fit, Dimensions::new(1280, 640));
/// ```
pub fn calculate_fit_dimensions(source: Dimensions, target: Dimensions) -> Dimensions {
    let scale = fit_scale(source, target);
    let axis = |len: u32, bound: u32| ((len as f64 * scale).round() as u32).clamp(1, bound);
    Dimensions {
        width: axis(source.width, target.width),
        height: axis(source.height, target.height),
    }
}

/// Top-left offset that centers `content` on `canvas`.
///
/// Integer division: an odd remainder leaves the extra pixel on the
/// bottom/right.
pub fn center_offset(canvas: Dimensions, content: Dimensions) -> (u32, u32) {
    (
        canvas.width.saturating_sub(content.width) / 2,
        canvas.height.saturating_sub(content.height) / 2,
    )
}

/// Padding on each side of centered content: `(left, right, top, bottom)`.
pub fn padding(canvas: Dimensions, content: Dimensions) -> (u32, u32, u32, u32) {
    let (x, y) = center_offset(canvas, content);
    (
        x,
        canvas.width.saturating_sub(content.width) - x,
        y,
        canvas.height.saturating_sub(content.height) - y,
    )
}
