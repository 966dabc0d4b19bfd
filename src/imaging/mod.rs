//! Image processing: pure Rust, everything in-process.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode + classify** | `image::load_from_memory`, `png` for indexed PNGs |
//! | **Normalize** | composite → Lanczos3 resize → center on exact canvas |
//! | **Icon** | vector primitives rasterized onto a transparent canvas |
//! | **Encode** | JPEG (quality 1–100) or lossless PNG |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for fit/center geometry (unit testable)
//! - **Source**: [`SourceImage`] color-mode variants and their RGB conversions
//! - **Normalize / Icon / Encode**: the pixel transforms
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Asset planning on top of a backend

pub mod backend;
mod calculations;
pub mod encode;
pub mod icon;
pub mod normalize;
pub mod operations;
mod params;
pub mod rust_backend;
pub mod source;

pub use backend::{Dimensions, ImageBackend, ImagingError};
pub use calculations::{calculate_fit_dimensions, center_offset, fit_scale};
pub use icon::{ICON_SIZES, IconComposition, render_icon};
pub use normalize::{WHITE, normalize};
pub use operations::{
    AssetKind, GeneratedAsset, PromoConfig, PromoTile, ScreenshotConfig, create_icons,
    create_promo_tiles, create_screenshots,
};
pub use params::{IconParams, NormalizeParams, OutputFormat, Quality};
pub use rust_backend::RustBackend;
pub use source::{ColorMode, PaletteImage, SourceImage};
