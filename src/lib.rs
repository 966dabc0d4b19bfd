//! # Store Assets
//!
//! Generates the fixed-size raster assets a store listing asks for: square
//! application icons, listing screenshots, and promo tiles, all from a
//! directory of ordinary screenshots.
//!
//! # Architecture
//!
//! ```text
//! source dir ──▶ pipeline ──▶ imaging::operations ──▶ ImageBackend ──▶ output dir
//!  (*.jpg|png)    (stages)      (plan names/sizes)     (decode → transform → encode)
//! ```
//!
//! Two transforms do the real work, both pure functions over pixel buffers:
//!
//! - **Canvas normalization** ([`imaging::normalize`]): any source, any size,
//!   any color mode in; an opaque canvas of the exact target size out, with the
//!   content aspect-preserved, centered, and padded with the background color.
//! - **Procedural icon** ([`imaging::render_icon`]): a fixed vector composition
//!   drawn on a transparent canvas, laid out in proportions of the edge length.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Source decoding, normalization, icon rendering, encoding, backend |
//! | [`pipeline`] | Finds sources, runs the stages, writes `assets.json` |
//! | [`config`] | `assets.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting for pipeline events |
//!
//! # Design Decisions
//!
//! ## Exact Output Sizes
//!
//! Store listings reject images that are a pixel off. The normalizer never
//! crops and never stretches: it scales by `min(tw / sw, th / sh)` so the
//! content fits on both axes, then pads. The output buffer is allocated at the
//! target size up front, so its dimensions cannot drift.
//!
//! ## Closed Color Modes
//!
//! Sources are classified once into [`imaging::SourceImage`] (opaque, alpha
//! channel, or palette) and each variant has exactly one conversion to opaque
//! RGB. Palette PNGs keep their `tRNS` table until that conversion, so a
//! transparent palette entry lands on the background color exactly.
//!
//! ## Two Encodings
//!
//! JPEG for photographs (quality 1–100, default 95) and PNG for anything that
//! must keep alpha. Asking for alpha in a JPEG is an error, not a silent
//! flatten.

pub mod config;
pub mod imaging;
pub mod output;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod test_helpers;
