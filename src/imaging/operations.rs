//! High-level image operations.
//!
//! These functions decide *which* assets to produce (file names, target
//! sizes, source limits) and hand each one to a backend. Planning is split
//! from execution so the naming and limit rules are testable with a mock.

use super::backend::{Dimensions, ImageBackend, ImagingError};
use super::params::{IconParams, NormalizeParams, Quality};
use super::source::ColorMode;
use image::Rgb;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, ImagingError>;

/// What an output file is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Screenshot,
    PromoTile,
    Icon,
}

/// One written asset, as recorded in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedAsset {
    pub kind: AssetKind,
    /// Path relative to the output root, e.g. `icons/icon16.png`.
    pub path: String,
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_mode: Option<ColorMode>,
}

/// Configuration for listing screenshots.
#[derive(Debug, Clone)]
pub struct ScreenshotConfig {
    pub sizes: Vec<Dimensions>,
    pub quality: Quality,
    pub background: Rgb<u8>,
    /// At most this many sources are used, in the order given.
    pub max_count: usize,
}

/// A named promo tile size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoTile {
    pub name: String,
    pub size: Dimensions,
}

/// Configuration for promo tiles, all derived from one source.
#[derive(Debug, Clone)]
pub struct PromoConfig {
    pub tiles: Vec<PromoTile>,
    pub quality: Quality,
    pub background: Rgb<u8>,
}

/// `output_dir`'s own name joined with `file_name`, for manifest paths.
fn relative_path(output_dir: &Path, file_name: &Path) -> String {
    let file = file_name
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();
    match output_dir.file_name() {
        Some(dir) => format!("{}/{}", dir.to_string_lossy(), file),
        None => file,
    }
}

/// Plan screenshot operations without executing them.
///
/// Uses the first `max_count` sources; each one is produced at every
/// configured size as `screenshot_{n}_{w}x{h}.jpg` with 1-based `n`.
pub fn plan_screenshots(
    sources: &[PathBuf],
    output_dir: &Path,
    config: &ScreenshotConfig,
) -> Vec<NormalizeParams> {
    sources
        .iter()
        .take(config.max_count)
        .enumerate()
        .flat_map(|(i, source)| {
            config.sizes.iter().map(move |size| NormalizeParams {
                source: source.clone(),
                output: output_dir.join(format!(
                    "screenshot_{}_{}x{}.jpg",
                    i + 1,
                    size.width,
                    size.height
                )),
                width: size.width,
                height: size.height,
                background: config.background,
                quality: config.quality,
            })
        })
        .collect()
}

/// Plan promo tile operations: `{name}_{w}x{h}.jpg` per tile, all from `source`.
pub fn plan_promo_tiles(
    source: &Path,
    output_dir: &Path,
    config: &PromoConfig,
) -> Vec<NormalizeParams> {
    config
        .tiles
        .iter()
        .map(|tile| NormalizeParams {
            source: source.to_path_buf(),
            output: output_dir.join(format!(
                "{}_{}x{}.jpg",
                tile.name, tile.size.width, tile.size.height
            )),
            width: tile.size.width,
            height: tile.size.height,
            background: config.background,
            quality: config.quality,
        })
        .collect()
}

/// Plan icon renders: `icon{size}.png` per edge length.
pub fn plan_icons(output_dir: &Path, sizes: &[u32]) -> Vec<IconParams> {
    sizes
        .iter()
        .map(|&edge| IconParams {
            output: output_dir.join(format!("icon{}.png", edge)),
            edge,
        })
        .collect()
}

/// Run one normalize operation and describe the result.
pub fn execute_normalize(
    backend: &impl ImageBackend,
    kind: AssetKind,
    params: &NormalizeParams,
) -> Result<GeneratedAsset> {
    let color_mode = backend.normalize(params)?;
    let output_dir = params.output.parent().unwrap_or(Path::new(""));
    Ok(GeneratedAsset {
        kind,
        path: relative_path(output_dir, &params.output),
        width: params.width,
        height: params.height,
        source: Some(params.source.to_string_lossy().into_owned()),
        color_mode: Some(color_mode),
    })
}

/// Create listing screenshots, calling `on_asset` after each one is written.
pub fn create_screenshots(
    backend: &impl ImageBackend,
    sources: &[PathBuf],
    output_dir: &Path,
    config: &ScreenshotConfig,
    mut on_asset: impl FnMut(&GeneratedAsset),
) -> Result<Vec<GeneratedAsset>> {
    let mut assets = Vec::new();
    for params in plan_screenshots(sources, output_dir, config) {
        let asset = execute_normalize(backend, AssetKind::Screenshot, &params)?;
        on_asset(&asset);
        assets.push(asset);
    }
    Ok(assets)
}

/// Create promo tiles from a single source.
pub fn create_promo_tiles(
    backend: &impl ImageBackend,
    source: &Path,
    output_dir: &Path,
    config: &PromoConfig,
    mut on_asset: impl FnMut(&GeneratedAsset),
) -> Result<Vec<GeneratedAsset>> {
    let mut assets = Vec::new();
    for params in plan_promo_tiles(source, output_dir, config) {
        let asset = execute_normalize(backend, AssetKind::PromoTile, &params)?;
        on_asset(&asset);
        assets.push(asset);
    }
    Ok(assets)
}

/// Render icons at each edge length.
pub fn create_icons(
    backend: &impl ImageBackend,
    output_dir: &Path,
    sizes: &[u32],
    mut on_asset: impl FnMut(&GeneratedAsset),
) -> Result<Vec<GeneratedAsset>> {
    let mut assets = Vec::new();
    for params in plan_icons(output_dir, sizes) {
        backend.render_icon(&params)?;
        let asset = GeneratedAsset {
            kind: AssetKind::Icon,
            path: relative_path(output_dir, &params.output),
            width: params.edge,
            height: params.edge,
            source: None,
            color_mode: None,
        };
        on_asset(&asset);
        assets.push(asset);
    }
    Ok(assets)
}
