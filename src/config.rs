//! Asset configuration module.
//!
//! Handles loading, validating, and merging `assets.toml`. The file lives in
//! the source directory next to the screenshots and is sparse: its keys are
//! merged over the stock defaults, so it only needs the values it changes.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! background = "#ffffff"     # Compositing + padding color
//!
//! [screenshots]
//! sizes = [[1280, 800], [640, 400]]
//! quality = 95               # JPEG quality (1-100)
//! max_count = 5              # Use at most this many source images
//!
//! [promo]
//! small = [440, 280]
//! marquee = [1400, 560]
//! quality = 95
//!
//! [icons]
//! sizes = [16, 32, 48, 128]
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Dimensions, PromoConfig, PromoTile, Quality, ScreenshotConfig};
use image::Rgb;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the source directory.
pub const CONFIG_FILE: &str = "assets.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Asset configuration loaded from `assets.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetConfig {
    /// Background used for transparency compositing and padding (`#rrggbb`).
    pub background: String,
    pub screenshots: ScreenshotsConfig,
    pub promo: PromoTilesConfig,
    pub icons: IconsConfig,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            background: "#ffffff".to_string(),
            screenshots: ScreenshotsConfig::default(),
            promo: PromoTilesConfig::default(),
            icons: IconsConfig::default(),
        }
    }
}

/// Listing screenshot settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScreenshotsConfig {
    /// Output sizes as `[width, height]`; every source is produced at each.
    pub sizes: Vec<[u32; 2]>,
    pub quality: u32,
    /// Maximum number of source images turned into screenshots.
    pub max_count: usize,
}

impl Default for ScreenshotsConfig {
    fn default() -> Self {
        Self {
            sizes: vec![[1280, 800], [640, 400]],
            quality: 95,
            max_count: 5,
        }
    }
}

/// Promo tile settings. Both tiles come from the first screenshot source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PromoTilesConfig {
    pub small: [u32; 2],
    pub marquee: [u32; 2],
    pub quality: u32,
}

impl Default for PromoTilesConfig {
    fn default() -> Self {
        Self {
            small: [440, 280],
            marquee: [1400, 560],
            quality: 95,
        }
    }
}

/// Icon settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IconsConfig {
    /// Square edge lengths to render.
    pub sizes: Vec<u32>,
}

impl Default for IconsConfig {
    fn default() -> Self {
        Self {
            sizes: crate::imaging::ICON_SIZES.to_vec(),
        }
    }
}

impl AssetConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_hex_color(&self.background)?;
        for (name, quality) in [
            ("screenshots.quality", self.screenshots.quality),
            ("promo.quality", self.promo.quality),
        ] {
            if !(1..=100).contains(&quality) {
                return Err(ConfigError::Validation(format!("{name} must be 1-100")));
            }
        }
        if self.screenshots.sizes.is_empty() {
            return Err(ConfigError::Validation(
                "screenshots.sizes must not be empty".into(),
            ));
        }
        let sizes = self
            .screenshots
            .sizes
            .iter()
            .map(|s| ("screenshots.sizes", s))
            .chain([("promo.small", &self.promo.small), ("promo.marquee", &self.promo.marquee)]);
        for (name, [w, h]) in sizes {
            if *w == 0 || *h == 0 {
                return Err(ConfigError::Validation(format!(
                    "{name} values must be non-zero"
                )));
            }
        }
        if self.screenshots.max_count == 0 {
            return Err(ConfigError::Validation(
                "screenshots.max_count must be at least 1".into(),
            ));
        }
        if self.icons.sizes.is_empty() || self.icons.sizes.contains(&0) {
            return Err(ConfigError::Validation(
                "icons.sizes must be non-empty and non-zero".into(),
            ));
        }
        Ok(())
    }

    /// Background as a pixel. Only valid after [`validate`](Self::validate).
    pub fn background_color(&self) -> Result<Rgb<u8>, ConfigError> {
        parse_hex_color(&self.background)
    }

    /// Screenshot settings in the form the imaging operations take.
    pub fn screenshot_config(&self) -> Result<ScreenshotConfig, ConfigError> {
        Ok(ScreenshotConfig {
            sizes: self
                .screenshots
                .sizes
                .iter()
                .map(|&[w, h]| Dimensions::new(w, h))
                .collect(),
            quality: Quality::new(self.screenshots.quality),
            background: self.background_color()?,
            max_count: self.screenshots.max_count,
        })
    }

    /// Promo tile settings in the form the imaging operations take.
    pub fn promo_config(&self) -> Result<PromoConfig, ConfigError> {
        let tile = |name: &str, [w, h]: [u32; 2]| PromoTile {
            name: name.to_string(),
            size: Dimensions::new(w, h),
        };
        Ok(PromoConfig {
            tiles: vec![
                tile("small_promo_tile", self.promo.small),
                tile("marquee_promo_tile", self.promo.marquee),
            ],
            quality: Quality::new(self.promo.quality),
            background: self.background_color()?,
        })
    }
}

/// Parse `#rrggbb` (case-insensitive, `#` required).
pub fn parse_hex_color(value: &str) -> Result<Rgb<u8>, ConfigError> {
    let invalid = || ConfigError::Validation(format!("background must be #rrggbb, got {value:?}"));
    let hex = value.strip_prefix('#').ok_or_else(invalid)?;
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(invalid());
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    Ok(Rgb([channel(0)?, channel(2)?, channel(4)?]))
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(AssetConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `assets.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<AssetConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AssetConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `assets.toml` in the given directory, over stock defaults.
pub fn load_config(dir: &Path) -> Result<AssetConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(dir)?)
}

/// Returns a fully-commented stock `assets.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Store asset configuration
# =========================
# All settings are optional. Values shown below are the defaults.
# Place this file as `assets.toml` in the screenshot source directory.
# Unknown keys will cause an error.

# Color used behind transparent pixels and for padding, as #rrggbb.
background = "#ffffff"

# ---------------------------------------------------------------------------
# Listing screenshots
# ---------------------------------------------------------------------------
[screenshots]
# Every source image is fitted into each of these [width, height] boxes.
sizes = [[1280, 800], [640, 400]]

# JPEG quality (1 = smallest, 100 = best).
quality = 95

# Use at most this many source images (sorted by file name).
max_count = 5

# ---------------------------------------------------------------------------
# Promo tiles (made from the first source image)
# ---------------------------------------------------------------------------
[promo]
small = [440, 280]
marquee = [1400, 560]
quality = 95

# ---------------------------------------------------------------------------
# Icons (PNG with transparent background)
# ---------------------------------------------------------------------------
[icons]
sizes = [16, 32, 48, 128]
"##
}
