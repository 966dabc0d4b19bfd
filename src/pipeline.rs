//! Asset generation pipeline.
//!
//! Drives the imaging operations for one source directory and writes the
//! results under an output root:
//!
//! ```text
//! store-assets/
//! ├── assets.json                          # Manifest of everything written
//! ├── screenshots/
//! │   ├── screenshot_1_1280x800.jpg
//! │   └── screenshot_1_640x400.jpg
//! ├── promo/
//! │   ├── small_promo_tile_440x280.jpg     # From the first source
//! │   └── marquee_promo_tile_1400x560.jpg
//! └── icons/
//!     ├── icon16.png
//!     └── ...
//! ```
//!
//! Sources are the top-level `jpg`/`jpeg`/`png` files of the source
//! directory, sorted by file name. With no sources the screenshot and promo
//! stages are skipped and icons are still rendered.
//!
//! Progress is reported as [`PipelineEvent`]s over an optional channel; the
//! CLI formats them with [`output::format_event`](crate::output::format_event).

use crate::config::{AssetConfig, ConfigError};
use crate::imaging::{
    GeneratedAsset, ImageBackend, ImagingError, create_icons, create_promo_tiles,
    create_screenshots, rust_backend::supported_input_extensions,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use walkdir::WalkDir;

/// Manifest file written at the output root.
pub const MANIFEST_FILE: &str = "assets.json";

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] ImagingError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Cannot list sources in {path}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
}

/// Which stages to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stages {
    pub icons: bool,
    pub screenshots: bool,
    pub promo: bool,
}

impl Stages {
    pub fn all() -> Self {
        Self {
            icons: true,
            screenshots: true,
            promo: true,
        }
    }

    pub fn icons_only() -> Self {
        Self {
            icons: true,
            screenshots: false,
            promo: false,
        }
    }

    pub fn screenshots_only() -> Self {
        Self {
            icons: false,
            screenshots: true,
            promo: false,
        }
    }

    pub fn promo_only() -> Self {
        Self {
            icons: false,
            screenshots: false,
            promo: true,
        }
    }

    fn needs_sources(self) -> bool {
        self.screenshots || self.promo
    }

    /// How many of `found` sources the selected stages read.
    /// Promo tiles only ever use the first one.
    fn sources_used(self, found: usize, max_screenshots: usize) -> usize {
        if self.screenshots {
            found.min(max_screenshots)
        } else if self.promo {
            found.min(1)
        } else {
            0
        }
    }
}

/// Progress reported while the pipeline runs.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    SourcesFound { count: usize, used: usize },
    NoSources { dir: PathBuf },
    StageStarted { stage: Stage, count: usize },
    AssetWritten(GeneratedAsset),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Screenshots,
    Promo,
    Icons,
}

/// Everything the pipeline wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub assets: Vec<GeneratedAsset>,
}

/// Top-level image files in `dir` with a supported extension, sorted by name.
pub fn find_sources(dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    let extensions = supported_input_extensions();
    let mut sources = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|source| PipelineError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| extensions.contains(&e.to_lowercase().as_str()));
        if matches {
            sources.push(entry.into_path());
        }
    }
    sources.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(sources)
}

fn emit(events: Option<&Sender<PipelineEvent>>, event: PipelineEvent) {
    if let Some(tx) = events {
        // Receiver gone means nobody is listening; progress is best-effort.
        let _ = tx.send(event);
    }
}

/// Run the selected stages and write the manifest.
pub fn run(
    backend: &impl ImageBackend,
    source_dir: &Path,
    output_dir: &Path,
    config: &AssetConfig,
    stages: Stages,
    events: Option<Sender<PipelineEvent>>,
) -> Result<Manifest, PipelineError> {
    let events = events.as_ref();
    let mut manifest = Manifest::default();
    let report = |asset: &GeneratedAsset| emit(events, PipelineEvent::AssetWritten(asset.clone()));

    let sources = if stages.needs_sources() {
        let sources = find_sources(source_dir)?;
        if sources.is_empty() {
            emit(
                events,
                PipelineEvent::NoSources {
                    dir: source_dir.to_path_buf(),
                },
            );
        } else {
            emit(
                events,
                PipelineEvent::SourcesFound {
                    count: sources.len(),
                    used: stages.sources_used(sources.len(), config.screenshots.max_count),
                },
            );
        }
        sources
    } else {
        Vec::new()
    };

    if stages.screenshots && !sources.is_empty() {
        let shots = config.screenshot_config()?;
        let used = sources.len().min(shots.max_count);
        emit(
            events,
            PipelineEvent::StageStarted {
                stage: Stage::Screenshots,
                count: used * shots.sizes.len(),
            },
        );
        manifest.assets.extend(create_screenshots(
            backend,
            &sources,
            &output_dir.join("screenshots"),
            &shots,
            report,
        )?);
    }

    if let Some(first) = sources.first().filter(|_| stages.promo) {
        let promo = config.promo_config()?;
        emit(
            events,
            PipelineEvent::StageStarted {
                stage: Stage::Promo,
                count: promo.tiles.len(),
            },
        );
        manifest.assets.extend(create_promo_tiles(
            backend,
            first,
            &output_dir.join("promo"),
            &promo,
            report,
        )?);
    }

    if stages.icons {
        emit(
            events,
            PipelineEvent::StageStarted {
                stage: Stage::Icons,
                count: config.icons.sizes.len(),
            },
        );
        manifest.assets.extend(create_icons(
            backend,
            &output_dir.join("icons"),
            &config.icons.sizes,
            report,
        )?);
    }

    std::fs::create_dir_all(output_dir)?;
    let json = serde_json::to_string_pretty(&manifest)?;
    std::fs::write(output_dir.join(MANIFEST_FILE), json)?;

    Ok(manifest)
}
