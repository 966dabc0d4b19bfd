//! CLI output formatting for the asset pipeline.
//!
//! Every asset leads with its size and output path; where it came from is
//! shown as indented context, mirroring how the files land on disk:
//!
//! ```text
//! Sources: 7 found, using 5
//! Screenshots (10 files)
//!     1280x800 → screenshots/screenshot_1_1280x800.jpg
//!         Source: 001-editor.png (alpha channel)
//! Icons (4 files)
//!     16x16 → icons/icon16.png
//!
//! Wrote 10 screenshots, 0 promo tiles, 4 icons
//! ```
//!
//! Each `format_*` function returns `Vec<String>` and is pure; the `print_*`
//! wrappers write to stdout.

use crate::imaging::{AssetKind, ColorMode, GeneratedAsset};
use crate::pipeline::{MANIFEST_FILE, Manifest, PipelineEvent, Stage};
use std::path::Path;
use std::thread::JoinHandle;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{} {}", n, one)
    } else {
        format!("{} {}", n, many)
    }
}

fn stage_title(stage: Stage) -> &'static str {
    match stage {
        Stage::Screenshots => "Screenshots",
        Stage::Promo => "Promo tiles",
        Stage::Icons => "Icons",
    }
}

fn color_mode_label(mode: ColorMode) -> &'static str {
    match mode {
        ColorMode::Opaque => "opaque",
        ColorMode::AlphaChannel => "alpha channel",
        ColorMode::Palette => "palette",
    }
}

/// Format an asset line plus its source context.
///
/// ```text
/// 440x280 → promo/small_promo_tile_440x280.jpg
///     Source: 001.jpg (opaque)
/// ```
fn asset_lines(asset: &GeneratedAsset, depth: usize) -> Vec<String> {
    let mut lines = vec![format!(
        "{}{}x{} \u{2192} {}",
        indent(depth),
        asset.width,
        asset.height,
        asset.path
    )];
    if let Some(source) = &asset.source {
        let filename = Path::new(source)
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.clone());
        let line = match asset.color_mode {
            Some(mode) => format!("Source: {} ({})", filename, color_mode_label(mode)),
            None => format!("Source: {}", filename),
        };
        lines.push(format!("{}{}", indent(depth + 1), line));
    }
    lines
}

/// Format one pipeline progress event.
pub fn format_event(event: &PipelineEvent) -> Vec<String> {
    match event {
        PipelineEvent::SourcesFound { count, used } if count == used => {
            vec![format!("Sources: {} found", count)]
        }
        PipelineEvent::SourcesFound { count, used } => {
            vec![format!("Sources: {} found, using {}", count, used)]
        }
        PipelineEvent::NoSources { dir } => vec![format!(
            "No source images (.jpg, .jpeg, .png) in {}; skipping screenshots and promo tiles",
            dir.display()
        )],
        PipelineEvent::StageStarted { stage, count } => vec![format!(
            "{} ({})",
            stage_title(*stage),
            plural(*count, "file", "files")
        )],
        PipelineEvent::AssetWritten(asset) => asset_lines(asset, 1),
    }
}

pub fn print_event(event: &PipelineEvent) {
    for line in format_event(event) {
        println!("{}", line);
    }
}

/// Format the closing summary for a finished run.
pub fn format_summary(manifest: &Manifest, output_root: &Path) -> Vec<String> {
    let count = |kind: AssetKind| manifest.assets.iter().filter(|a| a.kind == kind).count();
    vec![
        String::new(),
        format!(
            "Wrote {}, {}, {}",
            plural(count(AssetKind::Screenshot), "screenshot", "screenshots"),
            plural(count(AssetKind::PromoTile), "promo tile", "promo tiles"),
            plural(count(AssetKind::Icon), "icon", "icons"),
        ),
        format!("Manifest: {}", output_root.join(MANIFEST_FILE).display()),
    ]
}

pub fn print_summary(manifest: &Manifest, output_root: &Path) {
    for line in format_summary(manifest, output_root) {
        println!("{}", line);
    }
}

/// Wait for the event printer thread; a panic there becomes an error.
pub fn join_printer(printer: JoinHandle<()>) -> std::io::Result<()> {
    printer
        .join()
        .map_err(|_| std::io::Error::other("progress printer thread panicked"))
}
