use clap::{Parser, Subcommand};
use std::path::PathBuf;
use store_assets::imaging::RustBackend;
use store_assets::pipeline::{self, Stages};
use store_assets::{config, output};

#[derive(Parser)]
#[command(name = "store-assets")]
#[command(about = "Generate store listing icons, screenshots and promo tiles")]
#[command(long_about = "\
Generate store listing icons, screenshots and promo tiles

Screenshots are every .jpg/.jpeg/.png at the top of the source directory,
sorted by file name. Each is fitted into the target size without cropping,
centered, and padded with the background color.

Output structure:

  store-assets/
  ├── assets.json                        # Manifest of everything written
  ├── screenshots/
  │   ├── screenshot_1_1280x800.jpg      # First 5 sources, every size
  │   └── screenshot_1_640x400.jpg
  ├── promo/
  │   ├── small_promo_tile_440x280.jpg   # From the first source
  │   └── marquee_promo_tile_1400x560.jpg
  └── icons/
      └── icon16.png … icon128.png      # Transparent PNG

Settings are read from assets.toml in the source directory.
Run 'store-assets gen-config' to print a documented one.")]
#[command(version)]
struct Cli {
    /// Directory containing source screenshots (and optional assets.toml)
    #[arg(long, default_value = ".", global = true)]
    source: PathBuf,

    /// Output root directory
    #[arg(long, default_value = "store-assets", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the procedural icon at every configured size
    Icons,
    /// Fit source images into the listing screenshot sizes
    Screenshots,
    /// Make promo tiles from the first source image
    Promo,
    /// Run all stages: screenshots → promo tiles → icons
    Build,
    /// Print a stock assets.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let stages = match cli.command {
        Command::Icons => Stages::icons_only(),
        Command::Screenshots => Stages::screenshots_only(),
        Command::Promo => Stages::promo_only(),
        Command::Build => Stages::all(),
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            return Ok(());
        }
    };

    let asset_config = config::load_config(&cli.source)?;

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_event(&event);
        }
    });
    let result = pipeline::run(
        &RustBackend::new(),
        &cli.source,
        &cli.output,
        &asset_config,
        stages,
        Some(tx),
    );
    // The sender is dropped once `run` returns, which ends the printer loop
    let printed = output::join_printer(printer);
    let manifest = result?;
    printed?;

    output::print_summary(&manifest, &cli.output);
    Ok(())
}
