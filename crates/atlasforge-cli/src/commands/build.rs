//! Build command implementations
//!
//! Assembles the atlas from a sheet or a tile directory and writes the atlas
//! image, the index, and optionally the readiness marker.

use anyhow::Result;
use atlasforge_backend_atlas::{build_atlas, AssemblyMode, AtlasError, BuildOptions, BuildSummary};
use atlasforge_spec::LayoutManifest;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::json_output::{print_json, BuildOutput};

/// Paths and flags shared by every build command.
#[derive(Debug, Clone)]
pub struct BuildArgs {
    /// Layout manifest path.
    pub layout: String,
    /// Atlas image destination.
    pub out_image: String,
    /// Atlas index destination.
    pub out_json: String,
    /// Readiness marker path.
    pub marker: String,
    /// Mark the build as production after a successful write.
    pub mark_production: bool,
    /// Emit a JSON result object instead of coloured text.
    pub json: bool,
}

impl BuildArgs {
    fn options(&self) -> BuildOptions {
        let options = BuildOptions::new(&self.out_image, &self.out_json);
        if self.mark_production {
            options.with_marker(&self.marker)
        } else {
            options
        }
    }
}

/// Run the build-sheet command
///
/// # Arguments
/// * `input` - Path to the high-resolution sheet
/// * `args` - Shared build arguments
///
/// # Returns
/// Exit code: 0 on success, 1 on error
pub fn run_sheet(input: &str, args: &BuildArgs) -> Result<ExitCode> {
    run(&AssemblyMode::Sheet(PathBuf::from(input)), args)
}

/// Run the build-tiles command
///
/// # Returns
/// Exit code: 0 on success, 1 on error
pub fn run_tiles(tiles_dir: &str, args: &BuildArgs) -> Result<ExitCode> {
    run(&AssemblyMode::Tiles(PathBuf::from(tiles_dir)), args)
}

/// Run the legacy build command.
///
/// Uses the tile directory when it exists, otherwise the sheet.
pub fn run_auto(input: &str, tiles_dir: &str, args: &BuildArgs) -> Result<ExitCode> {
    run(&select_mode(input, tiles_dir), args)
}

/// Pick the assembly mode the legacy `build` command uses.
pub fn select_mode(input: &str, tiles_dir: &str) -> AssemblyMode {
    if Path::new(tiles_dir).is_dir() {
        AssemblyMode::Tiles(PathBuf::from(tiles_dir))
    } else {
        AssemblyMode::Sheet(PathBuf::from(input))
    }
}

fn run(mode: &AssemblyMode, args: &BuildArgs) -> Result<ExitCode> {
    if !args.json {
        println!("{} {}", "Building:".cyan().bold(), mode);
        println!("  {} layout {}", "->".dimmed(), args.layout);
    }

    match execute(mode, args) {
        Ok(summary) => {
            if args.json {
                print_json(&BuildOutput::success(summary))?;
            } else {
                print_summary(&summary);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            if args.json {
                print_json(&BuildOutput::failure(&err))?;
            } else {
                println!(
                    "{} [{}] {}",
                    "FAILED".red().bold(),
                    err.code().to_string().yellow(),
                    err
                );
                println!("  {}", "Previous artifacts were left untouched.".dimmed());
            }
            Ok(ExitCode::from(1))
        }
    }
}

fn execute(mode: &AssemblyMode, args: &BuildArgs) -> Result<BuildSummary, AtlasError> {
    let manifest = LayoutManifest::load(Path::new(&args.layout))?;
    build_atlas(mode, &manifest, &args.options())
}

fn print_summary(summary: &BuildSummary) {
    println!(
        "{} atlas {}x{}, {} sprites",
        "SUCCESS".green().bold(),
        summary.atlas_width,
        summary.atlas_height,
        summary.sprite_count
    );
    println!("  {} image  {}", "->".green(), summary.image_path);
    println!("  {} index  {}", "->".green(), summary.index_path);
    println!("  {} blake3 {}", "->".green(), summary.image_hash.dimmed());
    match &summary.marker_path {
        Some(marker) => println!("  {} marked production at {}", "ok".green(), marker),
        None => println!("  {} not marked production", "!!".yellow()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlasforge_backend_atlas::png::encode_rgba;
    use atlasforge_backend_atlas::PngConfig;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    const LAYOUT: &str = r#"{
      "sheet": { "width": 32, "height": 32, "scale": 2, "cell": 16 },
      "sprites": [ { "id": "coin", "row": 0, "col": 0, "w": 8, "h": 8 } ]
    }"#;

    fn args(dir: &TempDir, mark_production: bool) -> BuildArgs {
        let path = |name: &str| dir.path().join(name).to_string_lossy().into_owned();
        std::fs::write(dir.path().join("layout.json"), LAYOUT).unwrap();
        BuildArgs {
            layout: path("layout.json"),
            out_image: path("out/sprites.png"),
            out_json: path("out/sprites.json"),
            marker: path("ready.json"),
            mark_production,
            json: true,
        }
    }

    fn write_png(path: &Path, width: u32, height: u32) {
        let image = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, encode_rgba(&image, &PngConfig::default()).unwrap()).unwrap();
    }

    #[test]
    fn test_select_mode_prefers_existing_tile_dir() {
        let dir = tempfile::tempdir().unwrap();
        let tiles = dir.path().join("tiles");
        let sheet = dir.path().join("batch.png").to_string_lossy().into_owned();

        let mode = select_mode(&sheet, &tiles.to_string_lossy());
        assert_eq!(mode.name(), "sheet");

        std::fs::create_dir(&tiles).unwrap();
        let mode = select_mode(&sheet, &tiles.to_string_lossy());
        assert_eq!(mode.name(), "tiles");
    }

    #[test]
    fn test_build_sheet_success() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(&dir, true);
        let sheet = dir.path().join("batch.png");
        write_png(&sheet, 32, 32);

        let code = run_sheet(&sheet.to_string_lossy(), &args).unwrap();

        assert_eq!(code, ExitCode::SUCCESS);
        assert!(Path::new(&args.out_image).is_file());
        assert!(Path::new(&args.out_json).is_file());
        assert!(Path::new(&args.marker).is_file());
    }

    #[test]
    fn test_build_tiles_missing_tile_fails() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(&dir, true);
        let tiles = dir.path().join("tiles");
        std::fs::create_dir(&tiles).unwrap();

        let code = run_tiles(&tiles.to_string_lossy(), &args).unwrap();

        assert_eq!(code, ExitCode::from(1));
        assert!(!Path::new(&args.out_image).exists());
        assert!(!Path::new(&args.marker).exists());
    }

    #[test]
    fn test_build_without_mark_leaves_marker_alone() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(&dir, false);
        write_png(&dir.path().join("tiles/coin.png"), 8, 8);

        let code = run_auto("unused.png", &dir.path().join("tiles").to_string_lossy(), &args).unwrap();

        assert_eq!(code, ExitCode::SUCCESS);
        assert!(!Path::new(&args.marker).exists());
    }
}
