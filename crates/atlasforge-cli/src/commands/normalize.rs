//! Normalize command implementation
//!
//! Turns raw captures in a directory into normalized tiles for tile mode.

use anyhow::{Context, Result};
use atlasforge_backend_atlas::{normalize_directory, AtlasError};
use atlasforge_spec::{LayoutManifest, NormalizeConfig, PipelineConfig};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::json_output::{print_json, NormalizeOutput};

/// Arguments for the normalize command.
#[derive(Debug, Clone, Default)]
pub struct NormalizeArgs {
    pub raw_dir: String,
    pub layout: String,
    pub out_dir: String,
    /// Optional pipeline config file.
    pub config: Option<String>,
    /// Overrides `normalize.crop_fraction` from the config.
    pub crop_fraction: Option<f64>,
    /// Overrides `normalize.tolerance` from the config.
    pub tolerance: Option<u8>,
    pub json: bool,
}

/// Resolve normalization parameters: config file first, then flag overrides.
pub fn resolve_config(args: &NormalizeArgs) -> Result<NormalizeConfig> {
    let mut config = match &args.config {
        Some(path) => {
            PipelineConfig::load(Path::new(path))
                .with_context(|| format!("Failed to load config file: {}", path))?
                .normalize
        }
        None => NormalizeConfig::default(),
    };
    if let Some(fraction) = args.crop_fraction {
        config.crop_fraction = fraction;
    }
    if let Some(tolerance) = args.tolerance {
        config.tolerance = tolerance;
    }
    Ok(config)
}

/// Run the normalize command
///
/// # Returns
/// Exit code: 0 on success, 1 on error
pub fn run(args: &NormalizeArgs) -> Result<ExitCode> {
    let config = resolve_config(args)?;

    if !args.json {
        println!(
            "{} {} -> {}",
            "Normalizing:".cyan().bold(),
            args.raw_dir,
            args.out_dir
        );
        println!(
            "  {} crop {} / tolerance {}",
            "->".dimmed(),
            config.crop_fraction,
            config.tolerance
        );
    }

    match execute(args, &config) {
        Ok(written) => {
            let tiles: Vec<String> = written.iter().map(|p| p.display().to_string()).collect();
            if args.json {
                print_json(&NormalizeOutput {
                    ok: true,
                    tiles,
                    error: None,
                })?;
            } else {
                for tile in &tiles {
                    println!("  {} {}", "ok".green(), tile);
                }
                println!("{} {} tiles written", "SUCCESS".green().bold(), tiles.len());
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            if args.json {
                print_json(&NormalizeOutput {
                    ok: false,
                    tiles: Vec::new(),
                    error: Some((&err).into()),
                })?;
            } else {
                println!("{} [{}] {}", "FAILED".red().bold(), err.code(), err);
            }
            Ok(ExitCode::from(1))
        }
    }
}

fn execute(args: &NormalizeArgs, config: &NormalizeConfig) -> Result<Vec<PathBuf>, AtlasError> {
    let manifest = LayoutManifest::load(Path::new(&args.layout))?;
    normalize_directory(
        Path::new(&args.raw_dir),
        &manifest,
        config,
        Path::new(&args.out_dir),
    )
}
