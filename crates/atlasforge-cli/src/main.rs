//! AtlasForge CLI - Command-line interface for sprite atlas builds
//!
//! This binary assembles packed sprite atlases from a pre-arranged sheet or a
//! directory of normalized tiles, and manages the readiness marker that gates
//! regeneration.

use clap::{Args, Parser, Subcommand};
use std::process::ExitCode;

use atlasforge_cli::commands;
use atlasforge_cli::commands::build::BuildArgs;
use atlasforge_cli::commands::normalize::NormalizeArgs;

/// AtlasForge - Sprite Atlas Assembly
#[derive(Parser)]
#[command(name = "atlasforge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Output locations shared by the build commands.
#[derive(Args, Debug)]
struct OutputArgs {
    /// Path to the layout manifest
    #[arg(short, long, default_value = "art/layout.json")]
    layout: String,

    /// Atlas image destination
    #[arg(long, default_value = "assets/sprites.png")]
    out_image: String,

    /// Atlas index destination
    #[arg(long, default_value = "assets/sprites.json")]
    out_json: String,

    /// Readiness marker path
    #[arg(long, default_value = "art/ready.json")]
    marker: String,

    /// Mark the build as production quality after writing
    #[arg(long)]
    mark_production: bool,

    /// Output machine-readable JSON (no colored output)
    #[arg(long)]
    json: bool,
}

impl OutputArgs {
    fn into_build_args(self) -> BuildArgs {
        BuildArgs {
            layout: self.layout,
            out_image: self.out_image,
            out_json: self.out_json,
            marker: self.marker,
            mark_production: self.mark_production,
            json: self.json,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build the atlas by downscaling a pre-arranged sheet
    BuildSheet {
        /// Path to the full-resolution sheet
        #[arg(short, long, default_value = "art/batch.png")]
        input: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Build the atlas by compositing one tile per sprite
    BuildTiles {
        /// Directory holding `{id}.png` tiles
        #[arg(short, long, default_value = "art/tiles")]
        tiles_dir: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Build from the tile directory when it exists, otherwise from the sheet
    Build {
        /// Path to the full-resolution sheet
        #[arg(short, long, default_value = "art/batch.png")]
        input: String,

        /// Directory holding `{id}.png` tiles
        #[arg(short, long, default_value = "art/tiles")]
        tiles_dir: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Check whether the atlas is marked production (exit 1 when not)
    Ready {
        /// Readiness marker path
        #[arg(long, default_value = "art/ready.json")]
        marker: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// List sprite ids that need generation
    Missing {
        /// Path to the layout manifest
        #[arg(short, long, default_value = "art/layout.json")]
        layout: String,

        /// Existing atlas index
        #[arg(long, default_value = "assets/sprites.json")]
        index: String,

        /// Readiness marker path
        #[arg(long, default_value = "art/ready.json")]
        marker: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Normalize raw captures into tiles
    Normalize {
        /// Directory holding raw `{id}.png` captures
        #[arg(long)]
        raw_dir: String,

        /// Path to the layout manifest
        #[arg(short, long, default_value = "art/layout.json")]
        layout: String,

        /// Tile output directory
        #[arg(short, long, default_value = "art/tiles")]
        out_dir: String,

        /// Pipeline config file (JSON)
        #[arg(short, long)]
        config: Option<String>,

        /// Fraction of the shorter side kept by the center crop
        #[arg(long)]
        crop_fraction: Option<f64>,

        /// Per-channel background tolerance
        #[arg(long)]
        tolerance: Option<u8>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::BuildSheet { input, output } => {
            commands::build::run_sheet(&input, &output.into_build_args())
        }
        Commands::BuildTiles { tiles_dir, output } => {
            commands::build::run_tiles(&tiles_dir, &output.into_build_args())
        }
        Commands::Build {
            input,
            tiles_dir,
            output,
        } => commands::build::run_auto(&input, &tiles_dir, &output.into_build_args()),
        Commands::Ready { marker, json } => commands::ready::run(&marker, json),
        Commands::Missing {
            layout,
            index,
            marker,
            json,
        } => commands::missing::run(&layout, &index, &marker, json),
        Commands::Normalize {
            raw_dir,
            layout,
            out_dir,
            config,
            crop_fraction,
            tolerance,
            json,
        } => commands::normalize::run(&NormalizeArgs {
            raw_dir,
            layout,
            out_dir,
            config,
            crop_fraction,
            tolerance,
            json,
        }),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
