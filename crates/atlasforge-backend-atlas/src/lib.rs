//! AtlasForge Atlas Backend
//!
//! This crate turns a layout manifest plus a set of raw or pre-cut images into
//! a packed sprite atlas and its coordinate index. All output is byte-identical
//! for unchanged inputs.
//!
//! # Features
//!
//! - **Tile Normalizer**: center crop, corner-sampled chroma-key background
//!   removal, nearest-neighbor resize
//! - **Atlas Assembler**: sheet mode (single downscale) and tile mode
//!   (alpha compositing in manifest order)
//! - **Readiness Gate**: production marker and missing-sprite planning
//! - **Deterministic PNG**: fixed compression settings, atomic writes
//!
//! # Example
//!
//! ```no_run
//! use atlasforge_backend_atlas::{build_atlas, AssemblyMode, BuildOptions};
//! use atlasforge_spec::LayoutManifest;
//! use std::path::Path;
//!
//! let manifest = LayoutManifest::load(Path::new("art/layout.json")).unwrap();
//! let options = BuildOptions::new("assets/sprites.png", "assets/sprites.json")
//!     .with_marker("art/ready.json");
//! let summary = build_atlas(&AssemblyMode::Tiles("art/tiles".into()), &manifest, &options).unwrap();
//! println!("{} sprites, hash {}", summary.sprite_count, summary.image_hash);
//! ```
//!
//! # Determinism
//!
//! - Nearest-neighbor sampling only, never smoothing
//! - Compositing strictly in manifest order
//! - Index keys sorted, fixed formatting
//! - PNG encoding uses fixed compression settings

pub mod assemble;
pub mod capture;
pub mod error;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod png;
pub mod readiness;

// Re-export main types for convenience
pub use assemble::{
    assemble, assemble_from_sheet, assemble_from_tiles, check_manifest, load_rgba, tile_path,
    AssembledAtlas, AssemblyMode,
};
pub use capture::{capture_missing, normalize_directory, GenerationProvider, ProviderError};
pub use error::AtlasError;
pub use normalize::{
    center_crop, check_config, detect_background, normalize, normalize_sprite, remove_background,
    resize_nearest,
};
pub use output::{encode_atlas, write_artifact, write_atlas, EncodedAtlas};
pub use pipeline::{build_atlas, BuildOptions, BuildSummary};
pub use self::png::{PngConfig, PngError};
pub use readiness::{is_ready, mark_as_production, mark_as_production_at, plan_missing, MissingPlan};
