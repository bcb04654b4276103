//! AtlasForge Layout Library
//!
//! This crate provides the document types shared by the AtlasForge atlas
//! pipeline. Every document is JSON.
//!
//! - **Layout manifest**: sheet geometry plus the ordered sprite roster
//! - **Atlas index**: sprite id to placement rectangle, emitted by a build
//! - **Readiness marker**: records whether the last atlas is production quality
//! - **Pipeline config**: normalization parameters and generation prompts
//!
//! # Example
//!
//! ```
//! use atlasforge_spec::LayoutManifest;
//!
//! let manifest = LayoutManifest::from_json(r#"{
//!   "sheet": { "width": 1024, "height": 1024, "scale": 2, "cell": 128 },
//!   "sprites": [ { "id": "coin", "row": 0, "col": 1, "w": 32, "h": 32 } ]
//! }"#).unwrap();
//!
//! assert_eq!(manifest.sheet.atlas_size(), (512, 512));
//! assert_eq!(manifest.placement(&manifest.sprites[0]).x, 64);
//! ```
//!
//! # Modules
//!
//! - [`error`]: Error codes and manifest load errors
//! - [`layout`]: Layout manifest types and loading
//! - [`index`]: Atlas index types and canonical serialization
//! - [`marker`]: Readiness marker document
//! - [`config`]: Normalization and prompt configuration

pub mod config;
pub mod error;
pub mod index;
pub mod layout;
pub mod marker;

// Re-export commonly used types at the crate root
pub use config::{
    ConfigError, NormalizeConfig, PipelineConfig, PromptBook, DEFAULT_CROP_FRACTION,
    DEFAULT_TOLERANCE,
};
pub use error::{ErrorCode, LayoutError};
pub use index::{index_from_json, index_to_json, read_index, AtlasEntry, AtlasIndex};
pub use layout::{GeometryIssue, LayoutManifest, SheetGeometry, SpriteSpec};
pub use marker::{production_flag, ReadinessMarker};
