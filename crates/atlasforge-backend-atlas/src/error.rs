//! Error types for the atlas backend.

use std::path::PathBuf;

use atlasforge_spec::{ErrorCode, LayoutError};
use thiserror::Error;

use crate::capture::ProviderError;
use crate::png::PngError;

/// Errors from normalization, assembly, and artifact output.
///
/// None of these are retried; each names the sprite, path, or sizes needed
/// to diagnose the input.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// Layout manifest could not be loaded.
    #[error(transparent)]
    Manifest(#[from] LayoutError),

    /// Source sheet does not match the declared sheet size.
    #[error(
        "{label} is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}"
    )]
    DimensionMismatch {
        label: String,
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    /// Tile file absent in tile mode.
    #[error("missing tile for sprite '{id}': {}", .path.display())]
    MissingTile { id: String, path: PathBuf },

    /// Tile file present but not exactly the manifest size.
    #[error(
        "tile for sprite '{id}' ({}) is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}",
        .path.display()
    )]
    SizeMismatch {
        id: String,
        path: PathBuf,
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    /// Sheet geometry violates a divisibility invariant.
    #[error("invalid sheet geometry: {0}")]
    InvalidGeometry(String),

    /// Sprite id declared more than once.
    #[error("duplicate sprite id: '{0}'")]
    DuplicateSpriteId(String),

    /// Sprite declares a zero width or height.
    #[error("sprite '{id}' has invalid size {w}x{h}")]
    InvalidSprite { id: String, w: u32, h: u32 },

    /// Normalization parameters out of range.
    #[error("invalid normalize config: {0}")]
    InvalidConfig(String),

    /// Filesystem error.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Image bytes could not be decoded.
    #[error("failed to decode {label}: {source}")]
    Decode {
        label: String,
        #[source]
        source: image::ImageError,
    },

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    Png(#[from] PngError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generation provider failed for a sprite.
    #[error("generation failed for sprite '{id}': {source}")]
    Provider {
        id: String,
        #[source]
        source: ProviderError,
    },
}

impl AtlasError {
    /// Returns the stable error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            AtlasError::Manifest(_) => ErrorCode::Manifest,
            AtlasError::DimensionMismatch { .. } => ErrorCode::DimensionMismatch,
            AtlasError::MissingTile { .. } => ErrorCode::MissingTile,
            AtlasError::SizeMismatch { .. } => ErrorCode::SizeMismatch,
            AtlasError::InvalidGeometry(_) => ErrorCode::InvalidGeometry,
            AtlasError::DuplicateSpriteId(_) => ErrorCode::DuplicateSpriteId,
            AtlasError::InvalidSprite { .. } => ErrorCode::InvalidSprite,
            AtlasError::InvalidConfig(_) => ErrorCode::InvalidConfig,
            AtlasError::Io { .. } => ErrorCode::Io,
            AtlasError::Decode { .. } => ErrorCode::Decode,
            AtlasError::Png(_) => ErrorCode::PngEncode,
            AtlasError::Json(_) => ErrorCode::Json,
            AtlasError::Provider { .. } => ErrorCode::Provider,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AtlasError::Io {
            path: path.into(),
            source,
        }
    }
}
