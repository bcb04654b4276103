//! Error types for manifest loading and stable error codes.

use std::path::PathBuf;
use thiserror::Error;

/// Stable error codes reported by the atlas pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Input errors (A001-A008)
    /// A001: Layout manifest could not be read or parsed
    Manifest,
    /// A002: Source sheet does not match the declared sheet size
    DimensionMismatch,
    /// A003: Tile file absent in tile mode
    MissingTile,
    /// A004: Tile file present but with the wrong pixel size
    SizeMismatch,
    /// A005: Sheet geometry is not divisible by the scale factor
    InvalidGeometry,
    /// A006: Sprite id appears more than once
    DuplicateSpriteId,
    /// A007: Sprite declares a zero width or height
    InvalidSprite,
    /// A008: Normalization config out of range
    InvalidConfig,

    // Runtime errors (A010-A013)
    /// A010: Filesystem error
    Io,
    /// A011: Image could not be decoded
    Decode,
    /// A012: PNG encoding failed
    PngEncode,
    /// A013: JSON serialization failed
    Json,

    // Collaborator errors (A020)
    /// A020: Generation provider failed
    Provider,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "A001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::Manifest => "A001",
            ErrorCode::DimensionMismatch => "A002",
            ErrorCode::MissingTile => "A003",
            ErrorCode::SizeMismatch => "A004",
            ErrorCode::InvalidGeometry => "A005",
            ErrorCode::DuplicateSpriteId => "A006",
            ErrorCode::InvalidSprite => "A007",
            ErrorCode::InvalidConfig => "A008",
            ErrorCode::Io => "A010",
            ErrorCode::Decode => "A011",
            ErrorCode::PngEncode => "A012",
            ErrorCode::Json => "A013",
            ErrorCode::Provider => "A020",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised while loading a layout manifest.
///
/// Only presence and type are checked here. Geometry divisibility and id
/// uniqueness are checked by the assembler.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The manifest file could not be read.
    #[error("failed to read layout manifest {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest is not valid JSON or a required field is absent or mistyped.
    #[error("invalid layout manifest {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl LayoutError {
    /// Returns the stable error code for this error.
    pub fn code(&self) -> ErrorCode {
        ErrorCode::Manifest
    }
}
