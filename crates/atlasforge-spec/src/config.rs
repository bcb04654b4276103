//! Pipeline configuration.
//!
//! Loaded from an optional JSON file; every field has a default so an empty
//! object is a valid config.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default fraction of the shorter raw-image side kept by the center crop.
pub const DEFAULT_CROP_FRACTION: f64 = 0.5;

/// Default per-channel tolerance for background removal.
pub const DEFAULT_TOLERANCE: u8 = 30;

/// Top-level pipeline configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Raw tile normalization parameters.
    pub normalize: NormalizeConfig,
    /// Prompts handed to the generation provider.
    pub prompts: PromptBook,
}

impl PipelineConfig {
    /// Load a config from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Errors loading a pipeline config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// Parameters for raw tile normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Fraction of `min(width, height)` kept by the center crop, in (0, 1].
    pub crop_fraction: f64,
    /// Maximum per-channel difference from the background color that is cleared.
    pub tolerance: u8,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            crop_fraction: DEFAULT_CROP_FRACTION,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl NormalizeConfig {
    /// Returns a description of the first out-of-range field, if any.
    pub fn check(&self) -> Option<String> {
        if !(self.crop_fraction > 0.0 && self.crop_fraction <= 1.0) {
            return Some(format!(
                "crop_fraction must be in (0, 1], got {}",
                self.crop_fraction
            ));
        }
        None
    }
}

/// Prompt text per sprite for the generation provider.
///
/// Templating is the provider's concern; the book only selects the text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptBook {
    /// Prompt used for sprites without an override.
    pub default: String,
    /// Per-sprite replacements keyed by sprite id.
    pub overrides: BTreeMap<String, String>,
}

impl PromptBook {
    /// Create a book with only a default prompt.
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
            overrides: BTreeMap::new(),
        }
    }

    /// Add an override for one sprite.
    pub fn with_override(mut self, id: impl Into<String>, prompt: impl Into<String>) -> Self {
        self.overrides.insert(id.into(), prompt.into());
        self
    }

    /// Prompt for a sprite id.
    pub fn prompt_for(&self, id: &str) -> &str {
        self.overrides
            .get(id)
            .map(String::as_str)
            .unwrap_or(&self.default)
    }
}
