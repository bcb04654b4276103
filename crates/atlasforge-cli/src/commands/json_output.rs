//! JSON output types for machine-readable CLI output.
//!
//! Every command accepts `--json`; these are the objects it prints instead
//! of coloured text.

use atlasforge_backend_atlas::{AtlasError, BuildSummary, MissingPlan};
use serde::{Deserialize, Serialize};

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "A003")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl From<&AtlasError> for JsonError {
    fn from(err: &AtlasError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

/// Output of `build`, `build-sheet` and `build-tiles`.
#[derive(Debug, Clone, Serialize)]
pub struct BuildOutput {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<BuildSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonError>,
}

impl BuildOutput {
    pub fn success(summary: BuildSummary) -> Self {
        Self {
            ok: true,
            summary: Some(summary),
            error: None,
        }
    }

    pub fn failure(err: &AtlasError) -> Self {
        Self {
            ok: false,
            summary: None,
            error: Some(err.into()),
        }
    }
}

/// Output of `ready`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadyOutput {
    pub ready: bool,
    pub marker: String,
}

/// Output of `missing`.
#[derive(Debug, Clone, Serialize)]
pub struct MissingOutput {
    pub ok: bool,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub plan: Option<MissingPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonError>,
}

/// Output of `normalize`.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizeOutput {
    pub ok: bool,
    pub tiles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonError>,
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}
