//! Readiness gate.
//!
//! The marker records whether the last atlas build was promoted to
//! production. The generation driver consults it to decide what "missing"
//! means: when ready, only sprites absent from the current index are
//! regenerated; otherwise every sprite is.

use std::path::Path;

use atlasforge_spec::{production_flag, read_index, LayoutManifest, ReadinessMarker};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::error::AtlasError;
use crate::output::write_artifact;

/// Whether the marker at `marker_path` says the atlas is production quality.
///
/// Absent, unreadable, or non-JSON markers, and markers whose `production`
/// field is missing or falsy, all count as not ready.
pub fn is_ready(marker_path: &Path) -> bool {
    match std::fs::read_to_string(marker_path) {
        Ok(content) => production_flag(&content),
        Err(_) => false,
    }
}

/// Overwrite the marker with `production = true` and the current UTC time.
pub fn mark_as_production(marker_path: &Path, source: &str) -> Result<ReadinessMarker, AtlasError> {
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    mark_as_production_at(marker_path, source, &now)
}

/// Overwrite the marker with an explicit timestamp.
pub fn mark_as_production_at(
    marker_path: &Path,
    source: &str,
    generated_at: &str,
) -> Result<ReadinessMarker, AtlasError> {
    let marker = ReadinessMarker::production(generated_at, source);
    write_artifact(marker_path, marker.to_json()?.as_bytes())?;
    Ok(marker)
}

/// Sprites that need (re)generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingPlan {
    /// True when the marker was not ready and every sprite is listed.
    pub force_full: bool,
    /// Sprite ids in manifest order.
    pub ids: Vec<String>,
}

/// Decide which sprites are missing.
///
/// Not ready: every manifest id. Ready: ids absent from the index at
/// `index_path`, or every id when the index cannot be read.
pub fn plan_missing(manifest: &LayoutManifest, index_path: &Path, marker_path: &Path) -> MissingPlan {
    let all_ids = || manifest.ids().map(str::to_string).collect::<Vec<_>>();

    if !is_ready(marker_path) {
        return MissingPlan {
            force_full: true,
            ids: all_ids(),
        };
    }

    match read_index(index_path) {
        Some(index) => MissingPlan {
            force_full: false,
            ids: manifest
                .ids()
                .filter(|id| !index.contains_key(*id))
                .map(str::to_string)
                .collect(),
        },
        None => MissingPlan {
            force_full: false,
            ids: all_ids(),
        },
    }
}
