//! Atlas index document.
//!
//! The index maps sprite ids to their rectangle in the packed atlas. It is
//! serialized with every key sorted and two-space indentation so repeated
//! builds produce byte-identical files.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Placement of one sprite in the atlas image.
///
/// Fields are declared in lexicographic order; serde emits them in
/// declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AtlasEntry {
    /// Height in pixels.
    pub h: u32,
    /// Width in pixels.
    pub w: u32,
    /// Left edge in atlas pixels.
    pub x: u32,
    /// Top edge in atlas pixels.
    pub y: u32,
}

/// Sprite id to placement, ordered by id.
pub type AtlasIndex = BTreeMap<String, AtlasEntry>;

/// Serialize an index in canonical form (sorted keys, 2-space indent, trailing newline).
pub fn index_to_json(index: &AtlasIndex) -> Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(index)?;
    json.push('\n');
    Ok(json)
}

/// Parse an index document.
pub fn index_from_json(json: &str) -> Result<AtlasIndex, serde_json::Error> {
    serde_json::from_str(json)
}

/// Read an index from disk, returning `None` when it is absent or unreadable.
pub fn read_index(path: &Path) -> Option<AtlasIndex> {
    let content = std::fs::read_to_string(path).ok()?;
    index_from_json(&content).ok()
}
