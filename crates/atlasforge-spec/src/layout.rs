//! Layout manifest types.
//!
//! A manifest declares the full-resolution sheet geometry and the ordered
//! roster of sprites. Placement in the atlas is derived from the grid:
//! `x = col * cell / scale`, `y = row * cell / scale`.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::index::{AtlasEntry, AtlasIndex};

/// Declarative atlas layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutManifest {
    /// Full-resolution sheet geometry.
    pub sheet: SheetGeometry,
    /// Sprite roster in draw order.
    pub sprites: Vec<SpriteSpec>,
}

/// Geometry of the full-resolution source sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetGeometry {
    /// Sheet width in pixels.
    pub width: u32,
    /// Sheet height in pixels.
    pub height: u32,
    /// Integer downscale factor applied when building the atlas.
    pub scale: u32,
    /// Full-resolution size of one grid cell.
    pub cell: u32,
}

/// A single sprite in the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteSpec {
    /// Stable identifier, also the tile filename stem.
    pub id: String,
    /// Grid row (full-resolution cell units).
    pub row: u32,
    /// Grid column (full-resolution cell units).
    pub col: u32,
    /// Final width in the atlas.
    pub w: u32,
    /// Final height in the atlas.
    pub h: u32,
    /// Full-bleed tile sprite (ground, backgrounds). Skips crop and background removal.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub tile: bool,
}

/// A violated geometry invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryIssue {
    /// Scale factor is zero.
    ZeroScale,
    /// Sheet width is not a multiple of the scale.
    WidthNotDivisible { width: u32, scale: u32 },
    /// Sheet height is not a multiple of the scale.
    HeightNotDivisible { height: u32, scale: u32 },
    /// Cell size is not a multiple of the scale.
    CellNotDivisible { cell: u32, scale: u32 },
}

impl fmt::Display for GeometryIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryIssue::ZeroScale => write!(f, "sheet.scale must be greater than zero"),
            GeometryIssue::WidthNotDivisible { width, scale } => {
                write!(f, "sheet.width {} is not divisible by scale {}", width, scale)
            }
            GeometryIssue::HeightNotDivisible { height, scale } => {
                write!(f, "sheet.height {} is not divisible by scale {}", height, scale)
            }
            GeometryIssue::CellNotDivisible { cell, scale } => {
                write!(f, "sheet.cell {} is not divisible by scale {}", cell, scale)
            }
        }
    }
}

impl SheetGeometry {
    /// Returns every violated divisibility invariant, in field order.
    pub fn issues(&self) -> Vec<GeometryIssue> {
        if self.scale == 0 {
            return vec![GeometryIssue::ZeroScale];
        }

        let mut issues = Vec::new();
        if self.width % self.scale != 0 {
            issues.push(GeometryIssue::WidthNotDivisible {
                width: self.width,
                scale: self.scale,
            });
        }
        if self.height % self.scale != 0 {
            issues.push(GeometryIssue::HeightNotDivisible {
                height: self.height,
                scale: self.scale,
            });
        }
        if self.cell % self.scale != 0 {
            issues.push(GeometryIssue::CellNotDivisible {
                cell: self.cell,
                scale: self.scale,
            });
        }
        issues
    }

    /// Atlas dimensions after downscaling.
    ///
    /// Only meaningful when [`SheetGeometry::issues`] is empty.
    pub fn atlas_size(&self) -> (u32, u32) {
        (self.width / self.scale, self.height / self.scale)
    }

    /// Size of one grid cell in atlas pixels.
    pub fn scaled_cell(&self) -> u32 {
        self.cell / self.scale
    }
}

impl LayoutManifest {
    /// Load a manifest from a JSON file.
    pub fn load(path: &Path) -> Result<Self, LayoutError> {
        let content = std::fs::read_to_string(path).map_err(|source| LayoutError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| LayoutError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Sprite ids in manifest order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.sprites.iter().map(|s| s.id.as_str())
    }

    /// Look up a sprite by id.
    pub fn sprite(&self, id: &str) -> Option<&SpriteSpec> {
        self.sprites.iter().find(|s| s.id == id)
    }

    /// Ids that appear more than once, each reported once in first-repeat order.
    pub fn duplicate_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut duplicates = Vec::new();
        for sprite in &self.sprites {
            if !seen.insert(sprite.id.as_str()) && reported.insert(sprite.id.as_str()) {
                duplicates.push(sprite.id.clone());
            }
        }
        duplicates
    }

    /// Atlas placement of a sprite, or `None` when `row`/`col` times the
    /// scaled cell does not fit in `u32`.
    pub fn checked_placement(&self, sprite: &SpriteSpec) -> Option<AtlasEntry> {
        let cell = self.sheet.scaled_cell();
        Some(AtlasEntry {
            x: sprite.col.checked_mul(cell)?,
            y: sprite.row.checked_mul(cell)?,
            w: sprite.w,
            h: sprite.h,
        })
    }

    /// Atlas placement of a sprite.
    ///
    /// Saturates instead of wrapping; callers reject overflowing sprites
    /// with [`LayoutManifest::checked_placement`] first.
    pub fn placement(&self, sprite: &SpriteSpec) -> AtlasEntry {
        let cell = self.sheet.scaled_cell();
        AtlasEntry {
            x: sprite.col.saturating_mul(cell),
            y: sprite.row.saturating_mul(cell),
            w: sprite.w,
            h: sprite.h,
        }
    }

    /// Build the atlas index for every sprite.
    ///
    /// Duplicate ids collapse to the last declaration.
    pub fn index(&self) -> AtlasIndex {
        self.sprites
            .iter()
            .map(|sprite| (sprite.id.clone(), self.placement(sprite)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const COIN_LAYOUT: &str = r#"
    {
      "sheet": { "width": 1024, "height": 1024, "scale": 2, "cell": 128 },
      "sprites": [
        { "id": "coin", "row": 0, "col": 0, "w": 32, "h": 32 },
        { "id": "grass", "row": 2, "col": 3, "w": 64, "h": 64, "tile": true }
      ]
    }
    "#;

    #[test]
    fn test_parse_layout() {
        let manifest = LayoutManifest::from_json(COIN_LAYOUT).unwrap();
        assert_eq!(manifest.sheet.width, 1024);
        assert_eq!(manifest.sheet.cell, 128);
        assert_eq!(manifest.sprites.len(), 2);
        assert!(!manifest.sprites[0].tile);
        assert!(manifest.sprites[1].tile);
    }

    #[test]
    fn test_placement() {
        let manifest = LayoutManifest::from_json(COIN_LAYOUT).unwrap();
        let grass = manifest.sprite("grass").unwrap();
        assert_eq!(
            manifest.placement(grass),
            AtlasEntry {
                x: 192,
                y: 128,
                w: 64,
                h: 64
            }
        );
        assert_eq!(manifest.sheet.atlas_size(), (512, 512));
    }

    #[test]
    fn test_checked_placement_overflow() {
        let json = r#"{
          "sheet": { "width": 64, "height": 64, "scale": 1, "cell": 32 },
          "sprites": [ { "id": "far", "row": 0, "col": 200000000, "w": 8, "h": 8 } ]
        }"#;
        let manifest = LayoutManifest::from_json(json).unwrap();
        let far = manifest.sprite("far").unwrap();

        assert_eq!(manifest.checked_placement(far), None);
        assert_eq!(manifest.placement(far).x, u32::MAX);
    }

    #[test]
    fn test_missing_field_rejected() {
        let json = r#"{ "sheet": { "width": 1024, "height": 1024, "cell": 128 }, "sprites": [] }"#;
        let err = LayoutManifest::from_json(json).unwrap_err();
        assert!(err.to_string().contains("scale"));
    }

    #[test]
    fn test_wrong_type_rejected() {
        let json = r#"{
          "sheet": { "width": 1024, "height": 1024, "scale": 2, "cell": 128 },
          "sprites": [ { "id": "coin", "row": "zero", "col": 0, "w": 32, "h": 32 } ]
        }"#;
        assert!(LayoutManifest::from_json(json).is_err());
    }

    #[test]
    fn test_sprite_missing_id_rejected() {
        let json = r#"{
          "sheet": { "width": 64, "height": 64, "scale": 1, "cell": 32 },
          "sprites": [ { "row": 0, "col": 0, "w": 32, "h": 32 } ]
        }"#;
        let err = LayoutManifest::from_json(json).unwrap_err();
        assert!(err.to_string().contains("id"));
    }

    #[test]
    fn test_load_accepts_non_divisible_geometry() {
        // Divisibility is the assembler's concern.
        let json = r#"{ "sheet": { "width": 1000, "height": 1024, "scale": 3, "cell": 128 }, "sprites": [] }"#;
        let manifest = LayoutManifest::from_json(json).unwrap();
        let issues = manifest.sheet.issues();
        assert_eq!(issues.len(), 3);
        assert!(matches!(issues[0], GeometryIssue::WidthNotDivisible { .. }));
    }

    #[test]
    fn test_zero_scale_issue() {
        let geometry = SheetGeometry {
            width: 64,
            height: 64,
            scale: 0,
            cell: 32,
        };
        assert_eq!(geometry.issues(), vec![GeometryIssue::ZeroScale]);
    }

    #[test]
    fn test_duplicate_ids() {
        let json = r#"{
          "sheet": { "width": 64, "height": 64, "scale": 1, "cell": 32 },
          "sprites": [
            { "id": "a", "row": 0, "col": 0, "w": 32, "h": 32 },
            { "id": "b", "row": 0, "col": 1, "w": 32, "h": 32 },
            { "id": "a", "row": 1, "col": 0, "w": 32, "h": 32 },
            { "id": "a", "row": 1, "col": 1, "w": 32, "h": 32 }
          ]
        }"#;
        let manifest = LayoutManifest::from_json(json).unwrap();
        assert_eq!(manifest.duplicate_ids(), vec!["a".to_string()]);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        std::fs::write(&path, COIN_LAYOUT).unwrap();

        let manifest = LayoutManifest::load(&path).unwrap();
        assert_eq!(manifest.ids().collect::<Vec<_>>(), vec!["coin", "grass"]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = LayoutManifest::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, LayoutError::Read { .. }));
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        std::fs::write(&path, "sheet = 3").unwrap();
        let err = LayoutManifest::load(&path).unwrap_err();
        assert!(matches!(err, LayoutError::Parse { .. }));
    }
}
