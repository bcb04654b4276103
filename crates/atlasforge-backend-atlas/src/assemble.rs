//! Atlas assembly.
//!
//! Two mutually exclusive modes, chosen by the caller through [`AssemblyMode`]:
//!
//! - **Sheet**: one pre-arranged full-resolution sheet is downscaled once
//!   with nearest-neighbor; sprite rectangles are pure metadata.
//! - **Tiles**: one already-normalized PNG per sprite is alpha-composited onto
//!   a transparent canvas in manifest order. Later sprites paint over earlier
//!   ones where rectangles overlap.
//!
//! Assembly happens entirely in memory. Nothing is written here.

use std::fmt;
use std::path::{Path, PathBuf};

use atlasforge_spec::{AtlasIndex, LayoutManifest};
use image::imageops;
use image::RgbaImage;

use crate::error::AtlasError;
use crate::normalize::resize_nearest;
use crate::png::decode_rgba;

/// Where sprite pixels come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssemblyMode {
    /// Slice a single pre-arranged sheet image.
    Sheet(PathBuf),
    /// Composite one normalized tile per sprite from a directory.
    Tiles(PathBuf),
}

impl AssemblyMode {
    /// Short mode name for reports.
    pub fn name(&self) -> &'static str {
        match self {
            AssemblyMode::Sheet(_) => "sheet",
            AssemblyMode::Tiles(_) => "tiles",
        }
    }

    /// Input path of this mode.
    pub fn source(&self) -> &Path {
        match self {
            AssemblyMode::Sheet(path) | AssemblyMode::Tiles(path) => path,
        }
    }
}

impl fmt::Display for AssemblyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.source().display())
    }
}

/// An assembled atlas held in memory.
#[derive(Debug, Clone)]
pub struct AssembledAtlas {
    /// RGBA atlas image, `(width / scale) x (height / scale)`.
    pub image: RgbaImage,
    /// Placement of every sprite.
    pub index: AtlasIndex,
}

/// Assemble an atlas in the given mode.
pub fn assemble(mode: &AssemblyMode, manifest: &LayoutManifest) -> Result<AssembledAtlas, AtlasError> {
    match mode {
        AssemblyMode::Sheet(path) => {
            let sheet = load_rgba(path)?;
            assemble_from_sheet(&sheet, manifest).map_err(|err| match err {
                AtlasError::DimensionMismatch {
                    expected_width,
                    expected_height,
                    actual_width,
                    actual_height,
                    ..
                } => AtlasError::DimensionMismatch {
                    label: format!("sheet {}", path.display()),
                    expected_width,
                    expected_height,
                    actual_width,
                    actual_height,
                },
                other => other,
            })
        }
        AssemblyMode::Tiles(dir) => assemble_from_tiles(dir, manifest),
    }
}

/// Check the manifest invariants assembly depends on.
///
/// Geometry must divide evenly by the scale, ids must be unique, and every
/// sprite must have a non-zero size and a placement that fits in `u32`.
pub fn check_manifest(manifest: &LayoutManifest) -> Result<(), AtlasError> {
    let issues = manifest.sheet.issues();
    if !issues.is_empty() {
        let joined = issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(AtlasError::InvalidGeometry(joined));
    }

    if let Some(id) = manifest.duplicate_ids().into_iter().next() {
        return Err(AtlasError::DuplicateSpriteId(id));
    }

    for sprite in &manifest.sprites {
        if sprite.w == 0 || sprite.h == 0 {
            return Err(AtlasError::InvalidSprite {
                id: sprite.id.clone(),
                w: sprite.w,
                h: sprite.h,
            });
        }
        if manifest.checked_placement(sprite).is_none() {
            return Err(AtlasError::InvalidGeometry(format!(
                "sprite '{}' at row {}, col {} is outside the addressable atlas",
                sprite.id, sprite.row, sprite.col
            )));
        }
    }

    Ok(())
}

/// Build an atlas by downscaling a full-resolution sheet.
///
/// The sheet must be exactly `sheet.width x sheet.height`; no scaling
/// tolerance is applied.
pub fn assemble_from_sheet(
    sheet: &RgbaImage,
    manifest: &LayoutManifest,
) -> Result<AssembledAtlas, AtlasError> {
    check_manifest(manifest)?;

    let geometry = &manifest.sheet;
    if sheet.dimensions() != (geometry.width, geometry.height) {
        return Err(AtlasError::DimensionMismatch {
            label: "sheet".to_string(),
            expected_width: geometry.width,
            expected_height: geometry.height,
            actual_width: sheet.width(),
            actual_height: sheet.height(),
        });
    }

    let (width, height) = geometry.atlas_size();
    let image = resize_nearest(sheet, width, height);

    Ok(AssembledAtlas {
        image,
        index: manifest.index(),
    })
}

/// Build an atlas by compositing `{tile_dir}/{id}.png` for every sprite.
///
/// Each tile must already be exactly the sprite's `w x h`. A missing tile
/// aborts the whole build.
pub fn assemble_from_tiles(
    tile_dir: &Path,
    manifest: &LayoutManifest,
) -> Result<AssembledAtlas, AtlasError> {
    check_manifest(manifest)?;

    let (width, height) = manifest.sheet.atlas_size();
    let mut canvas = RgbaImage::new(width, height);

    for sprite in &manifest.sprites {
        let path = tile_path(tile_dir, &sprite.id);
        if !path.is_file() {
            return Err(AtlasError::MissingTile {
                id: sprite.id.clone(),
                path,
            });
        }

        let tile = load_rgba(&path)?;
        if tile.dimensions() != (sprite.w, sprite.h) {
            return Err(AtlasError::SizeMismatch {
                id: sprite.id.clone(),
                path,
                expected_width: sprite.w,
                expected_height: sprite.h,
                actual_width: tile.width(),
                actual_height: tile.height(),
            });
        }

        let entry = manifest.placement(sprite);
        imageops::overlay(&mut canvas, &tile, i64::from(entry.x), i64::from(entry.y));
    }

    Ok(AssembledAtlas {
        image: canvas,
        index: manifest.index(),
    })
}

/// Path of the tile for a sprite id.
pub fn tile_path(tile_dir: &Path, id: &str) -> PathBuf {
    tile_dir.join(format!("{}.png", id))
}

/// Read and decode an image file as RGBA.
pub fn load_rgba(path: &Path) -> Result<RgbaImage, AtlasError> {
    let data = std::fs::read(path).map_err(|e| AtlasError::io(path, e))?;
    decode_rgba(&data).map_err(|source| AtlasError::Decode {
        label: path.display().to_string(),
        source,
    })
}
