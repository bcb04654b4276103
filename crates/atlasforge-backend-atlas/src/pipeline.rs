//! End-to-end atlas build: assemble, encode, write, optionally mark.

use std::path::{Path, PathBuf};

use atlasforge_spec::LayoutManifest;
use serde::Serialize;

use crate::assemble::{assemble, AssemblyMode};
use crate::error::AtlasError;
use crate::output::{encode_atlas, write_atlas};
use crate::png::PngConfig;
use crate::readiness::mark_as_production;

/// Output locations for a build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Atlas PNG destination.
    pub out_image: PathBuf,
    /// Atlas index JSON destination.
    pub out_index: PathBuf,
    /// When set, the readiness marker written after a successful build.
    pub mark_production: Option<PathBuf>,
    /// PNG encoder settings.
    pub png: PngConfig,
}

impl BuildOptions {
    /// Options writing the image and index, without marking.
    pub fn new(out_image: impl Into<PathBuf>, out_index: impl Into<PathBuf>) -> Self {
        Self {
            out_image: out_image.into(),
            out_index: out_index.into(),
            mark_production: None,
            png: PngConfig::default(),
        }
    }

    /// Also mark the build as production at `marker_path`.
    pub fn with_marker(mut self, marker_path: impl Into<PathBuf>) -> Self {
        self.mark_production = Some(marker_path.into());
        self
    }
}

/// What a successful build produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildSummary {
    /// `sheet` or `tiles`.
    pub mode: String,
    /// Sheet path or tile directory.
    pub source: String,
    pub atlas_width: u32,
    pub atlas_height: u32,
    pub sprite_count: usize,
    pub image_path: String,
    pub index_path: String,
    /// BLAKE3 hash of the written PNG.
    pub image_hash: String,
    /// Marker path, when the build was marked as production.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker_path: Option<String>,
}

/// Build and write an atlas.
///
/// Assembly and encoding errors abort before anything is written. The image
/// and index are staged together and then renamed image first (see
/// [`write_atlas`]); the marker is written only after both are in place.
pub fn build_atlas(
    mode: &AssemblyMode,
    manifest: &LayoutManifest,
    options: &BuildOptions,
) -> Result<BuildSummary, AtlasError> {
    let atlas = assemble(mode, manifest)?;
    let encoded = encode_atlas(&atlas, &options.png)?;

    write_atlas(&encoded, &options.out_image, &options.out_index)?;

    let source = display(mode.source());
    let marker_path = match &options.mark_production {
        Some(path) => {
            mark_as_production(path, &source)?;
            Some(display(path))
        }
        None => None,
    };

    Ok(BuildSummary {
        mode: mode.name().to_string(),
        source,
        atlas_width: atlas.image.width(),
        atlas_height: atlas.image.height(),
        sprite_count: atlas.index.len(),
        image_path: display(&options.out_image),
        index_path: display(&options.out_index),
        image_hash: encoded.hash,
        marker_path,
    })
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::tile_path;
    use crate::png::encode_rgba;
    use crate::readiness::is_ready;
    use image::{Rgba, RgbaImage};

    fn layout() -> LayoutManifest {
        LayoutManifest::from_json(
            r#"{
              "sheet": { "width": 32, "height": 32, "scale": 2, "cell": 16 },
              "sprites": [
                { "id": "coin", "row": 0, "col": 0, "w": 8, "h": 8 },
                { "id": "gem", "row": 1, "col": 1, "w": 8, "h": 8 }
              ]
            }"#,
        )
        .unwrap()
    }

    fn write_tiles(dir: &Path, ids: &[&str]) {
        for id in ids {
            let tile = RgbaImage::from_pixel(8, 8, Rgba([100, 50, 25, 255]));
            std::fs::write(tile_path(dir, id), encode_rgba(&tile, &PngConfig::default()).unwrap())
                .unwrap();
        }
    }

    #[test]
    fn test_build_writes_and_marks() {
        let tiles = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_tiles(tiles.path(), &["coin", "gem"]);
        let options = BuildOptions::new(out.path().join("sprites.png"), out.path().join("sprites.json"))
            .with_marker(out.path().join("ready.json"));

        let summary =
            build_atlas(&AssemblyMode::Tiles(tiles.path().to_path_buf()), &layout(), &options).unwrap();

        assert_eq!(summary.mode, "tiles");
        assert_eq!((summary.atlas_width, summary.atlas_height), (16, 16));
        assert_eq!(summary.sprite_count, 2);
        assert!(out.path().join("sprites.png").is_file());
        assert!(out.path().join("sprites.json").is_file());
        assert!(is_ready(&out.path().join("ready.json")));
    }

    #[test]
    fn test_failed_build_writes_nothing() {
        let tiles = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_tiles(tiles.path(), &["coin"]);
        let options = BuildOptions::new(out.path().join("sprites.png"), out.path().join("sprites.json"))
            .with_marker(out.path().join("ready.json"));

        let err = build_atlas(&AssemblyMode::Tiles(tiles.path().to_path_buf()), &layout(), &options)
            .unwrap_err();

        assert!(matches!(err, AtlasError::MissingTile { .. }));
        assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_failed_build_keeps_previous_artifacts() {
        let tiles = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_tiles(tiles.path(), &["coin", "gem"]);
        let options = BuildOptions::new(out.path().join("sprites.png"), out.path().join("sprites.json"));
        let mode = AssemblyMode::Tiles(tiles.path().to_path_buf());
        build_atlas(&mode, &layout(), &options).unwrap();
        let image_before = std::fs::read(&options.out_image).unwrap();
        let index_before = std::fs::read(&options.out_index).unwrap();

        std::fs::remove_file(tile_path(tiles.path(), "gem")).unwrap();
        assert!(build_atlas(&mode, &layout(), &options).is_err());

        assert_eq!(std::fs::read(&options.out_image).unwrap(), image_before);
        assert_eq!(std::fs::read(&options.out_index).unwrap(), index_before);
    }
}
