//! Raw tile capture.
//!
//! Turns raw images, either fetched from a [`GenerationProvider`] or read
//! from a directory of raw captures, into normalized tiles ready for tile
//! mode assembly. Tiles are processed one at a time in manifest order.

use std::path::{Path, PathBuf};

use atlasforge_spec::{LayoutManifest, NormalizeConfig, PromptBook, SpriteSpec};
use thiserror::Error;

use crate::assemble::{load_rgba, tile_path};
use crate::error::AtlasError;
use crate::normalize::{check_config, normalize_sprite};
use crate::png::{decode_rgba, encode_rgba, PngConfig};
use crate::output::write_artifact;

/// Errors reported by a generation provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider cannot be used (missing credentials, offline).
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// The provider accepted the request but produced no image.
    #[error("generation failed: {0}")]
    Failed(String),
}

/// Source of raw image bytes for a sprite.
///
/// Implementations own transport, authentication and polling. The returned
/// bytes only need to decode as an image.
pub trait GenerationProvider {
    /// Produce raw image bytes for `prompt` at roughly `width x height`.
    fn generate(&self, prompt: &str, width: u32, height: u32) -> Result<Vec<u8>, ProviderError>;
}

/// Generate, normalize and write a tile for every id in `ids`.
///
/// Parameters are checked before the provider is called. Ids not present in
/// the manifest are skipped. Returns the written tile paths in manifest order.
pub fn capture_missing<P: GenerationProvider + ?Sized>(
    provider: &P,
    manifest: &LayoutManifest,
    ids: &[String],
    prompts: &PromptBook,
    config: &NormalizeConfig,
    tile_dir: &Path,
) -> Result<Vec<PathBuf>, AtlasError> {
    check_config(config)?;
    let mut written = Vec::new();

    for sprite in manifest.sprites.iter().filter(|s| ids.contains(&s.id)) {
        let prompt = prompts.prompt_for(&sprite.id);
        let bytes = provider
            .generate(prompt, sprite.w, sprite.h)
            .map_err(|source| AtlasError::Provider {
                id: sprite.id.clone(),
                source,
            })?;
        let raw = decode_rgba(&bytes).map_err(|source| AtlasError::Decode {
            label: format!("generated image for '{}'", sprite.id),
            source,
        })?;
        written.push(write_normalized(&raw, sprite, config, tile_dir)?);
    }

    Ok(written)
}

/// Normalize `{raw_dir}/{id}.png` into `{tile_dir}/{id}.png` for every sprite.
///
/// Parameters are checked before any file is touched. A missing raw capture
/// aborts with [`AtlasError::MissingTile`] before any later sprite is
/// processed.
pub fn normalize_directory(
    raw_dir: &Path,
    manifest: &LayoutManifest,
    config: &NormalizeConfig,
    tile_dir: &Path,
) -> Result<Vec<PathBuf>, AtlasError> {
    check_config(config)?;
    let mut written = Vec::new();

    for sprite in &manifest.sprites {
        let raw_path = tile_path(raw_dir, &sprite.id);
        if !raw_path.is_file() {
            return Err(AtlasError::MissingTile {
                id: sprite.id.clone(),
                path: raw_path,
            });
        }
        let raw = load_rgba(&raw_path)?;
        written.push(write_normalized(&raw, sprite, config, tile_dir)?);
    }

    Ok(written)
}

fn write_normalized(
    raw: &image::RgbaImage,
    sprite: &SpriteSpec,
    config: &NormalizeConfig,
    tile_dir: &Path,
) -> Result<PathBuf, AtlasError> {
    let tile = normalize_sprite(raw, sprite, config)?;
    let data = encode_rgba(&tile, &PngConfig::default())?;
    let path = tile_path(tile_dir, &sprite.id);
    write_artifact(&path, &data)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::cell::RefCell;

    /// Returns a 64x64 raw image per call and records the prompts it saw.
    struct FakeProvider {
        prompts: RefCell<Vec<String>>,
    }

    impl FakeProvider {
        fn new() -> Self {
            Self {
                prompts: RefCell::new(Vec::new()),
            }
        }
    }

    impl GenerationProvider for FakeProvider {
        fn generate(&self, prompt: &str, _width: u32, _height: u32) -> Result<Vec<u8>, ProviderError> {
            self.prompts.borrow_mut().push(prompt.to_string());
            let mut raw = RgbaImage::from_pixel(64, 64, Rgba([255, 255, 255, 255]));
            for y in 28..36 {
                for x in 28..36 {
                    raw.put_pixel(x, y, Rgba([200, 0, 0, 255]));
                }
            }
            Ok(encode_rgba(&raw, &PngConfig::fast()).expect("encode fake image"))
        }
    }

    struct OfflineProvider;

    impl GenerationProvider for OfflineProvider {
        fn generate(&self, _prompt: &str, _width: u32, _height: u32) -> Result<Vec<u8>, ProviderError> {
            Err(ProviderError::Unavailable("no credentials".to_string()))
        }
    }

    fn layout() -> LayoutManifest {
        LayoutManifest::from_json(
            r#"{
              "sheet": { "width": 64, "height": 64, "scale": 2, "cell": 32 },
              "sprites": [
                { "id": "coin", "row": 0, "col": 0, "w": 16, "h": 16 },
                { "id": "grass", "row": 0, "col": 1, "w": 16, "h": 16, "tile": true }
              ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_capture_uses_prompt_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FakeProvider::new();
        let prompts = PromptBook::new("pixel sprite").with_override("grass", "grass tile");
        let ids = vec!["grass".to_string(), "coin".to_string()];

        let written = capture_missing(
            &provider,
            &layout(),
            &ids,
            &prompts,
            &NormalizeConfig::default(),
            dir.path(),
        )
        .unwrap();

        // Manifest order, not request order.
        assert_eq!(written, vec![dir.path().join("coin.png"), dir.path().join("grass.png")]);
        assert_eq!(
            *provider.prompts.borrow(),
            vec!["pixel sprite".to_string(), "grass tile".to_string()]
        );
    }

    #[test]
    fn test_captured_tiles_are_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let ids = vec!["coin".to_string(), "grass".to_string()];

        capture_missing(
            &FakeProvider::new(),
            &layout(),
            &ids,
            &PromptBook::default(),
            &NormalizeConfig::default(),
            dir.path(),
        )
        .unwrap();

        let coin = load_rgba(&dir.path().join("coin.png")).unwrap();
        assert_eq!(coin.dimensions(), (16, 16));
        assert_eq!(coin.get_pixel(0, 0)[3], 0);
        assert_eq!(*coin.get_pixel(8, 8), Rgba([200, 0, 0, 255]));

        // Tile sprites keep their background.
        let grass = load_rgba(&dir.path().join("grass.png")).unwrap();
        assert_eq!(*grass.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_capture_skips_unknown_ids() {
        let dir = tempfile::tempdir().unwrap();
        let ids = vec!["dragon".to_string()];

        let written = capture_missing(
            &FakeProvider::new(),
            &layout(),
            &ids,
            &PromptBook::default(),
            &NormalizeConfig::default(),
            dir.path(),
        )
        .unwrap();

        assert!(written.is_empty());
    }

    #[test]
    fn test_provider_failure_names_sprite() {
        let dir = tempfile::tempdir().unwrap();
        let ids = vec!["coin".to_string()];

        let err = capture_missing(
            &OfflineProvider,
            &layout(),
            &ids,
            &PromptBook::default(),
            &NormalizeConfig::default(),
            dir.path(),
        )
        .unwrap_err();

        assert!(matches!(err, AtlasError::Provider { ref id, .. } if id == "coin"));
        assert!(!dir.path().join("coin.png").exists());
    }

    #[test]
    fn test_normalize_directory() {
        let raw_dir = tempfile::tempdir().unwrap();
        let tile_dir = tempfile::tempdir().unwrap();
        let raw = RgbaImage::from_pixel(40, 40, Rgba([0, 0, 0, 255]));
        for id in ["coin", "grass"] {
            std::fs::write(
                raw_dir.path().join(format!("{id}.png")),
                encode_rgba(&raw, &PngConfig::default()).unwrap(),
            )
            .unwrap();
        }

        let written =
            normalize_directory(raw_dir.path(), &layout(), &NormalizeConfig::default(), tile_dir.path())
                .unwrap();

        assert_eq!(written.len(), 2);
        let coin = load_rgba(&tile_dir.path().join("coin.png")).unwrap();
        assert_eq!(coin.dimensions(), (16, 16));
        assert!(coin.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_bad_config_rejected_before_any_sprite() {
        let raw_dir = tempfile::tempdir().unwrap();
        let tile_dir = tempfile::tempdir().unwrap();
        let config = NormalizeConfig {
            crop_fraction: 1.5,
            ..NormalizeConfig::default()
        };

        let err = normalize_directory(raw_dir.path(), &layout(), &config, tile_dir.path()).unwrap_err();
        assert!(matches!(err, AtlasError::InvalidConfig(_)));

        let empty = LayoutManifest::from_json(
            r#"{ "sheet": { "width": 64, "height": 64, "scale": 2, "cell": 32 }, "sprites": [] }"#,
        )
        .unwrap();
        let err = normalize_directory(raw_dir.path(), &empty, &config, tile_dir.path()).unwrap_err();
        assert!(matches!(err, AtlasError::InvalidConfig(_)));

        let provider = FakeProvider::new();
        let err = capture_missing(
            &provider,
            &layout(),
            &["coin".to_string()],
            &PromptBook::default(),
            &config,
            tile_dir.path(),
        )
        .unwrap_err();
        assert!(matches!(err, AtlasError::InvalidConfig(_)));
        assert!(provider.prompts.borrow().is_empty());
    }

    #[test]
    fn test_normalize_directory_missing_raw() {
        let raw_dir = tempfile::tempdir().unwrap();
        let tile_dir = tempfile::tempdir().unwrap();

        let err =
            normalize_directory(raw_dir.path(), &layout(), &NormalizeConfig::default(), tile_dir.path())
                .unwrap_err();

        assert!(matches!(err, AtlasError::MissingTile { ref id, .. } if id == "coin"));
    }
}
