//! Test fixture utilities for creating synthetic atlas projects.

use std::fs;
use std::path::{Path, PathBuf};

use atlasforge_backend_atlas::png::encode_rgba;
use atlasforge_backend_atlas::PngConfig;
use atlasforge_spec::LayoutManifest;
use image::{Rgba, RgbaImage};
use tempfile::TempDir;

/// Layout from the canonical single-sprite example: a 1024x1024 sheet at
/// scale 2 with 128px cells and one 32x32 `coin`.
pub const COIN_LAYOUT: &str = r#"{
  "sheet": { "width": 1024, "height": 1024, "scale": 2, "cell": 128 },
  "sprites": [ { "id": "coin", "row": 0, "col": 0, "w": 32, "h": 32 } ]
}"#;

/// A small four-sprite layout: 64x64 sheet, scale 2, 32px cells.
pub const GRID_LAYOUT: &str = r#"{
  "sheet": { "width": 64, "height": 64, "scale": 2, "cell": 32 },
  "sprites": [
    { "id": "coin", "row": 0, "col": 0, "w": 16, "h": 16 },
    { "id": "gem", "row": 0, "col": 1, "w": 16, "h": 16 },
    { "id": "grass", "row": 1, "col": 0, "w": 16, "h": 16, "tile": true },
    { "id": "key", "row": 1, "col": 1, "w": 8, "h": 8 }
  ]
}"#;

/// A temporary project laid out the way the CLI defaults expect:
/// `art/layout.json`, `art/batch.png`, `art/tiles/`, `assets/`.
pub struct AtlasProjectFixture {
    pub root: TempDir,
}

impl AtlasProjectFixture {
    /// Create an empty project with `art/` and `assets/` directories.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir_all(root.path().join("art")).expect("Failed to create art dir");
        fs::create_dir_all(root.path().join("assets")).expect("Failed to create assets dir");
        Self { root }
    }

    /// Create a project with `layout` already written.
    pub fn with_layout(layout: &str) -> Self {
        let fixture = Self::new();
        fixture.write_layout(layout);
        fixture
    }

    /// Get the project root path.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn layout_path(&self) -> PathBuf {
        self.path().join("art").join("layout.json")
    }

    pub fn sheet_path(&self) -> PathBuf {
        self.path().join("art").join("batch.png")
    }

    pub fn tiles_dir(&self) -> PathBuf {
        self.path().join("art").join("tiles")
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.path().join("art").join("raw")
    }

    pub fn marker_path(&self) -> PathBuf {
        self.path().join("art").join("ready.json")
    }

    pub fn image_path(&self) -> PathBuf {
        self.path().join("assets").join("sprites.png")
    }

    pub fn index_path(&self) -> PathBuf {
        self.path().join("assets").join("sprites.json")
    }

    /// Write the layout manifest.
    pub fn write_layout(&self, content: &str) -> PathBuf {
        let path = self.layout_path();
        fs::write(&path, content).expect("Failed to write layout");
        path
    }

    /// Parse the layout currently on disk.
    pub fn manifest(&self) -> LayoutManifest {
        LayoutManifest::load(&self.layout_path()).expect("Failed to load layout")
    }

    /// Write a sheet whose pixels encode their own coordinates, so every
    /// downscaled pixel is traceable to the sheet pixel it sampled.
    pub fn write_gradient_sheet(&self, width: u32, height: u32) -> PathBuf {
        let sheet = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, ((x / 256) * 16 + y / 256) as u8, 255])
        });
        let path = self.sheet_path();
        write_png(&path, &sheet);
        path
    }

    /// Write an opaque solid-color tile for `id`.
    pub fn write_tile(&self, id: &str, width: u32, height: u32, color: [u8; 4]) -> PathBuf {
        let path = self.tiles_dir().join(format!("{}.png", id));
        write_png(&path, &RgbaImage::from_pixel(width, height, Rgba(color)));
        path
    }

    /// Write a tile for every sprite in the layout at its declared size.
    pub fn write_all_tiles(&self) {
        for (i, sprite) in self.manifest().sprites.iter().enumerate() {
            let shade = 40 + (i as u8) * 40;
            self.write_tile(&sprite.id, sprite.w, sprite.h, [shade, 255 - shade, 128, 255]);
        }
    }

    /// Write a raw capture for `id`: a `size`-square `background` field with a
    /// centered `subject` square of `subject_size`.
    pub fn write_raw(
        &self,
        id: &str,
        size: u32,
        subject_size: u32,
        background: [u8; 3],
        subject: [u8; 3],
    ) -> PathBuf {
        let [br, bg, bb] = background;
        let mut raw = RgbaImage::from_pixel(size, size, Rgba([br, bg, bb, 255]));
        let start = (size - subject_size) / 2;
        let [sr, sg, sb] = subject;
        for y in start..start + subject_size {
            for x in start..start + subject_size {
                raw.put_pixel(x, y, Rgba([sr, sg, sb, 255]));
            }
        }
        let path = self.raw_dir().join(format!("{}.png", id));
        write_png(&path, &raw);
        path
    }

    /// Read a file under the project as bytes.
    pub fn read(&self, path: &Path) -> Vec<u8> {
        fs::read(path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
    }
}

impl Default for AtlasProjectFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode `image` with the default deterministic settings and write it.
pub fn write_png(path: &Path, image: &RgbaImage) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dir");
    }
    let data = encode_rgba(image, &PngConfig::default()).expect("Failed to encode PNG");
    fs::write(path, data).expect("Failed to write PNG");
}

/// Decode a PNG file to RGBA.
pub fn read_png(path: &Path) -> RgbaImage {
    image::open(path)
        .unwrap_or_else(|e| panic!("Failed to open {}: {}", path.display(), e))
        .to_rgba8()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_layout_round_trip() {
        let fixture = AtlasProjectFixture::with_layout(GRID_LAYOUT);
        let manifest = fixture.manifest();
        assert_eq!(manifest.sprites.len(), 4);
        assert!(manifest.sheet.issues().is_empty());
    }

    #[test]
    fn test_write_all_tiles_uses_declared_sizes() {
        let fixture = AtlasProjectFixture::with_layout(GRID_LAYOUT);
        fixture.write_all_tiles();

        let key = read_png(&fixture.tiles_dir().join("key.png"));
        assert_eq!(key.dimensions(), (8, 8));
    }

    #[test]
    fn test_raw_capture_has_centered_subject() {
        let fixture = AtlasProjectFixture::new();
        let path = fixture.write_raw("coin", 64, 16, [255, 255, 255], [200, 0, 0]);

        let raw = read_png(&path);
        assert_eq!(*raw.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
        assert_eq!(*raw.get_pixel(32, 32), Rgba([200, 0, 0, 255]));
    }
}
