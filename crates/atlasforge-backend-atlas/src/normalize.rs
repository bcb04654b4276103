//! Raw tile normalization.
//!
//! Raw generated tiles usually center the subject on a larger, noisy canvas.
//! Normalization turns one into a clean sprite of the manifest size:
//!
//! 1. center crop to `floor(min(width, height) * crop_fraction)` (regular sprites only)
//! 2. corner-sampled chroma-key background removal (regular sprites only)
//! 3. nearest-neighbor resize to exactly `w x h`
//!
//! Full-bleed tile sprites skip the first two steps so they fill their cell.

use atlasforge_spec::{NormalizeConfig, SpriteSpec};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::error::AtlasError;

/// Normalize a raw image for a manifest sprite.
pub fn normalize_sprite(
    raw: &RgbaImage,
    sprite: &SpriteSpec,
    config: &NormalizeConfig,
) -> Result<RgbaImage, AtlasError> {
    if sprite.w == 0 || sprite.h == 0 {
        return Err(AtlasError::InvalidSprite {
            id: sprite.id.clone(),
            w: sprite.w,
            h: sprite.h,
        });
    }
    normalize(raw, (sprite.w, sprite.h), sprite.tile, config)
}

/// Reject out-of-range normalization parameters.
pub fn check_config(config: &NormalizeConfig) -> Result<(), AtlasError> {
    match config.check() {
        Some(problem) => Err(AtlasError::InvalidConfig(problem)),
        None => Ok(()),
    }
}

/// Normalize a raw image to `target` (width, height).
pub fn normalize(
    raw: &RgbaImage,
    target: (u32, u32),
    is_tile_sprite: bool,
    config: &NormalizeConfig,
) -> Result<RgbaImage, AtlasError> {
    check_config(config)?;
    if target.0 == 0 || target.1 == 0 {
        return Err(AtlasError::InvalidConfig(format!(
            "target size must be non-zero, got {}x{}",
            target.0, target.1
        )));
    }
    if raw.width() == 0 || raw.height() == 0 {
        return Err(AtlasError::InvalidConfig(
            "raw image has no pixels".to_string(),
        ));
    }

    if is_tile_sprite {
        return Ok(resize_nearest(raw, target.0, target.1));
    }

    let mut cropped = center_crop(raw, config.crop_fraction);
    remove_background(&mut cropped, config.tolerance);
    Ok(resize_nearest(&cropped, target.0, target.1))
}

/// Crop the centered square of side `floor(min(width, height) * fraction)`.
///
/// The side is at least one pixel.
pub fn center_crop(image: &RgbaImage, fraction: f64) -> RgbaImage {
    let (width, height) = image.dimensions();
    let side = ((width.min(height) as f64 * fraction).floor() as u32)
        .clamp(1, width.min(height).max(1));
    let left = (width - side) / 2;
    let top = (height - side) / 2;
    imageops::crop_imm(image, left, top, side, side).to_image()
}

/// Pick the background color from the four corners.
///
/// Corners are read top-left, top-right, bottom-left, bottom-right. The most
/// frequent RGB triple wins; ties go to the first one seen. Returns `None`
/// for an empty image.
pub fn detect_background(image: &RgbaImage) -> Option<[u8; 3]> {
    let corners = corner_pixels(image)?;
    let rgb: Vec<[u8; 3]> = corners.iter().map(|p| [p[0], p[1], p[2]]).collect();

    let mut best = rgb[0];
    let mut best_count = 0;
    for candidate in &rgb {
        let count = rgb.iter().filter(|c| *c == candidate).count();
        if count > best_count {
            best = *candidate;
            best_count = count;
        }
    }
    Some(best)
}

/// Clear every pixel within `tolerance` of the corner background color.
///
/// Each of R, G and B must be within tolerance; alpha is ignored while
/// matching. Cleared pixels become `[0, 0, 0, 0]`. Matching regions are
/// cleared wherever they are, not only where connected to the border.
///
/// When all four corners are already fully transparent the image has been
/// keyed before and is left untouched.
pub fn remove_background(image: &mut RgbaImage, tolerance: u8) {
    let Some(corners) = corner_pixels(image) else {
        return;
    };
    if corners.iter().all(|p| p[3] == 0) {
        return;
    }
    let Some(background) = detect_background(image) else {
        return;
    };

    for pixel in image.pixels_mut() {
        if matches_background(pixel, background, tolerance) {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }
}

/// Resize with nearest-neighbor sampling. Never smooths.
pub fn resize_nearest(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }
    imageops::resize(image, width, height, FilterType::Nearest)
}

fn matches_background(pixel: &Rgba<u8>, background: [u8; 3], tolerance: u8) -> bool {
    (0..3).all(|c| pixel[c].abs_diff(background[c]) <= tolerance)
}

fn corner_pixels(image: &RgbaImage) -> Option<[Rgba<u8>; 4]> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return None;
    }
    let (right, bottom) = (width - 1, height - 1);
    Some([
        *image.get_pixel(0, 0),
        *image.get_pixel(right, 0),
        *image.get_pixel(0, bottom),
        *image.get_pixel(right, bottom),
    ])
}
