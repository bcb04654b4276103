//! Deterministic PNG encoding and RGBA decoding.
//!
//! Encoding uses fixed compression and filter settings so the same pixels
//! always produce byte-identical files. Decoding accepts any PNG colour type
//! and converts to 8-bit RGBA.

use std::io::Write;

use image::RgbaImage;
use png::{BitDepth, ColorType, Compression, Encoder, FilterType};
use thiserror::Error;

/// Errors from PNG encoding.
#[derive(Debug, Error)]
pub enum PngError {
    #[error("PNG encoding error: {0}")]
    Encoding(#[from] png::EncodingError),

    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),
}

/// PNG export configuration for deterministic output.
#[derive(Debug, Clone)]
pub struct PngConfig {
    /// Compression level. Use a fixed value for determinism.
    pub compression: Compression,
    /// Filter type. Use a fixed value for determinism.
    pub filter: FilterType,
}

impl Default for PngConfig {
    fn default() -> Self {
        Self {
            compression: Compression::Default,
            filter: FilterType::NoFilter,
        }
    }
}

impl PngConfig {
    /// Create config optimized for speed (faster, but larger files).
    pub fn fast() -> Self {
        Self {
            compression: Compression::Fast,
            filter: FilterType::NoFilter,
        }
    }
}

/// Write an RGBA image to any writer.
pub fn write_rgba_to_writer<W: Write>(
    image: &RgbaImage,
    writer: W,
    config: &PngConfig,
) -> Result<(), PngError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(PngError::InvalidDimensions(format!(
            "cannot encode {}x{} image",
            width, height
        )));
    }

    let mut encoder = Encoder::new(writer, width, height);
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(config.compression);
    encoder.set_filter(config.filter);

    // The png crate doesn't add timestamps or other variable chunks
    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(image.as_raw())?;

    Ok(())
}

/// Encode an RGBA image to PNG bytes.
pub fn encode_rgba(image: &RgbaImage, config: &PngConfig) -> Result<Vec<u8>, PngError> {
    let mut data = Vec::new();
    write_rgba_to_writer(image, &mut data, config)?;
    Ok(data)
}

/// Encode to a Vec<u8> and return the hash.
pub fn encode_rgba_with_hash(
    image: &RgbaImage,
    config: &PngConfig,
) -> Result<(Vec<u8>, String), PngError> {
    let data = encode_rgba(image, config)?;
    let hash = hash_png(&data);
    Ok((data, hash))
}

/// Compute the BLAKE3 hash of PNG data.
pub fn hash_png(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Decode image bytes (any supported format) into 8-bit RGBA.
pub fn decode_rgba(data: &[u8]) -> Result<RgbaImage, image::ImageError> {
    Ok(image::load_from_memory(data)?.to_rgba8())
}
