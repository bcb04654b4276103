//! Artifact output.
//!
//! Artifacts are encoded fully in memory, then written to temporary files
//! beside their destinations and renamed into place. A failed write leaves
//! the previous file untouched.

use std::io::Write;
use std::path::Path;

use atlasforge_spec::index_to_json;
use tempfile::NamedTempFile;

use crate::assemble::AssembledAtlas;
use crate::error::AtlasError;
use crate::png::{encode_rgba_with_hash, PngConfig};

/// Encoded atlas ready to be written.
#[derive(Debug, Clone)]
pub struct EncodedAtlas {
    /// PNG bytes of the atlas image.
    pub png_data: Vec<u8>,
    /// BLAKE3 hash of `png_data`.
    pub hash: String,
    /// Canonical index JSON.
    pub index_json: String,
}

/// Encode the atlas image and index.
pub fn encode_atlas(atlas: &AssembledAtlas, config: &PngConfig) -> Result<EncodedAtlas, AtlasError> {
    let (png_data, hash) = encode_rgba_with_hash(&atlas.image, config)?;
    let index_json = index_to_json(&atlas.index)?;
    Ok(EncodedAtlas {
        png_data,
        hash,
        index_json,
    })
}

/// Write the image, then the index.
///
/// Both files are fully written to temporaries before either is renamed, so
/// a failure while staging leaves both previous artifacts untouched. Only a
/// failed rename of the index after the image is in place can leave a new
/// image beside the previous index.
pub fn write_atlas(encoded: &EncodedAtlas, image_path: &Path, index_path: &Path) -> Result<(), AtlasError> {
    let image = stage_artifact(image_path, &encoded.png_data)?;
    let index = stage_artifact(index_path, encoded.index_json.as_bytes())?;
    commit_artifact(image, image_path)?;
    commit_artifact(index, index_path)
}

/// Atomically replace `path` with `data`, creating parent directories.
pub fn write_artifact(path: &Path, data: &[u8]) -> Result<(), AtlasError> {
    let file = stage_artifact(path, data)?;
    commit_artifact(file, path)
}

/// Write `data` to a synced temporary file in the destination directory.
fn stage_artifact(path: &Path, data: &[u8]) -> Result<NamedTempFile, AtlasError> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(|e| AtlasError::io(parent, e))?;

    let mut file = NamedTempFile::new_in(parent).map_err(|e| AtlasError::io(parent, e))?;
    file.write_all(data).map_err(|e| AtlasError::io(path, e))?;
    file.as_file()
        .sync_all()
        .map_err(|e| AtlasError::io(path, e))?;
    Ok(file)
}

fn commit_artifact(file: NamedTempFile, path: &Path) -> Result<(), AtlasError> {
    file.persist(path).map_err(|e| AtlasError::io(path, e.error))?;
    Ok(())
}
