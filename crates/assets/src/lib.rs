//! Voxel model assets.
//!
//! Loaders work on raw byte streams and know nothing about file names or
//! extensions. [`load_file`] is the only path-aware entry point.
//!
//! # Layout
//! Frames are dense palette-index grids with y as the up axis. Index `0`
//! marks an empty voxel, so palette lookups start at `1`.

mod model;
mod vox;

use std::io::Read;
use std::path::Path;

pub use model::{Palette, VoxelDimensions, VoxelModel, VoxelModelFrame};
pub use vox::MagicaVoxelLoader;

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("not a MagicaVoxel file: expected magic \"VOX \", got {0:?}")]
    BadMagic(String),
    #[error("expected {expected} chunk, found {found:?}")]
    UnexpectedChunk {
        expected: &'static str,
        found: String,
    },
    #[error("unexpected end of data at byte {offset}")]
    Truncated { offset: usize },
    #[error("model frame {frame} contains no voxels")]
    EmptyFrame { frame: usize },
    #[error("invalid model dimensions {width}x{height}x{depth}")]
    InvalidDimensions { width: i32, height: i32, depth: i32 },
    #[error("voxel ({x}, {y}, {z}) lies outside the model bounds")]
    VoxelOutOfBounds { x: usize, y: usize, z: usize },
}

/// A low-level model loader that deserializes a voxel model from raw bytes.
pub trait VoxelModelLoader {
    fn load(&self, reader: &mut dyn Read) -> Result<VoxelModel, AssetError>;
}

/// Load a MagicaVoxel model from disk.
pub fn load_file(path: impl AsRef<Path>) -> Result<VoxelModel, AssetError> {
    let path = path.as_ref();
    let mut file = std::fs::File::open(path)?;
    let model = MagicaVoxelLoader.load(&mut file)?;
    tracing::info!(
        path = %path.display(),
        frames = model.frames.len(),
        "loaded voxel model"
    );
    Ok(model)
}

pub fn crate_info() -> &'static str {
    "voxelwall-assets v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vox::tests::VoxWriter;
    use std::io::Write;

    #[test]
    fn load_file_from_disk() {
        let data = VoxWriter::new()
            .frame([3, 3, 3], &[[0, 0, 0, 1], [2, 2, 2, 2]])
            .palette([10, 20, 30, 255])
            .finish();
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(&data).unwrap();

        let model = load_file(tmp.path()).unwrap();
        assert_eq!(model.frames.len(), 1);
        assert_eq!(model.frames[0].voxel_count(), 2);
        assert!(model.palette.color_at(1).is_some());
    }

    #[test]
    fn load_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(dir.path().join("missing.vox")).unwrap_err();
        assert!(matches!(err, AssetError::Io(_)));
    }

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("assets"));
    }
}
