//! Rendering model: everything a frame needs that does not touch the GPU.
//!
//! # Invariants
//! - Meshes are plain vertex data plus a [`Transform`]; uploading them is the
//!   backend's job.
//! - Camera motion lives here, outside any GPU context, so it survives context
//!   loss.

mod camera;
mod face;
mod mesh;
mod noise;
mod params;
mod terrain;
mod vertex;

pub use camera::{Camera, CameraPose, FixedNavigation, Navigation, OrbitNavigation};
pub use face::VoxelFace;
pub use mesh::{LineStrip, MaterialKind, Mesh};
pub use noise::SimplexNoise;
pub use params::RenderParams;
pub use terrain::{TerrainDimensions, VoxelTerrain};
pub use vertex::{PrimitiveType, Vertex, VertexList};
pub use voxelwall_common::Transform;

/// Errors from building render data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("matrix stack is empty")]
    MatrixStackEmpty,
    #[error("a line strip needs at least 2 points, got {points}")]
    LineStripTooShort { points: usize },
}

pub fn crate_info() -> &'static str {
    "voxelwall-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
