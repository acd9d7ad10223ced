use glam::Vec3;
use serde::{Deserialize, Serialize};
use voxelwall_common::Color;

use crate::face::cube_vertices;
use crate::mesh::{MaterialKind, Mesh};
use crate::noise::SimplexNoise;
use crate::vertex::PrimitiveType;

/// Terrain extent, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainDimensions {
    pub width: f32,
    pub depth: f32,
}

impl TerrainDimensions {
    pub fn new(width: f32, depth: f32) -> Self {
        Self { width, depth }
    }
}

/// Procedural heightmap terrain: one green voxel per column, lifted by
/// simplex noise.
#[derive(Debug, Clone)]
pub struct VoxelTerrain {
    pub dimensions: TerrainDimensions,
    /// Voxels per meter.
    pub voxel_scale: f32,
    /// Scale applied to sample positions before querying the noise.
    pub frequency: f32,
    /// Highest possible height, in meters.
    pub amplitude: f32,
    pub mesh: Mesh,
}

impl VoxelTerrain {
    pub fn generate(
        dimensions: TerrainDimensions,
        voxel_scale: f32,
        frequency: f32,
        amplitude: f32,
    ) -> Self {
        let columns_x = (dimensions.width * voxel_scale).max(0.0) as usize;
        let columns_z = (dimensions.depth * voxel_scale).max(0.0) as usize;
        let voxel_size = 1.0 / voxel_scale as f64;

        let mut mesh = Mesh::new(PrimitiveType::Triangles, MaterialKind::Lit);
        mesh.vertices.reserve_triangles(columns_x * columns_z * 12);

        for ix in 0..columns_x {
            for iz in 0..columns_z {
                let sample_x =
                    (ix as f64 / columns_x as f64 + voxel_size / 2.0) * dimensions.width as f64;
                let sample_z =
                    (iz as f64 / columns_z as f64 + voxel_size / 2.0) * dimensions.depth as f64;

                let n = SimplexNoise::noise(sample_x * frequency as f64, sample_z * frequency as f64);
                let height = (n + 1.0) / 2.0 * (amplitude * voxel_scale) as f64;

                let translation = Vec3::new(ix as f32, height as f32, iz as f32);
                mesh.vertices
                    .extend(cube_vertices(Color::GREEN.into(), translation));
            }
        }
        mesh.transform.scale = voxel_size as f32;

        tracing::debug!(
            columns_x,
            columns_z,
            vertices = mesh.vertices.len(),
            "generated voxel terrain"
        );

        Self {
            dimensions,
            voxel_scale,
            frequency,
            amplitude,
            mesh,
        }
    }

    /// Number of voxel columns along x and z.
    pub fn columns(&self) -> (usize, usize) {
        (
            (self.dimensions.width * self.voxel_scale).max(0.0) as usize,
            (self.dimensions.depth * self.voxel_scale).max(0.0) as usize,
        )
    }
}
