use glam::{Vec3, Vec4};
use voxelwall_assets::{Palette, VoxelModelFrame};
use voxelwall_common::{Axis, Color, Transform};

use crate::RenderError;
use crate::face::cube_vertices;
use crate::vertex::{PrimitiveType, Vertex, VertexList};

/// Half-length of the coordinate system axes.
const AXIS_LENGTH: f32 = 1.5;

/// Shading used for a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaterialKind {
    /// Vertex color with directional lighting.
    #[default]
    Lit,
    /// Vertex color only.
    SolidColor,
}

/// A strip of connected line segments; `n` points give `n - 1` segments.
#[derive(Debug, Clone, PartialEq)]
pub struct LineStrip {
    color: Color,
    points: Vec<Vec3>,
}

impl LineStrip {
    pub fn new(color: Color, points: Vec<Vec3>) -> Result<Self, RenderError> {
        if points.len() < 2 {
            return Err(RenderError::LineStripTooShort {
                points: points.len(),
            });
        }
        Ok(Self { color, points })
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Line vertices carry no normal.
    pub fn to_vertices(&self) -> impl Iterator<Item = Vertex> + '_ {
        let color = Vec4::from(self.color);
        self.points
            .iter()
            .map(move |p| Vertex::new(*p, color, Vec3::ZERO))
    }
}

/// Vertex data, a transform and the material it is drawn with.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub vertices: VertexList,
    pub transform: Transform,
    pub material: MaterialKind,
}

impl Mesh {
    pub fn new(primitive: PrimitiveType, material: MaterialKind) -> Self {
        Self {
            vertices: VertexList::new(primitive),
            transform: Transform::default(),
            material,
        }
    }

    /// A single lit unit cube spanning `[0, 1]`.
    pub fn cube(color: Color) -> Self {
        let mut mesh = Self::new(PrimitiveType::Triangles, MaterialKind::Lit);
        mesh.vertices.extend(cube_vertices(color.into(), Vec3::ZERO));
        mesh
    }

    /// One cube per present voxel of `frame`, centered on the x/z plane and
    /// standing on y = 0.
    pub fn voxel_model(frame: &VoxelModelFrame, palette: &Palette) -> Self {
        let mut mesh = Self::new(PrimitiveType::Triangles, MaterialKind::Lit);
        let dims = frame.dimensions();
        let half_width = dims.width as f32 / 2.0;
        let half_depth = dims.depth as f32 / 2.0;

        mesh.vertices.reserve_triangles(frame.voxel_count() * 12);
        for (x, y, z, index) in frame.voxels() {
            // Present voxels never have index 0, so the palette always has a color.
            let color = palette.color_at(index).unwrap_or_default();
            let translation = Vec3::new(x as f32 - half_width, y as f32, z as f32 - half_depth);
            mesh.vertices.extend(cube_vertices(color.into(), translation));
        }
        tracing::debug!(vertices = mesh.vertices.len(), "built voxel model mesh");
        mesh
    }

    pub fn line_strip(strip: &LineStrip) -> Self {
        let mut mesh = Self::new(PrimitiveType::LineStrip, MaterialKind::SolidColor);
        mesh.vertices.extend(strip.to_vertices());
        mesh
    }

    /// White X, Y and Z axes from the origin, drawn as separate segments.
    pub fn coordinate_system() -> Self {
        let mut mesh = Self::new(PrimitiveType::Lines, MaterialKind::SolidColor);
        let color = Vec4::from(Color::WHITE);
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            mesh.vertices.push(Vertex::new(Vec3::ZERO, color, Vec3::ZERO));
            mesh.vertices
                .push(Vertex::new(axis.unit() * AXIS_LENGTH, color, Vec3::ZERO));
        }
        mesh
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn primitive(&self) -> PrimitiveType {
        self.vertices.primitive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxelwall_assets::VoxelDimensions;

    #[test]
    fn line_strip_needs_two_points() {
        assert_eq!(
            LineStrip::new(Color::WHITE, vec![Vec3::ZERO]),
            Err(RenderError::LineStripTooShort { points: 1 })
        );
        let strip = LineStrip::new(Color::WHITE, vec![Vec3::ZERO, Vec3::X, Vec3::Y]).unwrap();
        let mesh = Mesh::line_strip(&strip);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.primitive(), PrimitiveType::LineStrip);
        assert_eq!(mesh.material, MaterialKind::SolidColor);
    }

    #[test]
    fn cube_mesh() {
        let mesh = Mesh::cube(Color::GREEN);
        assert_eq!(mesh.vertex_count(), 36);
        assert!(mesh.vertices.vertices().iter().all(|v| v.color == Color::GREEN.to_array()));
        assert_eq!(mesh.material, MaterialKind::Lit);
    }

    #[test]
    fn coordinate_system_has_three_segments() {
        let mesh = Mesh::coordinate_system();
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.primitive(), PrimitiveType::Lines);
        assert_eq!(mesh.vertices.vertices()[3].position, [0.0, 1.5, 0.0]);
    }

    #[test]
    fn voxel_model_mesh_uses_palette_and_centers() {
        let mut frame = VoxelModelFrame::new(VoxelDimensions::new(4, 2, 4));
        frame.set_color_index_at(0, 0, 0, 3).unwrap();
        frame.set_color_index_at(3, 1, 3, 3).unwrap();
        let mut palette = Palette::default();
        palette.set_color(3, Color::new(1.0, 0.0, 0.0, 1.0));

        let mesh = Mesh::voxel_model(&frame, &palette);
        assert_eq!(mesh.vertex_count(), 72);

        let verts = mesh.vertices.vertices();
        assert!(verts.iter().all(|v| v.color == [1.0, 0.0, 0.0, 1.0]));
        let min_x = verts.iter().map(|v| v.position[0]).fold(f32::MAX, f32::min);
        let max_x = verts.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        assert_eq!((min_x, max_x), (-2.0, 2.0));
    }
}
