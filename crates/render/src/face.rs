use glam::{Vec3, Vec4};

use crate::vertex::Vertex;

/// The six faces of a unit voxel spanning `[0, 1]` on every axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoxelFace {
    /// +X
    North,
    /// -Z
    West,
    /// -X
    South,
    /// +Z
    East,
    /// +Y
    Up,
    /// -Y
    Down,
}

#[rustfmt::skip]
const NORTH: [[f32; 3]; 6] = [
    [1.0, 1.0, 1.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0],
    [1.0, 0.0, 0.0], [1.0, 1.0, 1.0], [1.0, 0.0, 1.0],
];
#[rustfmt::skip]
const WEST: [[f32; 3]; 6] = [
    [1.0, 1.0, 0.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0],
    [1.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 0.0],
];
#[rustfmt::skip]
const SOUTH: [[f32; 3]; 6] = [
    [0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0],
    [0.0, 0.0, 0.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0],
];
#[rustfmt::skip]
const EAST: [[f32; 3]; 6] = [
    [0.0, 1.0, 1.0], [0.0, 0.0, 1.0], [1.0, 0.0, 1.0],
    [1.0, 1.0, 1.0], [0.0, 1.0, 1.0], [1.0, 0.0, 1.0],
];
#[rustfmt::skip]
const UP: [[f32; 3]; 6] = [
    [1.0, 1.0, 1.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0],
    [1.0, 1.0, 1.0], [0.0, 1.0, 0.0], [0.0, 1.0, 1.0],
];
#[rustfmt::skip]
const DOWN: [[f32; 3]; 6] = [
    [1.0, 0.0, 1.0], [0.0, 0.0, 0.0], [1.0, 0.0, 0.0],
    [1.0, 0.0, 1.0], [0.0, 0.0, 1.0], [0.0, 0.0, 0.0],
];

impl VoxelFace {
    pub const ALL: [VoxelFace; 6] = [
        VoxelFace::North,
        VoxelFace::West,
        VoxelFace::South,
        VoxelFace::East,
        VoxelFace::Up,
        VoxelFace::Down,
    ];

    pub fn normal(self) -> Vec3 {
        match self {
            VoxelFace::North => Vec3::X,
            VoxelFace::West => Vec3::NEG_Z,
            VoxelFace::South => Vec3::NEG_X,
            VoxelFace::East => Vec3::Z,
            VoxelFace::Up => Vec3::Y,
            VoxelFace::Down => Vec3::NEG_Y,
        }
    }

    fn corners(self) -> &'static [[f32; 3]; 6] {
        match self {
            VoxelFace::North => &NORTH,
            VoxelFace::West => &WEST,
            VoxelFace::South => &SOUTH,
            VoxelFace::East => &EAST,
            VoxelFace::Up => &UP,
            VoxelFace::Down => &DOWN,
        }
    }

    /// The two triangles of this face, colored and moved by `translation`.
    pub fn vertices(self, color: Vec4, translation: Vec3) -> [Vertex; 6] {
        let normal = self.normal();
        self.corners()
            .map(|corner| Vertex::new(Vec3::from_array(corner) + translation, color, normal))
    }
}

/// All 36 vertices of a unit cube at `translation`.
pub(crate) fn cube_vertices(color: Vec4, translation: Vec3) -> impl Iterator<Item = Vertex> {
    VoxelFace::ALL
        .into_iter()
        .flat_map(move |face| face.vertices(color, translation))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faces_lie_on_their_plane() {
        for face in VoxelFace::ALL {
            let n = face.normal();
            // Offset of the face plane along its normal: 1 for +axis, 0 for -axis.
            let plane = if n.max_element() > 0.0 { 1.0 } else { 0.0 };
            for v in face.vertices(Vec4::ONE, Vec3::ZERO) {
                let p = Vec3::from_array(v.position);
                assert_eq!(p.dot(n.abs()), plane, "{face:?}");
                assert_eq!(v.normal, n.to_array());
            }
        }
    }

    #[test]
    fn translation_and_color_applied() {
        let color = Vec4::new(0.1, 0.2, 0.3, 1.0);
        let verts = VoxelFace::Up.vertices(color, Vec3::new(10.0, 0.0, 0.0));
        assert!(verts.iter().all(|v| v.position[0] >= 10.0 && v.position[1] == 1.0));
        assert!(verts.iter().all(|v| v.color == color.to_array()));
    }

    #[test]
    fn cube_has_36_vertices() {
        assert_eq!(cube_vertices(Vec4::ONE, Vec3::ZERO).count(), 36);
    }
}
