use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};

/// A single vertex: position, color and normal. Laid out for direct upload.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub normal: [f32; 3],
}

impl Vertex {
    pub fn new(position: Vec3, color: Vec4, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
            normal: normal.to_array(),
        }
    }
}

/// How a vertex list is assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrimitiveType {
    #[default]
    Triangles,
    TriangleStrip,
    Lines,
    LineStrip,
}

/// A list of vertices rendered with one primitive type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexList {
    primitive: PrimitiveType,
    vertices: Vec<Vertex>,
}

impl VertexList {
    pub fn new(primitive: PrimitiveType) -> Self {
        Self {
            primitive,
            vertices: Vec::new(),
        }
    }

    /// Reserve room for `triangles` more triangles.
    pub fn reserve_triangles(&mut self, triangles: usize) {
        self.vertices.reserve(triangles * 3);
    }

    pub fn push(&mut self, vertex: Vertex) {
        self.vertices.push(vertex);
    }

    pub fn extend(&mut self, vertices: impl IntoIterator<Item = Vertex>) {
        self.vertices.extend(vertices);
    }

    pub fn primitive(&self) -> PrimitiveType {
        self.primitive
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}
