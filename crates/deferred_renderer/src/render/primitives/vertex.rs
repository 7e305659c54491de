//! Vertex layout for mesh geometry

use bytemuck::{Pod, Zeroable};

/// 3D vertex data structure for rendering
///
/// Fixed-layout GPU record; immutable once the owning mesh is constructed.
///
/// # Memory Layout
/// `#[repr(C)]` plus the `Pod` guarantee give a stable 60-byte layout that
/// is uploaded to vertex buffers verbatim: position at offset 0, normal at
/// 12, uv at 24, tangent at 32, color at 48.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in mesh-local space
    pub position: [f32; 3],

    /// Normal vector
    pub normal: [f32; 3],

    /// Texture coordinates
    pub uv: [f32; 2],

    /// Tangent vector; w holds the bitangent sign
    pub tangent: [f32; 4],

    /// Vertex color
    pub color: [f32; 3],
}

impl Vertex {
    /// Create a vertex with a default tangent frame and white color
    #[must_use]
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
            tangent: [1.0, 0.0, 0.0, 1.0],
            color: [1.0, 1.0, 1.0],
        }
    }
}
