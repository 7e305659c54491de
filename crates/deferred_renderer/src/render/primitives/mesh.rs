//! Mesh geometry and GPU mesh resources
//!
//! [`MeshData`] is the CPU-side geometry container; [`MeshResource`] owns
//! the backend-side vertex/index buffers plus the bounding volume computed
//! once at construction. Mesh geometry is immutable after construction, so
//! the bounding volume is never recomputed.

use crate::render::api::{MeshHandle, RenderBackend};
use crate::render::primitives::Vertex;
use crate::render::RenderResult;
use crate::scene::culling::BoundingSphere;

/// CPU-side mesh geometry
#[derive(Debug, Clone)]
pub struct MeshData {
    /// Vertex data
    pub vertices: Vec<Vertex>,

    /// Index data for triangles
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Create a new mesh from vertices and indices
    #[must_use]
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Create a unit cube centered at the origin
    ///
    /// Each face has outward normals and [0, 1] texture coordinates.
    /// Primarily intended for tests and demos.
    #[must_use]
    pub fn cube() -> Self {
        let vertices = vec![
            // Front face
            Vertex::new([-1.0, -1.0, 1.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
            Vertex::new([1.0, -1.0, 1.0], [0.0, 0.0, 1.0], [1.0, 0.0]),
            Vertex::new([1.0, 1.0, 1.0], [0.0, 0.0, 1.0], [1.0, 1.0]),
            Vertex::new([-1.0, 1.0, 1.0], [0.0, 0.0, 1.0], [0.0, 1.0]),
            // Back face
            Vertex::new([-1.0, -1.0, -1.0], [0.0, 0.0, -1.0], [1.0, 0.0]),
            Vertex::new([-1.0, 1.0, -1.0], [0.0, 0.0, -1.0], [1.0, 1.0]),
            Vertex::new([1.0, 1.0, -1.0], [0.0, 0.0, -1.0], [0.0, 1.0]),
            Vertex::new([1.0, -1.0, -1.0], [0.0, 0.0, -1.0], [0.0, 0.0]),
        ];

        let indices = vec![
            // Front
            0, 1, 2, 2, 3, 0,
            // Back
            4, 5, 6, 6, 7, 4,
            // Left
            4, 0, 3, 3, 5, 4,
            // Right
            1, 7, 6, 6, 2, 1,
            // Top
            3, 2, 6, 6, 5, 3,
            // Bottom
            4, 7, 1, 1, 0, 4,
        ];

        Self::new(vertices, indices)
    }

    /// Compute the bounding sphere enclosing all vertex positions
    ///
    /// # Panics
    /// Panics if the mesh has no vertices (programmer error).
    #[must_use]
    pub fn bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::enclosing(self.vertices.iter().map(|v| v.position))
    }
}

/// GPU-resident mesh with a precomputed bounding volume
///
/// Owns the backend vertex/index buffers exclusively through an opaque
/// handle. Release through [`MeshResource::release`] (or
/// `Scene::release_gpu_resources`) while the backend is still alive.
#[derive(Debug)]
pub struct MeshResource {
    handle: MeshHandle,
    index_count: u32,
    bounds: BoundingSphere,
}

impl MeshResource {
    /// Upload mesh geometry and compute its bounding volume
    ///
    /// # Panics
    /// Panics if the mesh has no vertices (programmer error).
    pub fn new(data: &MeshData, backend: &mut dyn RenderBackend) -> RenderResult<Self> {
        let bounds = data.bounding_sphere();
        let handle = backend.create_mesh(&data.vertices, &data.indices)?;

        Ok(Self {
            handle,
            index_count: data.indices.len() as u32,
            bounds,
        })
    }

    /// The backend handle for this mesh
    #[must_use]
    pub fn handle(&self) -> MeshHandle {
        self.handle
    }

    /// Number of indices in the mesh
    #[must_use]
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// The mesh-local bounding sphere computed at construction
    #[must_use]
    pub fn bounds(&self) -> BoundingSphere {
        self.bounds
    }

    /// Draw a single instance of this mesh
    pub fn draw(&self, backend: &mut dyn RenderBackend) -> RenderResult<()> {
        self.draw_instanced(backend, 1)
    }

    /// Draw `instance_count` instances of this mesh
    pub fn draw_instanced(
        &self,
        backend: &mut dyn RenderBackend,
        instance_count: u32,
    ) -> RenderResult<()> {
        backend.draw_mesh_instanced(self.handle, instance_count)
    }

    /// Release the backend-side buffers
    pub fn release(&self, backend: &mut dyn RenderBackend) {
        backend.destroy_mesh(self.handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    #[test]
    fn test_cube_bounds_contain_all_vertices() {
        let cube = MeshData::cube();
        let sphere = cube.bounding_sphere();

        for vertex in &cube.vertices {
            assert!(sphere.contains(Vec3::from(vertex.position)));
        }
    }

    #[test]
    fn test_single_vertex_bounds_are_degenerate() {
        let mesh = MeshData::new(
            vec![Vertex::new([2.0, -3.0, 5.0], [0.0, 1.0, 0.0], [0.0, 0.0])],
            vec![0],
        );
        let sphere = mesh.bounding_sphere();

        assert_eq!(sphere.center, Vec3::new(2.0, -3.0, 5.0));
        assert_eq!(sphere.radius, 0.0);
        assert!(sphere.contains(Vec3::new(2.0, -3.0, 5.0)));
    }
}
