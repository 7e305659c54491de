//! Renderable object representation for the scene

use crate::foundation::math::Mat4;
use crate::scene::{MaterialKey, MeshKey};

/// A renderable entry in the scene: mesh, material, world transform
///
/// Objects are plain values; the mesh and material keys must refer to live
/// entries in the owning scene's arenas for the scene's lifetime. Objects
/// are append-only — there is no removal or lookup.
#[derive(Debug, Clone, Copy)]
pub struct RenderObject {
    /// Mesh resource drawn for this object
    pub mesh: MeshKey,

    /// Material bound for this object's batch
    pub material: MaterialKey,

    /// World-space transform matrix
    pub transform: Mat4,
}

impl RenderObject {
    /// Create a new renderable object
    #[must_use]
    pub fn new(mesh: MeshKey, material: MaterialKey, transform: Mat4) -> Self {
        Self {
            mesh,
            material,
            transform,
        }
    }
}
