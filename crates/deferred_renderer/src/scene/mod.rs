//! Scene management system
//!
//! Owns the renderable objects and lights, the mesh/material resource
//! arenas, and the per-frame batching and buffer construction that turns
//! the scene into backend draw submissions.
//!
//! ## Architecture
//!
//! ```text
//! Scene (objects, lights, arenas)
//!      ↓  frustum culling (culling)
//!      ↓  material batching (render_queue)
//! instanced draws + frame/light/transform buffers
//! ```

pub mod culling;
mod render_queue;
mod renderable_object;
#[allow(clippy::module_inception)]
mod scene;
mod shadow;

pub use culling::{BoundingSphere, Frustum, Plane};
pub use render_queue::{RenderBatch, RenderQueue};
pub use renderable_object::RenderObject;
pub use scene::Scene;
pub use shadow::sun_view_projection;

slotmap::new_key_type! {
    /// Stable arena key identifying a mesh resource in a [`Scene`]
    pub struct MeshKey;

    /// Stable arena key identifying a material in a [`Scene`]
    ///
    /// Batch membership is keyed on this identity: two materials with
    /// identical state but distinct keys never batch together.
    pub struct MaterialKey;
}
