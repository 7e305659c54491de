//! # Deferred Renderer
//!
//! A deferred rendering core built around scene batching, frustum culling,
//! and multi-pass draw submission.
//!
//! ## Architecture
//!
//! ```text
//! Scene (objects, lights, resource arenas)
//!      ↓  material batching + culling
//! RenderQueue (one instanced draw per batch)
//!      ↓  command submission
//! RenderBackend (opaque graphics service)
//! ```
//!
//! The crate owns everything between the scene description and the command
//! stream: bounding volumes, the five-plane frustum test, material-keyed
//! batching, per-frame GPU buffer construction (camera/light uniforms,
//! per-batch transform arrays), and the pass sequencing of the deferred
//! pipeline (gbuffer, shadow, lighting resolve, tonemap).
//!
//! Everything below the [`render::RenderBackend`] trait — buffer and texture
//! objects, shader compilation, framebuffer creation, windowing — is an
//! external collaborator reached through opaque handles. The crate ships a
//! command-recording headless backend used by the test suite and the demo
//! application.
//!
//! ## Teardown Ordering
//!
//! GPU-owned resources must be released while the backend is still alive:
//! call [`scene::Scene::release_gpu_resources`] (and drop the `Scene`)
//! before tearing down the backend.
//!
//! ## Quick Start
//!
//! ```rust
//! use deferred_renderer::prelude::*;
//!
//! let mut backend = HeadlessBackend::new();
//! let mut scene = Scene::new();
//!
//! let mesh_data = MeshData::cube();
//! let mesh = scene.add_mesh(MeshResource::new(&mesh_data, &mut backend).unwrap());
//! let program = backend.load_program("gbuffer").unwrap();
//! let material = scene.add_material(Material::new(program));
//! scene.add_object(RenderObject::new(mesh, material, Mat4::identity()));
//! scene.add_point_light(PointLight::new(Vec3::new(1.0, 2.0, 4.0), 100.0, Vec3::new(0.0, 10.0, 0.0)));
//!
//! let camera = Camera::default();
//! scene.render(&camera, &mut backend).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod config;
pub mod foundation;
pub mod render;
pub mod scene;

/// Common imports for renderer users
pub mod prelude {
    pub use crate::{
        assets::AssetError,
        config::RendererConfig,
        foundation::math::{Mat4, Mat4Ext, Vec3},
        render::{
            backends::HeadlessBackend,
            frame_data::{FrameData, GpuPointLight},
            BlendMode, Camera, ClearFlags, DeferredPipeline, DepthTestMode, Material, MeshData,
            MeshResource, PointLight, RenderBackend, RenderError, RenderResult,
        },
        scene::{Frustum, MaterialKey, MeshKey, RenderObject, Scene},
    };
}
