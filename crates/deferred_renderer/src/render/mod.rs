//! # Rendering System
//!
//! High-level, backend-agnostic rendering layer. It owns the resource and
//! material abstractions, the per-frame GPU record layouts, and the
//! deferred pass sequencing, and submits all work through the
//! [`RenderBackend`] trait.
//!
//! ## Architecture
//!
//! The rendering system is designed with clear separation of concerns:
//! - **Primitives**: vertices, meshes, cameras — pure data plus GPU handles
//! - **Material / Lighting**: shading state and light descriptions
//! - **Frame Data**: the per-frame GPU buffer layouts and binding slots
//! - **Pipeline**: the gbuffer → shadow → lighting → tonemap sequencing
//! - **Backends**: implementations of the backend trait (headless recording)
//!
//! Everything below the backend trait — buffer/texture/program objects,
//! shader compilation, framebuffers, windowing — is an external
//! collaborator reached through opaque handles.

pub mod api;
pub mod backends;
pub mod frame_data;
pub mod lighting;
pub mod material;
pub mod pipeline;
pub mod primitives;

pub use api::{
    BufferHandle, BufferKind, ClearFlags, FramebufferHandle, MeshHandle, ProgramHandle,
    RenderBackend, TextureHandle,
};
pub use lighting::PointLight;
pub use material::{BlendMode, DepthTestMode, Material};
pub use pipeline::{DeferredPipeline, ShadowPass};
pub use primitives::{Camera, MeshData, MeshResource, Vertex};

use thiserror::Error;

/// Errors produced by rendering operations
#[derive(Error, Debug)]
pub enum RenderError {
    /// Renderer initialization failed during setup
    #[error("Renderer initialization failed: {0}")]
    InitializationFailed(String),

    /// A rendering operation failed during execution
    #[error("Rendering failed: {0}")]
    RenderingFailed(String),

    /// Resource creation or management failed
    #[error("Resource creation failed: {0}")]
    ResourceCreationFailed(String),

    /// Backend-specific error occurred
    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
