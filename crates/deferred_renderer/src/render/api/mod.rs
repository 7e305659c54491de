//! Backend abstraction for the rendering system
//!
//! Defines the trait and opaque handle types through which the renderer
//! reaches the graphics device.

mod render_backend;

pub use render_backend::{
    BufferHandle, BufferKind, ClearFlags, FramebufferHandle, MeshHandle, ProgramHandle,
    RenderBackend, TextureHandle,
};
