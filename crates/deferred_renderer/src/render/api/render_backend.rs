//! Backend abstraction trait for the rendering system
//!
//! This module defines the trait that rendering backends must implement to
//! provide a consistent interface for the high-level renderer. Backends own
//! every graphics-API object (buffers, textures, programs, framebuffers);
//! the renderer only ever sees the opaque handles defined here.
//!
//! ## Command Stream Ordering
//!
//! Implementations must execute submitted work in program order relative to
//! the calling thread: a buffer created and bound before a draw is visible
//! to that draw. `destroy_*` calls may defer actual reclamation until
//! already-submitted work that reads the resource has completed.

use crate::render::material::Material;
use crate::render::primitives::Vertex;
use crate::render::RenderResult;
use bitflags::bitflags;

/// Handle to a mesh resource stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u64);

/// Handle to a frame-scoped data buffer stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u64);

/// Handle to a texture stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Handle to a compiled shader program stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u64);

/// Handle to a framebuffer stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FramebufferHandle(pub u64);

/// How a data buffer is exposed to shaders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    /// Uniform buffer (small, fixed-layout records)
    Uniform,
    /// Storage buffer (runtime-sized arrays)
    Storage,
}

bitflags! {
    /// Attachments to clear when binding a framebuffer
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClearFlags: u32 {
        /// Clear all color attachments
        const COLOR = 1 << 0;
        /// Clear the depth attachment
        const DEPTH = 1 << 1;
    }
}

/// Main rendering backend trait
///
/// This trait abstracts over graphics backends and provides a consistent
/// interface for the high-level renderer. All submission is single-threaded;
/// the backend executes the resulting command stream asynchronously but in
/// submission order.
pub trait RenderBackend {
    /// Upload mesh geometry and return an opaque handle
    fn create_mesh(&mut self, vertices: &[Vertex], indices: &[u32]) -> RenderResult<MeshHandle>;

    /// Release a mesh's GPU resources
    ///
    /// Must be called while the backend is still alive; destroying the
    /// backend first is undefined behavior on real graphics APIs.
    fn destroy_mesh(&mut self, mesh: MeshHandle);

    /// Create a frame-scoped data buffer from raw bytes
    fn create_buffer(&mut self, kind: BufferKind, data: &[u8]) -> RenderResult<BufferHandle>;

    /// Release a frame-scoped buffer
    ///
    /// Reclamation may be deferred past draws already recorded against the
    /// buffer; calling this immediately after the consuming draw is safe.
    fn destroy_buffer(&mut self, buffer: BufferHandle);

    /// Bind a buffer to a fixed shader-visible slot
    fn bind_buffer(&mut self, buffer: BufferHandle, kind: BufferKind, slot: u32);

    /// Upload an RGBA8 texture and return an opaque handle
    fn create_texture(&mut self, width: u32, height: u32, pixels: &[u8]) -> RenderResult<TextureHandle>;

    /// Release a texture's GPU resources
    fn destroy_texture(&mut self, texture: TextureHandle);

    /// Resolve a shader program by name
    ///
    /// Compilation and linking are the backend's concern; the renderer only
    /// identifies programs by name.
    fn load_program(&mut self, name: &str) -> RenderResult<ProgramHandle>;

    /// Bind a program without any material state (depth-only passes)
    fn bind_program(&mut self, program: ProgramHandle);

    /// Bind a material's full pipeline state: program, textures, blend
    /// mode, depth-test mode, and depth-write flag
    fn bind_material(&mut self, material: &Material);

    /// Bind a framebuffer as the draw target, clearing the given attachments
    fn bind_framebuffer(&mut self, framebuffer: FramebufferHandle, clear: ClearFlags);

    /// Bind the default (presentation) framebuffer as the draw target
    fn bind_default_framebuffer(&mut self, clear: ClearFlags);

    /// Issue one instanced, indexed draw of a mesh
    fn draw_mesh_instanced(&mut self, mesh: MeshHandle, instance_count: u32) -> RenderResult<()>;

    /// Draw a fullscreen triangle with the currently bound material
    fn draw_fullscreen(&mut self) -> RenderResult<()>;
}
