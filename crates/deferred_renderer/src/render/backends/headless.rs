//! Command-recording headless backend
//!
//! Records every submission into an inspectable command list instead of
//! talking to a graphics API. Used by the test suite, CI, and the demo
//! application; also serves as the reference for the ordering guarantees
//! backends must provide (commands execute in submission order).
//!
//! Destroyed buffers keep their bytes readable, modeling a device that
//! defers reclamation until submitted work has completed.

use crate::render::api::{
    BufferHandle, BufferKind, ClearFlags, FramebufferHandle, MeshHandle, ProgramHandle,
    RenderBackend, TextureHandle,
};
use crate::render::material::Material;
use crate::render::primitives::Vertex;
use crate::render::{RenderError, RenderResult};
use std::collections::HashMap;

/// One recorded backend submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A buffer was bound to a shader-visible slot
    BindBuffer {
        /// The bound buffer
        buffer: BufferHandle,
        /// Uniform or storage binding
        kind: BufferKind,
        /// Destination slot
        slot: u32,
    },
    /// Full material state was bound
    BindMaterial {
        /// The material's program
        program: ProgramHandle,
    },
    /// A bare program was bound (depth-only passes)
    BindProgram {
        /// The bound program
        program: ProgramHandle,
    },
    /// A framebuffer became the draw target
    BindFramebuffer {
        /// The bound framebuffer
        framebuffer: FramebufferHandle,
        /// Attachments cleared on bind
        clear: ClearFlags,
    },
    /// The default framebuffer became the draw target
    BindDefaultFramebuffer {
        /// Attachments cleared on bind
        clear: ClearFlags,
    },
    /// An instanced, indexed mesh draw
    DrawMeshInstanced {
        /// The drawn mesh
        mesh: MeshHandle,
        /// Number of instances
        instance_count: u32,
    },
    /// A fullscreen triangle draw
    DrawFullscreen,
}

#[derive(Debug)]
struct StoredMesh {
    vertex_count: usize,
    index_count: usize,
    alive: bool,
}

#[derive(Debug)]
struct StoredBuffer {
    kind: BufferKind,
    data: Vec<u8>,
    alive: bool,
}

/// Recording implementation of [`RenderBackend`]
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_handle: u64,
    meshes: HashMap<u64, StoredMesh>,
    buffers: HashMap<u64, StoredBuffer>,
    textures: HashMap<u64, (u32, u32)>,
    programs: HashMap<String, ProgramHandle>,
    framebuffers: HashMap<u64, String>,
    commands: Vec<Command>,
}

impl HeadlessBackend {
    /// Create an empty backend
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_handle(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    /// Register a named framebuffer and return its handle
    ///
    /// Framebuffer creation is the application's concern on real backends;
    /// here a name is enough.
    pub fn register_framebuffer(&mut self, name: &str) -> FramebufferHandle {
        let handle = self.next_handle();
        self.framebuffers.insert(handle, name.to_string());
        FramebufferHandle(handle)
    }

    /// The recorded command stream, in submission order
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Clear the recorded command stream (resources are kept)
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Bytes of a buffer, readable even after `destroy_buffer`
    #[must_use]
    pub fn buffer_data(&self, buffer: BufferHandle) -> Option<&[u8]> {
        self.buffers.get(&buffer.0).map(|b| b.data.as_slice())
    }

    /// Whether a buffer has been destroyed
    #[must_use]
    pub fn is_buffer_destroyed(&self, buffer: BufferHandle) -> bool {
        self.buffers.get(&buffer.0).is_some_and(|b| !b.alive)
    }

    /// The buffer most recently bound to a slot, if any
    #[must_use]
    pub fn bound_buffer(&self, kind: BufferKind, slot: u32) -> Option<BufferHandle> {
        self.commands.iter().rev().find_map(|command| match command {
            Command::BindBuffer {
                buffer,
                kind: k,
                slot: s,
            } if *k == kind && *s == slot => Some(*buffer),
            _ => None,
        })
    }

    /// Number of mesh draw commands recorded
    #[must_use]
    pub fn mesh_draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::DrawMeshInstanced { .. }))
            .count()
    }

    /// Number of meshes that have been created and not destroyed
    #[must_use]
    pub fn live_mesh_count(&self) -> usize {
        self.meshes.values().filter(|m| m.alive).count()
    }

    /// Number of textures currently stored
    #[must_use]
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Vertex and index counts of a live mesh
    #[must_use]
    pub fn mesh_geometry(&self, mesh: MeshHandle) -> Option<(usize, usize)> {
        self.meshes
            .get(&mesh.0)
            .filter(|m| m.alive)
            .map(|m| (m.vertex_count, m.index_count))
    }

    /// The name a framebuffer was registered with
    #[must_use]
    pub fn framebuffer_name(&self, framebuffer: FramebufferHandle) -> Option<&str> {
        self.framebuffers.get(&framebuffer.0).map(String::as_str)
    }
}

impl RenderBackend for HeadlessBackend {
    fn create_mesh(&mut self, vertices: &[Vertex], indices: &[u32]) -> RenderResult<MeshHandle> {
        if vertices.is_empty() {
            return Err(RenderError::ResourceCreationFailed(
                "mesh has no vertices".to_string(),
            ));
        }

        let handle = self.next_handle();
        self.meshes.insert(
            handle,
            StoredMesh {
                vertex_count: vertices.len(),
                index_count: indices.len(),
                alive: true,
            },
        );
        log::trace!(
            "created mesh {handle} ({} vertices, {} indices)",
            vertices.len(),
            indices.len()
        );
        Ok(MeshHandle(handle))
    }

    fn destroy_mesh(&mut self, mesh: MeshHandle) {
        if let Some(stored) = self.meshes.get_mut(&mesh.0) {
            stored.alive = false;
        }
    }

    fn create_buffer(&mut self, kind: BufferKind, data: &[u8]) -> RenderResult<BufferHandle> {
        if data.is_empty() {
            return Err(RenderError::ResourceCreationFailed(
                "zero-length buffer".to_string(),
            ));
        }

        let handle = self.next_handle();
        self.buffers.insert(
            handle,
            StoredBuffer {
                kind,
                data: data.to_vec(),
                alive: true,
            },
        );
        Ok(BufferHandle(handle))
    }

    fn destroy_buffer(&mut self, buffer: BufferHandle) {
        // Bytes stay readable: reclamation is deferred past submitted work
        if let Some(stored) = self.buffers.get_mut(&buffer.0) {
            stored.alive = false;
        }
    }

    fn bind_buffer(&mut self, buffer: BufferHandle, kind: BufferKind, slot: u32) {
        debug_assert_eq!(
            self.buffers.get(&buffer.0).map(|b| b.kind),
            Some(kind),
            "buffer bound with a kind it was not created with"
        );
        self.commands.push(Command::BindBuffer { buffer, kind, slot });
    }

    fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> RenderResult<TextureHandle> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(RenderError::ResourceCreationFailed(format!(
                "texture data size {} does not match {width}x{height} RGBA8",
                pixels.len()
            )));
        }

        let handle = self.next_handle();
        self.textures.insert(handle, (width, height));
        Ok(TextureHandle(handle))
    }

    fn destroy_texture(&mut self, texture: TextureHandle) {
        self.textures.remove(&texture.0);
    }

    fn load_program(&mut self, name: &str) -> RenderResult<ProgramHandle> {
        if let Some(handle) = self.programs.get(name) {
            return Ok(*handle);
        }

        let handle = ProgramHandle(self.next_handle());
        self.programs.insert(name.to_string(), handle);
        log::debug!("loaded program '{name}' -> {handle:?}");
        Ok(handle)
    }

    fn bind_program(&mut self, program: ProgramHandle) {
        self.commands.push(Command::BindProgram { program });
    }

    fn bind_material(&mut self, material: &Material) {
        self.commands.push(Command::BindMaterial {
            program: material.program(),
        });
    }

    fn bind_framebuffer(&mut self, framebuffer: FramebufferHandle, clear: ClearFlags) {
        self.commands.push(Command::BindFramebuffer { framebuffer, clear });
    }

    fn bind_default_framebuffer(&mut self, clear: ClearFlags) {
        self.commands.push(Command::BindDefaultFramebuffer { clear });
    }

    fn draw_mesh_instanced(&mut self, mesh: MeshHandle, instance_count: u32) -> RenderResult<()> {
        let stored = self
            .meshes
            .get(&mesh.0)
            .ok_or_else(|| RenderError::BackendError(format!("unknown mesh handle {mesh:?}")))?;
        if !stored.alive {
            return Err(RenderError::BackendError(format!(
                "draw of destroyed mesh {mesh:?}"
            )));
        }

        self.commands.push(Command::DrawMeshInstanced {
            mesh,
            instance_count,
        });
        Ok(())
    }

    fn draw_fullscreen(&mut self) -> RenderResult<()> {
        self.commands.push(Command::DrawFullscreen);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::primitives::MeshData;

    #[test]
    fn test_buffer_round_trip() {
        let mut backend = HeadlessBackend::new();
        let data = [1u8, 2, 3, 4];
        let buffer = backend.create_buffer(BufferKind::Storage, &data).unwrap();

        assert_eq!(backend.buffer_data(buffer), Some(&data[..]));
    }

    #[test]
    fn test_destroyed_buffer_keeps_bytes() {
        let mut backend = HeadlessBackend::new();
        let buffer = backend.create_buffer(BufferKind::Uniform, &[0u8; 16]).unwrap();
        backend.destroy_buffer(buffer);

        assert!(backend.is_buffer_destroyed(buffer));
        assert!(backend.buffer_data(buffer).is_some());
    }

    #[test]
    fn test_zero_length_buffer_is_rejected() {
        let mut backend = HeadlessBackend::new();
        assert!(backend.create_buffer(BufferKind::Storage, &[]).is_err());
    }

    #[test]
    fn test_program_loading_is_idempotent() {
        let mut backend = HeadlessBackend::new();
        let a = backend.load_program("lighting").unwrap();
        let b = backend.load_program("lighting").unwrap();
        let c = backend.load_program("tonemap").unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_draw_of_destroyed_mesh_fails() {
        let mut backend = HeadlessBackend::new();
        let cube = MeshData::cube();
        let mesh = backend.create_mesh(&cube.vertices, &cube.indices).unwrap();
        backend.destroy_mesh(mesh);

        assert!(backend.draw_mesh_instanced(mesh, 1).is_err());
    }

    #[test]
    fn test_commands_record_in_submission_order() {
        let mut backend = HeadlessBackend::new();
        let buffer = backend.create_buffer(BufferKind::Uniform, &[0u8; 4]).unwrap();
        backend.bind_buffer(buffer, BufferKind::Uniform, 0);
        let cube = MeshData::cube();
        let mesh = backend.create_mesh(&cube.vertices, &cube.indices).unwrap();
        backend.draw_mesh_instanced(mesh, 2).unwrap();

        assert_eq!(
            backend.commands(),
            &[
                Command::BindBuffer {
                    buffer,
                    kind: BufferKind::Uniform,
                    slot: 0
                },
                Command::DrawMeshInstanced {
                    mesh,
                    instance_count: 2
                },
            ]
        );
    }
}
