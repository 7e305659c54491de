//! Material state for batched rendering
//!
//! A material bundles the complete pipeline state bound once per batch:
//! shader program, texture slots, blend mode, depth-test mode, and the
//! depth-write flag. Materials live in the scene's arena and are shared by
//! any number of objects; batch membership is decided by arena-key
//! identity, not by comparing this state.

use crate::render::api::{ProgramHandle, TextureHandle};

/// Color blending mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Opaque, no blending
    #[default]
    None,
    /// Standard alpha blending
    Alpha,
    /// Additive blending
    Additive,
}

/// Depth test comparison mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthTestMode {
    /// Depth testing disabled
    None,
    /// Pass on equal depth
    Equal,
    /// Standard less-than test
    #[default]
    Standard,
    /// Greater-than test for reversed-depth rendering
    Reversed,
}

/// Shading state shared by every object in a batch
#[derive(Debug, Clone)]
pub struct Material {
    program: ProgramHandle,
    textures: Vec<(u32, TextureHandle)>,
    blend_mode: BlendMode,
    depth_test_mode: DepthTestMode,
    depth_write: bool,
}

impl Material {
    /// Create an opaque, depth-tested material using the given program
    #[must_use]
    pub fn new(program: ProgramHandle) -> Self {
        Self {
            program,
            textures: Vec::new(),
            blend_mode: BlendMode::default(),
            depth_test_mode: DepthTestMode::default(),
            depth_write: true,
        }
    }

    /// Bind a texture to a shader texture slot, replacing any previous
    /// binding for that slot
    pub fn set_texture(&mut self, slot: u32, texture: TextureHandle) {
        if let Some(entry) = self.textures.iter_mut().find(|(s, _)| *s == slot) {
            entry.1 = texture;
        } else {
            self.textures.push((slot, texture));
        }
    }

    /// Set the blend mode
    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend_mode = mode;
    }

    /// Set the depth-test mode
    pub fn set_depth_test_mode(&mut self, mode: DepthTestMode) {
        self.depth_test_mode = mode;
    }

    /// Enable or disable depth writes
    pub fn set_depth_write(&mut self, enabled: bool) {
        self.depth_write = enabled;
    }

    /// The shader program
    #[must_use]
    pub fn program(&self) -> ProgramHandle {
        self.program
    }

    /// Bound texture slots
    #[must_use]
    pub fn textures(&self) -> &[(u32, TextureHandle)] {
        &self.textures
    }

    /// The blend mode
    #[must_use]
    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    /// The depth-test mode
    #[must_use]
    pub fn depth_test_mode(&self) -> DepthTestMode {
        self.depth_test_mode
    }

    /// Whether depth writes are enabled
    #[must_use]
    pub fn depth_write(&self) -> bool {
        self.depth_write
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_defaults() {
        let material = Material::new(ProgramHandle(7));

        assert_eq!(material.program(), ProgramHandle(7));
        assert_eq!(material.blend_mode(), BlendMode::None);
        assert_eq!(material.depth_test_mode(), DepthTestMode::Standard);
        assert!(material.depth_write());
        assert!(material.textures().is_empty());
    }

    #[test]
    fn test_set_texture_replaces_slot() {
        let mut material = Material::new(ProgramHandle(0));

        material.set_texture(0, TextureHandle(1));
        material.set_texture(1, TextureHandle(2));
        material.set_texture(0, TextureHandle(3));

        assert_eq!(material.textures(), &[(0, TextureHandle(3)), (1, TextureHandle(2))]);
    }
}
