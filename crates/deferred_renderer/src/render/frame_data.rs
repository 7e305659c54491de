//! Per-frame GPU record layouts and fixed binding slots
//!
//! These structs are the wire contract between the renderer and the
//! lighting/shadow shaders. Layouts follow std140 rules with explicit
//! padding so the Rust structs can be uploaded byte-for-byte.
//!
//! ## Binding Slots
//! The lighting and shadow shaders depend on three fixed slots:
//! frame data (uniform) at 0, the point-light array (storage) at 1, and
//! the per-batch transform array (storage) at 2.

use crate::render::lighting::PointLight;
use bytemuck::{Pod, Zeroable};

/// Binding slot for the frame-data uniform buffer
pub const FRAME_DATA_SLOT: u32 = 0;

/// Binding slot for the point-light storage buffer
pub const POINT_LIGHT_SLOT: u32 = 1;

/// Binding slot for the per-batch transform storage buffer
pub const TRANSFORM_SLOT: u32 = 2;

/// Frame-global uniform record, rebuilt every frame
///
/// `sun_view_proj` always carries the sun's view-projection so the layout
/// is a single fixed contract; the lighting shader ignores it when no
/// shadow map is bound.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FrameData {
    /// Camera view-projection matrix
    pub camera_view_proj: [[f32; 4]; 4],

    /// Number of live point lights in the light buffer
    pub point_light_count: u32,

    /// std140 padding
    pub _pad0: [u32; 3],

    /// Sun color
    pub sun_color: [f32; 3],

    /// std140 padding
    pub _pad1: f32,

    /// Normalized sun direction
    pub sun_dir: [f32; 3],

    /// std140 padding
    pub _pad2: f32,

    /// Sun view-projection matrix for shadow sampling
    pub sun_view_proj: [[f32; 4]; 4],
}

/// Point-light storage record
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct GpuPointLight {
    /// Light position in world space
    pub position: [f32; 3],

    /// Attenuation cutoff radius
    pub radius: f32,

    /// Light color
    pub color: [f32; 3],

    /// std140/std430 padding
    pub _pad: f32,
}

impl From<&PointLight> for GpuPointLight {
    fn from(light: &PointLight) -> Self {
        Self {
            position: light.position.into(),
            radius: light.radius,
            color: light.color.into(),
            _pad: 0.0,
        }
    }
}
