//! Lighting types
//!
//! Point lights are plain value types owned by the scene in insertion
//! order. The directional sun is not a light object: it is a single global
//! direction stored on the scene, with a fixed white color.

use crate::foundation::math::Vec3;

/// Fixed sun color (unit white)
pub const SUN_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

/// Default sun direction before any call to `Scene::set_sun_direction`
pub const DEFAULT_SUN_DIRECTION: [f32; 3] = [0.2, 1.0, 0.1];

/// Point light with an attenuation cutoff radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    /// Light position in world space
    pub position: Vec3,

    /// Attenuation cutoff radius
    pub radius: f32,

    /// Light color (may exceed [0, 1] for HDR intensity)
    pub color: Vec3,
}

impl PointLight {
    /// Create a point light
    #[must_use]
    pub fn new(position: Vec3, radius: f32, color: Vec3) -> Self {
        Self {
            position,
            radius,
            color,
        }
    }
}
