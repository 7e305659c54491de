//! Sun shadow-map matrix construction
//!
//! The directional sun renders scene depth through an orthographic box
//! that follows the camera. The box is symmetric in world units
//! (configurable half-extent and half-depth), projected with a
//! reversed-depth remap, and viewed from one unit along the sun direction
//! looking back at the camera position.

use crate::config::RendererConfig;
use crate::foundation::math::{Mat4, Mat4Ext, Vec3};
use crate::render::primitives::Camera;

/// Build the sun's view-projection matrix for the shadow depth pass
///
/// The up vector is the projection of world-up onto the plane orthogonal
/// to the sun direction (a double cross product), which stays well-defined
/// for near-vertical suns; an exactly vertical sun falls back to world Z.
#[must_use]
pub fn sun_view_projection(camera: &Camera, sun_direction: Vec3, config: &RendererConfig) -> Mat4 {
    let sun_dir = sun_direction.normalize();

    let mut up = sun_dir.cross(&Vec3::y().cross(&sun_dir));
    if up.norm_squared() < 1e-8 {
        up = Vec3::z();
    } else {
        up = up.normalize();
    }

    let eye = camera.position + sun_dir;
    let view = Mat4::look_at(eye, camera.position, up);

    let extent = config.shadow_extent;
    let depth = config.shadow_depth;
    let projection = Mat4::reverse_depth()
        * Mat4::orthographic(-extent, extent, -extent, extent, -depth, depth);

    projection * view
}
