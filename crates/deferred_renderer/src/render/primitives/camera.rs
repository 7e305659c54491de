//! # 3D Camera System
//!
//! Perspective camera with view/projection matrix generation and frustum
//! extraction for culling.
//!
//! ## Coordinate System
//! Right-handed, Y-up world space; view space looks down -Z. Projection
//! matrices map depth to the [0, 1] clip range.

use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};
use crate::scene::culling::Frustum;

/// 3D camera for perspective projections
///
/// Matrix calculations are performed on demand rather than cached; for
/// static cameras the caller may cache the results.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,

    /// Field of view angle in radians (vertical)
    pub fov: f32,

    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance to the near clipping plane
    pub near: f32,

    /// Distance to the far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a perspective camera looking at the origin with Y-up
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Vertical field of view in degrees
    /// * `aspect` - Viewport aspect ratio (width / height)
    /// * `near` - Near plane distance (must be > 0)
    /// * `far` - Far plane distance (must be > near)
    #[must_use]
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::y(),
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Update the camera position in world space
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Update the camera target (look-at point)
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Set the target point and up vector together
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        self.target = target;
        self.up = up;
    }

    /// Update the aspect ratio for viewport changes
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if (self.aspect - aspect).abs() > 0.01 {
            log::info!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect, aspect);
        }
        self.aspect = aspect;
    }

    /// Normalized view direction from position toward target
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }

    /// Normalized right vector of the camera frame
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.forward().cross(&self.up).normalize()
    }

    /// View matrix transforming world space to camera space
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.target, self.up)
    }

    /// Perspective projection matrix with [0, 1] depth
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov, self.aspect, self.near, self.far)
    }

    /// Combined view-projection matrix
    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Extract the five-plane world-space culling frustum
    ///
    /// The far plane is intentionally absent; see
    /// [`Frustum`](crate::scene::culling::Frustum).
    #[must_use]
    pub fn frustum(&self) -> Frustum {
        Frustum::from_camera(self)
    }
}

impl Default for Camera {
    /// Perspective camera above and behind the origin, looking at it
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 3.0, 3.0),
            target: Vec3::zeros(),
            up: Vec3::y(),
            fov: std::f32::consts::FRAC_PI_4,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_camera_frame_is_orthonormal() {
        let camera = Camera::perspective(Vec3::new(4.0, 2.0, -7.0), 60.0, 1.5, 0.1, 500.0);

        let forward = camera.forward();
        let right = camera.right();

        assert_relative_eq!(forward.norm(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(right.norm(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(forward.dot(&right), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_view_projection_centers_target() {
        let camera = Camera::perspective(Vec3::new(0.0, 0.0, 10.0), 45.0, 1.0, 0.1, 100.0);
        let view_proj = camera.view_projection_matrix();

        // The target projects to the center of the viewport
        let clip = view_proj * crate::foundation::math::Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(clip.x / clip.w, 0.0, epsilon = 1e-5);
        assert_relative_eq!(clip.y / clip.w, 0.0, epsilon = 1e-5);
    }
}
