//! Bounding volumes and frustum visibility tests
//!
//! Provides the spatial primitives for scene visibility: bounding spheres
//! computed once per mesh, half-space planes, and the five-plane camera
//! frustum. The frustum intentionally has no far plane, matching the
//! renderer it was extracted from.
//!
//! All tests are conservative: a sphere that straddles a plane is treated
//! as visible. False positives (drawing an off-screen mesh) are acceptable;
//! false negatives (culling a visible mesh) are not.

use crate::foundation::math::{Mat4, Mat4Ext, Vec3};
use crate::render::primitives::Camera;

/// Plane defined by normal and distance from origin
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    /// Normal vector (normalized on construction)
    pub normal: Vec3,
    /// Distance from origin along the normal
    pub distance: f32,
}

impl Plane {
    /// Create a new plane from normal and distance
    #[must_use]
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self {
            normal: normal.normalize(),
            distance,
        }
    }

    /// Create a plane passing through a point with the given normal
    #[must_use]
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize();
        Self {
            normal,
            distance: -normal.dot(&point),
        }
    }

    /// Calculate signed distance from plane to point
    #[must_use]
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(&point) + self.distance
    }
}

/// Conservative spherical bound of a mesh's spatial extent
#[derive(Debug, Clone, Copy)]
pub struct BoundingSphere {
    /// Sphere center
    pub center: Vec3,
    /// Sphere radius (always >= 0)
    pub radius: f32,
}

impl BoundingSphere {
    /// Compute the sphere enclosing a set of positions
    ///
    /// Single linear scan: per-axis min/max, center at the box midpoint,
    /// radius to the farthest box corner. Over-approximates the minimal
    /// enclosing sphere but is conservative and O(n).
    ///
    /// # Panics
    /// Panics on an empty position set (programmer error).
    pub fn enclosing<I>(positions: I) -> Self
    where
        I: IntoIterator<Item = [f32; 3]>,
    {
        let mut iter = positions.into_iter();
        let first = iter.next();
        assert!(first.is_some(), "bounding sphere of an empty position set");

        let first = Vec3::from(first.unwrap());
        let mut min = first;
        let mut max = first;

        for position in iter {
            let p = Vec3::from(position);
            min = min.inf(&p);
            max = max.sup(&p);
        }

        let center = (min + max) * 0.5;
        Self {
            center,
            radius: (max - center).norm(),
        }
    }

    /// Whether a point lies inside the sphere (with a small tolerance)
    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        (point - self.center).norm() <= self.radius + 1e-4
    }

    /// The sphere transformed by a world matrix
    ///
    /// The center is mapped through the matrix; the radius is scaled by the
    /// largest column norm, which stays conservative under non-uniform
    /// scale.
    #[must_use]
    pub fn transformed(&self, world: &Mat4) -> Self {
        let scale_x = Vec3::new(world.m11, world.m21, world.m31).norm();
        let scale_y = Vec3::new(world.m12, world.m22, world.m32).norm();
        let scale_z = Vec3::new(world.m13, world.m23, world.m33).norm();

        Self {
            center: world.transform_point3(self.center),
            radius: self.radius * scale_x.max(scale_y).max(scale_z),
        }
    }
}

/// Frustum for visibility culling
///
/// Five outward-tested half-space planes: near, top, bottom, left, right.
/// There is no far plane: distant geometry is never culled by distance.
#[derive(Debug, Clone)]
pub struct Frustum {
    /// The five planes, all passing through the camera position
    pub planes: [Plane; 5],
}

impl Frustum {
    /// Build the world-space frustum of a perspective camera
    #[must_use]
    pub fn from_camera(camera: &Camera) -> Self {
        let forward = camera.forward();
        let right = camera.right();
        let up = right.cross(&forward);

        let half_v = camera.fov * 0.5;
        let half_h = (half_v.tan() * camera.aspect).atan();
        let (sin_v, cos_v) = half_v.sin_cos();
        let (sin_h, cos_h) = half_h.sin_cos();

        // Each normal points into the visible volume; boundary directions
        // crossed with the frame axes yield unit normals directly.
        let origin = camera.position;
        let planes = [
            Plane::from_point_normal(origin, forward),
            Plane::from_point_normal(origin, (forward * cos_v + up * sin_v).cross(&right)),
            Plane::from_point_normal(origin, right.cross(&(forward * cos_v - up * sin_v))),
            Plane::from_point_normal(origin, (forward * cos_h - right * sin_h).cross(&up)),
            Plane::from_point_normal(origin, up.cross(&(forward * cos_h + right * sin_h))),
        ];

        Self { planes }
    }

    /// Conservative sphere-vs-frustum visibility test
    ///
    /// Visible iff for every plane the sphere is not entirely on the
    /// outside: `distance(center) > -radius`.
    #[must_use]
    pub fn intersects_sphere(&self, sphere: &BoundingSphere) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(sphere.center) > -sphere.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn test_camera() -> Camera {
        // At (0, 0, 5), looking down -Z, 90 degree square frustum
        Camera::perspective(Vec3::new(0.0, 0.0, 5.0), 90.0, 1.0, 0.1, 100.0)
    }

    #[test]
    fn test_plane_distance_to_point() {
        let plane = Plane::from_point_normal(Vec3::new(0.0, 2.0, 0.0), Vec3::y());

        assert_relative_eq!(plane.distance_to_point(Vec3::new(0.0, 5.0, 0.0)), 3.0);
        assert_relative_eq!(plane.distance_to_point(Vec3::new(7.0, 2.0, -3.0)), 0.0);
        assert_relative_eq!(plane.distance_to_point(Vec3::zeros()), -2.0);
    }

    #[test]
    fn test_frustum_planes_are_unit_length() {
        let frustum = test_camera().frustum();
        for plane in &frustum.planes {
            assert_relative_eq!(plane.normal.norm(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_sphere_fully_inside_is_visible() {
        let frustum = test_camera().frustum();
        let sphere = BoundingSphere {
            center: Vec3::zeros(),
            radius: 1.0,
        };

        assert!(frustum.intersects_sphere(&sphere));
    }

    #[test]
    fn test_sphere_behind_camera_is_culled() {
        let frustum = test_camera().frustum();
        let sphere = BoundingSphere {
            center: Vec3::new(0.0, 0.0, 20.0),
            radius: 1.0,
        };

        assert!(!frustum.intersects_sphere(&sphere));
    }

    #[test]
    fn test_sphere_outside_side_plane_is_culled() {
        let frustum = test_camera().frustum();
        let sphere = BoundingSphere {
            center: Vec3::new(100.0, 0.0, 5.0),
            radius: 1.0,
        };

        assert!(!frustum.intersects_sphere(&sphere));
    }

    #[test]
    fn test_sphere_straddling_plane_is_visible() {
        let frustum = test_camera().frustum();
        // Centered exactly on the near plane boundary
        let sphere = BoundingSphere {
            center: Vec3::new(0.0, 0.0, 5.0),
            radius: 1.0,
        };

        assert!(frustum.intersects_sphere(&sphere));
    }

    #[test]
    fn test_no_far_plane() {
        let frustum = test_camera().frustum();
        // Far beyond the camera's far distance, still straight ahead
        let sphere = BoundingSphere {
            center: Vec3::new(0.0, 0.0, -100_000.0),
            radius: 1.0,
        };

        assert!(frustum.intersects_sphere(&sphere));
    }

    #[test]
    fn test_enclosing_contains_all_points() {
        let points = [
            [1.0, 0.0, 0.0],
            [-3.0, 2.0, 5.0],
            [0.5, -4.0, 1.0],
            [2.0, 2.0, 2.0],
        ];
        let sphere = BoundingSphere::enclosing(points);

        for p in points {
            assert!(sphere.contains(Vec3::from(p)));
        }
        assert!(sphere.radius >= 0.0);
    }

    #[test]
    fn test_transformed_sphere_translates_center() {
        let sphere = BoundingSphere {
            center: Vec3::zeros(),
            radius: 2.0,
        };
        let world = Mat4::new_translation(&Vec3::new(10.0, 0.0, 0.0));
        let moved = sphere.transformed(&world);

        assert_relative_eq!(moved.center, Vec3::new(10.0, 0.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(moved.radius, 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_transformed_sphere_scales_radius_conservatively() {
        let sphere = BoundingSphere {
            center: Vec3::new(1.0, 0.0, 0.0),
            radius: 1.0,
        };
        let world = Mat4::new_nonuniform_scaling(&Vec3::new(2.0, 3.0, 0.5));
        let scaled = sphere.transformed(&world);

        assert_relative_eq!(scaled.center, Vec3::new(2.0, 0.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(scaled.radius, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_translated_object_is_not_wrongly_culled() {
        // A mesh-local sphere at the origin, instanced far to the side but
        // still on screen after transform
        let frustum = test_camera().frustum();
        let local = BoundingSphere {
            center: Vec3::zeros(),
            radius: 1.0,
        };
        let world = Mat4::new_translation(&Vec3::new(2.0, 0.0, 0.0));

        assert!(frustum.intersects_sphere(&local.transformed(&world)));
    }
}
