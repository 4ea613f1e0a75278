//! Rays and the ray/triangle and ray/sphere tests behind picking.

use glam::{Mat4, Vec2, Vec3};

use crate::scene::BoundingSphere;

/// Half-line with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

/// Result of a ray/triangle test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    /// Ray parameter (distance along a unit-direction ray).
    pub t: f32,
    /// Barycentric weight of the second vertex.
    pub u: f32,
    /// Barycentric weight of the third vertex.
    pub v: f32,
}

impl TriangleHit {
    /// Interpolate per-vertex UVs at the hit point.
    #[must_use]
    pub fn interpolate_uv(&self, uvs: [Vec2; 3]) -> Vec2 {
        uvs[0] * (1.0 - self.u - self.v) + uvs[1] * self.u + uvs[2] * self.v
    }
}

impl Ray {
    /// Ray from `origin` along `direction` (normalized here).
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or(Vec3::NEG_Z),
        }
    }

    /// Point at parameter `t`.
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Transform the ray by an affine matrix.
    ///
    /// The direction is not renormalized so ray parameters stay comparable
    /// across spaces: a local-space hit at `t` is the world-space point
    /// `at(t)` of the original ray.
    #[must_use]
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        Self {
            origin: matrix.transform_point3(self.origin),
            direction: matrix.transform_vector3(self.direction),
        }
    }

    /// Whether the ray passes through `sphere` (at or ahead of the origin).
    #[must_use]
    pub fn intersects_sphere(&self, sphere: &BoundingSphere) -> bool {
        let to_center = sphere.center - self.origin;
        let len_sq = self.direction.length_squared().max(f32::EPSILON);
        let along = to_center.dot(self.direction) / len_sq;
        let r2 = sphere.radius * sphere.radius;
        if along < 0.0 {
            // Behind the origin: only a hit if the origin is inside
            return to_center.length_squared() <= r2;
        }
        let closest = self.origin + self.direction * along;
        closest.distance_squared(sphere.center) <= r2
    }

    /// Möller–Trumbore ray/triangle intersection, double-sided.
    ///
    /// Returns `None` for misses, parallel rays and hits behind the origin.
    #[must_use]
    pub fn intersect_triangle(&self, a: Vec3, b: Vec3, c: Vec3) -> Option<TriangleHit> {
        const EPS: f32 = 1e-7;
        let edge1 = b - a;
        let edge2 = c - a;
        let p = self.direction.cross(edge2);
        let det = edge1.dot(p);
        if det.abs() < EPS {
            return None;
        }
        let inv_det = 1.0 / det;
        let s = self.origin - a;
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let q = s.cross(edge1);
        let v = self.direction.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = edge2.dot(q) * inv_det;
        (t >= 0.0).then_some(TriangleHit { t, u, v })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hits_triangle_in_front() {
        let ray = Ray::new(Vec3::new(0.25, 0.25, 5.0), Vec3::NEG_Z);
        let hit = ray
            .intersect_triangle(Vec3::ZERO, Vec3::X, Vec3::Y)
            .unwrap();
        approx::assert_relative_eq!(hit.t, 5.0, epsilon = 1e-5);
        approx::assert_relative_eq!(hit.u, 0.25, epsilon = 1e-5);
        approx::assert_relative_eq!(hit.v, 0.25, epsilon = 1e-5);
    }

    #[test]
    fn back_faces_are_hit_too() {
        let ray = Ray::new(Vec3::new(0.25, 0.25, -5.0), Vec3::Z);
        assert!(ray.intersect_triangle(Vec3::ZERO, Vec3::X, Vec3::Y).is_some());
    }

    #[test]
    fn misses_outside_and_behind() {
        let outside = Ray::new(Vec3::new(2.0, 2.0, 5.0), Vec3::NEG_Z);
        assert!(outside.intersect_triangle(Vec3::ZERO, Vec3::X, Vec3::Y).is_none());
        let behind = Ray::new(Vec3::new(0.25, 0.25, 5.0), Vec3::Z);
        assert!(behind.intersect_triangle(Vec3::ZERO, Vec3::X, Vec3::Y).is_none());
    }

    #[test]
    fn sphere_test() {
        let sphere = BoundingSphere {
            center: Vec3::new(0.0, 0.0, -10.0),
            radius: 1.0,
        };
        assert!(Ray::new(Vec3::ZERO, Vec3::NEG_Z).intersects_sphere(&sphere));
        assert!(!Ray::new(Vec3::ZERO, Vec3::Z).intersects_sphere(&sphere));
        assert!(!Ray::new(Vec3::new(3.0, 0.0, 0.0), Vec3::NEG_Z).intersects_sphere(&sphere));
    }

    #[test]
    fn uv_interpolation() {
        let hit = TriangleHit { t: 1.0, u: 0.5, v: 0.5 };
        let uv = hit.interpolate_uv([Vec2::ZERO, Vec2::X, Vec2::Y]);
        assert!(uv.abs_diff_eq(Vec2::new(0.5, 0.5), 1e-6));
    }
}
