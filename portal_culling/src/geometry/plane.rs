/// Oriented planes in Hessian normal form.

use glam::{Vec3, Vec4};

/// Normals shorter than this are treated as degenerate.
const DEGENERATE_EPSILON: f32 = 1e-6;

/// Plane `normal · p + distance = 0`.
///
/// Points with a positive signed distance are on the "inside" (visible)
/// half-space. A plane built from collinear points has a zero normal and
/// reports itself as degenerate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal pointing toward the positive half-space (zero if degenerate)
    pub normal: Vec3,
    /// Signed offset along the normal
    pub distance: f32,
}

impl Plane {
    /// Plane through three points. The normal is `(b - a) × (c - a)` normalized,
    /// so counter-clockwise points (seen from the positive side) face the viewer.
    pub fn from_points(a: Vec3, b: Vec3, c: Vec3) -> Self {
        let normal = (b - a).cross(c - a).normalize_or_zero();
        Self { normal, distance: -normal.dot(a) }
    }

    /// Plane through `point` with the given normal (normalized here).
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize_or_zero();
        Self { normal, distance: -normal.dot(point) }
    }

    /// Plane from a raw (A, B, C, D) row, normalized so (A, B, C) is unit length.
    pub fn from_vec4(v: Vec4) -> Self {
        let normal = v.truncate();
        let len = normal.length();
        if len > DEGENERATE_EPSILON {
            Self { normal: normal / len, distance: v.w / len }
        } else {
            Self { normal: Vec3::ZERO, distance: 0.0 }
        }
    }

    /// Signed distance from `point` to the plane
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }

    /// Same plane facing the other way
    pub fn flipped(&self) -> Self {
        Self { normal: -self.normal, distance: -self.distance }
    }

    /// Plane built from coincident or collinear points
    pub fn is_degenerate(&self) -> bool {
        self.normal.length_squared() < DEGENERATE_EPSILON * DEGENERATE_EPSILON
    }

    /// Box/plane test: `center·n + |n|·extents + d > 0`.
    ///
    /// True when some part of the box may lie on the positive side. Boxes
    /// that only touch the plane are rejected.
    pub fn admits_box(&self, center: Vec3, extents: Vec3) -> bool {
        self.normal.dot(center) + self.normal.abs().dot(extents) + self.distance > 0.0
    }
}

#[cfg(test)]
#[path = "plane_tests.rs"]
mod tests;
