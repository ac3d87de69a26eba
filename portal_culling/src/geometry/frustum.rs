/// Frustum: an ordered set of up to six half-space planes.
///
/// A volume is visible if it lies on the positive side of every plane.
/// View frustums extracted from a projection have all six planes;
/// portal sub-frustums have up to five (four sides plus the portal plane).
/// A frustum with no planes admits everything.

use glam::{Mat4, Vec3, Vec4};
use super::aabb::AABB;
use super::plane::Plane;

/// Maximum number of planes stored inline
pub const MAX_PLANES: usize = 6;

/// Frustum plane indices (view frustums only)
pub const PLANE_LEFT: usize = 0;
pub const PLANE_RIGHT: usize = 1;
pub const PLANE_BOTTOM: usize = 2;
pub const PLANE_TOP: usize = 3;
pub const PLANE_NEAR: usize = 4;
pub const PLANE_FAR: usize = 5;

const UNUSED_PLANE: Plane = Plane { normal: Vec3::ZERO, distance: 0.0 };

/// Inline plane set, cheap to copy into traversal stack frames.
#[derive(Debug, Clone, Copy)]
pub struct Frustum {
    planes: [Plane; MAX_PLANES],
    len: usize,
}

impl Frustum {
    /// Frustum with no planes (admits everything)
    pub const fn unbounded() -> Self {
        Self { planes: [UNUSED_PLANE; MAX_PLANES], len: 0 }
    }

    /// Build from a plane slice. Planes beyond MAX_PLANES are ignored.
    pub fn from_planes(planes: &[Plane]) -> Self {
        let mut frustum = Self::unbounded();
        for plane in planes {
            frustum.push(*plane);
        }
        frustum
    }

    /// Append a plane. Returns false when the frustum is already full.
    pub fn push(&mut self, plane: Plane) -> bool {
        if self.len == MAX_PLANES {
            return false;
        }
        self.planes[self.len] = plane;
        self.len += 1;
        true
    }

    /// Active planes
    pub fn planes(&self) -> &[Plane] {
        &self.planes[..self.len]
    }

    /// Number of active planes
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the frustum has no planes
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Extract frustum planes from a view-projection matrix.
    ///
    /// Uses the Gribb & Hartmann method. Works for both perspective
    /// and orthographic projections. Planes are ordered left, right,
    /// bottom, top, near, far with normals pointing inward.
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let m = vp.to_cols_array_2d();

        let rows = [
            // Left:   row3 + row0
            Vec4::new(m[0][3] + m[0][0], m[1][3] + m[1][0], m[2][3] + m[2][0], m[3][3] + m[3][0]),
            // Right:  row3 - row0
            Vec4::new(m[0][3] - m[0][0], m[1][3] - m[1][0], m[2][3] - m[2][0], m[3][3] - m[3][0]),
            // Bottom: row3 + row1
            Vec4::new(m[0][3] + m[0][1], m[1][3] + m[1][1], m[2][3] + m[2][1], m[3][3] + m[3][1]),
            // Top:    row3 - row1
            Vec4::new(m[0][3] - m[0][1], m[1][3] - m[1][1], m[2][3] - m[2][1], m[3][3] - m[3][1]),
            // Near:   row3 + row2
            Vec4::new(m[0][3] + m[0][2], m[1][3] + m[1][2], m[2][3] + m[2][2], m[3][3] + m[3][2]),
            // Far:    row3 - row2
            Vec4::new(m[0][3] - m[0][2], m[1][3] - m[1][2], m[2][3] - m[2][2], m[3][3] - m[3][2]),
        ];

        let mut frustum = Self::unbounded();
        for row in rows {
            frustum.push(Plane::from_vec4(row));
        }
        frustum
    }

    /// Test if an AABB may be visible through this frustum.
    ///
    /// For every plane, `center·normal + |normal|·extents + distance` must be
    /// strictly positive. Conservative: may keep a box that is actually
    /// outside near a frustum corner, never rejects a visible one.
    pub fn intersects_aabb(&self, aabb: &AABB) -> bool {
        let center = aabb.center();
        let extents = aabb.extents();
        self.planes().iter().all(|plane| plane.admits_box(center, extents))
    }

    /// Test if a point lies strictly inside every plane.
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes().iter().all(|plane| plane.signed_distance(point) > 0.0)
    }
}

impl Default for Frustum {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Batch test: true if `aabb` passes every frustum in `frustums`.
///
/// Used to check a portal against the whole chain of sub-frustums
/// accumulated along a traversal path.
pub fn intersects_all<'a, I>(frustums: I, aabb: &AABB) -> bool
where
    I: IntoIterator<Item = &'a Frustum>,
{
    frustums.into_iter().all(|frustum| frustum.intersects_aabb(aabb))
}

#[cfg(test)]
#[path = "frustum_tests.rs"]
mod tests;
