/// Axis-aligned bounding boxes in world space.

use glam::Vec3;

/// Axis-Aligned Bounding Box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner (x, y, z)
    pub min: Vec3,
    /// Maximum corner (x, y, z)
    pub max: Vec3,
}

impl AABB {
    /// Create a box from two corners (component order is normalized).
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self { min: a.min(b), max: a.max(b) }
    }

    /// Smallest box enclosing all `points`. Returns None for an empty slice.
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut min = *first;
        let mut max = *first;
        for p in rest {
            min = min.min(*p);
            max = max.max(*p);
        }
        Some(Self { min, max })
    }

    /// Center point of the box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half-size along each axis
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Full size along each axis
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Copy of this box moved inward by `margin` on every side.
    ///
    /// Axes thinner than `2 * margin` collapse onto their center instead of
    /// inverting.
    pub fn shrunk(&self, margin: f32) -> AABB {
        let center = self.center();
        let half = (self.extents() - Vec3::splat(margin)).max(Vec3::ZERO);
        AABB { min: center - half, max: center + half }
    }

    /// Union of two boxes
    pub fn union(&self, other: &AABB) -> AABB {
        AABB { min: self.min.min(other.min), max: self.max.max(other.max) }
    }

    /// Test if this AABB fully contains another AABB.
    pub fn contains(&self, other: &AABB) -> bool {
        self.min.x <= other.min.x && self.max.x >= other.max.x
        && self.min.y <= other.min.y && self.max.y >= other.max.y
        && self.min.z <= other.min.z && self.max.z >= other.max.z
    }

    /// Test if a point lies inside or on the boundary.
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Distance from `point` to the nearest face: positive inside, negative
    /// outside along the worst axis.
    pub fn depth_of(&self, point: Vec3) -> f32 {
        (point - self.min).min(self.max - point).min_element()
    }

    /// Test if this AABB intersects (overlaps or touches) another AABB.
    pub fn intersects(&self, other: &AABB) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x
        && self.min.y <= other.max.y && self.max.y >= other.min.y
        && self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Test if the sphere (`center`, `radius`) touches this box.
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        let closest = center.clamp(self.min, self.max);
        closest.distance_squared(center) <= radius * radius
    }

    /// Volume (zero for flat boxes)
    pub fn volume(&self) -> f32 {
        let s = self.size();
        s.x * s.y * s.z
    }
}

#[cfg(test)]
#[path = "aabb_tests.rs"]
mod tests;
