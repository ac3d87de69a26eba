/// Portals: rectangular apertures between two cells.
///
/// A portal is directed: it belongs to its source cell and points at its
/// target. Every connection in the level produces one portal per direction.

use glam::Vec3;
use crate::geometry::{AABB, Frustum, Plane};
use super::cell::CellId;

/// Parallelogram areas below this are zero-width apertures.
const AREA_EPSILON: f32 = 1e-6;

/// Origins closer than this to the portal plane do not narrow the view.
const ORIGIN_EPSILON: f32 = 1e-4;

/// Index of a portal in the graph arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortalId(pub u32);

impl PortalId {
    /// Arena index
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// How portal rectangles are obtained at build time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PortalBoundsMode {
    /// Use the rectangle authored on the connection
    #[default]
    Authored,
    /// Expand to the target cell's bounds projected onto the portal plane
    DeriveFromCell,
}

/// Directed aperture from one cell into another
#[derive(Debug, Clone)]
pub struct Portal {
    corners: [Vec3; 4],
    bounds: AABB,
    source: CellId,
    target: CellId,
}

impl Portal {
    pub(crate) fn new(source: CellId, target: CellId, corners: [Vec3; 4]) -> Self {
        let bounds = AABB::new(corners[0], corners[2])
            .union(&AABB::new(corners[1], corners[3]));
        Self { corners, bounds, source, target }
    }

    /// Corners A, B, C, D in cyclic order
    pub fn corners(&self) -> &[Vec3; 4] {
        &self.corners
    }

    /// Axis-aligned bounds of the rectangle
    pub fn bounds(&self) -> &AABB {
        &self.bounds
    }

    /// Cell this portal leads out of
    pub fn source(&self) -> CellId {
        self.source
    }

    /// Cell this portal leads into
    pub fn target(&self) -> CellId {
        self.target
    }

    /// Average of the four corners
    pub fn center(&self) -> Vec3 {
        self.corners.iter().copied().sum::<Vec3>() * 0.25
    }

    /// Area of the parallelogram spanned by AB and AD
    pub fn area(&self) -> f32 {
        let [a, b, _, d] = self.corners;
        (b - a).cross(d - a).length()
    }

    /// Zero-width aperture; nothing can be seen through it
    pub fn is_degenerate(&self) -> bool {
        self.area() < AREA_EPSILON
    }

    /// Volume visible from `origin` through this portal.
    ///
    /// One side plane per edge, each through the edge and the origin and
    /// facing the portal center, plus a near plane on the portal itself whose
    /// positive side is away from the origin. Side planes that collapse
    /// (origin collinear with an edge) are left out. When the origin lies on
    /// the portal plane no narrowing is possible and the unbounded frustum is
    /// returned.
    pub fn sub_frustum(&self, origin: Vec3) -> Frustum {
        let [a, b, c, d] = self.corners;
        let mut frustum = Frustum::unbounded();

        let near = Plane::from_points(a, b, d);
        if near.is_degenerate() {
            return frustum;
        }
        let origin_distance = near.signed_distance(origin);
        if origin_distance.abs() < ORIGIN_EPSILON {
            return frustum;
        }

        let center = self.center();
        for (p, q) in [(a, b), (b, c), (c, d), (d, a)] {
            let side = Plane::from_points(p, q, origin);
            if side.is_degenerate() {
                continue;
            }
            let side = if side.signed_distance(center) < 0.0 { side.flipped() } else { side };
            frustum.push(side);
        }

        frustum.push(if origin_distance > 0.0 { near.flipped() } else { near });
        frustum
    }
}

/// Largest rectangle on the portal's plane that fits `cell_bounds`.
///
/// The plane axis is the dominant axis of the authored rectangle's normal,
/// fixed at the rectangle's center. The two remaining axes span the cell's
/// extent. Degenerate rectangles are returned unchanged.
pub fn derive_corners_from_cell(authored: &[Vec3; 4], cell_bounds: &AABB) -> [Vec3; 4] {
    let [a, b, _, d] = *authored;
    let normal = (b - a).cross(d - a).abs();
    if normal.length_squared() < AREA_EPSILON * AREA_EPSILON {
        return *authored;
    }

    let axis = if normal.x >= normal.y && normal.x >= normal.z {
        0
    } else if normal.y >= normal.z {
        1
    } else {
        2
    };
    let u = (axis + 1) % 3;
    let v = (axis + 2) % 3;
    let plane_coord = (authored.iter().copied().sum::<Vec3>() * 0.25)[axis];

    let corner = |cu: f32, cv: f32| {
        let mut p = Vec3::ZERO;
        p[axis] = plane_coord;
        p[u] = cu;
        p[v] = cv;
        p
    };
    let (min, max) = (cell_bounds.min, cell_bounds.max);
    [
        corner(min[u], min[v]),
        corner(max[u], min[v]),
        corner(max[u], max[v]),
        corner(min[u], max[v]),
    ]
}

#[cfg(test)]
#[path = "portal_tests.rs"]
mod tests;
