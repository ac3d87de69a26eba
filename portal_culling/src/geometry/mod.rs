//! Geometry primitives: bounding boxes, planes and frustums.
//!
//! Everything here is plain `Copy` data. Frustums hold their planes inline
//! so traversal stack frames can store them by value without allocating.

mod aabb;
mod plane;
mod frustum;

pub use aabb::AABB;
pub use plane::Plane;
pub use frustum::{
    Frustum, intersects_all, MAX_PLANES,
    PLANE_LEFT, PLANE_RIGHT, PLANE_BOTTOM, PLANE_TOP, PLANE_NEAR, PLANE_FAR,
};
