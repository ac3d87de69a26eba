/// Viewpoint: low-level passive data container.
///
/// Apart from the convenience constructors, a Viewpoint computes nothing.
/// The caller sets position, matrices and frustum; the engine reads them.

use glam::{Mat4, Vec3};
use crate::geometry::Frustum;
use crate::graph::CellId;

/// One origin of visibility.
///
/// `cell_hint` is the cell the viewpoint was found in last time. The engine
/// checks it (and its neighbours) before scanning every cell.
#[derive(Debug, Clone)]
pub struct Viewpoint {
    position: Vec3,
    view_matrix: Mat4,
    projection_matrix: Mat4,
    frustum: Frustum,
    cell_hint: Option<CellId>,
}

impl Viewpoint {
    /// Create a viewpoint from precomputed values.
    pub fn new(position: Vec3, view: Mat4, projection: Mat4, frustum: Frustum) -> Self {
        Self {
            position,
            view_matrix: view,
            projection_matrix: projection,
            frustum,
            cell_hint: None,
        }
    }

    /// Create a viewpoint, extracting the frustum from `projection * view`.
    pub fn from_matrices(position: Vec3, view: Mat4, projection: Mat4) -> Self {
        let frustum = Frustum::from_view_projection(&(projection * view));
        Self::new(position, view, projection, frustum)
    }

    /// Right-handed look-at viewpoint at `eye` facing `target`.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3, projection: Mat4) -> Self {
        Self::from_matrices(eye, Mat4::look_at_rh(eye, target, up), projection)
    }

    /// Same viewpoint with a starting-cell hint
    pub fn with_cell_hint(mut self, cell: CellId) -> Self {
        self.cell_hint = Some(cell);
        self
    }

    // ===== GETTERS =====

    /// World-space origin of the view
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// View matrix (inverse of the viewpoint's world transform).
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    /// Projection matrix (perspective or orthographic).
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    /// Combined view-projection matrix (projection * view).
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix
    }

    /// Root frustum for culling.
    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    /// Last known containing cell
    pub fn cell_hint(&self) -> Option<CellId> {
        self.cell_hint
    }

    // ===== SETTERS (store only) =====

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn set_view(&mut self, matrix: Mat4) {
        self.view_matrix = matrix;
    }

    pub fn set_projection(&mut self, matrix: Mat4) {
        self.projection_matrix = matrix;
    }

    pub fn set_frustum(&mut self, frustum: Frustum) {
        self.frustum = frustum;
    }

    pub fn set_cell_hint(&mut self, cell: Option<CellId>) {
        self.cell_hint = cell;
    }
}

#[cfg(test)]
#[path = "viewpoint_tests.rs"]
mod tests;
