/// Per-cell visible state and its effect on scene objects.
///
/// Showing a cell acquires every renderable and light it references;
/// hiding releases them. Objects shared between cells stay visible while
/// any referencing cell is visible.

use crate::graph::{CellGraph, CellId};
use crate::scene::SceneObjects;

#[derive(Debug, Clone, Default)]
pub struct CellVisibility {
    visible: Vec<bool>,
}

impl CellVisibility {
    /// State with no cells
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark every cell of `graph` visible and acquire everything it
    /// references. Expects `scene` reference counts to be reset.
    pub fn all_visible(graph: &CellGraph, scene: &mut SceneObjects) -> Self {
        for (_, cell) in graph.cells() {
            for key in cell.referenced_renderables() {
                scene.acquire_renderable(key);
            }
            for key in cell.referenced_lights() {
                scene.acquire_light(key);
            }
        }
        Self { visible: vec![true; graph.cell_count()] }
    }

    /// Whether `cell` is currently shown
    pub fn is_visible(&self, cell: CellId) -> bool {
        self.visible.get(cell.index()).copied().unwrap_or(false)
    }

    /// Number of cells tracked
    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Show or hide a cell. Returns true when the state changed.
    ///
    /// Repeated calls with the same value do nothing. Always-visible cells
    /// refuse to be hidden.
    pub fn set_visible(
        &mut self,
        graph: &CellGraph,
        scene: &mut SceneObjects,
        id: CellId,
        visible: bool,
    ) -> bool {
        let (Some(state), Some(cell)) = (self.visible.get_mut(id.index()), graph.cell(id)) else {
            return false;
        };
        if *state == visible || (!visible && cell.is_always_visible()) {
            return false;
        }
        *state = visible;

        if visible {
            for key in cell.referenced_renderables() {
                scene.acquire_renderable(key);
            }
            for key in cell.referenced_lights() {
                scene.acquire_light(key);
            }
        } else {
            for key in cell.referenced_renderables() {
                scene.release_renderable(key);
            }
            for key in cell.referenced_lights() {
                scene.release_light(key);
            }
        }
        true
    }

    /// Forget every cell
    pub fn clear(&mut self) {
        self.visible.clear();
    }
}

#[cfg(test)]
#[path = "cell_visibility_tests.rs"]
mod tests;
