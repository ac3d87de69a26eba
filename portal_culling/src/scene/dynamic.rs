/// Dynamic objects: renderables and lights that move at runtime.
///
/// They are not part of any cell. The caller assigns each one to the cell
/// it currently occupies (or to no cell) and the engine derives its
/// visibility from the visible cells every pass.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::graph::{CellGraph, CellId};
use super::scene_objects::{LightKey, RenderableKey, SceneObjects};

#[derive(Debug, Clone, Default)]
pub struct DynamicBuckets {
    renderables: FxHashMap<RenderableKey, Option<CellId>>,
    lights: FxHashMap<LightKey, Option<CellId>>,
}

impl DynamicBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== RENDERABLES =====

    /// Assign a renderable to a cell. Returns true if it was not tracked yet.
    pub fn set_renderable_cell(&mut self, key: RenderableKey, cell: Option<CellId>) -> bool {
        self.renderables.insert(key, cell).is_none()
    }

    /// Stop tracking a renderable. Returns true if it was tracked.
    pub fn remove_renderable(&mut self, key: RenderableKey) -> bool {
        self.renderables.remove(&key).is_some()
    }

    /// Cell assigned to a tracked renderable (`Some(None)`: tracked, no cell)
    pub fn renderable_cell(&self, key: RenderableKey) -> Option<Option<CellId>> {
        self.renderables.get(&key).copied()
    }

    pub fn renderable_count(&self) -> usize {
        self.renderables.len()
    }

    // ===== LIGHTS =====

    /// Assign a light to a cell. Returns true if it was not tracked yet.
    pub fn set_light_cell(&mut self, key: LightKey, cell: Option<CellId>) -> bool {
        self.lights.insert(key, cell).is_none()
    }

    /// Stop tracking a light. Returns true if it was tracked.
    pub fn remove_light(&mut self, key: LightKey) -> bool {
        self.lights.remove(&key).is_some()
    }

    /// Cell assigned to a tracked light (`Some(None)`: tracked, no cell)
    pub fn light_cell(&self, key: LightKey) -> Option<Option<CellId>> {
        self.lights.get(&key).copied()
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    // ===== VISIBILITY =====

    /// Add renderables whose cell is visible, or that have no cell
    pub fn collect_visible_renderables(
        &self,
        visible_cells: &FxHashSet<CellId>,
        out: &mut FxHashSet<RenderableKey>,
    ) {
        out.extend(
            self.renderables.iter()
                .filter(|(_, cell)| cell.map_or(true, |c| visible_cells.contains(&c)))
                .map(|(key, _)| *key),
        );
    }

    /// Add lights whose cell is visible, that have no cell, or whose range
    /// touches a visible cell. Lights missing from `scene` are skipped.
    pub fn collect_visible_lights(
        &self,
        graph: &CellGraph,
        scene: &SceneObjects,
        visible_cells: &FxHashSet<CellId>,
        out: &mut FxHashSet<LightKey>,
    ) {
        for (&key, cell) in &self.lights {
            let Some(light) = scene.light(key) else { continue };
            let visible = match cell {
                None => true,
                Some(cell) if visible_cells.contains(cell) => true,
                Some(_) => visible_cells.iter()
                    .filter_map(|id| graph.cell(*id))
                    .any(|c| c.bounds().intersects_sphere(light.position(), light.range())),
            };
            if visible {
                out.insert(key);
            }
        }
    }

    /// Tracked renderables
    pub fn renderable_keys(&self) -> impl Iterator<Item = RenderableKey> + '_ {
        self.renderables.keys().copied()
    }

    /// Tracked lights
    pub fn light_keys(&self) -> impl Iterator<Item = LightKey> + '_ {
        self.lights.keys().copied()
    }

    /// Keep tracking everything but drop all cell assignments
    pub fn detach_all(&mut self) {
        self.renderables.values_mut().for_each(|cell| *cell = None);
        self.lights.values_mut().for_each(|cell| *cell = None);
    }

    /// Stop tracking everything
    pub fn clear(&mut self) {
        self.renderables.clear();
        self.lights.clear();
    }
}

#[cfg(test)]
#[path = "dynamic_tests.rs"]
mod tests;
