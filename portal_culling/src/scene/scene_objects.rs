/// SceneObjects: renderables and lights whose visibility culling controls.
///
/// Uses SlotMaps for O(1) insert/remove with stable keys.
///
/// Visibility is reference counted: a renderable can be referenced by its
/// owning cell, by neighbouring cells (boundary objects) and by cells it
/// occludes a light for. It stays visible while at least one referencing
/// cell is visible. Lights work the same way with owning cells and cells
/// they illuminate from outside.

use glam::Vec3;
use rustc_hash::FxHashSet;
use slotmap::{new_key_type, SlotMap};
use crate::error::Result;
use crate::cull_bail;
use crate::geometry::AABB;

// ===== SLOT MAP KEYS =====

new_key_type! {
    /// Stable key for a renderable object
    pub struct RenderableKey;

    /// Stable key for a light
    pub struct LightKey;
}

// ===== RENDERABLE =====

/// A renderable object. Hidden renderables are skipped by the renderer,
/// never destroyed.
#[derive(Debug, Clone)]
pub struct Renderable {
    bounds: AABB,
    visible: bool,
    refs: u32,
}

impl Renderable {
    /// World-space bounds
    pub fn bounds(&self) -> &AABB {
        &self.bounds
    }

    /// Whether the renderer should draw this object
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Number of visible cells currently referencing this object
    pub fn visible_refs(&self) -> u32 {
        self.refs
    }
}

// ===== LIGHT =====

/// Shadow casting mode of a light
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightShadows {
    /// No shadows: the light leaks through walls
    None,
    /// Hard shadows
    Hard,
    /// Soft shadows
    Soft,
}

/// Light creation parameters
#[derive(Debug, Clone)]
pub struct LightDesc {
    /// World-space position
    pub position: Vec3,
    /// Range of influence
    pub range: f32,
    /// Shadow casting mode
    pub shadows: LightShadows,
    /// Shadow strength / dimmer in [0, 1]; below 1 the light leaks through geometry
    pub shadow_strength: f32,
    /// Shadows fade out with distance
    pub shadow_fade: bool,
}

impl Default for LightDesc {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            range: 10.0,
            shadows: LightShadows::Soft,
            shadow_strength: 1.0,
            shadow_fade: false,
        }
    }
}

/// A light whose enabled flag culling controls.
#[derive(Debug, Clone)]
pub struct Light {
    desc: LightDesc,
    enabled: bool,
    refs: u32,
}

impl Light {
    /// World-space position
    pub fn position(&self) -> Vec3 {
        self.desc.position
    }

    /// Range of influence
    pub fn range(&self) -> f32 {
        self.desc.range
    }

    /// Shadow casting mode
    pub fn shadows(&self) -> LightShadows {
        self.desc.shadows
    }

    /// Shadow strength in [0, 1]
    pub fn shadow_strength(&self) -> f32 {
        self.desc.shadow_strength
    }

    /// Whether shadows fade with distance
    pub fn shadow_fade(&self) -> bool {
        self.desc.shadow_fade
    }

    /// True when the light casts full-strength shadows, i.e. walls block it.
    pub fn casts_full_shadows(&self) -> bool {
        self.desc.shadows != LightShadows::None && self.desc.shadow_strength >= 1.0
    }

    /// Bounds of the light's sphere of influence
    pub fn bounds(&self) -> AABB {
        let r = Vec3::splat(self.desc.range.max(0.0));
        AABB { min: self.desc.position - r, max: self.desc.position + r }
    }

    /// Whether the renderer should use this light
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of visible cells currently referencing this light
    pub fn visible_refs(&self) -> u32 {
        self.refs
    }
}

// ===== SCENE OBJECTS =====

/// Storage for all culling-controlled objects of a level.
pub struct SceneObjects {
    renderables: SlotMap<RenderableKey, Renderable>,
    lights: SlotMap<LightKey, Light>,
    /// Renderables whose visible flag changed since last take_changed_renderables()
    changed_renderables: FxHashSet<RenderableKey>,
    /// Lights whose enabled flag changed since last take_changed_lights()
    changed_lights: FxHashSet<LightKey>,
}

impl SceneObjects {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            renderables: SlotMap::with_key(),
            lights: SlotMap::with_key(),
            changed_renderables: FxHashSet::default(),
            changed_lights: FxHashSet::default(),
        }
    }

    // ===== RENDERABLES =====

    /// Add a visible renderable with the given world bounds
    pub fn add_renderable(&mut self, bounds: AABB) -> RenderableKey {
        self.renderables.insert(Renderable { bounds, visible: true, refs: 0 })
    }

    /// Remove a renderable. Returns false if the key is invalid.
    pub fn remove_renderable(&mut self, key: RenderableKey) -> bool {
        self.changed_renderables.remove(&key);
        self.renderables.remove(key).is_some()
    }

    /// Get a renderable by key
    pub fn renderable(&self, key: RenderableKey) -> Option<&Renderable> {
        self.renderables.get(key)
    }

    /// Iterate over all renderables
    pub fn renderables(&self) -> impl Iterator<Item = (RenderableKey, &Renderable)> {
        self.renderables.iter()
    }

    /// Number of renderables
    pub fn renderable_count(&self) -> usize {
        self.renderables.len()
    }

    /// Update the bounds of a renderable (e.g. a moved dynamic object)
    pub fn set_renderable_bounds(&mut self, key: RenderableKey, bounds: AABB) -> Result<()> {
        match self.renderables.get_mut(key) {
            Some(renderable) => {
                renderable.bounds = bounds;
                Ok(())
            }
            None => cull_bail!(InvalidKey, "portal_culling::SceneObjects",
                "set_renderable_bounds: unknown renderable {:?}", key),
        }
    }

    /// Set the visible flag directly. Returns true if the flag changed.
    ///
    /// Used for dynamic objects, which are not reference counted. An object
    /// listed by a tile is driven by its cell and must not also be tracked
    /// as dynamic.
    pub fn set_renderable_visible(&mut self, key: RenderableKey, visible: bool) -> bool {
        match self.renderables.get_mut(key) {
            Some(renderable) if renderable.visible != visible => {
                renderable.visible = visible;
                self.changed_renderables.insert(key);
                true
            }
            _ => false,
        }
    }

    /// A referencing cell became visible.
    pub(crate) fn acquire_renderable(&mut self, key: RenderableKey) {
        let became_visible = match self.renderables.get_mut(key) {
            Some(renderable) => {
                renderable.refs += 1;
                renderable.refs == 1
            }
            None => false,
        };
        if became_visible {
            self.set_renderable_visible(key, true);
        }
    }

    /// A referencing cell became hidden.
    pub(crate) fn release_renderable(&mut self, key: RenderableKey) {
        let became_hidden = match self.renderables.get_mut(key) {
            Some(renderable) if renderable.refs > 0 => {
                renderable.refs -= 1;
                renderable.refs == 0
            }
            _ => false,
        };
        if became_hidden {
            self.set_renderable_visible(key, false);
        }
    }

    // ===== LIGHTS =====

    /// Add an enabled light
    pub fn add_light(&mut self, desc: LightDesc) -> LightKey {
        self.lights.insert(Light { desc, enabled: true, refs: 0 })
    }

    /// Remove a light. Returns false if the key is invalid.
    pub fn remove_light(&mut self, key: LightKey) -> bool {
        self.changed_lights.remove(&key);
        self.lights.remove(key).is_some()
    }

    /// Get a light by key
    pub fn light(&self, key: LightKey) -> Option<&Light> {
        self.lights.get(key)
    }

    /// Iterate over all lights
    pub fn lights(&self) -> impl Iterator<Item = (LightKey, &Light)> {
        self.lights.iter()
    }

    /// Number of lights
    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// Move a light (dynamic lights)
    pub fn set_light_position(&mut self, key: LightKey, position: Vec3) -> Result<()> {
        match self.lights.get_mut(key) {
            Some(light) => {
                light.desc.position = position;
                Ok(())
            }
            None => cull_bail!(InvalidKey, "portal_culling::SceneObjects",
                "set_light_position: unknown light {:?}", key),
        }
    }

    /// Set the enabled flag directly. Returns true if the flag changed.
    pub fn set_light_enabled(&mut self, key: LightKey, enabled: bool) -> bool {
        match self.lights.get_mut(key) {
            Some(light) if light.enabled != enabled => {
                light.enabled = enabled;
                self.changed_lights.insert(key);
                true
            }
            _ => false,
        }
    }

    /// A referencing cell became visible.
    pub(crate) fn acquire_light(&mut self, key: LightKey) {
        let became_enabled = match self.lights.get_mut(key) {
            Some(light) => {
                light.refs += 1;
                light.refs == 1
            }
            None => false,
        };
        if became_enabled {
            self.set_light_enabled(key, true);
        }
    }

    /// A referencing cell became hidden.
    pub(crate) fn release_light(&mut self, key: LightKey) {
        let became_disabled = match self.lights.get_mut(key) {
            Some(light) if light.refs > 0 => {
                light.refs -= 1;
                light.refs == 0
            }
            _ => false,
        };
        if became_disabled {
            self.set_light_enabled(key, false);
        }
    }

    // ===== LIFECYCLE =====

    /// Make every object visible and drop all reference counts.
    ///
    /// Called before a cell graph is (re)built so nothing stays hidden
    /// by a graph that no longer exists.
    pub fn reset_visibility(&mut self) {
        for (key, renderable) in self.renderables.iter_mut() {
            renderable.refs = 0;
            if !renderable.visible {
                renderable.visible = true;
                self.changed_renderables.insert(key);
            }
        }
        for (key, light) in self.lights.iter_mut() {
            light.refs = 0;
            if !light.enabled {
                light.enabled = true;
                self.changed_lights.insert(key);
            }
        }
    }

    /// Take and clear the set of renderables whose visible flag changed.
    pub fn take_changed_renderables(&mut self) -> FxHashSet<RenderableKey> {
        std::mem::take(&mut self.changed_renderables)
    }

    /// Take and clear the set of lights whose enabled flag changed.
    pub fn take_changed_lights(&mut self) -> FxHashSet<LightKey> {
        std::mem::take(&mut self.changed_lights)
    }

    /// Remove all objects
    pub fn clear(&mut self) {
        self.renderables.clear();
        self.lights.clear();
        self.changed_renderables.clear();
        self.changed_lights.clear();
    }
}

impl Default for SceneObjects {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "scene_objects_tests.rs"]
mod tests;
