/// Culling engine: owns the cell graph and runs visibility passes.
///
/// One engine per independent consumer. All scratch state (traversal
/// stack, BFS buffers, visibility sets) lives in the instance; engines share
/// nothing but the global logger.
///
/// # Example
///
/// ```no_run
/// use portal_culling::culling::{CullingConfig, CullingEngine, SceneObjects, LevelDesc, Viewpoint};
/// use portal_culling::glam::{Mat4, Vec3};
///
/// # fn run(level: &LevelDesc, scene: &mut SceneObjects) -> portal_culling::culling::Result<()> {
/// let mut engine = CullingEngine::new(CullingConfig::default())?;
/// engine.on_graph_invalidated(level, scene)?;
///
/// let projection = Mat4::perspective_rh(1.2, 16.0 / 9.0, 0.1, 200.0);
/// let camera = Viewpoint::look_at(Vec3::new(2.0, 1.7, 5.0), Vec3::new(10.0, 1.7, 5.0), Vec3::Y, projection);
/// engine.update(&[camera], scene)?;
///
/// for key in scene.take_changed_renderables() {
///     // toggle the matching renderer
/// #   let _ = key;
/// }
/// # Ok(())
/// # }
/// ```

use rustc_hash::FxHashSet;

use crate::config::{CullingConfig, CullingMode};
use crate::error::Result;
use crate::graph::{CellGraph, CellId, LevelDesc};
use crate::scene::{DynamicBuckets, LightKey, RenderableKey, SceneObjects};
use crate::view::Viewpoint;
use crate::visibility::{
    CellCuller, CellVisibility, CullingStrategy, TraversalContext, VisibilityDiff,
};

const SOURCE: &str = "portal_culling::CullingEngine";

/// Summary of one visibility pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CullingStats {
    /// Cells visible after the pass
    pub visible_cells: usize,
    pub cells_shown: usize,
    pub cells_hidden: usize,
    /// Portals examined by traversals
    pub portals_tested: u32,
    /// Traversal branches cut at the depth limit
    pub depth_overflows: u32,
    pub dynamic_renderables_shown: usize,
    pub dynamic_renderables_hidden: usize,
    pub dynamic_lights_shown: usize,
    pub dynamic_lights_hidden: usize,
}

/// Per-level visibility engine.
///
/// Lifecycle:
/// 1. `new(config)`
/// 2. `on_graph_invalidated(level, scene)` after every level generation
/// 3. `update(viewpoints, scene)` once per frame
/// 4. `clear(scene)` when the level is unloaded
pub struct CullingEngine {
    config: CullingConfig,
    strategy: CullingStrategy,
    context: TraversalContext,
    graph: Option<CellGraph>,
    cell_state: CellVisibility,
    cells: VisibilityDiff<CellId>,
    dynamic: DynamicBuckets,
    dynamic_renderables: VisibilityDiff<RenderableKey>,
    dynamic_lights: VisibilityDiff<LightKey>,
    pending_frames: u32,
    last_stats: CullingStats,
}

impl CullingEngine {
    /// Create an engine with no graph
    pub fn new(config: CullingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            strategy: CullingStrategy::from_config(&config),
            context: TraversalContext::new(config.max_traversal_depth),
            config,
            graph: None,
            cell_state: CellVisibility::new(),
            cells: VisibilityDiff::new(),
            dynamic: DynamicBuckets::new(),
            dynamic_renderables: VisibilityDiff::new(),
            dynamic_lights: VisibilityDiff::new(),
            pending_frames: 0,
            last_stats: CullingStats::default(),
        })
    }

    // ===== GETTERS =====

    pub fn config(&self) -> &CullingConfig {
        &self.config
    }

    /// Active culling mode
    pub fn mode(&self) -> CullingMode {
        self.strategy.mode()
    }

    /// Current graph, if a level has been built
    pub fn graph(&self) -> Option<&CellGraph> {
        self.graph.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.graph.is_some()
    }

    /// Cells visible after the last pass (all cells right after a build)
    pub fn visible_cells(&self) -> &FxHashSet<CellId> {
        self.cells.visible()
    }

    /// Whether a cell's content is currently shown
    pub fn is_cell_visible(&self, cell: CellId) -> bool {
        self.cell_state.is_visible(cell)
    }

    /// Dynamic object assignments
    pub fn dynamic(&self) -> &DynamicBuckets {
        &self.dynamic
    }

    /// Statistics of the last pass
    pub fn last_stats(&self) -> CullingStats {
        self.last_stats
    }

    /// Cell containing `point` in the current graph
    pub fn locate(&self, point: glam::Vec3, hint: Option<CellId>) -> Option<CellId> {
        self.graph.as_ref().and_then(|graph| graph.locate(point, hint))
    }

    // ===== LIFECYCLE =====

    /// Discard the current graph and build one for `level`.
    ///
    /// Every scene object is made visible first. After the build every cell
    /// counts as visible, so the first pass only hides. Dynamic objects stay
    /// tracked but lose their cell assignment.
    ///
    /// On error the engine is left without a graph and everything visible.
    pub fn on_graph_invalidated(&mut self, level: &LevelDesc, scene: &mut SceneObjects) -> Result<()> {
        self.teardown(scene);
        self.dynamic.detach_all();
        for key in self.dynamic.renderable_keys() {
            self.dynamic_renderables.mark_visible(key);
        }
        for key in self.dynamic.light_keys() {
            self.dynamic_lights.mark_visible(key);
        }

        let graph = CellGraph::build(level, scene, &self.config)?;
        self.untrack_owned(&graph);
        self.cell_state = CellVisibility::all_visible(&graph, scene);
        for (id, _) in graph.cells() {
            self.cells.mark_visible(id);
        }
        self.graph = Some(graph);
        Ok(())
    }

    /// Drop the graph and all tracking; every scene object becomes visible.
    pub fn clear(&mut self, scene: &mut SceneObjects) {
        self.teardown(scene);
        self.dynamic.clear();
        crate::cull_debug!(SOURCE, "Cleared");
    }

    fn teardown(&mut self, scene: &mut SceneObjects) {
        scene.reset_visibility();
        self.graph = None;
        self.cell_state.clear();
        self.cells.clear();
        self.dynamic_renderables.clear();
        self.dynamic_lights.clear();
        self.context.take_stats();
        self.pending_frames = 0;
        self.last_stats = CullingStats::default();
    }

    // ===== PASSES =====

    /// Per-frame entry point.
    ///
    /// Runs a pass every `update_interval` calls (the first call always
    /// runs) and returns its statistics, or `None` for skipped frames.
    pub fn update(&mut self, viewpoints: &[Viewpoint], scene: &mut SceneObjects) -> Result<Option<CullingStats>> {
        if self.graph.is_none() {
            crate::cull_bail!(NotInitialized, SOURCE, "update called before on_graph_invalidated");
        }
        if self.pending_frames > 0 {
            self.pending_frames -= 1;
            return Ok(None);
        }
        self.cull_now(viewpoints, scene).map(Some)
    }

    /// Run a pass immediately and restart the interval.
    ///
    /// With no viewpoints nothing changes: the previous visible set is kept.
    pub fn cull_now(&mut self, viewpoints: &[Viewpoint], scene: &mut SceneObjects) -> Result<CullingStats> {
        let Some(graph) = self.graph.as_ref() else {
            crate::cull_bail!(NotInitialized, SOURCE, "cull_now called before on_graph_invalidated");
        };
        self.pending_frames = self.config.update_interval - 1;

        if viewpoints.is_empty() {
            crate::cull_debug!(SOURCE, "No viewpoints; visibility unchanged");
            self.last_stats = CullingStats { visible_cells: self.cells.visible().len(), ..Default::default() };
            return Ok(self.last_stats);
        }

        let current = self.cells.begin_pass();
        current.extend(graph.always_visible_cells().iter().copied());
        for viewpoint in viewpoints {
            let start = graph.locate(viewpoint.position(), viewpoint.cell_hint());
            self.strategy.cull(graph, viewpoint, start, &mut self.context, current);
        }

        let cell_state = &mut self.cell_state;
        let (cells_shown, cells_hidden) = self.cells.commit(|cell, visible| {
            cell_state.set_visible(graph, scene, cell, visible);
        });

        let visible_cells = self.cells.visible();
        let out = self.dynamic_renderables.begin_pass();
        self.dynamic.collect_visible_renderables(visible_cells, out);
        let (renderables_shown, renderables_hidden) = self.dynamic_renderables.commit(|key, visible| {
            scene.set_renderable_visible(key, visible);
        });

        let out = self.dynamic_lights.begin_pass();
        self.dynamic.collect_visible_lights(graph, scene, visible_cells, out);
        let (lights_shown, lights_hidden) = self.dynamic_lights.commit(|key, visible| {
            scene.set_light_enabled(key, visible);
        });

        let traversal = self.context.take_stats();
        self.last_stats = CullingStats {
            visible_cells: visible_cells.len(),
            cells_shown,
            cells_hidden,
            portals_tested: traversal.portals_tested,
            depth_overflows: traversal.depth_overflows,
            dynamic_renderables_shown: renderables_shown,
            dynamic_renderables_hidden: renderables_hidden,
            dynamic_lights_shown: lights_shown,
            dynamic_lights_hidden: lights_hidden,
        };
        crate::cull_debug!(SOURCE, "{} visible cells (+{} -{}), {} portals tested",
            visible_cells.len(), cells_shown, cells_hidden, traversal.portals_tested);
        Ok(self.last_stats)
    }

    // ===== DYNAMIC OBJECTS =====

    /// Track a moving renderable in `cell` (`None`: always visible).
    ///
    /// Renderables owned by a tile are rejected with `InvalidKey`. Call again whenever it
    /// changes cell; the next pass applies the new assignment.
    pub fn set_dynamic_renderable_cell(
        &mut self,
        key: RenderableKey,
        cell: Option<CellId>,
        scene: &SceneObjects,
    ) -> Result<()> {
        if scene.renderable(key).is_none() {
            crate::cull_bail!(InvalidKey, SOURCE, "Unknown renderable {:?}", key);
        }
        if let Some(owner) = self.graph.as_ref().and_then(|graph| graph.renderable_owner(key)) {
            crate::cull_bail!(InvalidKey, SOURCE, "Renderable {:?} is owned by {:?} and cannot be dynamic", key, owner);
        }
        self.check_cell(cell)?;
        if self.dynamic.set_renderable_cell(key, cell) {
            self.dynamic_renderables.mark_visible(key);
        }
        Ok(())
    }

    /// Stop tracking a renderable and make it visible
    pub fn remove_dynamic_renderable(&mut self, key: RenderableKey, scene: &mut SceneObjects) -> bool {
        if !self.dynamic.remove_renderable(key) {
            return false;
        }
        self.dynamic_renderables.forget(&key);
        scene.set_renderable_visible(key, true);
        true
    }

    /// Track a moving light in `cell` (`None`: always enabled).
    ///
    /// Lights owned by a tile are rejected with `InvalidKey`.
    pub fn set_dynamic_light_cell(
        &mut self,
        key: LightKey,
        cell: Option<CellId>,
        scene: &SceneObjects,
    ) -> Result<()> {
        if scene.light(key).is_none() {
            crate::cull_bail!(InvalidKey, SOURCE, "Unknown light {:?}", key);
        }
        if let Some(owner) = self.graph.as_ref().and_then(|graph| graph.light_owner(key)) {
            crate::cull_bail!(InvalidKey, SOURCE, "Light {:?} is owned by {:?} and cannot be dynamic", key, owner);
        }
        self.check_cell(cell)?;
        if self.dynamic.set_light_cell(key, cell) {
            self.dynamic_lights.mark_visible(key);
        }
        Ok(())
    }

    /// Stop tracking a light and enable it
    pub fn remove_dynamic_light(&mut self, key: LightKey, scene: &mut SceneObjects) -> bool {
        if !self.dynamic.remove_light(key) {
            return false;
        }
        self.dynamic_lights.forget(&key);
        scene.set_light_enabled(key, true);
        true
    }

    /// Stop tracking dynamic objects that a tile of `graph` now owns
    fn untrack_owned(&mut self, graph: &CellGraph) {
        let renderables: Vec<RenderableKey> = self.dynamic.renderable_keys()
            .filter(|key| graph.renderable_owner(*key).is_some())
            .collect();
        for key in renderables {
            crate::cull_warn!(SOURCE, "Renderable {:?} is now owned by a tile; no longer tracked as dynamic", key);
            self.dynamic.remove_renderable(key);
            self.dynamic_renderables.forget(&key);
        }

        let lights: Vec<LightKey> = self.dynamic.light_keys()
            .filter(|key| graph.light_owner(*key).is_some())
            .collect();
        for key in lights {
            crate::cull_warn!(SOURCE, "Light {:?} is now owned by a tile; no longer tracked as dynamic", key);
            self.dynamic.remove_light(key);
            self.dynamic_lights.forget(&key);
        }
    }

    fn check_cell(&self, cell: Option<CellId>) -> Result<()> {
        let Some(cell) = cell else { return Ok(()) };
        match &self.graph {
            Some(graph) if graph.cell(cell).is_some() => Ok(()),
            Some(_) => Err(crate::cull_err!(InvalidKey, SOURCE, "Unknown cell {:?}", cell)),
            None => Err(crate::cull_err!(NotInitialized, SOURCE, "No cell graph to assign {:?} to", cell)),
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
