/// Cell culling strategies.
///
/// A CellCuller adds the cells visible from one viewpoint to a set. The
/// engine calls it once per viewpoint per pass and unions the results.

use rustc_hash::FxHashSet;

use crate::config::{CullingConfig, CullingMode};
use crate::graph::{CellGraph, CellId};
use crate::view::Viewpoint;
use super::traversal::TraversalContext;

/// Strategy for determining visible cells from a viewpoint.
///
/// `start` is the cell containing the viewpoint, if any. Implementations
/// only ever add to `visible`.
pub trait CellCuller: Send + Sync {
    fn cull(
        &mut self,
        graph: &CellGraph,
        viewpoint: &Viewpoint,
        start: Option<CellId>,
        context: &mut TraversalContext,
        visible: &mut FxHashSet<CellId>,
    );
}

/// Start cell usable for a graph walk
fn traversable_start(graph: &CellGraph, start: Option<CellId>) -> Option<CellId> {
    start.filter(|id| graph.cell(*id).is_some_and(|cell| cell.is_traversable()))
}

/// Portal culler: frustum-clipped traversal from the viewpoint's cell.
///
/// Falls back to `FrustumBoundsCuller` when the viewpoint is outside every
/// traversable cell.
#[derive(Debug, Default)]
pub struct PortalCuller;

impl PortalCuller {
    pub fn new() -> Self {
        Self
    }
}

impl CellCuller for PortalCuller {
    fn cull(
        &mut self,
        graph: &CellGraph,
        viewpoint: &Viewpoint,
        start: Option<CellId>,
        context: &mut TraversalContext,
        visible: &mut FxHashSet<CellId>,
    ) {
        let Some(start) = traversable_start(graph, start) else {
            FrustumBoundsCuller.cull(graph, viewpoint, start, context, visible);
            return;
        };

        context.portal_traversal(
            graph,
            viewpoint.position(),
            start,
            *viewpoint.frustum(),
            |_| true,
            |cell, _| {
                visible.insert(cell);
            },
        );
    }
}

/// Adjacency culler: every cell within `depth` portal hops.
///
/// Ignores the view direction entirely. Falls back to
/// `FrustumBoundsCuller` like `PortalCuller`.
pub struct AdjacencyCuller {
    depth: u32,
}

impl AdjacencyCuller {
    pub fn new(depth: u32) -> Self {
        Self { depth }
    }

    /// Portal hops included
    pub fn depth(&self) -> u32 {
        self.depth
    }
}

impl CellCuller for AdjacencyCuller {
    fn cull(
        &mut self,
        graph: &CellGraph,
        viewpoint: &Viewpoint,
        start: Option<CellId>,
        context: &mut TraversalContext,
        visible: &mut FxHashSet<CellId>,
    ) {
        let Some(start) = traversable_start(graph, start) else {
            FrustumBoundsCuller.cull(graph, viewpoint, start, context, visible);
            return;
        };

        context.bounded_depth(graph, start, self.depth, |cell| {
            visible.insert(cell);
        });
    }
}

/// Frustum-bounds culler: tests every cell's bounds against the
/// viewpoint frustum. No graph traversal.
///
/// Suited to orthographic, map and debug views that are not inside a cell.
#[derive(Debug, Default)]
pub struct FrustumBoundsCuller;

impl FrustumBoundsCuller {
    pub fn new() -> Self {
        Self
    }
}

impl CellCuller for FrustumBoundsCuller {
    fn cull(
        &mut self,
        graph: &CellGraph,
        viewpoint: &Viewpoint,
        _start: Option<CellId>,
        _context: &mut TraversalContext,
        visible: &mut FxHashSet<CellId>,
    ) {
        let frustum = viewpoint.frustum();
        visible.extend(
            graph.cells()
                .filter(|(_, cell)| frustum.intersects_aabb(cell.bounds()))
                .map(|(id, _)| id),
        );
    }
}

/// Culler selected once from `CullingConfig::mode`
pub enum CullingStrategy {
    Portal(PortalCuller),
    Adjacency(AdjacencyCuller),
    FrustumBounds(FrustumBoundsCuller),
}

impl CullingStrategy {
    pub fn from_config(config: &CullingConfig) -> Self {
        match config.mode {
            CullingMode::PortalTraversal => Self::Portal(PortalCuller::new()),
            CullingMode::AdjacentCells => Self::Adjacency(AdjacencyCuller::new(config.adjacency_depth)),
            CullingMode::FrustumBounds => Self::FrustumBounds(FrustumBoundsCuller::new()),
        }
    }

    /// Mode this strategy implements
    pub fn mode(&self) -> CullingMode {
        match self {
            Self::Portal(_) => CullingMode::PortalTraversal,
            Self::Adjacency(_) => CullingMode::AdjacentCells,
            Self::FrustumBounds(_) => CullingMode::FrustumBounds,
        }
    }
}

impl CellCuller for CullingStrategy {
    fn cull(
        &mut self,
        graph: &CellGraph,
        viewpoint: &Viewpoint,
        start: Option<CellId>,
        context: &mut TraversalContext,
        visible: &mut FxHashSet<CellId>,
    ) {
        match self {
            Self::Portal(culler) => culler.cull(graph, viewpoint, start, context, visible),
            Self::Adjacency(culler) => culler.cull(graph, viewpoint, start, context, visible),
            Self::FrustumBounds(culler) => culler.cull(graph, viewpoint, start, context, visible),
        }
    }
}

#[cfg(test)]
#[path = "culler_tests.rs"]
mod tests;
