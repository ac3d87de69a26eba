/// Graph traversals over a `CellGraph`.
///
/// `TraversalContext` owns every scratch buffer (stack frames, path, BFS
/// queue, visited set) so repeated traversals do not allocate once the
/// buffers have grown. One context per engine; it is not shared.

use std::collections::VecDeque;

use glam::Vec3;
use rustc_hash::FxHashSet;

use crate::geometry::{Frustum, intersects_all};
use crate::graph::{CellGraph, CellId, Portal};

const SOURCE: &str = "portal_culling::Traversal";

/// Counters accumulated across traversals until taken
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Portals examined
    pub portals_tested: u32,
    /// Cells reported to the visitor
    pub cells_visited: u32,
    /// Branches abandoned at the depth limit
    pub depth_overflows: u32,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    cell: CellId,
    next_portal: u32,
    frustum: Frustum,
}

/// Reusable traversal state
#[derive(Debug)]
pub struct TraversalContext {
    frames: Vec<Frame>,
    path: Vec<CellId>,
    queue: VecDeque<(CellId, u32)>,
    visited: FxHashSet<CellId>,
    max_depth: usize,
    depth_warning_logged: bool,
    stats: TraversalStats,
}

impl TraversalContext {
    /// Context allowing at most `max_depth` cells on a path (at least 1)
    pub fn new(max_depth: usize) -> Self {
        Self {
            frames: Vec::new(),
            path: Vec::new(),
            queue: VecDeque::new(),
            visited: FxHashSet::default(),
            max_depth: max_depth.max(1),
            depth_warning_logged: false,
            stats: TraversalStats::default(),
        }
    }

    /// Maximum cells on one path
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Counters since the last `take_stats`
    pub fn stats(&self) -> TraversalStats {
        self.stats
    }

    /// Return and reset the counters
    pub fn take_stats(&mut self) -> TraversalStats {
        std::mem::take(&mut self.stats)
    }

    /// Depth-first walk through portals, narrowing the view at each step.
    ///
    /// `visit(cell, path)` is called for `start` and for every cell entered,
    /// with the path from `start` to that cell inclusive. A cell can be
    /// visited once per distinct path. A portal is entered when:
    /// - its target is traversable and is not the cell we just came from
    /// - it has a non-zero area and `admit` accepts it
    /// - its bounds intersect every frustum on the stack, `root` included
    ///
    /// Paths longer than the depth limit are cut; the first cut is logged.
    pub fn portal_traversal<A, V>(
        &mut self,
        graph: &CellGraph,
        origin: Vec3,
        start: CellId,
        root: Frustum,
        mut admit: A,
        mut visit: V,
    ) where
        A: FnMut(&Portal) -> bool,
        V: FnMut(CellId, &[CellId]),
    {
        self.frames.clear();
        self.path.clear();
        if graph.cell(start).is_none() {
            return;
        }

        self.frames.push(Frame { cell: start, next_portal: 0, frustum: root });
        self.path.push(start);
        self.stats.cells_visited += 1;
        visit(start, &self.path);

        while let Some(top) = self.frames.last_mut() {
            let cell = graph.cell_at(top.cell);
            if top.next_portal >= cell.portal_count() {
                self.frames.pop();
                self.path.pop();
                continue;
            }
            let portal = graph.portal_at(cell.portal(top.next_portal));
            top.next_portal += 1;
            self.stats.portals_tested += 1;

            let target = portal.target();
            let depth = self.frames.len();
            if depth >= 2 && self.frames[depth - 2].cell == target {
                continue;
            }
            if !graph.cell_at(target).is_traversable() || portal.is_degenerate() || !admit(portal) {
                continue;
            }
            if !intersects_all(self.frames.iter().map(|f| &f.frustum), portal.bounds()) {
                continue;
            }
            if depth >= self.max_depth {
                self.depth_overflow();
                continue;
            }

            self.frames.push(Frame { cell: target, next_portal: 0, frustum: portal.sub_frustum(origin) });
            self.path.push(target);
            self.stats.cells_visited += 1;
            crate::cull_trace!(SOURCE, "Entered {:?} at depth {}", target, depth + 1);
            visit(target, &self.path);
        }
    }

    /// Breadth-first walk reporting every cell within `max_hops` portals of
    /// `start`, each once. Frustums are ignored.
    pub fn bounded_depth<V>(&mut self, graph: &CellGraph, start: CellId, max_hops: u32, mut visit: V)
    where
        V: FnMut(CellId),
    {
        self.queue.clear();
        self.visited.clear();
        if graph.cell(start).is_none() {
            return;
        }

        self.visited.insert(start);
        self.queue.push_back((start, 0));
        self.stats.cells_visited += 1;
        visit(start);

        while let Some((cell, hops)) = self.queue.pop_front() {
            if hops >= max_hops {
                continue;
            }
            for portal in graph.portals_of(cell) {
                self.stats.portals_tested += 1;
                let target = portal.target();
                if graph.cell_at(target).is_traversable() && self.visited.insert(target) {
                    self.stats.cells_visited += 1;
                    visit(target);
                    self.queue.push_back((target, hops + 1));
                }
            }
        }
    }

    fn depth_overflow(&mut self) {
        self.stats.depth_overflows += 1;
        if !self.depth_warning_logged {
            self.depth_warning_logged = true;
            crate::cull_warn!(SOURCE,
                "Traversal depth limit ({}) reached; branch abandoned. Further occurrences are not logged",
                self.max_depth);
        }
    }
}

#[cfg(test)]
#[path = "traversal_tests.rs"]
mod tests;
