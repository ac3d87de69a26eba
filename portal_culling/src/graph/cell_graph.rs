/// Cell graph arena and its build from a level description.

use glam::Vec3;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::CullingConfig;
use crate::error::Result;
use crate::scene::{LightKey, RenderableKey, SceneObjects};
use super::cell::{Cell, CellFlags, CellId};
use super::level::{LevelDesc, TileId};
use super::light_links;
use super::portal::{Portal, PortalBoundsMode, PortalId, derive_corners_from_cell};

const SOURCE: &str = "portal_culling::CellGraph";

/// Directed connection before it becomes a portal
type Link = (CellId, CellId, [Vec3; 4]);

/// Immutable cell/portal graph for one generated level.
///
/// Cell `i` owns portals `first_portal .. first_portal + portal_count`;
/// portals are stored sorted by source cell.
#[derive(Debug, Clone, Default)]
pub struct CellGraph {
    cells: Vec<Cell>,
    portals: Vec<Portal>,
    tiles: FxHashMap<TileId, CellId>,
    always_visible: Vec<CellId>,
    renderable_owners: FxHashMap<RenderableKey, CellId>,
    light_owners: FxHashMap<LightKey, CellId>,
}

impl CellGraph {
    /// Build the graph for `level`.
    ///
    /// Renderables and lights referenced by tiles must already exist in
    /// `scene`; their bounds feed boundary and light linking. Tiles with
    /// connections that cannot be resolved are kept but excluded from
    /// traversal and marked always visible.
    pub fn build(level: &LevelDesc, scene: &SceneObjects, config: &CullingConfig) -> Result<Self> {
        let tiles = index_tiles(level)?;
        let mut cells = create_cells(level, scene);
        let (renderable_owners, light_owners) = owner_maps(&cells);
        let links = resolve_connections(level, &tiles, &mut cells);
        let bounds_mode = level.portal_bounds_mode.unwrap_or(config.portal_bounds_mode);
        let portals = create_portals(links, &mut cells, bounds_mode);

        let always_visible = cells.iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_always_visible())
            .map(|(i, _)| CellId(i as u32))
            .collect();

        let mut graph = Self { cells, portals, tiles, always_visible, renderable_owners, light_owners };
        graph.link_boundary_renderables(scene, config.boundary_inset);

        let links = light_links::compute(&graph, scene, config);
        for (cell, (lights, occluders)) in graph.cells.iter_mut()
            .zip(links.external_lights.into_iter().zip(links.external_occluders))
        {
            cell.external_lights = lights;
            cell.external_occluders = occluders;
        }

        crate::cull_info!(SOURCE, "Built {} cells, {} portals ({} always visible)",
            graph.cells.len(), graph.portals.len(), graph.always_visible.len());
        Ok(graph)
    }

    // ===== ACCESSORS =====

    /// Cell by id
    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id.index())
    }

    /// Portal by id
    pub fn portal(&self, id: PortalId) -> Option<&Portal> {
        self.portals.get(id.index())
    }

    /// Cell by id; `id` must come from this graph
    pub(crate) fn cell_at(&self, id: CellId) -> &Cell {
        &self.cells[id.index()]
    }

    /// Portal by id; `id` must come from this graph
    pub(crate) fn portal_at(&self, id: PortalId) -> &Portal {
        &self.portals[id.index()]
    }

    /// All cells with their ids
    pub fn cells(&self) -> impl Iterator<Item = (CellId, &Cell)> {
        self.cells.iter().enumerate().map(|(i, cell)| (CellId(i as u32), cell))
    }

    /// Number of cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of directed portals
    pub fn portal_count(&self) -> usize {
        self.portals.len()
    }

    /// Outgoing portals of `id` (empty for unknown ids)
    pub fn portals_of(&self, id: CellId) -> impl Iterator<Item = &Portal> {
        let range = match self.cells.get(id.index()) {
            Some(cell) => cell.first_portal as usize..(cell.first_portal + cell.portal_count) as usize,
            None => 0..0,
        };
        self.portals[range].iter()
    }

    /// Cells one portal away from `id`
    pub fn neighbours(&self, id: CellId) -> impl Iterator<Item = CellId> + '_ {
        self.portals_of(id).map(Portal::target)
    }

    /// Cell built from the given tile
    pub fn find_tile(&self, tile: TileId) -> Option<CellId> {
        self.tiles.get(&tile).copied()
    }

    /// Cell owning a renderable listed by a tile
    pub fn renderable_owner(&self, key: RenderableKey) -> Option<CellId> {
        self.renderable_owners.get(&key).copied()
    }

    /// Cell owning a light listed by a tile
    pub fn light_owner(&self, key: LightKey) -> Option<CellId> {
        self.light_owners.get(&key).copied()
    }

    /// Cells whose content is never hidden
    pub fn always_visible_cells(&self) -> &[CellId] {
        &self.always_visible
    }

    /// Cell containing `point`.
    ///
    /// Checks `hint` and its neighbours first, then every cell. Where bounds
    /// overlap, the cell the point is deepest inside wins; equal depths go
    /// to the smaller cell.
    pub fn locate(&self, point: Vec3, hint: Option<CellId>) -> Option<CellId> {
        if let Some(hint) = hint.filter(|h| h.index() < self.cells.len()) {
            let nearby = std::iter::once(hint).chain(self.neighbours(hint));
            if let Some(found) = self.deepest_containing(nearby, point) {
                return Some(found);
            }
        }
        self.deepest_containing(self.cells().map(|(id, _)| id), point)
    }

    fn deepest_containing<I>(&self, candidates: I, point: Vec3) -> Option<CellId>
    where
        I: Iterator<Item = CellId>,
    {
        candidates
            .filter(|id| self.cell_at(*id).bounds.contains_point(point))
            .map(|id| (id, self.cell_at(id).bounds.depth_of(point), self.cell_at(id).bounds.volume()))
            .reduce(|best, next| {
                let deeper = next.1 > best.1;
                let smaller = next.1 == best.1 && next.2 < best.2;
                if deeper || smaller { next } else { best }
            })
            .map(|(id, _, _)| id)
    }

    // ===== BUILD STEPS =====

    /// Neighbour renderables reaching past this cell's inset bounds
    fn link_boundary_renderables(&mut self, scene: &SceneObjects, inset: f32) {
        let mut seen = FxHashSet::default();
        for i in 0..self.cells.len() {
            let inner = self.cells[i].bounds.shrunk(inset);
            let mut boundary = Vec::new();
            seen.clear();

            for portal in self.portals_of(CellId(i as u32)) {
                let neighbour = self.cell_at(portal.target());
                for &key in &neighbour.renderables {
                    let overlaps = scene.renderable(key)
                        .is_some_and(|r| r.bounds().intersects(&inner));
                    if overlaps && seen.insert(key) {
                        boundary.push(key);
                    }
                }
            }
            self.cells[i].boundary_renderables = boundary;
        }
    }
}

/// Tile identity → cell index
fn index_tiles(level: &LevelDesc) -> Result<FxHashMap<TileId, CellId>> {
    let mut tiles = FxHashMap::default();
    for (i, tile) in level.tiles.iter().enumerate() {
        if !(tile.bounds.min.is_finite() && tile.bounds.max.is_finite()) {
            crate::cull_bail!(InvalidLevel, SOURCE, "Tile {} has non-finite bounds", tile.id);
        }
        if tiles.insert(tile.id, CellId(i as u32)).is_some() {
            crate::cull_bail!(InvalidLevel, SOURCE, "Duplicate tile id {}", tile.id);
        }
    }
    Ok(tiles)
}

/// One cell per tile with its owned renderables and lights.
///
/// Connector content is owned by the tile listing it. Keys missing from the
/// scene or already owned by another tile are skipped.
fn create_cells(level: &LevelDesc, scene: &SceneObjects) -> Vec<Cell> {
    let mut owned_renderables = FxHashSet::default();
    let mut owned_lights = FxHashSet::default();

    level.tiles.iter().map(|tile| {
        let mut cell = Cell::new(tile.id, tile.bounds);

        let renderables = tile.renderables.iter()
            .chain(tile.connectors.iter().flat_map(|c| &c.renderables));
        for &key in renderables {
            if scene.renderable(key).is_none() {
                crate::cull_warn!(SOURCE, "Tile {} references unknown renderable {:?}", tile.id, key);
            } else if !owned_renderables.insert(key) {
                crate::cull_warn!(SOURCE, "Renderable {:?} already owned, ignored in tile {}", key, tile.id);
            } else {
                cell.renderables.push(key);
            }
        }

        let lights = tile.lights.iter()
            .chain(tile.connectors.iter().flat_map(|c| &c.lights));
        for &key in lights {
            if scene.light(key).is_none() {
                crate::cull_warn!(SOURCE, "Tile {} references unknown light {:?}", tile.id, key);
            } else if !owned_lights.insert(key) {
                crate::cull_warn!(SOURCE, "Light {:?} already owned, ignored in tile {}", key, tile.id);
            } else {
                cell.lights.push(key);
            }
        }

        cell
    }).collect()
}

/// Owned key → owning cell, for both object kinds
fn owner_maps(cells: &[Cell]) -> (FxHashMap<RenderableKey, CellId>, FxHashMap<LightKey, CellId>) {
    let mut renderables = FxHashMap::default();
    let mut lights = FxHashMap::default();
    for (i, cell) in cells.iter().enumerate() {
        let id = CellId(i as u32);
        renderables.extend(cell.renderables.iter().map(|&key| (key, id)));
        lights.extend(cell.lights.iter().map(|&key| (key, id)));
    }
    (renderables, lights)
}

/// Resolve every connection to a directed link, pairing one-sided ones.
///
/// A tile with any unresolved connection (unknown target, itself, or
/// non-finite corners) becomes malformed and contributes no links.
fn resolve_connections(
    level: &LevelDesc,
    tiles: &FxHashMap<TileId, CellId>,
    cells: &mut [Cell],
) -> Vec<Link> {
    let mut links = Vec::new();

    for (i, tile) in level.tiles.iter().enumerate() {
        let source = CellId(i as u32);
        let start = links.len();

        for connection in &tile.connections {
            let target = tiles.get(&connection.target).copied()
                .filter(|target| *target != source);
            let finite = connection.corners.iter().all(|c| c.is_finite());
            match target {
                Some(target) if finite => links.push((source, target, connection.corners)),
                _ => {
                    crate::cull_warn!(SOURCE,
                        "Tile {} has an unresolved connection to {}; excluded from traversal",
                        tile.id, connection.target);
                    cells[i].flags |= CellFlags::MALFORMED;
                    links.truncate(start);
                    break;
                }
            }
        }
    }

    let pairs: FxHashSet<(CellId, CellId)> = links.iter().map(|(s, t, _)| (*s, *t)).collect();
    let reversed: Vec<Link> = links.iter()
        .filter(|(s, t, _)| !pairs.contains(&(*t, *s)))
        .filter(|(_, t, _)| cells[t.index()].is_traversable())
        .map(|(s, t, corners)| (*t, *s, *corners))
        .collect();
    if !reversed.is_empty() {
        crate::cull_debug!(SOURCE, "Synthesised {} reverse portals", reversed.len());
    }
    links.extend(reversed);
    links
}

/// Turn links into portals laid out contiguously per source cell
fn create_portals(mut links: Vec<Link>, cells: &mut [Cell], mode: PortalBoundsMode) -> Vec<Portal> {
    links.sort_by_key(|(source, _, _)| *source);

    let mut portals = Vec::with_capacity(links.len());
    for (source, target, corners) in links {
        let corners = match mode {
            PortalBoundsMode::Authored => corners,
            PortalBoundsMode::DeriveFromCell => {
                derive_corners_from_cell(&corners, &cells[target.index()].bounds)
            }
        };

        let cell = &mut cells[source.index()];
        if cell.portal_count == 0 {
            cell.first_portal = portals.len() as u32;
        }
        cell.portal_count += 1;
        portals.push(Portal::new(source, target, corners));
    }
    portals
}

#[cfg(test)]
#[path = "cell_graph_tests.rs"]
mod tests;
