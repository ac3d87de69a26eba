/// Cells of the level graph.

use bitflags::bitflags;
use crate::geometry::AABB;
use crate::scene::{LightKey, RenderableKey};
use super::level::TileId;
use super::portal::PortalId;

/// Index of a cell in the graph arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub u32);

impl CellId {
    /// Arena index
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

bitflags! {
    /// Per-cell state fixed at build time
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CellFlags: u8 {
        /// Cell is never entered by a traversal
        const EXCLUDED       = 1 << 0;
        /// Cell content is never hidden
        const ALWAYS_VISIBLE = 1 << 1;
        /// Built from a tile with unresolved connections
        const MALFORMED      = Self::EXCLUDED.bits() | Self::ALWAYS_VISIBLE.bits();
    }
}

/// One convex region of the level.
///
/// Owns its renderables and lights. The remaining lists reference objects
/// owned by other cells:
/// - boundary renderables: neighbour geometry overlapping this cell's edge
/// - external lights: lights from elsewhere that can reach this cell
/// - external occluders: geometry that must stay drawn so those lights
///   cast correct shadows into this cell
#[derive(Debug, Clone)]
pub struct Cell {
    pub(crate) tile: TileId,
    pub(crate) bounds: AABB,
    pub(crate) flags: CellFlags,
    pub(crate) first_portal: u32,
    pub(crate) portal_count: u32,
    pub(crate) renderables: Vec<RenderableKey>,
    pub(crate) lights: Vec<LightKey>,
    pub(crate) boundary_renderables: Vec<RenderableKey>,
    pub(crate) external_lights: Vec<LightKey>,
    pub(crate) external_occluders: Vec<RenderableKey>,
}

impl Cell {
    pub(crate) fn new(tile: TileId, bounds: AABB) -> Self {
        Self {
            tile,
            bounds,
            flags: CellFlags::empty(),
            first_portal: 0,
            portal_count: 0,
            renderables: Vec::new(),
            lights: Vec::new(),
            boundary_renderables: Vec::new(),
            external_lights: Vec::new(),
            external_occluders: Vec::new(),
        }
    }

    /// Raw identity of the tile this cell was built from
    pub fn tile(&self) -> TileId {
        self.tile
    }

    /// World-space bounds
    pub fn bounds(&self) -> &AABB {
        &self.bounds
    }

    /// Build-time flags
    pub fn flags(&self) -> CellFlags {
        self.flags
    }

    /// Whether traversals may enter this cell
    pub fn is_traversable(&self) -> bool {
        !self.flags.contains(CellFlags::EXCLUDED)
    }

    /// Whether this cell's content is never culled
    pub fn is_always_visible(&self) -> bool {
        self.flags.contains(CellFlags::ALWAYS_VISIBLE)
    }

    /// Number of outgoing portals
    pub fn portal_count(&self) -> u32 {
        self.portal_count
    }

    /// Outgoing portal `n` (0-based, must be < portal_count)
    pub fn portal(&self, n: u32) -> PortalId {
        debug_assert!(n < self.portal_count);
        PortalId(self.first_portal + n)
    }

    /// Outgoing portals in order
    pub fn portals(&self) -> impl Iterator<Item = PortalId> {
        (self.first_portal..self.first_portal + self.portal_count).map(PortalId)
    }

    /// Owned renderables
    pub fn renderables(&self) -> &[RenderableKey] {
        &self.renderables
    }

    /// Owned lights
    pub fn lights(&self) -> &[LightKey] {
        &self.lights
    }

    /// Neighbour renderables overlapping this cell's boundary
    pub fn boundary_renderables(&self) -> &[RenderableKey] {
        &self.boundary_renderables
    }

    /// Lights owned elsewhere that reach this cell
    pub fn external_lights(&self) -> &[LightKey] {
        &self.external_lights
    }

    /// Renderables owned elsewhere that occlude external lights for this cell
    pub fn external_occluders(&self) -> &[RenderableKey] {
        &self.external_occluders
    }

    /// Every renderable whose visibility depends on this cell
    pub fn referenced_renderables(&self) -> impl Iterator<Item = RenderableKey> + '_ {
        self.renderables.iter()
            .chain(&self.boundary_renderables)
            .chain(&self.external_occluders)
            .copied()
    }

    /// Every light whose enabled state depends on this cell
    pub fn referenced_lights(&self) -> impl Iterator<Item = LightKey> + '_ {
        self.lights.iter().chain(&self.external_lights).copied()
    }
}
