/// Level description handed over by level generation.
///
/// One `TileDesc` per generated room/corridor. Geometry is referenced by
/// keys into `SceneObjects`, which the caller fills before building.

use glam::Vec3;
use crate::geometry::AABB;
use crate::scene::{LightKey, RenderableKey};
use super::portal::PortalBoundsMode;

/// Raw tile identity assigned by level generation
pub type TileId = u64;

/// Shared aperture to a neighbouring tile
#[derive(Debug, Clone)]
pub struct ConnectionDesc {
    /// Tile on the other side
    pub target: TileId,
    /// Rectangle corners in cyclic order (A, B, C, D), world space
    pub corners: [Vec3; 4],
}

/// Door or connector geometry attached to a tile
#[derive(Debug, Clone, Default)]
pub struct ConnectorDesc {
    pub renderables: Vec<RenderableKey>,
    pub lights: Vec<LightKey>,
}

/// One generated tile
#[derive(Debug, Clone)]
pub struct TileDesc {
    pub id: TileId,
    pub bounds: AABB,
    pub renderables: Vec<RenderableKey>,
    pub lights: Vec<LightKey>,
    pub connectors: Vec<ConnectorDesc>,
    pub connections: Vec<ConnectionDesc>,
}

impl TileDesc {
    /// Tile with bounds and no content
    pub fn new(id: TileId, bounds: AABB) -> Self {
        Self {
            id,
            bounds,
            renderables: Vec::new(),
            lights: Vec::new(),
            connectors: Vec::new(),
            connections: Vec::new(),
        }
    }

    /// Add a connection to `target` through the given rectangle
    pub fn connect(&mut self, target: TileId, corners: [Vec3; 4]) -> &mut Self {
        self.connections.push(ConnectionDesc { target, corners });
        self
    }
}

/// Output of level generation
#[derive(Debug, Clone, Default)]
pub struct LevelDesc {
    pub tiles: Vec<TileDesc>,
    /// Per-level override of `CullingConfig::portal_bounds_mode`
    pub portal_bounds_mode: Option<PortalBoundsMode>,
}
