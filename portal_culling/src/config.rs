//! Culling configuration

use crate::error::Result;
use crate::graph::PortalBoundsMode;

/// How visible cells are computed for each viewpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CullingMode {
    /// Frustum-clipped traversal through portals
    #[default]
    PortalTraversal,
    /// Every cell within `adjacency_depth` portal hops of the viewpoint
    AdjacentCells,
    /// Every cell whose bounds intersect the viewpoint frustum
    FrustumBounds,
}

/// Engine configuration, validated once in `CullingEngine::new`
#[derive(Debug, Clone, PartialEq)]
pub struct CullingConfig {
    /// Visibility algorithm
    pub mode: CullingMode,
    /// Maximum number of cells on one traversal path, start cell included
    pub max_traversal_depth: usize,
    /// Portal hops included by `CullingMode::AdjacentCells`
    pub adjacency_depth: u32,
    /// Run a pass every N calls to `update`
    pub update_interval: u32,
    /// Portal rectangles for levels that do not override it
    pub portal_bounds_mode: PortalBoundsMode,
    /// Inset applied to a cell's bounds before collecting boundary renderables
    pub boundary_inset: f32,
    /// Treat lights with distance shadow fading as leaking light
    pub shadow_fading: bool,
}

impl Default for CullingConfig {
    fn default() -> Self {
        Self {
            mode: CullingMode::PortalTraversal,
            max_traversal_depth: 64,
            adjacency_depth: 1,
            update_interval: 1,
            portal_bounds_mode: PortalBoundsMode::Authored,
            boundary_inset: 0.2,
            shadow_fading: false,
        }
    }
}

impl CullingConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.max_traversal_depth == 0 {
            crate::cull_bail!(InvalidConfig, "portal_culling::Config",
                "max_traversal_depth must be at least 1");
        }
        if self.update_interval == 0 {
            crate::cull_bail!(InvalidConfig, "portal_culling::Config",
                "update_interval must be at least 1");
        }
        if !self.boundary_inset.is_finite() || self.boundary_inset < 0.0 {
            crate::cull_bail!(InvalidConfig, "portal_culling::Config",
                "boundary_inset must be finite and non-negative, got {}", self.boundary_inset);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
