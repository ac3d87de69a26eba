/*!
# Portal Culling

Cell-and-portal visibility culling for procedurally generated levels.

A level is a graph of cells (rooms, corridors) joined by rectangular
portals. Every frame the engine walks the graph from each viewpoint's cell,
narrowing the view frustum through each portal, and switches off the
renderables and lights of every cell it could not reach.

## Architecture

- **geometry**: AABB, plane and inline frustum primitives
- **graph**: immutable cell/portal arena built from a `LevelDesc`
- **scene**: renderables and lights whose visibility culling controls
- **view**: viewpoints supplied by the caller each frame
- **visibility**: traversals, culling strategies and double-buffered diffing
- **CullingEngine**: ties the above together per level

Visibility is conservative: every failure (malformed tiles, depth
overflow, viewpoints outside the level) degrades to drawing more.
*/

// Internal modules
pub mod error;
pub mod log;
mod config;
mod engine;
mod geometry;
mod graph;
mod scene;
mod view;
mod visibility;

#[cfg(test)]
mod test_levels;

// Main culling namespace module
pub mod culling {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine and configuration
    pub use crate::engine::{CullingEngine, CullingStats};
    pub use crate::config::{CullingConfig, CullingMode};

    // Level input and scene objects
    pub use crate::graph::{LevelDesc, TileDesc, TileId, ConnectionDesc, ConnectorDesc, PortalBoundsMode};
    pub use crate::scene::{SceneObjects, RenderableKey, LightKey, LightDesc, LightShadows};
    pub use crate::view::Viewpoint;

    // Logging sub-module (types and functions, NOT macros)
    pub mod log {
        pub use crate::log::{
            Logger, LogEntry, LogSeverity, DefaultLogger,
            set_logger, reset_logger, set_min_severity, min_severity,
        };
    }

    // Geometry sub-module
    pub mod geometry {
        pub use crate::geometry::*;
    }

    // Graph sub-module
    pub mod graph {
        pub use crate::graph::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }

    // Visibility sub-module
    pub mod visibility {
        pub use crate::visibility::*;
    }
}

// Re-export math library at crate root
pub use glam;
