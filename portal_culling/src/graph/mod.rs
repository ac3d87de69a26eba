//! Cell graph: cells (tiles) connected by portals.
//!
//! The graph is built once per generated level from a `LevelDesc` and is
//! immutable afterwards. Cells and portals live in flat arenas addressed by
//! `CellId` / `PortalId`; a portal stores the index of its target cell.

mod cell;
mod portal;
mod level;
mod cell_graph;
mod light_links;

pub use cell::{Cell, CellFlags, CellId};
pub use portal::{Portal, PortalBoundsMode, PortalId, derive_corners_from_cell};
pub use level::{ConnectionDesc, ConnectorDesc, LevelDesc, TileDesc, TileId};
pub use cell_graph::CellGraph;
