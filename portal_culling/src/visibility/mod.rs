//! Visibility computation: traversal, culling strategies and diffing.

mod traversal;
mod culler;
mod visibility_diff;
mod cell_visibility;

pub use traversal::{TraversalContext, TraversalStats};
pub use culler::{CellCuller, PortalCuller, AdjacencyCuller, FrustumBoundsCuller, CullingStrategy};
pub use visibility_diff::VisibilityDiff;
pub use cell_visibility::CellVisibility;
