#![allow(dead_code)]
/// Small hand-built levels for unit tests.
///
/// Cells are 10 × 5 × 10 boxes on the XZ plane. Tiles are listed in order,
/// so tile `n` (1-based) becomes `CellId(n - 1)`.

use glam::{Mat4, Vec3};

use crate::geometry::AABB;
use crate::graph::{CellId, LevelDesc, TileDesc, TileId};
use crate::scene::{RenderableKey, SceneObjects};
use crate::view::Viewpoint;

pub const TILE_A: TileId = 1;
pub const TILE_B: TileId = 2;
pub const TILE_C: TileId = 3;
pub const TILE_D: TileId = 4;

pub const CELL_A: CellId = CellId(0);
pub const CELL_B: CellId = CellId(1);
pub const CELL_C: CellId = CellId(2);
pub const CELL_D: CellId = CellId(3);

/// Level plus the scene holding its geometry
pub struct TestLevel {
    pub level: LevelDesc,
    pub scene: SceneObjects,
    /// One floor renderable per tile, in tile order
    pub floors: Vec<RenderableKey>,
}

/// Cell box spanning `x0..x1`, `z0..z1`, height 5
pub fn cell_bounds(x0: f32, x1: f32, z0: f32, z1: f32) -> AABB {
    AABB::new(Vec3::new(x0, 0.0, z0), Vec3::new(x1, 5.0, z1))
}

/// Rectangle on the plane `x = x`
pub fn corners_x(x: f32, y0: f32, y1: f32, z0: f32, z1: f32) -> [Vec3; 4] {
    [
        Vec3::new(x, y0, z0),
        Vec3::new(x, y0, z1),
        Vec3::new(x, y1, z1),
        Vec3::new(x, y1, z0),
    ]
}

/// Rectangle on the plane `z = z`
pub fn corners_z(z: f32, x0: f32, x1: f32, y0: f32, y1: f32) -> [Vec3; 4] {
    [
        Vec3::new(x0, y0, z),
        Vec3::new(x1, y0, z),
        Vec3::new(x1, y1, z),
        Vec3::new(x0, y1, z),
    ]
}

/// Build tiles with one floor each and connect every pair on both sides
pub fn build(tiles: &[(TileId, AABB)], connections: &[(TileId, TileId, [Vec3; 4])]) -> TestLevel {
    let mut scene = SceneObjects::new();
    let mut floors = Vec::new();
    let mut level = LevelDesc::default();

    for &(id, bounds) in tiles {
        let floor = scene.add_renderable(bounds.shrunk(1.0));
        floors.push(floor);
        let mut tile = TileDesc::new(id, bounds);
        tile.renderables.push(floor);
        level.tiles.push(tile);
    }
    for &(a, b, corners) in connections {
        for tile in level.tiles.iter_mut() {
            if tile.id == a {
                tile.connect(b, corners);
            } else if tile.id == b {
                tile.connect(a, corners);
            }
        }
    }
    TestLevel { level, scene, floors }
}

/// A–B along +X, then C to the side of B along +Z.
///
/// The A–B doorway is small and centered; the B–C doorway sits in B's far
/// corner, out of sight from A.
pub fn bent_chain() -> TestLevel {
    bent_chain_with(corners_x(10.0, 1.0, 3.0, 4.0, 6.0))
}

/// `bent_chain` with a custom A–B rectangle
pub fn bent_chain_with(ab: [Vec3; 4]) -> TestLevel {
    build(
        &[
            (TILE_A, cell_bounds(0.0, 10.0, 0.0, 10.0)),
            (TILE_B, cell_bounds(10.0, 20.0, 0.0, 10.0)),
            (TILE_C, cell_bounds(10.0, 20.0, 10.0, 20.0)),
        ],
        &[
            (TILE_A, TILE_B, ab),
            (TILE_B, TILE_C, corners_z(10.0, 17.0, 19.0, 1.0, 3.0)),
        ],
    )
}

/// A–B–C in a straight line along +X with aligned doorways
pub fn straight_chain() -> TestLevel {
    build(
        &[
            (TILE_A, cell_bounds(0.0, 10.0, 0.0, 10.0)),
            (TILE_B, cell_bounds(10.0, 20.0, 0.0, 10.0)),
            (TILE_C, cell_bounds(20.0, 30.0, 0.0, 10.0)),
        ],
        &[
            (TILE_A, TILE_B, corners_x(10.0, 1.0, 4.0, 3.0, 7.0)),
            (TILE_B, TILE_C, corners_x(20.0, 1.0, 4.0, 3.0, 7.0)),
        ],
    )
}

/// A–B along +X with bounds overlapping by one unit around the x = 10 doorway
pub fn overlapping_pair() -> TestLevel {
    build(
        &[
            (TILE_A, cell_bounds(0.0, 10.5, 0.0, 10.0)),
            (TILE_B, cell_bounds(9.5, 20.0, 0.0, 10.0)),
        ],
        &[(TILE_A, TILE_B, corners_x(10.0, 1.0, 4.0, 3.0, 7.0))],
    )
}

/// 2 × 2 loop: A–B, A–C, B–D, C–D
pub fn ring() -> TestLevel {
    build(
        &[
            (TILE_A, cell_bounds(0.0, 10.0, 0.0, 10.0)),
            (TILE_B, cell_bounds(10.0, 20.0, 0.0, 10.0)),
            (TILE_C, cell_bounds(0.0, 10.0, 10.0, 20.0)),
            (TILE_D, cell_bounds(10.0, 20.0, 10.0, 20.0)),
        ],
        &[
            (TILE_A, TILE_B, corners_x(10.0, 1.0, 4.0, 3.0, 7.0)),
            (TILE_A, TILE_C, corners_z(10.0, 3.0, 7.0, 1.0, 4.0)),
            (TILE_B, TILE_D, corners_z(10.0, 13.0, 17.0, 1.0, 4.0)),
            (TILE_C, TILE_D, corners_x(10.0, 1.0, 4.0, 13.0, 17.0)),
        ],
    )
}

/// `n` cells in a line along +X, each doorway wide open
pub fn corridor(n: usize) -> TestLevel {
    let tiles: Vec<(TileId, AABB)> = (0..n)
        .map(|i| (i as TileId + 1, cell_bounds(i as f32 * 10.0, (i + 1) as f32 * 10.0, 0.0, 10.0)))
        .collect();
    let connections: Vec<(TileId, TileId, [Vec3; 4])> = (1..n)
        .map(|i| (i as TileId, i as TileId + 1, corners_x(i as f32 * 10.0, 0.5, 4.5, 0.5, 9.5)))
        .collect();
    build(&tiles, &connections)
}

/// 90° square perspective viewpoint at `eye` looking along `direction`
pub fn facing(eye: Vec3, direction: Vec3) -> Viewpoint {
    let projection = Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0);
    Viewpoint::look_at(eye, eye + direction, Vec3::Y, projection)
}
