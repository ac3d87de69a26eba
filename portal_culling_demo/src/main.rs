//! Portal culling demo
//!
//! Builds a grid dungeon, walks a camera through it carrying a torch and
//! logs statistics for every culling pass.

use portal_culling::culling::geometry::AABB;
use portal_culling::culling::{
    CullingConfig, CullingEngine, LevelDesc, LightDesc, LightShadows, Result, SceneObjects,
    TileDesc, TileId, Viewpoint,
};
use glam::{Mat4, Vec3};
use portal_culling::{cull_error, cull_info};

const SOURCE: &str = "portal_culling_demo";

const GRID: usize = 8;
const ROOM: f32 = 12.0;
const HEIGHT: f32 = 4.0;
const FRAMES: usize = 240;

fn main() {
    if let Err(e) = run() {
        cull_error!(SOURCE, "Demo failed: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut scene = SceneObjects::new();
    let level = build_dungeon(&mut scene);

    let config = CullingConfig { update_interval: 2, ..Default::default() };
    let mut engine = CullingEngine::new(config)?;
    engine.on_graph_invalidated(&level, &mut scene)?;
    cull_info!(SOURCE, "Dungeon {}x{}: {} renderables, {} lights",
        GRID, GRID, scene.renderable_count(), scene.light_count());

    let torch = scene.add_light(LightDesc {
        range: 6.0,
        shadows: LightShadows::None,
        ..Default::default()
    });
    let projection = Mat4::perspective_rh(70f32.to_radians(), 16.0 / 9.0, 0.1, 150.0);

    let mut hint = None;
    for frame in 0..FRAMES {
        let (eye, direction) = camera_path(frame as f32 / FRAMES as f32);

        scene.set_light_position(torch, eye)?;
        let room = engine.locate(eye, hint);
        engine.set_dynamic_light_cell(torch, room, &scene)?;

        let mut view = Viewpoint::look_at(eye, eye + direction, Vec3::Y, projection);
        view.set_cell_hint(room);

        if let Some(stats) = engine.update(&[view], &mut scene)? {
            let renderables = scene.take_changed_renderables().len();
            let lights = scene.take_changed_lights().len();
            cull_info!(SOURCE,
                "frame {:3} room {:?}: {:2} visible cells (+{} -{}), {:3} portals tested, {} renderable / {} light toggles",
                frame, room, stats.visible_cells, stats.cells_shown, stats.cells_hidden,
                stats.portals_tested, renderables, lights);
        }
        hint = room;
    }

    engine.clear(&mut scene);
    cull_info!(SOURCE, "Done; {} objects restored to visible", scene.take_changed_renderables().len());
    Ok(())
}

/// Walk east along the middle row, then north along the last column
fn camera_path(t: f32) -> (Vec3, Vec3) {
    let row_z = (GRID / 2) as f32 * ROOM + ROOM * 0.5;
    let last_x = (GRID - 1) as f32 * ROOM + ROOM * 0.5;
    let east_length = last_x - ROOM * 0.5;
    let north_length = (GRID - 1) as f32 * ROOM - (GRID / 2) as f32 * ROOM;
    let distance = t * (east_length + north_length);

    if distance < east_length {
        (Vec3::new(ROOM * 0.5 + distance, 1.7, row_z), Vec3::X)
    } else {
        (Vec3::new(last_x, 1.7, row_z + distance - east_length), Vec3::Z)
    }
}

fn tile_id(x: usize, z: usize) -> TileId {
    (z * GRID + x) as TileId
}

/// Rooms with a floor, a pillar and a ceiling lamp; every third lamp casts
/// no shadows and leaks into neighbouring rooms.
fn build_dungeon(scene: &mut SceneObjects) -> LevelDesc {
    let mut level = LevelDesc::default();

    for z in 0..GRID {
        for x in 0..GRID {
            let min = Vec3::new(x as f32 * ROOM, 0.0, z as f32 * ROOM);
            let center = min + Vec3::new(ROOM * 0.5, 0.0, ROOM * 0.5);
            let mut tile = TileDesc::new(tile_id(x, z), AABB::new(min, min + Vec3::new(ROOM, HEIGHT, ROOM)));

            tile.renderables.push(scene.add_renderable(AABB::new(min, min + Vec3::new(ROOM, 0.2, ROOM))));
            tile.renderables.push(scene.add_renderable(AABB::new(
                center + Vec3::new(2.0, 0.0, 2.0),
                center + Vec3::new(3.0, HEIGHT, 3.0),
            )));
            let leaks = (x + z) % 3 == 0;
            tile.lights.push(scene.add_light(LightDesc {
                position: center + Vec3::Y * (HEIGHT - 0.5),
                range: 9.0,
                shadows: if leaks { LightShadows::None } else { LightShadows::Soft },
                ..Default::default()
            }));

            if x > 0 {
                tile.connect(tile_id(x - 1, z), door_x(min.x, center.z));
            }
            if x + 1 < GRID {
                tile.connect(tile_id(x + 1, z), door_x(min.x + ROOM, center.z));
            }
            if z > 0 {
                tile.connect(tile_id(x, z - 1), door_z(min.z, center.x));
            }
            if z + 1 < GRID {
                tile.connect(tile_id(x, z + 1), door_z(min.z + ROOM, center.x));
            }
            level.tiles.push(tile);
        }
    }
    level
}

fn door_x(x: f32, z: f32) -> [Vec3; 4] {
    [
        Vec3::new(x, 0.0, z - 1.0),
        Vec3::new(x, 0.0, z + 1.0),
        Vec3::new(x, 2.5, z + 1.0),
        Vec3::new(x, 2.5, z - 1.0),
    ]
}

fn door_z(z: f32, x: f32) -> [Vec3; 4] {
    [
        Vec3::new(x - 1.0, 0.0, z),
        Vec3::new(x + 1.0, 0.0, z),
        Vec3::new(x + 1.0, 2.5, z),
        Vec3::new(x - 1.0, 2.5, z),
    ]
}
