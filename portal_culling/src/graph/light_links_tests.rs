/// Tests for external light and occluder linking

use glam::Vec3;
use super::*;
use crate::scene::{LightDesc, LightShadows};
use crate::test_levels::*;

fn light_in_a(test: &mut TestLevel, desc: LightDesc) -> LightKey {
    let key = test.scene.add_light(desc);
    test.level.tiles[0].lights.push(key);
    key
}

fn build_with(test: &TestLevel, config: &CullingConfig) -> CellGraph {
    CellGraph::build(&test.level, &test.scene, config).unwrap()
}

fn shadowed(range: f32) -> LightDesc {
    LightDesc {
        position: Vec3::new(8.0, 2.5, 5.0),
        range,
        shadows: LightShadows::Hard,
        shadow_strength: 1.0,
        shadow_fade: false,
    }
}

// ============================================================================
// Classification
// ============================================================================

#[test]
fn test_leak_classification() {
    let mut scene = SceneObjects::new();
    let full = scene.add_light(shadowed(10.0));
    let none = scene.add_light(LightDesc { shadows: LightShadows::None, ..shadowed(10.0) });
    let weak = scene.add_light(LightDesc { shadow_strength: 0.5, ..shadowed(10.0) });
    let fading = scene.add_light(LightDesc { shadow_fade: true, ..shadowed(10.0) });

    assert!(!leaks(scene.light(full).unwrap(), false));
    assert!(leaks(scene.light(none).unwrap(), false));
    assert!(leaks(scene.light(weak).unwrap(), false));
    assert!(!leaks(scene.light(fading).unwrap(), false));
    assert!(leaks(scene.light(fading).unwrap(), true));
}

// ============================================================================
// Full-shadow lights
// ============================================================================

#[test]
fn test_shadowed_light_reaches_cells_through_portals() {
    let mut test = straight_chain();
    let light = light_in_a(&mut test, shadowed(15.0));
    let graph = build_with(&test, &CullingConfig::default());

    assert!(graph.cell(CELL_A).unwrap().external_lights().is_empty());
    assert_eq!(graph.cell(CELL_B).unwrap().external_lights(), &[light]);
    assert_eq!(graph.cell(CELL_C).unwrap().external_lights(), &[light]);
}

#[test]
fn test_shadowed_light_keeps_path_geometry_as_occluders() {
    let mut test = straight_chain();
    light_in_a(&mut test, shadowed(15.0));
    let graph = build_with(&test, &CullingConfig::default());

    let b = graph.cell(CELL_B).unwrap().external_occluders();
    assert_eq!(b, &[test.floors[0]]);

    let c = graph.cell(CELL_C).unwrap().external_occluders();
    assert_eq!(c.len(), 2);
    assert!(c.contains(&test.floors[0]));
    assert!(c.contains(&test.floors[1]));
}

#[test]
fn test_shadowed_light_stops_at_portals_out_of_range() {
    let mut test = straight_chain();
    let light = light_in_a(&mut test, shadowed(5.0));
    let graph = build_with(&test, &CullingConfig::default());

    assert_eq!(graph.cell(CELL_B).unwrap().external_lights(), &[light]);
    assert!(graph.cell(CELL_C).unwrap().external_lights().is_empty());
    assert!(graph.cell(CELL_C).unwrap().external_occluders().is_empty());
}

#[test]
fn test_shadowed_light_does_not_reach_cells_out_of_sight() {
    let mut test = bent_chain();
    let light = light_in_a(&mut test, LightDesc { position: Vec3::new(2.0, 2.0, 5.0), ..shadowed(40.0) });
    let graph = build_with(&test, &CullingConfig::default());

    assert_eq!(graph.cell(CELL_B).unwrap().external_lights(), &[light]);
    assert!(graph.cell(CELL_C).unwrap().external_lights().is_empty());
}

// ============================================================================
// Leaking lights
// ============================================================================

#[test]
fn test_unshadowed_light_reaches_every_cell_in_range() {
    let mut test = bent_chain();
    let light = light_in_a(&mut test, LightDesc {
        position: Vec3::new(9.0, 2.0, 9.0),
        shadows: LightShadows::None,
        ..shadowed(3.0)
    });
    let graph = build_with(&test, &CullingConfig::default());

    assert!(graph.cell(CELL_A).unwrap().external_lights().is_empty());
    assert_eq!(graph.cell(CELL_B).unwrap().external_lights(), &[light]);
    assert_eq!(graph.cell(CELL_C).unwrap().external_lights(), &[light]);
    for (_, cell) in graph.cells() {
        assert!(cell.external_occluders().is_empty());
    }
}

#[test]
fn test_fading_light_leaks_only_when_enabled() {
    let desc = LightDesc { position: Vec3::new(9.0, 2.0, 9.0), shadow_fade: true, ..shadowed(3.0) };

    let mut test = bent_chain();
    light_in_a(&mut test, desc.clone());
    let graph = build_with(&test, &CullingConfig::default());
    assert!(graph.cell(CELL_C).unwrap().external_lights().is_empty());

    let mut test = bent_chain();
    let light = light_in_a(&mut test, desc);
    let config = CullingConfig { shadow_fading: true, ..Default::default() };
    let graph = build_with(&test, &config);
    assert_eq!(graph.cell(CELL_C).unwrap().external_lights(), &[light]);
}

#[test]
fn test_light_in_malformed_cell_falls_back_to_range() {
    let mut test = straight_chain();
    let light = light_in_a(&mut test, shadowed(3.0));
    test.level.tiles[0].connect(99, corners_x(0.0, 1.0, 3.0, 4.0, 6.0));
    let graph = build_with(&test, &CullingConfig::default());

    assert_eq!(graph.cell(CELL_B).unwrap().external_lights(), &[light]);
    assert!(graph.cell(CELL_B).unwrap().external_occluders().is_empty());
}
