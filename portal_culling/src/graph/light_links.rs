/// External lights and occluders, computed once per build.
///
/// Lights that leak (no full shadows) reach every cell their range touches.
/// Fully shadowed lights only reach cells visible from the light through
/// portals, and those cells must keep the geometry between them and the light
/// drawn so shadows stay correct.

use rustc_hash::FxHashSet;

use crate::config::CullingConfig;
use crate::geometry::Frustum;
use crate::scene::{Light, LightKey, RenderableKey, SceneObjects};
use crate::visibility::TraversalContext;
use super::cell::CellId;
use super::cell_graph::CellGraph;

/// Per-cell results, indexed like the graph's cells
pub(crate) struct LightLinks {
    pub external_lights: Vec<Vec<LightKey>>,
    pub external_occluders: Vec<Vec<RenderableKey>>,
}

/// Whether a light's contribution cannot be bounded by portals
pub(crate) fn leaks(light: &Light, shadow_fading: bool) -> bool {
    !light.casts_full_shadows() || (shadow_fading && light.shadow_fade())
}

pub(crate) fn compute(graph: &CellGraph, scene: &SceneObjects, config: &CullingConfig) -> LightLinks {
    let count = graph.cell_count();
    let mut lights: Vec<Vec<LightKey>> = vec![Vec::new(); count];
    let mut occluders: Vec<FxHashSet<RenderableKey>> = vec![FxHashSet::default(); count];
    let mut context = TraversalContext::new(config.max_traversal_depth);

    for (owner, cell) in graph.cells() {
        for &key in cell.lights() {
            let Some(light) = scene.light(key) else { continue };

            if leaks(light, config.shadow_fading) || !cell.is_traversable() {
                link_by_range(graph, owner, key, light, &mut lights);
            } else {
                link_by_portals(graph, owner, key, light, &mut context, &mut lights, &mut occluders);
            }
        }
    }

    crate::cull_debug!("portal_culling::LightLinks", "Linked {} external lights, {} external occluders",
        lights.iter().map(Vec::len).sum::<usize>(),
        occluders.iter().map(FxHashSet::len).sum::<usize>());

    LightLinks {
        external_lights: lights,
        external_occluders: occluders.into_iter().map(|set| set.into_iter().collect()).collect(),
    }
}

fn link_by_range(
    graph: &CellGraph,
    owner: CellId,
    key: LightKey,
    light: &Light,
    lights: &mut [Vec<LightKey>],
) {
    let (position, range) = (light.position(), light.range());
    for (id, cell) in graph.cells() {
        if id != owner && cell.bounds().intersects_sphere(position, range) {
            push_unique(&mut lights[id.index()], key);
        }
    }
}

fn link_by_portals(
    graph: &CellGraph,
    owner: CellId,
    key: LightKey,
    light: &Light,
    context: &mut TraversalContext,
    lights: &mut [Vec<LightKey>],
    occluders: &mut [FxHashSet<RenderableKey>],
) {
    let (position, range) = (light.position(), light.range());
    context.portal_traversal(
        graph,
        position,
        owner,
        Frustum::unbounded(),
        |portal| portal.bounds().intersects_sphere(position, range),
        |cell, path| {
            if cell == owner {
                return;
            }
            push_unique(&mut lights[cell.index()], key);
            let before = &path[..path.len() - 1];
            let occluding = &mut occluders[cell.index()];
            for &on_path in before {
                occluding.extend(graph.cell_at(on_path).renderables().iter().copied());
            }
        },
    );
}

fn push_unique<T: PartialEq>(list: &mut Vec<T>, item: T) {
    if !list.contains(&item) {
        list.push(item);
    }
}

#[cfg(test)]
#[path = "light_links_tests.rs"]
mod tests;
