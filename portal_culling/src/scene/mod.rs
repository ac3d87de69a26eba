//! Scene objects controlled by culling.
//!
//! Renderables and lights are created by the caller (level generation,
//! gameplay) and referenced by stable slot-map keys. Culling only flips
//! their visible / enabled flags and records which keys changed.

mod scene_objects;
mod dynamic;

pub use scene_objects::{
    SceneObjects, Renderable, RenderableKey, Light, LightDesc, LightKey, LightShadows,
};
pub use dynamic::DynamicBuckets;
