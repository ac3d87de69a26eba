//! Viewpoints: passive camera data handed to the culling engine.
//!
//! The engine does NOT store viewpoints. The caller builds them each frame
//! from its cameras (and anything else that needs visibility, such as
//! reflection probes) and passes them to `CullingEngine::update`.

mod viewpoint;

pub use viewpoint::Viewpoint;
