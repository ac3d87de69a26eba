/// Tests for CullingConfig

use super::*;
use crate::error::Error;

#[test]
fn test_default_config() {
    let config = CullingConfig::default();

    assert_eq!(config.mode, CullingMode::PortalTraversal);
    assert_eq!(config.max_traversal_depth, 64);
    assert_eq!(config.adjacency_depth, 1);
    assert_eq!(config.update_interval, 1);
    assert_eq!(config.portal_bounds_mode, PortalBoundsMode::Authored);
    assert!((config.boundary_inset - 0.2).abs() < f32::EPSILON);
    assert!(!config.shadow_fading);
    assert!(config.validate().is_ok());
}

#[test]
fn test_zero_depth_is_rejected() {
    let config = CullingConfig { max_traversal_depth: 0, ..Default::default() };

    assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
}

#[test]
fn test_zero_interval_is_rejected() {
    let config = CullingConfig { update_interval: 0, ..Default::default() };

    assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
}

#[test]
fn test_bad_inset_is_rejected() {
    let negative = CullingConfig { boundary_inset: -1.0, ..Default::default() };
    let nan = CullingConfig { boundary_inset: f32::NAN, ..Default::default() };

    assert!(negative.validate().is_err());
    assert!(nan.validate().is_err());
}

#[test]
fn test_zero_adjacency_depth_is_valid() {
    let config = CullingConfig {
        mode: CullingMode::AdjacentCells,
        adjacency_depth: 0,
        ..Default::default()
    };

    assert!(config.validate().is_ok());
}
