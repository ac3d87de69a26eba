use glam::{Vec3, Vec4};
use super::*;

#[test]
fn test_from_points_xy_plane() {
    let plane = Plane::from_points(Vec3::ZERO, Vec3::X, Vec3::Y);
    assert!((plane.normal - Vec3::Z).length() < 1e-6);
    assert!((plane.signed_distance(Vec3::new(0.0, 0.0, 1.0)) - 1.0).abs() < 1e-6);
    assert!((plane.signed_distance(Vec3::new(5.0, 5.0, -2.0)) + 2.0).abs() < 1e-6);
}

#[test]
fn test_flipped() {
    let plane = Plane::from_point_normal(Vec3::new(0.0, 3.0, 0.0), Vec3::Y);
    let p = Vec3::new(1.0, 5.0, 1.0);
    assert!((plane.signed_distance(p) - 2.0).abs() < 1e-6);
    assert!((plane.flipped().signed_distance(p) + 2.0).abs() < 1e-6);
}

#[test]
fn test_collinear_points_are_degenerate() {
    let plane = Plane::from_points(Vec3::ZERO, Vec3::X, Vec3::new(2.0, 0.0, 0.0));
    assert!(plane.is_degenerate());
    assert_eq!(plane.signed_distance(Vec3::new(3.0, 4.0, 5.0)), 0.0);
}

#[test]
fn test_coincident_points_are_degenerate() {
    let p = Vec3::new(1.0, 2.0, 3.0);
    assert!(Plane::from_points(p, p, Vec3::ZERO).is_degenerate());
}

#[test]
fn test_from_vec4_normalizes() {
    let plane = Plane::from_vec4(Vec4::new(0.0, 2.0, 0.0, -4.0));
    assert!((plane.normal - Vec3::Y).length() < 1e-6);
    assert!((plane.distance + 2.0).abs() < 1e-6);
}

#[test]
fn test_from_vec4_zero_is_degenerate() {
    assert!(Plane::from_vec4(Vec4::ZERO).is_degenerate());
}

#[test]
fn test_admits_box() {
    // Positive half-space is x > 0
    let plane = Plane::from_point_normal(Vec3::ZERO, Vec3::X);

    assert!(plane.admits_box(Vec3::new(2.0, 0.0, 0.0), Vec3::ONE));
    // Straddling the plane is admitted
    assert!(plane.admits_box(Vec3::new(-0.5, 0.0, 0.0), Vec3::ONE));
    // Fully behind
    assert!(!plane.admits_box(Vec3::new(-2.0, 0.0, 0.0), Vec3::ONE));
    // Touching only
    assert!(!plane.admits_box(Vec3::new(-1.0, 0.0, 0.0), Vec3::ONE));
}
