/// Tests for Portal

use super::*;

fn doorway() -> Portal {
    Portal::new(
        CellId(0),
        CellId(1),
        [
            Vec3::new(10.0, 1.0, 4.0),
            Vec3::new(10.0, 1.0, 6.0),
            Vec3::new(10.0, 3.0, 6.0),
            Vec3::new(10.0, 3.0, 4.0),
        ],
    )
}

#[test]
fn test_portal_accessors() {
    let portal = doorway();

    assert_eq!(portal.source(), CellId(0));
    assert_eq!(portal.target(), CellId(1));
    assert_eq!(portal.center(), Vec3::new(10.0, 2.0, 5.0));
    assert_eq!(portal.bounds().min, Vec3::new(10.0, 1.0, 4.0));
    assert_eq!(portal.bounds().max, Vec3::new(10.0, 3.0, 6.0));
    assert!((portal.area() - 4.0).abs() < 1e-5);
    assert!(!portal.is_degenerate());
}

#[test]
fn test_zero_width_portal_is_degenerate() {
    let p = Vec3::new(10.0, 2.0, 5.0);
    let portal = Portal::new(CellId(0), CellId(1), [p, p, Vec3::new(10.0, 3.0, 5.0), Vec3::new(10.0, 3.0, 5.0)]);

    assert!(portal.is_degenerate());
}

// ============================================================================
// Sub-frustum
// ============================================================================

#[test]
fn test_sub_frustum_has_four_sides_and_near() {
    let frustum = doorway().sub_frustum(Vec3::new(2.0, 2.0, 5.0));
    assert_eq!(frustum.len(), 5);
}

#[test]
fn test_sub_frustum_admits_points_seen_through_the_opening() {
    let frustum = doorway().sub_frustum(Vec3::new(2.0, 2.0, 5.0));

    assert!(frustum.contains_point(Vec3::new(12.0, 2.0, 5.0)));
    assert!(frustum.contains_point(Vec3::new(18.0, 3.5, 6.5)));
}

#[test]
fn test_sub_frustum_rejects_points_outside_the_cone() {
    let frustum = doorway().sub_frustum(Vec3::new(2.0, 2.0, 5.0));

    assert!(!frustum.contains_point(Vec3::new(12.0, 10.0, 5.0)));
    assert!(!frustum.contains_point(Vec3::new(12.0, 2.0, -3.0)));
}

#[test]
fn test_sub_frustum_rejects_points_before_the_portal() {
    let frustum = doorway().sub_frustum(Vec3::new(2.0, 2.0, 5.0));

    assert!(!frustum.contains_point(Vec3::new(5.0, 2.0, 5.0)));
}

#[test]
fn test_sub_frustum_works_from_either_side() {
    let frustum = doorway().sub_frustum(Vec3::new(18.0, 2.0, 5.0));

    assert!(frustum.contains_point(Vec3::new(8.0, 2.0, 5.0)));
    assert!(!frustum.contains_point(Vec3::new(12.0, 2.0, 5.0)));
}

#[test]
fn test_sub_frustum_from_portal_plane_is_unbounded() {
    let frustum = doorway().sub_frustum(Vec3::new(10.0, 8.0, 5.0));

    assert!(frustum.is_empty());
}

#[test]
fn test_nested_portals_only_narrow_the_view() {
    let origin = Vec3::new(2.0, 2.0, 5.0);
    let outer = doorway().sub_frustum(origin);
    let inner = Portal::new(
        CellId(1),
        CellId(2),
        [
            Vec3::new(20.0, 1.5, 4.5),
            Vec3::new(20.0, 1.5, 5.5),
            Vec3::new(20.0, 2.5, 5.5),
            Vec3::new(20.0, 2.5, 4.5),
        ],
    )
    .sub_frustum(origin);

    let mut admitted_by_inner = 0;
    for x in 21..30 {
        for y in -4..8 {
            for z in -2..12 {
                let p = Vec3::new(x as f32, y as f32 * 0.5, z as f32 * 0.5 + 2.0);
                if inner.contains_point(p) {
                    admitted_by_inner += 1;
                    assert!(outer.contains_point(p), "{:?} escapes the outer portal", p);
                }
            }
        }
    }
    assert!(admitted_by_inner > 0);
}

// ============================================================================
// Derived bounds
// ============================================================================

#[test]
fn test_derive_corners_spans_cell_on_portal_plane() {
    let cell = AABB::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(20.0, 5.0, 10.0));
    let derived = derive_corners_from_cell(doorway().corners(), &cell);

    for corner in derived {
        assert_eq!(corner.x, 10.0);
    }
    let bounds = AABB::from_points(&derived).unwrap();
    assert_eq!(bounds.min, Vec3::new(10.0, 0.0, 0.0));
    assert_eq!(bounds.max, Vec3::new(10.0, 5.0, 10.0));

    let portal = Portal::new(CellId(0), CellId(1), derived);
    assert!((portal.area() - 50.0).abs() < 1e-4);
}

#[test]
fn test_derive_corners_keeps_degenerate_rectangle() {
    let p = Vec3::new(1.0, 2.0, 3.0);
    let authored = [p; 4];
    let cell = AABB::new(Vec3::ZERO, Vec3::splat(10.0));

    assert_eq!(derive_corners_from_cell(&authored, &cell), authored);
}
