use shardd::core::math::Transform;
use shardd::distance::SimplexCache;
use shardd::manifold::collide_polygons;
use shardd::shapes;

fn approx(a: f32, b: f32, tol: f32) -> bool {
    (a - b).abs() <= tol
}

#[test]
fn overlapping_squares_clip_to_two_points() {
    let a = shapes::square_polygon(0.5);
    let b = shapes::square_polygon(0.5);

    // 0.1 of penetration along x.
    let xf_b = Transform::from_pos_angle([0.9, 0.0], 0.0);
    let mut cache = SimplexCache::default();
    let manifold = collide_polygons(&a, &b, Transform::IDENTITY, xf_b, &mut cache);

    assert_eq!(manifold.point_count, 2);
    assert!(approx(manifold.normal.x, 1.0, 1.0e-4));
    assert!(approx(manifold.normal.y, 0.0, 1.0e-4));
    for point in manifold.points() {
        assert!(approx(point.separation, -0.1, 1.0e-4));
    }

    // Feature ids are distinct and stable across a rebuild.
    let ids: Vec<u16> = manifold.points().iter().map(|p| p.id).collect();
    assert_ne!(ids[0], ids[1]);
    let manifold2 = collide_polygons(&a, &b, Transform::IDENTITY, xf_b, &mut cache);
    let ids2: Vec<u16> = manifold2.points().iter().map(|p| p.id).collect();
    assert_eq!(ids, ids2);
}

#[test]
fn near_squares_get_speculative_points() {
    let a = shapes::square_polygon(0.5);
    let b = shapes::square_polygon(0.5);

    // 0.01 gap: inside the speculative threshold, outside touching.
    let xf_b = Transform::from_pos_angle([1.01, 0.0], 0.0);
    let mut cache = SimplexCache::default();
    let manifold = collide_polygons(&a, &b, Transform::IDENTITY, xf_b, &mut cache);

    assert!(manifold.point_count >= 1);
    assert!(approx(manifold.normal.x, 1.0, 1.0e-3));
    for point in manifold.points() {
        assert!(point.separation > 0.0);
        assert!(approx(point.separation, 0.01, 5.0e-3));
    }
}

#[test]
fn distant_squares_have_no_manifold() {
    let a = shapes::square_polygon(0.5);
    let b = shapes::square_polygon(0.5);

    let xf_b = Transform::from_pos_angle([5.0, 0.0], 0.0);
    let mut cache = SimplexCache::default();
    let manifold = collide_polygons(&a, &b, Transform::IDENTITY, xf_b, &mut cache);
    assert_eq!(manifold.point_count, 0);
}

#[test]
fn anchors_map_between_frames() {
    let a = shapes::square_polygon(0.5);
    let b = shapes::square_polygon(0.5);

    let xf_a = Transform::from_pos_angle([10.0, -2.0], 0.0);
    let xf_b = Transform::from_pos_angle([10.9, -2.0], 0.0);
    let mut cache = SimplexCache::default();
    let manifold = collide_polygons(&a, &b, xf_a, xf_b, &mut cache);

    assert_eq!(manifold.point_count, 2);
    for point in manifold.points() {
        // The two anchors name the same world point (up to the midpoint
        // convention both share).
        let world_a = xf_a.transform_point(point.local_anchor_a);
        let world_b = xf_b.transform_point(point.local_anchor_b);
        assert!(approx(world_a.x, world_b.x, 1.0e-4));
        assert!(approx(world_a.y, world_b.y, 1.0e-4));
    }
}

#[test]
fn rotated_reference_normal_is_world_frame() {
    let a = shapes::square_polygon(0.5);
    let b = shapes::square_polygon(0.5);

    // A rotated 90°: its local +x normal points world +y; B sits above.
    let xf_a = Transform::from_pos_angle([0.0, 0.0], core::f32::consts::FRAC_PI_2);
    let xf_b = Transform::from_pos_angle([0.0, 0.9], 0.0);
    let mut cache = SimplexCache::default();
    let manifold = collide_polygons(&a, &b, xf_a, xf_b, &mut cache);

    assert!(manifold.point_count > 0);
    assert!(approx(manifold.normal.x, 0.0, 1.0e-3));
    assert!(approx(manifold.normal.y, 1.0, 1.0e-3));
}
