use shardd::shapes::{self, Polygon};
use shardd::types::Vec2;

fn approx(a: f32, b: f32, tol: f32) -> bool {
    (a - b).abs() <= tol
}

#[test]
fn hull_drops_interior_points() {
    // Unit square plus an interior point: hull has exactly the 4 corners.
    let points = [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
        Vec2::new(0.5, 0.5),
    ];
    let polygon = Polygon::from_points(&points);
    assert_eq!(polygon.count(), 4);

    // CCW winding: positive signed area.
    let verts = polygon.vertices();
    let mut area2 = 0.0;
    for i in 0..verts.len() {
        let j = (i + 1) % verts.len();
        area2 += verts[i].cross(verts[j]);
    }
    assert!(area2 > 0.0);

    // Every corner of the square survives.
    for corner in &points[..4] {
        assert!(verts.iter().any(|v| approx(v.x, corner.x, 1.0e-6) && approx(v.y, corner.y, 1.0e-6)));
    }

    // Outward unit normals with non-zero edges.
    for i in 0..polygon.count() {
        let n = polygon.normal(i);
        assert!(approx(n.length(), 1.0, 1.0e-5));
        let j = (i + 1) % polygon.count();
        let edge = polygon.vertex(j) - polygon.vertex(i);
        assert!(edge.length() > 0.0);
        assert!(approx(n.dot(edge), 0.0, 1.0e-5));
    }
}

#[test]
fn triangle_survives_unchanged() {
    let points = [
        Vec2::new(0.0, 0.0),
        Vec2::new(2.0, 0.0),
        Vec2::new(0.0, 2.0),
    ];
    let polygon = Polygon::from_points(&points);
    assert_eq!(polygon.count(), 3);
}

#[test]
fn degenerate_inputs_yield_empty_polygons() {
    // Too few points.
    assert!(Polygon::from_points(&[Vec2::ZERO, Vec2::new(1.0, 0.0)]).is_empty());

    // Too many points (the 9th vertex is rejected wholesale).
    let mut many = Vec::new();
    for i in 0..9 {
        let a = i as f32;
        many.push(Vec2::new(a.cos(), a.sin()));
    }
    assert!(Polygon::from_points(&many).is_empty());

    // All collinear.
    let collinear = [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(2.0, 2.0),
        Vec2::new(3.0, 3.0),
    ];
    assert!(Polygon::from_points(&collinear).is_empty());

    // Welded down to a single cluster.
    let tight = [
        Vec2::new(0.0, 0.0),
        Vec2::new(0.001, 0.0),
        Vec2::new(0.0, 0.001),
    ];
    assert!(Polygon::from_points(&tight).is_empty());
}

#[test]
fn unit_square_mass_properties() {
    let points = [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ];
    let polygon = Polygon::from_points(&points);
    let md = polygon.compute_mass(1.0);

    assert!(approx(md.mass, 1.0, 1.0e-5));
    assert!(approx(md.center.x, 0.5, 1.0e-5));
    assert!(approx(md.center.y, 0.5, 1.0e-5));

    // Inertia about the origin is 2/3; the parallel-axis shift to the
    // centroid leaves the familiar 1/6 for a unit square.
    assert!(approx(md.inertia, 2.0 / 3.0, 1.0e-5));
    let about_center = md.inertia - md.mass * md.center.dot(md.center);
    assert!(approx(about_center, 1.0 / 6.0, 1.0e-5));
}

#[test]
fn box_polygon_matches_hull_construction() {
    let direct = shapes::box_polygon(0.5, 0.5);
    let hulled = Polygon::from_points(&[
        Vec2::new(-0.5, -0.5),
        Vec2::new(0.5, -0.5),
        Vec2::new(0.5, 0.5),
        Vec2::new(-0.5, 0.5),
    ]);
    assert_eq!(direct.count(), 4);
    assert_eq!(hulled.count(), 4);

    let md_direct = direct.compute_mass(2.0);
    let md_hulled = hulled.compute_mass(2.0);
    assert!(approx(md_direct.mass, md_hulled.mass, 1.0e-5));
    assert!(approx(md_direct.mass, 2.0, 1.0e-5));
    assert!(approx(md_direct.center.x, 0.0, 1.0e-5));
    assert!(approx(md_direct.inertia, md_hulled.inertia, 1.0e-5));
}

#[test]
fn regular_polygon_and_helpers() {
    let hexagon = shapes::regular_polygon(6);
    assert_eq!(hexagon.count(), 6);

    let offset = shapes::offset_box_polygon(0.5, 0.25, Vec2::new(1.0, 2.0), 0.0);
    let md = offset.compute_mass(1.0);
    assert!(approx(md.center.x, 1.0, 1.0e-5));
    assert!(approx(md.center.y, 2.0, 1.0e-5));

    assert!(shapes::polygon_from_points([[0.0_f32, 0.0], [1.0, 0.0]]).is_none());
    assert!(
        shapes::polygon_from_points([[0.0_f32, 0.0], [1.0, 0.0], [0.0, 1.0]]).is_some()
    );
}
