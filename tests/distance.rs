use shardd::core::math::Transform;
use shardd::distance::{DistanceInput, DistanceProxy, SimplexCache, shape_distance};
use shardd::shapes;

fn approx(a: f32, b: f32, tol: f32) -> bool {
    (a - b).abs() <= tol
}

#[test]
fn separated_squares_distance() {
    let a = shapes::square_polygon(0.5);
    let b = shapes::square_polygon(0.5);

    let input = DistanceInput {
        proxy_a: DistanceProxy::from_polygon(&a),
        proxy_b: DistanceProxy::from_polygon(&b),
        transform_a: Transform::IDENTITY,
        transform_b: Transform::from_pos_angle([3.0, 0.0], 0.0),
    };
    let mut cache = SimplexCache::default();
    let out = shape_distance(&input, &mut cache);

    assert!(approx(out.distance, 2.0, 1.0e-4));
    assert!(approx(out.point_a.x, 0.5, 1.0e-4));
    assert!(approx(out.point_b.x, 2.5, 1.0e-4));
    assert!(cache.count > 0);
}

#[test]
fn diagonal_offset_vertex_vertex() {
    let a = shapes::square_polygon(0.5);
    let b = shapes::square_polygon(0.5);

    // Corner to corner along the diagonal.
    let input = DistanceInput {
        proxy_a: DistanceProxy::from_polygon(&a),
        proxy_b: DistanceProxy::from_polygon(&b),
        transform_a: Transform::IDENTITY,
        transform_b: Transform::from_pos_angle([2.0, 2.0], 0.0),
    };
    let mut cache = SimplexCache::default();
    let out = shape_distance(&input, &mut cache);

    assert!(approx(out.distance, core::f32::consts::SQRT_2, 1.0e-3));
    assert!(approx(out.point_a.x, 0.5, 1.0e-3));
    assert!(approx(out.point_a.y, 0.5, 1.0e-3));
    assert!(approx(out.point_b.x, 1.5, 1.0e-3));
    assert!(approx(out.point_b.y, 1.5, 1.0e-3));
}

#[test]
fn identical_shapes_overlap_immediately() {
    let a = shapes::square_polygon(0.5);
    let b = shapes::square_polygon(0.5);

    let input = DistanceInput {
        proxy_a: DistanceProxy::from_polygon(&a),
        proxy_b: DistanceProxy::from_polygon(&b),
        transform_a: Transform::IDENTITY,
        transform_b: Transform::IDENTITY,
    };
    let mut cache = SimplexCache::default();
    let out = shape_distance(&input, &mut cache);

    assert!(approx(out.distance, 0.0, 1.0e-5));
    assert!(out.iterations <= 2, "iterations {}", out.iterations);
}

#[test]
fn warm_started_query_converges_fast() {
    let a = shapes::square_polygon(0.5);
    let b = shapes::square_polygon(0.5);

    let input = DistanceInput {
        proxy_a: DistanceProxy::from_polygon(&a),
        proxy_b: DistanceProxy::from_polygon(&b),
        transform_a: Transform::IDENTITY,
        transform_b: Transform::from_pos_angle([3.0, 0.25], 0.0),
    };
    let mut cache = SimplexCache::default();
    let cold = shape_distance(&input, &mut cache);

    // Same geometry with a warm cache: one or two iterations.
    let warm = shape_distance(&input, &mut cache);
    assert!(approx(warm.distance, cold.distance, 1.0e-5));
    assert!(warm.iterations <= 2, "iterations {}", warm.iterations);

    // Stale cache indices (fewer vertices than cached) fall back cleanly.
    let triangle = shapes::regular_polygon(3);
    let input2 = DistanceInput {
        proxy_a: DistanceProxy::from_polygon(&a),
        proxy_b: DistanceProxy::from_polygon(&triangle),
        transform_a: Transform::IDENTITY,
        transform_b: Transform::from_pos_angle([4.0, 0.0], 0.0),
    };
    let out2 = shape_distance(&input2, &mut cache);
    assert!(out2.distance > 0.0);
}
