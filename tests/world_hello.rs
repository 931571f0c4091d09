use shardd::prelude::*;

fn approx(a: f32, b: f32, tol: f32) -> bool {
    (a - b).abs() <= tol
}

fn unit_square() -> Polygon {
    Polygon::from_points(&[
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ])
}

#[test]
fn falling_box_comes_to_rest_on_ground() {
    let mut world = World::new(WorldDef::builder().gravity([0.0_f32, -9.81]).build());

    // Static ground slab spanning y in [-0.25, 0.25].
    let ground = world.create_body(BodyBuilder::new().position([0.0_f32, 0.0]).build());
    world
        .create_polygon_shape(
            ground,
            &ShapeDef::builder().density(0.0).build(),
            &shapes::box_polygon(10.0, 0.25),
        )
        .unwrap();

    // Dynamic unit square dropped from y = 1.
    let body = world.create_body(
        BodyBuilder::new()
            .body_type(BodyType::Dynamic)
            .position([0.0_f32, 1.0])
            .build(),
    );
    let sdef = ShapeDef::builder().density(1.0).friction(0.2).build();
    world.create_polygon_shape(body, &sdef, &unit_square()).unwrap();

    for _ in 0..30 {
        world.step(1.0 / 60.0, 8, 3, true);
    }
    let pos = world.body_position(body);
    let vel = world.body_linear_velocity(body);
    assert!(pos.y > 0.23 && pos.y < 0.29, "y after 30 steps: {}", pos.y);
    assert!(vel.y.abs() < 0.06, "vy after 30 steps: {}", vel.y);

    for _ in 0..30 {
        world.step(1.0 / 60.0, 8, 3, true);
    }
    let pos = world.body_position(body);
    let vel = world.body_linear_velocity(body);
    assert!(approx(pos.x, 0.0, 0.01), "x drift: {}", pos.x);
    assert!(pos.y > 0.23 && pos.y < 0.29, "y after 60 steps: {}", pos.y);
    assert!(vel.length() < 5.0e-3, "residual speed: {}", vel.length());

    // The resting pair is a single persistent contact with contact points.
    let contacts: Vec<_> = world.contacts().collect();
    assert_eq!(contacts.len(), 1);
    let manifold = world.contact_manifold(contacts[0]).unwrap();
    assert!(manifold.point_count > 0);
}
