use shardd::prelude::*;

#[test]
fn empty_world_steps_without_effect() {
    let mut world = World::new(WorldDef::default());
    for _ in 0..10 {
        world.step(1.0 / 60.0, 4, 2, true);
    }
    let counters = world.counters();
    assert_eq!(counters.body_count, 0);
    assert_eq!(counters.shape_count, 0);
    assert_eq!(counters.contact_count, 0);
    assert_eq!(counters.proxy_count, 0);
}

#[test]
fn isolated_resting_body_stays_at_rest() {
    let mut world = World::new(WorldDef::builder().gravity([0.0_f32, 0.0]).build());

    let body = world.create_body(
        BodyBuilder::new()
            .body_type(BodyType::Dynamic)
            .position([2.0_f32, 3.0])
            .build(),
    );
    world
        .create_polygon_shape(
            body,
            &ShapeDef::builder().density(1.0).build(),
            &shapes::square_polygon(0.5),
        )
        .unwrap();

    let before = world.body_position(body);
    for _ in 0..60 {
        world.step(1.0 / 60.0, 8, 3, true);
    }
    let after = world.body_position(body);

    assert_eq!(world.body_linear_velocity(body), Vec2::ZERO);
    assert_eq!(world.body_angular_velocity(body), 0.0);
    assert!((after - before).length() < 1.0e-6);
}

#[test]
fn gravity_can_be_disabled_per_body() {
    let mut world = World::new(WorldDef::builder().gravity([0.0_f32, -9.81]).build());

    let floating = world.create_body(
        BodyBuilder::new()
            .body_type(BodyType::Dynamic)
            .position([0.0_f32, 5.0])
            .use_gravity(false)
            .build(),
    );
    world
        .create_polygon_shape(
            floating,
            &ShapeDef::builder().density(1.0).build(),
            &shapes::square_polygon(0.5),
        )
        .unwrap();

    for _ in 0..30 {
        world.step(1.0 / 60.0, 4, 2, true);
    }
    assert_eq!(world.body_linear_velocity(floating), Vec2::ZERO);

    world.set_body_use_gravity(floating, true).unwrap();
    world.step(1.0 / 60.0, 4, 2, true);
    assert!(world.body_linear_velocity(floating).y < 0.0);
}
