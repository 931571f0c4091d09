use shardd::prelude::*;

fn unit_square() -> Polygon {
    Polygon::from_points(&[
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ])
}

fn drop_box_world(mode: SolverMode) -> (World, BodyId) {
    let mut world = World::new(
        WorldDef::builder()
            .gravity([0.0_f32, -9.81])
            .solver_mode(mode)
            .build(),
    );

    let ground = world.create_body(BodyBuilder::new().position([0.0_f32, 0.0]).build());
    world
        .create_polygon_shape(
            ground,
            &ShapeDef::builder().density(0.0).build(),
            &shapes::box_polygon(10.0, 0.25),
        )
        .unwrap();

    let body = world.create_body(
        BodyBuilder::new()
            .body_type(BodyType::Dynamic)
            .position([0.0_f32, 1.0])
            .build(),
    );
    world
        .create_polygon_shape(
            body,
            &ShapeDef::builder().density(1.0).friction(0.3).build(),
            &unit_square(),
        )
        .unwrap();

    (world, body)
}

#[test]
fn soft_solver_rests_cleanly() {
    let (mut world, body) = drop_box_world(SolverMode::Soft);
    for _ in 0..120 {
        world.step(1.0 / 60.0, 8, 3, true);
    }
    let pos = world.body_position(body);
    assert!(pos.y > 0.22 && pos.y < 0.3, "y: {}", pos.y);
    assert!(world.body_linear_velocity(body).length() < 1.0e-2);
}

#[test]
fn baumgarte_solver_rests_too() {
    let (mut world, body) = drop_box_world(SolverMode::Baumgarte);
    for _ in 0..120 {
        world.step(1.0 / 60.0, 8, 0, true);
    }
    let pos = world.body_position(body);
    assert!(pos.y > 0.2 && pos.y < 0.32, "y: {}", pos.y);
    assert!(world.body_linear_velocity(body).length() < 0.1);
}

#[test]
fn solver_mode_can_switch_mid_run() {
    let (mut world, body) = drop_box_world(SolverMode::Baumgarte);
    for _ in 0..60 {
        world.step(1.0 / 60.0, 8, 0, true);
    }
    world.set_solver_mode(SolverMode::Soft);
    assert_eq!(world.solver_mode(), SolverMode::Soft);
    for _ in 0..60 {
        world.step(1.0 / 60.0, 8, 3, true);
    }
    let pos = world.body_position(body);
    assert!(pos.y > 0.2 && pos.y < 0.32, "y: {}", pos.y);
}

#[test]
fn warm_starting_speeds_up_convergence() {
    // Two identical drops; the warm-started one should be at least as calm
    // after the same number of steps.
    let (mut warm, warm_body) = drop_box_world(SolverMode::Soft);
    let (mut cold, cold_body) = drop_box_world(SolverMode::Soft);

    for _ in 0..90 {
        warm.step(1.0 / 60.0, 8, 3, true);
        cold.step(1.0 / 60.0, 8, 3, false);
    }

    let warm_speed = warm.body_linear_velocity(warm_body).length();
    let cold_speed = cold.body_linear_velocity(cold_body).length();
    assert!(warm_speed < 0.05, "warm residual speed: {warm_speed}");
    assert!(warm_speed <= cold_speed + 5.0e-3);

    // Both still end up resting on the slab.
    let y = warm.body_position(warm_body).y;
    assert!(y > 0.2 && y < 0.32, "warm y: {y}");
}
