#![cfg(feature = "serde")]

use shardd::prelude::*;

#[test]
fn defs_round_trip_through_json() {
    let world_def = WorldDef::builder()
        .gravity([0.0_f32, -3.7])
        .solver_mode(SolverMode::Baumgarte)
        .contact_hertz(15.0)
        .contact_damping_ratio(5.0)
        .build();
    let json = serde_json::to_string(&world_def).unwrap();
    let back: WorldDef = serde_json::from_str(&json).unwrap();
    assert_eq!(back.gravity, Vec2::new(0.0, -3.7));
    assert_eq!(back.solver_mode, SolverMode::Baumgarte);
    assert_eq!(back.contact_hertz, 15.0);
    assert_eq!(back.contact_damping_ratio, 5.0);

    let body_def = BodyBuilder::new()
        .body_type(BodyType::Dynamic)
        .position([1.0_f32, 2.0])
        .angle(0.5)
        .linear_velocity([3.0_f32, 4.0])
        .angular_velocity(-1.0)
        .linear_damping(0.1)
        .angular_damping(0.2)
        .gravity_scale(0.5)
        .use_gravity(false)
        .build();
    let json = serde_json::to_string(&body_def).unwrap();
    let back: BodyDef = serde_json::from_str(&json).unwrap();
    assert_eq!(back.body_type, BodyType::Dynamic);
    assert_eq!(back.position, Vec2::new(1.0, 2.0));
    assert_eq!(back.angle, 0.5);
    assert_eq!(back.linear_velocity, Vec2::new(3.0, 4.0));
    assert_eq!(back.angular_velocity, -1.0);
    assert!(!back.use_gravity);

    let shape_def = ShapeDef::builder()
        .friction(0.7)
        .restitution(0.2)
        .density(2.5)
        .build();
    let json = serde_json::to_string(&shape_def).unwrap();
    let back: ShapeDef = serde_json::from_str(&json).unwrap();
    assert_eq!(back.friction, 0.7);
    assert_eq!(back.restitution, 0.2);
    assert_eq!(back.density, 2.5);
}

#[test]
fn materials_round_trip_through_json() {
    let material = FractureMaterial {
        toughness: 2.0,
        elasticity: 7.0,
        brittleness: 0.9,
        anisotropy: Vec2::new(0.0, 1.0),
        anisotropy_factor: 0.25,
        k: 1.5,
    };
    let json = serde_json::to_string(&material).unwrap();
    let back: FractureMaterial = serde_json::from_str(&json).unwrap();
    assert_eq!(back, material);
}
