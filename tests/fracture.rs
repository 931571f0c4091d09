use shardd::fracture::FractureMaterial;
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

/// Two overlapping dynamic squares: the solver generates persistent contact
/// impulses after a couple of steps without any gravity.
fn colliding_world() -> (World, BodyId, BodyId) {
    let mut world = World::new(WorldDef::builder().gravity([0.0_f32, 0.0]).build());
    let sdef = ShapeDef::builder().density(1.0).build();
    let a = world.create_body(
        BodyBuilder::new()
            .body_type(BodyType::Dynamic)
            .position([0.0_f32, 0.0])
            .build(),
    );
    world.create_polygon_shape(a, &sdef, &unit_square()).unwrap();
    let b = world.create_body(
        BodyBuilder::new()
            .body_type(BodyType::Dynamic)
            .position([0.9_f32, 0.0])
            .build(),
    );
    world.create_polygon_shape(b, &sdef, &unit_square()).unwrap();
    (world, a, b)
}

/// Split the unit square into two half rectangles in the body frame.
fn halves(_impact: &shardd::FractureImpact) -> Option<Vec<Vec<Vec2>>> {
    Some(vec![
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.5, 0.0),
            Vec2::new(0.5, 1.0),
            Vec2::new(0.0, 1.0),
        ],
        vec![
            Vec2::new(0.5, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.5, 1.0),
        ],
    ])
}

#[test]
fn sweep_replaces_overstressed_body_with_fragments() {
    let (mut world, a, b) = colliding_world();

    let brittle = FractureMaterial {
        toughness: 1.0e-6,
        ..Default::default()
    };
    world.make_fracturable(a, brittle).unwrap();

    // Two steps so the manifold points carry the persisted flag.
    world.step(1.0 / 60.0, 8, 3, true);
    world.step(1.0 / 60.0, 8, 3, true);

    let parent_mass = world.body_mass(a);
    let parent_velocity = world.body_linear_velocity(a);
    assert!(approx(parent_mass, 1.0, 1.0e-4));

    let mut impacts = 0;
    let fractured = world.fracture_sweep(|impact| {
        impacts += 1;
        assert_eq!(impact.body, a);
        assert!(impact.point_count > 0);
        assert!(impact.impulses[0] > 0.0);
        halves(impact)
    });

    assert_eq!(fractured, 1);
    assert_eq!(impacts, 1);
    assert!(!world.body_is_valid(a));
    assert!(world.body_is_valid(b));

    // One survivor plus two fragments, and the fragments sum back to the
    // parent's mass.
    let bodies: Vec<BodyId> = world.bodies().collect();
    assert_eq!(bodies.len(), 3);
    let fragment_mass: f32 = bodies
        .iter()
        .filter(|id| **id != b)
        .map(|id| world.body_mass(*id))
        .sum();
    assert!(approx(fragment_mass, parent_mass, 1.0e-4));

    // Fragments inherit the parent's velocity (its spin was negligible here).
    for id in bodies.iter().filter(|id| **id != b) {
        let v = world.body_linear_velocity(*id);
        assert!(approx(v.x, parent_velocity.x, 0.05), "vx: {}", v.x);
    }

    // The world keeps stepping with the fragments in the broad-phase.
    world.step(1.0 / 60.0, 8, 3, true);
}

#[test]
fn tough_material_never_fractures() {
    let (mut world, a, _b) = colliding_world();

    let tough = FractureMaterial {
        toughness: 1.0e9,
        ..Default::default()
    };
    world.make_fracturable(a, tough).unwrap();

    world.step(1.0 / 60.0, 8, 3, true);
    world.step(1.0 / 60.0, 8, 3, true);

    let fractured = world.fracture_sweep(|_| panic!("must not tessellate below threshold"));
    assert_eq!(fractured, 0);
    assert!(world.body_is_valid(a));
}

#[test]
fn registration_rules() {
    let (mut world, a, _b) = colliding_world();

    let material = FractureMaterial::default();
    let fracturable = world.make_fracturable(a, material).unwrap();
    assert!(world.make_fracturable(a, material).is_err());

    let pattern = world.create_fracture_pattern(vec![
        Vec2::new(0.25, 0.25),
        Vec2::new(0.75, 0.75),
    ]);
    world.bind_pattern(fracturable, pattern).unwrap();
    assert_eq!(world.pattern_sites(pattern).unwrap().len(), 2);

    // A stale body invalidates the registration lazily.
    world.destroy_body(a).unwrap();
    let fractured = world.fracture_sweep(|_| None);
    assert_eq!(fractured, 0);
}

#[test]
fn anisotropy_weakens_aligned_impacts() {
    let material = FractureMaterial {
        toughness: 1.0,
        k: 2.0,
        anisotropy: Vec2::new(1.0, 0.0),
        anisotropy_factor: 0.5,
        ..Default::default()
    };

    let across = material.impulse_threshold(Vec2::new(0.0, 1.0));
    let along = material.impulse_threshold(Vec2::new(1.0, 0.0));
    assert!(approx(across, 2.0, 1.0e-5));
    assert!(approx(along, 1.0, 1.0e-5));

    let isotropic = FractureMaterial::default();
    let t1 = isotropic.impulse_threshold(Vec2::new(0.0, 1.0));
    let t2 = isotropic.impulse_threshold(Vec2::new(1.0, 0.0));
    assert!(approx(t1, t2, 1.0e-6));
}
