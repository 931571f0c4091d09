//! Projected Gauss-Seidel contact solver.
//!
//! Two modes share one inner loop. **Baumgarte** feeds position error
//! directly into the velocity bias over a single block of iterations.
//! **Soft** (the default) shapes the bias with a Hertz/damping-ratio spring
//! model for the main velocity iterations, then runs extra relaxation
//! iterations with the bias disabled to bleed off the injected energy.
//! Speculative points (positive separation) are handled identically in both
//! modes: the bias exactly cancels the approach velocity that would cross the
//! gap this step.

use crate::tuning::MAX_BAUMGARTE_VELOCITY;
use crate::types::{Vec2, cross_sv};
use crate::world::World;

/// Contact solver flavor. See the module docs.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum SolverMode {
    /// Position error fed straight into the velocity bias.
    Baumgarte,
    /// Soft contact with relaxation iterations.
    #[default]
    Soft,
}

/// Per-step solver parameters assembled by the world.
#[derive(Copy, Clone, Debug)]
pub(crate) struct SolverContext {
    pub dt: f32,
    pub inv_dt: f32,
    pub h: f32,
    pub inv_h: f32,
    pub iterations: usize,
    pub extra_iterations: usize,
    pub warm_start: bool,
    pub contact_hertz: f32,
    pub contact_damping_ratio: f32,
}

#[derive(Copy, Clone, Debug, Default)]
struct ContactConstraintPoint {
    local_anchor_a: Vec2,
    local_anchor_b: Vec2,
    /// World-space anchors fixed at prepare time for the whole step.
    r_a0: Vec2,
    r_b0: Vec2,
    /// Separation with the anchor offset removed; the loop reconstructs the
    /// current separation from it and the anchors.
    adjusted_separation: f32,
    normal_impulse: f32,
    tangent_impulse: f32,
    normal_mass: f32,
    tangent_mass: f32,
    mass_coefficient: f32,
    bias_coefficient: f32,
    impulse_coefficient: f32,
}

#[derive(Clone, Debug, Default)]
struct ContactConstraint {
    contact: i32,
    index_a: i32,
    index_b: i32,
    normal: Vec2,
    friction: f32,
    point_count: usize,
    points: [ContactConstraintPoint; 2],
}

/// Run the configured solver for one step.
pub(crate) fn solve(world: &mut World, context: &SolverContext) {
    // One constraint per contact that actually has manifold points.
    let mut constraints: Vec<ContactConstraint> = world
        .contacts
        .iter()
        .filter(|(_, contact)| contact.manifold.point_count > 0)
        .map(|(index, _)| ContactConstraint {
            contact: index,
            ..Default::default()
        })
        .collect();

    let soft = world.solver_mode() == SolverMode::Soft;
    // A step solves the whole dt in one block, so the sub-step equals it.
    debug_assert!(context.h == context.dt && context.inv_h == context.inv_dt);
    let h = context.h;
    let inv_h = context.inv_h;

    integrate_velocities(world, h);

    prepare_contacts(world, context, &mut constraints, soft);

    if context.warm_start {
        warm_start_contacts(world, &constraints);
    }

    for _ in 0..context.iterations {
        solve_velocity_constraints(world, &mut constraints, inv_h, true, soft);
    }

    integrate_positions(world, h);

    if soft {
        // Relaxation: same loop with the bias disabled.
        for _ in 0..context.extra_iterations {
            solve_velocity_constraints(world, &mut constraints, inv_h, false, soft);
        }
    }

    solve_positions(world);

    store_contact_impulses(world, &constraints);
}

fn integrate_velocities(world: &mut World, h: f32) {
    let gravity = world.gravity();
    for (_, body) in world.bodies.iter_mut() {
        if !body.is_dynamic() {
            continue;
        }

        let inv_mass = body.inv_mass;
        let inv_inertia = body.inv_inertia;

        let mut v = body.linear_velocity;
        let mut w = body.angular_velocity;

        let mut f = body.force;
        if body.flags.contains(crate::body::BodyFlags::USE_GRAVITY) {
            f += body.mass * body.gravity_scale * gravity;
        }
        v += (h * inv_mass) * f;
        w += h * body.torque * inv_inertia;

        // Damper to prevent infinite oscillation.
        v *= 1.0 / (1.0 + h * body.linear_damping);
        w *= 1.0 / (1.0 + h * body.angular_damping);

        body.linear_velocity = v;
        body.angular_velocity = w;
    }
}

fn integrate_positions(world: &mut World, h: f32) {
    for (_, body) in world.bodies.iter_mut() {
        if body.body_type == crate::body::BodyType::Static {
            continue;
        }
        body.delta_position += h * body.linear_velocity;
        body.rot = body.rot.integrated(h * body.angular_velocity);
    }
}

fn solve_positions(world: &mut World) {
    for (_, body) in world.bodies.iter_mut() {
        if body.body_type == crate::body::BodyType::Static {
            continue;
        }
        body.position += body.delta_position;
        body.delta_position = Vec2::ZERO;
    }
}

fn prepare_contacts(
    world: &mut World,
    context: &SolverContext,
    constraints: &mut [ContactConstraint],
    soft: bool,
) {
    let warm_start = context.warm_start;
    let h = context.h;

    for constraint in constraints.iter_mut() {
        let contact_index = constraint.contact;
        let (manifold, friction, index_a, index_b) = {
            let contact = &world.contacts[contact_index];
            (
                contact.manifold,
                contact.friction,
                contact.edges[0].body,
                contact.edges[1].body,
            )
        };
        let point_count = manifold.point_count;
        debug_assert!(point_count > 0 && point_count <= 2);

        constraint.index_a = index_a;
        constraint.index_b = index_b;
        constraint.normal = manifold.normal;
        constraint.friction = friction;
        constraint.point_count = point_count;

        let (m_a, i_a, q_a, center_a) = {
            let body = &world.bodies[index_a];
            (body.inv_mass, body.inv_inertia, body.rot, body.local_center)
        };
        let (m_b, i_b, q_b, center_b) = {
            let body = &world.bodies[index_b];
            (body.inv_mass, body.inv_inertia, body.rot, body.local_center)
        };

        // Stiffer against static or kinematic bodies.
        let contact_hertz = if m_a == 0.0 || m_b == 0.0 {
            2.0 * context.contact_hertz
        } else {
            context.contact_hertz
        };

        let normal = constraint.normal;
        let tangent = normal.right_perp();

        for j in 0..point_count {
            let mp = &manifold.points[j];
            let cp = &mut constraint.points[j];

            if warm_start {
                cp.normal_impulse = mp.normal_impulse;
                cp.tangent_impulse = mp.tangent_impulse;
            } else {
                cp.normal_impulse = 0.0;
                cp.tangent_impulse = 0.0;
            }

            cp.local_anchor_a = mp.local_anchor_a - center_a;
            cp.local_anchor_b = mp.local_anchor_b - center_b;

            let r_a = q_a.rotate_vec(cp.local_anchor_a);
            let r_b = q_b.rotate_vec(cp.local_anchor_b);
            cp.r_a0 = r_a;
            cp.r_b0 = r_b;

            cp.adjusted_separation = mp.separation - (r_b - r_a).dot(normal);

            let rn_a = r_a.cross(normal);
            let rn_b = r_b.cross(normal);
            let k_normal = m_a + m_b + i_a * rn_a * rn_a + i_b * rn_b * rn_b;
            cp.normal_mass = if k_normal > 0.0 { 1.0 / k_normal } else { 0.0 };

            let rt_a = r_a.cross(tangent);
            let rt_b = r_b.cross(tangent);
            let k_tangent = m_a + m_b + i_a * rt_a * rt_a + i_b * rt_b * rt_b;
            cp.tangent_mass = if k_tangent > 0.0 { 1.0 / k_tangent } else { 0.0 };

            if soft {
                // Soft-contact coefficients; ideally these would use the
                // substep, which here equals the full time step.
                let zeta = context.contact_damping_ratio;
                let omega = core::f32::consts::TAU * contact_hertz;
                let c = h * omega * (2.0 * zeta + h * omega);
                cp.bias_coefficient = omega / (2.0 * zeta + h * omega);
                cp.impulse_coefficient = 1.0 / (1.0 + c);
                cp.mass_coefficient = c * cp.impulse_coefficient;
            } else {
                cp.bias_coefficient = 0.0;
                cp.impulse_coefficient = 0.0;
                cp.mass_coefficient = 1.0;
            }
        }
    }
}

/// Apply last step's accumulated impulses before iterating.
fn warm_start_contacts(world: &mut World, constraints: &[ContactConstraint]) {
    for constraint in constraints {
        let (m_a, i_a) = {
            let body = &world.bodies[constraint.index_a];
            (body.inv_mass, body.inv_inertia)
        };
        let (m_b, i_b) = {
            let body = &world.bodies[constraint.index_b];
            (body.inv_mass, body.inv_inertia)
        };

        let normal = constraint.normal;
        let tangent = normal.right_perp();

        let mut dv_a = Vec2::ZERO;
        let mut dw_a = 0.0;
        let mut dv_b = Vec2::ZERO;
        let mut dw_b = 0.0;

        for cp in &constraint.points[..constraint.point_count] {
            let p = cp.normal_impulse * normal + cp.tangent_impulse * tangent;
            dw_a -= i_a * cp.r_a0.cross(p);
            dv_a -= m_a * p;
            dw_b += i_b * cp.r_b0.cross(p);
            dv_b += m_b * p;
        }

        {
            let body = &mut world.bodies[constraint.index_a];
            body.linear_velocity += dv_a;
            body.angular_velocity += dw_a;
        }
        {
            let body = &mut world.bodies[constraint.index_b];
            body.linear_velocity += dv_b;
            body.angular_velocity += dw_b;
        }
    }
}

fn solve_velocity_constraints(
    world: &mut World,
    constraints: &mut [ContactConstraint],
    inv_h: f32,
    use_bias: bool,
    soft: bool,
) {
    for constraint in constraints.iter_mut() {
        let (m_a, i_a, mut v_a, mut w_a) = {
            let body = &world.bodies[constraint.index_a];
            (
                body.inv_mass,
                body.inv_inertia,
                body.linear_velocity,
                body.angular_velocity,
            )
        };
        let (m_b, i_b, mut v_b, mut w_b) = {
            let body = &world.bodies[constraint.index_b];
            (
                body.inv_mass,
                body.inv_inertia,
                body.linear_velocity,
                body.angular_velocity,
            )
        };

        let normal = constraint.normal;
        let tangent = normal.right_perp();
        let friction = constraint.friction;

        // Normal pass.
        for cp in &mut constraint.points[..constraint.point_count] {
            let r_a = cp.r_a0;
            let r_b = cp.r_b0;

            // Anchors are fixed for the step, so this equals the prepared
            // separation; kept in this form to track the anchor motion if
            // the anchors ever become current.
            let separation = cp.adjusted_separation + (r_b - r_a).dot(normal);

            let mut bias = 0.0;
            let mut mass_scale = 1.0;
            let mut impulse_scale = 0.0;
            if separation > 0.0 {
                // Speculative contact: cancel exactly the closing velocity.
                bias = separation * inv_h;
            } else if use_bias {
                if soft {
                    bias = (cp.bias_coefficient * separation).max(-MAX_BAUMGARTE_VELOCITY);
                    mass_scale = cp.mass_coefficient;
                    impulse_scale = cp.impulse_coefficient;
                } else {
                    bias = (0.2 * inv_h * (separation + 0.005).min(0.0))
                        .max(-MAX_BAUMGARTE_VELOCITY);
                }
            }

            // Relative velocity at the contact point.
            let vr_b = v_b + cross_sv(w_b, r_b);
            let vr_a = v_a + cross_sv(w_a, r_a);
            let vn = (vr_b - vr_a).dot(normal);

            let impulse =
                -cp.normal_mass * mass_scale * (vn + bias) - impulse_scale * cp.normal_impulse;

            // Clamp the accumulated impulse.
            let new_impulse = (cp.normal_impulse + impulse).max(0.0);
            let impulse = new_impulse - cp.normal_impulse;
            cp.normal_impulse = new_impulse;

            let p = impulse * normal;
            v_a -= m_a * p;
            w_a -= i_a * r_a.cross(p);
            v_b += m_b * p;
            w_b += i_b * r_b.cross(p);
        }

        // Friction pass.
        for cp in &mut constraint.points[..constraint.point_count] {
            let r_a = cp.r_a0;
            let r_b = cp.r_b0;

            let vr_b = v_b + cross_sv(w_b, r_b);
            let vr_a = v_a + cross_sv(w_a, r_a);
            let vt = (vr_b - vr_a).dot(tangent);

            let lambda = cp.tangent_mass * -vt;

            // Coulomb cone: |tangent impulse| <= μ · normal impulse.
            let max_friction = friction * cp.normal_impulse;
            let new_impulse = (cp.tangent_impulse + lambda).clamp(-max_friction, max_friction);
            let lambda = new_impulse - cp.tangent_impulse;
            cp.tangent_impulse = new_impulse;

            let p = lambda * tangent;
            v_a -= m_a * p;
            w_a -= i_a * r_a.cross(p);
            v_b += m_b * p;
            w_b += i_b * r_b.cross(p);
        }

        {
            let body = &mut world.bodies[constraint.index_a];
            body.linear_velocity = v_a;
            body.angular_velocity = w_a;
        }
        {
            let body = &mut world.bodies[constraint.index_b];
            body.linear_velocity = v_b;
            body.angular_velocity = w_b;
        }
    }
}

/// Copy accumulated impulses back to the manifold for next step's warm start.
fn store_contact_impulses(world: &mut World, constraints: &[ContactConstraint]) {
    for constraint in constraints {
        let contact = &mut world.contacts[constraint.contact];
        for (j, cp) in constraint.points[..constraint.point_count].iter().enumerate() {
            contact.manifold.points[j].normal_impulse = cp.normal_impulse;
            contact.manifold.points[j].tangent_impulse = cp.tangent_impulse;
        }
    }
}
