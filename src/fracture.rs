//! Fracture hook.
//!
//! Bodies can be tagged fracturable with a material. After stepping, a sweep
//! inspects the persistent contact impulses on every tagged body; impacts
//! above the material threshold are handed to an external tessellation
//! callback (the Voronoi pattern clipping lives outside the core). When the
//! callback returns fragments, the source body is atomically replaced: the
//! broad-phase is rewired in the same sweep, fragments reuse the parent's
//! shape material so total mass is preserved when they tile the parent, and
//! they inherit the parent's linear and angular velocity.

use log::{debug, warn};

use crate::body::{BodyBuilder, BodyType};
use crate::core::math::Transform;
use crate::shapes::{Polygon, ShapeDef};
use crate::types::{BodyId, FracturableId, NULL_INDEX, PatternId, Vec2, cross_sv};
use crate::world::{Error, World};

/// Material parameters controlling when and how a body breaks.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FractureMaterial {
    /// Toughness of the material; scales the impulse threshold.
    pub toughness: f32,
    /// Young's modulus (elasticity).
    pub elasticity: f32,
    /// Brittleness factor.
    pub brittleness: f32,
    /// Anisotropy direction; zero means isotropic.
    pub anisotropy: Vec2,
    /// How strongly the anisotropy direction weakens the material.
    pub anisotropy_factor: f32,
    /// Scaling factor for fine tuning.
    pub k: f32,
}

impl Default for FractureMaterial {
    fn default() -> Self {
        Self {
            toughness: 0.5,
            elasticity: 10.0,
            brittleness: 0.5,
            anisotropy: Vec2::ZERO,
            anisotropy_factor: 0.0,
            k: 1.0,
        }
    }
}

impl FractureMaterial {
    /// Impulse magnitude above which an impact along `normal` fractures the
    /// material. Impacts aligned with the anisotropy direction weaken the
    /// threshold by up to `anisotropy_factor`.
    pub fn impulse_threshold(&self, normal: Vec2) -> f32 {
        let base = self.toughness * self.k;
        let grain = self.anisotropy.normalized();
        let alignment = normal.dot(grain).abs();
        base * (1.0 - self.anisotropy_factor * alignment).max(0.0)
    }
}

/// A fracturable registration stored in the world.
#[derive(Clone, Debug)]
pub(crate) struct Fracturable {
    pub material: FractureMaterial,
    pub body: i32,
    pub pattern: i32,
    /// When true, child fragments are plain bodies; otherwise they inherit
    /// the material and stay fracturable.
    pub once: bool,
}

impl Default for Fracturable {
    fn default() -> Self {
        Self {
            material: FractureMaterial::default(),
            body: NULL_INDEX,
            pattern: NULL_INDEX,
            once: true,
        }
    }
}

/// A stored fracture pattern: seed sites in the body's local frame. The core
/// only stores and hands these out; clipping them against a polygon is the
/// pattern editor's job.
#[derive(Clone, Debug, Default)]
pub struct FracturePattern {
    pub sites: Vec<Vec2>,
}

/// Snapshot of the impact that pushed a fracturable body over its threshold.
/// Passed to the tessellation callback.
#[derive(Clone, Debug)]
pub struct FractureImpact {
    pub body: BodyId,
    pub fracturable: FracturableId,
    /// Bound pattern, when one was attached.
    pub pattern: Option<PatternId>,
    pub material: FractureMaterial,
    /// The body's transform at sweep time.
    pub transform: Transform,
    /// Contact normal of the strongest impact, in world frame.
    pub normal: Vec2,
    /// Up to two world-space contact points.
    pub points: [Vec2; 2],
    /// Normal impulses at those points.
    pub impulses: [f32; 2],
    pub point_count: usize,
}

impl World {
    /// Store a fracture pattern for later binding.
    pub fn create_fracture_pattern(&mut self, sites: Vec<Vec2>) -> PatternId {
        let index = self.patterns.alloc();
        self.patterns[index].sites = sites;
        PatternId(index)
    }

    /// Seed sites of a stored pattern.
    pub fn pattern_sites(&self, id: PatternId) -> Result<&[Vec2], Error> {
        if !self.patterns.is_valid(id.0) {
            return Err(Error::InvalidPattern);
        }
        Ok(&self.patterns[id.0].sites)
    }

    /// Turn a regular body into a fracturable object. A body may only carry
    /// one registration.
    pub fn make_fracturable(
        &mut self,
        body: BodyId,
        material: FractureMaterial,
    ) -> Result<FracturableId, Error> {
        if !self.bodies.is_valid(body.0) {
            return Err(Error::InvalidBody);
        }
        if self.fracturables.iter().any(|(_, f)| f.body == body.0) {
            return Err(Error::AlreadyFracturable);
        }

        let index = self.fracturables.alloc();
        let fracturable = &mut self.fracturables[index];
        fracturable.body = body.0;
        fracturable.material = material;
        fracturable.pattern = NULL_INDEX;
        fracturable.once = true;
        Ok(FracturableId(index))
    }

    /// Bind a stored pattern to a fracturable.
    pub fn bind_pattern(
        &mut self,
        fracturable: FracturableId,
        pattern: PatternId,
    ) -> Result<(), Error> {
        if !self.fracturables.is_valid(fracturable.0) {
            return Err(Error::InvalidFracturable);
        }
        if !self.patterns.is_valid(pattern.0) {
            return Err(Error::InvalidPattern);
        }
        self.fracturables[fracturable.0].pattern = pattern.0;
        Ok(())
    }

    /// Control whether fragments of a fracturable stay fracturable.
    pub fn set_once_fracturable(
        &mut self,
        fracturable: FracturableId,
        once: bool,
    ) -> Result<(), Error> {
        if !self.fracturables.is_valid(fracturable.0) {
            return Err(Error::InvalidFracturable);
        }
        self.fracturables[fracturable.0].once = once;
        Ok(())
    }

    /// Post-step sweep over all fracturable bodies. Call directly after
    /// [`World::step`].
    ///
    /// For every tagged body whose strongest persistent contact impulse
    /// exceeds the material threshold, `tessellate` receives the impact and
    /// may return fragment outlines in the body's local frame. Fragments that
    /// tile the parent polygon preserve total mass since they reuse the
    /// parent's shape density. Returns the number of bodies replaced.
    pub fn fracture_sweep<F>(&mut self, mut tessellate: F) -> usize
    where
        F: FnMut(&FractureImpact) -> Option<Vec<Vec<Vec2>>>,
    {
        // Gather candidates first; mutation happens after.
        let mut stale: Vec<i32> = Vec::new();
        let mut scheduled: Vec<FractureImpact> = Vec::new();

        for (index, fracturable) in self.fracturables.iter() {
            if !self.bodies.is_valid(fracturable.body) {
                stale.push(index);
                continue;
            }

            let body_id = BodyId(fracturable.body);
            let mut best: Option<FractureImpact> = None;

            for contact_id in self.body_contacts(body_id) {
                let contact = &self.contacts[contact_id.0];
                let manifold = &contact.manifold;

                // Which side of the contact is us decides the anchor set and
                // the outward normal sign.
                let side = if contact.edges[0].body == fracturable.body { 0 } else { 1 };
                let normal = if side == 0 {
                    manifold.normal
                } else {
                    -manifold.normal
                };

                let mut strongest = 0.0_f32;
                let mut points = [Vec2::ZERO; 2];
                let mut impulses = [0.0_f32; 2];
                let mut point_count = 0;

                let xf = self.body_transform(body_id);
                for point in manifold.points() {
                    if !point.persisted {
                        continue;
                    }
                    let anchor = if side == 0 {
                        point.local_anchor_a
                    } else {
                        point.local_anchor_b
                    };
                    points[point_count] = xf.transform_point(anchor);
                    impulses[point_count] = point.normal_impulse;
                    point_count += 1;
                    strongest = strongest.max(point.normal_impulse);
                }

                if point_count == 0 {
                    continue;
                }

                let threshold = fracturable.material.impulse_threshold(normal);
                if strongest <= threshold {
                    continue;
                }

                let replace = match &best {
                    Some(prev) => strongest > prev.impulses[0].max(prev.impulses[1]),
                    None => true,
                };
                if replace {
                    best = Some(FractureImpact {
                        body: body_id,
                        fracturable: FracturableId(index),
                        pattern: (fracturable.pattern != NULL_INDEX)
                            .then_some(PatternId(fracturable.pattern)),
                        material: fracturable.material,
                        transform: xf,
                        normal,
                        points,
                        impulses,
                        point_count,
                    });
                }
            }

            if let Some(impact) = best {
                scheduled.push(impact);
            }
        }

        for index in stale {
            self.fracturables.free(index);
        }

        let mut fractured = 0;
        for impact in scheduled {
            let Some(fragments) = tessellate(&impact) else {
                continue;
            };
            if fragments.is_empty() {
                continue;
            }
            self.replace_with_fragments(&impact, &fragments);
            fractured += 1;
        }
        fractured
    }

    /// Atomically swap a body for its fragments: capture the parent's state,
    /// destroy it (rewiring the broad-phase), and spawn one dynamic body per
    /// fragment with inherited velocity.
    fn replace_with_fragments(&mut self, impact: &FractureImpact, fragments: &[Vec<Vec2>]) {
        let body_index = impact.body.0;

        // Parent state to carry over.
        let (
            parent_center,
            parent_linear,
            parent_angular,
            linear_damping,
            angular_damping,
            gravity_scale,
        ) = {
            let body = &self.bodies[body_index];
            (
                body.position,
                body.linear_velocity,
                body.angular_velocity,
                body.linear_damping,
                body.angular_damping,
                body.gravity_scale,
            )
        };
        let origin = impact.transform.p;
        let angle = impact.transform.q.angle();

        // Fragments reuse the first shape's material so a tiling of the
        // parent sums back to its mass.
        let shape_def = {
            let first_shape = self.bodies[body_index].shape_list;
            debug_assert!(first_shape != NULL_INDEX);
            let shape = &self.shapes[first_shape];
            ShapeDef {
                friction: shape.friction,
                restitution: shape.restitution,
                density: shape.density,
            }
        };

        let (material, pattern, once) = {
            let fracturable = &self.fracturables[impact.fracturable.0];
            (fracturable.material, fracturable.pattern, fracturable.once)
        };

        self.fracturables.free(impact.fracturable.0);
        if let Err(err) = self.destroy_body(impact.body) {
            warn!("fracture replacement lost body {body_index}: {err}");
            return;
        }

        let mut spawned = 0;
        for outline in fragments {
            let polygon = Polygon::from_points(outline);
            if polygon.is_empty() {
                warn!("skipping degenerate fracture fragment of body {body_index}");
                continue;
            }

            let child = self.create_body(
                BodyBuilder::new()
                    .body_type(BodyType::Dynamic)
                    .position(origin)
                    .angle(angle)
                    .linear_damping(linear_damping)
                    .angular_damping(angular_damping)
                    .gravity_scale(gravity_scale)
                    .build(),
            );
            let _ = self.create_polygon_shape(child, &shape_def, &polygon);

            // Children inherit the parent's velocity field: the angular
            // velocity plus the linear velocity at their own center.
            let child_center = self.bodies[child.0].position;
            let child_linear =
                parent_linear + cross_sv(parent_angular, child_center - parent_center);
            let body = &mut self.bodies[child.0];
            body.linear_velocity = child_linear;
            body.angular_velocity = parent_angular;

            if !once {
                if let Ok(child_fracturable) = self.make_fracturable(child, material) {
                    if pattern != NULL_INDEX {
                        let _ = self.bind_pattern(child_fracturable, PatternId(pattern));
                    }
                    let _ = self.set_once_fracturable(child_fracturable, false);
                }
            }
            spawned += 1;
        }

        debug!("fractured body {body_index} into {spawned} fragments");
    }
}
