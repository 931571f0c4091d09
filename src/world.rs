//! The simulation world: owns every pool, the broad-phase, and the pair set,
//! and drives the per-step pipeline (transform refresh → pair discovery →
//! contact update → solve).

use log::{debug, warn};

use crate::aabb::Aabb;
use crate::body::{Body, BodyDef, BodyFlags, BodyType};
use crate::broadphase::BroadPhase;
use crate::contact::{Contact, create_contact, destroy_contact, key_contact, key_side, unlink_edge, update_contact};
use crate::core::math::Transform;
use crate::fracture::{FracturePattern, Fracturable};
use crate::manifold::Manifold;
use crate::pool::{PairSet, Pool};
use crate::shapes::{Shape, ShapeDef, Polygon};
use crate::solver::{SolverContext, SolverMode, solve};
use crate::tuning::{CONTACT_DAMPING_RATIO, CONTACT_HERTZ};
use crate::types::{BodyId, ContactId, NULL_INDEX, ShapeId, Vec2};

/// Error type for world operations.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("body handle is invalid or was destroyed")]
    InvalidBody,
    #[error("shape handle is invalid or was destroyed")]
    InvalidShape,
    #[error("contact handle is invalid or was destroyed")]
    InvalidContact,
    #[error("polygon is degenerate (no valid hull)")]
    DegeneratePolygon,
    #[error("body is already registered as fracturable")]
    AlreadyFracturable,
    #[error("fracturable handle is invalid")]
    InvalidFracturable,
    #[error("fracture pattern handle is invalid")]
    InvalidPattern,
}

/// World definition with builder API.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct WorldDef {
    /// Gravity vector in m/s².
    pub gravity: Vec2,
    /// Contact solver flavor.
    pub solver_mode: SolverMode,
    /// Contact stiffness ceiling in Hertz; each step uses
    /// `min(contact_hertz, 1/(3·dt))`.
    pub contact_hertz: f32,
    /// Damping ratio ζ for the soft contact model.
    pub contact_damping_ratio: f32,
}

impl Default for WorldDef {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -9.81),
            solver_mode: SolverMode::default(),
            contact_hertz: CONTACT_HERTZ,
            contact_damping_ratio: CONTACT_DAMPING_RATIO,
        }
    }
}

impl WorldDef {
    pub fn builder() -> WorldBuilder {
        WorldBuilder::from(Self::default())
    }
}

/// Fluent builder for `WorldDef`.
#[derive(Clone, Debug)]
pub struct WorldBuilder {
    def: WorldDef,
}

impl From<WorldDef> for WorldBuilder {
    fn from(def: WorldDef) -> Self {
        Self { def }
    }
}

impl WorldBuilder {
    /// Set gravity vector in meters per second squared.
    pub fn gravity<V: Into<Vec2>>(mut self, g: V) -> Self {
        self.def.gravity = g.into();
        self
    }
    /// Contact solver flavor.
    pub fn solver_mode(mut self, mode: SolverMode) -> Self {
        self.def.solver_mode = mode;
        self
    }
    /// Contact solver target stiffness in Hertz.
    pub fn contact_hertz(mut self, v: f32) -> Self {
        self.def.contact_hertz = v;
        self
    }
    /// Contact damping ratio (non-dimensional).
    pub fn contact_damping_ratio(mut self, v: f32) -> Self {
        self.def.contact_damping_ratio = v;
        self
    }

    #[must_use]
    pub fn build(self) -> WorldDef {
        self.def
    }
}

/// Simulation counters providing size and internal stats.
#[derive(Clone, Debug)]
pub struct Counters {
    pub body_count: usize,
    pub shape_count: usize,
    pub contact_count: usize,
    pub pair_count: usize,
    pub proxy_count: usize,
    pub tree_height: i32,
    pub tree_area_ratio: f32,
}

/// A simulation world.
pub struct World {
    gravity: Vec2,
    solver_mode: SolverMode,
    contact_hertz: f32,
    contact_damping_ratio: f32,
    pub(crate) bodies: Pool<Body>,
    pub(crate) shapes: Pool<Shape>,
    pub(crate) contacts: Pool<Contact>,
    pub(crate) fracturables: Pool<Fracturable>,
    pub(crate) patterns: Pool<FracturePattern>,
    pub(crate) broad_phase: BroadPhase,
    pub(crate) pair_set: PairSet,
    /// Scratch buffer for broad-phase pair reports, reused across steps.
    new_pairs: Vec<(i32, i32)>,
}

impl World {
    /// Create a world from a definition.
    pub fn new(def: WorldDef) -> Self {
        Self {
            gravity: def.gravity,
            solver_mode: def.solver_mode,
            contact_hertz: def.contact_hertz,
            contact_damping_ratio: def.contact_damping_ratio,
            bodies: Pool::new(),
            shapes: Pool::new(),
            contacts: Pool::new(),
            fracturables: Pool::new(),
            patterns: Pool::new(),
            broad_phase: BroadPhase::new(),
            pair_set: PairSet::default(),
            new_pairs: Vec::new(),
        }
    }

    /// Set gravity vector.
    pub fn set_gravity<V: Into<Vec2>>(&mut self, g: V) {
        self.gravity = g.into();
    }

    /// Get current gravity vector.
    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    /// Switch the contact solver flavor at runtime.
    pub fn set_solver_mode(&mut self, mode: SolverMode) {
        self.solver_mode = mode;
    }

    pub fn solver_mode(&self) -> SolverMode {
        self.solver_mode
    }

    // --- Body lifecycle -------------------------------------------------

    /// Create a body owned by this world.
    pub fn create_body(&mut self, def: BodyDef) -> BodyId {
        let index = self.bodies.alloc();
        let body = &mut self.bodies[index];

        body.body_type = def.body_type;
        if def.body_type != BodyType::Dynamic {
            body.mass = 0.0;
            body.inv_mass = 0.0;
            body.inertia = 0.0;
            body.inv_inertia = 0.0;
        }

        body.origin = def.position;
        body.position = def.position;
        body.rot = crate::core::math::Rot::from_radians(def.angle);
        body.linear_velocity = def.linear_velocity;
        body.angular_velocity = def.angular_velocity;
        body.linear_damping = def.linear_damping;
        body.angular_damping = def.angular_damping;
        body.gravity_scale = def.gravity_scale;
        body.flags = if def.use_gravity {
            BodyFlags::USE_GRAVITY
        } else {
            BodyFlags::empty()
        };

        debug!("created body {index} ({:?})", def.body_type);
        BodyId(index)
    }

    /// Destroy a body, tearing down its contacts and shapes (their broad-phase
    /// proxies included).
    pub fn destroy_body(&mut self, id: BodyId) -> Result<(), Error> {
        let index = id.0;
        if !self.bodies.is_valid(index) {
            return Err(Error::InvalidBody);
        }

        // Destroy attached contacts: unlink the twin edge from the other
        // body, erase the pair, free the slot. This body's own list is
        // dropped wholesale with the body.
        let mut edge_key = self.bodies[index].contact_list;
        while edge_key != NULL_INDEX {
            let contact_index = key_contact(edge_key);
            let side = key_side(edge_key);
            let next_key = self.contacts[contact_index].edges[side].next_key;

            let (shape_a, shape_b) = {
                let contact = &self.contacts[contact_index];
                (contact.shape_a, contact.shape_b)
            };
            self.pair_set.remove(shape_a, shape_b);
            unlink_edge(self, contact_index, side ^ 1);
            self.contacts.free(contact_index);

            edge_key = next_key;
        }

        // Destroy attached shapes; the broad-phase proxies go with them.
        let mut shape_index = self.bodies[index].shape_list;
        while shape_index != NULL_INDEX {
            let next = self.shapes[shape_index].next_shape;
            let proxy_id = self.shapes[shape_index].proxy_id;
            self.broad_phase.destroy_proxy(proxy_id);
            self.shapes.free(shape_index);
            shape_index = next;
        }

        self.bodies.free(index);
        debug!("destroyed body {index}");
        Ok(())
    }

    // --- Shape lifecycle ------------------------------------------------

    /// Attach a convex polygon shape to a body. Registers a broad-phase proxy
    /// and recomputes the body's mass when the shape has density.
    pub fn create_polygon_shape(
        &mut self,
        body: BodyId,
        def: &ShapeDef,
        polygon: &Polygon,
    ) -> Result<ShapeId, Error> {
        if !self.bodies.is_valid(body.0) {
            return Err(Error::InvalidBody);
        }
        if polygon.is_empty() {
            return Err(Error::DegeneratePolygon);
        }

        let shape_index = self.shapes.alloc();
        let xf = self.bodies[body.0].transform();
        {
            let shape = &mut self.shapes[shape_index];
            shape.body = body.0;
            shape.polygon = *polygon;
            shape.density = def.density;
            shape.friction = def.friction;
            shape.restitution = def.restitution;
            shape.aabb = polygon.compute_aabb(xf);
        }

        let aabb = self.shapes[shape_index].aabb;
        let proxy_id = self.broad_phase.create_proxy(aabb, shape_index);
        self.shapes[shape_index].proxy_id = proxy_id;

        // Link into the body's shape list.
        let head = self.bodies[body.0].shape_list;
        self.shapes[shape_index].next_shape = head;
        self.bodies[body.0].shape_list = shape_index;

        if def.density > 0.0 {
            self.compute_body_mass(body.0);
        }

        debug!("created shape {shape_index} on body {}", body.0);
        Ok(ShapeId(shape_index))
    }

    /// Recompute mass, center of mass, and inertia from the attached shapes.
    /// Zero-density shapes are skipped; inertia is shifted to the new center.
    fn compute_body_mass(&mut self, body_index: i32) {
        let body_type = self.bodies[body_index].body_type;

        // Static and kinematic bodies have zero effective mass.
        if body_type != BodyType::Dynamic {
            let body = &mut self.bodies[body_index];
            body.mass = 0.0;
            body.inv_mass = 0.0;
            body.inertia = 0.0;
            body.inv_inertia = 0.0;
            body.local_center = Vec2::ZERO;
            body.position = body.origin;
            return;
        }

        let mut mass = 0.0_f32;
        let mut inertia = 0.0_f32;
        let mut local_center = Vec2::ZERO;

        let mut shape_index = self.bodies[body_index].shape_list;
        while shape_index != NULL_INDEX {
            let shape = &self.shapes[shape_index];
            shape_index = shape.next_shape;

            if shape.density == 0.0 {
                continue;
            }

            let mass_data = shape.polygon.compute_mass(shape.density);
            mass += mass_data.mass;
            local_center += mass_data.mass * mass_data.center;
            inertia += mass_data.inertia;
        }

        // A dynamic body must end up with positive mass.
        debug_assert!(
            mass > 0.0,
            "dynamic body {body_index} has non-positive mass after recompute"
        );

        let body = &mut self.bodies[body_index];
        body.mass = mass;
        if mass > 0.0 {
            body.inv_mass = 1.0 / mass;
            local_center *= body.inv_mass;
        } else {
            body.inv_mass = 0.0;
            warn!("dynamic body {body_index} has zero mass after recompute");
        }

        if inertia > 0.0 {
            // Parallel-axis shift to the center of mass.
            inertia -= mass * local_center.dot(local_center);
            debug_assert!(inertia > 0.0);
            body.inertia = inertia;
            body.inv_inertia = 1.0 / inertia;
        } else {
            body.inertia = 0.0;
            body.inv_inertia = 0.0;
        }

        // Move the center of mass and pick up the velocity it gains from
        // rotating about the old one.
        let old_center = body.position;
        body.local_center = local_center;
        body.position = body.origin + body.rot.rotate_vec(local_center);

        let delta_linear = crate::types::cross_sv(body.angular_velocity, body.position - old_center);
        body.linear_velocity += delta_linear;
    }

    // --- Stepping -------------------------------------------------------

    /// Advance the simulation by `dt` seconds.
    ///
    /// `velocity_iterations` is the main solver iteration count,
    /// `relaxation_iterations` the extra bias-free iterations used by the
    /// soft solver. `warm_start` seeds the solver with last step's impulses.
    pub fn step(
        &mut self,
        dt: f32,
        velocity_iterations: usize,
        relaxation_iterations: usize,
        warm_start: bool,
    ) {
        // 1. Refresh transforms and broad-phase AABBs for every moving body.
        // Static bodies are skipped unless something marked them dirty
        // (teleport or mass-relevant edits).
        let body_capacity = self.bodies.capacity() as i32;
        for index in 0..body_capacity {
            if !self.bodies.is_valid(index) {
                continue;
            }
            let dirty = self.bodies[index].flags.contains(BodyFlags::DIRTY);
            if self.bodies[index].body_type == BodyType::Static && !dirty {
                continue;
            }

            {
                let body = &mut self.bodies[index];
                body.origin = body.position - body.rot.rotate_vec(body.local_center);
            }

            let xf = self.bodies[index].transform();
            let mut shape_index = self.bodies[index].shape_list;
            while shape_index != NULL_INDEX {
                let (aabb, proxy_id, next) = {
                    let shape = &mut self.shapes[shape_index];
                    shape.aabb = shape.polygon.compute_aabb(xf);
                    (shape.aabb, shape.proxy_id, shape.next_shape)
                };

                // Only touch the tree once the shape escapes its fat AABB.
                let fat = self.broad_phase.fat_aabb(proxy_id);
                if !fat.contains(aabb) || dirty {
                    self.broad_phase.move_proxy(proxy_id, aabb, Vec2::ZERO);
                }
                shape_index = next;
            }

            if dirty {
                self.compute_body_mass(index);
                self.bodies[index].flags.remove(BodyFlags::DIRTY);
            }
        }

        // 2. Pair discovery; new pairs become contacts unless the pair set
        // already tracks them. A body never collides with itself.
        let mut new_pairs = core::mem::take(&mut self.new_pairs);
        new_pairs.clear();
        self.broad_phase
            .update_pairs(|a, b| new_pairs.push((a, b)));
        for &(shape_a, shape_b) in &new_pairs {
            if self.pair_set.contains(shape_a, shape_b) {
                continue;
            }
            if self.shapes[shape_a].body == self.shapes[shape_b].body {
                continue;
            }
            create_contact(self, shape_a, shape_b);
        }
        self.new_pairs = new_pairs;

        // 3. Update or destroy contacts. Backwards so destruction cannot
        // disturb the part of the pool still to be visited.
        let contact_capacity = self.contacts.capacity() as i32;
        for index in (0..contact_capacity).rev() {
            if !self.contacts.is_valid(index) {
                continue;
            }
            let (proxy_a, proxy_b) = {
                let contact = &self.contacts[index];
                (
                    self.shapes[contact.shape_a].proxy_id,
                    self.shapes[contact.shape_b].proxy_id,
                )
            };
            let aabb_a = self.broad_phase.fat_aabb(proxy_a);
            let aabb_b = self.broad_phase.fat_aabb(proxy_b);
            if aabb_a.intersects(aabb_b) {
                update_contact(self, index);
            } else {
                destroy_contact(self, index);
            }
        }

        // 4. Solve.
        let inv_dt = if dt > 0.0 { 1.0 / dt } else { 0.0 };
        let context = SolverContext {
            dt,
            inv_dt,
            h: dt,
            inv_h: inv_dt,
            iterations: velocity_iterations,
            extra_iterations: relaxation_iterations,
            warm_start,
            contact_hertz: self.contact_hertz.min(0.333 * inv_dt),
            contact_damping_ratio: self.contact_damping_ratio,
        };
        solve(self, &context);

        // Forces and torques are consumed by this step.
        for (_, body) in self.bodies.iter_mut() {
            body.force = Vec2::ZERO;
            body.torque = 0.0;
        }
    }

    // --- Body access ----------------------------------------------------

    pub fn body_is_valid(&self, id: BodyId) -> bool {
        self.bodies.is_valid(id.0)
    }

    fn body(&self, id: BodyId) -> Result<&Body, Error> {
        if self.bodies.is_valid(id.0) {
            Ok(&self.bodies[id.0])
        } else {
            Err(Error::InvalidBody)
        }
    }

    fn body_mut(&mut self, id: BodyId) -> Result<&mut Body, Error> {
        if self.bodies.is_valid(id.0) {
            Ok(&mut self.bodies[id.0])
        } else {
            Err(Error::InvalidBody)
        }
    }

    /// Get a body's transform (origin + rotation), current as of the last
    /// solve.
    pub fn body_transform(&self, id: BodyId) -> Transform {
        let body = &self.bodies[id.0];
        Transform {
            p: body.position - body.rot.rotate_vec(body.local_center),
            q: body.rot,
        }
    }

    /// Get a body's world origin position.
    pub fn body_position(&self, id: BodyId) -> Vec2 {
        self.body_transform(id).p
    }

    /// Get a body's world center of mass.
    pub fn body_center_of_mass(&self, id: BodyId) -> Vec2 {
        self.bodies[id.0].position
    }

    pub fn body_type(&self, id: BodyId) -> BodyType {
        self.bodies[id.0].body_type
    }

    pub fn body_mass(&self, id: BodyId) -> f32 {
        self.bodies[id.0].mass
    }

    pub fn body_inertia(&self, id: BodyId) -> f32 {
        self.bodies[id.0].inertia
    }

    pub fn body_linear_velocity(&self, id: BodyId) -> Vec2 {
        self.bodies[id.0].linear_velocity
    }

    pub fn body_angular_velocity(&self, id: BodyId) -> f32 {
        self.bodies[id.0].angular_velocity
    }

    /// Set a body's linear velocity by id.
    pub fn set_body_linear_velocity<V: Into<Vec2>>(
        &mut self,
        id: BodyId,
        v: V,
    ) -> Result<(), Error> {
        let v = v.into();
        self.body_mut(id)?.linear_velocity = v;
        Ok(())
    }

    /// Set a body's angular velocity by id.
    pub fn set_body_angular_velocity(&mut self, id: BodyId, w: f32) -> Result<(), Error> {
        self.body_mut(id)?.angular_velocity = w;
        Ok(())
    }

    /// Teleport a body. Marks it dirty so the broad-phase refreshes.
    pub fn set_body_transform<V: Into<Vec2>>(
        &mut self,
        id: BodyId,
        position: V,
        angle_radians: f32,
    ) -> Result<(), Error> {
        let position = position.into();
        let body = self.body_mut(id)?;
        body.origin = position;
        body.rot = crate::core::math::Rot::from_radians(angle_radians);
        body.position = body.origin + body.rot.rotate_vec(body.local_center);
        body.flags.insert(BodyFlags::DIRTY);
        Ok(())
    }

    /// Enable or disable gravity for one body.
    pub fn set_body_use_gravity(&mut self, id: BodyId, flag: bool) -> Result<(), Error> {
        let body = self.body_mut(id)?;
        body.flags.set(BodyFlags::USE_GRAVITY, flag);
        Ok(())
    }

    // --- Forces and impulses --------------------------------------------

    /// Accumulate a force applied at a world point.
    pub fn apply_force<V: Into<Vec2>, P: Into<Vec2>>(
        &mut self,
        id: BodyId,
        force: V,
        point: P,
    ) -> Result<(), Error> {
        let force = force.into();
        let point = point.into();
        let body = self.body_mut(id)?;
        if body.is_dynamic() {
            body.force += force;
            body.torque += (point - body.position).cross(force);
        }
        Ok(())
    }

    /// Accumulate a force through the center of mass (no torque).
    pub fn apply_force_to_center<V: Into<Vec2>>(&mut self, id: BodyId, force: V) -> Result<(), Error> {
        let force = force.into();
        let body = self.body_mut(id)?;
        if body.is_dynamic() {
            body.force += force;
        }
        Ok(())
    }

    /// Accumulate a torque.
    pub fn apply_torque(&mut self, id: BodyId, torque: f32) -> Result<(), Error> {
        let body = self.body_mut(id)?;
        if body.is_dynamic() {
            body.torque += torque;
        }
        Ok(())
    }

    /// Immediately change velocity by an impulse at a world point.
    pub fn apply_linear_impulse<V: Into<Vec2>, P: Into<Vec2>>(
        &mut self,
        id: BodyId,
        impulse: V,
        point: P,
    ) -> Result<(), Error> {
        let impulse = impulse.into();
        let point = point.into();
        let body = self.body_mut(id)?;
        if body.is_dynamic() {
            body.linear_velocity += body.inv_mass * impulse;
            body.angular_velocity += body.inv_inertia * (point - body.position).cross(impulse);
        }
        Ok(())
    }

    /// Immediately change angular velocity by an impulse.
    pub fn apply_angular_impulse(&mut self, id: BodyId, impulse: f32) -> Result<(), Error> {
        let body = self.body_mut(id)?;
        if body.is_dynamic() {
            body.angular_velocity += body.inv_inertia * impulse;
        }
        Ok(())
    }

    // --- Shape access ---------------------------------------------------

    pub fn shape_is_valid(&self, id: ShapeId) -> bool {
        self.shapes.is_valid(id.0)
    }

    pub fn shape_body(&self, id: ShapeId) -> BodyId {
        BodyId(self.shapes[id.0].body)
    }

    pub fn shape_polygon(&self, id: ShapeId) -> &Polygon {
        &self.shapes[id.0].polygon
    }

    /// World-space tight AABB, as of the start of the last step.
    pub fn shape_aabb(&self, id: ShapeId) -> Aabb {
        self.shapes[id.0].aabb
    }

    /// Fat broad-phase AABB for a shape's proxy.
    pub fn shape_fat_aabb(&self, id: ShapeId) -> Aabb {
        self.broad_phase.fat_aabb(self.shapes[id.0].proxy_id)
    }

    pub fn shape_friction(&self, id: ShapeId) -> f32 {
        self.shapes[id.0].friction
    }

    pub fn shape_restitution(&self, id: ShapeId) -> f32 {
        self.shapes[id.0].restitution
    }

    pub fn shape_density(&self, id: ShapeId) -> f32 {
        self.shapes[id.0].density
    }

    /// Force the broad-phase to re-query a shape's proxy next step, even
    /// without geometric change.
    pub fn touch_shape(&mut self, id: ShapeId) -> Result<(), Error> {
        if !self.shapes.is_valid(id.0) {
            return Err(Error::InvalidShape);
        }
        let proxy_id = self.shapes[id.0].proxy_id;
        self.broad_phase.touch_proxy(proxy_id);
        Ok(())
    }

    // --- Iteration views ------------------------------------------------

    /// Iterate live bodies.
    pub fn bodies(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.bodies.iter().map(|(index, _)| BodyId(index))
    }

    /// Iterate live shapes.
    pub fn shapes(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.shapes.iter().map(|(index, _)| ShapeId(index))
    }

    /// Iterate live contacts.
    pub fn contacts(&self) -> impl Iterator<Item = ContactId> + '_ {
        self.contacts.iter().map(|(index, _)| ContactId(index))
    }

    pub fn contact_is_valid(&self, id: ContactId) -> bool {
        self.contacts.is_valid(id.0)
    }

    /// The two shapes of a contact.
    pub fn contact_shapes(&self, id: ContactId) -> Result<(ShapeId, ShapeId), Error> {
        if !self.contacts.is_valid(id.0) {
            return Err(Error::InvalidContact);
        }
        let contact = &self.contacts[id.0];
        Ok((ShapeId(contact.shape_a), ShapeId(contact.shape_b)))
    }

    /// The manifold of a contact.
    pub fn contact_manifold(&self, id: ContactId) -> Result<&Manifold, Error> {
        if !self.contacts.is_valid(id.0) {
            return Err(Error::InvalidContact);
        }
        Ok(&self.contacts[id.0].manifold)
    }

    /// Mixed friction of a contact: `sqrt(friction_a · friction_b)`.
    pub fn contact_friction(&self, id: ContactId) -> Result<f32, Error> {
        if !self.contacts.is_valid(id.0) {
            return Err(Error::InvalidContact);
        }
        Ok(self.contacts[id.0].friction)
    }

    /// Mixed restitution of a contact: `max(restitution_a, restitution_b)`.
    pub fn contact_restitution(&self, id: ContactId) -> Result<f32, Error> {
        if !self.contacts.is_valid(id.0) {
            return Err(Error::InvalidContact);
        }
        Ok(self.contacts[id.0].restitution)
    }

    /// Contacts attached to a body, by walking its edge list.
    pub fn body_contacts(&self, id: BodyId) -> Vec<ContactId> {
        let mut out = Vec::new();
        let Ok(body) = self.body(id) else {
            return out;
        };
        let mut key = body.contact_list;
        while key != NULL_INDEX {
            let contact_index = key_contact(key);
            out.push(ContactId(contact_index));
            key = self.contacts[contact_index].edges[key_side(key)].next_key;
        }
        out
    }

    /// Translate the whole world so `new_origin` becomes the origin.
    pub fn shift_origin<V: Into<Vec2>>(&mut self, new_origin: V) {
        let origin = new_origin.into();
        for (_, body) in self.bodies.iter_mut() {
            body.origin -= origin;
            body.position -= origin;
        }
        for (_, shape) in self.shapes.iter_mut() {
            shape.aabb.lower -= origin;
            shape.aabb.upper -= origin;
        }
        self.broad_phase.shift_origin(origin);
    }

    /// World counters snapshot (sizes, tree stats).
    pub fn counters(&self) -> Counters {
        Counters {
            body_count: self.bodies.len(),
            shape_count: self.shapes.len(),
            contact_count: self.contacts.len(),
            pair_count: self.pair_set.len(),
            proxy_count: self.broad_phase.proxy_count(),
            tree_height: self.broad_phase.tree().height(),
            tree_area_ratio: self.broad_phase.tree().area_ratio(),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldDef::default())
    }
}
