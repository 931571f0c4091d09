use crate::core::math::{Rot, Transform};
use crate::types::{NULL_INDEX, Vec2};

/// Body simulation kinds.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum BodyType {
    /// Never moves; zero effective mass.
    #[default]
    Static,
    /// Moves under externally set velocities; does not respond to impulses.
    Kinematic,
    /// Fully simulated.
    Dynamic,
}

bitflags::bitflags! {
    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    pub(crate) struct BodyFlags: u8 {
        /// Gravity (scaled by `gravity_scale`) applies to this body.
        const USE_GRAVITY = 1 << 0;
        /// Mass properties or user-set state changed; recompute on the next
        /// step and force a broad-phase refresh.
        const DIRTY = 1 << 1;
    }
}

impl Default for BodyFlags {
    fn default() -> Self {
        Self::USE_GRAVITY
    }
}

/// Body definition used by [`World::create_body`](crate::World::create_body).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct BodyDef {
    pub body_type: BodyType,
    /// Initial world-space position of the body origin.
    pub position: Vec2,
    /// Initial rotation in radians.
    pub angle: f32,
    /// Initial linear velocity (m/s).
    pub linear_velocity: Vec2,
    /// Initial angular velocity (rad/s).
    pub angular_velocity: f32,
    /// Linear damping (drag-like term).
    pub linear_damping: f32,
    /// Angular damping.
    pub angular_damping: f32,
    /// Per-body gravity scale (1 = normal gravity).
    pub gravity_scale: f32,
    /// Whether world gravity applies at all.
    pub use_gravity: bool,
}

impl Default for BodyDef {
    fn default() -> Self {
        Self {
            body_type: BodyType::Static,
            position: Vec2::ZERO,
            angle: 0.0,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            gravity_scale: 1.0,
            use_gravity: true,
        }
    }
}

impl BodyDef {
    pub fn builder() -> BodyBuilder {
        BodyBuilder::new()
    }
}

/// Fluent builder for `BodyDef`.
///
/// Chain methods to configure a body and finish with `build()`.
#[derive(Clone, Debug, Default)]
pub struct BodyBuilder {
    def: BodyDef,
}

impl BodyBuilder {
    /// Start a new builder with default `BodyDef`.
    pub fn new() -> Self {
        Self::default()
    }
    /// Set the body type (static, kinematic, dynamic).
    pub fn body_type(mut self, t: BodyType) -> Self {
        self.def.body_type = t;
        self
    }
    /// Initial world-space position.
    pub fn position<V: Into<Vec2>>(mut self, p: V) -> Self {
        self.def.position = p.into();
        self
    }
    /// Initial rotation in radians.
    pub fn angle(mut self, radians: f32) -> Self {
        self.def.angle = radians;
        self
    }
    /// Initial linear velocity (m/s).
    pub fn linear_velocity<V: Into<Vec2>>(mut self, v: V) -> Self {
        self.def.linear_velocity = v.into();
        self
    }
    /// Initial angular velocity (rad/s).
    pub fn angular_velocity(mut self, v: f32) -> Self {
        self.def.angular_velocity = v;
        self
    }
    /// Linear damping (drag-like term).
    pub fn linear_damping(mut self, v: f32) -> Self {
        self.def.linear_damping = v;
        self
    }
    /// Angular damping.
    pub fn angular_damping(mut self, v: f32) -> Self {
        self.def.angular_damping = v;
        self
    }
    /// Per-body gravity scale (1 = normal gravity).
    pub fn gravity_scale(mut self, v: f32) -> Self {
        self.def.gravity_scale = v;
        self
    }
    /// Enable or disable world gravity for this body.
    pub fn use_gravity(mut self, flag: bool) -> Self {
        self.def.use_gravity = flag;
        self
    }

    #[must_use]
    pub fn build(self) -> BodyDef {
        self.def
    }
}

impl From<BodyDef> for BodyBuilder {
    fn from(def: BodyDef) -> Self {
        Self { def }
    }
}

/// Internal body record stored in the world's body pool.
#[derive(Clone, Debug)]
pub(crate) struct Body {
    pub body_type: BodyType,
    /// World position of the body origin (the frame shapes are defined in).
    pub origin: Vec2,
    /// World position of the center of mass.
    pub position: Vec2,
    /// Center of mass in the body frame.
    pub local_center: Vec2,
    pub rot: Rot,
    pub linear_velocity: Vec2,
    pub angular_velocity: f32,
    /// Accumulated force and torque, cleared at the end of every step, after
    /// the solve.
    pub force: Vec2,
    pub torque: f32,
    pub mass: f32,
    pub inv_mass: f32,
    pub inertia: f32,
    pub inv_inertia: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub gravity_scale: f32,
    pub flags: BodyFlags,
    /// Head of the singly linked list of attached shape indices.
    pub shape_list: i32,
    /// Head of the doubly linked list of contact-edge keys.
    pub contact_list: i32,
    pub contact_count: i32,
    /// Position change accumulated by the solver, committed at end of step.
    pub delta_position: Vec2,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            body_type: BodyType::Static,
            origin: Vec2::ZERO,
            position: Vec2::ZERO,
            local_center: Vec2::ZERO,
            rot: Rot::IDENTITY,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            force: Vec2::ZERO,
            torque: 0.0,
            mass: 1.0,
            inv_mass: 1.0,
            inertia: 1.0,
            inv_inertia: 1.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            gravity_scale: 1.0,
            flags: BodyFlags::default(),
            shape_list: NULL_INDEX,
            contact_list: NULL_INDEX,
            contact_count: 0,
            delta_position: Vec2::ZERO,
        }
    }
}

impl Body {
    #[inline]
    pub fn transform(&self) -> Transform {
        Transform {
            p: self.origin,
            q: self.rot,
        }
    }

    #[inline]
    pub fn is_dynamic(&self) -> bool {
        self.body_type == BodyType::Dynamic
    }
}
