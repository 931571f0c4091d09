use crate::types::Vec2;

/// A 2D rotation stored as a unit complex number (cos, sin).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rot {
    pub c: f32,
    pub s: f32,
}

impl Rot {
    pub const IDENTITY: Self = Self { c: 1.0, s: 0.0 };

    pub fn from_radians(rad: f32) -> Self {
        let (s, c) = rad.sin_cos();
        Self { c, s }
    }

    pub fn from_degrees(deg: f32) -> Self {
        Self::from_radians(deg.to_radians())
    }

    pub fn angle(self) -> f32 {
        self.s.atan2(self.c)
    }

    /// Rotation composition: `self` followed by `rhs`.
    #[inline]
    pub fn mul(self, rhs: Self) -> Self {
        Self {
            s: self.s * rhs.c + self.c * rhs.s,
            c: self.c * rhs.c - self.s * rhs.s,
        }
    }

    /// Inverse rotation.
    #[inline]
    pub fn inverse(self) -> Self {
        Self {
            c: self.c,
            s: -self.s,
        }
    }

    #[inline]
    pub fn rotate_vec(self, v: Vec2) -> Vec2 {
        Vec2 {
            x: self.c * v.x - self.s * v.y,
            y: self.s * v.x + self.c * v.y,
        }
    }

    #[inline]
    pub fn inv_rotate_vec(self, v: Vec2) -> Vec2 {
        Vec2 {
            x: self.c * v.x + self.s * v.y,
            y: -self.s * v.x + self.c * v.y,
        }
    }

    /// Renormalize to a unit complex number. Integration drifts the magnitude,
    /// so this runs after every composition with a per-step delta rotation.
    #[inline]
    pub fn normalized(self) -> Self {
        let mag = (self.s * self.s + self.c * self.c).sqrt();
        let inv = if mag > 0.0 { 1.0 / mag } else { 0.0 };
        Self {
            c: self.c * inv,
            s: self.s * inv,
        }
    }

    /// Advance this rotation by `delta_angle` radians (complex composition,
    /// then renormalize).
    #[inline]
    pub fn integrated(self, delta_angle: f32) -> Self {
        self.mul(Self::from_radians(delta_angle)).normalized()
    }
}

impl Default for Rot {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A rigid transform: translation plus rotation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Transform {
    pub p: Vec2,
    pub q: Rot,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        p: Vec2::ZERO,
        q: Rot::IDENTITY,
    };

    pub fn from_pos_angle<P: Into<Vec2>>(p: P, angle_radians: f32) -> Self {
        Self {
            p: p.into(),
            q: Rot::from_radians(angle_radians),
        }
    }

    pub fn position(self) -> Vec2 {
        self.p
    }

    pub fn rotation(self) -> Rot {
        self.q
    }

    /// Local point to world.
    #[inline]
    pub fn transform_point(self, v: Vec2) -> Vec2 {
        self.q.rotate_vec(v) + self.p
    }

    /// World point to local.
    #[inline]
    pub fn inv_transform_point(self, v: Vec2) -> Vec2 {
        self.q.inv_rotate_vec(v - self.p)
    }
}

/// Compose two transforms: `mul_transforms(a, b)` maps b-local points to the
/// frame `a` is expressed in.
#[inline]
pub fn mul_transforms(a: Transform, b: Transform) -> Transform {
    Transform {
        q: a.q.mul(b.q),
        p: a.q.rotate_vec(b.p) + a.p,
    }
}

/// Inverse composition: `inv_mul_transforms(a, b)` expresses `b` in `a`'s
/// local frame.
#[inline]
pub fn inv_mul_transforms(a: Transform, b: Transform) -> Transform {
    Transform {
        q: a.q.inverse().mul(b.q),
        p: a.q.inv_rotate_vec(b.p - a.p),
    }
}
