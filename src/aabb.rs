use crate::types::Vec2;

/// Axis-aligned bounding box.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Aabb {
    pub lower: Vec2,
    pub upper: Vec2,
}

/// Result of casting a segment against an AABB.
#[derive(Copy, Clone, Debug)]
pub struct AabbRayHit {
    /// Fraction along the segment at entry, in `[0, 1]`.
    pub fraction: f32,
    /// Entry point.
    pub point: Vec2,
    /// Outward face normal at entry.
    pub normal: Vec2,
}

impl Aabb {
    pub const fn new(lower: Vec2, upper: Vec2) -> Self {
        Self { lower, upper }
    }

    pub fn from_center_half_extents<C: Into<Vec2>, H: Into<Vec2>>(center: C, half: H) -> Self {
        let center = center.into();
        let half = half.into();
        Self {
            lower: center - half,
            upper: center + half,
        }
    }

    pub fn is_valid(self) -> bool {
        self.upper.x >= self.lower.x && self.upper.y >= self.lower.y
    }

    pub fn center(self) -> Vec2 {
        0.5 * (self.lower + self.upper)
    }

    pub fn half_extents(self) -> Vec2 {
        0.5 * (self.upper - self.lower)
    }

    pub fn perimeter(self) -> f32 {
        2.0 * ((self.upper.x - self.lower.x) + (self.upper.y - self.lower.y))
    }

    /// Point-wise min/max of two boxes.
    pub fn union(a: Self, b: Self) -> Self {
        Self {
            lower: a.lower.min(b.lower),
            upper: a.upper.max(b.upper),
        }
    }

    pub fn contains_point(self, p: Vec2) -> bool {
        p.x >= self.lower.x && p.x <= self.upper.x && p.y >= self.lower.y && p.y <= self.upper.y
    }

    pub fn contains(self, other: Self) -> bool {
        self.contains_point(other.lower) && self.contains_point(other.upper)
    }

    pub fn intersects(self, other: Self) -> bool {
        self.upper.x > other.lower.x
            && other.upper.x > self.lower.x
            && self.upper.y > other.lower.y
            && other.upper.y > self.lower.y
    }

    /// Grow the box by `margin` on every side.
    pub fn inflated(self, margin: f32) -> Self {
        let m = Vec2::new(margin, margin);
        Self {
            lower: self.lower - m,
            upper: self.upper + m,
        }
    }

    /// Cast the segment `p1 → p2` against this box using the slab method.
    pub fn ray_cast(self, p1: Vec2, p2: Vec2) -> Option<AabbRayHit> {
        let d = p2 - p1;
        let mut tmin = 0.0_f32;
        let mut tmax = 1.0_f32;
        let mut normal = Vec2::ZERO;

        for axis in 0..2 {
            let (origin, dir, lower, upper, n_lower, n_upper) = if axis == 0 {
                (
                    p1.x,
                    d.x,
                    self.lower.x,
                    self.upper.x,
                    Vec2::new(-1.0, 0.0),
                    Vec2::new(1.0, 0.0),
                )
            } else {
                (
                    p1.y,
                    d.y,
                    self.lower.y,
                    self.upper.y,
                    Vec2::new(0.0, -1.0),
                    Vec2::new(0.0, 1.0),
                )
            };

            if dir.abs() < f32::EPSILON {
                if origin < lower || origin > upper {
                    return None;
                }
                continue;
            }

            let inv_d = 1.0 / dir;
            let mut t1 = (lower - origin) * inv_d;
            let mut t2 = (upper - origin) * inv_d;
            let mut n1 = n_lower;
            let mut n2 = n_upper;
            if t1 > t2 {
                core::mem::swap(&mut t1, &mut t2);
                core::mem::swap(&mut n1, &mut n2);
            }
            if t1 > tmin {
                tmin = t1;
                normal = n1;
            }
            if t2 < tmax {
                tmax = t2;
            }
            if tmin > tmax {
                return None;
            }
        }

        if !(0.0..=1.0).contains(&tmin) {
            return None;
        }

        Some(AabbRayHit {
            fraction: tmin,
            point: p1 + tmin * d,
            normal,
        })
    }
}
