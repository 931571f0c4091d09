//! Broad-phase queries and casting helpers.
//!
//! - AABB overlap: collect matching shape ids or visit them with a callback.
//! - Ray casts: all hits along a segment, or just the closest.
//!
//! Both delegate to the broad-phase tree and then test the shape's tight
//! AABB, so results are conservative with respect to exact polygon geometry.

use crate::aabb::Aabb;
use crate::types::{ShapeId, Vec2};
use crate::world::World;

/// Result of a ray cast against a shape.
#[derive(Copy, Clone, Debug)]
pub struct RayResult {
    pub shape_id: ShapeId,
    /// Entry point on the shape's AABB.
    pub point: Vec2,
    /// Outward AABB face normal at entry.
    pub normal: Vec2,
    /// Fraction along the segment, in `[0, 1]`.
    pub fraction: f32,
}

impl World {
    /// Visit every shape whose tight AABB intersects `aabb`. The callback
    /// returns false to abort.
    pub fn query_aabb<F: FnMut(ShapeId) -> bool>(&self, aabb: Aabb, mut callback: F) {
        let shapes = &self.shapes;
        self.broad_phase.query(aabb, |proxy_id| {
            let shape_index = self.broad_phase.user_data(proxy_id);
            if shapes[shape_index].aabb.intersects(aabb) {
                return callback(ShapeId(shape_index));
            }
            true
        });
    }

    /// Overlap test for all shapes in an AABB. Returns matching shape ids.
    pub fn overlap_aabb(&self, aabb: Aabb) -> Vec<ShapeId> {
        let mut out = Vec::new();
        self.query_aabb(aabb, |shape_id| {
            out.push(shape_id);
            true
        });
        out
    }

    /// Cast a ray and collect all hits along the path, ordered by fraction.
    pub fn cast_ray_all<VO: Into<Vec2>, VT: Into<Vec2>>(
        &self,
        origin: VO,
        translation: VT,
    ) -> Vec<RayResult> {
        let p1 = origin.into();
        let p2 = p1 + translation.into();

        // Bound the segment and let the tree prune; exact test per leaf.
        let segment_aabb = Aabb::new(p1.min(p2), p1.max(p2));

        let mut out: Vec<RayResult> = Vec::new();
        self.broad_phase.query(segment_aabb, |proxy_id| {
            let shape_index = self.broad_phase.user_data(proxy_id);
            if let Some(hit) = self.shapes[shape_index].aabb.ray_cast(p1, p2) {
                out.push(RayResult {
                    shape_id: ShapeId(shape_index),
                    point: hit.point,
                    normal: hit.normal,
                    fraction: hit.fraction,
                });
            }
            true
        });

        out.sort_by(|a, b| a.fraction.total_cmp(&b.fraction));
        out
    }

    /// Cast a ray and return the closest hit, if any.
    pub fn cast_ray_closest<VO: Into<Vec2>, VT: Into<Vec2>>(
        &self,
        origin: VO,
        translation: VT,
    ) -> Option<RayResult> {
        self.cast_ray_all(origin, translation).into_iter().next()
    }
}
