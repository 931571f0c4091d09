//! Contact manifold generation.
//!
//! Produces up to two contact points between two convex polygons. Shapes that
//! touch or penetrate go through SAT plus reference/incident edge clipping;
//! separated-but-close shapes reuse the cached GJK simplex to pick the
//! closest features (vertex-vertex or vertex-edge) and clip from there, which
//! also yields speculative points with positive separation.

use crate::core::math::{Transform, inv_mul_transforms};
use crate::distance::{DistanceInput, DistanceProxy, SimplexCache, shape_distance};
use crate::shapes::Polygon;
use crate::tuning::{LINEAR_SLOP, SPECULATIVE_DISTANCE};
use crate::types::Vec2;

/// One contact point of a manifold.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ManifoldPoint {
    /// Anchor on shape A, in body A's frame.
    pub local_anchor_a: Vec2,
    /// Anchor on shape B, in body B's frame.
    pub local_anchor_b: Vec2,
    /// Signed separation along the manifold normal; negative when
    /// penetrating.
    pub separation: f32,
    /// Accumulated normal impulse, carried across steps for warm starting.
    pub normal_impulse: f32,
    /// Accumulated tangent (friction) impulse.
    pub tangent_impulse: f32,
    /// Stable feature id: reference index in the high byte, incident index in
    /// the low byte.
    pub id: u16,
    /// True when this point matched a point of the previous manifold by id.
    pub persisted: bool,
}

/// Up to two contact points sharing one normal (world frame, from A to B).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Manifold {
    pub points: [ManifoldPoint; 2],
    pub normal: Vec2,
    pub point_count: usize,
}

impl Manifold {
    /// The live points of the manifold.
    pub fn points(&self) -> &[ManifoldPoint] {
        &self.points[..self.point_count]
    }
}

#[inline]
fn make_id(reference: usize, incident: usize) -> u16 {
    ((reference as u16) << 8) | (incident as u16 & 0xff)
}

/// Clip the incident edge against the side planes of the reference edge and
/// emit up to two points. Everything runs in shape A's local frame; `flip`
/// says polygon B carries the reference edge.
fn clip_polygons(
    poly_a: &Polygon,
    poly_b: &Polygon,
    edge_a: usize,
    edge_b: usize,
    flip: bool,
) -> Manifold {
    let mut manifold = Manifold::default();

    // Reference polygon edge i11-i12, incident polygon edge i21-i22.
    let (poly1, poly2, i11, i12, i21, i22) = if flip {
        (
            poly_b,
            poly_a,
            edge_b,
            (edge_b + 1) % poly_b.count,
            edge_a,
            (edge_a + 1) % poly_a.count,
        )
    } else {
        (
            poly_a,
            poly_b,
            edge_a,
            (edge_a + 1) % poly_a.count,
            edge_b,
            (edge_b + 1) % poly_b.count,
        )
    };

    let normal = poly1.normals[i11];

    let v11 = poly1.vertices[i11];
    let v12 = poly1.vertices[i12];
    let v21 = poly2.vertices[i21];
    let v22 = poly2.vertices[i22];

    let tangent = normal.perp();

    let lower1 = 0.0;
    let upper1 = (v12 - v11).dot(tangent);

    // The incident edge points opposite the tangent due to CCW winding.
    let upper2 = (v21 - v11).dot(tangent);
    let lower2 = (v22 - v11).dot(tangent);

    let v_lower = if lower2 < lower1 && upper2 - lower2 > f32::EPSILON {
        v22.lerp(v21, (lower1 - lower2) / (upper2 - lower2))
    } else {
        v22
    };
    let v_upper = if upper2 > upper1 && upper2 - lower2 > f32::EPSILON {
        v22.lerp(v21, (upper1 - lower2) / (upper2 - lower2))
    } else {
        v21
    };

    let separation_lower = (v_lower - v11).dot(normal);
    let separation_upper = (v_upper - v11).dot(normal);

    let r1 = poly_a.radius;
    let r2 = poly_b.radius;

    // Contact points at the midpoint of the gap, accounting for radii.
    let v_lower = v_lower + normal * (0.5 * (r1 - r2 - separation_lower));
    let v_upper = v_upper + normal * (0.5 * (r1 - r2 - separation_upper));

    let radius = r1 + r2;

    if !flip {
        manifold.normal = normal;
        manifold.points[0] = ManifoldPoint {
            local_anchor_a: v_lower,
            separation: separation_lower - radius,
            id: make_id(i11, i22),
            ..Default::default()
        };
        manifold.points[1] = ManifoldPoint {
            local_anchor_a: v_upper,
            separation: separation_upper - radius,
            id: make_id(i12, i21),
            ..Default::default()
        };
        manifold.point_count = 2;
    } else {
        manifold.normal = -normal;
        manifold.points[0] = ManifoldPoint {
            local_anchor_a: v_upper,
            separation: separation_upper - radius,
            id: make_id(i21, i12),
            ..Default::default()
        };
        manifold.points[1] = ManifoldPoint {
            local_anchor_a: v_lower,
            separation: separation_lower - radius,
            id: make_id(i22, i11),
            ..Default::default()
        };
        manifold.point_count = 2;
    }

    manifold
}

/// Max separation of `poly2` from `poly1`'s edge planes; both polygons must be
/// in the same frame.
fn find_max_separation(poly1: &Polygon, poly2: &Polygon) -> (usize, f32) {
    let mut best_index = 0;
    let mut max_separation = f32::MIN;

    for i in 0..poly1.count {
        let n = poly1.normals[i];
        let v1 = poly1.vertices[i];

        // Deepest point of poly2 against normal i.
        let mut si = f32::MAX;
        for j in 0..poly2.count {
            let sij = n.dot(poly2.vertices[j] - v1);
            if sij < si {
                si = sij;
            }
        }

        if si > max_separation {
            max_separation = si;
            best_index = i;
        }
    }

    (best_index, max_separation)
}

/// SAT reference-edge selection plus clipping for touching or penetrating
/// polygons.
fn polygon_sat(poly_a: &Polygon, poly_b: &Polygon) -> Manifold {
    let (mut edge_a, separation_a) = find_max_separation(poly_a, poly_b);
    let (mut edge_b, separation_b) = find_max_separation(poly_b, poly_a);

    let flip = separation_b > separation_a;
    if flip {
        // Reference on B; incident edge is A's most anti-parallel edge.
        let search_direction = poly_b.normals[edge_b];
        let mut min_dot = f32::MAX;
        edge_a = 0;
        for (i, &n) in poly_a.normals().iter().enumerate() {
            let dot = search_direction.dot(n);
            if dot < min_dot {
                min_dot = dot;
                edge_a = i;
            }
        }
    } else {
        let search_direction = poly_a.normals[edge_a];
        let mut min_dot = f32::MAX;
        edge_b = 0;
        for (i, &n) in poly_b.normals().iter().enumerate() {
            let dot = search_direction.dot(n);
            if dot < min_dot {
                min_dot = dot;
                edge_b = i;
            }
        }
    }

    clip_polygons(poly_a, poly_b, edge_a, edge_b, flip)
}

/// Build the contact manifold between two convex polygons.
///
/// Strategy: transform B into A's local frame, run GJK with the warm-start
/// cache, and branch on the result: no contact beyond the speculative
/// threshold, SAT + clip when touching, otherwise closest-feature clipping
/// from the cached simplex. The returned normal is in world frame and the
/// anchors are usable by the solver regardless of future body motion.
pub fn collide_polygons(
    poly_a: &Polygon,
    poly_b: &Polygon,
    xf_a: Transform,
    xf_b: Transform,
    cache: &mut SimplexCache,
) -> Manifold {
    let mut manifold = Manifold::default();
    let radius = poly_a.radius + poly_b.radius;

    // Work entirely in shape A's local space.
    let xf_rel = inv_mul_transforms(xf_a, xf_b);
    let mut local_b = *poly_b;
    for i in 0..local_b.count {
        local_b.vertices[i] = xf_rel.transform_point(poly_b.vertices[i]);
        local_b.normals[i] = xf_rel.q.rotate_vec(poly_b.normals[i]);
    }

    let input = DistanceInput {
        proxy_a: DistanceProxy::from_polygon(poly_a),
        proxy_b: DistanceProxy::from_polygon(&local_b),
        transform_a: Transform::IDENTITY,
        transform_b: Transform::IDENTITY,
    };
    let output = shape_distance(&input, cache);

    if output.distance > SPECULATIVE_DISTANCE {
        // Too far apart for even a speculative contact.
        return manifold;
    }

    if output.distance < 0.1 * LINEAR_SLOP {
        // Penetrating or grazing: GJK witness points are unreliable, use SAT.
        manifold = polygon_sat(poly_a, &local_b);
        if manifold.point_count > 0 {
            manifold.normal = xf_a.q.rotate_vec(manifold.normal);
            for point in &mut manifold.points[..manifold.point_count] {
                point.local_anchor_b = xf_rel.inv_transform_point(point.local_anchor_a);
            }
        }
        return manifold;
    }

    if cache.count == 3 {
        // Separated but the simplex closed into a triangle; treat as no
        // contact rather than guessing features.
        return manifold;
    }

    if cache.count == 1 {
        // Vertex-vertex.
        let pa = output.point_a;
        let pb = output.point_b;
        let distance = output.distance;

        let normal = (pb - pa).normalized();
        let radii_normal = normal * (0.5 * (poly_a.radius - local_b.radius - distance));
        let contact_point_a = pb + radii_normal;

        manifold.normal = xf_a.q.rotate_vec(normal);
        manifold.points[0] = ManifoldPoint {
            local_anchor_a: contact_point_a,
            local_anchor_b: xf_rel.inv_transform_point(contact_point_a),
            separation: distance - radius,
            id: make_id(cache.index_a[0] as usize, cache.index_b[0] as usize),
            ..Default::default()
        };
        manifold.point_count = 1;
        return manifold;
    }

    // Vertex-edge or edge-edge: the cached simplex is a segment.
    debug_assert_eq!(cache.count, 2);
    let count_a = poly_a.count;
    let count_b = local_b.count;

    let a1 = cache.index_a[0] as usize;
    let a2 = cache.index_a[1] as usize;
    let b1 = cache.index_b[0] as usize;
    let b2 = cache.index_b[1] as usize;

    let (edge_a, edge_b, flip);
    if a1 == a2 {
        // One point on A, an edge on B. The reference edge on B is the one
        // most aligned with the closest-point axis.
        debug_assert_ne!(b1, b2);
        let axis = output.point_a - output.point_b;
        let dot1 = axis.dot(local_b.normals[b1]);
        let dot2 = axis.dot(local_b.normals[b2]);
        edge_b = if dot1 > dot2 { b1 } else { b2 };
        flip = true;

        // Incident edge on A, restricted to the edges adjacent to the
        // closest vertex.
        let axis = local_b.normals[edge_b];
        let edge_a1 = a1;
        let edge_a2 = if edge_a1 == 0 { count_a - 1 } else { edge_a1 - 1 };
        let dot1 = axis.dot(poly_a.normals[edge_a1]);
        let dot2 = axis.dot(poly_a.normals[edge_a2]);
        edge_a = if dot1 < dot2 { edge_a1 } else { edge_a2 };
    } else {
        let axis = output.point_b - output.point_a;
        let dot1 = axis.dot(poly_a.normals[a1]);
        let dot2 = axis.dot(poly_a.normals[a2]);
        edge_a = if dot1 > dot2 { a1 } else { a2 };
        flip = false;

        let axis = poly_a.normals[edge_a];
        let edge_b1 = b1;
        let edge_b2 = if edge_b1 == 0 { count_b - 1 } else { edge_b1 - 1 };
        let dot1 = axis.dot(local_b.normals[edge_b1]);
        let dot2 = axis.dot(local_b.normals[edge_b2]);
        edge_b = if dot1 < dot2 { edge_b1 } else { edge_b2 };
    }

    manifold = clip_polygons(poly_a, &local_b, edge_a, edge_b, flip);
    if manifold.point_count > 0 {
        manifold.normal = xf_a.q.rotate_vec(manifold.normal);
        for point in &mut manifold.points[..manifold.point_count] {
            point.local_anchor_b = xf_rel.inv_transform_point(point.local_anchor_a);
        }
    }

    manifold
}
