//! GJK distance engine.
//!
//! Computes the closest points and separation between two convex polygons
//! using the signed-volume distance sub-algorithm (S1D/S2D) over simplices of
//! the Minkowski difference. The simplex vertex indices are cached on the
//! owning contact so the next query warm-starts, typically converging in one
//! or two iterations.

use crate::core::math::Transform;
use crate::shapes::Polygon;
use crate::tuning::{GJK_ITERATIONS, HIGH_EPSILON, LOW_EPSILON};
use crate::types::Vec2;

/// A view of one convex shape for distance queries.
#[derive(Copy, Clone, Debug)]
pub struct DistanceProxy<'a> {
    vertices: &'a [Vec2],
    radius: f32,
}

impl<'a> DistanceProxy<'a> {
    pub fn new(vertices: &'a [Vec2], radius: f32) -> Self {
        debug_assert!(!vertices.is_empty());
        Self { vertices, radius }
    }

    pub fn from_polygon(polygon: &'a Polygon) -> Self {
        Self::new(polygon.vertices(), polygon.radius())
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn count(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertex(&self, index: usize) -> Vec2 {
        self.vertices[index]
    }

    /// Index of the support vertex maximizing `dot(v, d)`.
    pub fn support(&self, d: Vec2) -> usize {
        let mut best_index = 0;
        let mut best_value = self.vertices[0].dot(d);
        for (i, &v) in self.vertices.iter().enumerate().skip(1) {
            let value = v.dot(d);
            if value > best_value {
                best_index = i;
                best_value = value;
            }
        }
        best_index
    }
}

/// Cached simplex from a previous query, used to warm-start the next one.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SimplexCache {
    pub count: u8,
    pub index_a: [u8; 3],
    pub index_b: [u8; 3],
}

/// Input for a distance query.
#[derive(Copy, Clone, Debug)]
pub struct DistanceInput<'a> {
    pub proxy_a: DistanceProxy<'a>,
    pub proxy_b: DistanceProxy<'a>,
    pub transform_a: Transform,
    pub transform_b: Transform,
}

/// Output of a distance query. A distance of zero with coincident witness
/// points means the shapes overlap and the normal is arbitrary.
#[derive(Copy, Clone, Debug, Default)]
pub struct DistanceOutput {
    /// Closest point on shape A, in world space.
    pub point_a: Vec2,
    /// Closest point on shape B, in world space.
    pub point_b: Vec2,
    pub distance: f32,
    pub iterations: usize,
}

/// One vertex of the Minkowski-difference simplex with its witnesses.
#[derive(Copy, Clone, Debug, Default)]
struct SimplexVertex {
    /// Support point on A (world).
    wa: Vec2,
    /// Support point on B (world).
    wb: Vec2,
    /// `wa - wb`.
    w: Vec2,
    /// Barycentric weight assigned by the sub-algorithm.
    lambda: f32,
    index_a: usize,
    index_b: usize,
}

#[derive(Copy, Clone, Debug, Default)]
struct Simplex {
    v: [SimplexVertex; 3],
    count: usize,
}

impl Simplex {
    fn read_cache(cache: &SimplexCache, input: &DistanceInput<'_>) -> Self {
        let mut simplex = Self::default();
        for i in 0..cache.count as usize {
            let ia = cache.index_a[i] as usize;
            let ib = cache.index_b[i] as usize;
            if ia >= input.proxy_a.count() || ib >= input.proxy_b.count() {
                // Stale cache (geometry changed); fall back to a cold start.
                return Self::default();
            }
            simplex.v[i] = make_vertex(input, ia, ib);
            simplex.count += 1;
        }
        simplex
    }

    fn write_cache(&self, cache: &mut SimplexCache) {
        cache.count = self.count as u8;
        for i in 0..self.count {
            cache.index_a[i] = self.v[i].index_a as u8;
            cache.index_b[i] = self.v[i].index_b as u8;
        }
    }

    fn contains(&self, index_a: usize, index_b: usize) -> bool {
        self.v[..self.count]
            .iter()
            .any(|v| v.index_a == index_a && v.index_b == index_b)
    }

    fn push_front(&mut self, vertex: SimplexVertex) {
        self.v = [vertex, self.v[0], self.v[1]];
        self.count = (self.count + 1).min(3);
    }

    /// Closest point to the origin given the current weights.
    fn weighted_point(&self) -> Vec2 {
        let mut p = Vec2::ZERO;
        for v in &self.v[..self.count] {
            p += v.lambda * v.w;
        }
        p
    }

    fn witness_points(&self) -> (Vec2, Vec2) {
        let mut pa = Vec2::ZERO;
        let mut pb = Vec2::ZERO;
        for v in &self.v[..self.count] {
            pa += v.lambda * v.wa;
            pb += v.lambda * v.wb;
        }
        (pa, pb)
    }
}

fn make_vertex(input: &DistanceInput<'_>, index_a: usize, index_b: usize) -> SimplexVertex {
    let wa = input.transform_a.transform_point(input.proxy_a.vertex(index_a));
    let wb = input.transform_b.transform_point(input.proxy_b.vertex(index_b));
    SimplexVertex {
        wa,
        wb,
        w: wa - wb,
        lambda: 1.0,
        index_a,
        index_b,
    }
}

/// Support vertex of the Minkowski difference A ⊖ B in direction `d`.
fn support_vertex(input: &DistanceInput<'_>, d: Vec2) -> SimplexVertex {
    let local_a = input.transform_a.q.inv_rotate_vec(d);
    let local_b = input.transform_b.q.inv_rotate_vec(-d);
    let index_a = input.proxy_a.support(local_a);
    let index_b = input.proxy_b.support(local_b);
    make_vertex(input, index_a, index_b)
}

#[inline]
fn same_sign(a: f32, b: f32) -> bool {
    (a > 0.0 && b > 0.0) || (a < 0.0 && b < 0.0)
}

/// Segment case: project the origin onto the line s1-s2 and compute
/// barycentric coordinates on the axis with the larger spread. Reduces to the
/// vertex closer to the origin when the projection leaves the segment.
fn solve_segment(simplex: &mut Simplex) {
    let s1 = simplex.v[0].w;
    let s2 = simplex.v[1].w;
    let t = s2 - s1;

    // Orthogonal projection of the origin onto the infinite line s1-s2.
    let p0 = s1 + (-s1.dot(t) / t.dot(t)) * t;

    // Pick the coordinate axis with the maximum spread between endpoints.
    let mut mu_max = s1.x - s2.x;
    let mut axis = 0;
    if (s1.y - s2.y).abs() > mu_max.abs() {
        mu_max = s1.y - s2.y;
        axis = 1;
    }

    let c0 = -(s2.axis(axis) - p0.axis(axis));
    let c1 = s1.axis(axis) - p0.axis(axis);

    if same_sign(c0, mu_max) && same_sign(c1, mu_max) {
        simplex.v[0].lambda = c0 / mu_max;
        simplex.v[1].lambda = c1 / mu_max;
    } else {
        // Keep only the endpoint nearer the origin.
        let keep = if s1.length_squared() <= s2.length_squared() {
            simplex.v[0]
        } else {
            simplex.v[1]
        };
        simplex.v[0] = keep;
        simplex.v[0].lambda = 1.0;
        simplex.count = 1;
    }
}

/// Triangle case: signed-area barycentrics; when the origin falls outside,
/// test each candidate edge with the segment solver and keep the sub-simplex
/// whose weighted point is nearest the origin.
fn solve_triangle(simplex: &mut Simplex) {
    let s1 = simplex.v[0].w;
    let s2 = simplex.v[1].w;
    let s3 = simplex.v[2].w;

    // Signed area of the triangle (times two).
    let mu_max = s1.x * (s2.y - s3.y) + s2.x * (s3.y - s1.y) + s3.x * (s1.y - s2.y);

    // Sub-areas of the triangles formed with the origin.
    let c1 = s2.cross(s3);
    let c2 = s3.cross(s1);
    let c3 = s1.cross(s2);

    let cmp1 = same_sign(mu_max, c1);
    let cmp2 = same_sign(mu_max, c2);
    let cmp3 = same_sign(mu_max, c3);

    if cmp1 && cmp2 && cmp3 {
        // Origin is inside the triangle.
        simplex.v[0].lambda = c1 / mu_max;
        simplex.v[1].lambda = c2 / mu_max;
        simplex.v[2].lambda = c3 / mu_max;
        return;
    }

    let mut best_distance = f32::MAX;
    let mut best = *simplex;

    // Drop each vertex whose sub-area disagrees with the total.
    let candidates: [(bool, usize, usize); 3] =
        [(cmp2, 0, 2), (cmp3, 0, 1), (cmp1, 1, 2)];
    for &(keep_full, i, j) in &candidates {
        if keep_full {
            continue;
        }
        let mut reduced = Simplex {
            v: [simplex.v[i], simplex.v[j], SimplexVertex::default()],
            count: 2,
        };
        solve_segment(&mut reduced);
        let distance = reduced.weighted_point().length_squared();
        if distance < best_distance {
            best_distance = distance;
            best = reduced;
        }
    }

    *simplex = best;
}

fn solve_simplex(simplex: &mut Simplex) {
    match simplex.count {
        1 => simplex.v[0].lambda = 1.0,
        2 => solve_segment(simplex),
        3 => solve_triangle(simplex),
        _ => unreachable!("empty simplex"),
    }
}

/// Closest points and separation between two convex shapes.
///
/// Terminates when the support step stops making progress: a duplicate
/// support vertex, a forward-progress bound below tolerance, a full triangle
/// simplex (overlap), or a closest point within tolerance of the origin.
pub fn shape_distance(input: &DistanceInput<'_>, cache: &mut SimplexCache) -> DistanceOutput {
    let mut simplex = Simplex::read_cache(cache, input);
    if simplex.count == 0 {
        let mut d = input.transform_a.p - input.transform_b.p;
        if d.length_squared() < HIGH_EPSILON {
            d = Vec2::X;
        }
        simplex.v[0] = support_vertex(input, -d);
        simplex.count = 1;
    }

    let mut output = DistanceOutput::default();
    let mut dir = Vec2::ZERO;

    for iteration in 0..GJK_ITERATIONS {
        solve_simplex(&mut simplex);

        dir = simplex.weighted_point();
        let (pa, pb) = simplex.witness_points();
        output.point_a = pa;
        output.point_b = pb;
        output.iterations = iteration + 1;

        if simplex.count == 3 {
            // The simplex encloses the origin; the shapes overlap.
            break;
        }

        let mut max_norm = 1.0_f32;
        for v in &simplex.v[..simplex.count] {
            max_norm = max_norm.max(v.w.length_squared());
        }
        if dir.length_squared() < HIGH_EPSILON * max_norm {
            break;
        }

        let vertex = support_vertex(input, -dir);
        if simplex.contains(vertex.index_a, vertex.index_b) {
            break;
        }

        let dir_sqr = dir.length_squared();
        if dir_sqr - dir.dot(vertex.w) <= dir_sqr * LOW_EPSILON * LOW_EPSILON {
            break;
        }

        simplex.push_front(vertex);
    }

    output.distance = dir.length();
    simplex.write_cache(cache);
    output
}
