//! Shapes API
//!
//! Convex polygon geometry, hull construction, mass properties, and the shape
//! definition used when attaching geometry to a body. Use `ShapeDef` together
//! with [`World::create_polygon_shape`](crate::World::create_polygon_shape).

use crate::aabb::Aabb;
use crate::core::math::Transform;
use crate::tuning::{LINEAR_SLOP, MAX_POLYGON_VERTICES};
use crate::types::{NULL_INDEX, Vec2};

/// Mass properties computed for a shape.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MassData {
    /// The mass of the shape, usually in kilograms.
    pub mass: f32,
    /// The centroid relative to the shape's origin.
    pub center: Vec2,
    /// The rotational inertia about the shape's local origin.
    pub inertia: f32,
}

/// A solid convex polygon with at most [`MAX_POLYGON_VERTICES`] vertices in
/// counter-clockwise order and one outward unit normal per edge.
///
/// Construction welds near-duplicate vertices, builds the convex hull, and
/// removes collinear triplets. Degenerate input (fewer than three unique
/// points, more than the maximum, or a collinear set) yields an *empty*
/// polygon rather than an error.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Polygon {
    pub(crate) vertices: [Vec2; MAX_POLYGON_VERTICES],
    pub(crate) normals: [Vec2; MAX_POLYGON_VERTICES],
    pub(crate) count: usize,
    pub(crate) radius: f32,
}

impl Default for Polygon {
    fn default() -> Self {
        Self {
            vertices: [Vec2::ZERO; MAX_POLYGON_VERTICES],
            normals: [Vec2::ZERO; MAX_POLYGON_VERTICES],
            count: 0,
            radius: 0.0,
        }
    }
}

struct Hull {
    points: [Vec2; MAX_POLYGON_VERTICES],
    count: usize,
}

impl Hull {
    fn empty() -> Self {
        Self {
            points: [Vec2::ZERO; MAX_POLYGON_VERTICES],
            count: 0,
        }
    }
}

/// Quickhull recursion: hull of the points strictly right of `p1 → p2`.
fn qh_recurse(p1: Vec2, p2: Vec2, ps: &[Vec2]) -> Hull {
    let mut hull = Hull::empty();
    if ps.is_empty() {
        return hull;
    }

    let e = (p2 - p1).normalized();

    // Discard points left of e, track the one farthest to the right.
    let mut right_points: [Vec2; MAX_POLYGON_VERTICES] = [Vec2::ZERO; MAX_POLYGON_VERTICES];
    let mut right_count = 0;
    let mut best_index = 0;
    let mut best_distance = (ps[0] - p1).cross(e);
    if best_distance > 0.0 {
        right_points[right_count] = ps[0];
        right_count += 1;
    }
    for (i, &p) in ps.iter().enumerate().skip(1) {
        let distance = (p - p1).cross(e);
        if distance > best_distance {
            best_index = i;
            best_distance = distance;
        }
        if distance > 0.0 {
            right_points[right_count] = p;
            right_count += 1;
        }
    }

    if best_distance < 2.0 * LINEAR_SLOP {
        return hull;
    }

    let best_point = ps[best_index];
    let hull1 = qh_recurse(p1, best_point, &right_points[..right_count]);
    let hull2 = qh_recurse(best_point, p2, &right_points[..right_count]);

    for i in 0..hull1.count {
        hull.points[hull.count] = hull1.points[i];
        hull.count += 1;
    }
    hull.points[hull.count] = best_point;
    hull.count += 1;
    for i in 0..hull2.count {
        hull.points[hull.count] = hull2.points[i];
        hull.count += 1;
    }

    debug_assert!(hull.count < MAX_POLYGON_VERTICES);
    hull
}

/// Quickhull with aggressive vertex welding and collinear pruning. Returns an
/// empty hull on degenerate input.
fn compute_hull(points: &[Vec2]) -> Hull {
    let mut hull = Hull::empty();
    let count = points.len();
    if count < 3 || count > MAX_POLYGON_VERTICES {
        return hull;
    }

    let mut aabb = Aabb::new(Vec2::new(f32::MAX, f32::MAX), Vec2::new(f32::MIN, f32::MIN));

    // Weld near-duplicate points; the first of each cluster survives.
    let mut ps: [Vec2; MAX_POLYGON_VERTICES] = [Vec2::ZERO; MAX_POLYGON_VERTICES];
    let mut n = 0;
    let tol_sqr = 16.0 * LINEAR_SLOP * LINEAR_SLOP;
    for &vi in points {
        aabb.lower = aabb.lower.min(vi);
        aabb.upper = aabb.upper.max(vi);

        let unique = ps[..n].iter().all(|&vj| vi.distance_squared(vj) >= tol_sqr);
        if unique {
            ps[n] = vi;
            n += 1;
        }
    }

    if n < 3 {
        // All points very close together; check the data and the scale.
        return hull;
    }

    // First hull vertex: the point farthest from the bounding-box center.
    let center = aabb.center();
    let mut f1 = 0;
    let mut dsq1 = center.distance_squared(ps[f1]);
    for i in 1..n {
        let dsq = center.distance_squared(ps[i]);
        if dsq > dsq1 {
            f1 = i;
            dsq1 = dsq;
        }
    }
    let p1 = ps[f1];
    ps[f1] = ps[n - 1];
    n -= 1;

    // Second: farthest from the first.
    let mut f2 = 0;
    let mut dsq2 = p1.distance_squared(ps[f2]);
    for i in 1..n {
        let dsq = p1.distance_squared(ps[i]);
        if dsq > dsq2 {
            f2 = i;
            dsq2 = dsq;
        }
    }
    let p2 = ps[f2];
    ps[f2] = ps[n - 1];
    n -= 1;

    // Partition the rest by side of the line p1-p2.
    let mut right_points: [Vec2; MAX_POLYGON_VERTICES] = [Vec2::ZERO; MAX_POLYGON_VERTICES];
    let mut right_count = 0;
    let mut left_points: [Vec2; MAX_POLYGON_VERTICES] = [Vec2::ZERO; MAX_POLYGON_VERTICES];
    let mut left_count = 0;

    let e = (p2 - p1).normalized();
    for &p in &ps[..n] {
        let d = (p - p1).cross(e);
        // Slop skips points that sit essentially on the line.
        if d >= 2.0 * LINEAR_SLOP {
            right_points[right_count] = p;
            right_count += 1;
        } else if d <= -2.0 * LINEAR_SLOP {
            left_points[left_count] = p;
            left_count += 1;
        }
    }

    let hull1 = qh_recurse(p1, p2, &right_points[..right_count]);
    let hull2 = qh_recurse(p2, p1, &left_points[..left_count]);

    if hull1.count == 0 && hull2.count == 0 {
        // All points collinear.
        return hull;
    }

    // Stitch: p1, right hull, p2, left hull, in CCW winding.
    hull.points[hull.count] = p1;
    hull.count += 1;
    for i in 0..hull1.count {
        hull.points[hull.count] = hull1.points[i];
        hull.count += 1;
    }
    hull.points[hull.count] = p2;
    hull.count += 1;
    for i in 0..hull2.count {
        hull.points[hull.count] = hull2.points[i];
        hull.count += 1;
    }
    debug_assert!(hull.count <= MAX_POLYGON_VERTICES);

    // Merge collinear triplets.
    let mut searching = true;
    while searching && hull.count > 2 {
        searching = false;
        for i in 0..hull.count {
            let i1 = i;
            let i2 = (i + 1) % hull.count;
            let i3 = (i + 2) % hull.count;

            let s1 = hull.points[i1];
            let s2 = hull.points[i2];
            let s3 = hull.points[i3];

            let r = (s3 - s1).normalized();
            let distance = (s2 - s1).cross(r);
            if distance <= 2.0 * LINEAR_SLOP {
                for j in i2..hull.count - 1 {
                    hull.points[j] = hull.points[j + 1];
                }
                hull.count -= 1;
                searching = true;
                break;
            }
        }
    }

    if hull.count < 3 {
        hull.count = 0;
    }

    hull
}

impl Polygon {
    /// Build a polygon from an ordered or unordered point cloud. Runs hull
    /// construction and normal computation; returns an empty polygon when the
    /// input is degenerate.
    pub fn from_points(points: &[Vec2]) -> Self {
        let hull = compute_hull(points);
        let mut polygon = Self::default();
        if hull.count == 0 {
            return polygon;
        }

        polygon.count = hull.count;
        polygon.vertices[..hull.count].copy_from_slice(&hull.points[..hull.count]);
        for i in 0..polygon.count {
            let j = (i + 1) % polygon.count;
            let edge = polygon.vertices[j] - polygon.vertices[i];
            debug_assert!(edge.length_squared() > f32::EPSILON * f32::EPSILON);
            polygon.normals[i] = edge.right_perp().normalized();
        }
        polygon
    }

    /// Same as [`Polygon::from_points`] with a skin radius for rounded
    /// polygons.
    pub fn from_points_with_radius(points: &[Vec2], radius: f32) -> Self {
        debug_assert!(radius >= 0.0);
        let mut polygon = Self::from_points(points);
        if !polygon.is_empty() {
            polygon.radius = radius;
        }
        polygon
    }

    /// True when hull construction failed or the polygon was never set.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices[..self.count]
    }

    pub fn normals(&self) -> &[Vec2] {
        &self.normals[..self.count]
    }

    pub fn vertex(&self, index: usize) -> Vec2 {
        self.vertices[index]
    }

    pub fn normal(&self, index: usize) -> Vec2 {
        self.normals[index]
    }

    /// Skin radius for rounded polygons.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Tight world-space AABB of the transformed vertices.
    pub fn compute_aabb(&self, xf: Transform) -> Aabb {
        debug_assert!(self.count > 0);
        let first = xf.transform_point(self.vertices[0]);
        let mut aabb = Aabb::new(first, first);
        for &v in &self.vertices[1..self.count] {
            let p = xf.transform_point(v);
            aabb.lower = aabb.lower.min(p);
            aabb.upper = aabb.upper.max(p);
        }
        let r = Vec2::new(self.radius, self.radius);
        aabb.lower -= r;
        aabb.upper += r;
        aabb
    }

    /// Mass, centroid, and rotational inertia from signed triangle
    /// contributions of a fan rooted at vertex 0. The returned inertia is
    /// about the local origin; shift it with the parallel-axis theorem to get
    /// the value about the center of mass.
    pub fn compute_mass(&self, density: f32) -> MassData {
        debug_assert!(self.count > 0);

        let mut vertices = [Vec2::ZERO; MAX_POLYGON_VERTICES];
        if self.radius > 0.0 {
            // Push vertices out along the corner bisector; improves mass
            // accuracy for rounded polygons, especially the inertia.
            for i in 0..self.count {
                let j = if i == 0 { self.count - 1 } else { i - 1 };
                let n1 = self.normals[j];
                let n2 = self.normals[i];
                let mid = (n1 + n2).normalized();
                let t1 = n1.perp();
                let sin_half_angle = mid.cross(t1);
                let offset = if sin_half_angle > f32::EPSILON {
                    self.radius / sin_half_angle
                } else {
                    self.radius
                };
                vertices[i] = self.vertices[i] + offset * mid;
            }
        } else {
            vertices[..self.count].copy_from_slice(&self.vertices[..self.count]);
        }

        let mut center = Vec2::ZERO;
        let mut area = 0.0_f32;
        let mut inertia = 0.0_f32;

        // Reference point for the fan; vertex 0 keeps round-off small.
        let r = vertices[0];
        let inv3 = 1.0 / 3.0;

        for i in 1..self.count - 1 {
            let e1 = vertices[i] - r;
            let e2 = vertices[i + 1] - r;
            let d = e1.cross(e2);

            let triangle_area = 0.5 * d;
            area += triangle_area;

            // Area-weighted centroid with r at the origin.
            center += triangle_area * inv3 * (e1 + e2);

            let intx2 = e1.x * e1.x + e2.x * e1.x + e2.x * e2.x;
            let inty2 = e1.y * e1.y + e2.y * e1.y + e2.y * e2.y;
            inertia += (0.25 * inv3 * d) * (intx2 + inty2);
        }

        debug_assert!(area > f32::EPSILON);
        let inv_area = 1.0 / area;
        center *= inv_area;

        let mut mass_data = MassData {
            mass: density * area,
            center: r + center,
            inertia: density * inertia,
        };

        // Shift to the center of mass, then back to the body origin.
        mass_data.inertia +=
            mass_data.mass * (mass_data.center.dot(mass_data.center) - center.dot(center));
        mass_data
    }
}

/// Axis-aligned box with the given half extents, centered at the origin.
pub fn box_polygon(half_width: f32, half_height: f32) -> Polygon {
    let mut polygon = Polygon::default();
    polygon.count = 4;
    polygon.vertices[0] = Vec2::new(-half_width, -half_height);
    polygon.vertices[1] = Vec2::new(half_width, -half_height);
    polygon.vertices[2] = Vec2::new(half_width, half_height);
    polygon.vertices[3] = Vec2::new(-half_width, half_height);
    polygon.normals[0] = Vec2::new(0.0, -1.0);
    polygon.normals[1] = Vec2::new(1.0, 0.0);
    polygon.normals[2] = Vec2::new(0.0, 1.0);
    polygon.normals[3] = Vec2::new(-1.0, 0.0);
    polygon
}

/// Square with half extent `h`.
pub fn square_polygon(h: f32) -> Polygon {
    box_polygon(h, h)
}

/// Box translated by `center` and rotated by `angle_radians`.
pub fn offset_box_polygon(
    half_width: f32,
    half_height: f32,
    center: Vec2,
    angle_radians: f32,
) -> Polygon {
    let xf = Transform::from_pos_angle(center, angle_radians);
    let mut polygon = Polygon::default();
    polygon.count = 4;
    polygon.vertices[0] = xf.transform_point(Vec2::new(-half_width, -half_height));
    polygon.vertices[1] = xf.transform_point(Vec2::new(half_width, -half_height));
    polygon.vertices[2] = xf.transform_point(Vec2::new(half_width, half_height));
    polygon.vertices[3] = xf.transform_point(Vec2::new(-half_width, half_height));
    polygon.normals[0] = xf.q.rotate_vec(Vec2::new(0.0, -1.0));
    polygon.normals[1] = xf.q.rotate_vec(Vec2::new(1.0, 0.0));
    polygon.normals[2] = xf.q.rotate_vec(Vec2::new(0.0, 1.0));
    polygon.normals[3] = xf.q.rotate_vec(Vec2::new(-1.0, 0.0));
    polygon
}

/// Regular polygon with `count` vertices on the unit circle.
pub fn regular_polygon(count: usize) -> Polygon {
    debug_assert!((3..=MAX_POLYGON_VERTICES).contains(&count));
    let mut points = [Vec2::ZERO; MAX_POLYGON_VERTICES];
    let angle_step = core::f32::consts::TAU / count as f32;
    for (i, p) in points[..count].iter_mut().enumerate() {
        let angle = i as f32 * angle_step;
        *p = Vec2::new(angle.cos(), angle.sin());
    }
    Polygon::from_points(&points[..count])
}

/// Build a polygon from any iterator of point-like values. Returns `None`
/// when the input is empty or hull construction fails.
pub fn polygon_from_points<I, P>(points: I) -> Option<Polygon>
where
    I: IntoIterator<Item = P>,
    P: Into<Vec2>,
{
    let pts: Vec<Vec2> = points.into_iter().map(Into::into).collect();
    if pts.is_empty() {
        return None;
    }
    let polygon = Polygon::from_points(&pts);
    if polygon.is_empty() { None } else { Some(polygon) }
}

/// Shape definition with builder pattern.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct ShapeDef {
    /// Coulomb friction coefficient, usually in `[0, 1]`.
    pub friction: f32,
    /// Restitution (bounce), usually in `[0, 1]`.
    pub restitution: f32,
    /// Density in kg/m². Zero-density shapes do not contribute mass.
    pub density: f32,
}

impl Default for ShapeDef {
    fn default() -> Self {
        Self {
            friction: 0.5,
            restitution: 0.0,
            density: 1.0,
        }
    }
}

impl ShapeDef {
    pub fn builder() -> ShapeDefBuilder {
        ShapeDefBuilder {
            def: Self::default(),
        }
    }
}

/// Fluent builder for `ShapeDef`.
#[derive(Clone, Debug, Default)]
pub struct ShapeDefBuilder {
    def: ShapeDef,
}

impl ShapeDefBuilder {
    /// Friction coefficient; contacts mix it as `sqrt(fA · fB)`.
    pub fn friction(mut self, v: f32) -> Self {
        self.def.friction = v;
        self
    }
    /// Restitution; contacts mix it as `max(eA, eB)`.
    pub fn restitution(mut self, v: f32) -> Self {
        self.def.restitution = v;
        self
    }
    /// Density in kg/m². Affects mass.
    pub fn density(mut self, v: f32) -> Self {
        self.def.density = v;
        self
    }

    #[must_use]
    pub fn build(self) -> ShapeDef {
        self.def
    }
}

/// Internal shape record stored in the world's shape pool.
#[derive(Clone, Debug)]
pub(crate) struct Shape {
    pub body: i32,
    /// Next shape in the owning body's singly linked list.
    pub next_shape: i32,
    /// Broad-phase proxy id.
    pub proxy_id: i32,
    pub polygon: Polygon,
    pub friction: f32,
    pub restitution: f32,
    pub density: f32,
    /// World-space tight AABB, refreshed at the start of every step.
    pub aabb: Aabb,
}

impl Default for Shape {
    fn default() -> Self {
        Self {
            body: NULL_INDEX,
            next_shape: NULL_INDEX,
            proxy_id: NULL_INDEX,
            polygon: Polygon::default(),
            friction: 0.5,
            restitution: 0.0,
            density: 1.0,
            aabb: Aabb::default(),
        }
    }
}
