//! Engine tuning constants.
//!
//! These are the fixed tolerances and capacities the simulation core is built
//! around. Most behavior-level tuning (gravity, solver mode, contact
//! stiffness) lives on [`WorldDef`](crate::WorldDef) instead; the values here
//! are internals that rarely need to change and are documented for users who
//! want to understand the engine's length scales.

/// Maximum number of vertices a convex polygon shape may carry.
pub const MAX_POLYGON_VERTICES: usize = 8;

/// Minimum meaningful linear distance, in meters. Collision tolerances,
/// vertex welding, and collinearity pruning are all expressed as small
/// multiples of this slop.
pub const LINEAR_SLOP: f32 = 0.005;

/// Distance below which a (possibly speculative) contact is generated.
pub const SPECULATIVE_DISTANCE: f32 = 4.0 * LINEAR_SLOP;

/// Per-axis inflation applied to broad-phase proxy AABBs. Larger values trade
/// looser pairs for fewer tree updates when shapes move small amounts.
pub const AABB_FATTEN_FACTOR: f32 = 0.1;

/// Maximum iterations per GJK distance query. Warm-started queries typically
/// converge in one or two.
pub const GJK_ITERATIONS: usize = 32;

/// Initial node capacity of the dynamic AABB tree.
pub const TREE_START_CAPACITY: usize = 32;

/// Cap on the corrective velocity injected by position-error bias, in m/s.
pub const MAX_BAUMGARTE_VELOCITY: f32 = 4.0;

/// Damping ratio ζ used by the soft contact model.
pub const CONTACT_DAMPING_RATIO: f32 = 10.0;

/// Default contact stiffness ceiling in Hertz; each step uses
/// `min(contact_hertz, 1 / (3·dt))`.
pub const CONTACT_HERTZ: f32 = 30.0;

/// Low precision epsilon (GJK progress tolerance).
pub(crate) const LOW_EPSILON: f32 = 1.0e-6;

/// High precision epsilon (GJK degeneracy tolerance).
pub(crate) const HIGH_EPSILON: f32 = 1.0e-8;
