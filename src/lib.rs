//! shardd: a pure-Rust 2D rigid body physics engine for convex polygons,
//! with a fracture extension hook.
//!
//! Highlights
//! - Broad-phase: dynamic AABB tree with fat proxies and a move-buffer pair
//!   manager.
//! - Narrow-phase: warm-started GJK distance plus SAT/clipping manifolds with
//!   stable feature ids.
//! - Persistent contact graph with per-body edge lists and impulse carry-over.
//! - PGS solver with warm starting and soft-contact bias (Baumgarte mode
//!   available), semi-implicit integration.
//! - Fracture hook: tag bodies with a material, bind a pattern, and let a
//!   post-step sweep replace over-stressed bodies with fragments.
//! - Ergonomics: builder patterns, id-style world API, mint integration.
//!
//! Quickstart
//! ```
//! use shardd::{World, WorldDef, BodyBuilder, BodyType, ShapeDef, shapes, Vec2};
//! let mut world = World::new(WorldDef::builder().gravity(Vec2::new(0.0, -9.81)).build());
//!
//! // Ground
//! let ground = world.create_body(BodyBuilder::new().position([0.0, 0.0]).build());
//! world
//!     .create_polygon_shape(
//!         ground,
//!         &ShapeDef::builder().density(0.0).build(),
//!         &shapes::box_polygon(10.0, 0.25),
//!     )
//!     .unwrap();
//!
//! // Dynamic box at y=2
//! let body = world.create_body(
//!     BodyBuilder::new()
//!         .body_type(BodyType::Dynamic)
//!         .position([0.0, 2.0])
//!         .build(),
//! );
//! let sdef = ShapeDef::builder().density(1.0).friction(0.3).build();
//! world
//!     .create_polygon_shape(body, &sdef, &shapes::square_polygon(0.5))
//!     .unwrap();
//!
//! for _ in 0..60 {
//!     world.step(1.0 / 60.0, 8, 3, true);
//! }
//! let _pos = world.body_position(body);
//! ```
//!
//! Queries (AABB + ray cast)
//! ```
//! use shardd::{World, WorldDef, BodyBuilder, ShapeDef, shapes, Aabb, Vec2};
//! let mut world = World::new(WorldDef::default());
//! let b = world.create_body(BodyBuilder::new().position([0.0, 2.0]).build());
//! world
//!     .create_polygon_shape(b, &ShapeDef::default(), &shapes::square_polygon(0.5))
//!     .unwrap();
//! world.step(1.0 / 60.0, 4, 2, true);
//! let hits = world.overlap_aabb(Aabb::from_center_half_extents([0.0, 2.0], [1.0, 1.0]));
//! assert!(!hits.is_empty());
//! let hit = world.cast_ray_closest(Vec2::new(0.0, 5.0), Vec2::new(0.0, -10.0));
//! assert!(hit.is_some());
//! ```
//!
//! Feature Flags
//! - `serde` (alias `serialize`): serialization for value/config types.
//! - `cgmath` / `nalgebra` / `glam`: conversions with their 2D math types.
//!
//! Modules
//! - `world`, `body`, `shapes`, `query`, `fracture`, plus the collision
//!   internals (`aabb`, `distance`, `manifold`, `tuning`). Import
//!   `shardd::prelude::*` for the most common types.

pub mod aabb;
pub mod body;
pub mod broadphase;
mod contact;
pub mod distance;
pub mod fracture;
pub mod manifold;
mod pool;
pub mod prelude;
pub mod query;
pub mod shapes;
pub mod solver;
pub mod tree;
pub mod tuning;
pub mod types;
pub mod world;
pub mod core {
    pub mod math;
}

pub use aabb::{Aabb, AabbRayHit};
pub use body::{BodyBuilder, BodyDef, BodyType};
pub use broadphase::BroadPhase;
pub use tree::DynamicTree;
pub use core::math::{Rot, Transform};
pub use distance::{DistanceInput, DistanceOutput, DistanceProxy, SimplexCache, shape_distance};
pub use fracture::{FractureImpact, FractureMaterial, FracturePattern};
pub use manifold::{Manifold, ManifoldPoint, collide_polygons};
pub use query::RayResult;
pub use shapes::{MassData, Polygon, ShapeDef, ShapeDefBuilder};
pub use solver::SolverMode;
pub use types::{BodyId, ContactId, FracturableId, PatternId, ShapeId, Vec2};
pub use world::{Counters, Error, World, WorldBuilder, WorldDef};
