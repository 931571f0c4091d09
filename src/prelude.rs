//! Common imports for typical simulations.

pub use crate::aabb::Aabb;
pub use crate::body::{BodyBuilder, BodyDef, BodyType};
pub use crate::core::math::{Rot, Transform};
pub use crate::fracture::FractureMaterial;
pub use crate::query::RayResult;
pub use crate::shapes::{self, Polygon, ShapeDef, ShapeDefBuilder};
pub use crate::solver::SolverMode;
pub use crate::types::{BodyId, ContactId, ShapeId, Vec2};
pub use crate::world::{World, WorldBuilder, WorldDef};
