//! Physics collaborator, consumed as a body/fixture factory only.
//!
//! Given a shape descriptor and a placement, the factory hands back an
//! opaque [`BodyHandle`]. The engine core stores the handle and queries the
//! position; shape internals and simulation belong to the external physics
//! engine and never cross this boundary.

pub mod factory;

pub use factory::{
    BodyDesc, BodyHandle, BodyKind, CollisionFilter, PhysicsError, PhysicsWorld, ShapeDesc,
};
