//! Spatial-record arena: positional data shared between drawables and culling.
//!
//! # Invariants
//! - Records are inserted and removed explicitly; nothing is collected behind
//!   the caller's back.
//! - Iteration order is deterministic (BTreeMap).
//! - The insertion sequence number is monotonic and never reused, so draw
//!   order derived from it is reproducible across frames.

pub mod arena;

pub use arena::{SceneArena, SpatialRecord};
