//! Shared types and utilities for the glint engine.

pub mod types;

pub use types::{Color, EntityId, Rect, TexRegion};
