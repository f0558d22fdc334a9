//! Scene compositing: layers, culling, blend-aware batching, sprites.
//!
//! # Invariants
//! - The compositor never talks to a concrete graphics API; everything
//!   goes through [`RenderBackend`].
//! - World placement lives in the scene arena, not in drawables. A
//!   drawable sees its bounds only for the duration of one draw call.
//! - One backend session per frame, layers in ascending index order.

pub mod backend;
pub mod camera;
pub mod compositor;
pub mod object;
pub mod sprite;

pub use backend::{
    RecordedOp, RecordingBackend, RenderBackend, RenderError, ShapePainter, SpriteBatch,
    SpriteDraw,
};
pub use camera::Camera2D;
pub use compositor::{Compositor, CompositorError, FrameReport, FrameSummary, SceneEntry};
pub use object::{
    Background, Drawable, ObjectDesc, ObjectId, ObjectKind, PolygonShape, RectShape, ShapeObject,
};
pub use sprite::{AnimatedSprite, SizePolicy, Sprite};

pub fn crate_info() -> &'static str {
    "glint-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
