//! 2D orthographic camera.
//!
//! The camera owns its position, viewport size, and zoom. Every frame the
//! compositor recomputes the view-projection and derives the world-space
//! viewport rectangle from it, so culling and drawing always agree on what
//! is on screen.

use glam::{Mat4, Vec2, Vec3};
use glint_common::Rect;

#[derive(Debug, Clone)]
pub struct Camera2D {
    position: Vec2,
    viewport_width: f32,
    viewport_height: f32,
    zoom: f32,
}

impl Camera2D {
    /// Camera looking at the origin with the given viewport size in
    /// world units.
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        assert!(
            viewport_width > 0.0 && viewport_height > 0.0,
            "viewport dimensions must be positive"
        );
        Self {
            position: Vec2::ZERO,
            viewport_width,
            viewport_height,
            zoom: 1.0,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Zoom factor above 1.0 widens the visible area.
    pub fn set_zoom(&mut self, zoom: f32) {
        assert!(zoom > 0.0, "zoom must be positive");
        self.zoom = zoom;
    }

    pub fn resize(&mut self, viewport_width: f32, viewport_height: f32) {
        assert!(
            viewport_width > 0.0 && viewport_height > 0.0,
            "viewport dimensions must be positive"
        );
        self.viewport_width = viewport_width;
        self.viewport_height = viewport_height;
    }

    /// World-space rectangle currently visible through this camera.
    pub fn view_rect(&self) -> Rect {
        Rect::centered(
            self.position,
            self.viewport_width * self.zoom,
            self.viewport_height * self.zoom,
        )
    }

    /// Combined view-projection matrix for the backend.
    pub fn view_projection(&self) -> Mat4 {
        let half_w = self.viewport_width * self.zoom / 2.0;
        let half_h = self.viewport_height * self.zoom / 2.0;
        let proj = Mat4::orthographic_rh(-half_w, half_w, -half_h, half_h, -1.0, 1.0);
        let view = Mat4::from_translation(Vec3::new(-self.position.x, -self.position.y, 0.0));
        proj * view
    }
}
