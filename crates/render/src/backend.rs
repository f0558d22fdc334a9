//! Backend contract for the compositor.
//!
//! A backend owns the drawing surface. The compositor drives it through a
//! fixed per-frame sequence: `clear`, `set_projection`, `begin`, zero or
//! more draws interleaved with `set_blending`, then `end`.
//!
//! # Invariants
//! - Draw calls are only legal between `begin` and `end`.
//! - `set_blending` is only called when the blend state actually changes;
//!   backends may treat every call as a batch break.

use glam::{Mat4, Vec2};
use glint_assets::TextureHandle;
use glint_common::{Color, Rect, TexRegion};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("no suitable graphics adapter found")]
    NoAdapter,
    #[error("graphics device request failed: {0}")]
    DeviceRequest(String),
    #[error("draw submitted outside an active session")]
    SessionNotActive,
    #[error("session already active")]
    SessionActive,
    #[error("backend already disposed")]
    Disposed,
    #[error("unknown texture handle {0:?}")]
    UnknownTexture(TextureHandle),
    #[error("target readback failed: {0}")]
    Readback(String),
}

/// One batched textured-quad draw.
///
/// `origin` is the rotation pivot, relative to the quad's lower-left
/// corner. `rotation` is in radians, counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteDraw {
    pub texture: TextureHandle,
    pub region: TexRegion,
    pub dst: Rect,
    pub origin: Vec2,
    pub rotation: f32,
    pub tint: Color,
}

impl SpriteDraw {
    pub fn new(texture: TextureHandle, region: TexRegion, dst: Rect) -> Self {
        Self {
            texture,
            region,
            dst,
            origin: Vec2::new(dst.width / 2.0, dst.height / 2.0),
            rotation: 0.0,
            tint: Color::WHITE,
        }
    }
}

/// Sink for batched sprite draws.
pub trait SpriteBatch {
    fn draw(&mut self, cmd: &SpriteDraw) -> Result<(), RenderError>;
}

/// Immediate-mode sink for filled vector shapes. Shape draws bypass the
/// sprite batch entirely.
pub trait ShapePainter {
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), RenderError>;
    fn fill_polygon(&mut self, points: &[Vec2], color: Color) -> Result<(), RenderError>;
}

/// A complete rendering backend.
///
/// The `as_*` accessors exist so callers holding a `&mut dyn RenderBackend`
/// can hand out the narrower trait objects.
pub trait RenderBackend: SpriteBatch + ShapePainter {
    /// Fill the whole target with `color`. Legal outside a session.
    fn clear(&mut self, color: Color);

    /// Install the view-projection used by subsequent draws.
    fn set_projection(&mut self, view_proj: Mat4);

    /// Open the frame's single draw session.
    fn begin(&mut self) -> Result<(), RenderError>;

    /// Switch alpha blending for subsequent sprite draws.
    fn set_blending(&mut self, enabled: bool);

    /// Flush and close the session.
    fn end(&mut self) -> Result<(), RenderError>;

    /// Release backend resources. Further use is an error.
    fn dispose(&mut self);

    fn as_sprite_batch(&mut self) -> &mut dyn SpriteBatch;
    fn as_shape_painter(&mut self) -> &mut dyn ShapePainter;
}

/// Everything a backend was asked to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedOp {
    Clear(Color),
    SetProjection,
    Begin,
    SetBlending(bool),
    Sprite(SpriteDraw),
    FillRect { rect: Rect, color: Color },
    FillPolygon { points: Vec<Vec2>, color: Color },
    End,
    Dispose,
}

/// Headless backend that records the call sequence instead of drawing.
///
/// Enforces the session discipline, so tests catch draws issued outside
/// `begin`/`end` or after disposal.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    ops: Vec<RecordedOp>,
    active: bool,
    disposed: bool,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[RecordedOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<RecordedOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn blend_switches(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, RecordedOp::SetBlending(_)))
            .count()
    }

    pub fn sprite_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, RecordedOp::Sprite(_)))
            .count()
    }

    fn check_active(&self) -> Result<(), RenderError> {
        if self.disposed {
            return Err(RenderError::Disposed);
        }
        if !self.active {
            return Err(RenderError::SessionNotActive);
        }
        Ok(())
    }
}

impl SpriteBatch for RecordingBackend {
    fn draw(&mut self, cmd: &SpriteDraw) -> Result<(), RenderError> {
        self.check_active()?;
        self.ops.push(RecordedOp::Sprite(*cmd));
        Ok(())
    }
}

impl ShapePainter for RecordingBackend {
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), RenderError> {
        self.check_active()?;
        self.ops.push(RecordedOp::FillRect { rect, color });
        Ok(())
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) -> Result<(), RenderError> {
        self.check_active()?;
        self.ops.push(RecordedOp::FillPolygon {
            points: points.to_vec(),
            color,
        });
        Ok(())
    }
}

impl RenderBackend for RecordingBackend {
    fn clear(&mut self, color: Color) {
        self.ops.push(RecordedOp::Clear(color));
    }

    fn set_projection(&mut self, _view_proj: Mat4) {
        self.ops.push(RecordedOp::SetProjection);
    }

    fn begin(&mut self) -> Result<(), RenderError> {
        if self.disposed {
            return Err(RenderError::Disposed);
        }
        if self.active {
            return Err(RenderError::SessionActive);
        }
        self.active = true;
        self.ops.push(RecordedOp::Begin);
        Ok(())
    }

    fn set_blending(&mut self, enabled: bool) {
        self.ops.push(RecordedOp::SetBlending(enabled));
    }

    fn end(&mut self) -> Result<(), RenderError> {
        self.check_active()?;
        self.active = false;
        self.ops.push(RecordedOp::End);
        Ok(())
    }

    fn dispose(&mut self) {
        self.disposed = true;
        self.ops.push(RecordedOp::Dispose);
    }

    fn as_sprite_batch(&mut self) -> &mut dyn SpriteBatch {
        self
    }

    fn as_shape_painter(&mut self) -> &mut dyn ShapePainter {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_outside_session_is_rejected() {
        let mut backend = RecordingBackend::new();
        let cmd = SpriteDraw::new(
            TextureHandle(1),
            TexRegion::full(8, 8),
            Rect::new(0.0, 0.0, 8.0, 8.0),
        );
        assert!(matches!(
            backend.draw(&cmd),
            Err(RenderError::SessionNotActive)
        ));
    }

    #[test]
    fn nested_begin_is_rejected() {
        let mut backend = RecordingBackend::new();
        backend.begin().unwrap();
        assert!(matches!(backend.begin(), Err(RenderError::SessionActive)));
    }

    #[test]
    fn disposed_backend_rejects_everything() {
        let mut backend = RecordingBackend::new();
        backend.dispose();
        assert!(matches!(backend.begin(), Err(RenderError::Disposed)));
    }

    #[test]
    fn records_ops_in_order() {
        let mut backend = RecordingBackend::new();
        backend.clear(Color::BLACK);
        backend.begin().unwrap();
        backend.set_blending(true);
        backend
            .fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::RED)
            .unwrap();
        backend.end().unwrap();

        assert!(matches!(backend.ops()[0], RecordedOp::Clear(_)));
        assert!(matches!(backend.ops()[1], RecordedOp::Begin));
        assert!(matches!(backend.ops()[2], RecordedOp::SetBlending(true)));
        assert!(matches!(backend.ops()[3], RecordedOp::FillRect { .. }));
        assert!(matches!(backend.ops()[4], RecordedOp::End));
    }
}
