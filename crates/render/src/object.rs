//! Scene object contracts and built-in drawables.
//!
//! Every object the compositor manages falls into exactly one of three
//! capability classes, decided once at registration:
//!
//! - [`Drawable`]: textured content drawn through the sprite batch.
//! - [`ShapeObject`]: filled vector geometry drawn through the immediate
//!   shape painter, bypassing the batch.
//! - inert: held in a layer but never drawn.
//!
//! An object never changes class after registration.

use glam::Vec2;
use glint_common::{Color, Rect};

use crate::backend::{RenderError, ShapePainter, SpriteBatch, SpriteDraw};

/// Stable handle to an object registered with the compositor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

/// Textured content drawn through the sprite batch.
///
/// `bounds` is the object's current world rectangle, owned by the scene
/// arena; implementations must not cache it. `dt` is the frame delta in
/// seconds, for drawables that advance with time.
pub trait Drawable {
    /// Whether this object needs alpha blending. Sampled once per draw to
    /// drive batch blend-state transitions.
    fn is_transparent(&self) -> bool;

    fn render(
        &mut self,
        batch: &mut dyn SpriteBatch,
        bounds: Rect,
        dt: f32,
    ) -> Result<(), RenderError>;

    /// Release any resources this drawable owns. Called at most once.
    fn dispose(&mut self) {}
}

/// Filled vector geometry drawn through the immediate shape painter.
pub trait ShapeObject {
    fn render_shape(
        &mut self,
        painter: &mut dyn ShapePainter,
        bounds: Rect,
    ) -> Result<(), RenderError>;
}

/// Capability class of a registered object, resolved once at registration.
pub enum ObjectKind {
    Sprite(Box<dyn Drawable>),
    Shape(Box<dyn ShapeObject>),
    Inert,
}

impl ObjectKind {
    pub fn name(&self) -> &'static str {
        match self {
            ObjectKind::Sprite(_) => "sprite",
            ObjectKind::Shape(_) => "shape",
            ObjectKind::Inert => "inert",
        }
    }
}

impl std::fmt::Debug for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything the compositor needs to register an object.
pub struct ObjectDesc {
    pub kind: ObjectKind,
    pub bounds: Option<Rect>,
    pub listens: bool,
}

impl ObjectDesc {
    pub fn sprite(drawable: impl Drawable + 'static, bounds: Rect) -> Self {
        Self {
            kind: ObjectKind::Sprite(Box::new(drawable)),
            bounds: Some(bounds),
            listens: false,
        }
    }

    pub fn shape(shape: impl ShapeObject + 'static, bounds: Rect) -> Self {
        Self {
            kind: ObjectKind::Shape(Box::new(shape)),
            bounds: Some(bounds),
            listens: false,
        }
    }

    /// An object that occupies a layer but is never drawn or culled.
    pub fn inert() -> Self {
        Self {
            kind: ObjectKind::Inert,
            bounds: None,
            listens: false,
        }
    }

    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Register the object as an input listener as well.
    pub fn with_listener(mut self) -> Self {
        self.listens = true;
        self
    }
}

/// Solid filled rectangle covering the object's bounds.
#[derive(Debug, Clone, Copy)]
pub struct RectShape {
    pub color: Color,
}

impl RectShape {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl ShapeObject for RectShape {
    fn render_shape(
        &mut self,
        painter: &mut dyn ShapePainter,
        bounds: Rect,
    ) -> Result<(), RenderError> {
        painter.fill_rect(bounds, self.color)
    }
}

/// Filled convex polygon. Points are relative to the bounds' lower-left
/// corner and are translated into world space each draw.
#[derive(Debug, Clone)]
pub struct PolygonShape {
    points: Vec<Vec2>,
    pub color: Color,
}

impl PolygonShape {
    pub fn new(points: Vec<Vec2>, color: Color) -> Self {
        assert!(points.len() >= 3, "polygon needs at least three points");
        Self { points, color }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }
}

impl ShapeObject for PolygonShape {
    fn render_shape(
        &mut self,
        painter: &mut dyn ShapePainter,
        bounds: Rect,
    ) -> Result<(), RenderError> {
        let offset = bounds.position();
        let world: Vec<Vec2> = self.points.iter().map(|p| *p + offset).collect();
        painter.fill_polygon(&world, self.color)
    }
}

/// Scene background, always rendered before any layer content.
///
/// The clear color fills the frame; an optional texture is stretched over
/// the whole viewport on top of it.
#[derive(Debug, Clone)]
pub struct Background {
    color: Color,
    texture: Option<(glint_assets::TextureHandle, glint_common::TexRegion)>,
}

impl Background {
    pub fn solid(color: Color) -> Self {
        Self {
            color,
            texture: None,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_texture(
        &mut self,
        texture: glint_assets::TextureHandle,
        region: glint_common::TexRegion,
    ) {
        self.texture = Some((texture, region));
    }

    pub fn clear_texture(&mut self) {
        self.texture = None;
    }

    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }

    pub(crate) fn render(
        &mut self,
        batch: &mut dyn SpriteBatch,
        viewport: Rect,
    ) -> Result<(), RenderError> {
        if let Some((texture, region)) = self.texture {
            batch.draw(&SpriteDraw::new(texture, region, viewport))?;
        }
        Ok(())
    }
}

impl Default for Background {
    fn default() -> Self {
        Self::solid(Color::BLACK)
    }
}
