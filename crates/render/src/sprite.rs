//! Static and animated sprites.
//!
//! A [`Sprite`] draws one texture region into its current bounds. An
//! [`AnimatedSprite`] swaps the region from an [`Animation`] based on a
//! [`Playhead`]; playback can advance automatically from the frame delta
//! or be stepped manually with [`AnimatedSprite::update`].

use glam::Vec2;
use glint_anim::{Animation, Playhead};
use glint_assets::TextureHandle;
use glint_common::{Color, Rect, TexRegion};

use crate::backend::{RenderError, SpriteBatch, SpriteDraw};
use crate::object::Drawable;

/// Static textured quad.
#[derive(Debug, Clone)]
pub struct Sprite {
    texture: TextureHandle,
    region: TexRegion,
    tint: Color,
    rotation: f32,
    transparent: bool,
}

impl Sprite {
    pub fn new(texture: TextureHandle, region: TexRegion) -> Self {
        Self {
            texture,
            region,
            tint: Color::WHITE,
            rotation: 0.0,
            transparent: false,
        }
    }

    pub fn with_transparency(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    pub fn texture(&self) -> TextureHandle {
        self.texture
    }

    pub fn region(&self) -> TexRegion {
        self.region
    }

    pub fn set_region(&mut self, region: TexRegion) {
        self.region = region;
    }

    pub fn tint(&self) -> Color {
        self.tint
    }

    pub fn set_tint(&mut self, tint: Color) {
        self.tint = tint;
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Rotation in radians around the center of the bounds.
    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
    }

    pub fn set_transparent(&mut self, transparent: bool) {
        self.transparent = transparent;
    }
}

impl Drawable for Sprite {
    fn is_transparent(&self) -> bool {
        self.transparent
    }

    fn render(
        &mut self,
        batch: &mut dyn SpriteBatch,
        bounds: Rect,
        _dt: f32,
    ) -> Result<(), RenderError> {
        let mut cmd = SpriteDraw::new(self.texture, self.region, bounds);
        cmd.tint = self.tint;
        cmd.rotation = self.rotation;
        batch.draw(&cmd)
    }
}

/// How an animated sprite maps frame regions onto its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizePolicy {
    /// Keep the registered bounds, typically sized from the first frame,
    /// and stretch every frame into them.
    FirstFrame,
    /// Draw each frame at its native texel size, anchored at the bounds'
    /// lower-left corner, or centered within the bounds.
    Native { center: bool },
}

/// Sprite whose texture region is driven by an animation playhead.
#[derive(Debug, Clone)]
pub struct AnimatedSprite {
    texture: TextureHandle,
    animation: Animation,
    head: Playhead,
    size: SizePolicy,
    auto_update: bool,
    tint: Color,
    transparent: bool,
}

impl AnimatedSprite {
    /// A sprite at frame zero, playing, advancing automatically each frame.
    pub fn new(texture: TextureHandle, animation: Animation) -> Self {
        Self {
            texture,
            animation,
            head: Playhead::new(),
            size: SizePolicy::FirstFrame,
            auto_update: true,
            tint: Color::WHITE,
            transparent: false,
        }
    }

    pub fn with_size_policy(mut self, size: SizePolicy) -> Self {
        self.size = size;
        self
    }

    pub fn with_transparency(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    /// Disable automatic playback; time then only moves through
    /// [`update`](Self::update) or [`set_time`](Self::set_time).
    pub fn manual(mut self) -> Self {
        self.auto_update = false;
        self
    }

    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    /// Swap the sequence and rewind to time zero, keeping the play state.
    pub fn set_animation(&mut self, animation: Animation) {
        self.animation = animation;
        self.head.set_time(0.0);
    }

    pub fn play(&mut self) {
        self.head.play();
    }

    pub fn pause(&mut self) {
        self.head.pause();
    }

    /// Pause and rewind to time zero.
    pub fn reset(&mut self) {
        self.head.reset();
    }

    /// Manually advance the playhead. Returns true when it moved.
    pub fn update(&mut self, delta: f32) -> bool {
        self.head.advance(delta)
    }

    pub fn set_time(&mut self, time: f32) {
        self.head.set_time(time);
    }

    pub fn time(&self) -> f32 {
        self.head.time()
    }

    pub fn is_playing(&self) -> bool {
        self.head.is_playing()
    }

    /// Whether the sequence has run out. Looping animations never finish.
    pub fn is_finished(&self) -> bool {
        self.animation.is_finished(self.head.time())
    }

    /// Frame index the playhead currently selects.
    pub fn current_frame(&self) -> usize {
        self.animation.frame_index(self.head.time())
    }

    pub fn set_tint(&mut self, tint: Color) {
        self.tint = tint;
    }

    pub fn set_transparent(&mut self, transparent: bool) {
        self.transparent = transparent;
    }

    fn frame_dst(&self, frame: TexRegion, bounds: Rect) -> Rect {
        match self.size {
            SizePolicy::FirstFrame => bounds,
            SizePolicy::Native { center } => {
                let w = frame.width as f32;
                let h = frame.height as f32;
                if center {
                    Rect::centered(bounds.center(), w, h)
                } else {
                    Rect::new(bounds.x, bounds.y, w, h)
                }
            }
        }
    }
}

impl Drawable for AnimatedSprite {
    fn is_transparent(&self) -> bool {
        self.transparent
    }

    fn render(
        &mut self,
        batch: &mut dyn SpriteBatch,
        bounds: Rect,
        dt: f32,
    ) -> Result<(), RenderError> {
        if self.auto_update {
            self.head.advance(dt);
        }
        let frame = self.animation.frame_at(self.head.time());
        let mut cmd = SpriteDraw::new(self.texture, frame, self.frame_dst(frame, bounds));
        cmd.tint = self.tint;
        batch.draw(&cmd)
    }
}
