//! Layer-based scene compositor.
//!
//! Objects live in integer-indexed layers drawn in ascending index order.
//! Visibility is decided once per frame by a pluggable culling strategy;
//! the blend state of the sprite batch is tracked here so backends only
//! see transitions, never redundant switches.
//!
//! # Invariants
//! - Layer 0 always exists.
//! - Every registered object belongs to exactly one layer; its spatial
//!   record, culling registration, and listener slot live and die with it.
//! - One backend session per frame: background first, then layers in
//!   ascending index order, objects within a layer in culling order.
//! - `set_blending` reaches the backend only when the required state
//!   differs from the current one.
//! - Disposal is exactly-once; a second `dispose` and any `render` after
//!   disposal fail with [`CompositorError::Disposed`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::time::{Duration, Instant};

use glam::Vec2;
use glint_common::{EntityId, Rect};
use glint_cull::{CullingSystem, ZoneCulling};
use glint_input::{InputRouter, ListenerId};
use glint_scene::SceneArena;

use crate::backend::{RenderBackend, RenderError};
use crate::camera::Camera2D;
use crate::object::{Background, ObjectDesc, ObjectId, ObjectKind};

#[derive(Debug, thiserror::Error)]
pub enum CompositorError {
    #[error("compositor already disposed")]
    Disposed,
    #[error(transparent)]
    Backend(#[from] RenderError),
}

/// Blend state of the sprite batch, as the compositor tracks it. The state
/// carries across frames; `Inactive` means no draw has pinned a state yet
/// since construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlendState {
    Inactive,
    Enabled,
    Disabled,
}

/// Per-frame statistics returned by [`Compositor::render`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Entities the culling pass reported visible.
    pub visible: usize,
    /// Sprite objects drawn through the batch.
    pub drawn: usize,
    /// Shape objects drawn through the immediate painter.
    pub shapes: usize,
    /// Visible objects with no drawing capability.
    pub skipped: usize,
    /// Blend-state switches forwarded to the backend.
    pub blend_changes: usize,
}

/// A frame report together with its wall-clock duration.
#[derive(Debug, Clone, Copy)]
pub struct FrameSummary {
    pub report: FrameReport,
    pub frame_time: Duration,
}

impl fmt::Display for FrameSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} visible, {} sprites, {} shapes, {} skipped, {} blend switches in {:?}",
            self.report.visible,
            self.report.drawn,
            self.report.shapes,
            self.report.skipped,
            self.report.blend_changes,
            self.frame_time
        )
    }
}

/// Bookkeeping for one registered object.
pub struct SceneEntry {
    kind: ObjectKind,
    entity: Option<EntityId>,
    listener: Option<ListenerId>,
}

impl SceneEntry {
    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    pub fn entity(&self) -> Option<EntityId> {
        self.entity
    }

    pub fn listener(&self) -> Option<ListenerId> {
        self.listener
    }
}

#[derive(Debug, Default)]
struct Layer {
    members: BTreeSet<ObjectId>,
}

pub struct Compositor {
    camera: Camera2D,
    background: Background,
    arena: SceneArena,
    culling: Box<dyn CullingSystem>,
    input: InputRouter,
    layers: BTreeMap<i32, Layer>,
    objects: BTreeMap<ObjectId, SceneEntry>,
    by_entity: BTreeMap<EntityId, ObjectId>,
    backend: Box<dyn RenderBackend>,
    blend: BlendState,
    next_object: u64,
    disposed: bool,
}

impl Compositor {
    /// A compositor with layer 0, a black background, and zone culling.
    pub fn new(viewport_width: f32, viewport_height: f32, backend: Box<dyn RenderBackend>) -> Self {
        let mut layers = BTreeMap::new();
        layers.insert(0, Layer::default());
        Self {
            camera: Camera2D::new(viewport_width, viewport_height),
            background: Background::default(),
            arena: SceneArena::new(),
            culling: Box::new(ZoneCulling::default()),
            input: InputRouter::new(),
            layers,
            objects: BTreeMap::new(),
            by_entity: BTreeMap::new(),
            backend,
            blend: BlendState::Inactive,
            next_object: 0,
            disposed: false,
        }
    }

    /// Swap the culling strategy, carrying over every live registration.
    pub fn set_culling(&mut self, mut culling: Box<dyn CullingSystem>) {
        for id in self.by_entity.keys() {
            culling.register(*id);
        }
        self.culling = culling;
        tracing::debug!(entities = self.by_entity.len(), "culling strategy swapped");
    }

    /// Create a layer if it does not exist. Returns true when created.
    pub fn add_layer(&mut self, index: i32) -> bool {
        match self.layers.entry(index) {
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(Layer::default());
                tracing::debug!(layer = index, "layer created");
                true
            }
            std::collections::btree_map::Entry::Occupied(_) => false,
        }
    }

    /// Remove a layer and retire all its members. Returns false for an
    /// unknown index. Layer 0 is emptied but never removed.
    pub fn remove_layer(&mut self, index: i32) -> bool {
        let Some(layer) = self.layers.remove(&index) else {
            return false;
        };
        if index == 0 {
            self.layers.insert(0, Layer::default());
        }
        let count = layer.members.len();
        for id in layer.members {
            self.retire(id);
        }
        tracing::debug!(layer = index, retired = count, "layer removed");
        true
    }

    pub fn has_layer(&self, index: i32) -> bool {
        self.layers.contains_key(&index)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Layer indices in draw order.
    pub fn layer_indices(&self) -> Vec<i32> {
        self.layers.keys().copied().collect()
    }

    /// Members of a layer in id order.
    pub fn layer_objects(&self, index: i32) -> Option<Vec<ObjectId>> {
        self.layers
            .get(&index)
            .map(|layer| layer.members.iter().copied().collect())
    }

    /// Register an object in layer 0.
    pub fn add(&mut self, desc: ObjectDesc) -> ObjectId {
        self.add_to(0, desc)
    }

    /// Register an object in the given layer, creating the layer if needed.
    ///
    /// A bounded object gets a spatial record and a culling registration;
    /// a listening object gets an input listener slot. All of it is undone
    /// by [`remove_from`](Self::remove_from).
    pub fn add_to(&mut self, layer: i32, desc: ObjectDesc) -> ObjectId {
        let id = ObjectId(self.next_object);
        self.next_object += 1;

        let entity = desc.bounds.map(|bounds| {
            let eid = self.arena.insert(bounds);
            self.culling.register(eid);
            self.by_entity.insert(eid, id);
            eid
        });
        let listener = desc.listens.then(|| self.input.add_listener());

        self.layers.entry(layer).or_default().members.insert(id);
        self.objects.insert(
            id,
            SceneEntry {
                kind: desc.kind,
                entity,
                listener,
            },
        );
        tracing::debug!(object = id.0, layer, "object added");
        id
    }

    /// Remove an object from layer 0. See [`remove_from`](Self::remove_from).
    pub fn remove(&mut self, id: ObjectId) -> bool {
        self.remove_from(0, id)
    }

    /// Remove an object from a layer and retire it fully: spatial record,
    /// culling registration, and listener slot all go with it. Removing an
    /// object that is not a member of that layer is a no-op returning false.
    pub fn remove_from(&mut self, layer: i32, id: ObjectId) -> bool {
        let Some(bucket) = self.layers.get_mut(&layer) else {
            return false;
        };
        if !bucket.members.remove(&id) {
            return false;
        }
        self.retire(id);
        tracing::debug!(object = id.0, layer, "object removed");
        true
    }

    fn retire(&mut self, id: ObjectId) {
        let Some(entry) = self.objects.remove(&id) else {
            return;
        };
        if let Some(eid) = entry.entity {
            self.culling.unregister(eid);
            self.arena.remove(eid);
            self.by_entity.remove(&eid);
        }
        if let Some(lid) = entry.listener {
            self.input.remove_listener(lid);
        }
        if let ObjectKind::Sprite(mut drawable) = entry.kind {
            drawable.dispose();
        }
    }

    /// Layer currently holding an object.
    pub fn find_layer(&self, id: ObjectId) -> Option<i32> {
        self.layers
            .iter()
            .find(|(_, layer)| layer.members.contains(&id))
            .map(|(index, _)| *index)
    }

    /// Move an object to another layer, creating it if needed. The object's
    /// spatial and listener state is untouched.
    pub fn move_to_layer(&mut self, id: ObjectId, target: i32) -> bool {
        let Some(current) = self.find_layer(id) else {
            return false;
        };
        if current == target {
            return true;
        }
        if let Some(layer) = self.layers.get_mut(&current) {
            layer.members.remove(&id);
        }
        self.layers.entry(target).or_default().members.insert(id);
        true
    }

    /// Move an object's bounds, keeping their size.
    pub fn move_object(&mut self, id: ObjectId, position: Vec2) -> bool {
        match self.objects.get(&id).and_then(|entry| entry.entity) {
            Some(eid) => self.arena.set_position(eid, position),
            None => false,
        }
    }

    /// Replace an object's bounds.
    pub fn set_object_bounds(&mut self, id: ObjectId, bounds: Rect) -> bool {
        match self.objects.get(&id).and_then(|entry| entry.entity) {
            Some(eid) => self.arena.set_bounds(eid, bounds),
            None => false,
        }
    }

    pub fn object_bounds(&self, id: ObjectId) -> Option<Rect> {
        let entry = self.objects.get(&id)?;
        self.arena.bounds(entry.entity?)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn entry(&self, id: ObjectId) -> Option<&SceneEntry> {
        self.objects.get(&id)
    }

    /// All registered objects in id order.
    pub fn entries(&self) -> impl Iterator<Item = (ObjectId, &SceneEntry)> {
        self.objects.iter().map(|(id, entry)| (*id, entry))
    }

    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera2D {
        &mut self.camera
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn background_mut(&mut self) -> &mut Background {
        &mut self.background
    }

    pub fn input(&self) -> &InputRouter {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputRouter {
        &mut self.input
    }

    pub fn arena(&self) -> &SceneArena {
        &self.arena
    }

    pub fn culling(&self) -> &dyn CullingSystem {
        &*self.culling
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Draw one frame. `dt` is the time since the previous frame in
    /// seconds; animated drawables advance by it.
    ///
    /// The frame is a single backend session: clear, recompute the camera,
    /// cull once, then background followed by layers in ascending index
    /// order with each layer's objects in culling order.
    pub fn render(&mut self, dt: f32) -> Result<FrameSummary, CompositorError> {
        if self.disposed {
            return Err(CompositorError::Disposed);
        }
        let _span = tracing::trace_span!("frame").entered();
        let start = Instant::now();

        self.backend.clear(self.background.color());
        self.backend.set_projection(self.camera.view_projection());
        let viewport = self.camera.view_rect();

        let visible = self.culling.cull(&self.arena, viewport);
        let draw_list: Vec<ObjectId> = visible
            .iter()
            .filter_map(|eid| self.by_entity.get(eid).copied())
            .collect();

        let mut report = FrameReport {
            visible: visible.len(),
            ..FrameReport::default()
        };

        self.backend.begin()?;
        self.background
            .render(self.backend.as_sprite_batch(), viewport)?;

        for layer in self.layers.values() {
            for oid in &draw_list {
                if !layer.members.contains(oid) {
                    continue;
                }
                let Some(entry) = self.objects.get_mut(oid) else {
                    continue;
                };
                let Some(bounds) = entry.entity.and_then(|eid| self.arena.bounds(eid)) else {
                    continue;
                };
                match &mut entry.kind {
                    ObjectKind::Sprite(drawable) => {
                        let wanted = if drawable.is_transparent() {
                            BlendState::Enabled
                        } else {
                            BlendState::Disabled
                        };
                        if self.blend != wanted {
                            self.backend.set_blending(wanted == BlendState::Enabled);
                            self.blend = wanted;
                            report.blend_changes += 1;
                        }
                        drawable.render(self.backend.as_sprite_batch(), bounds, dt)?;
                        report.drawn += 1;
                    }
                    ObjectKind::Shape(shape) => {
                        shape.render_shape(self.backend.as_shape_painter(), bounds)?;
                        report.shapes += 1;
                    }
                    ObjectKind::Inert => {
                        report.skipped += 1;
                    }
                }
            }
        }

        self.backend.end()?;
        let frame_time = start.elapsed();
        tracing::trace!(
            visible = report.visible,
            drawn = report.drawn,
            shapes = report.shapes,
            blend_changes = report.blend_changes,
            ?frame_time,
            "frame complete"
        );
        Ok(FrameSummary { report, frame_time })
    }

    /// Tear the scene down: every drawable's `dispose` runs exactly once,
    /// then the backend is released. A second call fails.
    pub fn dispose(&mut self) -> Result<(), CompositorError> {
        if self.disposed {
            return Err(CompositorError::Disposed);
        }
        for entry in self.objects.values_mut() {
            if let ObjectKind::Sprite(drawable) = &mut entry.kind {
                drawable.dispose();
            }
        }
        self.backend.dispose();
        self.disposed = true;
        tracing::debug!(objects = self.objects.len(), "compositor disposed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{
        RecordedOp, RecordingBackend, ShapePainter, SpriteBatch, SpriteDraw,
    };
    use crate::object::{Drawable, RectShape};
    use glam::Mat4;
    use glint_assets::TextureHandle;
    use glint_common::{Color, TexRegion};
    use glint_cull::BruteForceCulling;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Backend handle that stays inspectable after the compositor takes
    /// ownership of its clone.
    #[derive(Clone, Default)]
    struct SharedBackend(Rc<RefCell<RecordingBackend>>);

    impl SharedBackend {
        fn ops(&self) -> Vec<RecordedOp> {
            self.0.borrow().ops().to_vec()
        }

        fn blend_switches(&self) -> usize {
            self.0.borrow().blend_switches()
        }

        fn sprite_count(&self) -> usize {
            self.0.borrow().sprite_count()
        }
    }

    impl SpriteBatch for SharedBackend {
        fn draw(&mut self, cmd: &SpriteDraw) -> Result<(), RenderError> {
            self.0.borrow_mut().draw(cmd)
        }
    }

    impl ShapePainter for SharedBackend {
        fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), RenderError> {
            self.0.borrow_mut().fill_rect(rect, color)
        }

        fn fill_polygon(&mut self, points: &[glam::Vec2], color: Color) -> Result<(), RenderError> {
            self.0.borrow_mut().fill_polygon(points, color)
        }
    }

    impl RenderBackend for SharedBackend {
        fn clear(&mut self, color: Color) {
            self.0.borrow_mut().clear(color);
        }

        fn set_projection(&mut self, view_proj: Mat4) {
            self.0.borrow_mut().set_projection(view_proj);
        }

        fn begin(&mut self) -> Result<(), RenderError> {
            self.0.borrow_mut().begin()
        }

        fn set_blending(&mut self, enabled: bool) {
            self.0.borrow_mut().set_blending(enabled);
        }

        fn end(&mut self) -> Result<(), RenderError> {
            self.0.borrow_mut().end()
        }

        fn dispose(&mut self) {
            self.0.borrow_mut().dispose();
        }

        fn as_sprite_batch(&mut self) -> &mut dyn SpriteBatch {
            self
        }

        fn as_shape_painter(&mut self) -> &mut dyn ShapePainter {
            self
        }
    }

    /// Minimal drawable: one quad per frame, counting its disposals.
    struct Probe {
        texture: TextureHandle,
        transparent: bool,
        disposals: Rc<Cell<u32>>,
    }

    impl Probe {
        fn opaque(texture: u64) -> Self {
            Self {
                texture: TextureHandle(texture),
                transparent: false,
                disposals: Rc::new(Cell::new(0)),
            }
        }

        fn transparent(texture: u64) -> Self {
            Self {
                texture: TextureHandle(texture),
                transparent: true,
                disposals: Rc::new(Cell::new(0)),
            }
        }

        fn disposal_counter(&self) -> Rc<Cell<u32>> {
            Rc::clone(&self.disposals)
        }
    }

    impl Drawable for Probe {
        fn is_transparent(&self) -> bool {
            self.transparent
        }

        fn render(
            &mut self,
            batch: &mut dyn SpriteBatch,
            bounds: Rect,
            _dt: f32,
        ) -> Result<(), RenderError> {
            batch.draw(&SpriteDraw::new(self.texture, TexRegion::full(1, 1), bounds))
        }

        fn dispose(&mut self) {
            self.disposals.set(self.disposals.get() + 1);
        }
    }

    fn in_view(i: f32) -> Rect {
        // Camera is at the origin looking at an 800x600 viewport.
        Rect::new(i * 20.0, 0.0, 10.0, 10.0)
    }

    fn compositor() -> (Compositor, SharedBackend) {
        let backend = SharedBackend::default();
        let compositor = Compositor::new(800.0, 600.0, Box::new(backend.clone()));
        (compositor, backend)
    }

    fn drawn_textures(backend: &SharedBackend) -> Vec<TextureHandle> {
        backend
            .ops()
            .iter()
            .filter_map(|op| match op {
                RecordedOp::Sprite(cmd) => Some(cmd.texture),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn layer_zero_exists_and_receives_default_adds() {
        let (mut compositor, _) = compositor();
        assert!(compositor.has_layer(0));
        let id = compositor.add(ObjectDesc::sprite(Probe::opaque(1), in_view(0.0)));
        assert_eq!(compositor.layer_objects(0).unwrap(), vec![id]);
    }

    #[test]
    fn adding_to_a_missing_layer_creates_it() {
        let (mut compositor, _) = compositor();
        assert!(!compositor.has_layer(7));
        compositor.add_to(7, ObjectDesc::sprite(Probe::opaque(1), in_view(0.0)));
        assert!(compositor.has_layer(7));
        assert_eq!(compositor.layer_count(), 2);
    }

    #[test]
    fn remove_undoes_every_registration() {
        let (mut compositor, _) = compositor();
        let id = compositor.add(
            ObjectDesc::sprite(Probe::opaque(1), in_view(0.0)).with_listener(),
        );
        assert_eq!(compositor.arena().len(), 1);
        assert_eq!(compositor.culling().len(), 1);
        assert_eq!(compositor.input().listener_count(), 1);

        assert!(compositor.remove(id));
        assert_eq!(compositor.arena().len(), 0);
        assert_eq!(compositor.culling().len(), 0);
        assert_eq!(compositor.input().listener_count(), 0);
        assert_eq!(compositor.object_count(), 0);
    }

    #[test]
    fn removing_a_non_member_is_a_noop() {
        let (mut compositor, _) = compositor();
        let id = compositor.add_to(3, ObjectDesc::sprite(Probe::opaque(1), in_view(0.0)));

        // Wrong layer, unknown id, unknown layer: all refused, nothing changes.
        assert!(!compositor.remove_from(0, id));
        assert!(!compositor.remove_from(3, ObjectId(999)));
        assert!(!compositor.remove_from(42, id));
        assert_eq!(compositor.object_count(), 1);
        assert_eq!(compositor.arena().len(), 1);
    }

    #[test]
    fn empty_frame_still_clears_and_flushes() {
        let (mut compositor, backend) = compositor();
        compositor.background_mut().set_color(Color::BLUE);
        let summary = compositor.render(0.016).unwrap();

        assert_eq!(summary.report, FrameReport::default());
        let ops = backend.ops();
        assert_eq!(ops[0], RecordedOp::Clear(Color::BLUE));
        assert!(matches!(ops[1], RecordedOp::SetProjection));
        assert!(matches!(ops[2], RecordedOp::Begin));
        assert!(matches!(ops[3], RecordedOp::End));
    }

    #[test]
    fn out_of_view_objects_are_culled() {
        let (mut compositor, backend) = compositor();
        compositor.add(ObjectDesc::sprite(Probe::opaque(1), in_view(0.0)));
        // Hidden regardless of living in a later layer.
        compositor.add_to(
            1,
            ObjectDesc::sprite(Probe::opaque(2), Rect::new(5000.0, 5000.0, 10.0, 10.0)),
        );

        let summary = compositor.render(0.016).unwrap();
        assert_eq!(summary.report.visible, 1);
        assert_eq!(summary.report.drawn, 1);
        assert_eq!(drawn_textures(&backend), vec![TextureHandle(1)]);
    }

    #[test]
    fn moving_an_object_changes_its_visibility() {
        let (mut compositor, _) = compositor();
        let id = compositor.add(ObjectDesc::sprite(
            Probe::opaque(1),
            Rect::new(5000.0, 5000.0, 10.0, 10.0),
        ));
        assert_eq!(compositor.render(0.016).unwrap().report.drawn, 0);

        assert!(compositor.move_object(id, Vec2::new(0.0, 0.0)));
        assert_eq!(compositor.render(0.016).unwrap().report.drawn, 1);
    }

    #[test]
    fn blend_switches_once_per_transparency_run() {
        let (mut compositor, backend) = compositor();
        compositor.add(ObjectDesc::sprite(Probe::opaque(1), in_view(0.0)));
        compositor.add(ObjectDesc::sprite(Probe::opaque(2), in_view(1.0)));
        compositor.add(ObjectDesc::sprite(Probe::transparent(3), in_view(2.0)));
        compositor.add(ObjectDesc::sprite(Probe::transparent(4), in_view(3.0)));
        compositor.add(ObjectDesc::sprite(Probe::opaque(5), in_view(4.0)));

        let summary = compositor.render(0.016).unwrap();
        assert_eq!(summary.report.drawn, 5);
        // Runs: opaque x2, transparent x2, opaque x1.
        assert_eq!(summary.report.blend_changes, 3);
        assert_eq!(backend.blend_switches(), 3);
    }

    #[test]
    fn blend_state_carries_across_frames() {
        let (mut compositor, backend) = compositor();
        compositor.add(ObjectDesc::sprite(Probe::opaque(1), in_view(0.0)));

        compositor.render(0.016).unwrap();
        compositor.render(0.016).unwrap();
        // The first frame pins the opaque state; the second emits nothing.
        assert_eq!(backend.blend_switches(), 1);
    }

    #[test]
    fn layers_draw_in_ascending_index_order() {
        let (mut compositor, backend) = compositor();
        compositor.add_to(5, ObjectDesc::sprite(Probe::opaque(50), in_view(0.0)));
        compositor.add_to(-2, ObjectDesc::sprite(Probe::opaque(20), in_view(1.0)));
        compositor.add(ObjectDesc::sprite(Probe::opaque(10), in_view(2.0)));

        compositor.render(0.016).unwrap();
        assert_eq!(
            drawn_textures(&backend),
            vec![TextureHandle(20), TextureHandle(10), TextureHandle(50)]
        );
    }

    #[test]
    fn objects_within_a_layer_draw_in_insertion_order() {
        let (mut compositor, backend) = compositor();
        for i in 0..4 {
            compositor.add(ObjectDesc::sprite(Probe::opaque(i), in_view(i as f32)));
        }
        compositor.render(0.016).unwrap();
        assert_eq!(
            drawn_textures(&backend),
            (0..4).map(TextureHandle).collect::<Vec<_>>()
        );
    }

    #[test]
    fn shapes_bypass_the_sprite_batch() {
        let (mut compositor, backend) = compositor();
        compositor.add(ObjectDesc::sprite(Probe::opaque(1), in_view(0.0)));
        compositor.add(ObjectDesc::shape(RectShape::new(Color::RED), in_view(1.0)));
        compositor.add(ObjectDesc::sprite(Probe::opaque(2), in_view(2.0)));

        let summary = compositor.render(0.016).unwrap();
        assert_eq!(summary.report.drawn, 2);
        assert_eq!(summary.report.shapes, 1);
        // The shape between two opaque sprites does not disturb blending.
        assert_eq!(summary.report.blend_changes, 1);
        assert!(backend
            .ops()
            .iter()
            .any(|op| matches!(op, RecordedOp::FillRect { .. })));
    }

    #[test]
    fn inert_objects_are_counted_but_never_drawn() {
        let (mut compositor, backend) = compositor();
        compositor.add(ObjectDesc::inert().with_bounds(in_view(0.0)));

        let summary = compositor.render(0.016).unwrap();
        assert_eq!(summary.report.visible, 1);
        assert_eq!(summary.report.skipped, 1);
        assert_eq!(summary.report.drawn, 0);
        assert_eq!(backend.sprite_count(), 0);
    }

    #[test]
    fn swapping_culling_preserves_registrations() {
        let (mut compositor, _) = compositor();
        for i in 0..3 {
            compositor.add(ObjectDesc::sprite(Probe::opaque(i), in_view(i as f32)));
        }
        compositor.set_culling(Box::new(BruteForceCulling::new()));
        assert_eq!(compositor.culling().len(), 3);
        assert_eq!(compositor.render(0.016).unwrap().report.drawn, 3);
    }

    #[test]
    fn remove_layer_retires_members() {
        let (mut compositor, _) = compositor();
        compositor.add_to(2, ObjectDesc::sprite(Probe::opaque(1), in_view(0.0)).with_listener());
        compositor.add_to(2, ObjectDesc::sprite(Probe::opaque(2), in_view(1.0)));

        assert!(compositor.remove_layer(2));
        assert!(!compositor.has_layer(2));
        assert_eq!(compositor.object_count(), 0);
        assert_eq!(compositor.arena().len(), 0);
        assert_eq!(compositor.culling().len(), 0);
        assert_eq!(compositor.input().listener_count(), 0);
        assert!(!compositor.remove_layer(2));
    }

    #[test]
    fn layer_zero_survives_removal() {
        let (mut compositor, _) = compositor();
        compositor.add(ObjectDesc::sprite(Probe::opaque(1), in_view(0.0)));
        assert!(compositor.remove_layer(0));
        assert!(compositor.has_layer(0));
        assert_eq!(compositor.object_count(), 0);
    }

    #[test]
    fn move_to_layer_keeps_spatial_state() {
        let (mut compositor, _) = compositor();
        let id = compositor.add(ObjectDesc::sprite(Probe::opaque(1), in_view(0.0)));
        assert!(compositor.move_to_layer(id, 9));
        assert_eq!(compositor.find_layer(id), Some(9));
        assert_eq!(compositor.arena().len(), 1);
        assert_eq!(compositor.render(0.016).unwrap().report.drawn, 1);
    }

    #[test]
    fn dispose_reaches_every_drawable_exactly_once() {
        let (mut compositor, _) = compositor();
        let a = Probe::opaque(1);
        let b = Probe::transparent(2);
        let count_a = a.disposal_counter();
        let count_b = b.disposal_counter();
        compositor.add(ObjectDesc::sprite(a, in_view(0.0)));
        compositor.add_to(4, ObjectDesc::sprite(b, in_view(1.0)));

        compositor.dispose().unwrap();
        assert_eq!(count_a.get(), 1);
        assert_eq!(count_b.get(), 1);
    }

    #[test]
    fn double_dispose_fails_loudly() {
        let (mut compositor, _) = compositor();
        compositor.dispose().unwrap();
        assert!(matches!(
            compositor.dispose(),
            Err(CompositorError::Disposed)
        ));
        assert!(matches!(
            compositor.render(0.016),
            Err(CompositorError::Disposed)
        ));
    }

    #[test]
    fn removal_disposes_the_drawable() {
        let (mut compositor, _) = compositor();
        let probe = Probe::opaque(1);
        let count = probe.disposal_counter();
        let id = compositor.add(ObjectDesc::sprite(probe, in_view(0.0)));

        compositor.remove(id);
        assert_eq!(count.get(), 1);
        // Already retired, so teardown must not see it again.
        compositor.dispose().unwrap();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn camera_motion_changes_the_visible_set() {
        let (mut compositor, _) = compositor();
        compositor.add(ObjectDesc::sprite(Probe::opaque(1), in_view(0.0)));
        assert_eq!(compositor.render(0.016).unwrap().report.drawn, 1);

        compositor.camera_mut().set_position(Vec2::new(10_000.0, 0.0));
        assert_eq!(compositor.render(0.016).unwrap().report.drawn, 0);
    }
}
