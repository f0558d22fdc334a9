//! Viewport culling: which registered entities are visible this frame.
//!
//! # Invariants
//! - `cull` returns exactly the registered entities whose bounds intersect
//!   the viewport.
//! - The returned order is deterministic for a fixed viewport and registered
//!   set: ascending insertion sequence, regardless of strategy. Swapping
//!   strategies is observably transparent.
//! - Register/unregister between culls is safe; an entity added or removed
//!   mid-frame is consistently included or excluded, never partially.

pub mod brute;
pub mod zone;

use glint_common::{EntityId, Rect};
use glint_scene::SceneArena;

pub use brute::BruteForceCulling;
pub use zone::ZoneCulling;

pub fn crate_info() -> &'static str {
    "glint-cull v0.1.0"
}

/// Pluggable visibility strategy.
///
/// Holds non-owning entity ids; bounds are read from the arena at cull time.
pub trait CullingSystem {
    /// Track an entity. Registering twice is a no-op.
    fn register(&mut self, id: EntityId);

    /// Stop tracking an entity. Returns false if it was not tracked.
    fn unregister(&mut self, id: EntityId) -> bool;

    fn is_registered(&self, id: EntityId) -> bool;

    /// Number of tracked entities.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Visible entities for this viewport, in ascending insertion-sequence
    /// order. Tracked ids with no arena record are skipped.
    fn cull(&mut self, arena: &SceneArena, viewport: Rect) -> Vec<EntityId>;
}

/// Order a set of visible ids by their arena insertion sequence.
///
/// Shared by strategies so they agree on the output order bit-for-bit.
pub(crate) fn sort_by_sequence(ids: &mut [EntityId], arena: &SceneArena) {
    ids.sort_by_key(|id| arena.get(*id).map(|r| r.seq).unwrap_or(u64::MAX));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(strategy: &mut dyn CullingSystem) -> (SceneArena, Vec<EntityId>) {
        let mut arena = SceneArena::new();
        let mut ids = Vec::new();
        for i in 0..10 {
            let id = arena.insert(Rect::new(i as f32 * 20.0, 0.0, 10.0, 10.0));
            strategy.register(id);
            ids.push(id);
        }
        (arena, ids)
    }

    #[test]
    fn strategies_agree_on_order() {
        let mut zone = ZoneCulling::new(16.0);
        let mut brute = BruteForceCulling::new();

        let mut arena = SceneArena::new();
        for i in 0..25 {
            let id = arena.insert(Rect::new((i % 5) as f32 * 30.0, (i / 5) as f32 * 30.0, 12.0, 12.0));
            zone.register(id);
            brute.register(id);
        }

        let viewport = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(zone.cull(&arena, viewport), brute.cull(&arena, viewport));
    }

    #[test]
    fn cull_is_repeatable() {
        let mut zone = ZoneCulling::new(16.0);
        let (arena, _) = setup(&mut zone);
        let viewport = Rect::new(0.0, 0.0, 100.0, 100.0);
        let first = zone.cull(&arena, viewport);
        let second = zone.cull(&arena, viewport);
        assert_eq!(first, second);
    }

    #[test]
    fn cull_returns_exact_intersection() {
        let mut brute = BruteForceCulling::new();
        let (arena, ids) = setup(&mut brute);
        // Entities at x = 0, 20, 40, ... width 10. Viewport covers x < 45.
        let visible = brute.cull(&arena, Rect::new(0.0, 0.0, 45.0, 45.0));
        assert_eq!(visible, ids[..3].to_vec());
    }
}
