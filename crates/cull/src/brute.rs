use std::collections::BTreeSet;

use glint_common::{EntityId, Rect};
use glint_scene::SceneArena;

use crate::{CullingSystem, sort_by_sequence};

/// Straight-line culling: test every tracked entity against the viewport.
///
/// The reference strategy. Small scenes beat the zone grid here; large ones
/// don't. Output order is identical to [`crate::ZoneCulling`].
#[derive(Debug, Clone, Default)]
pub struct BruteForceCulling {
    registered: BTreeSet<EntityId>,
}

impl BruteForceCulling {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CullingSystem for BruteForceCulling {
    fn register(&mut self, id: EntityId) {
        self.registered.insert(id);
    }

    fn unregister(&mut self, id: EntityId) -> bool {
        self.registered.remove(&id)
    }

    fn is_registered(&self, id: EntityId) -> bool {
        self.registered.contains(&id)
    }

    fn len(&self) -> usize {
        self.registered.len()
    }

    fn cull(&mut self, arena: &SceneArena, viewport: Rect) -> Vec<EntityId> {
        let _span = tracing::trace_span!("brute_cull").entered();
        let mut visible: Vec<EntityId> = self
            .registered
            .iter()
            .filter(|id| {
                arena
                    .get(**id)
                    .is_some_and(|record| record.bounds.intersects(&viewport))
            })
            .copied()
            .collect();
        sort_by_sequence(&mut visible, arena);
        visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_follows_insertion_sequence() {
        let mut arena = SceneArena::new();
        let first = arena.insert(Rect::new(50.0, 0.0, 10.0, 10.0));
        let second = arena.insert(Rect::new(0.0, 0.0, 10.0, 10.0));

        let mut brute = BruteForceCulling::new();
        // Register in reverse; output must still follow insertion sequence.
        brute.register(second);
        brute.register(first);

        let visible = brute.cull(&arena, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(visible, vec![first, second]);
    }

    #[test]
    fn empty_registry_culls_to_nothing() {
        let arena = SceneArena::new();
        let mut brute = BruteForceCulling::new();
        assert!(brute.cull(&arena, Rect::new(0.0, 0.0, 10.0, 10.0)).is_empty());
        assert!(brute.is_empty());
    }

    #[test]
    fn register_twice_is_single_entry() {
        let mut arena = SceneArena::new();
        let id = arena.insert(Rect::new(0.0, 0.0, 10.0, 10.0));

        let mut brute = BruteForceCulling::new();
        brute.register(id);
        brute.register(id);
        assert_eq!(brute.len(), 1);

        let visible = brute.cull(&arena, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(visible.len(), 1);
    }
}
