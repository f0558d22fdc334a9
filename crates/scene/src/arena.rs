use glam::Vec2;
use glint_common::{EntityId, Rect};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Positional data for one registered entity.
///
/// The owning drawable mutates the bounds; the culling index only reads them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpatialRecord {
    /// World-space axis-aligned bounds.
    pub bounds: Rect,
    /// Monotonic insertion sequence. Breaks ties whenever a stable draw
    /// order is needed.
    pub seq: u64,
}

/// Arena of spatial records keyed by entity id.
///
/// Drawables and the culling index both hold `EntityId`s into this arena
/// instead of aliasing each other's data. The arena is the single source of
/// truth for placement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneArena {
    records: BTreeMap<EntityId, SpatialRecord>,
    next_seq: u64,
}

impl SceneArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Insert a record with the given bounds. Returns its id.
    pub fn insert(&mut self, bounds: Rect) -> EntityId {
        let id = EntityId::new();
        self.insert_with_id(id, bounds);
        id
    }

    /// Insert a record with a specific id.
    pub fn insert_with_id(&mut self, id: EntityId, bounds: Rect) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.records.insert(id, SpatialRecord { bounds, seq });
        tracing::trace!(?id, seq, "spatial record inserted");
    }

    /// Remove a record. Returns it if it existed.
    pub fn remove(&mut self, id: EntityId) -> Option<SpatialRecord> {
        let removed = self.records.remove(&id);
        if removed.is_some() {
            tracing::trace!(?id, "spatial record removed");
        }
        removed
    }

    pub fn get(&self, id: EntityId) -> Option<&SpatialRecord> {
        self.records.get(&id)
    }

    /// Current bounds of a record.
    pub fn bounds(&self, id: EntityId) -> Option<Rect> {
        self.records.get(&id).map(|r| r.bounds)
    }

    /// Replace a record's bounds. Returns false for an unknown id.
    pub fn set_bounds(&mut self, id: EntityId, bounds: Rect) -> bool {
        match self.records.get_mut(&id) {
            Some(record) => {
                record.bounds = bounds;
                true
            }
            None => false,
        }
    }

    /// Move a record, keeping its size. Returns false for an unknown id.
    pub fn set_position(&mut self, id: EntityId, position: Vec2) -> bool {
        match self.records.get_mut(&id) {
            Some(record) => {
                record.bounds.x = position.x;
                record.bounds.y = position.y;
                true
            }
            None => false,
        }
    }

    /// Read-only access to all records in deterministic id order.
    pub fn records(&self) -> &BTreeMap<EntityId, SpatialRecord> {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arena_starts_empty() {
        let arena = SceneArena::new();
        assert_eq!(arena.len(), 0);
        assert!(arena.is_empty());
    }

    #[test]
    fn insert_and_remove() {
        let mut arena = SceneArena::new();
        let id = arena.insert(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(arena.len(), 1);
        assert!(arena.get(id).is_some());

        let removed = arena.remove(id);
        assert!(removed.is_some());
        assert!(arena.is_empty());
    }

    #[test]
    fn remove_unknown_is_none() {
        let mut arena = SceneArena::new();
        assert!(arena.remove(EntityId::new()).is_none());
    }

    #[test]
    fn sequence_is_monotonic_and_never_reused() {
        let mut arena = SceneArena::new();
        let a = arena.insert(Rect::default());
        let b = arena.insert(Rect::default());
        let seq_a = arena.get(a).unwrap().seq;
        let seq_b = arena.get(b).unwrap().seq;
        assert!(seq_a < seq_b);

        arena.remove(a);
        let c = arena.insert(Rect::default());
        assert!(arena.get(c).unwrap().seq > seq_b);
    }

    #[test]
    fn set_bounds_and_position() {
        let mut arena = SceneArena::new();
        let id = arena.insert(Rect::new(0.0, 0.0, 4.0, 4.0));

        assert!(arena.set_position(id, Vec2::new(10.0, 20.0)));
        let b = arena.bounds(id).unwrap();
        assert_eq!(b.x, 10.0);
        assert_eq!(b.y, 20.0);
        assert_eq!(b.width, 4.0);

        assert!(arena.set_bounds(id, Rect::new(1.0, 1.0, 8.0, 8.0)));
        assert_eq!(arena.bounds(id).unwrap().width, 8.0);

        assert!(!arena.set_position(EntityId::new(), Vec2::ZERO));
    }

    #[test]
    fn iteration_is_deterministic() {
        let mut arena = SceneArena::new();
        for _ in 0..50 {
            arena.insert(Rect::default());
        }
        let keys: Vec<EntityId> = arena.records().keys().copied().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }
}
