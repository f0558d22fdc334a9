use std::collections::{BTreeSet, HashMap, HashSet};

use glint_common::{EntityId, Rect};
use glint_scene::SceneArena;

use crate::{CullingSystem, sort_by_sequence};

/// A 2D cell coordinate in the culling grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Grid-bucketed culling.
///
/// Tracked entities are bucketed into fixed-size cells at cull time; only the
/// cells the viewport overlaps are scanned, then candidates get a precise
/// bounds test. An entity spanning several cells appears in each of them, so
/// large objects are never missed.
pub struct ZoneCulling {
    cell_size: f32,
    registered: BTreeSet<EntityId>,
    cells: HashMap<CellCoord, Vec<EntityId>>,
}

impl ZoneCulling {
    /// Create a zone grid with the given cell size.
    pub fn new(cell_size: f32) -> Self {
        assert!(cell_size > 0.0, "cell_size must be positive");
        Self {
            cell_size,
            registered: BTreeSet::new(),
            cells: HashMap::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of non-empty cells after the last cull.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Cell range covered by a rectangle, inclusive.
    fn cell_span(&self, rect: &Rect) -> (CellCoord, CellCoord) {
        let min = CellCoord::new(
            (rect.x / self.cell_size).floor() as i32,
            (rect.y / self.cell_size).floor() as i32,
        );
        let max = CellCoord::new(
            ((rect.x + rect.width) / self.cell_size).floor() as i32,
            ((rect.y + rect.height) / self.cell_size).floor() as i32,
        );
        (min, max)
    }

    /// Rebuild all buckets from current arena bounds.
    ///
    /// Registration changes between culls are picked up here, which is what
    /// makes mid-frame add/remove consistent: a cull sees one coherent set.
    fn rebuild(&mut self, arena: &SceneArena) {
        self.cells.clear();
        for id in &self.registered {
            let Some(record) = arena.get(*id) else {
                continue;
            };
            let (min, max) = self.cell_span(&record.bounds);
            for cx in min.x..=max.x {
                for cy in min.y..=max.y {
                    self.cells
                        .entry(CellCoord::new(cx, cy))
                        .or_default()
                        .push(*id);
                }
            }
        }
    }
}

impl Default for ZoneCulling {
    /// 128-unit cells, a reasonable default for sprite-sized entities.
    fn default() -> Self {
        Self::new(128.0)
    }
}

impl CullingSystem for ZoneCulling {
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
        let _span = tracing::trace_span!("zone_cull").entered();
        self.rebuild(arena);

        let mut seen: HashSet<EntityId> = HashSet::new();
        let mut visible = Vec::new();

        let (min, max) = self.cell_span(&viewport);
        for cx in min.x..=max.x {
            for cy in min.y..=max.y {
                let Some(bucket) = self.cells.get(&CellCoord::new(cx, cy)) else {
                    continue;
                };
                for id in bucket {
                    if !seen.insert(*id) {
                        continue;
                    }
                    if let Some(record) = arena.get(*id) {
                        if record.bounds.intersects(&viewport) {
                            visible.push(*id);
                        }
                    }
                }
            }
        }

        sort_by_sequence(&mut visible, arena);
        tracing::trace!(
            candidates = seen.len(),
            visible = visible.len(),
            "zone cull complete"
        );
        visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_and_hidden_are_separated() {
        let mut arena = SceneArena::new();
        let a = arena.insert(Rect::new(10.0, 10.0, 20.0, 20.0));
        let b = arena.insert(Rect::new(500.0, 500.0, 20.0, 20.0));

        let mut zone = ZoneCulling::new(64.0);
        zone.register(a);
        zone.register(b);

        let visible = zone.cull(&arena, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(visible, vec![a]);
    }

    #[test]
    fn entity_spanning_many_cells_reported_once() {
        let mut arena = SceneArena::new();
        let big = arena.insert(Rect::new(-200.0, -200.0, 400.0, 400.0));

        let mut zone = ZoneCulling::new(32.0);
        zone.register(big);

        let visible = zone.cull(&arena, Rect::new(-50.0, -50.0, 100.0, 100.0));
        assert_eq!(visible, vec![big]);
    }

    #[test]
    fn unregister_excludes_from_cull() {
        let mut arena = SceneArena::new();
        let id = arena.insert(Rect::new(0.0, 0.0, 10.0, 10.0));

        let mut zone = ZoneCulling::new(64.0);
        zone.register(id);
        assert!(zone.unregister(id));
        assert!(!zone.unregister(id));

        let visible = zone.cull(&arena, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!(visible.is_empty());
    }

    #[test]
    fn stale_id_without_record_is_skipped() {
        let arena = SceneArena::new();
        let mut zone = ZoneCulling::new(64.0);
        zone.register(EntityId::new());

        let visible = zone.cull(&arena, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!(visible.is_empty());
    }

    #[test]
    fn negative_coordinates_bucket_correctly() {
        let mut arena = SceneArena::new();
        let id = arena.insert(Rect::new(-40.0, -40.0, 10.0, 10.0));

        let mut zone = ZoneCulling::new(32.0);
        zone.register(id);

        let visible = zone.cull(&arena, Rect::new(-50.0, -50.0, 30.0, 30.0));
        assert_eq!(visible, vec![id]);
    }

    #[test]
    #[should_panic(expected = "cell_size must be positive")]
    fn zero_cell_size_panics() {
        let _ = ZoneCulling::new(0.0);
    }
}
