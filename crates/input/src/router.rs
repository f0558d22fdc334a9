use glam::Vec2;
use std::collections::{BTreeSet, VecDeque};

/// Identifies one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Pointer buttons the event model distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// A raw 2D input event in world coordinates.
///
/// The host application translates window events into these; listeners never
/// see the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerPressed { position: Vec2, button: PointerButton },
    PointerReleased { position: Vec2, button: PointerButton },
    PointerMoved { position: Vec2 },
    KeyPressed { key: u32 },
    KeyReleased { key: u32 },
}

/// Listener registry with a pending-event queue.
#[derive(Debug, Default)]
pub struct InputRouter {
    next_id: u64,
    listeners: BTreeSet<ListenerId>,
    queue: VecDeque<InputEvent>,
    /// Last known pointer position, already camera-relative.
    pointer: Vec2,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener slot and return its id.
    pub fn add_listener(&mut self) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.insert(id);
        tracing::debug!(?id, "input listener added");
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let removed = self.listeners.remove(&id);
        if removed {
            tracing::debug!(?id, "input listener removed");
        }
        removed
    }

    pub fn has_listener(&self, id: ListenerId) -> bool {
        self.listeners.contains(&id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Queue an event for the next dispatch.
    pub fn push(&mut self, event: InputEvent) {
        if let InputEvent::PointerMoved { position }
        | InputEvent::PointerPressed { position, .. }
        | InputEvent::PointerReleased { position, .. } = event
        {
            self.pointer = position;
        }
        self.queue.push_back(event);
    }

    /// Drain all pending events in arrival order.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        self.queue.drain(..).collect()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Last pointer position seen, in world coordinates.
    pub fn pointer_position(&self) -> Vec2 {
        self.pointer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_remove_listener() {
        let mut router = InputRouter::new();
        let id = router.add_listener();
        assert!(router.has_listener(id));
        assert_eq!(router.listener_count(), 1);

        assert!(router.remove_listener(id));
        assert!(!router.remove_listener(id));
        assert_eq!(router.listener_count(), 0);
    }

    #[test]
    fn listener_ids_are_unique() {
        let mut router = InputRouter::new();
        let a = router.add_listener();
        router.remove_listener(a);
        let b = router.add_listener();
        assert_ne!(a, b);
    }

    #[test]
    fn events_drain_in_order() {
        let mut router = InputRouter::new();
        router.push(InputEvent::KeyPressed { key: 1 });
        router.push(InputEvent::KeyReleased { key: 1 });

        let events = router.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], InputEvent::KeyPressed { key: 1 });
        assert_eq!(router.pending(), 0);
    }

    #[test]
    fn pointer_position_tracks_motion() {
        let mut router = InputRouter::new();
        router.push(InputEvent::PointerMoved {
            position: Vec2::new(3.0, 4.0),
        });
        assert_eq!(router.pointer_position(), Vec2::new(3.0, 4.0));

        router.push(InputEvent::PointerPressed {
            position: Vec2::new(5.0, 6.0),
            button: PointerButton::Primary,
        });
        assert_eq!(router.pointer_position(), Vec2::new(5.0, 6.0));
    }
}
