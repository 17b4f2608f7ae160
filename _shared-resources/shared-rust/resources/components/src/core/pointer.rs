// Pointer events and listener hub
// Menu-wide pointer listeners (outside-click watchers) with RAII deregistration

use crossterm::event::{MouseEvent, MouseEventKind};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Kind of pointer interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    /// Mouse button pressed
    Down,
    /// Mouse button released
    Up,
    /// Pointer moved (with or without a button held)
    Moved,
    /// Touch contact started
    TouchStart,
}

/// A pointer event in terminal cell coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub column: u16,
    pub row: u16,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, column: u16, row: u16) -> Self {
        Self { kind, column, row }
    }

    pub fn down(column: u16, row: u16) -> Self {
        Self::new(PointerKind::Down, column, row)
    }

    pub fn moved(column: u16, row: u16) -> Self {
        Self::new(PointerKind::Moved, column, row)
    }

    /// Convert a crossterm mouse event. Scroll events have no pointer meaning here.
    pub fn from_mouse(event: &MouseEvent) -> Option<Self> {
        let kind = match event.kind {
            MouseEventKind::Down(_) => PointerKind::Down,
            MouseEventKind::Up(_) => PointerKind::Up,
            MouseEventKind::Moved | MouseEventKind::Drag(_) => PointerKind::Moved,
            _ => return None,
        };
        Some(Self::new(kind, event.column, event.row))
    }

    /// Presses are what outside-click watchers react to
    pub fn is_press(&self) -> bool {
        matches!(self.kind, PointerKind::Down | PointerKind::TouchStart)
    }
}

type Listener = Rc<RefCell<dyn FnMut(&PointerEvent)>>;
type ListenerList = RefCell<Vec<(u64, Listener)>>;

/// Broadcast list of pointer listeners scoped to one menu root
#[derive(Clone, Default)]
pub struct PointerHub {
    listeners: Rc<ListenerList>,
    next_id: Rc<Cell<u64>>,
}

impl std::fmt::Debug for PointerHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointerHub")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl PointerHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It stays registered until the returned subscription is dropped.
    pub fn subscribe(&self, listener: impl FnMut(&PointerEvent) + 'static) -> PointerSubscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let listener: Listener = Rc::new(RefCell::new(listener));
        self.listeners.borrow_mut().push((id, listener));
        PointerSubscription {
            id,
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    /// Deliver an event to every registered listener
    pub fn broadcast(&self, event: &PointerEvent) {
        // Snapshot so listeners may subscribe or unsubscribe while being called
        let snapshot: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in snapshot {
            (&mut *listener.borrow_mut())(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

/// Keeps a pointer listener registered; deregisters it on drop
#[derive(Debug)]
pub struct PointerSubscription {
    id: u64,
    listeners: Weak<ListenerList>,
}

impl Drop for PointerSubscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyModifiers, MouseButton};

    #[test]
    fn test_broadcast_reaches_listeners() {
        let hub = PointerHub::new();
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let _sub = hub.subscribe(move |_| counter.set(counter.get() + 1));

        hub.broadcast(&PointerEvent::down(1, 1));
        hub.broadcast(&PointerEvent::moved(2, 2));
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_drop_deregisters_listener() {
        let hub = PointerHub::new();
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let sub = hub.subscribe(move |_| counter.set(counter.get() + 1));
        assert_eq!(hub.listener_count(), 1);

        drop(sub);
        assert_eq!(hub.listener_count(), 0);
        hub.broadcast(&PointerEvent::down(0, 0));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_subscription_outliving_hub_is_harmless() {
        let hub = PointerHub::new();
        let sub = hub.subscribe(|_| {});
        drop(hub);
        drop(sub);
    }

    #[test]
    fn test_from_mouse() {
        let down = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 4,
            row: 2,
            modifiers: KeyModifiers::NONE,
        };
        let event = PointerEvent::from_mouse(&down).unwrap();
        assert_eq!(event, PointerEvent::down(4, 2));
        assert!(event.is_press());

        let scroll = MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        assert!(PointerEvent::from_mouse(&scroll).is_none());
    }
}
