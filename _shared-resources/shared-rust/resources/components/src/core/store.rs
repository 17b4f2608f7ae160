// Menu Store
// Single-writer container for MenuState, shared with every element of the menu
//
// Usage:
//   let store = MenuStore::new(ElementId::generate("items"));
//   let handle = store.handle();          // handed to tabs, item list, items
//   handle.connect("Tab")?.dispatch(MenuAction::Open);

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::error::{MenuError, Result};
use super::ids::ElementId;
use super::state::{MenuAction, MenuState};

/// Owning side of the menu state. Held by the `TabsMenu` root.
#[derive(Debug, Clone)]
pub struct MenuStore {
    state: Rc<RefCell<MenuState>>,
}

impl MenuStore {
    pub fn new(items_id: ElementId) -> Self {
        Self {
            state: Rc::new(RefCell::new(MenuState::new(items_id))),
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> MenuState {
        self.state.borrow().clone()
    }

    /// Read the state without cloning it
    pub fn read<R>(&self, f: impl FnOnce(&MenuState) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Apply one transition. Transitions are applied one at a time, in call order.
    pub fn dispatch(&self, action: MenuAction) {
        let next = self.state.borrow().reduce(&action);
        let mut state = self.state.borrow_mut();
        if *state != next {
            tracing::trace!(?action, items_id = %next.items_id, "menu transition");
        }
        *state = next;
    }

    /// Non-owning handle for the menu's elements
    pub fn handle(&self) -> StoreHandle {
        StoreHandle {
            state: Rc::downgrade(&self.state),
        }
    }
}

/// Handle held by tabs, the item list and items. Stops working once the root is dropped.
#[derive(Debug, Clone)]
pub struct StoreHandle {
    state: Weak<RefCell<MenuState>>,
}

impl StoreHandle {
    /// A handle that was never attached to a menu
    pub fn detached() -> Self {
        Self { state: Weak::new() }
    }

    /// Reach the live store, failing fast when there is no menu root
    pub fn connect(&self, component: &'static str) -> Result<MenuStore> {
        self.state
            .upgrade()
            .map(|state| MenuStore { state })
            .ok_or(MenuError::NoMenuRoot { component })
    }

    pub fn is_attached(&self) -> bool {
        self.state.strong_count() > 0
    }
}

/// `close` callback handed out through render props and item events
#[derive(Debug, Clone)]
pub struct MenuCloser {
    store: StoreHandle,
}

impl MenuCloser {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    pub fn close(&self) -> Result<()> {
        self.store.connect("TabsMenu")?.dispatch(MenuAction::Close);
        Ok(())
    }
}
