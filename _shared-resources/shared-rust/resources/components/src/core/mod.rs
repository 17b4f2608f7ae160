// Core infrastructure module
// Provides foundational systems that the menu elements depend on

pub mod error;
pub mod ids;
pub mod pointer;
pub mod rect_handle;
pub mod state;
pub mod store;

pub use error::{MenuError, Result};
pub use ids::{join_ids, ElementId};
pub use pointer::{PointerEvent, PointerHub, PointerKind, PointerSubscription};
pub use rect_handle::{RectMetrics, RectRegistry, SharedRegistry};
pub use state::{MenuAction, MenuState, OpenMode, ToggleState};
pub use store::{MenuCloser, MenuStore, StoreHandle};
