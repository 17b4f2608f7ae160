// Menu Elements module
// Tab row, tabs, popup and items plus the element tree they render into

pub mod attrs;
pub mod item;
pub mod item_list;
pub mod tab;
pub mod tab_group;

pub use attrs::*;
pub use item::*;
pub use item_list::*;
pub use tab::*;
pub use tab_group::*;
