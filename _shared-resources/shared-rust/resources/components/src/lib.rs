// Tabbed Menu component library
// An accessible disclosure menu: a row of trigger tabs sharing one popup item list

// Core infrastructure (store, ids, hit regions, pointer hub, errors)
pub mod core;
// GUI elements (tab group, tabs, item list, items)
pub mod elements;
// Root manager and YAML configuration
pub mod managers;
// Utilities and helpers
pub mod utilities;

// Re-export commonly used items
pub use core::*;
pub use elements::*;
pub use managers::*;
pub use utilities::*;
