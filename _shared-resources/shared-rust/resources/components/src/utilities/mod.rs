// Utilities module
// Styling helpers and small layout utilities

pub mod helpers;

pub use helpers::*;
