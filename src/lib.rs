// Persona Translate Library
// Terminal front-end for translating text into a language and a personality

// Configuration loading and validation
pub mod config;
pub mod config_validation;

// Core infrastructure - state and events
pub mod core;

// UI - layout, popups and the event loop
pub mod ui;

// Re-export commonly used items for convenience
pub use config::{load_config, AppConfig};
pub use config_validation::load_and_validate_config;
pub use core::{App, AppEvent, EventHandler, TranslateRequest, TranslatorState};
