// Core infrastructure module
// Application state, translator state and event handling

pub mod app;
pub mod events;
pub mod translator;

pub use app::{App, FocusZone, MenuBinding, MenuRole, INPUT_REGION};
pub use events::{AppEvent, EventHandler, InputMode};
pub use translator::{RequestStatus, TranslateRequest, TranslatorAction, TranslatorError, TranslatorState};
