// Event Handling
// Application event types and handler infrastructure

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Where keyboard input goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Typing into the source text box
    Text,
    /// A menu holds keyboard focus
    Menu,
    /// The request preview is shown
    Preview,
}

/// Application events that can be handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Quit the application
    Quit,

    /// Build the request and show the preview
    Submit,

    /// Append a character to the source text
    Insert(char),

    /// Delete the last character
    Backspace,

    /// Clear the source text
    ClearText,

    /// Move focus to the next zone
    FocusNext,

    /// Move focus to the previous zone
    FocusPrev,

    /// Close open menus or the preview
    Back,

    /// Hand the event to the focused menu
    Menu(Event),

    /// Hand the event to every menu for pointer routing
    Pointer(Event),

    /// No operation
    None,
}

/// Event handler that converts terminal events to application events
pub struct EventHandler;

impl EventHandler {
    /// Convert a crossterm event to an application event
    pub fn handle(event: Event, mode: InputMode) -> AppEvent {
        match event {
            Event::Key(key) => Self::handle_key(key, mode),
            Event::Mouse(_) if mode == InputMode::Preview => AppEvent::None,
            Event::Mouse(_) => AppEvent::Pointer(event),
            _ => AppEvent::None,
        }
    }

    /// Handle keyboard events
    fn handle_key(key: KeyEvent, mode: InputMode) -> AppEvent {
        if key.kind != KeyEventKind::Press {
            return AppEvent::None;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => return AppEvent::Quit,
            _ => {}
        }

        match mode {
            InputMode::Preview => match key.code {
                KeyCode::Esc | KeyCode::Enter => AppEvent::Back,
                _ => AppEvent::None,
            },
            InputMode::Text => match key.code {
                KeyCode::Enter => AppEvent::Submit,
                KeyCode::Tab => AppEvent::FocusNext,
                KeyCode::BackTab => AppEvent::FocusPrev,
                KeyCode::Esc => AppEvent::Back,
                KeyCode::Backspace => AppEvent::Backspace,
                KeyCode::Char('u') if ctrl => AppEvent::ClearText,
                KeyCode::Char(c) if !ctrl => AppEvent::Insert(c),
                _ => AppEvent::None,
            },
            // Menus walk their own controls and report when focus leaves them
            InputMode::Menu => AppEvent::Menu(Event::Key(key)),
        }
    }
}
