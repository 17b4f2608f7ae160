// UI module
// Layout, popups and the event loop of Persona Translate

pub mod app_view;
pub mod layout;
pub mod preview;
pub mod toast;

use anyhow::Result;
use crossterm::event;
use ratatui::{backend::Backend, Terminal};
use std::time::{Duration, SystemTime};

use crate::core::{App, EventHandler};

pub use app_view::render_app;
pub use layout::{split_main, BaseLayout, MainAreas};
pub use preview::{preview_lines, render_preview};
pub use toast::{render_toasts, Toast, ToastType};

/// Draw one frame, surfacing render errors from inside the draw closure
pub fn draw<B: Backend>(terminal: &mut Terminal<B>, app: &App) -> Result<()> {
    let mut outcome = Ok(());
    terminal.draw(|f| outcome = render_app(f, app))?;
    outcome
}

/// Run the main application event loop
pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.prune_toasts(SystemTime::now());
        draw(terminal, app)?;

        if event::poll(Duration::from_millis(100))? {
            let app_event = EventHandler::handle(event::read()?, app.input_mode());
            app.handle_event(app_event)?;
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
