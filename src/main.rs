// Persona Translate
// TUI front-end for translating text into a language and a personality

// IMPORTS ------------------>>

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{error, info};

use persona_translate::{load_and_validate_config, ui, App};

//--------------------------------------------------------<<

const LOG_ENV: &str = "PERSONA_TRANSLATE_LOG";
const DEFAULT_LOG_FILE: &str = "persona-translate.log";

// ┌──────────────────────────────────────────────────────────────────────────────────────────────────────────────────┐
// │                                                 MAIN ENTRY POINT                                                 │
// └──────────────────────────────────────────────────────────────────────────────────────────────────────────────────┘

fn main() -> Result<()> {
    init_tracing()?;

    // Load and validate configuration from YAML file
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = load_and_validate_config(config_path)?;
    let mut app = App::new(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!("started");
    let result = ui::run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        error!(%err, "exited with error");
    } else {
        info!("stopped");
    }
    result
}

/// Log to a file; the alternate screen owns stdout
fn init_tracing() -> Result<()> {
    let path = std::env::var(LOG_ENV).unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
    let file = File::create(&path).with_context(|| format!("Failed to create log file {path}"))?;

    let builder = tracing_subscriber::fmt()
        .compact()
        .with_ansi(false)
        .with_writer(Mutex::new(file));
    if let Ok(env_filter) = tracing_subscriber::EnvFilter::try_from_default_env() {
        builder.with_env_filter(env_filter).init();
    } else {
        builder.with_env_filter("info").init();
    }
    Ok(())
}
