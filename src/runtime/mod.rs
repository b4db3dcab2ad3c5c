use std::env;
use std::path::PathBuf;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::audio::RodioPlayer;
use crate::library::spawn_catalog_load;

mod event_loop;
mod logging;
mod settings;

pub fn run() -> anyhow::Result<()> {
    let (mut settings, config_warning) = settings::load_settings();

    if let Some(path) = env::args_os().nth(1) {
        settings.catalog.path = PathBuf::from(path);
    }

    if let Err(e) = logging::init_logging(&settings.logging) {
        eprintln!("playdeck: logging disabled: {e:#}");
    }
    if let Some(msg) = config_warning {
        eprintln!("playdeck: {msg}");
        warn!("{msg}");
    }
    info!(catalog = %settings.catalog.path.display(), "starting playdeck");

    // The catalog arrives asynchronously; the UI starts with an empty list.
    let catalog_rx = spawn_catalog_load(settings.catalog.path.clone());
    let player = RodioPlayer::new(settings.audio.clone());
    let mut app = App::new(Box::new(player));

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState::new(catalog_rx);
    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &mut state);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    // Dropping the app stops the audio thread, fading out if configured.
    drop(app);
    info!("playdeck stopped");

    run_result
}

#[cfg(test)]
mod tests;
