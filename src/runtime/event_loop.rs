use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::app::App;
use crate::config;
use crate::library::{CatalogError, CatalogLoad};
use crate::ui::{self, Hitboxes};

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// The pending one-time catalog load; `None` once it has been applied.
    pub catalog_rx: Option<Receiver<CatalogLoad>>,
    /// Clickable regions laid out by the most recent draw.
    pub hitboxes: Hitboxes,
}

impl EventLoopState {
    pub fn new(catalog_rx: Receiver<CatalogLoad>) -> Self {
        Self {
            catalog_rx: Some(catalog_rx),
            hitboxes: Hitboxes::default(),
        }
    }
}

/// Main terminal event loop: applies the catalog load, dispatches player
/// notifications, draws, and routes input. Returns `Ok(())` when the user quits.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    state: &mut EventLoopState,
) -> anyhow::Result<()> {
    loop {
        poll_catalog(app, state);
        app.pump_player_events();

        let hitboxes = &mut state.hitboxes;
        terminal.draw(|f| *hitboxes = ui::draw(f, app, &settings.ui, &settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if handle_key_event(key, settings, app) {
                        break;
                    }
                }
                Event::Mouse(mouse) => handle_mouse_event(mouse, app, &state.hitboxes),
                _ => {}
            }
        }
    }

    Ok(())
}

/// Apply the catalog load once it has arrived.
pub(super) fn poll_catalog(app: &mut App, state: &mut EventLoopState) {
    let Some(rx) = state.catalog_rx.as_ref() else {
        return;
    };
    match rx.try_recv() {
        Ok(load) => {
            app.apply_catalog_load(load);
            state.catalog_rx = None;
        }
        Err(TryRecvError::Empty) => {}
        Err(TryRecvError::Disconnected) => {
            app.apply_catalog_load(Err(CatalogError::Interrupted));
            state.catalog_rx = None;
        }
    }
}

/// Handle a key press. Returns `true` when the user asked to quit.
pub(super) fn handle_key_event(key: KeyEvent, settings: &config::Settings, app: &mut App) -> bool {
    let scrub = settings.controls.scrub_seconds as f64;
    let step = settings.controls.volume_step;

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Enter => {
            let cursor = app.cursor;
            app.select_index(cursor);
        }
        KeyCode::Char(' ') | KeyCode::Char('p') => app.toggle_play(),
        KeyCode::Char('H') => app.seek_by(-scrub),
        KeyCode::Char('L') => app.seek_by(scrub),
        KeyCode::Char('-') => app.nudge_volume(-step),
        KeyCode::Char('+') | KeyCode::Char('=') => app.nudge_volume(step),
        _ => {}
    }
    false
}

/// Route a mouse event to whatever was drawn under it.
pub(super) fn handle_mouse_event(mouse: MouseEvent, app: &mut App, hitboxes: &Hitboxes) {
    let (column, row) = (mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(index) = hitboxes.list_index_at(column, row) {
                let Some(id) = app.tracks().get(index).map(|t| t.id.clone()) else {
                    return;
                };
                app.cursor = index;
                app.select_track(&id);
            } else if ui::hit(hitboxes.toggle, column, row).is_some() {
                app.toggle_play();
            } else if let Some(bar) = ui::hit(hitboxes.progress, column, row) {
                app.on_seek(ui::click_x(column), ui::bar_bounds(bar));
            } else if let Some(bar) = ui::hit(hitboxes.volume, column, row) {
                set_volume_from_click(app, column, bar);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if let Some(bar) = ui::hit(hitboxes.volume, column, row) {
                set_volume_from_click(app, column, bar);
            }
        }
        MouseEventKind::ScrollDown if hitboxes.list_index_at(column, row).is_some() => app.next(),
        MouseEventKind::ScrollUp if hitboxes.list_index_at(column, row).is_some() => app.prev(),
        _ => {}
    }
}

fn set_volume_from_click(app: &mut App, column: u16, bar: ratatui::layout::Rect) {
    if let Some(volume) = crate::app::volume_from_click(ui::click_x(column), ui::bar_bounds(bar)) {
        debug!(volume, "volume set from click");
        app.on_volume_change(volume);
    }
}
