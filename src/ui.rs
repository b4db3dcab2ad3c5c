//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`. Drawing
//! reads the app state only; clicks are routed back through the `Hitboxes`
//! returned by `draw`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, BarBounds, CatalogStatus, is_known_duration};
use crate::config::{ControlsSettings, UiSettings};

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("j/k".to_string(), "up/down".to_string());
    map.insert("enter".to_string(), "play selected song".to_string());
    map.insert("space/p".to_string(), "play/pause".to_string());
    // H/L and -/+ are filled dynamically from config.
    map.insert("click".to_string(), "select/seek/volume".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text, incorporating scrub seconds and volume step.
fn controls_text(controls: &ControlsSettings) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = ["j/k", "enter", "space/p", "H/L", "-/+", "click", "q"];
    order
        .iter()
        .filter_map(|k| match *k {
            "H/L" => Some(format!("[H/L] seek -/+{}s", controls.scrub_seconds)),
            "-/+" => Some(format!(
                "[-/+] volume -/+{:.0}%",
                controls.volume_step * 100.0
            )),
            _ => CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v)),
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format seconds as `MM:SS`.
fn format_mmss(secs: f64) -> String {
    let secs = if secs.is_finite() { secs.max(0.0) as u64 } else { 0 };
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Everything the now-playing panel shows, derived from app state.
#[derive(Debug, Clone, PartialEq)]
pub struct NowPlayingView<'a> {
    pub title: &'a str,
    pub artist: &'a str,
    /// The track's artwork, or the configured default.
    pub artwork: &'a str,
    pub toggle_label: &'static str,
    pub progress_percent: f64,
    pub volume_level: f64,
    pub time_text: Option<String>,
}

/// Build the now-playing panel contents; `None` while no track is current.
pub fn now_playing_view<'a>(app: &'a App, ui: &'a UiSettings) -> Option<NowPlayingView<'a>> {
    let track = app.current_track()?;
    let playback = app.playback();
    let clock = app.clock();

    let time_text = if is_known_duration(clock.duration) {
        Some(format!(
            "{} / {}",
            format_mmss(clock.current_time),
            format_mmss(clock.duration)
        ))
    } else {
        None
    };

    Some(NowPlayingView {
        title: &track.title,
        artist: &track.artist,
        artwork: track.artwork.as_deref().unwrap_or(&ui.default_artwork),
        toggle_label: if playback.is_playing { "Pause" } else { "Play" },
        progress_percent: playback.progress_percent.clamp(0.0, 100.0),
        volume_level: playback.volume_level.clamp(0.0, 1.0),
        time_text,
    })
}

/// One label per catalog entry; the current track is marked by identity.
pub fn catalog_lines(app: &App) -> Vec<String> {
    let current = app.playback().current.as_ref();
    app.tracks()
        .iter()
        .map(|t| {
            let marker = if Some(&t.id) == current { "♪ " } else { "  " };
            format!("{marker}{}", t.display())
        })
        .collect()
}

/// Status line: catalog state, transport state and volume.
fn status_text(app: &App) -> String {
    let mut parts: Vec<String> = Vec::new();

    match app.catalog_status() {
        CatalogStatus::Loading => parts.push("Loading catalog…".to_string()),
        CatalogStatus::Ready => parts.push(format!("{} tracks", app.tracks().len())),
        CatalogStatus::Failed(msg) => parts.push(format!("Catalog unavailable: {msg}")),
    }

    let playback = app.playback();
    let state = match (&playback.current, playback.is_playing) {
        (None, _) => "Stopped",
        (Some(_), true) => "Playing",
        (Some(_), false) => "Paused",
    };
    parts.push(state.to_string());
    parts.push(format!("Volume: {:.0}%", playback.volume_level * 100.0));

    parts.join(" • ")
}

/// Visible slice of a list of `total` rows that keeps `selected` centered
/// when possible. Returns `(start, end, selected_pos_in_visible)`.
fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize, usize) {
    if total <= height || height == 0 {
        return (0, total, selected);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, selected - start)
}

/// Screen regions that react to mouse clicks, as laid out by the last draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hitboxes {
    /// Inner area of the catalog list.
    pub list: Rect,
    /// Catalog index of the first visible row.
    pub list_offset: usize,
    pub list_len: usize,
    pub toggle: Option<Rect>,
    pub progress: Option<Rect>,
    pub volume: Option<Rect>,
}

impl Hitboxes {
    /// Catalog index of the row at (`column`, `row`), if any.
    pub fn list_index_at(&self, column: u16, row: u16) -> Option<usize> {
        if !self.list.contains(Position::new(column, row)) {
            return None;
        }
        let index = self.list_offset + usize::from(row - self.list.y);
        (index < self.list_len).then_some(index)
    }
}

/// `area`, if it contains (`column`, `row`).
pub fn hit(area: Option<Rect>, column: u16, row: u16) -> Option<Rect> {
    area.filter(|r| r.contains(Position::new(column, row)))
}

/// Horizontal bounds of a bar for the transport math.
pub fn bar_bounds(area: Rect) -> BarBounds {
    BarBounds {
        left: f64::from(area.x),
        width: f64::from(area.width),
    }
}

/// Click position of a terminal column, taken at the middle of the cell.
pub fn click_x(column: u16) -> f64 {
    f64::from(column) + 0.5
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) -> Hitboxes {
    let mut hitboxes = Hitboxes::default();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" playdeck ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let status_par = Paragraph::new(status_text(app))
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[2]);

    draw_catalog(frame, app, body[0], &mut hitboxes);
    draw_now_playing(frame, app, ui_settings, body[1], &mut hitboxes);

    let footer = Paragraph::new(controls_text(controls_settings))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);

    hitboxes
}

fn draw_catalog(frame: &mut Frame, app: &App, area: Rect, hitboxes: &mut Hitboxes) {
    let block = Block::default().borders(Borders::ALL).title(" playlist ");
    let inner = block.inner(area);

    let lines = catalog_lines(app);
    let current = app.current_index();

    // Only build ListItems for the visible window.
    let total = lines.len();
    let (start, end, selected_pos_in_visible) =
        visible_window(total, usize::from(inner.height), app.cursor.min(total.saturating_sub(1)));

    let visible_items: Vec<ListItem> = lines[start..end]
        .iter()
        .enumerate()
        .map(|(offset, label)| {
            let item = ListItem::new(label.as_str());
            if current == Some(start + offset) {
                item.style(Style::default().add_modifier(Modifier::BOLD))
            } else {
                item
            }
        })
        .collect();

    let list = List::new(visible_items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(selected_pos_in_visible));
    }
    frame.render_stateful_widget(list, area, &mut state);

    hitboxes.list = inner;
    hitboxes.list_offset = start;
    hitboxes.list_len = total;
}

fn draw_now_playing(
    frame: &mut Frame,
    app: &App,
    ui_settings: &UiSettings,
    area: Rect,
    hitboxes: &mut Hitboxes,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" now playing ")
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(view) = now_playing_view(app, ui_settings) else {
        let placeholder = Paragraph::new(ui_settings.placeholder_text.as_str())
            .alignment(Alignment::Center)
            .italic()
            .wrap(Wrap { trim: true });
        frame.render_widget(placeholder, inner);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // artwork
            Constraint::Length(1),
            Constraint::Length(1), // title
            Constraint::Length(1), // artist
            Constraint::Length(1),
            Constraint::Length(1), // toggle
            Constraint::Length(1), // progress
            Constraint::Length(1), // time
            Constraint::Length(1), // volume
            Constraint::Min(0),
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw("Artwork: ").dim(),
            Span::raw(view.artwork),
        ])),
        rows[0],
    );
    frame.render_widget(Paragraph::new(view.title).bold(), rows[2]);
    frame.render_widget(Paragraph::new(view.artist), rows[3]);

    let toggle_text = format!("[ {} ]", view.toggle_label);
    let toggle_area = Rect {
        width: (toggle_text.chars().count() as u16).min(rows[5].width),
        ..rows[5]
    };
    frame.render_widget(Paragraph::new(toggle_text).reversed(), toggle_area);

    let progress = Gauge::default()
        .ratio(view.progress_percent / 100.0)
        .label(format!("{:.0}%", view.progress_percent))
        .use_unicode(true);
    frame.render_widget(progress, rows[6]);

    if let Some(time) = &view.time_text {
        frame.render_widget(Paragraph::new(time.as_str()).dim(), rows[7]);
    }

    let volume = Gauge::default()
        .ratio(view.volume_level)
        .label(format!("Volume {:.0}%", view.volume_level * 100.0))
        .use_unicode(true);
    frame.render_widget(volume, rows[8]);

    hitboxes.toggle = Some(toggle_area);
    hitboxes.progress = Some(rows[6]);
    hitboxes.volume = Some(rows[8]);
}
