use super::event_loop::{EventLoopState, handle_key_event, handle_mouse_event, poll_catalog};
use crate::app::App;
use crate::audio::fake::{FakePlayer, FakeState};
use crate::config::Settings;
use crate::library::{CatalogLoad, Track, TrackId};
use crate::ui::Hitboxes;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc;

fn t(id: i64) -> Track {
    Track {
        id: TrackId::Number(id),
        title: format!("Song {id}"),
        artist: "Band".into(),
        file: format!("/music/{id}.mp3"),
        artwork: None,
    }
}

fn loaded_app() -> (App, Rc<RefCell<FakeState>>) {
    let (player, state) = FakePlayer::new();
    let mut app = App::new(Box::new(player));
    app.apply_catalog_load(Ok(vec![t(1), t(2), t(3)]));
    (app, state)
}

fn hitboxes() -> Hitboxes {
    Hitboxes {
        list: Rect::new(1, 7, 30, 10),
        list_offset: 0,
        list_len: 3,
        toggle: Some(Rect::new(40, 12, 9, 1)),
        progress: Some(Rect::new(40, 13, 50, 1)),
        volume: Some(Rect::new(40, 15, 50, 1)),
    }
}

fn click(column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[test]
fn catalog_is_applied_once_it_arrives() {
    let (player, _state) = FakePlayer::new();
    let mut app = App::new(Box::new(player));
    let (tx, rx) = mpsc::channel::<CatalogLoad>();
    let mut state = EventLoopState::new(rx);

    poll_catalog(&mut app, &mut state);
    assert!(app.tracks().is_empty());
    assert!(state.catalog_rx.is_some());

    tx.send(Ok(vec![t(1), t(2)])).unwrap();
    poll_catalog(&mut app, &mut state);
    assert_eq!(app.tracks().len(), 2);
    assert!(state.catalog_rx.is_none());
}

#[test]
fn vanished_loader_is_reported_as_failure() {
    let (player, _state) = FakePlayer::new();
    let mut app = App::new(Box::new(player));
    let (tx, rx) = mpsc::channel::<CatalogLoad>();
    drop(tx);
    let mut state = EventLoopState::new(rx);

    poll_catalog(&mut app, &mut state);
    assert!(matches!(
        app.catalog_status(),
        crate::app::CatalogStatus::Failed(_)
    ));
    assert!(state.catalog_rx.is_none());
}

#[test]
fn clicking_a_row_selects_that_track() {
    let (mut app, state) = loaded_app();
    handle_mouse_event(click(3, 8), &mut app, &hitboxes());

    assert_eq!(app.playback().current, Some(TrackId::Number(2)));
    assert_eq!(app.cursor, 1);
    assert_eq!(state.borrow().source.as_deref(), Some("/music/2.mp3"));
}

#[test]
fn clicking_below_the_last_row_does_nothing() {
    let (mut app, state) = loaded_app();
    handle_mouse_event(click(3, 12), &mut app, &hitboxes());
    assert_eq!(app.playback().current, None);
    assert_eq!(state.borrow().source_loads, 0);
}

#[test]
fn clicking_the_toggle_pauses_and_resumes() {
    let (mut app, _state) = loaded_app();
    app.select_index(0);
    handle_mouse_event(click(42, 12), &mut app, &hitboxes());
    assert!(!app.playback().is_playing);
    handle_mouse_event(click(42, 12), &mut app, &hitboxes());
    assert!(app.playback().is_playing);
}

#[test]
fn clicking_the_progress_bar_seeks() {
    let (mut app, state) = loaded_app();
    app.select_index(0);
    state.borrow_mut().duration = 100.0;

    // Column 64 is cell 24 of a 50-cell bar; its centre sits at 49%.
    handle_mouse_event(click(64, 13), &mut app, &hitboxes());
    assert_eq!(app.playback().progress_percent, 49.0);
    assert_eq!(state.borrow().seeks, vec![49.0]);
}

#[test]
fn clicking_and_dragging_the_volume_bar_sets_volume() {
    let (mut app, state) = loaded_app();
    handle_mouse_event(click(40, 15), &mut app, &hitboxes());
    assert_eq!(app.playback().volume_level, 0.01);

    let drag = MouseEvent {
        kind: MouseEventKind::Drag(MouseButton::Left),
        ..click(89, 15)
    };
    handle_mouse_event(drag, &mut app, &hitboxes());
    assert_eq!(app.playback().volume_level, 0.99);
    assert_eq!(state.borrow().volume, 0.99);
}

#[test]
fn scrolling_over_the_list_moves_the_cursor() {
    let (mut app, _state) = loaded_app();
    let scroll = MouseEvent {
        kind: MouseEventKind::ScrollDown,
        ..click(3, 8)
    };
    handle_mouse_event(scroll, &mut app, &hitboxes());
    assert_eq!(app.cursor, 1);
}

#[test]
fn keys_drive_the_transport() {
    let settings = Settings::default();
    let (mut app, state) = loaded_app();

    assert!(!handle_key_event(key(KeyCode::Char('j')), &settings, &mut app));
    assert!(!handle_key_event(key(KeyCode::Enter), &settings, &mut app));
    assert_eq!(app.playback().current, Some(TrackId::Number(2)));
    assert!(app.playback().is_playing);

    handle_key_event(key(KeyCode::Char(' ')), &settings, &mut app);
    assert!(!app.playback().is_playing);

    {
        let mut s = state.borrow_mut();
        s.duration = 80.0;
        s.current_time = 50.0;
    }
    handle_key_event(key(KeyCode::Char('L')), &settings, &mut app);
    assert_eq!(state.borrow().seeks, vec![55.0]);
    assert_eq!(app.playback().progress_percent, 68.75);

    handle_key_event(key(KeyCode::Char('-')), &settings, &mut app);
    assert_eq!(app.playback().volume_level, 0.95);
}

#[test]
fn quit_keys_end_the_loop() {
    let settings = Settings::default();
    let (mut app, _state) = loaded_app();
    assert!(handle_key_event(key(KeyCode::Char('q')), &settings, &mut app));
    assert!(handle_key_event(
        KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        &settings,
        &mut app
    ));
}
