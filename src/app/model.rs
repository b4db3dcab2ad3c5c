//! Application model types: `App`, `PlaybackState` and the transport math.
//!
//! `App` owns the catalog, the playback state and the `Player`. All state
//! changes go through its methods, which are called from the event loop one
//! event at a time.

use tracing::{debug, info, warn};

use crate::audio::{Player, PlayerEvent};
use crate::library::{CatalogLoad, Track, TrackId};

/// Where the one-time catalog load stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogStatus {
    Loading,
    Ready,
    Failed(String),
}

/// Transient playback state owned by the app.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    /// Identity of the current track; always present in the catalog.
    pub current: Option<TrackId>,
    pub is_playing: bool,
    /// Playback position as a percentage of the duration, in `[0, 100]`.
    pub progress_percent: f64,
    /// Output volume in `[0, 1]`, mirrored onto the player.
    pub volume_level: f64,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current: None,
            is_playing: false,
            progress_percent: 0.0,
            volume_level: 1.0,
        }
    }
}

/// Last clock reading taken from the player, kept for display.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlaybackClock {
    pub current_time: f64,
    pub duration: f64,
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self {
            current_time: 0.0,
            duration: f64::NAN,
        }
    }
}

/// Horizontal extent of a clickable bar, in the same units as click positions.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BarBounds {
    pub left: f64,
    pub width: f64,
}

/// A duration is usable for progress and seek math only when positive and finite.
pub fn is_known_duration(duration: f64) -> bool {
    duration.is_finite() && duration > 0.0
}

/// Progress percentage for `current_time` within `duration`, if the duration is known.
pub fn progress_from_times(current_time: f64, duration: f64) -> Option<f64> {
    if !is_known_duration(duration) || !current_time.is_finite() {
        return None;
    }
    Some(current_time / duration * 100.0)
}

/// Percentage of `bar` left of `click_x`, clamped to `[0, 100]`.
///
/// Returns `None` for a bar without width.
pub fn percent_from_click(click_x: f64, bar: BarBounds) -> Option<f64> {
    if !(bar.width > 0.0) || !click_x.is_finite() {
        return None;
    }
    let percent = (click_x - bar.left) / bar.width * 100.0;
    Some(percent.clamp(0.0, 100.0))
}

/// Volume level selected by a click on the volume bar.
pub fn volume_from_click(click_x: f64, bar: BarBounds) -> Option<f64> {
    percent_from_click(click_x, bar).map(|p| p / 100.0)
}

/// The main application model.
pub struct App {
    tracks: Vec<Track>,
    catalog_status: CatalogStatus,
    playback: PlaybackState,
    clock: PlaybackClock,
    /// Keyboard cursor into the catalog list.
    pub cursor: usize,
    player: Box<dyn Player>,
}

impl App {
    /// Create an app with an empty catalog that drives `player`.
    pub fn new(mut player: Box<dyn Player>) -> Self {
        let playback = PlaybackState::default();
        player.set_volume(playback.volume_level);

        Self {
            tracks: Vec::new(),
            catalog_status: CatalogStatus::Loading,
            playback,
            clock: PlaybackClock::default(),
            cursor: 0,
            player,
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn catalog_status(&self) -> &CatalogStatus {
        &self.catalog_status
    }

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    pub fn clock(&self) -> PlaybackClock {
        self.clock
    }

    pub fn current_index(&self) -> Option<usize> {
        let id = self.playback.current.as_ref()?;
        self.tracks.iter().position(|t| &t.id == id)
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current_index().map(|i| &self.tracks[i])
    }

    /// Apply the result of the catalog load.
    ///
    /// A successful load replaces the catalog wholesale. If the current track
    /// is not part of the new catalog, playback stops and the selection is
    /// cleared. A failed load leaves the catalog untouched.
    pub fn apply_catalog_load(&mut self, load: CatalogLoad) {
        match load {
            Ok(tracks) => {
                info!(count = tracks.len(), "catalog applied");
                self.tracks = tracks;
                self.catalog_status = CatalogStatus::Ready;
                self.cursor = self.cursor.min(self.tracks.len().saturating_sub(1));

                if self.playback.current.is_some() && self.current_index().is_none() {
                    debug!("current track left the catalog; clearing selection");
                    self.player.pause();
                    self.playback.current = None;
                    self.playback.is_playing = false;
                    self.playback.progress_percent = 0.0;
                    self.clock = PlaybackClock::default();
                }
            }
            Err(e) => {
                warn!(error = %e, "catalog unavailable");
                self.catalog_status = CatalogStatus::Failed(e.to_string());
            }
        }
    }

    /// Make the track with `id` current and start playing it from the top.
    ///
    /// Reselecting the current track restarts it. Returns `false` (and
    /// changes nothing) when `id` is not in the catalog.
    pub fn select_track(&mut self, id: &TrackId) -> bool {
        match self.tracks.iter().position(|t| &t.id == id) {
            Some(index) => self.select_index(index),
            None => {
                debug!(%id, "ignoring selection of unknown track");
                false
            }
        }
    }

    /// Positional form of `select_track`, as used by the list UI.
    pub fn select_index(&mut self, index: usize) -> bool {
        let Some(track) = self.tracks.get(index) else {
            return false;
        };
        info!(id = %track.id, title = %track.title, "track selected");

        self.player.set_source(&track.file);
        self.player.set_volume(self.playback.volume_level);
        self.player.play();

        self.playback.current = Some(track.id.clone());
        self.playback.is_playing = true;
        self.playback.progress_percent = 0.0;
        self.clock = PlaybackClock::default();
        self.cursor = index;
        true
    }

    /// Pause when playing, resume otherwise. No-op without a current track.
    pub fn toggle_play(&mut self) {
        if self.playback.current.is_none() {
            return;
        }
        if self.playback.is_playing {
            self.player.pause();
            self.playback.is_playing = false;
        } else {
            self.player.play();
            self.playback.is_playing = true;
        }
    }

    /// The player reached the end of the current track.
    ///
    /// Progress keeps its last reported value; the selection stays.
    pub fn on_track_ended(&mut self) {
        debug!("track ended");
        self.playback.is_playing = false;
    }

    /// Recompute progress from the player's clock.
    ///
    /// Skipped while the duration is unknown.
    pub fn on_time_update(&mut self) {
        let current_time = self.player.current_time();
        let duration = self.player.duration();
        if let Some(percent) = progress_from_times(current_time, duration) {
            self.playback.progress_percent = percent;
            self.clock = PlaybackClock {
                current_time,
                duration,
            };
        }
    }

    /// Seek to the position under `click_x` within the progress `bar`.
    pub fn on_seek(&mut self, click_x: f64, bar: BarBounds) {
        let Some(percent) = percent_from_click(click_x, bar) else {
            return;
        };
        self.seek_to_percent(percent);
    }

    /// Scrub by `delta_secs` from the current position.
    pub fn seek_by(&mut self, delta_secs: f64) {
        let duration = self.player.duration();
        if !is_known_duration(duration) {
            return;
        }
        let target = (self.player.current_time() + delta_secs).clamp(0.0, duration);
        self.seek_to_percent(target / duration * 100.0);
    }

    fn seek_to_percent(&mut self, percent: f64) {
        if self.playback.current.is_none() {
            return;
        }
        let duration = self.player.duration();
        if !is_known_duration(duration) {
            debug!("seek ignored; duration not known yet");
            return;
        }

        let was_playing = self.playback.is_playing;
        let target = percent / 100.0 * duration;

        self.playback.progress_percent = percent;
        self.clock = PlaybackClock {
            current_time: target,
            duration,
        };
        self.player.set_current_time(target);
        if was_playing {
            self.player.play();
        }
    }

    /// Set the volume level and mirror it onto the player.
    pub fn on_volume_change(&mut self, volume: f64) {
        if !volume.is_finite() {
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        self.playback.volume_level = volume;
        self.player.set_volume(volume);
    }

    /// Step the volume by `delta`.
    pub fn nudge_volume(&mut self, delta: f64) {
        // Round to the slider's 0.01 resolution so repeated steps stay clean.
        let next = ((self.playback.volume_level + delta) * 100.0).round() / 100.0;
        self.on_volume_change(next);
    }

    /// Dispatch everything the player has queued since the last call.
    pub fn pump_player_events(&mut self) {
        for event in self.player.poll_events() {
            match event {
                PlayerEvent::TimeUpdate => self.on_time_update(),
                PlayerEvent::Ended => self.on_track_ended(),
            }
        }
    }

    /// Move the cursor one entry down, wrapping around.
    pub fn next(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        self.cursor = (self.cursor + 1) % self.tracks.len();
    }

    /// Move the cursor one entry up, wrapping around.
    pub fn prev(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        self.cursor = if self.cursor == 0 {
            self.tracks.len() - 1
        } else {
            self.cursor - 1
        };
    }
}
