use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::debug;

use crate::config::AudioSettings;

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, PlaybackHandle, PlaybackInfo, PlayerEvent, SourceEvent};

/// The playback capability driven by the app.
///
/// Times are in seconds. `duration` is `NaN` until the source's length is
/// known. Notifications are queued by the player and drained with
/// `poll_events`.
pub trait Player {
    /// Bind a new media source. Rebinding the same locator reloads it.
    fn set_source(&mut self, locator: &str);
    fn play(&mut self);
    fn pause(&mut self);
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, secs: f64);
    fn duration(&self) -> f64;
    fn volume(&self) -> f64;
    fn set_volume(&mut self, volume: f64);
    fn poll_events(&mut self) -> Vec<PlayerEvent>;
}

/// `Player` backed by a `rodio` sink on a dedicated audio thread.
pub struct RodioPlayer {
    tx: Sender<AudioCmd>,
    events: Receiver<SourceEvent>,
    playback: PlaybackHandle,
    /// Bumped on every `set_source`; notifications from older bindings are dropped.
    generation: u64,
    volume: f64,
    quit_fade_out: Duration,
    join: Option<JoinHandle<()>>,
}

impl RodioPlayer {
    pub fn new(audio_settings: AudioSettings) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (event_tx, event_rx) = mpsc::channel::<SourceEvent>();
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));
        let quit_fade_out = Duration::from_millis(audio_settings.quit_fade_out_ms);

        let audio_handle =
            spawn_audio_thread(rx, event_tx, playback_info.clone(), audio_settings);

        Self {
            tx,
            events: event_rx,
            playback: playback_info,
            generation: 0,
            volume: 1.0,
            quit_fade_out,
            join: Some(audio_handle),
        }
    }

    /// A player wired to caller-owned channels instead of an audio thread.
    #[cfg(test)]
    pub(super) fn detached(tx: Sender<AudioCmd>, events: Receiver<SourceEvent>) -> Self {
        Self {
            tx,
            events,
            playback: Arc::new(Mutex::new(PlaybackInfo::default())),
            generation: 0,
            volume: 1.0,
            quit_fade_out: Duration::ZERO,
            join: None,
        }
    }

    fn send(&self, cmd: AudioCmd) {
        if let Err(e) = self.tx.send(cmd) {
            debug!(cmd = ?e.0, "audio thread is gone; command dropped");
        }
    }
}

impl Player for RodioPlayer {
    fn set_source(&mut self, locator: &str) {
        // Reset the snapshot now so the previous source's clock is never read
        // against the new one.
        if let Ok(mut info) = self.playback.lock() {
            *info = PlaybackInfo::default();
        }
        self.generation = self.generation.wrapping_add(1);
        self.send(AudioCmd::Load {
            locator: locator.to_string(),
            generation: self.generation,
        });
    }

    fn play(&mut self) {
        self.send(AudioCmd::Play);
    }

    fn pause(&mut self) {
        self.send(AudioCmd::Pause);
    }

    fn current_time(&self) -> f64 {
        self.playback
            .lock()
            .map(|info| info.elapsed.as_secs_f64())
            .unwrap_or(0.0)
    }

    fn set_current_time(&mut self, secs: f64) {
        if !secs.is_finite() {
            return;
        }
        let position = Duration::from_secs_f64(secs.max(0.0));
        if let Ok(mut info) = self.playback.lock() {
            info.elapsed = position;
        }
        self.send(AudioCmd::SeekTo(position));
    }

    fn duration(&self) -> f64 {
        self.playback
            .lock()
            .ok()
            .and_then(|info| info.duration)
            .map_or(f64::NAN, |d| d.as_secs_f64())
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
        self.send(AudioCmd::SetVolume(volume as f32));
    }

    fn poll_events(&mut self) -> Vec<PlayerEvent> {
        let generation = self.generation;
        self.events
            .try_iter()
            .filter(|e| e.generation == generation)
            .map(|e| e.event)
            .collect()
    }
}

impl Drop for RodioPlayer {
    fn drop(&mut self) {
        self.send(AudioCmd::Quit {
            fade_out_ms: self.quit_fade_out.as_millis() as u64,
        });

        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
    }
}
