use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, info, warn};

use crate::config::AudioSettings;

use super::clock::Stopwatch;
use super::sink::{create_sink_at, locator_to_path, probe_duration};
use super::types::{AudioCmd, PlaybackHandle, PlayerError, PlayerEvent, SourceEvent};

/// State owned by the audio thread for the single bound source.
pub(super) struct Transport {
    /// `None` when no output device could be opened. Playback then runs on
    /// the clock alone and nothing is heard.
    stream: Option<OutputStream>,
    source: Option<PathBuf>,
    sink: Option<Sink>,
    /// Binding the current source belongs to; every notification carries it.
    generation: u64,
    paused: bool,
    ended: bool,
    clock: Stopwatch,
    volume: f32,
    info: PlaybackHandle,
    events: Sender<SourceEvent>,
}

impl Transport {
    pub(super) fn new(
        stream: Option<OutputStream>,
        info: PlaybackHandle,
        events: Sender<SourceEvent>,
    ) -> Self {
        Self {
            stream,
            source: None,
            sink: None,
            generation: 0,
            paused: true,
            ended: false,
            clock: Stopwatch::default(),
            volume: 1.0,
            info,
            events,
        }
    }

    fn publish(&self) {
        if let Ok(mut info) = self.info.lock() {
            info.elapsed = self.clock.elapsed_at(Instant::now());
            info.duration = self.clock.limit();
        }
    }

    fn notify(&self, event: PlayerEvent) {
        // The handle may already be gone during shutdown.
        let _ = self.events.send(SourceEvent {
            generation: self.generation,
            event,
        });
    }

    fn build_sink(&self, path: &Path, start_at: Duration) -> Option<Sink> {
        let Some(stream) = self.stream.as_ref() else {
            debug!(path = %path.display(), "no output stream; source bound silently");
            return None;
        };
        match create_sink_at(stream, path, start_at, self.volume) {
            Ok(sink) => Some(sink),
            Err(e) => {
                warn!(error = %e, "cannot prepare media source");
                None
            }
        }
    }

    fn stop_sink(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
    }

    pub(super) fn load(&mut self, locator: &str, generation: u64) {
        self.generation = generation;
        self.stop_sink();
        self.source = None;
        self.paused = true;
        self.ended = false;
        self.clock.reset(None);

        match locator_to_path(locator) {
            Ok(path) => {
                let duration = probe_duration(&path);
                self.bind(path, duration);
            }
            Err(e) => {
                warn!(error = %e, "cannot bind media source");
                self.publish();
            }
        }
    }

    /// Bind `path` paused at zero, with a length probed by the caller.
    pub(super) fn bind(&mut self, path: PathBuf, duration: Option<Duration>) {
        self.clock.reset(duration);
        self.sink = self.build_sink(&path, Duration::ZERO);
        debug!(path = %path.display(), ?duration, "source bound");
        self.source = Some(path);
        self.publish();
    }

    pub(super) fn play(&mut self) {
        let Some(path) = self.source.clone() else {
            return;
        };
        if self.ended {
            // Playing again after the end restarts from the top.
            self.ended = false;
            self.clock.reset(self.clock.limit());
            self.stop_sink();
            self.sink = self.build_sink(&path, Duration::ZERO);
        }
        // A source the device could not decode stays silent and still.
        if self.stream.is_some() && self.sink.is_none() {
            return;
        }

        if self.paused {
            if let Some(s) = self.sink.as_ref() {
                s.play();
            }
            self.paused = false;
            self.clock.start(Instant::now());
        }
        self.publish();
    }

    pub(super) fn pause(&mut self) {
        if !self.paused {
            if let Some(s) = self.sink.as_ref() {
                s.pause();
            }
            self.clock.stop(Instant::now());
            self.paused = true;
        }
        self.publish();
    }

    pub(super) fn seek_to(&mut self, position: Duration) {
        let Some(path) = self.source.clone() else {
            return;
        };
        let position = self.clock.jump_to(position, Instant::now());

        // Seeking rebuilds the sink and skips into the file.
        self.stop_sink();
        self.sink = self.build_sink(&path, position);
        self.ended = false;
        if !self.paused {
            if let Some(s) = self.sink.as_ref() {
                s.play();
            }
        }

        self.publish();
        self.notify(PlayerEvent::TimeUpdate);
    }

    pub(super) fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(s) = self.sink.as_ref() {
            s.set_volume(self.volume);
        }
    }

    pub(super) fn tick(&mut self) {
        if self.paused {
            return;
        }
        let now = Instant::now();
        let drained = match self.sink.as_ref() {
            Some(s) => s.empty(),
            None => self.clock.finished_at(now),
        };

        if drained {
            let end = self.clock.limit().unwrap_or_else(|| self.clock.elapsed_at(now));
            self.clock.stop(now);
            self.clock.jump_to(end, now);
            self.paused = true;
            self.ended = true;
            self.publish();
            self.notify(PlayerEvent::TimeUpdate);
            self.notify(PlayerEvent::Ended);
            return;
        }

        self.publish();
        self.notify(PlayerEvent::TimeUpdate);
    }

    fn quit(&mut self, fade_out_ms: u64) {
        if let Some(s) = self.sink.as_ref() {
            if !self.paused {
                fade_out_sink(s, self.volume, fade_out_ms);
            }
            s.stop();
        }
        self.sink = None;
        self.paused = true;
        self.clock.stop(Instant::now());
        self.publish();
    }
}

fn fade_out_sink(sink: &Sink, from: f32, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(from * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<SourceEvent>,
    playback_info: PlaybackHandle,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
                // but noisy for a TUI app.
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                let e = PlayerError::NoOutputDevice(e.to_string());
                warn!(error = %e, "running without audio output");
                None
            }
        };

        let mut transport = Transport::new(stream, playback_info, events);
        let tick = Duration::from_millis(audio_settings.tick_ms.max(1));
        let mut last_tick = Instant::now();

        loop {
            let wait = tick.saturating_sub(last_tick.elapsed());
            match rx.recv_timeout(wait) {
                Ok(cmd) => match cmd {
                    AudioCmd::Load {
                        locator,
                        generation,
                    } => transport.load(&locator, generation),
                    AudioCmd::Play => transport.play(),
                    AudioCmd::Pause => transport.pause(),
                    AudioCmd::SeekTo(position) => transport.seek_to(position),
                    AudioCmd::SetVolume(volume) => transport.set_volume(volume),
                    AudioCmd::Quit { fade_out_ms } => {
                        transport.quit(fade_out_ms);
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    transport.quit(0);
                    break;
                }
            }

            if last_tick.elapsed() >= tick {
                transport.tick();
                last_tick = Instant::now();
            }
        }
        info!("audio thread stopped");
    })
}
