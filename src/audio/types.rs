//! Audio-related small types and handles.
//!
//! This module defines the commands sent to the audio thread, the
//! notifications it sends back, and the shared playback snapshot.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug)]
pub enum AudioCmd {
    /// Bind a new media source; playback is paused at position zero.
    /// Notifications raised for it carry `generation`.
    Load { locator: String, generation: u64 },
    /// Start or resume playback of the bound source.
    Play,
    /// Pause playback, keeping the position.
    Pause,
    /// Jump to an absolute position in the bound source.
    SeekTo(Duration),
    /// Set the output volume in `[0, 1]`.
    SetVolume(f32),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Notifications emitted by a player.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    /// Playback position advanced.
    TimeUpdate,
    /// The bound source played to its end.
    Ended,
}

/// A notification tagged with the source binding it was raised for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SourceEvent {
    pub generation: u64,
    pub event: PlayerEvent,
}

#[derive(Debug, Clone, Default)]
/// Runtime playback information shared between the audio thread and the player handle.
pub struct PlaybackInfo {
    /// Playback position in the bound source.
    pub elapsed: Duration,
    /// Length of the bound source, once known.
    pub duration: Option<Duration>,
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;

/// Failures inside the audio thread. None of them are fatal: they are
/// logged and playback degrades to silence.
#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    #[error("no audio output device: {0}")]
    NoOutputDevice(String),
    #[error("unsupported media locator {0:?}")]
    UnsupportedLocator(String),
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },
}
