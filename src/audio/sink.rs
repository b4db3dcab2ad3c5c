//! Utilities for turning media locators into `rodio` sinks.
//!
//! The helpers here encapsulate locator parsing, opening/decoding a file,
//! probing its length and preparing a paused `Sink` at the requested start
//! position.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::AudioFile;
use rodio::{Decoder, OutputStream, Sink, Source};

use super::types::PlayerError;

/// Map a media locator to a local path. Plain paths are taken as-is and
/// `file://` URIs are percent-decoded; any other scheme is unsupported.
pub(super) fn locator_to_path(locator: &str) -> Result<PathBuf, PlayerError> {
    if let Some(rest) = locator.strip_prefix("file://") {
        let decoded = urlencoding::decode(rest)
            .map_err(|_| PlayerError::UnsupportedLocator(locator.to_string()))?;
        return Ok(PathBuf::from(decoded.into_owned()));
    }
    if locator.contains("://") || locator.trim().is_empty() {
        return Err(PlayerError::UnsupportedLocator(locator.to_string()));
    }
    Ok(PathBuf::from(locator))
}

fn open_decoder(path: &Path) -> Result<Decoder<BufReader<File>>, PlayerError> {
    let file = File::open(path).map_err(|source| PlayerError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Decoder::new(BufReader::new(file)).map_err(|source| PlayerError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Best-effort length of the media at `path`: tag properties first, then the
/// decoder's own estimate. Zero-length results count as unknown.
pub(super) fn probe_duration(path: &Path) -> Option<Duration> {
    let from_tags = lofty::read_from_path(path)
        .ok()
        .map(|tagged| tagged.properties().duration());

    from_tags
        .filter(|d| !d.is_zero())
        .or_else(|| open_decoder(path).ok().and_then(|d| d.total_duration()))
        .filter(|d| !d.is_zero())
}

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
    volume: f32,
) -> Result<Sink, PlayerError> {
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    let source = open_decoder(path)?.skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(volume);
    sink.append(source);
    sink.pause();
    Ok(sink)
}
