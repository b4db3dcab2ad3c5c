use std::fmt;

use serde::Deserialize;

/// Stable identity of a catalog entry.
///
/// Catalog files use either numbers or strings for ids; the two are kept
/// distinct, so `1` and `"1"` are different tracks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum TrackId {
    Number(i64),
    Text(String),
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s:?}"),
        }
    }
}

/// A single catalog entry. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    #[serde(default)]
    pub artist: String,
    /// Playable media locator: a filesystem path or a `file://` URI.
    pub file: String,
    #[serde(default)]
    pub artwork: Option<String>,
}

impl Track {
    /// One-line label used by the catalog list.
    pub fn display(&self) -> String {
        let artist = self.artist.trim();
        if artist.is_empty() {
            self.title.clone()
        } else {
            format!("{} · {}", self.title, artist)
        }
    }
}
