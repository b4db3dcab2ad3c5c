use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::thread;

use tracing::{debug, info, warn};

use super::model::{Track, TrackId};

/// Errors raised while reading the track catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse catalog {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("duplicate track id {0} in catalog")]
    DuplicateId(TrackId),
    #[error("catalog loader stopped before delivering a result")]
    Interrupted,
}

/// Outcome of the one-time catalog load.
pub type CatalogLoad = Result<Vec<Track>, CatalogError>;

/// Read and parse the catalog at `path`.
pub fn load_catalog(path: &Path) -> CatalogLoad {
    let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_catalog(&text, path)
}

/// Parse catalog JSON read from `origin`.
///
/// Relative `file` and `artwork` locators are resolved against the directory
/// containing `origin`. Order is preserved: it is the display order.
pub fn parse_catalog(text: &str, origin: &Path) -> CatalogLoad {
    let mut tracks: Vec<Track> =
        serde_json::from_str(text).map_err(|source| CatalogError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;

    let mut seen: HashSet<&TrackId> = HashSet::with_capacity(tracks.len());
    for t in &tracks {
        if !seen.insert(&t.id) {
            return Err(CatalogError::DuplicateId(t.id.clone()));
        }
    }

    let base = origin.parent().unwrap_or_else(|| Path::new(""));
    for t in &mut tracks {
        t.file = resolve_locator(base, &t.file);
        t.artwork = t
            .artwork
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|a| resolve_locator(base, a));
    }

    Ok(tracks)
}

/// Join a relative locator onto `base`; URIs and absolute paths pass through.
pub(crate) fn resolve_locator(base: &Path, locator: &str) -> String {
    if locator.contains("://") || Path::new(locator).is_absolute() || base.as_os_str().is_empty()
    {
        return locator.to_string();
    }
    base.join(locator).to_string_lossy().into_owned()
}

/// Load the catalog once on a background thread.
///
/// The result arrives on the returned receiver. If the receiver has been
/// dropped by then, the result is discarded.
pub fn spawn_catalog_load(path: PathBuf) -> Receiver<CatalogLoad> {
    let (tx, rx) = mpsc::channel::<CatalogLoad>();
    thread::spawn(move || {
        let result = load_catalog(&path);
        match &result {
            Ok(tracks) => info!(path = %path.display(), count = tracks.len(), "catalog loaded"),
            Err(e) => warn!(error = %e, "catalog load failed"),
        }
        if tx.send(result).is_err() {
            debug!("catalog receiver dropped; discarding late result");
        }
    });
    rx
}
