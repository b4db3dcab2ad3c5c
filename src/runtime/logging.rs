use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use anyhow::{Context, anyhow};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Install the global `tracing` subscriber.
///
/// Output goes to the configured log file; without one, logging stays off so
/// nothing is written over the terminal UI. `PLAYDECK_LOG` overrides the
/// configured level with a full filter directive.
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<()> {
    let Some(path) = settings.file.as_deref() else {
        return Ok(());
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let filter = EnvFilter::try_from_env("PLAYDECK_LOG")
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("installing log subscriber: {e}"))
}
