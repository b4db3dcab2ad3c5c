//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the catalog, the playback
//! state and the player it drives.

mod model;

pub use model::*;
