//! Audio subsystem: the `Player` capability and its `rodio` implementation.
//!
//! `RodioPlayer` owns a dedicated audio thread. The UI thread sends it
//! commands over a channel, reads the playback clock from a shared snapshot
//! and drains time-update / ended notifications from a second channel.

mod clock;
mod player;
mod sink;
mod thread;
mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use player::{Player, RodioPlayer};
pub use types::PlayerEvent;
