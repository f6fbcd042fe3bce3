//! Ambient soundtrack driven by the game phase.
//!
//! [`AudioManager`] owns every play/pause decision. Hosts feed it three
//! signals (gesture unlock, music preference, phase) and forward the sink's
//! "ended" notification; [`SoundController`] does that wiring for a session.

mod controller;
mod manager;
mod sink;
mod tracks;

pub use controller::SoundController;
pub use manager::{AudioManager, AudioPlayerState, DEFAULT_VOLUME};
pub use sink::{AudioSink, PlaybackError, TracingSink};
pub use tracks::TrackList;

#[cfg(test)]
mod tests_support;
