use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("playback blocked by autoplay policy")]
    Blocked,
    #[error("no source loaded")]
    NoSource,
    #[error("playback backend failure: {0}")]
    Backend(String),
}

/// A single media element: one source at a time, loop and mute flags, volume.
pub trait AudioSink {
    fn set_source(&mut self, url: &str);
    fn clear_source(&mut self);
    fn set_looping(&mut self, looping: bool);
    fn set_muted(&mut self, muted: bool);
    fn set_volume(&mut self, volume: f32);
    /// Start or resume playback. Hosts may refuse (e.g. no user gesture yet).
    fn play(&mut self) -> Result<(), PlaybackError>;
    fn pause(&mut self);
}

/// Sink without an output device; logs every command.
#[derive(Debug, Default)]
pub struct TracingSink {
    source: Option<String>,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioSink for TracingSink {
    fn set_source(&mut self, url: &str) {
        debug!(url, "audio: source");
        self.source = Some(url.to_string());
    }

    fn clear_source(&mut self) {
        debug!("audio: source cleared");
        self.source = None;
    }

    fn set_looping(&mut self, looping: bool) {
        debug!(looping, "audio: loop");
    }

    fn set_muted(&mut self, muted: bool) {
        debug!(muted, "audio: mute");
    }

    fn set_volume(&mut self, volume: f32) {
        debug!(volume, "audio: volume");
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        match &self.source {
            Some(url) => {
                debug!(url = %url, "audio: play");
                Ok(())
            }
            None => Err(PlaybackError::NoSource),
        }
    }

    fn pause(&mut self) {
        debug!("audio: pause");
    }
}
