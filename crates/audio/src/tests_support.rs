use crate::sink::{AudioSink, PlaybackError};

/// Sink that mirrors media element state for assertions.
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    pub source: Option<String>,
    pub looping: bool,
    pub muted: bool,
    pub volume: f32,
    pub playing: bool,
    pub play_calls: usize,
    pub source_changes: usize,
    pub reject_plays: bool,
}

impl RecordingSink {
    pub fn rejecting() -> Self {
        Self {
            reject_plays: true,
            ..Self::default()
        }
    }

    pub fn is_audible(&self) -> bool {
        self.playing && !self.muted && self.source.is_some()
    }
}

impl AudioSink for RecordingSink {
    fn set_source(&mut self, url: &str) {
        self.source = Some(url.to_string());
        self.source_changes += 1;
        self.playing = false;
    }

    fn clear_source(&mut self) {
        self.source = None;
        self.playing = false;
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        self.play_calls += 1;
        if self.reject_plays {
            return Err(PlaybackError::Blocked);
        }
        if self.source.is_none() {
            return Err(PlaybackError::NoSource);
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }
}
