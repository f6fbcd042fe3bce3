use shared::domain::GamePhase;
use tracing::{debug, info};

use crate::{sink::AudioSink, tracks::TrackList};

pub const DEFAULT_VOLUME: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioPlayerState {
    pub phase: Option<GamePhase>,
    pub track_index: usize,
    pub unlocked: bool,
    pub music_enabled: bool,
    pub muted: bool,
}

/// Imperative soundtrack player.
///
/// Audible playback happens only once the session is unlocked by a user
/// gesture and music is enabled. Before the unlock the current track plays
/// muted so it is buffered by the time the user first interacts.
pub struct AudioManager<S: AudioSink> {
    sink: S,
    tracks: TrackList,
    current_phase: Option<GamePhase>,
    gameplay_index: usize,
    music_enabled: bool,
    unlocked: bool,
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S) -> Self {
        Self::with_tracks(sink, TrackList::default())
    }

    pub fn with_tracks(mut sink: S, tracks: TrackList) -> Self {
        sink.set_looping(true);
        sink.set_volume(DEFAULT_VOLUME);
        Self {
            sink,
            tracks,
            current_phase: None,
            gameplay_index: 0,
            music_enabled: true,
            unlocked: false,
        }
    }

    fn should_play(&self) -> bool {
        self.unlocked && self.music_enabled
    }

    pub fn state(&self) -> AudioPlayerState {
        AudioPlayerState {
            phase: self.current_phase,
            track_index: self.gameplay_index,
            unlocked: self.unlocked,
            music_enabled: self.music_enabled,
            muted: !self.should_play(),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Call from a user-gesture handler (click, touch, key press).
    pub fn unlock(&mut self) {
        if self.unlocked {
            return;
        }
        self.unlocked = true;
        info!(music_enabled = self.music_enabled, "audio: unlocked by user gesture");
        if self.music_enabled {
            // The phase track is already running silently.
            self.sink.set_muted(false);
            self.try_play();
        }
    }

    pub fn set_music_enabled(&mut self, enabled: bool) {
        self.music_enabled = enabled;
        if self.should_play() {
            self.sink.set_muted(false);
            self.try_play();
        } else if self.unlocked {
            self.sink.pause();
        }
    }

    pub fn switch_phase(&mut self, phase: GamePhase) {
        if self.current_phase == Some(phase) {
            return;
        }
        self.current_phase = Some(phase);

        if phase == GamePhase::Gameplay {
            self.gameplay_index = 0;
        }
        match self.tracks.first_track(phase) {
            Some(url) => self.sink.set_source(url),
            None => self.sink.clear_source(),
        }
        // Gameplay rotates through its list on track end instead of looping.
        self.sink.set_looping(phase != GamePhase::Gameplay);
        info!(?phase, "audio: phase switched");

        if self.should_play() {
            self.sink.set_muted(false);
            self.try_play();
        } else if self.music_enabled {
            self.sink.set_muted(true);
            self.try_play();
        }
    }

    /// Forwarded from the sink when the current track finishes.
    pub fn on_track_ended(&mut self) {
        if self.current_phase != Some(GamePhase::Gameplay) || !self.music_enabled {
            return;
        }
        self.gameplay_index = self.tracks.next_gameplay_index(self.gameplay_index);
        let Some(url) = self.tracks.gameplay_track(self.gameplay_index) else {
            return;
        };
        debug!(index = self.gameplay_index, url, "audio: next gameplay track");
        self.sink.set_source(url);
        self.try_play();
    }

    pub fn destroy(&mut self) {
        self.sink.pause();
        self.sink.clear_source();
        // A remounted controller must treat its first phase as a real change.
        self.current_phase = None;
    }

    fn try_play(&mut self) {
        if let Err(err) = self.sink.play() {
            debug!(error = %err, "audio: play attempt rejected");
        }
    }
}

#[cfg(test)]
#[path = "tests/manager_tests.rs"]
mod tests;
