use shared::domain::GamePhase;

use crate::{manager::AudioManager, sink::AudioSink};

/// Session owner of the [`AudioManager`].
///
/// Built once per session and kept across UI rebuilds; dropping it tears the
/// player down.
pub struct SoundController<S: AudioSink> {
    manager: AudioManager<S>,
    has_interacted: bool,
    synced_music_enabled: Option<bool>,
}

impl<S: AudioSink> SoundController<S> {
    pub fn new(manager: AudioManager<S>) -> Self {
        Self {
            manager,
            has_interacted: false,
            synced_music_enabled: None,
        }
    }

    pub fn has_interacted(&self) -> bool {
        self.has_interacted
    }

    pub fn manager(&self) -> &AudioManager<S> {
        &self.manager
    }

    /// Hook for click, touch and key events; only the first one matters.
    pub fn on_user_gesture(&mut self) {
        if self.has_interacted {
            return;
        }
        self.has_interacted = true;
        self.manager.unlock();
    }

    /// Applies the current route, death flag and music preference.
    pub fn sync(&mut self, route: &str, is_dead: bool, music_enabled: bool) -> GamePhase {
        if self.synced_music_enabled != Some(music_enabled) {
            self.synced_music_enabled = Some(music_enabled);
            self.manager.set_music_enabled(music_enabled);
        }
        let phase = GamePhase::from_route(route, is_dead);
        self.manager.switch_phase(phase);
        phase
    }

    pub fn on_track_ended(&mut self) {
        self.manager.on_track_ended();
    }
}

impl<S: AudioSink> Drop for SoundController<S> {
    fn drop(&mut self) {
        self.manager.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests_support::RecordingSink;

    #[test]
    fn first_gesture_unlocks_once() {
        let mut controller = SoundController::new(AudioManager::new(RecordingSink::default()));
        controller.sync("/", false, true);
        assert!(!controller.manager().sink().is_audible());

        controller.on_user_gesture();
        controller.on_user_gesture();

        assert!(controller.has_interacted());
        assert!(controller.manager().sink().is_audible());
    }

    #[test]
    fn sync_derives_phase_from_route_and_death_flag() {
        let mut controller = SoundController::new(AudioManager::new(RecordingSink::default()));
        assert_eq!(controller.sync("/", false, true), GamePhase::Intro);
        assert_eq!(controller.sync("/game", false, true), GamePhase::Gameplay);
        assert_eq!(controller.sync("/game", true, true), GamePhase::Death);
        assert_eq!(controller.sync("/leaderboard", true, true), GamePhase::Intro);
    }

    #[test]
    fn unchanged_music_preference_is_not_reapplied() {
        let mut controller = SoundController::new(AudioManager::new(RecordingSink::default()));
        controller.on_user_gesture();
        controller.sync("/", false, true);
        let plays = controller.manager().sink().play_calls;

        controller.sync("/", false, true);

        assert_eq!(controller.manager().sink().play_calls, plays);
    }
}
