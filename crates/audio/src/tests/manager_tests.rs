use super::*;
use crate::tests_support::RecordingSink;

const PHASES: [GamePhase; 3] = [GamePhase::Intro, GamePhase::Gameplay, GamePhase::Death];

fn manager() -> AudioManager<RecordingSink> {
    AudioManager::new(RecordingSink::default())
}

#[test]
fn construction_sets_volume_and_loop() {
    let manager = manager();
    assert_eq!(manager.sink().volume, DEFAULT_VOLUME);
    assert!(manager.sink().looping);
    assert_eq!(manager.state().phase, None);
    assert!(manager.state().muted);
}

#[test]
fn repeated_phase_switch_only_applies_once() {
    let mut manager = manager();
    manager.switch_phase(GamePhase::Intro);
    let source_changes = manager.sink().source_changes;
    let play_calls = manager.sink().play_calls;

    manager.switch_phase(GamePhase::Intro);
    manager.switch_phase(GamePhase::Intro);

    assert_eq!(manager.sink().source_changes, source_changes);
    assert_eq!(manager.sink().play_calls, play_calls);
}

#[test]
fn unlock_twice_matches_unlock_once() {
    let mut once = manager();
    once.switch_phase(GamePhase::Intro);
    once.unlock();

    let mut twice = manager();
    twice.switch_phase(GamePhase::Intro);
    twice.unlock();
    twice.unlock();

    assert_eq!(once.state(), twice.state());
    assert_eq!(once.sink().play_calls, twice.sink().play_calls);
    assert_eq!(once.sink().is_audible(), twice.sink().is_audible());
}

#[test]
fn audible_iff_unlocked_and_enabled_preference_first() {
    for phase in PHASES {
        for unlocked in [false, true] {
            for enabled in [false, true] {
                let mut manager = manager();
                manager.set_music_enabled(enabled);
                manager.switch_phase(phase);
                if unlocked {
                    manager.unlock();
                }
                assert_eq!(
                    manager.sink().is_audible(),
                    unlocked && enabled,
                    "phase={phase:?} unlocked={unlocked} enabled={enabled}"
                );
                assert_eq!(manager.state().muted, !(unlocked && enabled));
            }
        }
    }
}

#[test]
fn audible_iff_unlocked_and_enabled_unlock_first() {
    for phase in PHASES {
        for enabled in [false, true] {
            let mut manager = manager();
            manager.unlock();
            manager.set_music_enabled(enabled);
            manager.switch_phase(phase);
            assert_eq!(manager.sink().is_audible(), enabled, "phase={phase:?}");
        }
    }
}

#[test]
fn toggling_music_pauses_and_resumes_after_unlock() {
    let mut manager = manager();
    manager.switch_phase(GamePhase::Gameplay);
    manager.unlock();
    assert!(manager.sink().is_audible());

    manager.set_music_enabled(false);
    assert!(!manager.sink().playing);

    manager.set_music_enabled(true);
    assert!(manager.sink().is_audible());
}

#[test]
fn disabling_before_unlock_keeps_silent_buffering() {
    let mut manager = manager();
    manager.switch_phase(GamePhase::Intro);
    assert!(manager.sink().playing);
    assert!(manager.sink().muted);

    manager.set_music_enabled(false);

    assert!(manager.sink().playing);
    assert!(manager.sink().muted);
}

#[test]
fn disabled_music_skips_playback_on_phase_switch() {
    let mut manager = manager();
    manager.set_music_enabled(false);
    manager.switch_phase(GamePhase::Death);
    assert_eq!(manager.sink().play_calls, 0);
    assert_eq!(
        manager.sink().source.as_deref(),
        TrackList::default().first_track(GamePhase::Death)
    );
}

#[test]
fn looping_follows_phase() {
    let mut manager = manager();
    manager.switch_phase(GamePhase::Gameplay);
    assert!(!manager.sink().looping);
    manager.switch_phase(GamePhase::Death);
    assert!(manager.sink().looping);
    manager.switch_phase(GamePhase::Intro);
    assert!(manager.sink().looping);
}

#[test]
fn gameplay_track_end_rotates_modulo_list_length() {
    let tracks = TrackList::default();
    let mut manager = manager();
    manager.unlock();
    manager.switch_phase(GamePhase::Gameplay);
    assert_eq!(manager.state().track_index, 0);

    manager.on_track_ended();
    assert_eq!(manager.state().track_index, 1);
    assert_eq!(manager.sink().source.as_deref(), tracks.gameplay_track(1));
    assert!(manager.sink().is_audible());

    manager.on_track_ended();
    assert_eq!(manager.state().track_index, 0);
    assert_eq!(manager.sink().source.as_deref(), tracks.gameplay_track(0));
}

#[test]
fn track_end_outside_gameplay_is_ignored() {
    let mut manager = manager();
    manager.switch_phase(GamePhase::Intro);
    let source_changes = manager.sink().source_changes;

    manager.on_track_ended();

    assert_eq!(manager.sink().source_changes, source_changes);
    assert_eq!(manager.state().track_index, 0);
}

#[test]
fn track_end_with_music_disabled_stays_silent() {
    let mut manager = manager();
    manager.set_music_enabled(false);
    manager.switch_phase(GamePhase::Gameplay);
    let play_calls = manager.sink().play_calls;

    manager.on_track_ended();

    assert!(!manager.sink().is_audible());
    assert_eq!(manager.sink().play_calls, play_calls);
    assert_eq!(manager.state().track_index, 0);

    manager.unlock();
    manager.on_track_ended();
    assert!(!manager.sink().is_audible());
}

#[test]
fn reentering_gameplay_restarts_rotation() {
    let mut manager = manager();
    manager.switch_phase(GamePhase::Gameplay);
    manager.on_track_ended();
    assert_eq!(manager.state().track_index, 1);

    manager.switch_phase(GamePhase::Death);
    manager.switch_phase(GamePhase::Gameplay);

    assert_eq!(manager.state().track_index, 0);
    assert_eq!(
        manager.sink().source.as_deref(),
        TrackList::default().gameplay_track(0)
    );
}

#[test]
fn destroy_stops_playback_and_forgets_phase() {
    let mut manager = manager();
    manager.unlock();
    manager.switch_phase(GamePhase::Intro);
    assert!(manager.sink().is_audible());

    manager.destroy();
    assert!(!manager.sink().playing);
    assert_eq!(manager.sink().source, None);
    assert_eq!(manager.state().phase, None);

    manager.switch_phase(GamePhase::Intro);
    assert_eq!(
        manager.sink().source.as_deref(),
        TrackList::default().first_track(GamePhase::Intro)
    );
    assert!(manager.sink().is_audible());
}

#[test]
fn rejected_play_does_not_change_state() {
    let mut manager = AudioManager::new(RecordingSink::rejecting());
    manager.switch_phase(GamePhase::Intro);
    manager.unlock();

    let state = manager.state();
    assert_eq!(state.phase, Some(GamePhase::Intro));
    assert!(state.unlocked);
    assert!(!state.muted);
    assert!(!manager.sink().playing);
    assert_eq!(manager.sink().play_calls, 2);
}
