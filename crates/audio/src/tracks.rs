use shared::domain::GamePhase;

// "Dark Ambient Music and Textures" by DDmyzik (2019), via the Internet Archive.
const INTRO_TRACK: &str = "https://archive.org/download/darkambient_201908/Crime.mp3";
const GAMEPLAY_TRACKS: [&str; 2] = [
    "https://archive.org/download/darkambient_201908/Documentary%20Dark.mp3",
    "https://archive.org/download/darkambient_201908/Universal%20Pain.mp3",
];
const DEATH_TRACK: &str = "https://archive.org/download/darkambient_201908/Gloomy.mp3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackList {
    pub intro: String,
    pub gameplay: Vec<String>,
    pub death: String,
}

impl Default for TrackList {
    fn default() -> Self {
        Self {
            intro: INTRO_TRACK.to_string(),
            gameplay: GAMEPLAY_TRACKS.iter().map(|t| t.to_string()).collect(),
            death: DEATH_TRACK.to_string(),
        }
    }
}

impl TrackList {
    pub fn gameplay_track(&self, index: usize) -> Option<&str> {
        self.gameplay.get(index).map(String::as_str)
    }

    /// Track a phase starts on; gameplay always starts from the first entry.
    pub fn first_track(&self, phase: GamePhase) -> Option<&str> {
        match phase {
            GamePhase::Intro => Some(&self.intro),
            GamePhase::Gameplay => self.gameplay_track(0),
            GamePhase::Death => Some(&self.death),
        }
    }

    /// Index after `index` in the gameplay rotation.
    pub fn next_gameplay_index(&self, index: usize) -> usize {
        if self.gameplay.is_empty() {
            0
        } else {
            (index + 1) % self.gameplay.len()
        }
    }
}
