//! Emotion to playback profile lookup.

/// Valence and tempo of one emotion, stored in thousandths so blending stays exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmotionProfile {
    pub valence_milli: u32,
    pub tempo_milli: u32,
}

impl EmotionProfile {
    pub const fn new(valence_milli: u32, tempo_milli: u32) -> Self {
        Self {
            valence_milli,
            tempo_milli,
        }
    }

    pub fn valence(&self) -> f64 {
        f64::from(self.valence_milli) / 1000.0
    }

    pub fn tempo(&self) -> f64 {
        f64::from(self.tempo_milli) / 1000.0
    }
}

const EMOTION_PROFILES: &[(&str, EmotionProfile)] = &[
    ("happy", EmotionProfile::new(900, 800)),
    ("sad", EmotionProfile::new(200, 300)),
    ("angry", EmotionProfile::new(300, 900)),
    ("relaxed", EmotionProfile::new(700, 400)),
    ("hopeful", EmotionProfile::new(800, 600)),
    ("tired", EmotionProfile::new(400, 300)),
];

pub fn normalize_emotion(emotion: &str) -> String {
    emotion.trim().to_lowercase()
}

#[derive(Debug, Clone)]
pub struct EmotionTable {
    entries: Vec<(String, EmotionProfile)>,
}

impl EmotionTable {
    pub fn new<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, EmotionProfile)>,
        K: AsRef<str>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, profile)| (normalize_emotion(name.as_ref()), profile))
                .collect(),
        }
    }

    /// Looks up an already normalized emotion.
    pub fn profile(&self, emotion: &str) -> Option<EmotionProfile> {
        self.entries
            .iter()
            .find(|(name, _)| name == emotion)
            .map(|(_, profile)| *profile)
    }

    pub fn emotions(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl Default for EmotionTable {
    fn default() -> Self {
        Self::new(EMOTION_PROFILES.iter().copied())
    }
}
