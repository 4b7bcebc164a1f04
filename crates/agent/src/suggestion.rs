//! Mood keyword to song suggestion lookup.

use tracing::info;

use crate::errors::SuggestionError;

const MOOD_SUGGESTIONS: &[(&str, &str)] = &[
    ("happy", "Upbeat Pop Tune"),
    ("sad", "Soft Piano Melody"),
    ("angry", "Heavy Rock Riff"),
    ("relaxed", "Lo-Fi Chill Beats"),
    ("hopeful", "Ambient Synth Track"),
    ("tired", "Gentle Acoustic Song"),
];

pub const UNKNOWN_MOOD_GUIDANCE: &str =
    "I'm not sure what that mood means yet, try 'happy', 'sad', or 'relaxed'!";

/// Anything able to turn free mood text into a reply for the user.
pub trait MoodSuggester: Send + Sync {
    fn suggest(&self, text: &str) -> Result<String, SuggestionError>;
}

/// Trims and lowercases a mood keyword.
pub fn normalize_mood(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Fixed mood catalogue, immutable once constructed.
#[derive(Debug, Clone)]
pub struct MoodCatalog {
    entries: Vec<(String, String)>,
}

impl MoodCatalog {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(mood, track)| (normalize_mood(&mood.into()), track.into()))
                .collect(),
        }
    }

    pub fn track_for(&self, mood: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == mood)
            .map(|(_, track)| track.as_str())
    }

    pub fn moods(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Pure lookup: the canned recommendation for a known mood, guidance otherwise.
    pub fn suggestion_for(&self, text: &str) -> String {
        let mood = normalize_mood(text);
        let suggestion = match self.track_for(&mood) {
            Some(track) => format!("For your {mood} mood, I recommend: {track}"),
            None => UNKNOWN_MOOD_GUIDANCE.to_string(),
        };

        info!(emotion = %mood, suggestion = %suggestion, "handled emotion");
        suggestion
    }
}

impl Default for MoodCatalog {
    fn default() -> Self {
        Self::new(MOOD_SUGGESTIONS.iter().copied())
    }
}

impl MoodSuggester for MoodCatalog {
    fn suggest(&self, text: &str) -> Result<String, SuggestionError> {
        Ok(self.suggestion_for(text))
    }
}
