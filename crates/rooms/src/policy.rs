use serde::{Deserialize, Serialize};

/// Shared playback policy for one room.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomPolicy {
    pub valence: f64,
    pub tempo: f64,
    pub count: usize,
}

impl RoomPolicy {
    pub fn playback_targets(&self) -> PlaybackTargets {
        PlaybackTargets {
            tempo_bpm: (self.tempo * 120.0 + 60.0).round() as u32,
            energy: self.tempo,
            valence: self.valence,
        }
    }
}

/// Policy expressed in player terms: beats per minute plus energy and valence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackTargets {
    pub tempo_bpm: u32,
    pub energy: f64,
    pub valence: f64,
}

/// Cache key under which a room's policy is published.
pub fn policy_key(room_id: &str) -> String {
    format!("room:{room_id}:policy")
}
