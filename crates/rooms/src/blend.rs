//! Deterministic blending of per-user emotions into one room policy.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    cache::PolicyCache,
    emotion::{normalize_emotion, EmotionTable},
    errors::{BlendError, CacheError},
    policy::{policy_key, RoomPolicy},
};

pub const MISSING_INPUT_MESSAGE: &str = "roomId and userEmotions[] required";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEmotion {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub emotion: String,
}

impl UserEmotion {
    pub fn new(user_id: impl Into<String>, emotion: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            emotion: emotion.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlendOutcome {
    pub room_id: String,
    pub policy: RoomPolicy,
    /// Whether the policy reached the shared cache.
    #[serde(skip)]
    pub published: bool,
}

/// Averages the recognized emotions. Unknown emotions are left out of both the
/// sums and the count.
///
/// Sums run over integer thousandths, so the result does not depend on input order.
pub fn compute_policy(table: &EmotionTable, entries: &[UserEmotion]) -> Result<RoomPolicy, BlendError> {
    let mut valence_sum: u64 = 0;
    let mut tempo_sum: u64 = 0;
    let mut count: u64 = 0;

    for entry in entries {
        let emotion = normalize_emotion(&entry.emotion);
        match table.profile(&emotion) {
            Some(profile) => {
                valence_sum += u64::from(profile.valence_milli);
                tempo_sum += u64::from(profile.tempo_milli);
                count += 1;
            }
            None => warn!(user_id = %entry.user_id, emotion = %emotion, "unknown emotion"),
        }
    }

    if count == 0 {
        return Err(BlendError::NoValidInput);
    }

    Ok(RoomPolicy {
        valence: mean_to_unit(valence_sum, count),
        tempo: mean_to_unit(tempo_sum, count),
        count: count as usize,
    })
}

/// Mean of thousandths rounded to a whole thousandth, ties to even, as a unit value.
fn mean_to_unit(sum_milli: u64, count: u64) -> f64 {
    let (quotient, remainder) = (sum_milli / count, sum_milli % count);
    let round_up = 2 * remainder > count || (2 * remainder == count && quotient % 2 == 1);
    let rounded = if round_up { quotient + 1 } else { quotient };
    rounded as f64 / 1000.0
}

/// Blends room emotions and publishes the result under last-write-wins.
#[derive(Clone)]
pub struct RoomBlender {
    table: EmotionTable,
    cache: Option<Arc<dyn PolicyCache>>,
}

impl RoomBlender {
    pub fn new(table: EmotionTable, cache: Option<Arc<dyn PolicyCache>>) -> Self {
        if cache.is_none() {
            warn!("no policy cache configured, blended policies will not be published");
        }
        Self { table, cache }
    }

    pub fn has_cache(&self) -> bool {
        self.cache.is_some()
    }

    pub async fn blend(
        &self,
        room_id: &str,
        entries: &[UserEmotion],
    ) -> Result<BlendOutcome, BlendError> {
        if room_id.is_empty() || entries.is_empty() {
            return Err(BlendError::validation(MISSING_INPUT_MESSAGE));
        }

        let policy = compute_policy(&self.table, entries)?;
        let published = self.publish(room_id, &policy).await;

        Ok(BlendOutcome {
            room_id: room_id.to_string(),
            policy,
            published,
        })
    }

    /// Reads the last published policy for `room_id`, if any cache is configured.
    pub async fn published_policy(&self, room_id: &str) -> Result<Option<RoomPolicy>, CacheError> {
        let Some(cache) = &self.cache else {
            return Ok(None);
        };

        match cache.get(&policy_key(room_id)).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn publish(&self, room_id: &str, policy: &RoomPolicy) -> bool {
        let key = policy_key(room_id);
        let Some(cache) = &self.cache else {
            warn!(%key, "policy cache unavailable, skipping cache write");
            return false;
        };

        let result = match serde_json::to_string(policy) {
            Ok(value) => cache.set(&key, &value).await,
            Err(err) => Err(CacheError::from(err)),
        };

        match result {
            Ok(()) => {
                info!(%key, valence = policy.valence, tempo = policy.tempo, count = policy.count, "stored blended policy");
                true
            }
            Err(err) => {
                warn!(%key, error = %err, "failed to store blended policy");
                false
            }
        }
    }
}

impl Default for RoomBlender {
    fn default() -> Self {
        Self::new(EmotionTable::default(), None)
    }
}
