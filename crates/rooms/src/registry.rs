//! In-memory room membership, feeding the blender with each member's latest mood.

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::info;

use crate::{blend::UserEmotion, errors::RoomError, policy::RoomPolicy};

/// Emotion assigned to members who have not reported a mood yet.
pub const DEFAULT_MEMBER_EMOTION: &str = "neutral";

#[derive(Debug, Clone)]
struct RoomState {
    members: Vec<UserEmotion>,
    policy: Option<RoomPolicy>,
    updated_at: DateTime<Utc>,
}

impl RoomState {
    fn new() -> Self {
        Self {
            members: Vec::new(),
            policy: None,
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    pub room_id: String,
    pub members: Vec<UserEmotion>,
    pub policy: Option<RoomPolicy>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Default)]
pub struct RoomRegistry {
    rooms: Arc<Mutex<HashMap<String, RoomState>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the room when needed and adds the user once. Returns the member count.
    pub async fn join(&self, room_id: &str, user_id: &str) -> Result<usize, RoomError> {
        if room_id.is_empty() || user_id.is_empty() {
            return Err(RoomError::validation("roomId and userId required"));
        }

        let mut guard = self.rooms.lock().await;
        let room = guard.entry(room_id.to_string()).or_insert_with(|| {
            info!(room_id, "created room");
            RoomState::new()
        });

        if !room.members.iter().any(|member| member.user_id == user_id) {
            room.members
                .push(UserEmotion::new(user_id, DEFAULT_MEMBER_EMOTION));
            room.updated_at = Utc::now();
            info!(room_id, user_id, "user joined room");
        }

        Ok(room.members.len())
    }

    /// Records a member's mood and returns the room's full member list for blending.
    pub async fn set_mood(
        &self,
        room_id: &str,
        user_id: &str,
        emotion: &str,
    ) -> Result<Vec<UserEmotion>, RoomError> {
        if emotion.trim().is_empty() {
            return Err(RoomError::validation("emotion required"));
        }

        let mut guard = self.rooms.lock().await;
        let room = guard
            .get_mut(room_id)
            .ok_or_else(|| RoomError::RoomNotFound {
                room_id: room_id.to_string(),
            })?;

        let member = room
            .members
            .iter_mut()
            .find(|member| member.user_id == user_id)
            .ok_or_else(|| RoomError::MemberNotFound {
                room_id: room_id.to_string(),
                user_id: user_id.to_string(),
            })?;

        member.emotion = emotion.to_string();
        room.updated_at = Utc::now();
        info!(room_id, user_id, emotion, "updated member mood");

        Ok(room.members.clone())
    }

    pub async fn record_policy(&self, room_id: &str, policy: RoomPolicy) {
        if let Some(room) = self.rooms.lock().await.get_mut(room_id) {
            room.policy = Some(policy);
            room.updated_at = Utc::now();
        }
    }

    pub async fn snapshot(&self, room_id: &str) -> Option<RoomSnapshot> {
        self.rooms
            .lock()
            .await
            .get(room_id)
            .map(|room| RoomSnapshot {
                room_id: room_id.to_string(),
                members: room.members.clone(),
                policy: room.policy,
                updated_at: room.updated_at,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn join_is_idempotent_per_user() {
        let registry = RoomRegistry::new();
        assert_eq!(registry.join("room_001", "u1").await.expect("join"), 1);
        assert_eq!(registry.join("room_001", "u1").await.expect("join"), 1);
        assert_eq!(registry.join("room_001", "u2").await.expect("join"), 2);

        let snapshot = registry.snapshot("room_001").await.expect("room exists");
        assert!(snapshot
            .members
            .iter()
            .all(|member| member.emotion == DEFAULT_MEMBER_EMOTION));
    }

    #[tokio::test]
    async fn set_mood_requires_room_and_membership() {
        let registry = RoomRegistry::new();
        assert!(matches!(
            registry.set_mood("missing", "u1", "happy").await,
            Err(RoomError::RoomNotFound { .. })
        ));

        registry.join("room_001", "u1").await.expect("join");
        assert!(matches!(
            registry.set_mood("room_001", "u9", "happy").await,
            Err(RoomError::MemberNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn set_mood_returns_all_members() {
        let registry = RoomRegistry::new();
        registry.join("room_001", "u1").await.expect("join");
        registry.join("room_001", "u2").await.expect("join");

        let members = registry
            .set_mood("room_001", "u2", "sad")
            .await
            .expect("mood updates");
        assert_eq!(
            members,
            vec![
                UserEmotion::new("u1", DEFAULT_MEMBER_EMOTION),
                UserEmotion::new("u2", "sad"),
            ]
        );
    }

    #[tokio::test]
    async fn record_policy_is_visible_in_snapshot() {
        let registry = RoomRegistry::new();
        registry.join("room_001", "u1").await.expect("join");
        let policy = RoomPolicy {
            valence: 0.9,
            tempo: 0.8,
            count: 1,
        };

        let joined_at = registry
            .snapshot("room_001")
            .await
            .map(|room| room.updated_at);
        registry.record_policy("room_001", policy).await;
        registry.record_policy("ghost", policy).await;

        let recorded_at = registry
            .snapshot("room_001")
            .await
            .map(|room| room.updated_at);
        assert!(recorded_at >= joined_at);

        assert_eq!(
            registry.snapshot("room_001").await.and_then(|room| room.policy),
            Some(policy)
        );
        assert!(registry.snapshot("ghost").await.is_none());
    }
}
