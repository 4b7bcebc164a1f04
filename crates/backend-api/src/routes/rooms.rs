use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use moodmix_rooms::{BlendOutcome, PlaybackTargets, RoomPolicy, UserEmotion};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{ApiError, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlendRequest {
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub user_emotions: Option<Vec<UserEmotion>>,
}

pub async fn blend_room(
    State(state): State<AppState>,
    Json(payload): Json<BlendRequest>,
) -> Result<Json<BlendOutcome>, ApiError> {
    let room_id = payload.room_id.unwrap_or_default();
    let entries = payload.user_emotions.unwrap_or_default();

    let outcome = state.blender().blend(&room_id, &entries).await?;
    state.rooms().record_policy(&room_id, outcome.policy).await;

    Ok(Json(outcome))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomRequest {
    pub room_id: String,
    pub user_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomResponse {
    pub room_id: String,
    pub user_id: String,
    pub user_count: usize,
}

pub async fn join_room(
    State(state): State<AppState>,
    Json(payload): Json<JoinRoomRequest>,
) -> Result<Json<JoinRoomResponse>, ApiError> {
    let user_count = state
        .rooms()
        .join(&payload.room_id, &payload.user_id)
        .await?;

    Ok(Json(JoinRoomResponse {
        room_id: payload.room_id,
        user_id: payload.user_id,
        user_count,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMoodRequest {
    pub room_id: String,
    pub user_id: String,
    pub emotion: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMoodResponse {
    pub ok: bool,
    pub room_id: String,
    pub user_id: String,
    pub emotion: String,
    pub policy: Option<RoomPolicy>,
}

/// Records the member's mood, then re-blends the whole room. A room whose
/// moods are all unrecognized keeps its previous policy.
pub async fn update_mood(
    State(state): State<AppState>,
    Json(payload): Json<UpdateMoodRequest>,
) -> Result<Json<UpdateMoodResponse>, ApiError> {
    let members = state
        .rooms()
        .set_mood(&payload.room_id, &payload.user_id, &payload.emotion)
        .await?;

    let policy = match state.blender().blend(&payload.room_id, &members).await {
        Ok(outcome) => {
            state
                .rooms()
                .record_policy(&payload.room_id, outcome.policy)
                .await;
            Some(outcome.policy)
        }
        Err(err) => {
            warn!(room_id = %payload.room_id, error = %err, "no policy for room");
            None
        }
    };

    Ok(Json(UpdateMoodResponse {
        ok: true,
        room_id: payload.room_id,
        user_id: payload.user_id,
        emotion: payload.emotion,
        policy,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPolicyQuery {
    pub room_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPolicyResponse {
    pub room_id: String,
    pub policy: Option<RoomPolicy>,
    pub targets: Option<PlaybackTargets>,
    pub user_count: usize,
    /// Last membership or policy change seen by this process.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Latest policy for a room: the shared cache first, the in-process registry otherwise.
pub async fn room_policy(
    State(state): State<AppState>,
    Query(query): Query<RoomPolicyQuery>,
) -> Result<Json<RoomPolicyResponse>, ApiError> {
    let room_id = query
        .room_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::bad_request("roomId is required"))?;

    let published = match state.blender().published_policy(&room_id).await {
        Ok(policy) => policy,
        Err(err) => {
            warn!(%room_id, error = %err, "failed to read published policy");
            None
        }
    };
    let snapshot = state.rooms().snapshot(&room_id).await;

    if published.is_none() && snapshot.is_none() {
        return Err(ApiError::not_found("Room not found"));
    }

    let user_count = snapshot.as_ref().map_or(0, |room| room.members.len());
    let updated_at = snapshot.as_ref().map(|room| room.updated_at);
    let policy = published.or_else(|| snapshot.and_then(|room| room.policy));

    Ok(Json(RoomPolicyResponse {
        room_id,
        policy,
        targets: policy.map(|policy| policy.playback_targets()),
        user_count,
        updated_at,
    }))
}
