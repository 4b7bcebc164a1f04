use axum::{extract::State, Json};
use moodmix_agent::normalize_mood;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct EmotionRequest {
    #[serde(default)]
    pub emotion: String,
}

#[derive(Debug, Serialize)]
pub struct EmotionResponse {
    pub emotion: String,
    pub suggestion: String,
}

pub async fn suggest_for_emotion(
    State(state): State<AppState>,
    Json(payload): Json<EmotionRequest>,
) -> Result<Json<EmotionResponse>, ApiError> {
    let emotion = normalize_mood(&payload.emotion);
    let suggestion = state.agent().suggest(&emotion)?;

    info!(%emotion, %suggestion, "POST /emotion");
    Ok(Json(EmotionResponse {
        emotion,
        suggestion,
    }))
}
