use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub agent: String,
    pub redis: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let redis = if state.blender().has_cache() {
        "connected"
    } else {
        "not connected"
    };

    tracing::info!("health check requested");
    Json(HealthResponse {
        status: "ok".to_string(),
        agent: state.agent().name().to_string(),
        redis: redis.to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

pub async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: format!(
            "{} is running! Use /emotion, /room/blend or /health.",
            state.agent().name()
        ),
    })
}
