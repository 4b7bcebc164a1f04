use axum::{extract::State, Json};
use moodmix_agent::{AgentMessage, BufferedTransport, Outbound};
use serde::{Deserialize, Serialize};

use crate::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct InboxRequest {
    pub sender: String,
    pub message: AgentMessage,
}

#[derive(Debug, Serialize)]
pub struct InboxResponse {
    pub outbound: Vec<Outbound>,
}

/// Feeds one envelope to the agent and returns everything it sent in reply, in order.
pub async fn deliver(
    State(state): State<AppState>,
    Json(payload): Json<InboxRequest>,
) -> Result<Json<InboxResponse>, ApiError> {
    if payload.sender.trim().is_empty() {
        return Err(ApiError::bad_request("sender is required"));
    }

    let transport = BufferedTransport::new();
    state
        .agent()
        .receive(&transport, &payload.sender, payload.message)
        .await?;

    Ok(Json(InboxResponse {
        outbound: transport.drain().await,
    }))
}
