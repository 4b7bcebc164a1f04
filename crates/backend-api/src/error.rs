use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use moodmix_agent::{AgentError, SuggestionError};
use moodmix_rooms::{BlendError, RoomError};
use serde::Serialize;
use tracing::{error, warn};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<BlendError> for ApiError {
    fn from(error: BlendError) -> Self {
        warn!(error = %error, "blend rejected");
        Self::bad_request(error.to_string())
    }
}

impl From<RoomError> for ApiError {
    fn from(error: RoomError) -> Self {
        warn!(error = ?error, "room request rejected");
        match error {
            RoomError::RoomNotFound { .. } | RoomError::MemberNotFound { .. } => {
                Self::not_found(error.to_string())
            }
            RoomError::Validation { .. } => Self::bad_request(error.to_string()),
        }
    }
}

impl From<AgentError> for ApiError {
    fn from(error: AgentError) -> Self {
        error!(error = ?error, "agent delivery error");
        Self::bad_gateway(error.to_string())
    }
}

impl From<SuggestionError> for ApiError {
    fn from(error: SuggestionError) -> Self {
        error!(error = ?error, "suggestion error");
        Self::internal_server_error(error.to_string())
    }
}
