//! Error types for room blending.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BlendError {
    #[error("{message}")]
    Validation { message: String },

    #[error("No valid emotions provided")]
    NoValidInput,
}

impl BlendError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// A cache call that did not complete. Never fatal to a blend.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("policy serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("cache unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum RoomError {
    #[error("Room not found")]
    RoomNotFound { room_id: String },

    #[error("User not in room")]
    MemberNotFound { room_id: String, user_id: String },

    #[error("{message}")]
    Validation { message: String },
}

impl RoomError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
