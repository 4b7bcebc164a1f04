//! Error types for the mood agent.

use thiserror::Error;

/// Result type alias for agent operations
pub type AgentResult<T> = Result<T, AgentError>;

/// Failure reported by a [`crate::Transport`] when an outbound send does not go through.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to deliver message to {recipient}: {reason}")]
pub struct TransportError {
    pub recipient: String,
    pub reason: String,
}

impl TransportError {
    pub fn new(recipient: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            reason: reason.into(),
        }
    }
}

/// Fault raised while turning mood text into a suggestion.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SuggestionError {
    #[error("mood text could not be interpreted: {message}")]
    Interpretation { message: String },

    #[error("suggestion source unavailable: {message}")]
    Unavailable { message: String },
}

impl SuggestionError {
    pub fn interpretation(message: impl Into<String>) -> Self {
        Self::Interpretation {
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AgentError {
    /// Every outbound send was attempted; this carries the first one that failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}
