//! Outbound delivery seam between the agent and whatever carries its messages.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::{errors::TransportError, protocol::AgentMessage};

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, recipient: &str, message: AgentMessage) -> Result<(), TransportError>;
}

/// A message handed to the transport, together with its addressee.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outbound {
    pub recipient: String,
    pub message: AgentMessage,
}

/// Transport that keeps every outbound message in send order.
#[derive(Clone, Default)]
pub struct BufferedTransport {
    sent: Arc<Mutex<Vec<Outbound>>>,
}

impl BufferedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<Outbound> {
        self.sent.lock().await.clone()
    }

    pub async fn drain(&self) -> Vec<Outbound> {
        std::mem::take(&mut *self.sent.lock().await)
    }
}

#[async_trait]
impl Transport for BufferedTransport {
    async fn send(&self, recipient: &str, message: AgentMessage) -> Result<(), TransportError> {
        self.sent.lock().await.push(Outbound {
            recipient: recipient.to_string(),
            message,
        });
        Ok(())
    }
}
