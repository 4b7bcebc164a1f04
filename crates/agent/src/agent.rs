//! The chat protocol handler.

use std::{sync::Arc, time::Duration};

use tracing::{debug, error, info, warn};

use crate::{
    errors::{AgentResult, SuggestionError, TransportError},
    protocol::{AgentMessage, ChatAcknowledgement, ChatMessage, ContentItem},
    session::{SessionRegistry, SessionState},
    suggestion::{MoodCatalog, MoodSuggester},
    transport::Transport,
};

pub const DEFAULT_AGENT_NAME: &str = "DJAgent";
pub const DEFAULT_GREETING: &str = "Hi! Tell me how you feel!";
const APOLOGY: &str = "Sorry, something went wrong. Please try again.";

/// Mood agent: acknowledges every inbound chat message and answers mood text with a song.
#[derive(Clone)]
pub struct MoodAgent {
    name: String,
    greeting: String,
    suggester: Arc<dyn MoodSuggester>,
    sessions: SessionRegistry,
}

impl MoodAgent {
    pub fn new(name: impl Into<String>, suggester: Arc<dyn MoodSuggester>) -> Self {
        Self {
            name: name.into(),
            greeting: DEFAULT_GREETING.to_string(),
            suggester,
            sessions: SessionRegistry::default(),
        }
    }

    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.sessions = SessionRegistry::new(ttl);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn suggest(&self, text: &str) -> Result<String, SuggestionError> {
        self.suggester.suggest(text)
    }

    pub async fn session_state(&self, sender: &str) -> SessionState {
        self.sessions.state(sender).await
    }

    /// Dispatches an inbound envelope to the matching protocol handler.
    pub async fn receive(
        &self,
        transport: &dyn Transport,
        sender: &str,
        message: AgentMessage,
    ) -> AgentResult<()> {
        match message {
            AgentMessage::Chat(message) => self.on_message(transport, sender, &message).await,
            AgentMessage::Ack(ack) => {
                self.on_acknowledgement(sender, &ack);
                Ok(())
            }
        }
    }

    /// Handles one inbound chat message.
    ///
    /// The acknowledgement always goes out first. Every later send is still
    /// attempted when an earlier one fails; the first failure is returned once
    /// the message has been fully processed.
    pub async fn on_message(
        &self,
        transport: &dyn Transport,
        sender: &str,
        message: &ChatMessage,
    ) -> AgentResult<()> {
        let mut failures = SendFailures::default();

        let ack = ChatAcknowledgement::for_message(message);
        failures.record(transport.send(sender, AgentMessage::Ack(ack)).await);
        self.sessions.touch(sender).await;

        let mut started = false;
        for item in &message.content {
            match item {
                ContentItem::StartSession => {
                    let state = self.sessions.start(sender).await;
                    info!(sender, msg_id = %message.msg_id, ?state, "session started");
                    started = true;
                }
                ContentItem::EndSession => {
                    let state = self.sessions.end(sender).await;
                    info!(sender, msg_id = %message.msg_id, ?state, "session ended by correspondent");
                }
                ContentItem::Text { .. } => {}
            }
        }

        if started {
            let greeting = ChatMessage::text_reply(self.greeting.clone(), false);
            failures.record(transport.send(sender, AgentMessage::Chat(greeting)).await);
        }

        if let Some(text) = message.text() {
            let reply = match self.suggest(&text) {
                Ok(suggestion) => suggestion,
                Err(err) => {
                    error!(sender, msg_id = %message.msg_id, error = %err, "failed to compute suggestion");
                    format!("{APOLOGY} {err}")
                }
            };

            let reply = ChatMessage::text_reply(reply, true);
            let delivered = transport.send(sender, AgentMessage::Chat(reply)).await;
            if delivered.is_ok() {
                self.sessions.end(sender).await;
            }
            failures.record(delivered);
        }

        failures.into_result()
    }

    /// Acknowledgements are observed only.
    pub fn on_acknowledgement(&self, sender: &str, ack: &ChatAcknowledgement) {
        debug!(sender, acknowledged = %ack.acknowledged_msg_id, "received acknowledgement");
    }
}

impl Default for MoodAgent {
    fn default() -> Self {
        Self::new(DEFAULT_AGENT_NAME, Arc::new(MoodCatalog::default()))
    }
}

#[derive(Default)]
struct SendFailures {
    first: Option<TransportError>,
}

impl SendFailures {
    fn record(&mut self, result: Result<(), TransportError>) {
        if let Err(err) = result {
            warn!(recipient = %err.recipient, reason = %err.reason, "outbound send failed");
            self.first.get_or_insert(err);
        }
    }

    fn into_result(self) -> AgentResult<()> {
        match self.first {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}
