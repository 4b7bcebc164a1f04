//! Wire types for the chat session protocol.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single content item carried by a [`ChatMessage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ContentItem {
    Text { text: String },
    StartSession,
    EndSession,
}

impl ContentItem {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

/// An immutable chat message exchanged between the agent and a correspondent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub timestamp: DateTime<Utc>,
    pub msg_id: Uuid,
    pub content: Vec<ContentItem>,
}

impl ChatMessage {
    pub fn new(content: Vec<ContentItem>) -> Self {
        Self {
            timestamp: Utc::now(),
            msg_id: Uuid::new_v4(),
            content,
        }
    }

    /// Builds a text reply, appending an end-session marker when `end_session` is set.
    pub fn text_reply(text: impl Into<String>, end_session: bool) -> Self {
        let mut content = vec![ContentItem::text(text)];
        if end_session {
            content.push(ContentItem::EndSession);
        }
        Self::new(content)
    }

    /// Concatenated text of every text item, or `None` when the result is empty.
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .content
            .iter()
            .filter_map(|item| match item {
                ContentItem::Text { text } => Some(text.as_str()),
                ContentItem::StartSession | ContentItem::EndSession => None,
            })
            .collect();

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    pub fn starts_session(&self) -> bool {
        self.content
            .iter()
            .any(|item| matches!(item, ContentItem::StartSession))
    }

    pub fn ends_session(&self) -> bool {
        self.content
            .iter()
            .any(|item| matches!(item, ContentItem::EndSession))
    }
}

/// Receipt for a [`ChatMessage`], correlated by message id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatAcknowledgement {
    pub timestamp: DateTime<Utc>,
    pub acknowledged_msg_id: Uuid,
}

impl ChatAcknowledgement {
    pub fn for_message(message: &ChatMessage) -> Self {
        Self {
            timestamp: Utc::now(),
            acknowledged_msg_id: message.msg_id,
        }
    }
}

/// Envelope for everything that travels over the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "body", rename_all = "lowercase")]
pub enum AgentMessage {
    Chat(ChatMessage),
    Ack(ChatAcknowledgement),
}

impl AgentMessage {
    pub fn as_chat(&self) -> Option<&ChatMessage> {
        match self {
            Self::Chat(message) => Some(message),
            Self::Ack(_) => None,
        }
    }

    pub fn as_ack(&self) -> Option<&ChatAcknowledgement> {
        match self {
            Self::Ack(ack) => Some(ack),
            Self::Chat(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn content_items_use_kebab_case_tags() {
        let message = ChatMessage::new(vec![
            ContentItem::StartSession,
            ContentItem::text("sad"),
            ContentItem::EndSession,
        ]);
        let value = serde_json::to_value(&message).expect("message serialises");

        assert_eq!(
            value["content"],
            json!([
                {"type": "start-session"},
                {"type": "text", "text": "sad"},
                {"type": "end-session"}
            ])
        );
    }

    #[test]
    fn text_concatenates_text_items_and_skips_markers() {
        let message = ChatMessage::new(vec![
            ContentItem::StartSession,
            ContentItem::text("hap"),
            ContentItem::text("py"),
        ]);
        assert_eq!(message.text().as_deref(), Some("happy"));
        assert!(message.starts_session());
        assert!(!message.ends_session());
    }

    #[test]
    fn text_is_none_without_text_items() {
        let message = ChatMessage::new(vec![ContentItem::StartSession]);
        assert!(message.text().is_none());

        let empty = ChatMessage::new(vec![ContentItem::text("")]);
        assert!(empty.text().is_none());
    }

    #[test]
    fn text_reply_appends_end_session_marker() {
        let closing = ChatMessage::text_reply("bye", true);
        assert_eq!(
            closing.content,
            vec![ContentItem::text("bye"), ContentItem::EndSession]
        );

        let open = ChatMessage::text_reply("hi", false);
        assert_eq!(open.content, vec![ContentItem::text("hi")]);
    }

    #[test]
    fn acknowledgement_correlates_message_id() {
        let message = ChatMessage::new(vec![ContentItem::text("tired")]);
        let ack = ChatAcknowledgement::for_message(&message);
        assert_eq!(ack.acknowledged_msg_id, message.msg_id);
    }

    #[test]
    fn envelope_parses_tagged_ack() {
        let id = Uuid::new_v4();
        let raw = json!({
            "kind": "ack",
            "body": {"timestamp": "2024-05-01T12:00:00Z", "acknowledged_msg_id": id}
        });
        let envelope: AgentMessage = serde_json::from_value(raw).expect("ack parses");
        assert_eq!(
            envelope.as_ack().map(|ack| ack.acknowledged_msg_id),
            Some(id)
        );
    }
}
