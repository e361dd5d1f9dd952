//! Messaging channel types and the LINE adapter
//!
//! Defines the webhook payload shapes delivered by the LINE Messaging
//! API and the [`Messenger`] trait the dispatcher talks through. The
//! concrete adapter lives in [`line`].

pub mod line;

pub use line::LineClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// One webhook delivery: an ordered batch of events
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookDelivery {
    /// Events in delivery order
    #[serde(default)]
    pub events: Vec<Event>,
}

/// One inbound event from the messaging platform
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    /// Event discriminator
    #[serde(rename = "type")]
    pub kind: EventKind,

    /// One-time token authorizing a single reply to this event
    #[serde(rename = "replyToken", default)]
    pub reply_token: Option<String>,

    /// Who sent the event
    pub source: EventSource,

    /// Message payload (present for message events)
    #[serde(default)]
    pub message: Option<Message>,
}

/// Event discriminator
///
/// Anything the dispatcher does not act on (follow, unfollow, postback,
/// ...) deserializes to `Other` rather than failing the delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum EventKind {
    /// A user sent a message
    Message,
    /// Any other platform event kind
    Other,
}

impl From<String> for EventKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "message" => Self::Message,
            _ => Self::Other,
        }
    }
}

/// Sender of an event
#[derive(Debug, Clone, Deserialize)]
pub struct EventSource {
    /// Opaque end-user identifier
    #[serde(rename = "userId")]
    pub user_id: String,
}

/// Message payload of a message event
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    /// Message discriminator
    #[serde(rename = "type")]
    pub kind: MessageKind,

    /// Media reference (used to fetch image content)
    #[serde(default)]
    pub id: Option<String>,

    /// Text body (present for text messages)
    #[serde(default)]
    pub text: Option<String>,
}

/// Message discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum MessageKind {
    /// Plain text message
    Text,
    /// Image message
    Image,
    /// Sticker, video, audio, location, ...
    Other,
}

impl From<String> for MessageKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "text" => Self::Text,
            "image" => Self::Image,
            _ => Self::Other,
        }
    }
}

/// One outbound reply segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReplySegment {
    /// Plain text segment
    Text {
        /// Segment body
        text: String,
    },
}

impl ReplySegment {
    /// Build a single-segment text reply
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

/// Messaging platform operations the dispatcher depends on
///
/// Implemented by [`LineClient`]; tests substitute mocks.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Deliver reply segments using a one-time reply token
    async fn reply(&self, reply_token: &str, segments: Vec<ReplySegment>) -> Result<()>;

    /// Show the platform's typing/loading indicator for a user
    async fn show_loading(&self, user_id: &str) -> Result<()>;

    /// Fetch raw media content by message id
    async fn fetch_media(&self, message_id: &str) -> Result<Vec<u8>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_text_message_event() {
        let json = r#"{
            "events": [{
                "type": "message",
                "replyToken": "tok-1",
                "source": { "userId": "U123", "type": "user" },
                "message": { "type": "text", "id": "m1", "text": "hello" }
            }]
        }"#;

        let delivery: WebhookDelivery = serde_json::from_str(json).unwrap();
        assert_eq!(delivery.events.len(), 1);

        let event = &delivery.events[0];
        assert_eq!(event.kind, EventKind::Message);
        assert_eq!(event.reply_token.as_deref(), Some("tok-1"));
        assert_eq!(event.source.user_id, "U123");

        let message = event.message.as_ref().unwrap();
        assert_eq!(message.kind, MessageKind::Text);
        assert_eq!(message.text.as_deref(), Some("hello"));
    }

    #[test]
    fn unknown_kinds_deserialize_as_other() {
        let json = r#"{
            "type": "follow",
            "source": { "userId": "U123" },
            "message": { "type": "sticker" }
        }"#;

        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.kind, EventKind::Other);
        assert_eq!(event.message.unwrap().kind, MessageKind::Other);
    }

    #[test]
    fn reply_segment_wire_shape() {
        let segment = ReplySegment::text("hi");
        let json = serde_json::to_value(&segment).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "text", "text": "hi" }));
    }
}
