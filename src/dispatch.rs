//! Event dispatch: reply strategy selection and orchestration
//!
//! One inbound event maps to exactly one [`ReplyAction`]. Selection is
//! a pure function of the event and a snapshot of the sender's cached
//! image; the [`Dispatcher`] performs the generation and reply calls
//! the action dictates and owns every cache mutation.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::cache::{ChatTurn, ContextCache};
use crate::channels::{Event, EventKind, MessageKind, Messenger, ReplySegment, WebhookDelivery};
use crate::providers::Generator;
use crate::{Error, Result};

/// Prefix that routes a text message straight to the text-only call
const DIRECT_PREFIX: &str = "ai";

/// Fixed reply sent after an image is taken in, asking the user what
/// they want to know about it (kept in the bot's local language)
pub const IMAGE_PROMPT_REQUEST: &str = "ระบุสิ่งที่ต้องการทราบจากภาพมาได้เลยจ้า";

/// The response path selected for one inbound event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyAction {
    /// "ai"-prefixed prompt: text-only call, cache untouched
    Direct {
        /// Original prompt, casing preserved
        prompt: String,
    },

    /// Prompt about the sender's cached image: multimodal call
    Describe {
        prompt: String,
        /// Snapshot of the cached image taken at selection time
        image_base64: String,
    },

    /// Plain prompt: chat call with accumulated history
    Chat { prompt: String },

    /// Image message: fetch, encode, cache, ask for a prompt
    IntakeImage {
        /// Media reference to fetch the binary through
        message_id: String,
    },

    /// Explicit no-op
    Ignore { reason: IgnoreReason },
}

/// Why an event produced no reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Event kind other than "message"
    NotAMessage,
    /// Message event without a message payload
    MissingPayload,
    /// Message kind with no reply strategy (sticker, video, ...)
    UnsupportedMessageKind,
    /// Image message without a media reference
    MissingMediaReference,
}

/// Decide the response path for one event
///
/// `cached_image` is the sender's image cache entry as of selection
/// time. First match wins; the direct-"ai" rule beats both context
/// paths even when an image is cached.
#[must_use]
pub fn select_action(event: &Event, cached_image: Option<&str>) -> ReplyAction {
    match event.kind {
        EventKind::Other => ReplyAction::Ignore {
            reason: IgnoreReason::NotAMessage,
        },
        EventKind::Message => {
            let Some(message) = &event.message else {
                return ReplyAction::Ignore {
                    reason: IgnoreReason::MissingPayload,
                };
            };

            match message.kind {
                MessageKind::Text => {
                    let prompt = message.text.clone().unwrap_or_default();
                    if has_direct_prefix(&prompt) {
                        ReplyAction::Direct { prompt }
                    } else if let Some(image) = cached_image {
                        ReplyAction::Describe {
                            prompt,
                            image_base64: image.to_string(),
                        }
                    } else {
                        ReplyAction::Chat { prompt }
                    }
                }
                MessageKind::Image => message.id.as_ref().map_or(
                    ReplyAction::Ignore {
                        reason: IgnoreReason::MissingMediaReference,
                    },
                    |id| ReplyAction::IntakeImage {
                        message_id: id.clone(),
                    },
                ),
                MessageKind::Other => ReplyAction::Ignore {
                    reason: IgnoreReason::UnsupportedMessageKind,
                },
            }
        }
    }
}

/// Case-insensitive "ai" prefix check, safe on multi-byte text
fn has_direct_prefix(prompt: &str) -> bool {
    prompt
        .get(..DIRECT_PREFIX.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(DIRECT_PREFIX))
}

/// Executes selected actions against the generation and messaging APIs
///
/// Holds the process-lifetime context cache; all image and history
/// writes go through here.
#[derive(Clone)]
pub struct Dispatcher {
    generator: Arc<dyn Generator>,
    messenger: Arc<dyn Messenger>,
    cache: ContextCache,
}

impl Dispatcher {
    /// Create a dispatcher over the given collaborators
    #[must_use]
    pub fn new(
        generator: Arc<dyn Generator>,
        messenger: Arc<dyn Messenger>,
        cache: ContextCache,
    ) -> Self {
        Self {
            generator,
            messenger,
            cache,
        }
    }

    /// Process one webhook delivery, events in array order
    ///
    /// The loading indicator is best-effort and a failing event is
    /// logged and skipped; neither stops the rest of the batch.
    pub async fn process_delivery(&self, delivery: &WebhookDelivery) {
        for event in &delivery.events {
            let user_id = event.source.user_id.as_str();
            tracing::info!(user_id, "processing event");

            if let Err(e) = self.messenger.show_loading(user_id).await {
                tracing::warn!(user_id, error = %e, "loading indicator failed");
            }

            if let Err(e) = self.handle_event(event).await {
                tracing::error!(user_id, error = %e, "event handling failed");
            }
        }
    }

    /// Select and execute the response path for one event
    ///
    /// # Errors
    ///
    /// Returns error if a generation call, media fetch, or reply
    /// delivery fails, or if a replying path finds no reply token
    pub async fn handle_event(&self, event: &Event) -> Result<()> {
        let user_id = event.source.user_id.as_str();
        let cached_image = self.cache.image(user_id);

        match select_action(event, cached_image.as_deref()) {
            ReplyAction::Ignore { reason } => {
                tracing::debug!(user_id, ?reason, "event ignored");
                Ok(())
            }
            ReplyAction::Direct { prompt } => {
                let text = self.generator.generate_text(&prompt).await?;
                self.reply_text(event, text).await
            }
            ReplyAction::Describe {
                prompt,
                image_base64,
            } => {
                let text = self
                    .generator
                    .generate_multimodal(&prompt, &image_base64)
                    .await?;
                // The image stays cached for follow-up prompts until
                // its TTL runs out.
                self.reply_text(event, text).await
            }
            ReplyAction::Chat { prompt } => {
                let mut history = self.cache.history(user_id).unwrap_or_default();
                let text = self.generator.generate_chat(&history, &prompt).await?;
                self.reply_text(event, text.clone()).await?;

                history.push(ChatTurn::user(prompt));
                history.push(ChatTurn::model(text));
                self.cache.put_history(user_id, history);
                Ok(())
            }
            ReplyAction::IntakeImage { message_id } => {
                let binary = self.messenger.fetch_media(&message_id).await?;
                self.cache.put_image(user_id, BASE64.encode(&binary));
                self.reply_text(event, IMAGE_PROMPT_REQUEST.to_string())
                    .await
            }
        }
    }

    /// Send a single text segment through the event's reply token
    async fn reply_text(&self, event: &Event, text: String) -> Result<()> {
        let token = event
            .reply_token
            .as_deref()
            .ok_or_else(|| Error::Channel("event missing reply token".to_string()))?;
        self.messenger
            .reply(token, vec![ReplySegment::text(text)])
            .await
    }
}
