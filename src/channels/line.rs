//! LINE channel adapter
//!
//! Uses the LINE Messaging API: replies are addressed by the one-time
//! reply token carried on each webhook event, media content is fetched
//! from the data endpoint, and the loading indicator signals that a
//! reply is being prepared.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};

use super::{Messenger, ReplySegment};
use crate::{Error, Result};

/// LINE Messaging API base URL
const API_BASE: &str = "https://api.line.me";

/// LINE data API base URL (message content downloads)
const DATA_API_BASE: &str = "https://api-data.line.me";

/// LINE channel adapter
pub struct LineClient {
    /// Channel access token for the Messaging API
    access_token: SecretString,
    client: Client,
}

impl LineClient {
    /// Create a new LINE channel adapter
    #[must_use]
    pub fn new(access_token: SecretString) -> Self {
        Self {
            access_token,
            client: Client::new(),
        }
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token.expose_secret())
    }
}

#[async_trait]
impl Messenger for LineClient {
    /// Reply to an event
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or responds non-2xx
    async fn reply(&self, reply_token: &str, segments: Vec<ReplySegment>) -> Result<()> {
        let url = format!("{API_BASE}/v2/bot/message/reply");

        let body = serde_json::json!({
            "replyToken": reply_token,
            "messages": segments,
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.bearer())
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Channel(format!("LINE reply error: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Channel(format!(
                "LINE reply error: {status} - {body}"
            )));
        }

        tracing::debug!("LINE reply sent");
        Ok(())
    }

    /// Start the loading indicator for a chat
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or responds non-2xx
    async fn show_loading(&self, user_id: &str) -> Result<()> {
        let url = format!("{API_BASE}/v2/bot/chat/loading/start");

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.bearer())
            .json(&serde_json::json!({ "chatId": user_id }))
            .send()
            .await
            .map_err(|e| Error::Channel(format!("LINE loading error: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Channel(format!(
                "LINE loading error: {status} - {body}"
            )));
        }

        Ok(())
    }

    /// Download message content (image binary) by message id
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or responds non-2xx
    async fn fetch_media(&self, message_id: &str) -> Result<Vec<u8>> {
        let url = format!("{DATA_API_BASE}/v2/bot/message/{message_id}/content");

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.bearer())
            .send()
            .await
            .map_err(|e| Error::Channel(format!("LINE content error: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Channel(format!(
                "LINE content error: {status} - {body}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Channel(format!("LINE content error: {e}")))?;

        tracing::debug!(message_id, size = bytes.len(), "media fetched");
        Ok(bytes.to_vec())
    }
}
