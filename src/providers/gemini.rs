//! Gemini generation client
//!
//! Talks to the Google generative-language API (`generateContent`).
//! All three call shapes funnel through one request path; they differ
//! only in the `contents` they send.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::Generator;
use crate::cache::ChatTurn;
use crate::{Error, Result};

/// Generative-language API base URL
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// MIME type used for cached image payloads
const IMAGE_MIME: &str = "image/jpeg";

/// Gemini API client
pub struct GeminiClient {
    api_key: SecretString,
    /// Model identifier, e.g. "gemini-1.5-flash"
    model: String,
    client: Client,
}

impl GeminiClient {
    /// Create a new Gemini client for the given model
    #[must_use]
    pub fn new(api_key: SecretString, model: String) -> Self {
        Self {
            api_key,
            model,
            client: Client::new(),
        }
    }

    /// Issue one `generateContent` call and extract the reply text
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the API responds non-2xx, or
    /// the response carries no text candidate
    async fn generate(&self, contents: Vec<Content>) -> Result<String> {
        let url = format!("{API_BASE}/models/{}:generateContent", self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&GenerateRequest { contents })
            .send()
            .await
            .map_err(|e| Error::Generation(format!("Gemini API error: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Generation(format!(
                "Gemini API error: {status} - {body}"
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::Generation(format!("Gemini API error: {e}")))?;

        body.into_text()
            .ok_or_else(|| Error::Generation("Gemini returned no text candidate".to_string()))
    }
}

#[async_trait]
impl Generator for GeminiClient {
    async fn generate_text(&self, prompt: &str) -> Result<String> {
        self.generate(vec![Content::user(vec![Part::text(prompt)])])
            .await
    }

    async fn generate_multimodal(&self, prompt: &str, image_base64: &str) -> Result<String> {
        self.generate(vec![Content::user(vec![
            Part::text(prompt),
            Part::inline_image(image_base64),
        ])])
        .await
    }

    async fn generate_chat(&self, history: &[ChatTurn], prompt: &str) -> Result<String> {
        let mut contents: Vec<Content> = history
            .iter()
            .map(|turn| Content {
                role: turn.role.as_str(),
                parts: vec![Part::text(turn.text.as_str())],
            })
            .collect();
        contents.push(Content::user(vec![Part::text(prompt)]));

        self.generate(contents).await
    }
}

/// `generateContent` request body
#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

/// One role-tagged content block
#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

impl Content {
    fn user(parts: Vec<Part>) -> Self {
        Self {
            role: "user",
            parts,
        }
    }
}

/// One part of a content block: text or inline image data
#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: Blob },
}

impl Part {
    fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    fn inline_image(data: impl Into<String>) -> Self {
        Self::InlineData {
            inline_data: Blob {
                mime_type: IMAGE_MIME,
                data: data.into(),
            },
        }
    }
}

/// Inline base64 media payload
#[derive(Serialize)]
struct Blob {
    mime_type: &'static str,
    data: String,
}

/// `generateContent` response body
#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// First text part of the first candidate, if any
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .find_map(|part| part.text)
    }
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_part_wire_shape() {
        let json = serde_json::to_value(Part::text("hello")).unwrap();
        assert_eq!(json, serde_json::json!({ "text": "hello" }));
    }

    #[test]
    fn inline_image_wire_shape() {
        let json = serde_json::to_value(Part::inline_image("QUJD")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "inline_data": { "mime_type": "image/jpeg", "data": "QUJD" }
            })
        );
    }

    #[test]
    fn response_text_extraction() {
        let body = r#"{
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "four" }] }
            }]
        }"#;
        let response: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.into_text().as_deref(), Some("four"));
    }

    #[test]
    fn empty_response_yields_none() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(response.into_text().is_none());
    }
}
