//! Generation providers
//!
//! The dispatcher treats the generation API as a black box with three
//! call shapes, expressed by the [`Generator`] trait.

pub mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;

use crate::Result;
use crate::cache::ChatTurn;

/// Generation API operations the dispatcher depends on
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate text from a plain prompt
    async fn generate_text(&self, prompt: &str) -> Result<String>;

    /// Generate text from a prompt and a base64-encoded image
    async fn generate_multimodal(&self, prompt: &str, image_base64: &str) -> Result<String>;

    /// Generate the next turn of a multi-turn conversation
    async fn generate_chat(&self, history: &[ChatTurn], prompt: &str) -> Result<String>;
}
