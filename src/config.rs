//! Configuration management for Lotus gateway

use std::time::Duration;

use secrecy::SecretString;

use crate::{Error, Result};

/// Default context-cache time-to-live in seconds
const DEFAULT_CACHE_TTL_SECS: u64 = 90;

/// Default Gemini model identifier
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Lotus gateway configuration
pub struct Config {
    /// LINE channel access token (bearer for reply/loading/content calls)
    pub channel_access_token: SecretString,

    /// Gemini API key
    pub gemini_api_key: SecretString,

    /// Gemini model identifier for all generation calls
    pub model: String,

    /// Port the webhook server listens on
    pub port: u16,

    /// Time-to-live for per-user image and chat-history entries
    pub cache_ttl: Duration,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns error if `CHANNEL_ACCESS_TOKEN` or `GEMINI_API_KEY` is
    /// not set
    pub fn from_env() -> Result<Self> {
        let channel_access_token = std::env::var("CHANNEL_ACCESS_TOKEN")
            .map_err(|_| Error::Config("CHANNEL_ACCESS_TOKEN is required".to_string()))?;

        let gemini_api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| Error::Config("GEMINI_API_KEY is required".to_string()))?;

        let model =
            std::env::var("LOTUS_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let port = std::env::var("LOTUS_PORT")
            .or_else(|_| std::env::var("PORT"))
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(18890);

        let cache_ttl_secs: u64 = std::env::var("LOTUS_CACHE_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_CACHE_TTL_SECS);

        Ok(Self {
            channel_access_token: SecretString::new(channel_access_token.into()),
            gemini_api_key: SecretString::new(gemini_api_key.into()),
            model,
            port,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
        })
    }
}
