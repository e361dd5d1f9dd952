//! Error types for Lotus gateway

use thiserror::Error;

/// Result type alias for Lotus operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Lotus gateway
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Messaging channel error (LINE API failures)
    #[error("channel error: {0}")]
    Channel(String),

    /// Generation API error (Gemini failures, empty responses)
    #[error("generation error: {0}")]
    Generation(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
