//! Error types for droidspeak

use thiserror::Error;

/// Result type alias for droidspeak operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in droidspeak
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Upstream collaborator failure (LLM or speech synthesis)
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Audio buffer could not be decoded (malformed or truncated)
    #[error("decode error: {0}")]
    Decode(String),

    /// Audio device/resource error
    #[error("audio error: {0}")]
    Audio(String),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
