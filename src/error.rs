//! Error types for the herald bot

use thiserror::Error;

/// Result type alias for herald operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the herald bot
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Discord gateway/client error
    #[error("discord error: {0}")]
    Discord(String),

    /// Voice connection or playback error
    #[error("voice error: {0}")]
    Voice(String),

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// Clip upload error
    #[error("upload error: {0}")]
    Upload(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
