//! Configuration for the herald bot
//!
//! Everything is environment-driven: the bot token is the one required
//! value, the rest has defaults suitable for a single-guild deployment.

use std::path::PathBuf;

use crate::{Error, Result};

/// Default text channel watched for clip submissions
pub const DEFAULT_SUBMISSION_CHANNEL: &str = "announcer-bot-submissions";

/// Herald bot configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Discord bot token (from `DISCORD_TOKEN`)
    pub token: String,

    /// Directory holding announcement clips
    pub clip_dir: PathBuf,

    /// Name of the text channel accepting clip uploads
    pub submission_channel: String,

    /// Speech-synthesis fallback configuration
    pub tts: TtsConfig,
}

/// Speech synthesis backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtsBackend {
    /// Local `espeak` binary writing a wav file
    Espeak,
    /// OpenAI-compatible `audio/speech` HTTP endpoint
    Http,
}

/// Speech synthesis configuration
#[derive(Debug, Clone)]
pub struct TtsConfig {
    /// Which backend synthesizes missing clips
    pub backend: TtsBackend,

    /// HTTP endpoint for the `Http` backend
    pub url: String,

    /// API key for the `Http` backend (from `OPENAI_API_KEY`)
    pub api_key: Option<String>,

    /// TTS model identifier (e.g. "tts-1")
    pub model: String,

    /// TTS voice identifier
    pub voice: String,
}

impl Config {
    /// Load configuration from the environment
    ///
    /// # Errors
    ///
    /// Returns error if `DISCORD_TOKEN` is unset or a value fails to parse
    pub fn load() -> Result<Self> {
        Self::load_with_options(None)
    }

    /// Load configuration, with an optional CLI override for the clip dir
    ///
    /// # Errors
    ///
    /// Returns error if `DISCORD_TOKEN` is unset or a value fails to parse
    pub fn load_with_options(clip_dir: Option<PathBuf>) -> Result<Self> {
        let token = std::env::var("DISCORD_TOKEN")
            .map_err(|_| Error::Config("DISCORD_TOKEN not set".to_string()))?;

        let submission_channel = std::env::var("HERALD_SUBMISSION_CHANNEL")
            .unwrap_or_else(|_| DEFAULT_SUBMISSION_CHANNEL.to_string());

        Ok(Self {
            token,
            clip_dir: resolve_clip_dir(clip_dir)?,
            submission_channel,
            tts: TtsConfig::from_env()?,
        })
    }
}

impl TtsConfig {
    /// Load TTS configuration from the environment
    ///
    /// # Errors
    ///
    /// Returns error if `HERALD_TTS_BACKEND` names an unknown backend
    pub fn from_env() -> Result<Self> {
        let backend = match std::env::var("HERALD_TTS_BACKEND").as_deref() {
            Ok("http") => TtsBackend::Http,
            Ok("espeak") | Err(_) => TtsBackend::Espeak,
            Ok(other) => {
                return Err(Error::Config(format!(
                    "unknown TTS backend '{other}' (expected 'espeak' or 'http')"
                )));
            }
        };

        Ok(Self {
            backend,
            url: std::env::var("HERALD_TTS_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1/audio/speech".to_string()),
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            model: std::env::var("HERALD_TTS_MODEL").unwrap_or_else(|_| "tts-1".to_string()),
            voice: std::env::var("HERALD_TTS_VOICE").unwrap_or_else(|_| "alloy".to_string()),
        })
    }
}

/// Resolve the clip directory: CLI override, then `HERALD_CLIP_DIR`,
/// then the platform data directory
///
/// # Errors
///
/// Returns error if no platform data directory can be determined
pub fn resolve_clip_dir(cli_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = cli_override {
        return Ok(dir);
    }
    if let Ok(dir) = std::env::var("HERALD_CLIP_DIR") {
        return Ok(PathBuf::from(dir));
    }

    directories::ProjectDirs::from("dev", "herald", "herald")
        .map(|dirs| dirs.data_dir().join("clips"))
        .ok_or_else(|| Error::Config("could not determine a data directory".to_string()))
}
