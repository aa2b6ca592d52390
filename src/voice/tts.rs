//! Speech synthesis for names lacking a clip

use std::path::Path;

use async_trait::async_trait;

use crate::config::{TtsBackend, TtsConfig};
use crate::{Error, Result};

/// Produces an announcement clip file for a display name
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesize speech for `name` into the file at `dest`
    async fn synthesize(&self, name: &str, dest: &Path) -> Result<()>;
}

/// Synthesis provider backend
enum Backend {
    /// Local espeak binary
    Espeak,
    /// OpenAI-compatible speech endpoint
    Http {
        client: reqwest::Client,
        url: String,
        api_key: String,
        model: String,
        voice: String,
    },
}

/// Synthesizes announcement clips via espeak or an HTTP TTS API
pub struct SpeechService {
    backend: Backend,
}

impl SpeechService {
    /// Create a speech service from configuration
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP backend is selected without an API key
    pub fn from_config(cfg: &TtsConfig) -> Result<Self> {
        match cfg.backend {
            TtsBackend::Espeak => Ok(Self::espeak()),
            TtsBackend::Http => {
                let api_key = cfg
                    .api_key
                    .clone()
                    .ok_or_else(|| Error::Config("OPENAI_API_KEY required for HTTP TTS".to_string()))?;
                Self::http(cfg.url.clone(), api_key, cfg.model.clone(), cfg.voice.clone())
            }
        }
    }

    /// Create a speech service backed by the local espeak binary
    #[must_use]
    pub const fn espeak() -> Self {
        Self {
            backend: Backend::Espeak,
        }
    }

    /// Create a speech service backed by an OpenAI-compatible endpoint
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty
    pub fn http(url: String, api_key: String, model: String, voice: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config("API key required for HTTP TTS".to_string()));
        }

        Ok(Self {
            backend: Backend::Http {
                client: reqwest::Client::new(),
                url,
                api_key,
                model,
                voice,
            },
        })
    }

    /// Synthesize using espeak, writing a wav file directly
    async fn synthesize_espeak(name: &str, dest: &Path) -> Result<()> {
        let output = tokio::process::Command::new("espeak")
            .arg("-w")
            .arg(dest)
            .arg(name)
            .output()
            .await
            .map_err(|e| Error::Tts(format!("failed to run espeak: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Tts(format!(
                "espeak exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl Synthesizer for SpeechService {
    async fn synthesize(&self, name: &str, dest: &Path) -> Result<()> {
        match &self.backend {
            Backend::Espeak => Self::synthesize_espeak(name, dest).await,
            Backend::Http {
                client,
                url,
                api_key,
                model,
                voice,
            } => {
                #[derive(serde::Serialize)]
                struct SpeechRequest<'a> {
                    model: &'a str,
                    input: &'a str,
                    voice: &'a str,
                    response_format: &'a str,
                }

                let request = SpeechRequest {
                    model,
                    input: name,
                    voice,
                    response_format: "wav",
                };

                let response = client
                    .post(url)
                    .header("Authorization", format!("Bearer {api_key}"))
                    .json(&request)
                    .send()
                    .await?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(Error::Tts(format!("TTS error {status}: {body}")));
                }

                let audio = response.bytes().await?;
                tokio::fs::write(dest, &audio).await?;
                Ok(())
            }
        }
    }
}
