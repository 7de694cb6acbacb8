//! Speech synthesis client
//!
//! Wraps the ElevenLabs text-to-speech API. Each call resynthesizes; there is
//! no local caching. The chunk sequence is lazy, forward-only, and
//! single-pass: a failure mid-stream aborts the remainder, and chunks already
//! handed downstream are not retracted.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use secrecy::{ExposeSecret, SecretString};

use crate::voice::assembly;
use crate::{Error, Result};

/// Lazy sequence of synthesized audio chunks, in arrival order
pub type AudioStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// A source of synthesized speech
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesize `text` into a lazy chunk stream
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the service returns a
    /// non-success status. Failures after the first chunk surface as stream
    /// items instead.
    async fn stream(&self, text: &str) -> Result<AudioStream>;

    /// Synthesize `text` and drain the full audio into one buffer
    ///
    /// # Errors
    ///
    /// Returns error if synthesis fails at any point; no partial buffer is
    /// returned.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let stream = self.stream(text).await?;
        assembly::collect(stream).await
    }
}

/// Synthesizes speech via the ElevenLabs streaming endpoint
pub struct SpeechSynthesizer {
    client: reqwest::Client,
    api_key: SecretString,
    voice: String,
    model: String,
}

impl SpeechSynthesizer {
    /// Create a new synthesis client
    #[must_use]
    pub fn new(api_key: SecretString, voice: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            voice,
            model,
        }
    }

    /// The configured voice identifier
    #[must_use]
    pub fn voice(&self) -> &str {
        &self.voice
    }
}

#[async_trait]
impl Synthesizer for SpeechSynthesizer {
    async fn stream(&self, text: &str) -> Result<AudioStream> {
        #[derive(serde::Serialize)]
        struct SynthesisRequest<'a> {
            text: &'a str,
            model_id: &'a str,
        }

        let url = format!(
            "https://api.elevenlabs.io/v1/text-to-speech/{}/stream",
            self.voice
        );

        let request = SynthesisRequest {
            text,
            model_id: &self.model,
        };

        tracing::debug!(voice = %self.voice, chars = text.len(), "synthesizing speech");

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", self.api_key.expose_secret())
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!(
                "speech synthesis error {status}: {body}"
            )));
        }

        Ok(Box::pin(response.bytes_stream().map_err(Error::from)))
    }
}
