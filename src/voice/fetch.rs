//! Audio payload retrieval for the conversation controller
//!
//! Two interchangeable ways to turn answer text into a playable buffer: fetch
//! the streaming relay endpoint over HTTP, or call the synthesis client
//! in-process with a base64 hand-off across the call boundary.

use std::sync::Arc;

use async_trait::async_trait;

use crate::voice::assembly;
use crate::voice::synth::Synthesizer;
use crate::{Error, Result};

/// Retrieves an assembled audio payload for a piece of answer text
#[async_trait]
pub trait FetchAudio: Send + Sync {
    /// Fetch the complete audio for `text`
    ///
    /// # Errors
    ///
    /// Returns error if retrieval or synthesis fails; no partial payload is
    /// returned.
    async fn fetch(&self, text: &str) -> Result<Vec<u8>>;
}

/// Fetches audio from a droidspeak streaming relay endpoint
///
/// Issues `GET {base_url}/api/voice?text=…` and buffers the full response
/// body before hand-off to playback.
pub struct HttpAudioFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAudioFetcher {
    /// Create a fetcher against a gateway base URL, e.g. `http://localhost:8080`
    #[must_use]
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl FetchAudio for HttpAudioFetcher {
    async fn fetch(&self, text: &str) -> Result<Vec<u8>> {
        let url = format!(
            "{}/api/voice?text={}",
            self.base_url,
            urlencoding::encode(text)
        );

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!(%status, "voice relay returned failure");
            return Err(Error::Upstream(format!("voice relay error {status}")));
        }

        let body = response.bytes().await?;
        Ok(body.to_vec())
    }
}

/// Fetches audio by calling the synthesis client directly
///
/// The buffer crosses the call boundary as base64 text, mirroring a direct
/// server-side call that cannot carry raw bytes. The caller receives nothing
/// until synthesis is fully complete.
pub struct Base64AudioFetcher {
    synth: Arc<dyn Synthesizer>,
}

impl Base64AudioFetcher {
    /// Create a fetcher over a synthesis client
    #[must_use]
    pub fn new(synth: Arc<dyn Synthesizer>) -> Self {
        Self { synth }
    }
}

#[async_trait]
impl FetchAudio for Base64AudioFetcher {
    async fn fetch(&self, text: &str) -> Result<Vec<u8>> {
        let stream = self.synth.stream(text).await?;
        let encoded = assembly::collect_base64(stream).await?;
        assembly::decode_base64(&encoded)
    }
}
