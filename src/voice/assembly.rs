//! Audio assembly strategies
//!
//! Bridges the synthesis client's chunk stream to a deliverable payload.
//! Chunk arrival order is significant: reordering or duplication corrupts the
//! audio. The streaming relay counterpart lives in `api::voice`, where chunks
//! are forwarded without assembly.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use futures::StreamExt;

use crate::voice::synth::AudioStream;
use crate::{Error, Result};

/// Drain a chunk stream into one contiguous buffer, preserving arrival order
///
/// # Errors
///
/// Returns the first stream error; no partial buffer is returned.
pub async fn collect(mut stream: AudioStream) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    while let Some(chunk) = stream.next().await {
        buffer.extend_from_slice(&chunk?);
    }
    Ok(buffer)
}

/// Drain a chunk stream and encode the assembled buffer as base64 text
///
/// Suited to hand-off across a direct call boundary that cannot carry raw
/// bytes. Decoding the result yields the exact chunk concatenation.
///
/// # Errors
///
/// Returns error if synthesis fails at any point.
pub async fn collect_base64(stream: AudioStream) -> Result<String> {
    let buffer = collect(stream).await?;
    Ok(encode_base64(&buffer))
}

/// Encode an audio buffer as standard base64 text
#[must_use]
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode a base64 audio payload back to bytes
///
/// # Errors
///
/// Returns `Error::Decode` if the payload is not valid base64.
pub fn decode_base64(encoded: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(encoded)
        .map_err(|e| Error::Decode(format!("invalid base64 payload: {e}")))
}
