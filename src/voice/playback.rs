//! Playback engine
//!
//! Decodes an assembled audio payload and plays it on the default output
//! device. Codec work is delegated to minimp3; this module never
//! re-implements audio codecs. One playback instance exists per conversation
//! controller; device resources are released when the instance drops.

use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleRate, StreamConfig};

use crate::{Error, Result};

/// Sample rate for playback (matches common TTS output)
const PLAYBACK_SAMPLE_RATE: u32 = 24000;

/// Plays an assembled audio payload
#[async_trait]
pub trait Player: Send {
    /// Decode `audio` and play it to completion
    ///
    /// # Errors
    ///
    /// Returns `Error::Decode` for a malformed or truncated buffer and
    /// `Error::Audio` for device failures. Neither is fatal to the process.
    async fn play(&mut self, audio: &[u8]) -> Result<()>;
}

/// Plays MP3 audio to the default output device
pub struct AudioPlayback {
    config: StreamConfig,
}

impl AudioPlayback {
    /// Create a new playback instance against the default output device
    ///
    /// # Errors
    ///
    /// Returns `Error::Audio` if no usable output device is available.
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or_else(|| Error::Audio("no output device available".to_string()))?;

        let supported = device
            .supported_output_configs()
            .map_err(|e| Error::Audio(e.to_string()))?
            .find(|c| {
                c.channels() <= 2
                    && c.min_sample_rate() <= SampleRate(PLAYBACK_SAMPLE_RATE)
                    && c.max_sample_rate() >= SampleRate(PLAYBACK_SAMPLE_RATE)
            })
            .ok_or_else(|| Error::Audio("no suitable output config found".to_string()))?;

        let config = supported
            .with_sample_rate(SampleRate(PLAYBACK_SAMPLE_RATE))
            .config();

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            sample_rate = PLAYBACK_SAMPLE_RATE,
            channels = config.channels,
            "audio playback initialized"
        );

        Ok(Self { config })
    }
}

#[async_trait]
impl Player for AudioPlayback {
    async fn play(&mut self, audio: &[u8]) -> Result<()> {
        let samples = decode_mp3(audio)?;
        let config = self.config.clone();

        // cpal streams are !Send; playback runs on a blocking thread
        tokio::task::spawn_blocking(move || play_samples(&config, &samples))
            .await
            .map_err(|e| Error::Audio(format!("playback task failed: {e}")))?
    }
}

/// Play decoded f32 samples and block until the stream drains
fn play_samples(config: &StreamConfig, samples: &[f32]) -> Result<()> {
    if samples.is_empty() {
        return Ok(());
    }

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| Error::Audio("no output device".to_string()))?;

    let channels = config.channels as usize;
    let sample_count = samples.len();

    let cursor = Arc::new(Mutex::new(samples.to_vec().into_iter()));
    let finished = Arc::new(AtomicBool::new(false));

    let cursor_cb = Arc::clone(&cursor);
    let finished_cb = Arc::clone(&finished);

    let stream = device
        .build_output_stream(
            config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let mut cursor = cursor_cb.lock().unwrap();
                for frame in data.chunks_mut(channels) {
                    let sample = cursor.next().unwrap_or_else(|| {
                        finished_cb.store(true, Ordering::Relaxed);
                        0.0
                    });
                    frame.fill(sample);
                }
            },
            |err| {
                tracing::error!(error = %err, "audio playback error");
            },
            None,
        )
        .map_err(|e| Error::Audio(e.to_string()))?;

    stream.play().map_err(|e| Error::Audio(e.to_string()))?;

    let duration_ms = (sample_count as u64 * 1000) / u64::from(PLAYBACK_SAMPLE_RATE);
    let deadline = std::time::Instant::now() + std::time::Duration::from_millis(duration_ms + 500);

    while !finished.load(Ordering::Relaxed) {
        if std::time::Instant::now() > deadline {
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(50));
    }

    drop(stream);
    tracing::debug!(samples = sample_count, "playback complete");

    Ok(())
}

/// Decode MP3 bytes to f32 samples, downmixing stereo to mono
fn decode_mp3(mp3_data: &[u8]) -> Result<Vec<f32>> {
    let mut decoder = minimp3::Decoder::new(Cursor::new(mp3_data));
    let mut samples = Vec::new();

    loop {
        match decoder.next_frame() {
            Ok(frame) => {
                if frame.channels == 2 {
                    samples.extend(frame.data.chunks(2).map(|pair| {
                        let left = f32::from(pair[0]) / 32768.0;
                        let right = f32::from(pair.get(1).copied().unwrap_or(pair[0])) / 32768.0;
                        f32::midpoint(left, right)
                    }));
                } else {
                    samples.extend(frame.data.iter().map(|&s| f32::from(s) / 32768.0));
                }
            }
            Err(minimp3::Error::Eof) => break,
            Err(e) => return Err(Error::Decode(format!("mp3 decode failed: {e}"))),
        }
    }

    // A non-empty payload with no decodable frames is malformed, e.g. a relay
    // stream that was truncated before the first frame boundary
    if samples.is_empty() && !mp3_data.is_empty() {
        return Err(Error::Decode("no decodable audio frames".to_string()));
    }

    Ok(samples)
}
