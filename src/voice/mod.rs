//! Audio pipeline: synthesis, assembly, retrieval, playback

pub mod assembly;
pub mod fetch;
pub mod playback;
pub mod synth;

pub use fetch::{Base64AudioFetcher, FetchAudio, HttpAudioFetcher};
pub use playback::{AudioPlayback, Player};
pub use synth::{AudioStream, SpeechSynthesizer, Synthesizer};
