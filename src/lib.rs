//! Droidspeak - Voice Q&A assistant gateway
//!
//! Ask a question, hear the answer in character: a question string goes to an
//! LLM with a fixed persona prompt, the answer text goes to a text-to-speech
//! service, and the synthesized audio is delivered for playback.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────┐
//! │                  Clients                       │
//! │   Browser fetch  │  CLI (in-process)           │
//! └──────────────────┬─────────────────────────────┘
//!                    │
//! ┌──────────────────▼─────────────────────────────┐
//! │              Droidspeak Gateway                 │
//! │   Controller  │  /api/voice relay  │  Playback │
//! └──────────────────┬─────────────────────────────┘
//!                    │
//! ┌──────────────────▼─────────────────────────────┐
//! │          Collaborators (HTTP APIs)             │
//! │   Chat completions  │  Speech synthesis        │
//! └────────────────────────────────────────────────┘
//! ```
//!
//! The audio pipeline supports three delivery strategies: a streaming HTTP
//! relay that forwards synthesis chunks as they arrive, a buffered base64
//! hand-off for direct in-process calls, and a client-side fetch that buffers
//! and decodes the relayed stream before playback.

pub mod api;
pub mod chat;
pub mod config;
pub mod controller;
pub mod error;
pub mod voice;

pub use chat::{AnswerSource, ChatClient};
pub use config::Config;
pub use controller::{ConversationState, Controller, Status};
pub use error::{Error, Result};
pub use voice::{
    AudioPlayback, Base64AudioFetcher, FetchAudio, HttpAudioFetcher, Player, SpeechSynthesizer,
    Synthesizer,
};
