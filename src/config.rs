//! Configuration for droidspeak
//!
//! Secrets come from the process environment at startup. Absence of a key is
//! deliberately not validated up front: the first call to the respective
//! collaborator fails with its own authentication error.

use secrecy::SecretString;

/// Default chat model for answer generation
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";

/// Default speech synthesis model
pub const DEFAULT_TTS_MODEL: &str = "eleven_monolingual_v1";

/// Default synthetic voice identifier
pub const DEFAULT_VOICE: &str = "Nick test 2";

/// Default persona system prompt (answer in the manner of a protocol droid)
pub const DEFAULT_PERSONA_PROMPT: &str = "you are a simple chatbot. You will be \
asked a question and must respond to that question in the manner of C3PO from \
Star wars.";

/// Droidspeak configuration
#[derive(Clone)]
pub struct Config {
    /// API key for the chat completions collaborator (`OPENAI_API_KEY`)
    pub openai_api_key: SecretString,

    /// API key for the speech synthesis collaborator (`ELEVENLABS_API_KEY`)
    pub elevenlabs_api_key: SecretString,

    /// Persona system prompt for answer generation
    pub persona_prompt: String,

    /// Synthetic voice identifier
    pub voice: String,

    /// Chat model identifier
    pub chat_model: String,

    /// Speech synthesis model identifier
    pub tts_model: String,
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// Missing API keys produce empty secrets rather than errors; the
    /// collaborators surface authentication failures on first use.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            openai_api_key: env_secret("OPENAI_API_KEY"),
            elevenlabs_api_key: env_secret("ELEVENLABS_API_KEY"),
            persona_prompt: env_or("DROIDSPEAK_PERSONA_PROMPT", DEFAULT_PERSONA_PROMPT),
            voice: env_or("DROIDSPEAK_VOICE", DEFAULT_VOICE),
            chat_model: env_or("DROIDSPEAK_CHAT_MODEL", DEFAULT_CHAT_MODEL),
            tts_model: env_or("DROIDSPEAK_TTS_MODEL", DEFAULT_TTS_MODEL),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("openai_api_key", &"<redacted>")
            .field("elevenlabs_api_key", &"<redacted>")
            .field("persona_prompt", &self.persona_prompt)
            .field("voice", &self.voice)
            .field("chat_model", &self.chat_model)
            .field("tts_model", &self.tts_model)
            .finish()
    }
}

fn env_secret(name: &str) -> SecretString {
    std::env::var(name).unwrap_or_default().into()
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_secrets() {
        let config = Config {
            openai_api_key: "sk-very-secret".into(),
            elevenlabs_api_key: "xi-very-secret".into(),
            persona_prompt: DEFAULT_PERSONA_PROMPT.to_string(),
            voice: DEFAULT_VOICE.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            tts_model: DEFAULT_TTS_MODEL.to_string(),
        };

        let rendered = format!("{config:?}");
        assert!(!rendered.contains("very-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
