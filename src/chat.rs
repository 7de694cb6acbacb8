//! LLM collaborator for answer generation
//!
//! One chat-completions exchange per question, always under the fixed persona
//! system prompt. No conversation history is carried between calls.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Produces an in-character answer for a question
#[async_trait]
pub trait AnswerSource: Send + Sync {
    /// Ask the collaborator one question
    ///
    /// Returns `Ok(None)` when the model produced no answer content.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the service returns a
    /// non-success status.
    async fn answer(&self, question: &str) -> Result<Option<String>>;
}

/// Chat-completions client with a fixed persona prompt
pub struct ChatClient {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
    persona_prompt: String,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl ChatClient {
    /// Create a new chat client
    #[must_use]
    pub fn new(api_key: SecretString, model: String, persona_prompt: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            persona_prompt,
        }
    }
}

#[async_trait]
impl AnswerSource for ChatClient {
    async fn answer(&self, question: &str) -> Result<Option<String>> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &self.persona_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: question,
                },
            ],
        };

        tracing::debug!(model = %self.model, chars = question.len(), "requesting answer");

        let response = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!(
                "chat completion error {status}: {body}"
            )));
        }

        let completion: ChatResponse = response.json().await?;

        let answer = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty());

        Ok(answer)
    }
}
