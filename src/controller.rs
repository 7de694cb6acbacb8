//! Conversation controller
//!
//! Sequences one conversation turn: submit question, await answer text,
//! fetch audio, play it. Tracks status and surfaces every failure as a single
//! user-visible string. Only one turn is ever in flight; a submission while
//! one is processing is ignored at the entry point.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::chat::AnswerSource;
use crate::voice::{FetchAudio, Player};
use crate::Result;

/// Where a conversation turn currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No submission yet
    Waiting,
    /// Awaiting the answer collaborator
    Processing,
    /// Answer text available; audio may still be in flight
    Answered,
    /// The turn failed before an answer was produced
    Errored,
}

/// Observable state of the current conversation turn
#[derive(Debug, Clone)]
pub struct ConversationState {
    pub status: Status,
    pub answer: Option<String>,
    pub error: Option<String>,
}

impl ConversationState {
    const fn waiting() -> Self {
        Self {
            status: Status::Waiting,
            answer: None,
            error: None,
        }
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::waiting()
    }
}

/// Drives conversation turns against the answer and audio collaborators
pub struct Controller<A, F, P> {
    answerer: A,
    audio: F,
    player: Mutex<P>,
    state: Arc<RwLock<ConversationState>>,
}

impl<A, F, P> Controller<A, F, P>
where
    A: AnswerSource,
    F: FetchAudio,
    P: Player,
{
    /// Create a controller in the `Waiting` state
    pub fn new(answerer: A, audio: F, player: P) -> Self {
        Self {
            answerer,
            audio,
            player: Mutex::new(player),
            state: Arc::new(RwLock::new(ConversationState::waiting())),
        }
    }

    /// Snapshot the current conversation state
    pub async fn state(&self) -> ConversationState {
        self.state.read().await.clone()
    }

    /// Run one conversation turn
    ///
    /// Returns `false` without sequencing a turn when another submission is
    /// still processing. A terminal state (`Answered` or `Errored`) is reset
    /// by the new submission.
    pub async fn submit(&self, question: &str) -> bool {
        {
            let mut state = self.state.write().await;
            if state.status == Status::Processing {
                tracing::warn!("submission ignored: a turn is already processing");
                return false;
            }
            *state = ConversationState {
                status: Status::Processing,
                answer: None,
                error: None,
            };
        }

        match self.answerer.answer(question).await {
            Err(e) => {
                tracing::error!(error = %e, "answer collaborator failed");
                self.fail(e.to_string()).await;
            }
            Ok(None) => {
                self.fail("No response".to_string()).await;
            }
            Ok(Some(answer)) => {
                {
                    let mut state = self.state.write().await;
                    state.status = Status::Answered;
                    state.answer = Some(answer.clone());
                }
                // The textual answer stays valid even if audio fails: report
                // the error without leaving Answered
                if let Err(e) = self.speak(&answer).await {
                    tracing::error!(error = %e, "audio pipeline failed");
                    self.state.write().await.error = Some(e.to_string());
                }
            }
        }

        true
    }

    /// Fetch audio for the answer text and play it
    async fn speak(&self, text: &str) -> Result<()> {
        let audio = self.audio.fetch(text).await?;
        self.player.lock().await.play(&audio).await
    }

    async fn fail(&self, error: String) {
        let mut state = self.state.write().await;
        state.status = Status::Errored;
        state.error = Some(error);
    }
}
