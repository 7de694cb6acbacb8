//! Conversation controller state-machine tests
//!
//! Exercises the full turn sequencing with stub collaborators; no network or
//! audio hardware required.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use droidspeak::voice::AudioStream;
use droidspeak::{
    AnswerSource, Base64AudioFetcher, Controller, Error, FetchAudio, Player, Status, Synthesizer,
};
use tokio::sync::Notify;

/// Answer collaborator stub
enum StubAnswer {
    Reply(&'static str),
    Empty,
    Fail(&'static str),
}

#[async_trait]
impl AnswerSource for StubAnswer {
    async fn answer(&self, _question: &str) -> droidspeak::Result<Option<String>> {
        match self {
            Self::Reply(text) => Ok(Some((*text).to_string())),
            Self::Empty => Ok(None),
            Self::Fail(message) => Err(Error::Upstream((*message).to_string())),
        }
    }
}

/// Synthesis stub yielding fixed chunks, counting invocations
struct StubSynth {
    chunks: Vec<&'static [u8]>,
    calls: AtomicUsize,
}

impl StubSynth {
    fn new(chunks: Vec<&'static [u8]>) -> Self {
        Self {
            chunks,
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Synthesizer for StubSynth {
    async fn stream(&self, _text: &str) -> droidspeak::Result<AudioStream> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let chunks: Vec<droidspeak::Result<Bytes>> = self
            .chunks
            .iter()
            .map(|c| Ok(Bytes::from_static(c)))
            .collect();
        Ok(Box::pin(futures::stream::iter(chunks)))
    }
}

/// Audio fetcher stub that always fails
struct FailingFetcher;

#[async_trait]
impl FetchAudio for FailingFetcher {
    async fn fetch(&self, _text: &str) -> droidspeak::Result<Vec<u8>> {
        Err(Error::Upstream("voice relay error 502".to_string()))
    }
}

/// Player stub recording every payload handed to it
#[derive(Clone, Default)]
struct RecordingPlayer {
    played: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl RecordingPlayer {
    fn played(&self) -> Vec<Vec<u8>> {
        self.played.lock().unwrap().clone()
    }
}

#[async_trait]
impl Player for RecordingPlayer {
    async fn play(&mut self, audio: &[u8]) -> droidspeak::Result<()> {
        self.played.lock().unwrap().push(audio.to_vec());
        Ok(())
    }
}

/// Player stub that fails to decode
struct FailingPlayer;

#[async_trait]
impl Player for FailingPlayer {
    async fn play(&mut self, _audio: &[u8]) -> droidspeak::Result<()> {
        Err(Error::Decode("no decodable audio frames".to_string()))
    }
}

#[tokio::test]
async fn happy_path_answers_and_plays_assembled_audio() {
    let synth = Arc::new(StubSynth::new(vec![b"RIFF", b"....", b"WAVE"]));
    let player = RecordingPlayer::default();

    let controller = Controller::new(
        StubAnswer::Reply("Oh my, such a curious inquiry!"),
        Base64AudioFetcher::new(synth.clone()),
        player.clone(),
    );

    assert!(
        controller
            .submit("What is the airspeed velocity of an unladen swallow?")
            .await
    );

    let state = controller.state().await;
    assert_eq!(state.status, Status::Answered);
    assert_eq!(state.answer.as_deref(), Some("Oh my, such a curious inquiry!"));
    assert_eq!(state.error, None);

    assert_eq!(synth.call_count(), 1);
    assert_eq!(player.played(), vec![b"RIFF....WAVE".to_vec()]);
}

#[tokio::test]
async fn empty_answer_errors_without_synthesis() {
    let synth = Arc::new(StubSynth::new(vec![b"RIFF"]));

    let controller = Controller::new(
        StubAnswer::Empty,
        Base64AudioFetcher::new(synth.clone()),
        RecordingPlayer::default(),
    );

    controller.submit("hello?").await;

    let state = controller.state().await;
    assert_eq!(state.status, Status::Errored);
    assert_eq!(state.error.as_deref(), Some("No response"));
    assert_eq!(state.answer, None);
    assert_eq!(synth.call_count(), 0);
}

#[tokio::test]
async fn collaborator_failure_errors_with_stringified_cause() {
    let synth = Arc::new(StubSynth::new(vec![b"RIFF"]));

    let controller = Controller::new(
        StubAnswer::Fail("rate limited"),
        Base64AudioFetcher::new(synth.clone()),
        RecordingPlayer::default(),
    );

    controller.submit("hello?").await;

    let state = controller.state().await;
    assert_eq!(state.status, Status::Errored);
    assert!(state.error.unwrap().contains("rate limited"));
    assert_eq!(state.answer, None);
    assert_eq!(synth.call_count(), 0);
}

#[tokio::test]
async fn audio_failure_does_not_revert_answer() {
    let controller = Controller::new(
        StubAnswer::Reply("Oh my!"),
        FailingFetcher,
        RecordingPlayer::default(),
    );

    controller.submit("hello?").await;

    let state = controller.state().await;
    assert_eq!(state.status, Status::Answered);
    assert_eq!(state.answer.as_deref(), Some("Oh my!"));
    assert!(state.error.unwrap().contains("voice relay error"));
}

#[tokio::test]
async fn playback_failure_does_not_revert_answer() {
    let synth = Arc::new(StubSynth::new(vec![b"not", b"mp3"]));

    let controller = Controller::new(
        StubAnswer::Reply("Oh my!"),
        Base64AudioFetcher::new(synth),
        FailingPlayer,
    );

    controller.submit("hello?").await;

    let state = controller.state().await;
    assert_eq!(state.status, Status::Answered);
    assert_eq!(state.answer.as_deref(), Some("Oh my!"));
    assert!(state.error.unwrap().contains("decode error"));
}

#[tokio::test]
async fn new_submission_resets_terminal_state() {
    let synth = Arc::new(StubSynth::new(vec![b"RIFF"]));

    let controller = Controller::new(
        StubAnswer::Empty,
        Base64AudioFetcher::new(synth),
        RecordingPlayer::default(),
    );

    controller.submit("first").await;
    assert_eq!(controller.state().await.status, Status::Errored);

    // The errored state is resettable only by a new submission
    controller.submit("second").await;
    let state = controller.state().await;
    assert_eq!(state.status, Status::Errored);
    assert_eq!(state.answer, None);
}

/// Answer stub that blocks until released, to hold the controller in
/// `Processing`
struct GatedAnswer {
    gate: Arc<Notify>,
}

#[async_trait]
impl AnswerSource for GatedAnswer {
    async fn answer(&self, _question: &str) -> droidspeak::Result<Option<String>> {
        self.gate.notified().await;
        Ok(Some("finally".to_string()))
    }
}

#[tokio::test]
async fn second_submission_while_processing_is_ignored() {
    let gate = Arc::new(Notify::new());
    let synth = Arc::new(StubSynth::new(vec![b"RIFF"]));

    let controller = Arc::new(Controller::new(
        GatedAnswer { gate: gate.clone() },
        Base64AudioFetcher::new(synth),
        RecordingPlayer::default(),
    ));

    let first = tokio::spawn({
        let controller = controller.clone();
        async move { controller.submit("first").await }
    });

    // Wait for the first turn to reach Processing
    while controller.state().await.status != Status::Processing {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    // The second submission must not be sequenced as a new turn
    assert!(!controller.submit("second").await);
    assert_eq!(controller.state().await.status, Status::Processing);

    gate.notify_one();
    assert!(first.await.unwrap());

    let state = controller.state().await;
    assert_eq!(state.status, Status::Answered);
    assert_eq!(state.answer.as_deref(), Some("finally"));
}
