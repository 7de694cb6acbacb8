use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use droidspeak::api::ApiServer;
use droidspeak::voice::{
    AudioPlayback, Base64AudioFetcher, Player, SpeechSynthesizer, Synthesizer,
};
use droidspeak::{ChatClient, Config, Controller, Status};

/// Droidspeak - voice Q&A assistant gateway
#[derive(Parser)]
#[command(name = "droidspeak", version, about)]
struct Cli {
    /// Port to listen on
    #[arg(long, env = "DROIDSPEAK_PORT", default_value = "8080")]
    port: u16,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run one conversation turn in-process and play the answer
    Ask {
        /// Question to ask
        question: String,
    },
    /// Synthesize text and play it, bypassing the chat collaborator
    TestTts {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the text to speech system.")]
        text: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,droidspeak=info",
        1 => "info,droidspeak=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_env();
    tracing::debug!(?config, "loaded configuration");

    if let Some(cmd) = cli.command {
        return match cmd {
            Command::Ask { question } => ask(&config, &question).await,
            Command::TestTts { text } => test_tts(&config, &text).await,
        };
    }

    tracing::info!(port = cli.port, voice = %config.voice, "starting droidspeak gateway");

    let synth = synthesizer(&config);
    ApiServer::new(synth, cli.port).serve().await?;

    Ok(())
}

/// Run one conversation turn: question -> persona answer -> spoken audio
async fn ask(config: &Config, question: &str) -> anyhow::Result<()> {
    let chat = ChatClient::new(
        config.openai_api_key.clone(),
        config.chat_model.clone(),
        config.persona_prompt.clone(),
    );
    let audio = Base64AudioFetcher::new(synthesizer(config));
    let playback = AudioPlayback::new()?;

    let controller = Controller::new(chat, audio, playback);
    controller.submit(question).await;

    let state = controller.state().await;
    match state.status {
        Status::Answered => {
            println!("{}", state.answer.unwrap_or_default());
            if let Some(error) = state.error {
                eprintln!("(audio failed: {error})");
            }
        }
        _ => anyhow::bail!(state.error.unwrap_or_else(|| "no answer".to_string())),
    }

    Ok(())
}

/// Synthesize `text` and play it
async fn test_tts(config: &Config, text: &str) -> anyhow::Result<()> {
    println!("Synthesizing: \"{text}\"");

    let synth = synthesizer(config);
    let audio = synth.synthesize(text).await?;
    println!("Got {} bytes of audio data", audio.len());

    let mut playback = AudioPlayback::new()?;
    playback.play(&audio).await?;

    Ok(())
}

fn synthesizer(config: &Config) -> Arc<dyn Synthesizer> {
    Arc::new(SpeechSynthesizer::new(
        config.elevenlabs_api_key.clone(),
        config.voice.clone(),
        config.tts_model.clone(),
    ))
}
