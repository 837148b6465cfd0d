use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use memo_minutes::{
    status_channel, Config, Pipeline, SessionController, StatusUpdate, TranscriptionInvoker,
};
use memo_minutes::transcribe::Transcriber;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "memo-minutes", about = "Voice memo to meeting minutes pipeline")]
struct Cli {
    /// Config file (without extension, per config crate conventions)
    #[arg(long, default_value = "config/memo-minutes")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline over an existing audio file
    Run {
        /// Path to the recorded audio file
        audio: PathBuf,
    },
    /// Transcribe an audio file without summarizing
    Transcribe {
        /// Path to the recorded audio file
        audio: PathBuf,
    },
    /// List persisted recordings
    Recordings,
}

/// Print status notifications as the pipeline emits them
fn spawn_status_printer(mut rx: mpsc::Receiver<StatusUpdate>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(update) = rx.recv().await {
            match update {
                StatusUpdate::Status(message) => info!("{}", message),
                StatusUpdate::Warning(message) => warn!("{}", message),
            }
        }
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config))?;

    info!("{} starting", config.service.name);

    match cli.command {
        Command::Run { audio } => {
            let (status_tx, status_rx) = status_channel(64);
            let printer = spawn_status_printer(status_rx);
            let pipeline = Pipeline::from_config(&config, status_tx);

            pipeline.start_recording().await?;

            let audio_bytes = tokio::fs::read(&audio)
                .await
                .with_context(|| format!("Failed to read audio file {}", audio.display()))?;

            let outcome = pipeline.stop_recording(&audio_bytes).await?;
            drop(pipeline);
            printer.await.ok();

            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }

        Command::Transcribe { audio } => {
            let (status_tx, status_rx) = status_channel(64);
            let printer = spawn_status_printer(status_rx);
            let invoker = TranscriptionInvoker::new(config.transcriber.clone());

            let transcript = invoker.transcribe(&audio, &status_tx).await?;
            drop(status_tx);
            printer.await.ok();

            println!("{}", transcript);
        }

        Command::Recordings => {
            let controller = SessionController::new(&config.recordings.path);
            for entry in controller.list_recordings().await {
                println!("{}\t{} bytes\t{}", entry.name, entry.size, entry.modified);
            }
        }
    }

    Ok(())
}
