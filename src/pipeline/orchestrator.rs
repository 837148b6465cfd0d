use base64::Engine;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

use super::status::{emit_status, StatusSender};
use crate::config::Config;
use crate::error::PipelineError;
use crate::session::{RecordingSession, SessionController, SessionStatus};
use crate::summarize::{SummarizationClient, Summarizer};
use crate::transcribe::{Transcriber, TranscriptionInvoker};

/// Terminal result of one session, in the shape the presentation bridge
/// expects: `{ success, text?, rawTranscription?, error?, audioFile }`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOutcome {
    pub success: bool,

    /// Generated meeting minutes (success only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Raw transcript — present on success, and on summarization failure as
    /// the degraded fallback
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_transcription: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Persisted audio path, kept for user reference even on failure
    pub audio_file: PathBuf,
}

impl PipelineOutcome {
    fn failed(audio_file: &Path, error: &PipelineError, raw_transcription: Option<String>) -> Self {
        Self {
            success: false,
            text: None,
            raw_transcription,
            error: Some(error.to_string()),
            audio_file: audio_file.to_path_buf(),
        }
    }
}

/// Sequences one session through capture → persist → transcribe → summarize
/// and reports stage entries and the terminal outcome to the presentation
/// layer.
pub struct Pipeline {
    controller: SessionController,
    transcriber: Arc<dyn Transcriber>,
    summarizer: Arc<dyn Summarizer>,
    status_tx: StatusSender,
}

impl Pipeline {
    pub fn new(
        controller: SessionController,
        transcriber: Arc<dyn Transcriber>,
        summarizer: Arc<dyn Summarizer>,
        status_tx: StatusSender,
    ) -> Self {
        Self {
            controller,
            transcriber,
            summarizer,
            status_tx,
        }
    }

    /// Wire up the real invoker and summarization client from configuration.
    pub fn from_config(config: &Config, status_tx: StatusSender) -> Self {
        Self::new(
            SessionController::new(&config.recordings.path),
            Arc::new(TranscriptionInvoker::new(config.transcriber.clone())),
            Arc::new(SummarizationClient::from_env(&config.summarizer)),
            status_tx,
        )
    }

    /// Begin a new recording session.
    ///
    /// Fails with `AlreadyRecording` while another session is in flight;
    /// returns the audio path allocated for the new session.
    pub async fn start_recording(&self) -> Result<PathBuf, PipelineError> {
        self.controller.start_recording().await
    }

    /// Finish the active recording and run it through the pipeline.
    ///
    /// `Err` means the request itself was invalid (`NoActiveRecording`);
    /// `Ok` carries the session's terminal outcome, success or failure.
    pub async fn stop_recording(&self, audio: &[u8]) -> Result<PipelineOutcome, PipelineError> {
        let audio_path = self.controller.begin_finalize().await?;
        self.run_from_finalizing(&audio_path, audio).await
    }

    /// Drive a session that has just entered `Finalizing` to its terminal
    /// state.
    async fn run_from_finalizing(
        &self,
        audio_path: &Path,
        audio: &[u8],
    ) -> Result<PipelineOutcome, PipelineError> {
        info!("Stopping recording, processing audio...");
        emit_status(
            &self.status_tx,
            "Processing audio and preparing for transcription...",
        );

        if let Err(e) = self.controller.persist_audio(audio_path, audio).await {
            error!("Failed to persist audio: {}", e);
            self.controller.fail(e.clone()).await;
            return Ok(PipelineOutcome::failed(audio_path, &e, None));
        }

        self.controller.advance(SessionStatus::Transcribing).await;
        emit_status(&self.status_tx, "Starting transcription process...");

        let transcript = match self
            .transcriber
            .transcribe(audio_path, &self.status_tx)
            .await
        {
            Ok(transcript) => transcript,
            Err(e) => {
                error!("Transcription failed: {}", e);
                self.controller.fail(e.clone()).await;
                return Ok(PipelineOutcome::failed(audio_path, &e, None));
            }
        };

        info!("Raw transcription result: {}", transcript);
        self.controller.set_transcript(&transcript).await;

        self.controller.advance(SessionStatus::Summarizing).await;
        emit_status(
            &self.status_tx,
            "Creating meeting minutes from transcription...",
        );

        match self.summarizer.summarize(&transcript).await {
            Ok(minutes) => {
                info!("Meeting minutes generated successfully");
                self.controller.complete(&minutes).await;

                Ok(PipelineOutcome {
                    success: true,
                    text: Some(minutes),
                    raw_transcription: Some(transcript),
                    error: None,
                    audio_file: audio_path.to_path_buf(),
                })
            }
            Err(e) => {
                // Degraded fallback: the session failed, but the caller can
                // still present the unsummarized transcript.
                error!("Error generating meeting minutes: {}", e);
                self.controller.fail(e.clone()).await;

                Ok(PipelineOutcome::failed(audio_path, &e, Some(transcript)))
            }
        }
    }

    /// Finish the active recording from a base64 audio payload, the shape
    /// the presentation bridge delivers blobs in.
    pub async fn stop_recording_base64(
        &self,
        payload: &str,
    ) -> Result<PipelineOutcome, PipelineError> {
        let audio_path = self.controller.begin_finalize().await?;

        let audio = match base64::engine::general_purpose::STANDARD.decode(payload) {
            Ok(audio) => audio,
            Err(e) => {
                let err = PipelineError::Persistence {
                    path: audio_path.clone(),
                    message: format!("invalid base64 audio payload: {}", e),
                };
                error!("{}", err);
                self.controller.fail(err.clone()).await;
                return Ok(PipelineOutcome::failed(&audio_path, &err, None));
            }
        };

        self.run_from_finalizing(&audio_path, &audio).await
    }

    /// Current session snapshot, for status queries and tests.
    pub async fn session(&self) -> Option<RecordingSession> {
        self.controller.current().await
    }
}
