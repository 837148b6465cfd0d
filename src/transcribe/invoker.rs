use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{info, warn};

use crate::config::{TranscriberConfig, TranscriberKind};
use crate::error::PipelineError;
use crate::pipeline::status::{emit_status, emit_warning, StatusSender};

/// Progress markers the speech-to-text component prints to stdout.
///
/// Substring sniffing is inherently fragile (it depends on the upstream log
/// wording) but matches what the component actually emits today.
pub const MODEL_LOADING_MARKER: &str = "Loading Whisper model";
pub const TRANSCRIBING_MARKER: &str = "Starting transcription";

/// Speech-to-text seam, mockable in orchestrator tests.
#[async_trait::async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe the audio file, emitting progress notifications as the
    /// subprocess reports them.
    async fn transcribe(
        &self,
        audio_path: &Path,
        status: &StatusSender,
    ) -> Result<String, PipelineError>;
}

/// Launches and supervises the external speech-to-text subprocess.
///
/// One invocation per session: spawn `<command> <audio>`, stream stdout for
/// progress markers, collect stderr as non-fatal warnings, enforce the hard
/// timeout, and extract the final transcript line on clean exit. Exactly one
/// terminal result is produced per run; the timeout and the exit handler are
/// a race, whichever fires first wins.
pub struct TranscriptionInvoker {
    config: TranscriberConfig,
}

impl TranscriptionInvoker {
    pub fn new(config: TranscriberConfig) -> Self {
        Self { config }
    }

    fn command(&self, audio_path: &Path) -> Command {
        let mut cmd = match self.config.kind {
            TranscriberKind::Script => {
                let mut cmd = Command::new(&self.config.interpreter);
                cmd.arg(&self.config.command);
                cmd
            }
            TranscriberKind::Binary => Command::new(&self.config.command),
        };

        cmd.arg(audio_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait::async_trait]
impl Transcriber for TranscriptionInvoker {
    async fn transcribe(
        &self,
        audio_path: &Path,
        status: &StatusSender,
    ) -> Result<String, PipelineError> {
        info!(
            "Spawning transcriber: {} {}",
            self.config.command,
            audio_path.display()
        );

        let mut child = self
            .command(audio_path)
            .spawn()
            .map_err(|e| PipelineError::Launch {
                message: e.to_string(),
            })?;

        let stdout = child.stdout.take().ok_or_else(|| PipelineError::Launch {
            message: "failed to capture transcriber stdout".to_string(),
        })?;
        let stderr = child.stderr.take().ok_or_else(|| PipelineError::Launch {
            message: "failed to capture transcriber stderr".to_string(),
        })?;

        // Stream stdout in arrival order, watching for the progress markers.
        // Each marker notification fires at most once per run.
        let status_tx = status.clone();
        let stdout_task = tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            let mut collected = String::new();
            let mut model_loading_seen = false;
            let mut transcribing_seen = false;

            while let Ok(Some(line)) = lines.next_line().await {
                if !model_loading_seen && line.contains(MODEL_LOADING_MARKER) {
                    model_loading_seen = true;
                    emit_status(&status_tx, "Loading Whisper transcription model...");
                } else if !transcribing_seen && line.contains(TRANSCRIBING_MARKER) {
                    transcribing_seen = true;
                    emit_status(&status_tx, "Transcribing audio...");
                }

                collected.push_str(&line);
                collected.push('\n');
            }

            collected
        });

        // Stderr is diagnostic only: report each line as a warning, keep the
        // accumulated text for the failure message on nonzero exit.
        let warn_tx = status.clone();
        let stderr_task = tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            let mut collected = String::new();

            while let Ok(Some(line)) = lines.next_line().await {
                warn!("Transcriber stderr: {}", line);
                let snippet: String = line.chars().take(100).collect();
                emit_warning(&warn_tx, format!("Transcription warning: {}...", snippet));

                collected.push_str(&line);
                collected.push('\n');
            }

            collected
        });

        // Wait for exit, then join the stream readers so transcript
        // extraction sees the complete output.
        let run = async {
            let exit = child.wait().await;
            let stdout_text = stdout_task.await.unwrap_or_default();
            let stderr_text = stderr_task.await.unwrap_or_default();
            (exit, stdout_text, stderr_text)
        };

        let timeout_ms = self.config.timeout().as_millis() as u64;
        let outcome = tokio::time::timeout(self.config.timeout(), run).await;

        let (exit, stdout_text, stderr_text) = match outcome {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!("Transcription timeout reached, killing process");
                if let Err(e) = child.kill().await {
                    warn!("Failed to kill transcriber process: {}", e);
                }
                return Err(PipelineError::Timeout { timeout_ms });
            }
        };

        let exit = exit.map_err(|e| PipelineError::TranscriptionProcess {
            code: -1,
            stderr: e.to_string(),
        })?;

        info!("Transcriber exited with {:?}", exit.code());

        if !exit.success() {
            let stderr = if stderr_text.trim().is_empty() {
                "unknown error".to_string()
            } else {
                stderr_text.trim().to_string()
            };

            return Err(PipelineError::TranscriptionProcess {
                code: exit.code().unwrap_or(-1),
                stderr,
            });
        }

        match extract_transcript(&stdout_text) {
            Some(transcript) => Ok(transcript.to_string()),
            None => Err(PipelineError::EmptyTranscript),
        }
    }
}

/// The transcript is the last non-blank stdout line, trimmed.
///
/// Everything before it is the component's progress logging.
pub fn extract_transcript(stdout: &str) -> Option<&str> {
    stdout.lines().rev().map(str::trim).find(|l| !l.is_empty())
}
