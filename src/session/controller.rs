use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::session::{RecordingSession, SessionStatus};
use crate::error::PipelineError;

/// Owns the one-at-a-time recording state.
///
/// The single active session lives in a mutex-guarded slot; a second
/// `start_recording` while the slot holds a non-terminal session is rejected
/// rather than raced. Terminal sessions stay in the slot for inspection until
/// the next recording replaces them.
pub struct SessionController {
    recordings_dir: PathBuf,
    slot: Mutex<Option<RecordingSession>>,
}

impl SessionController {
    pub fn new(recordings_dir: impl Into<PathBuf>) -> Self {
        Self {
            recordings_dir: recordings_dir.into(),
            slot: Mutex::new(None),
        }
    }

    /// Start a new recording session.
    ///
    /// Fails with `AlreadyRecording` if a session is still in flight.
    /// Returns the audio path allocated for this session.
    pub async fn start_recording(&self) -> Result<PathBuf, PipelineError> {
        let mut slot = self.slot.lock().await;

        if let Some(session) = slot.as_ref() {
            if !session.status.is_terminal() {
                warn!(
                    "Recording already in progress (session {}, {:?})",
                    session.id, session.status
                );
                return Err(PipelineError::AlreadyRecording);
            }
        }

        tokio::fs::create_dir_all(&self.recordings_dir)
            .await
            .map_err(|e| PipelineError::Persistence {
                path: self.recordings_dir.clone(),
                message: format!("failed to create recordings directory: {}", e),
            })?;

        let session = RecordingSession::begin(&self.recordings_dir);
        let audio_path = session.audio_path.clone();

        info!(
            "Starting new recording: {} -> {}",
            session.id,
            audio_path.display()
        );

        *slot = Some(session);
        Ok(audio_path)
    }

    /// Move the active session from `Capturing` to `Finalizing`.
    ///
    /// Fails with `NoActiveRecording` if nothing is capturing. Returns the
    /// session's audio path for the persistence write.
    pub async fn begin_finalize(&self) -> Result<PathBuf, PipelineError> {
        let mut slot = self.slot.lock().await;

        match slot.as_mut() {
            Some(session) if session.status == SessionStatus::Capturing => {
                session.advance(SessionStatus::Finalizing);
                Ok(session.audio_path.clone())
            }
            _ => {
                warn!("No recording in progress");
                Err(PipelineError::NoActiveRecording)
            }
        }
    }

    /// Persist the finalized audio blob to the session's path.
    ///
    /// Exactly one write per session, no retries. Empty payloads are rejected
    /// before touching the filesystem, and the written file is verified
    /// non-empty afterwards.
    pub async fn persist_audio(&self, path: &Path, audio: &[u8]) -> Result<(), PipelineError> {
        if audio.is_empty() {
            return Err(PipelineError::Persistence {
                path: path.to_path_buf(),
                message: "no audio data received".to_string(),
            });
        }

        tokio::fs::write(path, audio)
            .await
            .map_err(|e| PipelineError::Persistence {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| PipelineError::Persistence {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        if metadata.len() == 0 {
            return Err(PipelineError::Persistence {
                path: path.to_path_buf(),
                message: "audio file was created but is empty".to_string(),
            });
        }

        info!("Audio saved to {} ({} bytes)", path.display(), audio.len());
        Ok(())
    }

    /// Advance the active session to the given stage
    pub async fn advance(&self, next: SessionStatus) {
        let mut slot = self.slot.lock().await;
        if let Some(session) = slot.as_mut() {
            session.advance(next);
        }
    }

    /// Record the transcript produced by a successful transcription
    pub async fn set_transcript(&self, transcript: &str) {
        let mut slot = self.slot.lock().await;
        if let Some(session) = slot.as_mut() {
            session.raw_transcript = Some(transcript.to_string());
        }
    }

    /// Complete the active session with its summary text
    pub async fn complete(&self, summary: &str) {
        let mut slot = self.slot.lock().await;
        if let Some(session) = slot.as_mut() {
            session.advance(SessionStatus::Complete);
            session.summary = Some(summary.to_string());
        }
    }

    /// Fail the active session with a terminal error
    pub async fn fail(&self, error: PipelineError) {
        let mut slot = self.slot.lock().await;
        if let Some(session) = slot.as_mut() {
            session.fail(error);
        }
    }

    /// Snapshot of the current session, if any
    pub async fn current(&self) -> Option<RecordingSession> {
        self.slot.lock().await.clone()
    }
}

/// A persisted recording on disk
#[derive(Debug, Clone, serde::Serialize)]
pub struct RecordingEntry {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub modified: chrono::DateTime<chrono::Utc>,
}

impl SessionController {
    /// List persisted `.wav` recordings, for the presentation layer's
    /// recordings view. Missing directory means no recordings yet.
    pub async fn list_recordings(&self) -> Vec<RecordingEntry> {
        let mut entries = Vec::new();

        let mut dir = match tokio::fs::read_dir(&self.recordings_dir).await {
            Ok(dir) => dir,
            Err(_) => return entries,
        };

        while let Ok(Some(entry)) = dir.next_entry().await {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("wav") {
                continue;
            }

            let Ok(metadata) = entry.metadata().await else {
                continue;
            };

            let modified = metadata
                .modified()
                .map(chrono::DateTime::<chrono::Utc>::from)
                .unwrap_or_else(|_| chrono::Utc::now());

            entries.push(RecordingEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                path,
                size: metadata.len(),
                modified,
            });
        }

        entries
    }
}
