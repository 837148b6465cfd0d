use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use tracing::warn;

use crate::error::PipelineError;

/// Pipeline stage of a recording session.
///
/// Sessions move forward through the sequence only; `Failed` is reachable
/// from any non-idle status. `Complete` and `Failed` are terminal — another
/// recording requires a fresh session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionStatus {
    Idle,
    Capturing,
    Finalizing,
    Transcribing,
    Summarizing,
    Complete,
    Failed,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionStatus::Idle | SessionStatus::Complete | SessionStatus::Failed
        )
    }

    /// Whether moving from `self` to `next` follows a legal pipeline edge
    pub fn may_transition_to(&self, next: SessionStatus) -> bool {
        use SessionStatus::*;

        match (*self, next) {
            (Idle, Capturing) => true,
            (Capturing, Finalizing) => true,
            (Finalizing, Transcribing) => true,
            (Transcribing, Summarizing) => true,
            (Summarizing, Complete) => true,
            // Any in-flight stage may fail
            (Capturing | Finalizing | Transcribing | Summarizing, Failed) => true,
            _ => false,
        }
    }
}

/// One complete attempt at record → transcribe → summarize.
#[derive(Debug, Clone)]
pub struct RecordingSession {
    /// Opaque identifier, derived from the creation timestamp
    pub id: String,

    /// Current pipeline stage
    pub status: SessionStatus,

    /// Where the finalized audio blob is (or will be) persisted
    pub audio_path: PathBuf,

    /// Set only after successful transcription
    pub raw_transcript: Option<String>,

    /// Set only after successful summarization
    pub summary: Option<String>,

    /// Terminal failure, if any
    pub error: Option<PipelineError>,

    /// When the session was created
    pub started_at: DateTime<Utc>,
}

impl RecordingSession {
    /// Create a new session in `Capturing` with a timestamp-derived identity.
    ///
    /// The audio file is named `recording-<millis>.wav` under the recordings
    /// directory, matching the persisted-artifact contract.
    pub fn begin(recordings_dir: &std::path::Path) -> Self {
        let started_at = Utc::now();
        let millis = started_at.timestamp_millis();

        Self {
            id: millis.to_string(),
            status: SessionStatus::Capturing,
            audio_path: recordings_dir.join(format!("recording-{}.wav", millis)),
            raw_transcript: None,
            summary: None,
            error: None,
            started_at,
        }
    }

    /// Advance to the next pipeline stage.
    ///
    /// Illegal edges are a bug in the orchestrator; they are logged and
    /// ignored rather than corrupting the session.
    pub fn advance(&mut self, next: SessionStatus) {
        if !self.status.may_transition_to(next) {
            debug_assert!(
                false,
                "illegal session transition {:?} -> {:?}",
                self.status, next
            );
            warn!(
                "Ignoring illegal session transition {:?} -> {:?} (session {})",
                self.status, next, self.id
            );
            return;
        }

        self.status = next;
    }

    /// Mark the session failed with a terminal error
    pub fn fail(&mut self, error: PipelineError) {
        self.advance(SessionStatus::Failed);
        self.error = Some(error);
    }
}
