use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the recording → transcription → summarization pipeline.
///
/// Every failure is terminal for its session: the session moves to `Failed`
/// and the error is surfaced to the presentation layer together with
/// whatever partial artifacts exist (audio path, raw transcript).
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    // Recording session errors
    #[error("a recording is already in progress")]
    AlreadyRecording,

    #[error("no recording in progress")]
    NoActiveRecording,

    #[error("failed to persist audio to {}: {message}", .path.display())]
    Persistence { path: PathBuf, message: String },

    // Transcription errors
    #[error("failed to start transcription process: {message}")]
    Launch { message: String },

    #[error("transcription process timed out after {} seconds", .timeout_ms / 1000)]
    Timeout { timeout_ms: u64 },

    #[error("transcription completed but no text was returned")]
    EmptyTranscript,

    #[error("transcription failed with code {code}: {stderr}")]
    TranscriptionProcess { code: i32, stderr: String },

    // Summarization errors
    #[error("API key not found in environment")]
    MissingCredential,

    #[error("summarization request failed with status {status}: {body}")]
    SummarizationHttp { status: u16, body: String },

    #[error("unexpected summarization response structure")]
    UnexpectedResponseShape,
}
