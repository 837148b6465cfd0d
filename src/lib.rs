pub mod audio;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod session;
pub mod summarize;
pub mod transcribe;

pub use audio::{AudioCapture, AudioFrame, WavEncoder};
pub use config::{Config, SummarizerConfig, TranscriberConfig, TranscriberKind};
pub use error::PipelineError;
pub use pipeline::{status_channel, Pipeline, PipelineOutcome, StatusSender, StatusUpdate};
pub use session::{RecordingSession, SessionController, SessionStatus};
pub use summarize::{SummarizationClient, Summarizer};
pub use transcribe::{Transcriber, TranscriptionInvoker};
