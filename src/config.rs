use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;

/// Default transcription timeout: 2 minutes, enough for larger recordings.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default generative-language endpoint for meeting minutes.
pub const DEFAULT_SUMMARIZER_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash-latest:generateContent";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub recordings: RecordingsConfig,
    pub transcriber: TranscriberConfig,
    pub summarizer: SummarizerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordingsConfig {
    /// Directory where finished audio blobs are stored (one WAV per session)
    pub path: String,
}

/// How the external speech-to-text component is launched.
///
/// Resolution across candidate install locations (dev script vs. packaged
/// binary) is the packaging layer's job; the pipeline receives one resolved
/// command and uses it as-is.
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriberConfig {
    /// Path to the transcriber script or binary
    pub command: String,

    /// "script" (run through an interpreter) or "binary" (run directly)
    pub kind: TranscriberKind,

    /// Interpreter used for script kind (default: python)
    #[serde(default = "default_interpreter")]
    pub interpreter: String,

    /// Hard timeout for one transcription run, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriberKind {
    Script,
    Binary,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummarizerConfig {
    /// Generative-language endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Environment variable holding the API credential
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_interpreter() -> String {
    "python".to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_endpoint() -> String {
    DEFAULT_SUMMARIZER_ENDPOINT.to_string()
}

fn default_api_key_env() -> String {
    "API_KEY".to_string()
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl TranscriberConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
