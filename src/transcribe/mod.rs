pub mod invoker;

pub use invoker::{extract_transcript, Transcriber, TranscriptionInvoker};
