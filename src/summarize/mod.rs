pub mod client;

pub use client::{
    extract_candidate_text, GenerateResponse, SummarizationClient, Summarizer, PROMPT_PREFIX,
};
