pub mod orchestrator;
pub mod status;

pub use orchestrator::{Pipeline, PipelineOutcome};
pub use status::{status_channel, StatusSender, StatusUpdate};
