pub mod controller;
pub mod session;

pub use controller::{RecordingEntry, SessionController};
pub use session::{RecordingSession, SessionStatus};
