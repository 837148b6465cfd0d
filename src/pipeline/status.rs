use tokio::sync::mpsc;

/// Advisory notification for the presentation layer.
///
/// These are human-readable progress lines, not part of the correctness
/// contract; the terminal `PipelineOutcome` is what callers act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
    /// Progress message for a stage entry or subprocess marker
    Status(String),
    /// Non-fatal diagnostic (e.g. transcriber stderr output)
    Warning(String),
}

pub type StatusSender = mpsc::Sender<StatusUpdate>;

/// Create the notification channel shared by the pipeline and the
/// presentation layer.
pub fn status_channel(capacity: usize) -> (StatusSender, mpsc::Receiver<StatusUpdate>) {
    mpsc::channel(capacity)
}

/// Send a progress line without blocking the pipeline.
///
/// A full or closed channel drops the notification; a slow or absent
/// presentation layer must never stall a session.
pub fn emit_status(tx: &StatusSender, message: impl Into<String>) {
    let _ = tx.try_send(StatusUpdate::Status(message.into()));
}

/// Send a non-fatal warning without blocking the pipeline.
pub fn emit_warning(tx: &StatusSender, message: impl Into<String>) {
    let _ = tx.try_send(StatusUpdate::Warning(message.into()));
}
