// Integration tests for the recording session controller
//
// These verify the single-flight recording slot, the legal status edges,
// and the one-write-per-session persistence contract.

use anyhow::Result;
use memo_minutes::{PipelineError, SessionController, SessionStatus};
use tempfile::TempDir;

#[tokio::test]
async fn test_start_recording_allocates_timestamped_wav_path() -> Result<()> {
    let dir = TempDir::new()?;
    let controller = SessionController::new(dir.path().join("recordings"));

    let audio_path = controller.start_recording().await?;

    let name = audio_path.file_name().unwrap().to_string_lossy();
    assert!(name.starts_with("recording-"), "name: {}", name);
    assert!(name.ends_with(".wav"), "name: {}", name);
    assert!(audio_path.starts_with(dir.path().join("recordings")));

    let session = controller.current().await.unwrap();
    assert_eq!(session.status, SessionStatus::Capturing);
    assert!(!session.id.is_empty());
    assert!(session.raw_transcript.is_none());
    assert!(session.summary.is_none());
    assert!(session.error.is_none());

    Ok(())
}

#[tokio::test]
async fn test_second_start_is_rejected_and_leaves_session_unchanged() -> Result<()> {
    let dir = TempDir::new()?;
    let controller = SessionController::new(dir.path().join("recordings"));

    controller.start_recording().await?;
    let before = controller.current().await.unwrap();

    let result = controller.start_recording().await;
    assert!(matches!(result, Err(PipelineError::AlreadyRecording)));

    let after = controller.current().await.unwrap();
    assert_eq!(after.id, before.id);
    assert_eq!(after.status, before.status);
    assert_eq!(after.audio_path, before.audio_path);

    Ok(())
}

#[tokio::test]
async fn test_stop_without_active_recording_is_rejected() -> Result<()> {
    let dir = TempDir::new()?;
    let controller = SessionController::new(dir.path().join("recordings"));

    let result = controller.begin_finalize().await;
    assert!(matches!(result, Err(PipelineError::NoActiveRecording)));

    Ok(())
}

#[tokio::test]
async fn test_new_session_allowed_after_terminal_state() -> Result<()> {
    let dir = TempDir::new()?;
    let controller = SessionController::new(dir.path().join("recordings"));

    controller.start_recording().await?;
    controller.fail(PipelineError::EmptyTranscript).await;

    // Failed is terminal for the slot; a fresh start must succeed
    controller.start_recording().await?;
    let session = controller.current().await.unwrap();
    assert_eq!(session.status, SessionStatus::Capturing);
    assert!(session.error.is_none());

    Ok(())
}

#[tokio::test]
async fn test_persist_audio_round_trip_is_byte_identical() -> Result<()> {
    let dir = TempDir::new()?;
    let controller = SessionController::new(dir.path().join("recordings"));

    let audio_path = controller.start_recording().await?;
    controller.begin_finalize().await?;

    let payload: Vec<u8> = (0u16..2048).flat_map(|n| n.to_le_bytes()).collect();
    controller.persist_audio(&audio_path, &payload).await?;

    let read_back = tokio::fs::read(&audio_path).await?;
    assert_eq!(read_back, payload);

    Ok(())
}

#[tokio::test]
async fn test_persist_audio_rejects_empty_payload_before_writing() -> Result<()> {
    let dir = TempDir::new()?;
    let controller = SessionController::new(dir.path().join("recordings"));

    let audio_path = controller.start_recording().await?;
    controller.begin_finalize().await?;

    let result = controller.persist_audio(&audio_path, &[]).await;
    match result {
        Err(PipelineError::Persistence { path, message }) => {
            assert_eq!(path, audio_path);
            assert!(message.contains("no audio data"), "message: {}", message);
        }
        other => panic!("Expected Persistence error, got {:?}", other),
    }

    // Nothing was written
    assert!(!audio_path.exists());

    Ok(())
}

#[tokio::test]
async fn test_list_recordings_reports_persisted_wav_files() -> Result<()> {
    let dir = TempDir::new()?;
    let recordings_dir = dir.path().join("recordings");
    let controller = SessionController::new(&recordings_dir);

    // Missing directory means no recordings yet
    assert!(controller.list_recordings().await.is_empty());

    let audio_path = controller.start_recording().await?;
    controller.begin_finalize().await?;
    controller.persist_audio(&audio_path, b"RIFF-ish bytes").await?;

    // Non-wav files are ignored
    tokio::fs::write(recordings_dir.join("notes.md"), b"not audio").await?;

    let entries = controller.list_recordings().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, audio_path);
    assert_eq!(entries[0].size, b"RIFF-ish bytes".len() as u64);

    Ok(())
}

#[test]
fn test_status_transition_edges() {
    use SessionStatus::*;

    // The forward pipeline edges
    assert!(Idle.may_transition_to(Capturing));
    assert!(Capturing.may_transition_to(Finalizing));
    assert!(Finalizing.may_transition_to(Transcribing));
    assert!(Transcribing.may_transition_to(Summarizing));
    assert!(Summarizing.may_transition_to(Complete));

    // Any in-flight stage may fail
    assert!(Capturing.may_transition_to(Failed));
    assert!(Finalizing.may_transition_to(Failed));
    assert!(Transcribing.may_transition_to(Failed));
    assert!(Summarizing.may_transition_to(Failed));

    // No regressions, no skips, terminal states stay terminal
    assert!(!Idle.may_transition_to(Failed));
    assert!(!Idle.may_transition_to(Transcribing));
    assert!(!Capturing.may_transition_to(Transcribing));
    assert!(!Summarizing.may_transition_to(Transcribing));
    assert!(!Complete.may_transition_to(Failed));
    assert!(!Failed.may_transition_to(Capturing));
    assert!(!Complete.may_transition_to(Capturing));
}

#[test]
fn test_terminal_statuses() {
    use SessionStatus::*;

    for status in [Idle, Complete, Failed] {
        assert!(status.is_terminal(), "{:?} should be terminal", status);
    }
    for status in [Capturing, Finalizing, Transcribing, Summarizing] {
        assert!(!status.is_terminal(), "{:?} should be in-flight", status);
    }
}
