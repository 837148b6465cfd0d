use anyhow::Result;
use tokio::sync::mpsc;

/// Audio sample data (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Timestamp in milliseconds since capture started
    pub timestamp_ms: u64,
}

/// Microphone capture seam
///
/// The real microphone backend lives in the presentation layer; the pipeline
/// only needs a stream of frames it can accumulate into one audio blob.
#[async_trait::async_trait]
pub trait AudioCapture: Send + Sync {
    /// Start capturing audio
    ///
    /// Returns a channel receiver that will receive audio frames
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>>;

    /// Stop capturing audio
    async fn stop(&mut self) -> Result<()>;

    /// Check if capture is currently active
    fn is_capturing(&self) -> bool;

    /// Get capture source name for logging
    fn name(&self) -> &str;
}

/// In-memory capture source that replays a fixed frame sequence.
///
/// Used in tests and by the CLI when driving the pipeline from a file
/// instead of a live microphone.
pub struct FixtureCapture {
    frames: Vec<AudioFrame>,
    capturing: bool,
}

impl FixtureCapture {
    pub fn new(frames: Vec<AudioFrame>) -> Self {
        Self {
            frames,
            capturing: false,
        }
    }
}

#[async_trait::async_trait]
impl AudioCapture for FixtureCapture {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>> {
        let (tx, rx) = mpsc::channel(100);
        let frames = self.frames.clone();
        self.capturing = true;

        tokio::spawn(async move {
            for frame in frames {
                if tx.send(frame).await.is_err() {
                    break;
                }
            }
        });

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        self.capturing = false;
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn name(&self) -> &str {
        "fixture"
    }
}
