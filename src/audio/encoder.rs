use anyhow::{Context, Result};
use std::io::Cursor;
use tracing::info;

use super::capture::AudioFrame;

/// Accumulates captured frames into an in-memory WAV blob.
///
/// Samples are buffered until `finalize()`, which encodes them as 16-bit PCM
/// WAV and returns the bytes. The finished blob is then handed to the session
/// controller for the single persistence write.
pub struct WavEncoder {
    samples: Vec<i16>,
    sample_rate: u32,
    channels: u16,
}

impl WavEncoder {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            samples: Vec::new(),
            sample_rate,
            channels,
        }
    }

    /// Append one captured frame
    pub fn push_frame(&mut self, frame: &AudioFrame) {
        self.samples.extend_from_slice(&frame.samples);
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Finish the WAV stream and return the encoded bytes
    pub fn finalize(self) -> Result<Vec<u8>> {
        let spec = hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut buf = Vec::new();
        {
            let mut writer = hound::WavWriter::new(Cursor::new(&mut buf), spec)
                .context("Failed to create WAV encoder")?;

            for &sample in &self.samples {
                writer
                    .write_sample(sample)
                    .context("Failed to write sample to WAV")?;
            }

            writer.finalize().context("Failed to finalize WAV")?;
        }

        info!(
            "Encoded audio blob: {} samples ({} Hz, {} ch)",
            self.samples.len(),
            self.sample_rate,
            self.channels
        );

        Ok(buf)
    }
}
