pub mod capture;
pub mod encoder;

pub use capture::{AudioCapture, AudioFrame};
pub use encoder::WavEncoder;
