//! Audio input layer
//!
//! Turns an encoded payload into a mono waveform at a fixed sample rate.
//! Decoding is powered by symphonia, so any container it can probe is accepted.

mod decoder;
mod resample;
mod waveform;

pub use decoder::{decode_base64, AudioDecoder};
pub use resample::resample_linear;
pub use waveform::Waveform;

/// Sample rate every waveform is converted to before feature extraction
pub const TARGET_SAMPLE_RATE: u32 = 16_000;
