//! Feature extraction configuration

use crate::audio::TARGET_SAMPLE_RATE;

/// Shape of the spectral analysis and of the resulting vector.
///
/// `dimension()` must equal the input size the classifier was trained on.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureConfig {
    /// Sample rate the filterbank is planned for
    pub sample_rate: u32,

    /// STFT frame length in samples (also the FFT size)
    pub frame_size: usize,

    /// Samples between consecutive frames
    pub hop_size: usize,

    /// Number of mel bands before the cepstral transform
    pub mel_bands: usize,

    /// Cepstral coefficients kept per frame
    pub n_coefficients: usize,

    /// Append the per-coefficient standard deviation after the means
    pub include_std: bool,

    /// Dynamic range kept by the dB conversion
    pub top_db: f32,
}

impl FeatureConfig {
    pub fn new() -> Self {
        Self {
            sample_rate: TARGET_SAMPLE_RATE,
            frame_size: 2048,
            hop_size: 512,
            mel_bands: 128,
            n_coefficients: 20,
            include_std: true,
            top_db: 80.0,
        }
    }

    /// Mean-only vector with `n` coefficients
    pub fn means_only(n_coefficients: usize) -> Self {
        Self {
            n_coefficients,
            include_std: false,
            ..Self::new()
        }
    }

    /// Length of the produced feature vector
    pub fn dimension(&self) -> usize {
        if self.include_std {
            self.n_coefficients * 2
        } else {
            self.n_coefficients
        }
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self::new()
    }
}
