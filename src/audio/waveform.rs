//! Mono PCM waveform

use crate::error::{DecodeError, FeatureError};

/// Mono f32 samples at a known sample rate. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    /// Wrap decoded samples, rejecting an empty buffer
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self, DecodeError> {
        if samples.is_empty() {
            return Err(DecodeError::Empty);
        }
        Ok(Self {
            samples,
            sample_rate: sample_rate.max(1),
        })
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false, kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Number of leading samples kept for a given duration limit:
    /// `floor(sample_rate * max_duration_seconds)`
    pub fn sample_limit(&self, max_duration_seconds: f32) -> Result<usize, FeatureError> {
        if !max_duration_seconds.is_finite() || max_duration_seconds <= 0.0 {
            return Err(FeatureError::InvalidDuration(max_duration_seconds));
        }
        let limit = (self.sample_rate as f64 * max_duration_seconds as f64).floor() as usize;
        if limit == 0 {
            return Err(FeatureError::InvalidDuration(max_duration_seconds));
        }
        Ok(limit)
    }

    /// Keep at most `max_duration_seconds` of audio, taken from the start.
    /// Shorter clips are returned unchanged.
    pub fn truncate(mut self, max_duration_seconds: f32) -> Result<Self, FeatureError> {
        let limit = self.sample_limit(max_duration_seconds)?;
        if self.samples.len() > limit {
            log::debug!(
                "Truncating waveform from {:.2}s to {:.2}s",
                self.duration_secs(),
                max_duration_seconds
            );
            self.samples.truncate(limit);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_waveform_rejected() {
        assert!(matches!(Waveform::new(Vec::new(), 16_000), Err(DecodeError::Empty)));
    }

    #[test]
    fn test_truncate_long_clip() {
        let waveform = Waveform::new(vec![0.1; 16_000 * 10], 16_000).unwrap();
        let truncated = waveform.truncate(6.0).unwrap();
        assert_eq!(truncated.len(), 96_000);
    }

    #[test]
    fn test_truncate_uses_floor() {
        let waveform = Waveform::new(vec![0.1; 1_000], 1_000).unwrap();
        let truncated = waveform.truncate(0.0125).unwrap();
        assert_eq!(truncated.len(), 12);
    }

    #[test]
    fn test_short_clip_unchanged() {
        let samples: Vec<f32> = (0..8_000).map(|i| i as f32 / 8_000.0).collect();
        let waveform = Waveform::new(samples.clone(), 16_000).unwrap();
        let truncated = waveform.truncate(6.0).unwrap();
        assert_eq!(truncated.samples(), samples.as_slice());
    }

    #[test]
    fn test_invalid_duration() {
        let waveform = Waveform::new(vec![0.0; 100], 16_000).unwrap();
        assert!(waveform.clone().truncate(0.0).is_err());
        assert!(waveform.clone().truncate(f32::NAN).is_err());
        // Rounds down to zero samples
        assert!(waveform.truncate(0.00001).is_err());
    }
}
