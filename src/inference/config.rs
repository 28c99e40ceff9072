//! Inference configuration

use crate::audio::TARGET_SAMPLE_RATE;
use crate::features::FeatureConfig;
use anyhow::{bail, Result};

/// Configuration for the inference pipeline
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// Sample rate every clip is resampled to
    pub target_sample_rate: u32,

    /// Only the first this-many seconds are analysed
    pub max_duration_seconds: f32,

    /// Decoding stops after this much source audio
    pub max_decode_seconds: f32,

    /// Lowest confidence reported on the success path
    pub confidence_floor: f32,

    /// Highest confidence reported on the success path
    pub confidence_ceiling: f32,

    /// Feature layout, must match the classifier's training
    pub features: FeatureConfig,
}

impl InferenceConfig {
    pub fn new() -> Self {
        Self {
            target_sample_rate: TARGET_SAMPLE_RATE,
            max_duration_seconds: 6.0,
            max_decode_seconds: 60.0,
            confidence_floor: 0.01,
            confidence_ceiling: 0.99,
            features: FeatureConfig::default(),
        }
    }

    pub fn with_max_duration(mut self, seconds: f32) -> Self {
        self.max_duration_seconds = seconds;
        self
    }

    pub fn with_max_decode(mut self, seconds: f32) -> Self {
        self.max_decode_seconds = seconds;
        self
    }

    /// Set the success-path clamp band. Bounds are swapped if given reversed.
    pub fn with_confidence_band(mut self, floor: f32, ceiling: f32) -> Self {
        self.confidence_floor = floor.min(ceiling).clamp(0.0, 1.0);
        self.confidence_ceiling = floor.max(ceiling).clamp(0.0, 1.0);
        self
    }

    pub fn with_features(mut self, features: FeatureConfig) -> Self {
        self.features = features;
        self
    }

    /// Reject settings under which no clip could ever be classified.
    /// Hosts call this once at startup, before building the pipeline.
    pub fn validate(&self) -> Result<()> {
        if self.target_sample_rate == 0 {
            bail!("Target sample rate must be positive");
        }
        if !self.max_duration_seconds.is_finite() || self.max_duration_seconds <= 0.0 {
            bail!(
                "Max duration must be a positive number of seconds, got {}",
                self.max_duration_seconds
            );
        }
        if !self.max_decode_seconds.is_finite() || self.max_decode_seconds <= 0.0 {
            bail!(
                "Max decode length must be a positive number of seconds, got {}",
                self.max_decode_seconds
            );
        }

        let features = &self.features;
        if features.frame_size == 0 || features.hop_size == 0 {
            bail!(
                "Frame and hop sizes must be non-zero (frame={}, hop={})",
                features.frame_size,
                features.hop_size
            );
        }
        if features.mel_bands == 0 || features.n_coefficients == 0 {
            bail!("Mel bands and cepstral coefficients must be non-zero");
        }
        if features.n_coefficients > features.mel_bands {
            bail!(
                "Cannot keep {} coefficients from {} mel bands",
                features.n_coefficients,
                features.mel_bands
            );
        }

        let analysed =
            (self.target_sample_rate as f64 * self.max_duration_seconds as f64).floor() as usize;
        if analysed < features.frame_size {
            bail!(
                "Max duration {}s keeps {} samples at {}Hz, fewer than one {}-sample frame",
                self.max_duration_seconds,
                analysed,
                self.target_sample_rate,
                features.frame_size
            );
        }

        let band = [self.confidence_floor, self.confidence_ceiling];
        if band.iter().any(|c| !c.is_finite() || *c < 0.0 || *c > 1.0)
            || self.confidence_floor > self.confidence_ceiling
        {
            bail!(
                "Confidence band must satisfy 0 <= floor <= ceiling <= 1, got [{}, {}]",
                self.confidence_floor,
                self.confidence_ceiling
            );
        }

        Ok(())
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(InferenceConfig::default().validate().is_ok());
        assert!(InferenceConfig::new().with_max_duration(0.5).validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_max_duration() {
        for seconds in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let err = InferenceConfig::new()
                .with_max_duration(seconds)
                .validate()
                .unwrap_err();
            assert!(err.to_string().contains("Max duration"), "{}", err);
        }
    }

    #[test]
    fn test_rejects_duration_below_one_frame() {
        // 0.1s at 16 kHz is 1600 samples, short of a 2048-sample frame
        let err = InferenceConfig::new()
            .with_max_duration(0.1)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("fewer than one"), "{}", err);
    }

    #[test]
    fn test_rejects_bad_max_decode() {
        assert!(InferenceConfig::new().with_max_decode(0.0).validate().is_err());
        assert!(InferenceConfig::new().with_max_decode(-5.0).validate().is_err());
    }

    #[test]
    fn test_rejects_zero_frame_geometry() {
        let config = InferenceConfig::new().with_features(FeatureConfig {
            hop_size: 0,
            ..FeatureConfig::new()
        });
        assert!(config.validate().is_err());

        let config = InferenceConfig::new().with_features(FeatureConfig {
            n_coefficients: 200,
            ..FeatureConfig::new()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unordered_band() {
        let mut config = InferenceConfig::new();
        config.confidence_floor = 0.9;
        config.confidence_ceiling = 0.1;
        assert!(config.validate().is_err());

        // The builder reorders, so the same values pass through it
        assert!(InferenceConfig::new()
            .with_confidence_band(0.9, 0.1)
            .validate()
            .is_ok());
    }
}
