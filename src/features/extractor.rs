//! Cepstral summary features
//!
//! Truncate, power STFT, mel filterbank, dB compression, DCT, then the mean
//! (and optionally standard deviation) of every coefficient across frames.

use super::config::FeatureConfig;
use super::mel::{dct_ortho, MelBank};
use super::stft::Stft;
use super::vector::FeatureVector;
use crate::audio::Waveform;
use crate::error::FeatureError;

/// Floor applied to band energies before taking the logarithm
const POWER_FLOOR: f32 = 1e-10;

/// Turns a waveform into a fixed-length feature vector.
///
/// FFT plan and filterbank are built once; `extract` takes `&self` and the
/// extractor can be shared between threads.
pub struct FeatureExtractor {
    config: FeatureConfig,
    stft: Stft,
    mel: MelBank,
}

impl FeatureExtractor {
    pub fn new(mut config: FeatureConfig) -> Self {
        config.frame_size = config.frame_size.max(1);
        config.hop_size = config.hop_size.max(1);
        let stft = Stft::new(config.frame_size, config.hop_size);
        let mel = MelBank::new(config.sample_rate, config.frame_size, config.mel_bands);
        Self { config, stft, mel }
    }

    pub fn dimension(&self) -> usize {
        self.config.dimension()
    }

    /// Extract the summary vector from at most `max_duration_seconds` of audio
    pub fn extract(
        &self,
        waveform: &Waveform,
        max_duration_seconds: f32,
    ) -> Result<FeatureVector, FeatureError> {
        let limit = waveform.sample_limit(max_duration_seconds)?;
        let samples = &waveform.samples()[..waveform.len().min(limit)];
        if samples.len() < waveform.len() {
            log::debug!(
                "Analysing first {} of {} samples",
                samples.len(),
                waveform.len()
            );
        }

        if self.stft.frame_count(samples.len()) == 0 {
            return Err(FeatureError::TooShort {
                samples: samples.len(),
                frame_size: self.config.frame_size,
            });
        }

        let rebuilt;
        let mel = if waveform.sample_rate() == self.mel.sample_rate() {
            &self.mel
        } else {
            log::debug!(
                "Building filterbank for {}Hz (planned for {}Hz)",
                waveform.sample_rate(),
                self.mel.sample_rate()
            );
            rebuilt = MelBank::new(
                waveform.sample_rate(),
                self.config.frame_size,
                self.config.mel_bands,
            );
            &rebuilt
        };

        let log_mel = self.log_mel_frames(samples, mel);
        let cepstra: Vec<Vec<f32>> = log_mel
            .iter()
            .map(|frame| dct_ortho(frame, self.config.n_coefficients))
            .collect();

        log::debug!(
            "Computed {} coefficients over {} frames",
            self.config.n_coefficients,
            cepstra.len()
        );

        Ok(FeatureVector::sanitized(self.summarize(&cepstra)))
    }

    /// Log-mel spectrogram in dB, clipped to `top_db` below its peak
    fn log_mel_frames(&self, samples: &[f32], mel: &MelBank) -> Vec<Vec<f32>> {
        let mut frames: Vec<Vec<f32>> = self
            .stft
            .power_frames(samples)
            .iter()
            .map(|power| {
                mel.apply(power)
                    .into_iter()
                    .map(|e| 10.0 * e.max(POWER_FLOOR).log10())
                    .collect()
            })
            .collect();

        let peak = frames
            .iter()
            .flatten()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max);
        if peak.is_finite() {
            let floor = peak - self.config.top_db;
            for v in frames.iter_mut().flatten() {
                *v = v.max(floor);
            }
        }
        frames
    }

    /// Per-coefficient mean block, then population std-dev block
    fn summarize(&self, cepstra: &[Vec<f32>]) -> Vec<f32> {
        let n = self.config.n_coefficients;
        let count = cepstra.len().max(1) as f64;

        let mut means = vec![0.0f64; n];
        for frame in cepstra {
            for (acc, &c) in means.iter_mut().zip(frame) {
                *acc += c as f64;
            }
        }
        means.iter_mut().for_each(|m| *m /= count);

        let mut out: Vec<f32> = means.iter().map(|&m| m as f32).collect();

        if self.config.include_std {
            let mut variances = vec![0.0f64; n];
            for frame in cepstra {
                for ((acc, &c), &m) in variances.iter_mut().zip(frame).zip(&means) {
                    let d = c as f64 - m;
                    *acc += d * d;
                }
            }
            out.extend(variances.iter().map(|&v| (v / count).sqrt() as f32));
        }

        out
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(FeatureConfig::default())
    }
}
