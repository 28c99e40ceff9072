//! Short-time power spectrum using rustfft

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// Planned forward FFT plus analysis window. Immutable, shareable across threads.
pub(super) struct Stft {
    fft: Arc<dyn Fft<f32>>,
    frame_size: usize,
    hop_size: usize,
    window: Vec<f32>,
}

impl Stft {
    pub(super) fn new(frame_size: usize, hop_size: usize) -> Self {
        let frame_size = frame_size.max(1);
        let hop_size = hop_size.max(1);
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(frame_size);

        // Periodic Hann (divides by N, not N-1)
        let window = (0..frame_size)
            .map(|i| {
                0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / frame_size as f32).cos())
            })
            .collect();

        Self {
            fft,
            frame_size,
            hop_size,
            window,
        }
    }

    /// Number of full frames that fit in `len` samples
    pub(super) fn frame_count(&self, len: usize) -> usize {
        if len < self.frame_size {
            0
        } else {
            (len - self.frame_size) / self.hop_size + 1
        }
    }

    /// Power spectrum (`frame_size / 2 + 1` bins) of every full frame
    pub(super) fn power_frames(&self, samples: &[f32]) -> Vec<Vec<f32>> {
        let num_frames = self.frame_count(samples.len());
        let num_bins = self.frame_size / 2 + 1;

        let mut buffer = vec![Complex::new(0.0f32, 0.0); self.frame_size];
        let mut scratch = vec![Complex::new(0.0f32, 0.0); self.fft.get_inplace_scratch_len()];
        let mut frames = Vec::with_capacity(num_frames);

        for frame_idx in 0..num_frames {
            let start = frame_idx * self.hop_size;
            for (i, cell) in buffer.iter_mut().enumerate() {
                let sample = samples[start + i];
                let sample = if sample.is_finite() { sample } else { 0.0 };
                *cell = Complex::new(sample * self.window[i], 0.0);
            }

            self.fft.process_with_scratch(&mut buffer, &mut scratch);

            frames.push(buffer[..num_bins].iter().map(|c| c.norm_sqr()).collect());
        }

        frames
    }
}
