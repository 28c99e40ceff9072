//! Mel filterbank and cepstral transform

/// Triangular mel filters over a power spectrum, stored sparsely
#[derive(Debug, Clone)]
pub(super) struct MelBank {
    sample_rate: u32,
    /// One `(first_bin, weights)` pair per mel band
    filters: Vec<(usize, Vec<f32>)>,
}

impl MelBank {
    pub(super) fn new(sample_rate: u32, fft_size: usize, mel_bands: usize) -> Self {
        let sr = sample_rate.max(1) as f64;
        let f_max = sr / 2.0;
        let mel_max = hz_to_mel(f_max);
        let hz_points: Vec<f64> = (0..mel_bands + 2)
            .map(|i| mel_to_hz(mel_max * i as f64 / (mel_bands + 1) as f64))
            .collect();

        let bins = fft_size / 2 + 1;
        let bin_hz: Vec<f64> = (0..bins).map(|b| b as f64 * sr / fft_size as f64).collect();

        let filters = (0..mel_bands)
            .map(|m| {
                let (lower, center, upper) = (hz_points[m], hz_points[m + 1], hz_points[m + 2]);
                // Slaney normalisation: constant energy per band
                let enorm = 2.0 / (upper - lower).max(f64::EPSILON);
                let weights: Vec<(usize, f32)> = bin_hz
                    .iter()
                    .enumerate()
                    .filter_map(|(bin, &hz)| {
                        let rising = (hz - lower) / (center - lower).max(f64::EPSILON);
                        let falling = (upper - hz) / (upper - center).max(f64::EPSILON);
                        let w = rising.min(falling);
                        (w > 0.0).then_some((bin, (w * enorm) as f32))
                    })
                    .collect();
                let first = weights.first().map(|&(bin, _)| bin).unwrap_or(0);
                (first, weights.into_iter().map(|(_, w)| w).collect())
            })
            .collect();

        Self {
            sample_rate,
            filters,
        }
    }

    pub(super) fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Mel band energies for one power-spectrum frame
    pub(super) fn apply(&self, power: &[f32]) -> Vec<f32> {
        self.filters
            .iter()
            .map(|(first, weights)| {
                weights
                    .iter()
                    .enumerate()
                    .map(|(i, w)| power.get(first + i).copied().unwrap_or(0.0) as f64 * *w as f64)
                    .sum::<f64>() as f32
            })
            .collect()
    }
}

fn hz_to_mel(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f64) -> f64 {
    700.0 * (10.0_f64.powf(mel / 2595.0) - 1.0)
}

/// Orthonormal DCT-II, keeping the first `count` coefficients
pub(super) fn dct_ortho(values: &[f32], count: usize) -> Vec<f32> {
    let n = values.len().max(1) as f64;
    (0..count)
        .map(|k| {
            let sum: f64 = values
                .iter()
                .enumerate()
                .map(|(m, &v)| {
                    let angle = std::f64::consts::PI * k as f64 * (2.0 * m as f64 + 1.0) / (2.0 * n);
                    v as f64 * angle.cos()
                })
                .sum();
            let scale = if k == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };
            (sum * scale) as f32
        })
        .collect()
}
