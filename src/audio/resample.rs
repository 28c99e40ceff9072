//! Linear-interpolation resampling

/// Resample mono samples from `input_rate` to `output_rate`.
///
/// Returns the input unchanged when the rates already match.
pub fn resample_linear(samples: &[f32], input_rate: u32, output_rate: u32) -> Vec<f32> {
    let input_rate = input_rate.max(1);
    let output_rate = output_rate.max(1);
    if samples.is_empty() || input_rate == output_rate {
        return samples.to_vec();
    }

    let duration_secs = samples.len() as f64 / input_rate as f64;
    let out_len = (duration_secs * output_rate as f64).round().max(1.0) as usize;
    let step = input_rate as f64 / output_rate as f64;

    (0..out_len)
        .map(|i| lerp_sample(samples, i as f64 * step))
        .collect()
}

fn lerp_sample(samples: &[f32], pos: f64) -> f32 {
    let last = samples.len() - 1;
    let idx0 = (pos.floor().max(0.0) as usize).min(last);
    let idx1 = (idx0 + 1).min(last);
    let frac = (pos - idx0 as f64).clamp(0.0, 1.0) as f32;
    let a = samples[idx0];
    let b = samples[idx1];
    a + (b - a) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_rate_passthrough() {
        let input = vec![0.5, -0.5, 0.25];
        assert_eq!(resample_linear(&input, 16_000, 16_000), input);
    }

    #[test]
    fn test_downsample_length() {
        let input = vec![0.0_f32; 44_100];
        let out = resample_linear(&input, 44_100, 16_000);
        assert_eq!(out.len(), 16_000);
    }

    #[test]
    fn test_upsample_interpolates_ramp() {
        let out = resample_linear(&[0.0, 1.0], 1, 2);
        assert_eq!(out.len(), 4);
        assert!((out[0] - 0.0).abs() < 1e-6);
        assert!((out[1] - 0.5).abs() < 1e-6);
        assert!((out[3] - 1.0).abs() < 1e-6);
    }
}
