//! Payload decoding: base64 text to container bytes to mono PCM
//!
//! Containers are sniffed from content only (no extension hint), decoded
//! with symphonia, averaged to mono and resampled to the target rate.

use super::resample::resample_linear;
use super::waveform::Waveform;
use super::TARGET_SAMPLE_RATE;
use crate::error::DecodeError;
use base64::Engine;
use std::io::Cursor;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decode a base64 payload into raw container bytes.
///
/// Accepts an optional `data:<mime>;base64,` prefix and MIME-style line
/// wrapping; everything else must be strict standard-alphabet base64.
pub fn decode_base64(payload: &str) -> Result<Vec<u8>, DecodeError> {
    let mut body = payload.trim();
    if body.starts_with("data:") {
        if let Some(idx) = body.find(";base64,") {
            body = &body[idx + ";base64,".len()..];
        }
    }

    let bytes = if body.contains(['\n', '\r']) {
        let joined: String = body.chars().filter(|c| *c != '\n' && *c != '\r').collect();
        base64::engine::general_purpose::STANDARD.decode(joined)?
    } else {
        base64::engine::general_purpose::STANDARD.decode(body)?
    };
    Ok(bytes)
}

/// Decodes arbitrary audio containers into a mono waveform at a fixed rate
#[derive(Debug, Clone)]
pub struct AudioDecoder {
    target_sample_rate: u32,
    /// Stop decoding after this much source audio
    max_decode_seconds: f32,
}

impl AudioDecoder {
    pub fn new() -> Self {
        Self {
            target_sample_rate: TARGET_SAMPLE_RATE,
            max_decode_seconds: 60.0,
        }
    }

    /// Override the output sample rate
    pub fn with_target_sample_rate(mut self, sample_rate: u32) -> Self {
        self.target_sample_rate = sample_rate.max(1);
        self
    }

    /// Override the hard cap on decoded source audio
    pub fn with_max_decode_seconds(mut self, seconds: f32) -> Self {
        self.max_decode_seconds = seconds;
        self
    }

    /// Decode container bytes into a mono waveform at the target rate
    pub fn decode(&self, bytes: &[u8]) -> Result<Waveform, DecodeError> {
        if bytes.is_empty() {
            return Err(DecodeError::Empty);
        }

        let (samples, source_rate) = self.decode_to_mono(bytes)?;
        if samples.is_empty() {
            return Err(DecodeError::Empty);
        }

        log::debug!(
            "Decoded {} samples ({:.2}s) at {}Hz",
            samples.len(),
            samples.len() as f32 / source_rate as f32,
            source_rate
        );

        let resampled = resample_linear(&samples, source_rate, self.target_sample_rate);
        Waveform::new(resampled, self.target_sample_rate)
    }

    fn decode_to_mono(&self, bytes: &[u8]) -> Result<(Vec<f32>, u32), DecodeError> {
        let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());

        let probed = symphonia::default::get_probe()
            .format(
                &Hint::new(),
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(DecodeError::Probe)?;

        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or(DecodeError::NoTrack)?;

        let track_id = track.id;
        let sample_rate = track
            .codec_params
            .sample_rate
            .ok_or(DecodeError::MissingSampleRate)?;

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(DecodeError::Codec)?;

        let max_samples = if self.max_decode_seconds.is_finite() && self.max_decode_seconds > 0.0 {
            (sample_rate as f64 * self.max_decode_seconds as f64).ceil() as usize
        } else {
            usize::MAX
        };
        let mut all_samples: Vec<f32> = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(p) => p,
                Err(e) => {
                    stream_ended(e, all_samples.len())?;
                    break;
                }
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(d) => d,
                Err(SymphoniaError::DecodeError(e)) => {
                    log::debug!("Skipping undecodable packet: {}", e);
                    continue;
                }
                Err(e) => {
                    stream_ended(e, all_samples.len())?;
                    break;
                }
            };

            let spec = *decoded.spec();
            let mut sample_buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
            sample_buf.copy_interleaved_ref(decoded);

            let samples = sample_buf.samples();
            let channels = spec.channels.count().max(1);
            if channels > 1 {
                for chunk in samples.chunks(channels) {
                    let mono: f32 = chunk.iter().sum::<f32>() / channels as f32;
                    all_samples.push(mono);
                }
            } else {
                all_samples.extend_from_slice(samples);
            }

            if all_samples.len() >= max_samples {
                log::debug!(
                    "Decode cap of {:.0}s reached, ignoring remaining packets",
                    self.max_decode_seconds
                );
                all_samples.truncate(max_samples);
                break;
            }
        }

        Ok((all_samples, sample_rate))
    }
}

/// Classify an error that stops the packet loop.
///
/// End of file is the normal exit. Anything else fails the decode when no
/// samples have been produced yet; after that the samples decoded so far
/// are kept and the truncation is logged.
fn stream_ended(err: SymphoniaError, decoded: usize) -> Result<(), DecodeError> {
    match err {
        SymphoniaError::IoError(ref e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(()),
        err if decoded == 0 => Err(DecodeError::Stream(err)),
        err => {
            log::warn!(
                "Audio stream ended early after {} samples, keeping them: {}",
                decoded,
                err
            );
            Ok(())
        }
    }
}

impl Default for AudioDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wav_bytes(channels: u16, sample_rate: u32, frames: usize) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for i in 0..frames {
                let t = i as f32 / sample_rate as f32;
                let left = (t * 440.0 * std::f32::consts::TAU).sin() * 0.5;
                writer.write_sample((left * i16::MAX as f32) as i16).unwrap();
                if channels == 2 {
                    // Right channel is the inverse, so the mono mix is silence
                    writer.write_sample((-left * i16::MAX as f32) as i16).unwrap();
                }
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_base64_plain() {
        assert_eq!(decode_base64("aGVsbG8=").unwrap(), b"hello");
    }

    #[test]
    fn test_base64_data_uri_and_wrapping() {
        let payload = "  data:audio/wav;base64,aGVs\r\nbG8=\n";
        assert_eq!(decode_base64(payload).unwrap(), b"hello");
    }

    #[test]
    fn test_base64_invalid() {
        assert!(matches!(
            decode_base64("not base64 at all!"),
            Err(DecodeError::Base64(_))
        ));
    }

    #[test]
    fn test_decode_wav_at_target_rate() {
        let bytes = wav_bytes(1, 16_000, 16_000);
        let waveform = AudioDecoder::new().decode(&bytes).unwrap();
        assert_eq!(waveform.sample_rate(), 16_000);
        assert_eq!(waveform.len(), 16_000);
    }

    #[test]
    fn test_decode_resamples_to_target() {
        let bytes = wav_bytes(1, 44_100, 44_100);
        let waveform = AudioDecoder::new().decode(&bytes).unwrap();
        assert_eq!(waveform.sample_rate(), TARGET_SAMPLE_RATE);
        assert_eq!(waveform.len(), 16_000);
    }

    #[test]
    fn test_decode_stereo_averages_channels() {
        let bytes = wav_bytes(2, 16_000, 8_000);
        let waveform = AudioDecoder::new().decode(&bytes).unwrap();
        assert_eq!(waveform.len(), 8_000);
        let peak = waveform.samples().iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(peak < 1e-3, "mono mix should cancel out, peak={}", peak);
    }

    #[test]
    fn test_decode_cap() {
        let bytes = wav_bytes(1, 16_000, 16_000 * 3);
        let waveform = AudioDecoder::new()
            .with_max_decode_seconds(1.0)
            .decode(&bytes)
            .unwrap();
        assert_eq!(waveform.len(), 16_000);
    }

    #[test]
    fn test_decode_rejects_text() {
        let result = AudioDecoder::new().decode(b"This is just a plain text file.\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_stream_end_at_eof() {
        let eof = SymphoniaError::IoError(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "end of stream",
        ));
        assert!(stream_ended(eof, 0).is_ok());
    }

    #[test]
    fn test_stream_error_before_samples_fails() {
        assert!(matches!(
            stream_ended(SymphoniaError::Unsupported("core feature"), 0),
            Err(DecodeError::Stream(_))
        ));
        assert!(matches!(
            stream_ended(SymphoniaError::DecodeError("bad frame header"), 0),
            Err(DecodeError::Stream(_))
        ));
    }

    #[test]
    fn test_stream_error_after_samples_keeps_them() {
        assert!(stream_ended(SymphoniaError::Unsupported("core feature"), 4_096).is_ok());
        let io = SymphoniaError::IoError(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "truncated page",
        ));
        assert!(stream_ended(io, 1).is_ok());
    }

    #[test]
    fn test_decode_rejects_empty() {
        assert!(matches!(AudioDecoder::new().decode(&[]), Err(DecodeError::Empty)));
        assert!(AudioDecoder::new().decode(&wav_bytes(1, 16_000, 0)).is_err());
    }
}
