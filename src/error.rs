//! Error types for each pipeline stage
//!
//! The pipeline converts all of these into fallback predictions; they are
//! public so a host can translate them itself via `try_infer`.

use thiserror::Error;

/// The payload could not be turned into a waveform
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("unrecognized audio container: {0}")]
    Probe(#[source] symphonia::core::errors::Error),

    #[error("no decodable audio track")]
    NoTrack,

    #[error("audio track has no sample rate")]
    MissingSampleRate,

    #[error("failed to create decoder: {0}")]
    Codec(#[source] symphonia::core::errors::Error),

    #[error("audio stream failed before any samples were decoded: {0}")]
    Stream(#[source] symphonia::core::errors::Error),

    #[error("decoded audio is empty")]
    Empty,
}

/// Numeric failure while deriving the feature vector
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("waveform too short for analysis: {samples} samples, need at least {frame_size}")]
    TooShort { samples: usize, frame_size: usize },

    #[error("invalid max duration: {0}s")]
    InvalidDuration(f32),

    #[error("feature extraction panicked: {0}")]
    Internal(String),
}

/// Feature vector length does not match the classifier's trained input size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("feature vector has {actual} values, classifier expects {expected}")]
pub struct ShapeError {
    pub expected: usize,
    pub actual: usize,
}

/// Classifier stage failure
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error("classifier failed: {0}")]
    Model(String),

    #[error("classifier returned invalid probabilities: {0:?}")]
    InvalidOutput([f32; 2]),
}
