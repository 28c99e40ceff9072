//! Acoustic feature extraction
//!
//! Produces the fixed-length cepstral summary vector the classifier consumes.

mod config;
mod extractor;
mod mel;
mod stft;
mod vector;

pub use config::FeatureConfig;
pub use extractor::FeatureExtractor;
pub use vector::FeatureVector;
