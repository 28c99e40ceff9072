//! Inference orchestration
//!
//! Decoder -> extractor -> classifier, with a fixed fallback policy so every
//! input, malformed or not, yields a well-formed prediction.

pub mod config;
pub mod pipeline;
pub mod prediction;

pub use config::InferenceConfig;
pub use pipeline::{InferenceError, InferencePipeline};
pub use prediction::{Label, Prediction};
