//! Voice Detector - human vs machine-generated speech classification
//!
//! This library decodes a short speech clip, summarises it as a fixed-length
//! cepstral feature vector and scores it with a pre-trained binary classifier.
//! The pipeline is total: any input, malformed or not, yields a `Prediction`.

pub mod audio;
pub mod batch;
pub mod classifier;
pub mod error;
pub mod features;
pub mod inference;
pub mod request;

pub use classifier::{Classifier, LogisticModel, StubClassifier};
pub use error::{ClassifyError, DecodeError, FeatureError, ShapeError};
pub use inference::{InferenceConfig, InferenceError, InferencePipeline, Label, Prediction};
