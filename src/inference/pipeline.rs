//! Main inference pipeline
//!
//! Stages run strictly in order: received, decoded, features extracted,
//! classified. Any stage failure exits to one of two fallbacks:
//!
//! | Failure                              | Result          |
//! |--------------------------------------|-----------------|
//! | missing/empty input, decode, timeout | `UNKNOWN`, 0.0  |
//! | feature extraction, classifier       | `HUMAN`, 0.5    |
//!
//! On success the confidence is clamped into the configured band.

use super::config::InferenceConfig;
use super::prediction::{Label, Prediction};
use crate::audio::{decode_base64, AudioDecoder};
use crate::classifier::{Classification, Classifier, ClassifierAdapter};
use crate::error::{ClassifyError, DecodeError, FeatureError, ShapeError};
use crate::features::FeatureExtractor;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{mpsc, Arc};
use std::time::Duration;
use thiserror::Error;

/// Why a request did not reach the classified state
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("empty audio payload")]
    Empty,

    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("feature extraction failed: {0}")]
    Feature(#[from] FeatureError),

    #[error("classification failed: {0}")]
    Classify(#[from] ClassifyError),

    #[error("inference timed out after {0:?}")]
    TimedOut(Duration),

    #[error("inference aborted: {0}")]
    Aborted(String),
}

impl InferenceError {
    /// The prediction returned in place of this error
    pub fn fallback(&self) -> Prediction {
        match self {
            InferenceError::Empty
            | InferenceError::Decode(_)
            | InferenceError::TimedOut(_)
            | InferenceError::Aborted(_) => Prediction::unknown(),
            InferenceError::Feature(_) | InferenceError::Classify(_) => Prediction::uncertain(),
        }
    }

    /// Pipeline stage that failed
    pub fn stage(&self) -> &'static str {
        match self {
            InferenceError::Empty => "received",
            InferenceError::Decode(_) => "decode",
            InferenceError::Feature(_) => "features",
            InferenceError::Classify(_) => "classify",
            InferenceError::TimedOut(_) => "timeout",
            InferenceError::Aborted(_) => "aborted",
        }
    }
}

/// Decode, extract and classify one clip per call.
///
/// Holds no per-request state; a single instance (typically in an `Arc`)
/// serves concurrent requests without locking.
pub struct InferencePipeline<C: Classifier> {
    config: InferenceConfig,
    decoder: AudioDecoder,
    extractor: FeatureExtractor,
    classifier: ClassifierAdapter<C>,
}

impl<C: Classifier> InferencePipeline<C> {
    /// Create a new pipeline around an already-loaded classifier
    pub fn new(config: InferenceConfig, classifier: C) -> Self {
        let decoder = AudioDecoder::new()
            .with_target_sample_rate(config.target_sample_rate)
            .with_max_decode_seconds(config.max_decode_seconds);

        let mut features = config.features.clone();
        features.sample_rate = config.target_sample_rate;
        let extractor = FeatureExtractor::new(features);

        Self {
            config,
            decoder,
            extractor,
            classifier: ClassifierAdapter::new(classifier),
        }
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Verify the extractor produces what the classifier was trained on.
    /// Hosts call this once at startup.
    pub fn check_dimensions(&self) -> Result<(), ShapeError> {
        self.classifier.check_shape(self.extractor.dimension())
    }

    /// Classify a base64 payload, never failing.
    pub fn infer(&self, encoded: &str) -> Prediction {
        self.resolve(self.try_infer(encoded))
    }

    /// Classify an optional payload; a missing one is treated like an empty one
    pub fn infer_request(&self, encoded: Option<&str>) -> Prediction {
        match encoded {
            Some(encoded) => self.infer(encoded),
            None => self.resolve(Err(InferenceError::Empty)),
        }
    }

    /// Classify raw container bytes, skipping the base64 stage
    pub fn infer_bytes(&self, bytes: &[u8]) -> Prediction {
        self.resolve(self.try_infer_bytes(bytes))
    }

    /// Like `infer`, but surfaces the failure instead of the fallback
    pub fn try_infer(&self, encoded: &str) -> Result<Prediction, InferenceError> {
        if encoded.trim().is_empty() {
            return Err(InferenceError::Empty);
        }
        let bytes = decode_base64(encoded)?;
        self.try_infer_bytes(&bytes)
    }

    /// Like `infer_bytes`, but surfaces the failure instead of the fallback
    pub fn try_infer_bytes(&self, bytes: &[u8]) -> Result<Prediction, InferenceError> {
        if bytes.is_empty() {
            return Err(InferenceError::Empty);
        }

        let waveform = catch_stage(|| Ok(self.decoder.decode(bytes)?), InferenceError::Aborted)?;
        log::debug!(
            "Decoded: {} samples ({:.2}s) at {}Hz",
            waveform.len(),
            waveform.duration_secs(),
            waveform.sample_rate()
        );

        let features = catch_stage(
            || self.extractor.extract(&waveform, self.config.max_duration_seconds),
            FeatureError::Internal,
        )?;
        drop(waveform);
        log::debug!("Features extracted: {} values", features.len());

        let classification =
            catch_stage(|| self.classifier.predict(&features), ClassifyError::Model)?;
        log::debug!(
            "Classified: machine_generated={} score={:.4}",
            classification.machine_generated,
            classification.score
        );

        Ok(self.respond(classification))
    }

    /// Build the success-path prediction with clamped confidence
    fn respond(&self, classification: Classification) -> Prediction {
        let label = if classification.machine_generated {
            Label::AiGenerated
        } else {
            Label::Human
        };
        let confidence = classification
            .score
            .clamp(self.config.confidence_floor, self.config.confidence_ceiling);
        Prediction::new(label, confidence)
    }

    /// Map a stage result to the caller-visible prediction, logging failures
    fn resolve(&self, result: Result<Prediction, InferenceError>) -> Prediction {
        match result {
            Ok(prediction) => {
                log::info!(
                    "Prediction: {} ({:.2})",
                    prediction.classification,
                    prediction.confidence
                );
                prediction
            }
            Err(e) => {
                let fallback = e.fallback();
                log::warn!(
                    "Inference failed at {} stage: {}; returning {} ({:.2})",
                    e.stage(),
                    e,
                    fallback.classification,
                    fallback.confidence
                );
                fallback
            }
        }
    }
}

impl<C: Classifier + 'static> InferencePipeline<C> {
    /// Classify on a worker thread, giving up after `timeout`.
    ///
    /// An expired deadline yields the unknown fallback; the worker is left to
    /// finish in the background and its result is discarded.
    ///
    /// Workers are detached, not cancelled: a clip that keeps stalling past
    /// the deadline still holds its thread until it finishes. Nothing here
    /// bounds how many such workers exist at once, so a host accepting
    /// untrusted input must limit concurrent calls itself (a semaphore or a
    /// fixed-size request pool in front of this function).
    pub fn infer_with_timeout(pipeline: &Arc<Self>, encoded: String, timeout: Duration) -> Prediction {
        let (tx, rx) = mpsc::channel();
        let worker = Arc::clone(pipeline);

        let spawned = std::thread::Builder::new()
            .name("inference".to_string())
            .spawn(move || {
                let result = worker.try_infer(&encoded);
                let _ = tx.send(result);
            });

        if let Err(e) = spawned {
            return pipeline.resolve(Err(InferenceError::Aborted(format!(
                "failed to spawn worker: {}",
                e
            ))));
        }

        match rx.recv_timeout(timeout) {
            Ok(result) => pipeline.resolve(result),
            Err(mpsc::RecvTimeoutError::Timeout) => {
                pipeline.resolve(Err(InferenceError::TimedOut(timeout)))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => pipeline.resolve(Err(
                InferenceError::Aborted("worker exited without a result".to_string()),
            )),
        }
    }
}

/// Run one stage, turning a panic into that stage's own error so the
/// fallback matches the stage that failed
fn catch_stage<T, E>(
    run: impl FnOnce() -> Result<T, E>,
    on_panic: impl FnOnce(String) -> E,
) -> Result<T, E> {
    catch_unwind(AssertUnwindSafe(run))
        .unwrap_or_else(|payload| Err(on_panic(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}
