//! Stub classifier returning fixed probabilities

use super::traits::Classifier;
use anyhow::Result;

/// Classifier that ignores its input. Used for smoke runs and tests.
#[derive(Debug, Clone)]
pub struct StubClassifier {
    input_dim: usize,
    proba: [f32; 2],
}

impl StubClassifier {
    /// Leans human with 0.6
    pub fn new(input_dim: usize) -> Self {
        Self {
            input_dim,
            proba: [0.6, 0.4],
        }
    }

    pub fn with_proba(mut self, proba: [f32; 2]) -> Self {
        self.proba = proba;
        self
    }
}

impl Classifier for StubClassifier {
    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn predict_proba(&self, _features: &[f32]) -> Result<[f32; 2]> {
        Ok(self.proba)
    }
}
