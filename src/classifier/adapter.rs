//! Shape-checked access to a classifier

use super::traits::Classifier;
use crate::error::{ClassifyError, ShapeError};
use crate::features::FeatureVector;

/// Binary decision and the probability of the chosen class
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub machine_generated: bool,
    pub score: f32,
}

/// Wraps a classifier with the input-size precondition.
///
/// No feature engineering happens here: vectors are never padded or
/// truncated, a length mismatch is a `ShapeError`.
pub struct ClassifierAdapter<C: Classifier> {
    classifier: C,
}

impl<C: Classifier> ClassifierAdapter<C> {
    pub fn new(classifier: C) -> Self {
        Self { classifier }
    }

    pub fn input_dim(&self) -> usize {
        self.classifier.input_dim()
    }

    /// Check a vector length against the trained dimension
    pub fn check_shape(&self, len: usize) -> Result<(), ShapeError> {
        let expected = self.classifier.input_dim();
        if len != expected {
            return Err(ShapeError {
                expected,
                actual: len,
            });
        }
        Ok(())
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<Classification, ClassifyError> {
        self.check_shape(features.len())?;

        let proba = self
            .classifier
            .predict_proba(features.as_slice())
            .map_err(|e| ClassifyError::Model(format!("{:#}", e)))?;

        if proba.iter().any(|p| !p.is_finite() || *p < 0.0 || *p > 1.0) {
            return Err(ClassifyError::InvalidOutput(proba));
        }

        let [p_human, p_machine] = proba;
        let machine_generated = p_machine > p_human;
        Ok(Classification {
            machine_generated,
            score: p_human.max(p_machine),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::StubClassifier;

    #[test]
    fn test_shape_mismatch_rejected() {
        let adapter = ClassifierAdapter::new(StubClassifier::new(40));
        for len in [0, 39, 41, 80] {
            let result = adapter.predict(&FeatureVector::sanitized(vec![0.0; len]));
            match result {
                Err(ClassifyError::Shape(e)) => {
                    assert_eq!(e.expected, 40);
                    assert_eq!(e.actual, len);
                }
                other => panic!("expected shape error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_score_is_max_probability() {
        let adapter = ClassifierAdapter::new(StubClassifier::new(4).with_proba([0.2, 0.8]));
        let result = adapter.predict(&FeatureVector::sanitized(vec![0.0; 4])).unwrap();
        assert!(result.machine_generated);
        assert!((result.score - 0.8).abs() < 1e-6);

        let adapter = ClassifierAdapter::new(StubClassifier::new(4).with_proba([0.7, 0.3]));
        let result = adapter.predict(&FeatureVector::sanitized(vec![0.0; 4])).unwrap();
        assert!(!result.machine_generated);
        assert!((result.score - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_probabilities_rejected() {
        let adapter = ClassifierAdapter::new(StubClassifier::new(2).with_proba([f32::NAN, 0.5]));
        assert!(matches!(
            adapter.predict(&FeatureVector::sanitized(vec![0.0; 2])),
            Err(ClassifyError::InvalidOutput(_))
        ));
    }
}
